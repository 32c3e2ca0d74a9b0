//! Association propagation over the apps catalog.
//!
//! Walks every `Apps\<app>\<event>` pair currently in the store and points
//! `Apps\<app>\<event>\<namespace>` at the asset. Each write is keyed by its
//! own coordinate, so the result does not depend on enumeration order, and
//! the walk always reads the live catalog so re-runs pick up new events.
//!
//! The first failure ends the pass. Coordinates written before it keep their
//! values; nothing after it is touched.

use crate::core::config::{APPS_KEY_BASE, SchemeConfig};
use crate::core::error::KoyukiError;
use crate::core::hive::KeyStore;
use crate::core::paths::KeyPath;
use std::fmt;

/// Which scheme's slot an association is written into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Namespace {
    /// A named scheme, addressed by its short id.
    Scheme(String),
    /// Whatever scheme is active, independent of its name.
    Current,
}

impl Namespace {
    pub fn segment<'a>(&'a self, config: &'a SchemeConfig) -> &'a str {
        match self {
            Namespace::Scheme(id) => id,
            Namespace::Current => &config.current_alias,
        }
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Namespace::Scheme(id) => write!(f, "scheme {}", id),
            Namespace::Current => f.write_str("current scheme"),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PropagationReport {
    pub apps: usize,
    pub associations: usize,
}

/// `Apps\<app>\<event>\<namespace>`
pub fn association_key(app: &str, event: &str, namespace: &str) -> KeyPath {
    KeyPath::new(APPS_KEY_BASE)
        .child(app)
        .child(event)
        .child(namespace)
}

/// Point every existing application event at `asset_value` under `namespace`.
pub fn propagate<S: KeyStore>(
    store: &mut S,
    config: &SchemeConfig,
    namespace: &Namespace,
    asset_value: &str,
) -> Result<PropagationReport, KoyukiError> {
    let segment = namespace.segment(config);
    let apps_root = KeyPath::new(APPS_KEY_BASE);
    let apps = {
        let key = store.open_key(&apps_root)?;
        store.child_key_names(&key)?
    };

    let mut report = PropagationReport::default();
    for app in &apps {
        report.associations += propagate_app(store, app, segment, asset_value)?;
        report.apps += 1;
    }

    tracing::info!(
        namespace = %namespace,
        apps = report.apps,
        associations = report.associations,
        "propagated sound associations"
    );
    Ok(report)
}

fn propagate_app<S: KeyStore>(
    store: &mut S,
    app: &str,
    segment: &str,
    asset_value: &str,
) -> Result<usize, KoyukiError> {
    let events = {
        let key = store.open_key(&KeyPath::new(APPS_KEY_BASE).child(app))?;
        store.child_key_names(&key)?
    };

    for event in &events {
        let path = association_key(app, event, segment);
        let key = store.create_key(&path)?;
        store.set_default_value(&key, asset_value)?;
        tracing::debug!(key = %path, "wrote association");
    }
    Ok(events.len())
}
