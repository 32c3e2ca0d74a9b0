//! Scheme catalog registration and default-scheme selection.

use crate::core::config::{NAMES_KEY_BASE, SCHEMES_KEY_BASE, SchemeConfig};
use crate::core::error::KoyukiError;
use crate::core::hive::KeyStore;
use crate::core::paths::KeyPath;

/// Key under the names catalog holding this scheme's display label.
pub fn scheme_name_key(config: &SchemeConfig) -> KeyPath {
    KeyPath::new(NAMES_KEY_BASE).child(&config.short_id)
}

/// Ensure `Schemes\Names\<short_id>` exists and holds the display label.
///
/// Re-running leaves the same end state.
pub fn register_scheme<S: KeyStore>(
    store: &mut S,
    config: &SchemeConfig,
) -> Result<(), KoyukiError> {
    let path = scheme_name_key(config);
    let key = store.create_key(&path)?;
    store.set_default_value(&key, &config.display_label)?;
    tracing::info!(
        scheme = %config.short_id,
        label = %config.display_label,
        "registered sound scheme"
    );
    Ok(())
}

/// Point the `Schemes` key at `short_id`.
///
/// `Schemes` must already exist. The store does not check that the id is
/// registered in the names catalog.
pub fn set_default_scheme<S: KeyStore>(
    store: &mut S,
    config: &SchemeConfig,
) -> Result<(), KoyukiError> {
    let key = store.open_key(&KeyPath::new(SCHEMES_KEY_BASE))?;
    store.set_default_value(&key, &config.short_id)?;
    tracing::info!(scheme = %config.short_id, "selected default sound scheme");
    Ok(())
}
