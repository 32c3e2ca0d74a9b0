//! The install sequence.
//!
//! Steps run strictly in order and only communicate through the store. The
//! first failure aborts the run; earlier steps are not rolled back.

use crate::core::asset;
use crate::core::config::SchemeConfig;
use crate::core::error::KoyukiError;
use crate::core::hive::KeyStore;
use crate::core::paths;
use crate::core::propagate::{self, Namespace, PropagationReport};
use crate::core::scheme;
use std::fmt;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    InstallAsset,
    RegisterScheme,
    SetDefaultScheme,
    PropagateScheme,
    PropagateCurrent,
}

impl Step {
    pub const ALL: [Step; 5] = [
        Step::InstallAsset,
        Step::RegisterScheme,
        Step::SetDefaultScheme,
        Step::PropagateScheme,
        Step::PropagateCurrent,
    ];

    pub fn description(&self) -> &'static str {
        match self {
            Step::InstallAsset => "write koyuki.wav to Documents",
            Step::RegisterScheme => "create sound profile",
            Step::SetDefaultScheme => "set default sound scheme",
            Step::PropagateScheme => "create sound associations (sound scheme)",
            Step::PropagateCurrent => "create sound associations (current scheme)",
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallReport {
    pub asset_path: PathBuf,
    pub scheme: PropagationReport,
    pub current: PropagationReport,
}

/// Run every step against `store`, installing the asset under `profile_dir`.
pub fn install<S: KeyStore>(
    store: &mut S,
    config: &SchemeConfig,
    profile_dir: &Path,
) -> Result<InstallReport, KoyukiError> {
    let asset_path = paths::asset_path(profile_dir, config);
    let clip = asset::embedded_clip(config).map_err(|e| e.at(Step::InstallAsset))?;
    asset::install_asset(&asset_path, &clip).map_err(|e| e.at(Step::InstallAsset))?;
    tracing::info!(path = %asset_path.display(), bytes = clip.len(), "installed audio asset");

    scheme::register_scheme(store, config).map_err(|e| e.at(Step::RegisterScheme))?;
    scheme::set_default_scheme(store, config).map_err(|e| e.at(Step::SetDefaultScheme))?;

    let asset_value = asset_path.to_string_lossy();
    let scheme = propagate::propagate(
        store,
        config,
        &Namespace::Scheme(config.short_id.clone()),
        &asset_value,
    )
    .map_err(|e| e.at(Step::PropagateScheme))?;
    let current = propagate::propagate(store, config, &Namespace::Current, &asset_value)
        .map_err(|e| e.at(Step::PropagateCurrent))?;

    Ok(InstallReport {
        asset_path,
        scheme,
        current,
    })
}
