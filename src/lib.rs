//! Koyuki: one notification sound for every application.
//!
//! Installs an embedded audio clip into the user's Documents folder,
//! registers it as a new sound scheme, selects that scheme, and then
//! overlays every existing application event so it plays the clip, both
//! under the new scheme and under the `.Current` alias of whatever scheme is
//! active. Nothing is deleted, so the previous configuration stays
//! restorable.
//!
//! # Pipeline
//!
//! 1. Asset install (`<USERPROFILE>\Documents\koyuki.wav`)
//! 2. Scheme registration (`AppEvents\Schemes\Names\NIHAH0`)
//! 3. Default scheme selection (`AppEvents\Schemes`)
//! 4. Association propagation, once for `NIHAH0` and once for `.Current`
//!
//! The first failing step aborts the run.
//!
//! # Stores
//!
//! - **Registry**: `HKEY_CURRENT_USER`, the default on Windows.
//! - **Hive file**: a TOML snapshot of the same tree, selected with
//!   `--hive <FILE>`; used for offline runs and tests.
//!
//! # Crate Structure
//!
//! - [`core`]: store capability, install steps, and the sequencer.

pub mod core;

use crate::core::config::{self, SchemeConfig};
use crate::core::error::KoyukiError;
use crate::core::hive::FileHive;
use crate::core::pipeline::{self, InstallReport, Step};
use crate::core::{banner, paths};

use clap::Parser;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Parser, Debug)]
#[clap(
    name = "koyuki",
    version = env!("CARGO_PKG_VERSION"),
    about = "Make every notification sound play the same clip"
)]
pub struct Cli {
    /// TOML hive file to modify instead of the current user's registry.
    #[clap(long)]
    pub hive: Option<PathBuf>,
    /// Profile directory receiving Documents\koyuki.wav (defaults to USERPROFILE).
    #[clap(long)]
    pub profile_dir: Option<PathBuf>,
    /// Exit right after the banner instead of pausing.
    #[clap(long)]
    pub no_pause: bool,
    /// Log level: trace, debug, info, warn, or error (RUST_LOG wins when set).
    #[clap(long, default_value = "warn")]
    pub log_level: String,
}

pub fn run(cli: &Cli) -> Result<InstallReport, KoyukiError> {
    let config = SchemeConfig::default();
    let profile_dir = match &cli.profile_dir {
        Some(dir) => dir.clone(),
        None => paths::user_profile_dir().map_err(|e| e.at(Step::InstallAsset))?,
    };

    let report = match &cli.hive {
        Some(path) => {
            let mut store = FileHive::open(path)?;
            tracing::info!(hive = %store.path().display(), "using hive file");
            pipeline::install(&mut store, &config, &profile_dir)?
        }
        None => install_into_user_registry(&config, &profile_dir)?,
    };
    tracing::info!(
        asset = %report.asset_path.display(),
        scheme_associations = report.scheme.associations,
        current_associations = report.current.associations,
        "sound scheme override complete"
    );

    banner::print_banner(&config);
    if !cli.no_pause {
        std::thread::sleep(Duration::from_secs(config::EXIT_PAUSE_SECS));
    }
    Ok(report)
}

#[cfg(windows)]
fn install_into_user_registry(
    config: &SchemeConfig,
    profile_dir: &Path,
) -> Result<InstallReport, KoyukiError> {
    let mut store = crate::core::registry::RegistryHive::current_user();
    pipeline::install(&mut store, config, profile_dir)
}

#[cfg(not(windows))]
fn install_into_user_registry(
    _config: &SchemeConfig,
    _profile_dir: &Path,
) -> Result<InstallReport, KoyukiError> {
    Err(KoyukiError::UnsupportedStore(
        "the per-user registry only exists on Windows; pass --hive <FILE>".into(),
    ))
}
