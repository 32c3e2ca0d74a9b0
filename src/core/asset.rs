//! Embedded audio asset and its installation.
//!
//! The clip is baked into the binary at compile time, so installing it needs
//! nothing but a writable profile directory.

use crate::core::config::SchemeConfig;
use crate::core::error::KoyukiError;
use rust_embed::RustEmbed;
use std::borrow::Cow;
use std::fs;
use std::path::Path;

#[derive(RustEmbed)]
#[folder = "assets/"]
#[include = "*.wav"]
struct AudioAssets;

/// Bytes of the embedded clip named by `config.asset_file_name`.
///
/// The payload is compiled in for every build profile.
pub fn embedded_clip(config: &SchemeConfig) -> Result<Cow<'static, [u8]>, KoyukiError> {
    AudioAssets::get(&config.asset_file_name)
        .map(|file| file.data)
        .ok_or_else(|| KoyukiError::AssetMissing(config.asset_file_name.clone()))
}

/// Write `payload` to `path`, replacing whatever is there.
///
/// The parent directory must already exist. On unix the file ends up 0644.
pub fn install_asset(path: &Path, payload: &[u8]) -> Result<(), KoyukiError> {
    let wrap = |source| KoyukiError::AssetWrite {
        path: path.to_path_buf(),
        source,
    };
    fs::write(path, payload).map_err(wrap)?;
    set_owner_rw(path).map_err(wrap)?;
    Ok(())
}

#[cfg(unix)]
fn set_owner_rw(path: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o644))
}

#[cfg(not(unix))]
fn set_owner_rw(_path: &Path) -> std::io::Result<()> {
    Ok(())
}
