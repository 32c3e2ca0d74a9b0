//! Key path and asset path construction.

use crate::core::config::SchemeConfig;
use crate::core::error::KoyukiError;
use std::fmt;
use std::path::{Path, PathBuf};

pub const KEY_SEPARATOR: char = '\\';

/// Environment variable naming the current user's profile directory.
pub const USER_PROFILE_VAR: &str = "USERPROFILE";

/// Backslash-separated path of a key relative to the per-user store root.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct KeyPath(String);

impl KeyPath {
    pub fn new(path: &str) -> Self {
        KeyPath(path.trim_matches(KEY_SEPARATOR).to_string())
    }

    /// Build a path from individual segments.
    pub fn join<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut path = KeyPath::default();
        for segment in segments {
            path = path.child(segment.as_ref());
        }
        path
    }

    pub fn child(&self, segment: &str) -> Self {
        let segment = segment.trim_matches(KEY_SEPARATOR);
        if self.0.is_empty() {
            KeyPath(segment.to_string())
        } else if segment.is_empty() {
            self.clone()
        } else {
            KeyPath(format!("{}{}{}", self.0, KEY_SEPARATOR, segment))
        }
    }

    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split(KEY_SEPARATOR).filter(|s| !s.is_empty())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for KeyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Where the audio asset lives for a given profile directory.
pub fn asset_path(profile_dir: &Path, config: &SchemeConfig) -> PathBuf {
    profile_dir
        .join(&config.documents_dir)
        .join(&config.asset_file_name)
}

/// Profile directory of the current user, read from `USERPROFILE`.
pub fn user_profile_dir() -> Result<PathBuf, KoyukiError> {
    let raw = std::env::var(USER_PROFILE_VAR)?;
    Ok(PathBuf::from(raw))
}
