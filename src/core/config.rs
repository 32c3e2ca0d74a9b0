//! Fixed identifiers for the sound scheme this tool installs.
//!
//! The values never change between runs; they live in a struct so every
//! component receives them explicitly and tests can substitute their own.

/// Root of the per-user sound event tree.
pub const SCHEMES_KEY_BASE: &str = r"AppEvents\Schemes";
/// Catalog of scheme identifiers to display labels.
pub const NAMES_KEY_BASE: &str = r"AppEvents\Schemes\Names";
/// Catalog of applications and their sound events.
pub const APPS_KEY_BASE: &str = r"AppEvents\Schemes\Apps";

pub const DEFAULT_SHORT_ID: &str = "NIHAH0";
pub const DEFAULT_DISPLAY_LABEL: &str = "NIHAHAHAHA";
pub const CURRENT_SCHEME_ALIAS: &str = ".Current";
pub const DEFAULT_DOCUMENTS_DIR: &str = "Documents";
pub const DEFAULT_ASSET_FILE_NAME: &str = "koyuki.wav";

/// Seconds the binary keeps the console open after the banner.
pub const EXIT_PAUSE_SECS: u64 = 5;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemeConfig {
    /// Catalog key and association path segment for the new scheme.
    pub short_id: String,
    /// Human-readable label stored in the names catalog.
    pub display_label: String,
    /// Store alias for whichever scheme is active.
    pub current_alias: String,
    /// Directory under the user profile that receives the asset.
    pub documents_dir: String,
    pub asset_file_name: String,
}

impl Default for SchemeConfig {
    fn default() -> Self {
        Self {
            short_id: DEFAULT_SHORT_ID.to_string(),
            display_label: DEFAULT_DISPLAY_LABEL.to_string(),
            current_alias: CURRENT_SCHEME_ALIAS.to_string(),
            documents_dir: DEFAULT_DOCUMENTS_DIR.to_string(),
            asset_file_name: DEFAULT_ASSET_FILE_NAME.to_string(),
        }
    }
}
