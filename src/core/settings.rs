use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::error::SzamlaError;

/// Default location of the missing-translation ledger.
pub const DEFAULT_MISSING_KEYS_PATH: &str = "translations.missing.json";

/// Default debounce delay before the ledger is written.
pub const DEFAULT_FLUSH_DELAY_MS: u64 = 100;

/// Renderer configuration.
///
/// Every field has a default, so an empty JSON object is a valid settings
/// document:
///
/// ```json
/// {
///   "missingKeysPath": "translations.missing.json",
///   "flushDelayMs": 100,
///   "localeDir": "locales",
///   "whitelistPath": "whitelist-osa-3.0.json"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    /// JSON file receiving the missing-key ledger.
    pub missing_keys_path: PathBuf,
    /// Debounce delay of ledger writes, in milliseconds.
    pub flush_delay_ms: u64,
    /// Directory of extra `<locale>.json` tables, overriding built-ins.
    pub locale_dir: Option<PathBuf>,
    /// Array-coercion whitelist document; the built-in OSA 3.0 list when unset.
    pub whitelist_path: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            missing_keys_path: PathBuf::from(DEFAULT_MISSING_KEYS_PATH),
            flush_delay_ms: DEFAULT_FLUSH_DELAY_MS,
            locale_dir: None,
            whitelist_path: None,
        }
    }
}

impl Settings {
    /// Parse a JSON settings document.
    pub fn from_json_str(json: &str) -> Result<Self, SzamlaError> {
        serde_json::from_str(json).map_err(|e| SzamlaError::Settings(format!("invalid settings: {e}")))
    }

    /// Read and parse a JSON settings file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, SzamlaError> {
        let path = path.as_ref();
        tracing::debug!(path = %path.display(), "Loading settings");
        let json = std::fs::read_to_string(path)
            .map_err(|e| SzamlaError::Settings(format!("cannot read {}: {e}", path.display())))?;
        Self::from_json_str(&json)
    }

    pub fn flush_delay(&self) -> Duration {
        Duration::from_millis(self.flush_delay_ms)
    }

    pub fn missing_keys_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.missing_keys_path = path.into();
        self
    }

    pub fn flush_delay_ms(mut self, ms: u64) -> Self {
        self.flush_delay_ms = ms;
        self
    }

    pub fn locale_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.locale_dir = Some(dir.into());
        self
    }

    pub fn whitelist_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.whitelist_path = Some(path.into());
        self
    }
}
