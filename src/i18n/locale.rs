use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::{Settings, SzamlaError};

static BUILTIN: &[(&str, &str)] = &[
    ("cn", include_str!("../../locales/cn.json")),
    ("en", include_str!("../../locales/en.json")),
    ("hu", include_str!("../../locales/hu.json")),
];

/// Flat translation table of one locale: key → display string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocaleTable {
    entries: HashMap<String, String>,
}

impl LocaleTable {
    /// Parse a flat JSON object of strings.
    pub fn from_json_str(json: &str) -> Result<Self, SzamlaError> {
        serde_json::from_str(json).map_err(|e| SzamlaError::Locale(e.to_string()))
    }

    /// Exact, case-sensitive lookup.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for LocaleTable {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

/// All loaded locale tables, keyed by lowercase locale code.
///
/// Built once at startup and shared read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct LocaleTables {
    tables: HashMap<String, LocaleTable>,
}

impl LocaleTables {
    /// No tables at all: every lookup is a miss.
    pub fn new() -> Self {
        Self::default()
    }

    /// The tables compiled into the crate (`cn`, `en`, `hu`).
    pub fn builtin() -> Result<Self, SzamlaError> {
        let mut tables = Self::new();
        for (locale, json) in BUILTIN {
            let table = LocaleTable::from_json_str(json)
                .map_err(|e| SzamlaError::Locale(format!("built-in table {locale}: {e}")))?;
            tables.insert(locale, table);
        }
        Ok(tables)
    }

    /// Built-in tables plus the `localeDir` of `settings`, if any.
    pub fn load(settings: &Settings) -> Result<Self, SzamlaError> {
        let mut tables = Self::builtin()?;
        if let Some(dir) = &settings.locale_dir {
            tables.load_dir(dir)?;
        }
        Ok(tables)
    }

    /// Add or replace the table of `locale`.
    pub fn insert(&mut self, locale: &str, table: LocaleTable) -> Option<LocaleTable> {
        self.tables.insert(locale.to_lowercase(), table)
    }

    /// Load every `<locale>.json` file of `dir`, replacing tables of the same
    /// locale. Returns the number of tables read.
    pub fn load_dir(&mut self, dir: impl AsRef<Path>) -> Result<usize, SzamlaError> {
        let dir = dir.as_ref();
        let entries = std::fs::read_dir(dir)
            .map_err(|e| SzamlaError::Locale(format!("cannot read {}: {e}", dir.display())))?;

        let mut loaded = 0;
        for entry in entries {
            let path = entry
                .map_err(|e| SzamlaError::Locale(format!("cannot read {}: {e}", dir.display())))?
                .path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                continue;
            }
            let Some(locale) = path.file_stem().and_then(|stem| stem.to_str()) else {
                tracing::warn!("Skipping locale file with non UTF-8 name: {:?}", path);
                continue;
            };
            let json = std::fs::read_to_string(&path)
                .map_err(|e| SzamlaError::Locale(format!("cannot read {}: {e}", path.display())))?;
            let table = LocaleTable::from_json_str(&json)
                .map_err(|e| SzamlaError::Locale(format!("{}: {e}", path.display())))?;
            tracing::debug!(locale, keys = table.len(), "Loaded locale table");
            self.insert(locale, table);
            loaded += 1;
        }
        Ok(loaded)
    }

    /// Table of an already lowercased locale code.
    pub fn get(&self, locale: &str) -> Option<&LocaleTable> {
        self.tables.get(locale)
    }

    pub fn contains_locale(&self, locale: &str) -> bool {
        self.tables.contains_key(&locale.to_lowercase())
    }

    /// Supported locale codes, sorted.
    pub fn locales(&self) -> Vec<&str> {
        let mut locales: Vec<&str> = self.tables.keys().map(String::as_str).collect();
        locales.sort_unstable();
        locales
    }
}
