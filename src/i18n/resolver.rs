use std::sync::Arc;

use super::locale::{LocaleTable, LocaleTables};
use super::recorder::MissingKeyRecorder;

/// Locale-aware label lookup with key fallback.
///
/// A key missing from the locale's table (or any key of an unsupported
/// locale) resolves to the key itself and is reported to the recorder, if
/// one is attached.
#[derive(Debug, Clone)]
pub struct Resolver {
    tables: Arc<LocaleTables>,
    recorder: Option<Arc<MissingKeyRecorder>>,
}

impl Resolver {
    /// Resolver that only falls back; misses are not recorded.
    pub fn new(tables: Arc<LocaleTables>) -> Self {
        Self {
            tables,
            recorder: None,
        }
    }

    pub fn with_recorder(mut self, recorder: Arc<MissingKeyRecorder>) -> Self {
        self.recorder = Some(recorder);
        self
    }

    pub fn tables(&self) -> &LocaleTables {
        &self.tables
    }

    pub fn recorder(&self) -> Option<&Arc<MissingKeyRecorder>> {
        self.recorder.as_ref()
    }

    /// Resolve `key` for `locale` (compared lowercase).
    pub fn resolve(&self, locale: &str, key: &str) -> String {
        self.bind(locale).t(key)
    }

    /// Fix the locale for a series of lookups.
    pub fn bind(&self, locale: &str) -> Translator<'_> {
        let locale = locale.to_lowercase();
        Translator {
            table: self.tables.get(&locale),
            resolver: self,
            locale,
        }
    }
}

/// A [`Resolver`] bound to one locale.
#[derive(Debug, Clone)]
pub struct Translator<'a> {
    resolver: &'a Resolver,
    table: Option<&'a LocaleTable>,
    locale: String,
}

impl Translator<'_> {
    /// Lowercase locale code.
    pub fn locale(&self) -> &str {
        &self.locale
    }

    /// Whether a table exists for the locale.
    pub fn is_supported(&self) -> bool {
        self.table.is_some()
    }

    /// Translated label, or `key` itself when there is none.
    pub fn t(&self, key: &str) -> String {
        if let Some(label) = self.table.and_then(|table| table.get(key)) {
            return label.to_string();
        }
        tracing::debug!(locale = %self.locale, key, "Missing translation");
        if let Some(recorder) = &self.resolver.recorder {
            recorder.record(&self.locale, key);
        }
        key.to_string()
    }
}
