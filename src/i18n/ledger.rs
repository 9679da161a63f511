use std::collections::{BTreeMap, BTreeSet};

/// Translation keys observed missing, per locale.
///
/// Each (locale, key) pair is stored once. The persisted form maps every
/// locale to an object of keys with empty placeholder values, ready to be
/// filled in by a translator:
///
/// ```json
/// { "de": { "invoice": "", "supplier": "" } }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ledger {
    entries: BTreeMap<String, BTreeSet<String>>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a miss. Returns `false` if the pair was already present.
    pub fn insert(&mut self, locale: &str, key: &str) -> bool {
        if self.contains(locale, key) {
            return false;
        }
        self.entries
            .entry(locale.to_string())
            .or_default()
            .insert(key.to_string())
    }

    pub fn contains(&self, locale: &str, key: &str) -> bool {
        self.entries
            .get(locale)
            .is_some_and(|keys| keys.contains(key))
    }

    /// Total number of recorded pairs.
    pub fn len(&self) -> usize {
        self.entries.values().map(BTreeSet::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.values().all(BTreeSet::is_empty)
    }

    pub fn locales(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Missing keys of `locale`, sorted.
    pub fn keys(&self, locale: &str) -> impl Iterator<Item = &str> {
        self.entries
            .get(locale)
            .into_iter()
            .flat_map(|keys| keys.iter().map(String::as_str))
    }

    /// Pretty-printed persisted form.
    pub fn to_json_string(&self) -> Result<String, serde_json::Error> {
        let document: BTreeMap<&str, BTreeMap<&str, &str>> = self
            .entries
            .iter()
            .map(|(locale, keys)| {
                (
                    locale.as_str(),
                    keys.iter().map(|key| (key.as_str(), "")).collect(),
                )
            })
            .collect();
        serde_json::to_string_pretty(&document)
    }

    /// Parse the persisted form. Placeholder values are ignored, so a file
    /// where someone already filled in translations still loads.
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        let document: BTreeMap<String, BTreeMap<String, serde_json::Value>> =
            serde_json::from_str(json)?;
        Ok(Self {
            entries: document
                .into_iter()
                .map(|(locale, keys)| (locale, keys.into_keys().collect()))
                .collect(),
        })
    }
}
