//! The section store: a case-insensitive, section-scoped key/value table.
//!
//! Stores are assembled in two phases. A [`StoreBuilder`] is filled with
//! exclusive access while a document (and everything it includes) is parsed,
//! then frozen into a [`SectionStore`] that is shared by reference. The frozen
//! store keeps its tables behind a readers-writer lock, so concurrent lookups
//! never block each other and the rare runtime [`SectionStore::set`] is
//! serialized against all of them.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock, RwLockReadGuard};

use crate::error::TiercfgError;
use crate::key::{self, DEFAULT_SECTION};
use crate::types::ConfigEntry;

/// Key name to value, within one section.
pub type Section = BTreeMap<String, String>;

#[derive(Debug, Clone, Default)]
pub(crate) struct Tables {
    pub sections: BTreeMap<String, Section>,
    pub section_comments: BTreeMap<String, String>,
    pub key_comments: BTreeMap<String, String>,
}

impl Tables {
    fn section_mut(&mut self, name: &str) -> &mut Section {
        self.sections.entry(name.to_string()).or_default()
    }
}

/// Mutable store under construction.
#[derive(Debug, Default)]
pub struct StoreBuilder {
    pub(crate) tables: Tables,
}

impl StoreBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create `section` if it does not exist yet.
    pub fn ensure_section(&mut self, section: &str) {
        self.tables.section_mut(section);
    }

    /// Set `key` in `section`. Both names must already be normalized.
    pub fn insert(&mut self, section: &str, key: &str, value: String) {
        self.tables.section_mut(section).insert(key.to_string(), value);
    }

    pub fn set_section_comment(&mut self, section: &str, comment: String) {
        self.tables
            .section_comments
            .insert(section.to_string(), comment);
    }

    pub fn set_key_comment(&mut self, section: &str, key: &str, comment: String) {
        self.tables
            .key_comments
            .insert(comment_id(section, key), comment);
    }

    /// Freeze into a shareable store. `origin` is the file it was parsed from.
    pub fn build(self, origin: Option<PathBuf>) -> SectionStore {
        SectionStore {
            origin,
            tables: RwLock::new(self.tables),
        }
    }
}

/// Frozen, thread-safe section store.
#[derive(Debug, Default)]
pub struct SectionStore {
    origin: Option<PathBuf>,
    tables: RwLock<Tables>,
}

impl SectionStore {
    /// A store with no sections, used when a layer has no backing file.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a store from explicit entries, bypassing document parsing.
    ///
    /// Keys may be `KEY` or `SECTION::KEY`. Values are trimmed and unquoted the
    /// same way document values are. Later entries win.
    pub fn from_entries(entries: &[ConfigEntry]) -> Self {
        let mut builder = StoreBuilder::new();
        for entry in entries {
            let upper = entry.key.to_uppercase();
            let (section, name) = match key::split_key(&upper) {
                (Some(section), name) => (section.trim(), name.trim()),
                (None, name) => (DEFAULT_SECTION, name.trim()),
            };
            builder.insert(section, name, unquote(entry.value.trim()).to_string());
        }
        builder.build(None)
    }

    /// The file this store was parsed from, if any.
    pub fn origin(&self) -> Option<&Path> {
        self.origin.as_deref()
    }

    /// Look up `KEY` (default section) or `SECTION::KEY`, case-insensitively.
    pub fn get(&self, raw_key: &str) -> Option<String> {
        if raw_key.is_empty() {
            return None;
        }
        let upper = raw_key.to_uppercase();
        let (section, name) = key::split_key(&upper);
        let tables = self.read();
        tables
            .sections
            .get(section.unwrap_or(DEFAULT_SECTION))?
            .get(name)
            .cloned()
    }

    /// Override a single value at runtime.
    pub fn set(&self, raw_key: &str, value: &str) {
        let upper = raw_key.to_uppercase();
        let (section, name) = key::split_key(&upper);
        let mut tables = self.tables.write().unwrap_or_else(PoisonError::into_inner);
        tables
            .section_mut(section.unwrap_or(DEFAULT_SECTION))
            .insert(name.to_string(), value.to_string());
    }

    pub fn has_section(&self, name: &str) -> bool {
        self.read().sections.contains_key(&name.to_uppercase())
    }

    /// Section names in sorted order.
    pub fn section_names(&self) -> Vec<String> {
        self.read().sections.keys().cloned().collect()
    }

    /// A snapshot of one section's keys and values.
    pub fn section(&self, name: &str) -> Option<Section> {
        self.read().sections.get(&name.to_uppercase()).cloned()
    }

    /// The comment block written directly above `[name]`.
    pub fn section_comment(&self, name: &str) -> Option<String> {
        self.read()
            .section_comments
            .get(&name.to_uppercase())
            .cloned()
    }

    /// The comment block written directly above a key assignment.
    pub fn key_comment(&self, raw_key: &str) -> Option<String> {
        let upper = raw_key.to_uppercase();
        let (section, name) = key::split_key(&upper);
        self.read()
            .key_comments
            .get(&comment_id(section.unwrap_or(DEFAULT_SECTION), name))
            .cloned()
    }

    /// Total number of keys across all sections.
    pub fn len(&self) -> usize {
        self.read().sections.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// A copy of every section.
    pub fn snapshot(&self) -> BTreeMap<String, Section> {
        self.read().sections.clone()
    }

    /// Render all sections as a JSON object of objects.
    pub fn to_json(&self) -> Result<String, TiercfgError> {
        Ok(serde_json::to_string(&self.read().sections)?)
    }

    fn read(&self) -> RwLockReadGuard<'_, Tables> {
        self.tables.read().unwrap_or_else(PoisonError::into_inner)
    }
}

fn comment_id(section: &str, key: &str) -> String {
    format!("{section}.{key}")
}

/// Strip one pair of surrounding double quotes. A value that opens with a quote
/// but never closes it loses only the opening quote.
pub(crate) fn unquote(value: &str) -> &str {
    match value.strip_prefix('"') {
        Some(rest) => rest.strip_suffix('"').unwrap_or(rest),
        None => value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn sample() -> SectionStore {
        let mut b = StoreBuilder::new();
        b.insert(DEFAULT_SECTION, "HOST", "localhost".into());
        b.insert("DEV", "HOST", "dev.local".into());
        b.set_section_comment("DEV", " development overrides".into());
        b.set_key_comment("DEV", "HOST", " dev box".into());
        b.build(Some("/etc/app/base_config.ini".into()))
    }

    #[test]
    fn get_default_section() {
        let store = sample();
        assert_eq!(store.get("HOST").as_deref(), Some("localhost"));
        assert_eq!(store.get("host").as_deref(), Some("localhost"));
    }

    #[test]
    fn get_explicit_section() {
        let store = sample();
        assert_eq!(store.get("dev::host").as_deref(), Some("dev.local"));
        assert_eq!(store.get("DEFAULT::HOST").as_deref(), Some("localhost"));
    }

    #[test]
    fn missing_key_and_section() {
        let store = sample();
        assert_eq!(store.get("PORT"), None);
        assert_eq!(store.get("PROD::HOST"), None);
        assert_eq!(store.get(""), None);
    }

    #[test]
    fn comments_are_queryable() {
        let store = sample();
        assert_eq!(
            store.section_comment("dev").as_deref(),
            Some(" development overrides")
        );
        assert_eq!(store.key_comment("DEV::HOST").as_deref(), Some(" dev box"));
        assert_eq!(store.key_comment("HOST"), None);
    }

    #[test]
    fn set_overrides_value() {
        let store = sample();
        store.set("dev::port", "8080");
        assert_eq!(store.get("DEV::PORT").as_deref(), Some("8080"));
        store.set("HOST", "other");
        assert_eq!(store.get("HOST").as_deref(), Some("other"));
    }

    #[test]
    fn from_entries_normalizes_keys_and_quotes() {
        let store = SectionStore::from_entries(&[
            ConfigEntry::new("host", "  \"example.com\"  "),
            ConfigEntry::new(" dev :: port ", "9000"),
            ConfigEntry::new("host", "\"override\""),
        ]);
        assert_eq!(store.get("HOST").as_deref(), Some("override"));
        assert_eq!(store.get("DEV::PORT").as_deref(), Some("9000"));
        assert!(store.origin().is_none());
    }

    #[test]
    fn unquote_strips_one_pair() {
        assert_eq!(unquote("\"a\""), "a");
        assert_eq!(unquote("\"\"a\"\""), "\"a\"");
        assert_eq!(unquote("a\"b\"c"), "a\"b\"c");
        assert_eq!(unquote("\"open"), "open");
        assert_eq!(unquote("plain"), "plain");
    }

    #[test]
    fn len_counts_all_sections() {
        let store = sample();
        assert_eq!(store.len(), 2);
        assert!(!store.is_empty());
        assert!(SectionStore::empty().is_empty());
        assert_eq!(store.section_names(), vec!["DEFAULT", "DEV"]);
        assert!(store.has_section("dev"));
    }

    #[test]
    fn to_json_lists_sections() {
        let json = sample().to_json().unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed["DEV"]["HOST"], "dev.local");
        assert_eq!(parsed["DEFAULT"]["HOST"], "localhost");
    }

    #[test]
    fn concurrent_readers() {
        let store = Arc::new(sample());
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let store = Arc::clone(&store);
                std::thread::spawn(move || {
                    for _ in 0..100 {
                        assert_eq!(store.get("DEV::HOST").as_deref(), Some("dev.local"));
                    }
                    store.set(&format!("T{i}"), "x");
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(store.len(), 10);
    }
}
