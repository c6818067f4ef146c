//! Key normalization.
//!
//! Keys are case-insensitive and take the form `KEY` or `SECTION::KEY`. Every
//! lookup produces up to two candidates: the key as written (after the global
//! prefix is applied), and a generic fallback with the application prefix
//! removed. A key such as `MYAPP_PORT` therefore resolves `MYAPP_PORT` first and
//! falls back to `PORT` when `APP_NAME = myapp`.

/// Section used for keys that carry no explicit `SECTION::` qualifier.
pub const DEFAULT_SECTION: &str = "DEFAULT";

/// Delimiter between a section and a key name.
pub const SECTION_SEPARATOR: &str = "::";

/// Well-known key holding the application name.
pub const APP_NAME_KEY: &str = "APP_NAME";

/// Split a key into its optional section and its name.
///
/// Only the first two `::`-separated parts are significant; `A::B::C` is
/// section `A`, key `B`.
pub fn split_key(key: &str) -> (Option<&str>, &str) {
    let mut parts = key.split(SECTION_SEPARATOR);
    let first = parts.next().unwrap_or_default();
    match parts.next() {
        Some(name) => (Some(first), name),
        None => (None, first),
    }
}

/// Derive the application prefix (`MY_APP_`) from an application name (`my-app`).
pub fn app_prefix(app_name: &str) -> String {
    format!("{}_", app_name.replace('-', "_").to_uppercase())
}

/// The ordered keys tried for a single lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyCandidates {
    pub original: String,
    pub base: String,
}

impl KeyCandidates {
    /// Candidates in lookup order. `base` is skipped when it equals `original`.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        let fallback = (self.base != self.original).then_some(self.base.as_str());
        std::iter::once(self.original.as_str()).chain(fallback)
    }
}

/// Normalize `raw` into its lookup candidates.
///
/// `key_prefix` is stripped from the key name if present and then re-applied, so
/// callers may pass keys with or without it. `app_prefix` is stripped only to
/// build the fallback candidate. Both prefixes are expected upper-cased.
pub fn normalize(raw: &str, key_prefix: &str, app_prefix: &str) -> KeyCandidates {
    let upper = raw.to_uppercase();
    let (section, name) = split_key(&upper);

    let key = name.strip_prefix(key_prefix).unwrap_or(name);
    let generic = key.strip_prefix(app_prefix).unwrap_or(key);

    KeyCandidates {
        original: qualify(section, key_prefix, key),
        base: qualify(section, key_prefix, generic),
    }
}

/// Rewrite a generic key into its application-specific form,
/// `[SECTION::]PREFIX` + `APP_` + `KEY`.
pub fn localize(raw: &str, key_prefix: &str, app_prefix: &str) -> String {
    let upper = raw.to_uppercase();
    let (section, name) = split_key(&upper);
    let key = name.strip_prefix(key_prefix).unwrap_or(name);
    qualify(section, key_prefix, &format!("{app_prefix}{key}"))
}

fn qualify(section: Option<&str>, key_prefix: &str, key: &str) -> String {
    match section {
        Some(section) => format!("{section}{SECTION_SEPARATOR}{key_prefix}{key}"),
        None => format!("{key_prefix}{key}"),
    }
}
