//! The layered configuration object.
//!
//! [`Tiercfg`] ties the pieces together: a key is normalized into its
//! candidates, each candidate is resolved across the layers, and the raw hit is
//! expanded before the typed accessors of [`Lookup`] convert it.

use serde_json::json;

use crate::builder::TiercfgBuilder;
use crate::env::EnvLookup;
use crate::error::TiercfgError;
use crate::expand::{self, MAX_EXPANSION_PASSES, Resolve};
use crate::key::{self, APP_NAME_KEY, KeyCandidates};
use crate::lookup::Lookup;
use crate::resolve::Layers;
use crate::store::SectionStore;
use crate::value::{DEFAULT_LIST_SEPARATOR, split_list};

/// Configuration resolved from the environment, a local store and a base store.
///
/// Read access is `&self` throughout and the type is `Send + Sync`, so a loaded
/// configuration can be shared freely across threads.
#[derive(Debug)]
pub struct Tiercfg {
    layers: Layers,
    key_prefix: String,
}

impl Tiercfg {
    pub fn builder() -> TiercfgBuilder {
        TiercfgBuilder::new()
    }

    pub fn new(env: impl EnvLookup + 'static, local: SectionStore, base: SectionStore) -> Self {
        Self::from_boxed(Box::new(env), local, base)
    }

    pub(crate) fn from_boxed(
        env: Box<dyn EnvLookup>,
        local: SectionStore,
        base: SectionStore,
    ) -> Self {
        Self {
            layers: Layers::new(env, local, base),
            key_prefix: String::new(),
        }
    }

    /// Prefix applied to every key name before lookup.
    pub fn with_key_prefix(mut self, prefix: &str) -> Self {
        self.key_prefix = prefix.to_uppercase();
        self
    }

    pub fn key_prefix(&self) -> &str {
        &self.key_prefix
    }

    pub fn local(&self) -> &SectionStore {
        &self.layers.local
    }

    pub fn base(&self) -> &SectionStore {
        &self.layers.base
    }

    /// The value of `APP_NAME`, looked up directly without normalization.
    pub fn app_name(&self) -> Option<String> {
        self.layers
            .lookup(APP_NAME_KEY)
            .filter(|name| !name.is_empty())
    }

    /// The keys a lookup of `raw_key` tries, in order.
    pub fn candidates(&self, raw_key: &str) -> KeyCandidates {
        let app_prefix = self
            .app_name()
            .map(|name| key::app_prefix(&name))
            .unwrap_or_default();
        key::normalize(raw_key, &self.key_prefix, &app_prefix)
    }

    /// The unexpanded value of `raw_key`, or `None` if no layer has any of its
    /// candidates.
    pub fn raw(&self, raw_key: &str) -> Option<String> {
        self.candidates(raw_key)
            .iter()
            .find_map(|candidate| self.layers.lookup(candidate))
    }

    /// The application-specific spelling of a generic key: `PORT` becomes
    /// `MYAPP_PORT` when `APP_NAME = myapp`. Without an application name the
    /// key is returned unchanged.
    pub fn local_key(&self, raw_key: &str) -> String {
        match self.app_name() {
            Some(name) => key::localize(raw_key, &self.key_prefix, &key::app_prefix(&name)),
            None => raw_key.to_string(),
        }
    }

    /// Both file layers as pretty-printed JSON, for debugging.
    pub fn dump(&self) -> Result<String, TiercfgError> {
        let doc = json!({
            "base": self.layers.base.snapshot(),
            "local": self.layers.local.snapshot(),
        });
        Ok(serde_json::to_string_pretty(&doc)?)
    }

    fn expanded(&self, raw_key: &str, depth: usize) -> Result<Option<String>, TiercfgError> {
        let Some(raw) = self.raw(raw_key) else {
            return Ok(None);
        };
        let resolver = References { config: self, depth };
        expand::expand(raw_key, raw, &resolver).map(Some)
    }
}

impl Lookup for Tiercfg {
    fn fetch(&self, key: &str) -> Result<Option<String>, TiercfgError> {
        self.expanded(key, 0)
    }
}

/// Resolves the references inside one value. `$[KEY]` expands `KEY` in turn,
/// so nesting is bounded the same way as re-expansion.
struct References<'a> {
    config: &'a Tiercfg,
    depth: usize,
}

impl Resolve for References<'_> {
    fn resolve_scalar(&self, key: &str) -> Option<String> {
        self.config.raw(key)
    }

    fn resolve_list(&self, key: &str) -> Result<Vec<String>, TiercfgError> {
        if self.depth >= MAX_EXPANSION_PASSES {
            return Err(TiercfgError::KeyNotFound(key.to_string()));
        }
        let value = self
            .config
            .expanded(key, self.depth + 1)?
            .ok_or_else(|| TiercfgError::KeyNotFound(key.to_string()))?;
        Ok(split_list(&value, DEFAULT_LIST_SEPARATOR))
    }
}
