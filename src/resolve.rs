//! Layered lookup across environment, local and base sources.
//!
//! Precedence is fixed: environment, then the local store, then the base store.
//! The first layer holding the key wins outright; values are never combined
//! across layers.

use tracing::trace;

use crate::env::{self, EnvLookup};
use crate::store::SectionStore;

/// The three sources behind a configuration, highest priority first.
pub struct Layers {
    pub env: Box<dyn EnvLookup>,
    pub local: SectionStore,
    pub base: SectionStore,
}

impl Layers {
    pub fn new(env: Box<dyn EnvLookup>, local: SectionStore, base: SectionStore) -> Self {
        Self { env, local, base }
    }

    /// Resolve a normalized key (`KEY` or `SECTION::KEY`) to its raw value.
    /// `None` means no layer has it.
    pub fn lookup(&self, key: &str) -> Option<String> {
        if let Some(value) = self.env.lookup_env(&env::env_var_name(key)) {
            trace!(key, layer = "env", "resolved");
            return Some(value);
        }
        if let Some(value) = self.local.get(key) {
            trace!(key, layer = "local", "resolved");
            return Some(value);
        }
        if let Some(value) = self.base.get(key) {
            trace!(key, layer = "base", "resolved");
            return Some(value);
        }
        None
    }
}

impl std::fmt::Debug for Layers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Layers")
            .field("local", &self.local)
            .field("base", &self.base)
            .finish_non_exhaustive()
    }
}
