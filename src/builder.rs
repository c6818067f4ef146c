use std::path::PathBuf;

use tracing::debug;

use crate::config::Tiercfg;
use crate::document::parse_file;
use crate::env::{EnvLookup, NoEnv, ProcessEnv};
use crate::error::TiercfgError;
use crate::file;
use crate::store::SectionStore;
use crate::types::{ConfigEntries, ConfigEntry, SearchPath};

pub const DEFAULT_BASE_FILE_NAME: &str = "base_config.ini";
pub const DEFAULT_LOCAL_FILE_NAME: &str = "local_config.ini";

/// Where one file layer comes from.
#[derive(Debug, Clone, PartialEq)]
enum LayerSource {
    /// Look for the layer's file name along the search paths.
    Discover,
    Path(PathBuf),
    Entries(Vec<ConfigEntry>),
}

/// Builder for loading a layered [`Tiercfg`].
///
/// Each file layer (base and local) is taken from exactly one of:
///
/// - **Discovery** (default): the first of the [`search_paths()`](Self::search_paths)
///   containing the layer's file name.
/// - **An explicit file**: [`base_path()`](Self::base_path) / [`local_path()`](Self::local_path).
/// - **Entries**: [`base_entries()`](Self::base_entries) / [`local_entries()`](Self::local_entries),
///   or both at once via [`entries()`](Self::entries).
///
/// The environment layer reads the process environment unless replaced with
/// [`env()`](Self::env) or disabled with [`no_env()`](Self::no_env).
pub struct TiercfgBuilder {
    key_prefix: String,
    base_file_name: Option<String>,
    local_file_name: Option<String>,
    search_paths: Option<Vec<SearchPath>>,
    base: LayerSource,
    local: LayerSource,
    env: Option<Box<dyn EnvLookup>>,
    env_enabled: bool,
}

impl TiercfgBuilder {
    pub(crate) fn new() -> Self {
        Self {
            key_prefix: String::new(),
            base_file_name: None,
            local_file_name: None,
            search_paths: None,
            base: LayerSource::Discover,
            local: LayerSource::Discover,
            env: None,
            env_enabled: true,
        }
    }

    /// Prefix applied to every key name before lookup (default: none).
    pub fn key_prefix(mut self, prefix: &str) -> Self {
        self.key_prefix = prefix.to_uppercase();
        self
    }

    /// Override the base file name (default: `"base_config.ini"`).
    pub fn base_file_name(mut self, name: &str) -> Self {
        self.base_file_name = Some(name.to_string());
        self
    }

    /// Override the local file name (default: `"local_config.ini"`).
    pub fn local_file_name(mut self, name: &str) -> Self {
        self.local_file_name = Some(name.to_string());
        self
    }

    /// Replace the default search paths entirely.
    ///
    /// Paths are searched in order and the **first** directory holding the file
    /// wins. See [`SearchPath`] for the available variants.
    pub fn search_paths(mut self, paths: Vec<SearchPath>) -> Self {
        self.search_paths = Some(paths);
        self
    }

    /// Append a search path, starting from the defaults if none were set.
    pub fn add_search_path(mut self, path: SearchPath) -> Self {
        self.search_paths
            .get_or_insert_with(SearchPath::defaults)
            .push(path);
        self
    }

    /// Parse the base layer from this file instead of discovering it.
    pub fn base_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.base = LayerSource::Path(path.into());
        self
    }

    /// Parse the local layer from this file instead of discovering it.
    pub fn local_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.local = LayerSource::Path(path.into());
        self
    }

    pub fn base_entries(mut self, entries: Vec<ConfigEntry>) -> Self {
        self.base = LayerSource::Entries(entries);
        self
    }

    pub fn local_entries(mut self, entries: Vec<ConfigEntry>) -> Self {
        self.local = LayerSource::Entries(entries);
        self
    }

    /// Take both file layers from an entry set.
    pub fn entries(self, entries: ConfigEntries) -> Self {
        self.base_entries(entries.base_configs)
            .local_entries(entries.local_configs)
    }

    /// Replace the process environment with another variable source.
    pub fn env(mut self, env: impl EnvLookup + 'static) -> Self {
        self.env = Some(Box::new(env));
        self.env_enabled = true;
        self
    }

    /// Disable the environment layer.
    pub fn no_env(mut self) -> Self {
        self.env_enabled = false;
        self
    }

    fn effective_base_file_name(&self) -> &str {
        self.base_file_name
            .as_deref()
            .unwrap_or(DEFAULT_BASE_FILE_NAME)
    }

    fn effective_local_file_name(&self) -> &str {
        self.local_file_name
            .as_deref()
            .unwrap_or(DEFAULT_LOCAL_FILE_NAME)
    }

    fn effective_search_paths(&self) -> Vec<SearchPath> {
        if let Some(paths) = &self.search_paths {
            return paths.clone();
        }
        SearchPath::defaults()
    }

    /// Load both file layers and assemble the configuration.
    pub fn load(self) -> Result<Tiercfg, TiercfgError> {
        let search_paths = self.effective_search_paths();
        let base = load_layer(&self.base, &search_paths, self.effective_base_file_name())?;
        let local = load_layer(&self.local, &search_paths, self.effective_local_file_name())?;

        let env: Box<dyn EnvLookup> = match (self.env_enabled, self.env) {
            (false, _) => Box::new(NoEnv),
            (true, Some(env)) => env,
            (true, None) => Box::new(ProcessEnv),
        };

        debug!(
            base = ?base.origin(),
            local = ?local.origin(),
            env = self.env_enabled,
            key_prefix = %self.key_prefix,
            "configuration loaded"
        );
        Ok(Tiercfg::from_boxed(env, local, base).with_key_prefix(&self.key_prefix))
    }
}

fn load_layer(
    source: &LayerSource,
    search_paths: &[SearchPath],
    file_name: &str,
) -> Result<SectionStore, TiercfgError> {
    match source {
        LayerSource::Discover => match file::discover(search_paths, file_name)? {
            Some(path) => parse_file(&path),
            None => {
                debug!(file_name, "no config file found");
                Ok(SectionStore::empty())
            }
        },
        LayerSource::Path(path) => parse_file(path),
        LayerSource::Entries(entries) => Ok(SectionStore::from_entries(entries)),
    }
}
