//! Layered INI configuration with placeholder expansion.
//!
//! Tiercfg resolves configuration keys across three sources (the process
//! environment, a machine-local file and a shared base file) and expands
//! references to other keys inside values before handing you a typed result.
//!
//! ```ignore
//! use tiercfg::{Lookup, Tiercfg};
//!
//! let config = Tiercfg::builder().load()?;
//! let port = config.int_or("PORT", 8080);
//! let hosts = config.strings("dev::HOSTS", ",")?;
//! ```
//!
//! That single `load()` looks for `base_config.ini` and `local_config.ini` in
//! the working directory, the executable's directory and their ancestors,
//! parses whatever it finds, and reads the environment on every lookup.
//!
//! # Layer precedence
//!
//! ```text
//! Base file          base_config.ini, shared defaults
//!        ↑ overridden by
//! Local file         local_config.ini, machine-specific
//!        ↑ overridden by
//! Environment vars   KEY, or KEY_SECTION for SECTION::KEY
//! ```
//!
//! The first layer holding a key wins. Layers are sparse: a local file only
//! lists what it changes, and values are never combined across layers.
//!
//! # Document format
//!
//! ```text
//! # comments start with '#' or ';'
//! APP_NAME = my-app
//! GREETING = "hello\nworld"
//! include "shared.ini"
//!
//! [dev]
//! HOST = localhost
//! ```
//!
//! Section and key names are case-insensitive. Keys before the first section
//! header live in the `DEFAULT` section and are addressed without a qualifier;
//! anything else is `SECTION::KEY`. A value loses one pair of surrounding
//! quotes, and `\n` becomes a newline (`\\n` keeps a literal `\n`). The
//! `include` directive merges another file in place, resolved relative to the
//! including file. Any other line without `=` fails the whole load with its
//! line number.
//!
//! Comments directly above a section header or a key are kept and can be read
//! back with [`SectionStore::section_comment`] and [`SectionStore::key_comment`].
//!
//! # Key normalization
//!
//! Every lookup tries up to two keys. With `APP_NAME = my-app` in any layer,
//! `MY_APP_PORT` is tried first as written, then as the generic `PORT`. This
//! lets several applications share one base file while each overrides the
//! keys it cares about. [`Tiercfg::local_key`] goes the other way, and
//! [`key_prefix()`](TiercfgBuilder::key_prefix) adds a prefix to every key.
//!
//! # Placeholders
//!
//! | Form | Meaning |
//! |------|---------|
//! | `${KEY}` | the value of `KEY` |
//! | `$[KEY]` | one copy of the surrounding value per item of the list `KEY` |
//! | `$${KEY}`, `$$[KEY]` | the literal text `${KEY}`, `$[KEY]` |
//!
//! With `HOSTS = a,b` and `PORTS = 1,2`, `URL = $[HOSTS]:$[PORTS]` reads as
//! `a:1,a:2,b:1,b:2`. References are expanded recursively, at most ten
//! times; a value still changing after that (`A = ${A}`) is reported as not
//! found, as is a value referring to a missing key.
//!
//! # Typed access
//!
//! The [`Lookup`] trait gives every source the same accessors, each in three
//! forms: `get_value::<T>` distinguishes absent from invalid, `value::<T>` and
//! the named accessors (`int`, `bool`, `duration`, ...) treat absence as an
//! error, and the `*_or` forms fall back on any error. Booleans accept the
//! usual spellings (`true`, `yes`, `on`, `1`, ...) and durations use unit
//! strings such as `300ms` or `1h30m`.
//!
//! [`Lookup`] is implemented by [`Tiercfg`] (layered and expanded) and by a
//! single [`SectionStore`] (raw values only).
//!
//! # Discovery
//!
//! [`search_paths()`](TiercfgBuilder::search_paths) takes [`SearchPath`]
//! variants searched in order, and each layer uses the **first** directory
//! containing its file. Missing files give an empty layer; a directory with
//! the file's name is an error. Skip discovery per layer with
//! [`base_path()`](TiercfgBuilder::base_path) or feed values directly with
//! [`entries()`](TiercfgBuilder::entries), for example from a
//! [`ConfigEntries`] JSON payload.
//!
//! # Error handling
//!
//! All fallible operations return [`TiercfgError`]. Parse errors carry the file
//! and line; lookup errors name the key. See the [`error`] module.

pub mod error;
pub mod types;

mod builder;
mod config;
mod document;
mod env;
mod expand;
mod file;
mod key;
mod lookup;
pub(crate) mod merge;
mod resolve;
mod store;
mod value;

#[cfg(test)]
mod fixtures;

pub use builder::{DEFAULT_BASE_FILE_NAME, DEFAULT_LOCAL_FILE_NAME, TiercfgBuilder};
pub use config::Tiercfg;
pub use document::{parse_file, parse_str};
pub use env::{EnvLookup, NoEnv, ProcessEnv, StaticEnv};
pub use error::TiercfgError;
pub use expand::MAX_EXPANSION_PASSES;
pub use key::KeyCandidates;
pub use lookup::Lookup;
pub use store::{Section, SectionStore};
pub use types::{ConfigEntries, ConfigEntry, SearchPath};
pub use value::{DEFAULT_LIST_SEPARATOR, FromValue, parse_bool};
