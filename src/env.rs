use std::collections::HashMap;

use crate::key::SECTION_SEPARATOR;

/// Source of environment variables.
///
/// The process environment is the default; tests and embedders can supply a
/// fixed map instead.
pub trait EnvLookup: Send + Sync {
    fn lookup_env(&self, name: &str) -> Option<String>;
}

/// Reads the real process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvLookup for ProcessEnv {
    fn lookup_env(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}

/// An environment layer that never matches.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoEnv;

impl EnvLookup for NoEnv {
    fn lookup_env(&self, _name: &str) -> Option<String> {
        None
    }
}

/// A fixed set of variables.
#[derive(Debug, Clone, Default)]
pub struct StaticEnv(HashMap<String, String>);

impl StaticEnv {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.0.insert(name.into(), value.into());
        self
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for StaticEnv {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl EnvLookup for StaticEnv {
    fn lookup_env(&self, name: &str) -> Option<String> {
        self.0.get(name).cloned()
    }
}

/// Map a config key to the variable name it is read from.
///
/// Environment variables have no sections, so `SECTION::KEY` is flattened to
/// `KEY_SECTION`. Plain keys are used as-is. Keys with more than one separator
/// are not flattened.
pub fn env_var_name(key: &str) -> String {
    let parts: Vec<&str> = key.split(SECTION_SEPARATOR).collect();
    match parts.as_slice() {
        [section, name] => format!("{name}_{section}"),
        _ => key.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_key_unchanged() {
        assert_eq!(env_var_name("HOST"), "HOST");
    }

    #[test]
    fn section_becomes_suffix() {
        assert_eq!(env_var_name("DEV::HOST"), "HOST_DEV");
    }

    #[test]
    fn extra_separators_left_alone() {
        assert_eq!(env_var_name("A::B::C"), "A::B::C");
    }

    #[test]
    fn static_env_lookup() {
        let env = StaticEnv::new().with("HOST", "0.0.0.0");
        assert_eq!(env.lookup_env("HOST").as_deref(), Some("0.0.0.0"));
        assert_eq!(env.lookup_env("host"), None);
    }

    #[test]
    fn static_env_from_pairs() {
        let env: StaticEnv = [("A", "1"), ("B", "2")].into_iter().collect();
        assert_eq!(env.lookup_env("B").as_deref(), Some("2"));
    }

    #[test]
    fn no_env_never_matches() {
        assert_eq!(NoEnv.lookup_env("PATH"), None);
    }

    #[test]
    fn process_env_reads_real_variables() {
        temp_env::with_var("TIERCFG_PROCESS_ENV_TEST", Some("yes"), || {
            assert_eq!(
                ProcessEnv.lookup_env("TIERCFG_PROCESS_ENV_TEST").as_deref(),
                Some("yes")
            );
        });
        assert_eq!(ProcessEnv.lookup_env("TIERCFG_PROCESS_ENV_TEST"), None);
    }
}
