//! Typed accessors shared by every value source.
//!
//! Each type comes in three flavors:
//!
//! - [`get_value`](Lookup::get_value): `Ok(None)` when the key is absent, `Err`
//!   when the value is present but unusable.
//! - [`value`](Lookup::value) and the named accessors (`int`, `duration`, ...):
//!   absence is [`TiercfgError::KeyNotFound`].
//! - `*_or`: never fails; any error yields the fallback.

use std::time::Duration;

use crate::error::TiercfgError;
use crate::store::SectionStore;
use crate::value::{FromValue, split_list};

pub trait Lookup {
    /// The final string for `key`, or `None` if no source has it.
    fn fetch(&self, key: &str) -> Result<Option<String>, TiercfgError>;

    fn get_value<T: FromValue>(&self, key: &str) -> Result<Option<T>, TiercfgError> {
        let Some(raw) = self.fetch(key)? else {
            return Ok(None);
        };
        T::from_value(&raw)
            .map(Some)
            .map_err(|reason| TiercfgError::InvalidValue {
                key: key.to_string(),
                reason,
            })
    }

    fn value<T: FromValue>(&self, key: &str) -> Result<T, TiercfgError> {
        self.get_value(key)?
            .ok_or_else(|| TiercfgError::KeyNotFound(key.to_string()))
    }

    fn value_or<T: FromValue>(&self, key: &str, fallback: T) -> T {
        self.value(key).unwrap_or(fallback)
    }

    /// Split the value of `key` on `sep`.
    fn get_strings(&self, key: &str, sep: &str) -> Result<Option<Vec<String>>, TiercfgError> {
        Ok(self.fetch(key)?.map(|raw| split_list(&raw, sep)))
    }

    fn strings(&self, key: &str, sep: &str) -> Result<Vec<String>, TiercfgError> {
        self.get_strings(key, sep)?
            .ok_or_else(|| TiercfgError::KeyNotFound(key.to_string()))
    }

    fn strings_or(&self, key: &str, sep: &str, fallback: Vec<String>) -> Vec<String> {
        self.strings(key, sep).unwrap_or(fallback)
    }

    fn string(&self, key: &str) -> Result<String, TiercfgError> {
        self.value(key)
    }

    fn string_or(&self, key: &str, fallback: &str) -> String {
        self.value_or(key, fallback.to_string())
    }

    fn bool(&self, key: &str) -> Result<bool, TiercfgError> {
        self.value(key)
    }

    fn bool_or(&self, key: &str, fallback: bool) -> bool {
        self.value_or(key, fallback)
    }

    fn int(&self, key: &str) -> Result<i32, TiercfgError> {
        self.value(key)
    }

    fn int_or(&self, key: &str, fallback: i32) -> i32 {
        self.value_or(key, fallback)
    }

    fn int64(&self, key: &str) -> Result<i64, TiercfgError> {
        self.value(key)
    }

    fn int64_or(&self, key: &str, fallback: i64) -> i64 {
        self.value_or(key, fallback)
    }

    fn float32(&self, key: &str) -> Result<f32, TiercfgError> {
        self.value(key)
    }

    fn float32_or(&self, key: &str, fallback: f32) -> f32 {
        self.value_or(key, fallback)
    }

    fn float64(&self, key: &str) -> Result<f64, TiercfgError> {
        self.value(key)
    }

    fn float64_or(&self, key: &str, fallback: f64) -> f64 {
        self.value_or(key, fallback)
    }

    fn duration(&self, key: &str) -> Result<Duration, TiercfgError> {
        self.value(key)
    }

    fn duration_or(&self, key: &str, fallback: Duration) -> Duration {
        self.value_or(key, fallback)
    }
}

/// A single store answers with its raw values: no layering, no expansion.
impl Lookup for SectionStore {
    fn fetch(&self, key: &str) -> Result<Option<String>, TiercfgError> {
        Ok(self.get(key))
    }
}
