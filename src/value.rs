//! Conversion of resolved strings into typed values.
//!
//! Every accessor funnels through [`FromValue`]. Conversions are strict: no
//! trimming, no unit guessing beyond what each type's grammar allows.

use std::time::Duration;

/// Separator used for list values and for joining multi-valued expansions.
pub const DEFAULT_LIST_SEPARATOR: &str = ",";

/// A type that can be parsed from a resolved configuration string.
pub trait FromValue: Sized {
    /// Parse `raw`, returning a human-readable reason on failure.
    fn from_value(raw: &str) -> Result<Self, String>;
}

impl FromValue for String {
    fn from_value(raw: &str) -> Result<Self, String> {
        Ok(raw.to_string())
    }
}

impl FromValue for bool {
    fn from_value(raw: &str) -> Result<Self, String> {
        parse_bool(raw)
    }
}

impl FromValue for Duration {
    fn from_value(raw: &str) -> Result<Self, String> {
        humantime::parse_duration(raw).map_err(|e| format!("parsing {raw:?}: {e}"))
    }
}

macro_rules! from_str_value {
    ($($ty:ty),*) => {
        $(
            impl FromValue for $ty {
                fn from_value(raw: &str) -> Result<Self, String> {
                    raw.parse::<$ty>().map_err(|e| format!("parsing {raw:?}: {e}"))
                }
            }
        )*
    };
}

from_str_value!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64);

/// Permissive boolean grammar.
///
/// Accepts the usual spellings of yes/no in lower, upper and title case, plus
/// the single-letter and numeric forms.
pub fn parse_bool(raw: &str) -> Result<bool, String> {
    match raw {
        "1" | "t" | "T" | "true" | "TRUE" | "True" | "YES" | "yes" | "Yes" | "Y" | "y" | "ON"
        | "on" | "On" => Ok(true),
        "0" | "f" | "F" | "false" | "FALSE" | "False" | "NO" | "no" | "No" | "N" | "n" | "OFF"
        | "off" | "Off" => Ok(false),
        _ => Err(format!("parsing {raw:?}: invalid syntax")),
    }
}

/// Split a list value on `sep`. An empty string yields a single empty item.
pub fn split_list(raw: &str, sep: &str) -> Vec<String> {
    raw.split(sep).map(str::to_string).collect()
}
