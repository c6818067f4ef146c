//! Placeholder expansion inside configuration values.
//!
//! Two reference forms are recognized:
//!
//! - `${KEY}` is replaced by the raw value of `KEY`.
//! - `$[KEY]` splits the fully resolved value of `KEY` on commas. The string is
//!   expanded once per combination of values across every distinct `$[...]`
//!   reference, and the results are joined back with commas, so
//!   `x_$[C]` with `C = a,b` becomes `x_a,x_b`.
//!
//! A `$` directly in front of a reference makes it literal: `$${KEY}` and
//! `$$[KEY]` survive substitution and lose one `$` once nothing else in the
//! value is left to expand.
//!
//! A single [`expand_once`] call runs three passes in order: scalar
//! substitution, multi-value expansion, then escape unwrapping. Unwrapping only
//! happens on a call where neither substitution pass matched anything. [`expand`]
//! repeats calls until one reports no expansion, giving up after
//! [`MAX_EXPANSION_PASSES`].

use std::ops::Range;
use std::sync::LazyLock;

use regex::{Captures, Regex};
use tracing::trace;

use crate::error::TiercfgError;
use crate::value::DEFAULT_LIST_SEPARATOR;

/// Upper bound on re-expansion of a single value.
pub const MAX_EXPANSION_PASSES: usize = 10;

static SCALAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{(.+?)\}").expect("scalar placeholder pattern"));
static MULTI: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\[(.+?)\]").expect("multi placeholder pattern"));
static ESCAPED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$\$\{(.+?)\}|\$\$\[(.+?)\]").expect("escaped placeholder pattern")
});

/// How expansion looks up the keys referenced from a value.
pub trait Resolve {
    /// Raw, unexpanded value for a `${KEY}` reference.
    fn resolve_scalar(&self, key: &str) -> Option<String>;

    /// Fully expanded values for a `$[KEY]` reference.
    fn resolve_list(&self, key: &str) -> Result<Vec<String>, TiercfgError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaceholderKind {
    Scalar,
    Multi,
}

/// One reference found in a value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholder<'a> {
    pub kind: PlaceholderKind,
    pub span: Range<usize>,
    /// The full reference text, e.g. `$[HOSTS]`.
    pub token: &'a str,
    /// The referenced key, trimmed.
    pub key: &'a str,
    /// Preceded by `$`, so literal.
    pub escaped: bool,
}

/// Find all non-overlapping references of `kind`, left to right.
pub fn scan(text: &str, kind: PlaceholderKind) -> Vec<Placeholder<'_>> {
    let pattern = match kind {
        PlaceholderKind::Scalar => &*SCALAR,
        PlaceholderKind::Multi => &*MULTI,
    };
    pattern
        .captures_iter(text)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let inner = caps.get(1)?;
            Some(Placeholder {
                kind,
                span: whole.range(),
                token: whole.as_str(),
                key: inner.as_str().trim(),
                escaped: preceded_by_dollar(text, whole.start()),
            })
        })
        .collect()
}

/// Result of one expansion call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expansion {
    pub value: String,
    /// A genuine (non-escaped) reference was substituted.
    pub expanded: bool,
}

/// Run the scalar, multi-value and escape passes once over `value`.
pub fn expand_once<R: Resolve + ?Sized>(
    value: &str,
    resolver: &R,
) -> Result<Expansion, TiercfgError> {
    let (scalars_done, scalar_hit) = substitute_scalars(value, resolver)?;
    let (multis_done, multi_hit) = expand_multi(&scalars_done, resolver)?;

    if scalar_hit || multi_hit {
        return Ok(Expansion {
            value: multis_done,
            expanded: true,
        });
    }

    Ok(Expansion {
        value: unwrap_escapes(&multis_done),
        expanded: false,
    })
}

/// Expand `raw` (the value of `key`) until it stops changing.
///
/// Fails with [`TiercfgError::KeyNotFound`] naming `key` when the value is
/// still expanding after [`MAX_EXPANSION_PASSES`] calls, which is how cyclic
/// references surface.
pub fn expand<R: Resolve + ?Sized>(
    key: &str,
    raw: String,
    resolver: &R,
) -> Result<String, TiercfgError> {
    let mut value = raw;
    for pass in 0..MAX_EXPANSION_PASSES {
        let step = expand_once(&value, resolver)?;
        trace!(key, pass, expanded = step.expanded, "expansion pass");
        if !step.expanded {
            return Ok(step.value);
        }
        value = step.value;
    }
    Err(TiercfgError::KeyNotFound(key.to_string()))
}

fn substitute_scalars<R: Resolve + ?Sized>(
    value: &str,
    resolver: &R,
) -> Result<(String, bool), TiercfgError> {
    let mut out = String::with_capacity(value.len());
    let mut cursor = 0;
    let mut hit = false;

    for placeholder in scan(value, PlaceholderKind::Scalar) {
        out.push_str(&value[cursor..placeholder.span.start]);
        cursor = placeholder.span.end;

        if placeholder.escaped {
            out.push_str(placeholder.token);
            continue;
        }

        hit = true;
        let resolved = resolver
            .resolve_scalar(placeholder.key)
            .ok_or_else(|| TiercfgError::KeyNotFound(placeholder.key.to_string()))?;
        out.push_str(&resolved);
    }
    out.push_str(&value[cursor..]);

    Ok((out, hit))
}

fn expand_multi<R: Resolve + ?Sized>(
    value: &str,
    resolver: &R,
) -> Result<(String, bool), TiercfgError> {
    // Distinct tokens in order of first appearance.
    let mut groups: Vec<(&str, Vec<String>)> = Vec::new();

    for placeholder in scan(value, PlaceholderKind::Multi) {
        if placeholder.escaped || groups.iter().any(|(token, _)| *token == placeholder.token) {
            continue;
        }
        let values = resolver.resolve_list(placeholder.key)?;
        groups.push((placeholder.token, values));
    }

    if groups.is_empty() {
        return Ok((value.to_string(), false));
    }

    let mut candidates = vec![value.to_string()];
    for (token, values) in &groups {
        candidates = candidates
            .iter()
            .flat_map(|candidate| {
                values
                    .iter()
                    .map(move |v| replace_unescaped(candidate, token, v))
            })
            .collect();
    }

    Ok((candidates.join(DEFAULT_LIST_SEPARATOR), true))
}

/// Replace every literal occurrence of `token` not preceded by `$`.
fn replace_unescaped(haystack: &str, token: &str, replacement: &str) -> String {
    let mut out = String::with_capacity(haystack.len());
    let mut cursor = 0;

    while let Some(offset) = haystack[cursor..].find(token) {
        let start = cursor + offset;
        out.push_str(&haystack[cursor..start]);
        if preceded_by_dollar(haystack, start) {
            out.push_str(token);
        } else {
            out.push_str(replacement);
        }
        cursor = start + token.len();
    }
    out.push_str(&haystack[cursor..]);
    out
}

/// `$${KEY}` becomes `${KEY}` and `$$[KEY]` becomes `$[KEY]`.
fn unwrap_escapes(value: &str) -> String {
    ESCAPED
        .replace_all(value, |caps: &Captures| caps[0][1..].to_string())
        .into_owned()
}

fn preceded_by_dollar(text: &str, start: usize) -> bool {
    start > 0 && text.as_bytes()[start - 1] == b'$'
}
