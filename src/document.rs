//! Parser for the INI-like document format.
//!
//! ```text
//! # comment lines start with '#' or ';' and attach to the next section or key
//! APP_NAME = my-app
//! GREETING = "hello\nworld"        ; value is unquoted, \n becomes a newline
//! include "shared.ini"             ; merged in place, relative to this file
//!
//! [dev]
//! HOST = localhost
//! ```
//!
//! Section and key names are upper-cased. Keys before the first section header
//! land in the default section. A non-blank, non-comment line that is neither a
//! section header, an assignment, nor a well-formed `include "path"` directive
//! fails the whole document.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::TiercfgError;
use crate::key::DEFAULT_SECTION;
use crate::merge::merge_include;
use crate::store::{SectionStore, StoreBuilder, unquote};

const BOM: char = '\u{feff}';
const INCLUDE_DIRECTIVE: &str = "include";
const INLINE_ORIGIN: &str = "<inline>";

/// Parse the file at `path`. Relative includes resolve against its directory.
pub fn parse_file(path: &Path) -> Result<SectionStore, TiercfgError> {
    let mut stack = Vec::new();
    let builder = parse_file_into(path, &mut stack)?;
    Ok(builder.build(Some(path.to_path_buf())))
}

/// Parse in-memory text. Relative includes resolve against `dir`.
pub fn parse_str(dir: &Path, text: &str) -> Result<SectionStore, TiercfgError> {
    let mut stack = Vec::new();
    let builder = parse_text(dir, Path::new(INLINE_ORIGIN), text, &mut stack)?;
    Ok(builder.build(None))
}

/// `stack` holds the files currently being parsed, outermost first.
fn parse_file_into(path: &Path, stack: &mut Vec<PathBuf>) -> Result<StoreBuilder, TiercfgError> {
    let identity = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
    if stack.contains(&identity) {
        return Err(TiercfgError::IncludeCycle {
            path: path.to_path_buf(),
        });
    }

    let text = std::fs::read_to_string(path).map_err(|e| TiercfgError::IoError {
        path: path.to_path_buf(),
        source: e,
    })?;
    let dir = path.parent().unwrap_or_else(|| Path::new(""));

    stack.push(identity);
    let result = parse_text(dir, path, &text, stack);
    stack.pop();

    let builder = result?;
    debug!(
        path = %path.display(),
        sections = builder.tables.sections.len(),
        "parsed config document"
    );
    Ok(builder)
}

fn parse_text(
    dir: &Path,
    origin: &Path,
    text: &str,
    stack: &mut Vec<PathBuf>,
) -> Result<StoreBuilder, TiercfgError> {
    let text = text.strip_prefix(BOM).unwrap_or(text);

    let mut builder = StoreBuilder::new();
    let mut section = DEFAULT_SECTION.to_string();
    let mut comment = String::new();

    for (index, raw) in text.split('\n').enumerate() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }

        if let Some(body) = comment_body(line) {
            if !comment.is_empty() {
                comment.push('\n');
            }
            comment.push_str(body);
            continue;
        }

        if line.len() >= 2 && line.starts_with('[') && line.ends_with(']') {
            section = line[1..line.len() - 1].to_uppercase();
            if !comment.is_empty() {
                builder.set_section_comment(&section, std::mem::take(&mut comment));
            }
            builder.ensure_section(&section);
            continue;
        }

        builder.ensure_section(&section);

        let Some((key, value)) = line.split_once('=') else {
            if let Some(include) = include_target(dir, line) {
                debug!(
                    from = %origin.display(),
                    include = %include.display(),
                    "merging included document"
                );
                let included = parse_file_into(&include, stack)?;
                merge_include(&mut builder, included.tables);
                continue;
            }
            return Err(TiercfgError::Format {
                path: origin.to_path_buf(),
                line: index + 1,
                content: line.to_string(),
            });
        };

        let key = key.trim().to_uppercase();
        let value = unescape_newlines(unquote(value.trim()));
        builder.insert(&section, &key, value);

        if !comment.is_empty() {
            builder.set_key_comment(&section, &key, std::mem::take(&mut comment));
        }
    }

    Ok(builder)
}

/// Comment text with its leading run of `#` or `;` removed.
fn comment_body(line: &str) -> Option<&str> {
    if line.starts_with('#') {
        Some(line.trim_start_matches('#'))
    } else if line.starts_with(';') {
        Some(line.trim_start_matches(';'))
    } else {
        None
    }
}

/// Recognize `include "path"` with exactly one argument. Anything else is not
/// an include, and falls through to the malformed-line error.
fn include_target(dir: &Path, line: &str) -> Option<PathBuf> {
    if !line.starts_with(INCLUDE_DIRECTIVE) {
        return None;
    }
    let fields: Vec<&str> = line.split_whitespace().collect();
    let [INCLUDE_DIRECTIVE, target] = fields.as_slice() else {
        return None;
    };
    let target = Path::new(target.trim_matches('"'));
    if target.is_absolute() {
        Some(target.to_path_buf())
    } else {
        Some(dir.join(target))
    }
}

/// Turn `\n` into a newline while keeping `\\n` as a literal `\n`.
fn unescape_newlines(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut rest = value;
    while let Some(pos) = rest.find('\\') {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos..];
        if let Some(after) = tail.strip_prefix("\\\\n") {
            out.push_str("\\n");
            rest = after;
        } else if let Some(after) = tail.strip_prefix("\\n") {
            out.push('\n');
            rest = after;
        } else {
            out.push('\\');
            rest = &tail[1..];
        }
    }
    out.push_str(rest);
    out
}
