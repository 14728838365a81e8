//! Changed-file path filtering
//!
//! Patterns are shell-style globs matched against whole paths (`*` and `?`
//! never cross a `/`). There is no recursive `**` and no `{a,b}`
//! alternation: `**` behaves like `*` and braces are literal. A pattern
//! also matches every path inside it when read as a directory, so `docs`
//! covers `docs/index.md`.

use crate::error::{ResourceError, Result};
use globset::{GlobBuilder, GlobMatcher};

const SEPARATOR: char = '/';

/// Whether `child` is `parent` or lies inside it
///
/// `/foo/bar` is inside `/foo`, `/foobar` is not. `/foo` is inside `/foo`,
/// but not inside `/foo/`.
pub fn is_inside_path(parent: &str, child: &str) -> bool {
    if parent == child {
        return true;
    }

    if parent.ends_with(SEPARATOR) {
        child.starts_with(parent)
    } else {
        child
            .strip_prefix(parent)
            .is_some_and(|rest| rest.starts_with(SEPARATOR))
    }
}

/// Files matching `pattern` as a glob or as a directory
pub fn filter_path(files: &[String], pattern: &str) -> Result<Vec<String>> {
    let glob = compile(pattern)?;
    Ok(files
        .iter()
        .filter(|file| glob.is_match(file.as_str()) || is_inside_path(pattern, file))
        .cloned()
        .collect())
}

/// Files matching `pattern` neither as a glob nor as a directory
pub fn filter_ignore_path(files: &[String], pattern: &str) -> Result<Vec<String>> {
    let glob = compile(pattern)?;
    Ok(files
        .iter()
        .filter(|file| !glob.is_match(file.as_str()) && !is_inside_path(pattern, file))
        .cloned()
        .collect())
}

fn compile(pattern: &str) -> Result<GlobMatcher> {
    GlobBuilder::new(&single_level(pattern))
        .literal_separator(true)
        .backslash_escape(true)
        .build()
        .map(|glob| glob.compile_matcher())
        .map_err(|source| ResourceError::Pattern {
            pattern: pattern.to_string(),
            source,
        })
}

/// Rewrite `pattern` so globset gives it plain shell semantics
///
/// Runs of `*` collapse to one and braces are escaped. Character classes
/// and existing escapes are copied untouched.
fn single_level(pattern: &str) -> String {
    let mut normalized = String::with_capacity(pattern.len());
    let mut chars = pattern.chars().peekable();
    let mut in_class = false;

    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                normalized.push(c);
                if let Some(escaped) = chars.next() {
                    normalized.push(escaped);
                }
            }
            _ if in_class => {
                if c == ']' {
                    in_class = false;
                }
                normalized.push(c);
            }
            '[' => {
                in_class = true;
                normalized.push(c);
                // A leading `]` (after an optional negation) is a literal member
                if let Some(&negation @ ('!' | '^')) = chars.peek() {
                    normalized.push(negation);
                    chars.next();
                }
                if let Some(&']') = chars.peek() {
                    normalized.push(']');
                    chars.next();
                }
            }
            '*' => {
                normalized.push('*');
                while chars.peek() == Some(&'*') {
                    chars.next();
                }
            }
            '{' | '}' => {
                normalized.push('\\');
                normalized.push(c);
            }
            _ => normalized.push(c),
        }
    }

    normalized
}
