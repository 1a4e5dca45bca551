//! Reader for `.properties` filter files.
//!
//! Supports the line-oriented key/value format: `#` and `!` comments,
//! `=`, `:` or whitespace separators, backslash line continuations, and
//! the `\t`, `\n`, `\r`, `\f` and `\uXXXX` escapes.

use super::error::{ResourceError, Result};
use camino::Utf8Path;
use std::collections::BTreeMap;

/// Load every key/value pair from a properties file.
///
/// # Errors
///
/// Returns [`ResourceError::FilterFile`] when the file cannot be read.
pub fn load_properties(path: &Utf8Path) -> Result<BTreeMap<String, String>> {
    let text = std::fs::read_to_string(path).map_err(|source| ResourceError::FilterFile {
        path: path.to_owned(),
        source,
    })?;
    Ok(parse_properties(&text))
}

/// Parse properties text. Later keys replace earlier ones.
#[must_use]
pub fn parse_properties(text: &str) -> BTreeMap<String, String> {
    let mut values = BTreeMap::new();
    for logical in logical_lines(text) {
        let (key, value) = split_entry(&logical);
        if !key.is_empty() {
            values.insert(unescape(key), unescape(value));
        }
    }
    values
}

/// Join continuation lines and drop blanks and comments.
fn logical_lines(text: &str) -> Vec<String> {
    let mut lines = Vec::new();
    let mut pending: Option<String> = None;

    for raw in text.lines() {
        let trimmed = raw.trim_start();
        let mut current = match pending.take() {
            Some(mut joined) => {
                joined.push_str(trimmed);
                joined
            }
            None => {
                if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with('!') {
                    continue;
                }
                trimmed.to_owned()
            }
        };

        if ends_with_continuation(&current) {
            current.pop();
            pending = Some(current);
        } else {
            lines.push(current);
        }
    }

    if let Some(rest) = pending {
        lines.push(rest);
    }
    lines
}

/// A line continues when it ends in an odd number of backslashes.
fn ends_with_continuation(line: &str) -> bool {
    line.chars().rev().take_while(|&c| c == '\\').count() % 2 == 1
}

/// Split a logical line at its first unescaped separator.
fn split_entry(line: &str) -> (&str, &str) {
    let mut escaped = false;
    for (idx, ch) in line.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match ch {
            '\\' => escaped = true,
            '=' | ':' | ' ' | '\t' | '\u{c}' => {
                let key = line.get(..idx).unwrap_or_default();
                let rest = line.get(idx..).unwrap_or_default();
                return (key, strip_separator(rest));
            }
            _ => {}
        }
    }
    (line, "")
}

/// Drop whitespace around at most one `=` or `:` separator.
fn strip_separator(rest: &str) -> &str {
    let trimmed = rest.trim_start_matches([' ', '\t', '\u{c}']);
    trimmed
        .strip_prefix(['=', ':'])
        .map_or(trimmed, |value| value.trim_start_matches([' ', '\t', '\u{c}']))
}

fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        match chars.next() {
            Some('t') => out.push('\t'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('f') => out.push('\u{c}'),
            Some('u') => {
                let hex: String = chars.by_ref().take(4).collect();
                match u32::from_str_radix(&hex, 16).ok().and_then(char::from_u32) {
                    Some(decoded) => out.push(decoded),
                    None => {
                        out.push('u');
                        out.push_str(&hex);
                    }
                }
            }
            Some(other) => out.push(other),
            None => {}
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::equals("name=value", "name", "value")]
    #[case::colon("name: value", "name", "value")]
    #[case::whitespace("name   value", "name", "value")]
    #[case::padded_equals("name = value ", "name", "value ")]
    #[case::empty_value("name=", "name", "")]
    #[case::bare_key("name", "name", "")]
    #[case::escaped_separator(r"a\=b=c", "a=b", "c")]
    #[case::unicode_escape(r"greeting=caf\u00e9", "greeting", "café")]
    #[case::tab_escape(r"cols=a\tb", "cols", "a\tb")]
    fn parses_single_entries(#[case] text: &str, #[case] key: &str, #[case] value: &str) {
        let values = parse_properties(text);
        assert_eq!(values.get(key).map(String::as_str), Some(value));
    }

    #[test]
    fn skips_comments_and_blank_lines() {
        let values = parse_properties("# comment\n! also comment\n\n  key=value\n");
        assert_eq!(values.len(), 1);
        assert_eq!(values.get("key").map(String::as_str), Some("value"));
    }

    #[test]
    fn joins_continuation_lines() {
        let values = parse_properties("list=one, \\\n     two, \\\n     three\n");
        assert_eq!(
            values.get("list").map(String::as_str),
            Some("one, two, three")
        );
    }

    #[test]
    fn even_backslashes_do_not_continue() {
        let values = parse_properties("path=C:\\\\\nnext=1\n");
        assert_eq!(values.get("path").map(String::as_str), Some("C:\\"));
        assert_eq!(values.get("next").map(String::as_str), Some("1"));
    }

    #[test]
    fn later_keys_win() {
        let values = parse_properties("k=1\nk=2\n");
        assert_eq!(values.get("k").map(String::as_str), Some("2"));
    }

    #[test]
    fn load_reports_missing_file() {
        let err = load_properties(Utf8Path::new("/definitely/not/here.properties"))
            .expect_err("missing file");
        assert!(matches!(err, ResourceError::FilterFile { .. }));
    }
}
