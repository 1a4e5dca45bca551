//! Property interpolation for filtered resources.
//!
//! Expressions found between any active [`Delimiter`] pair are replaced by
//! the matching value. Values are themselves interpolated up to
//! [`MAX_DEPTH`] levels; self-references and unknown names are left in the
//! text untouched.

use super::delimiters::Delimiter;
use std::collections::BTreeMap;

/// Maximum nesting depth when expanding values that contain expressions.
pub const MAX_DEPTH: usize = 10;

/// Prefix that exposes process environment variables to expressions.
pub const ENV_PREFIX: &str = "env.";

/// Replaces delimited expressions in text.
#[derive(Debug, Clone)]
pub struct Interpolator<'a> {
    delimiters: &'a [Delimiter],
    values: &'a BTreeMap<String, String>,
    escape_string: Option<&'a str>,
    multi_line: bool,
    escape_windows_paths: bool,
}

impl<'a> Interpolator<'a> {
    /// Create an interpolator over `values` using `delimiters` in order.
    #[must_use]
    pub const fn new(delimiters: &'a [Delimiter], values: &'a BTreeMap<String, String>) -> Self {
        Self {
            delimiters,
            values,
            escape_string: None,
            multi_line: false,
            escape_windows_paths: true,
        }
    }

    /// Treat `escape` followed by a begin token as a literal begin token.
    #[must_use]
    pub const fn with_escape_string(mut self, escape: Option<&'a str>) -> Self {
        self.escape_string = escape;
        self
    }

    /// Allow expressions to span line breaks.
    #[must_use]
    pub const fn with_multi_line(mut self, multi_line: bool) -> Self {
        self.multi_line = multi_line;
        self
    }

    /// Escape backslashes and colons in values that look like Windows paths.
    #[must_use]
    pub const fn with_escape_windows_paths(mut self, escape: bool) -> Self {
        self.escape_windows_paths = escape;
        self
    }

    /// Interpolate every expression in `text`.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::collections::BTreeMap;
    /// use rar_packager::resources::delimiters::resolve_delimiters;
    /// use rar_packager::resources::interpolation::Interpolator;
    ///
    /// let delimiters = resolve_delimiters(&[], true).unwrap();
    /// let values = BTreeMap::from([("name".to_owned(), "demo".to_owned())]);
    /// let out = Interpolator::new(&delimiters, &values).interpolate("${name} @name@ ${other}");
    /// assert_eq!(out, "demo demo ${other}");
    /// ```
    #[must_use]
    pub fn interpolate(&self, text: &str) -> String {
        let mut stack = Vec::new();
        self.interpolate_with(text, &mut stack)
    }

    fn interpolate_with(&self, text: &str, stack: &mut Vec<String>) -> String {
        let mut out = String::with_capacity(text.len());
        let mut rest = text;

        while !rest.is_empty() {
            if let Some(after) = self.strip_escaped(rest, &mut out) {
                rest = after;
                continue;
            }
            if let Some(after) = self.replace_expression(rest, stack, &mut out) {
                rest = after;
                continue;
            }
            let mut chars = rest.chars();
            if let Some(ch) = chars.next() {
                out.push(ch);
            }
            rest = chars.as_str();
        }
        out
    }

    /// Emit an escaped begin token literally and return the remaining text.
    fn strip_escaped<'t>(&self, rest: &'t str, out: &mut String) -> Option<&'t str> {
        let escape = self.escape_string.filter(|e| !e.is_empty())?;
        let after_escape = rest.strip_prefix(escape)?;
        let delimiter = self
            .delimiters
            .iter()
            .find(|d| after_escape.starts_with(d.begin()))?;
        out.push_str(delimiter.begin());
        after_escape.strip_prefix(delimiter.begin())
    }

    /// Replace a resolvable expression at the start of `rest`.
    fn replace_expression<'t>(
        &self,
        rest: &'t str,
        stack: &mut Vec<String>,
        out: &mut String,
    ) -> Option<&'t str> {
        for delimiter in self.delimiters {
            let Some(body) = rest.strip_prefix(delimiter.begin()) else {
                continue;
            };
            let Some(end_idx) = body.find(delimiter.end()) else {
                continue;
            };
            let Some(expression) = body.get(..end_idx) else {
                continue;
            };
            if expression.is_empty() || (!self.multi_line && expression.contains('\n')) {
                continue;
            }
            if let Some(value) = self.resolve(expression, stack) {
                out.push_str(&value);
                return body.get(end_idx + delimiter.end().len()..);
            }
        }
        None
    }

    fn resolve(&self, expression: &str, stack: &mut Vec<String>) -> Option<String> {
        if stack.len() >= MAX_DEPTH || stack.iter().any(|seen| seen == expression) {
            return None;
        }
        let raw = self.lookup(expression)?;

        stack.push(expression.to_owned());
        let expanded = self.interpolate_with(&raw, stack);
        stack.pop();

        Some(if self.escape_windows_paths {
            escape_windows_path(&expanded)
        } else {
            expanded
        })
    }

    fn lookup(&self, expression: &str) -> Option<String> {
        if let Some(value) = self.values.get(expression) {
            return Some(value.clone());
        }
        expression
            .strip_prefix(ENV_PREFIX)
            .and_then(|name| std::env::var(name).ok())
    }
}

/// Escape a value beginning with a drive prefix such as `C:\`.
///
/// Backslashes are doubled and colons are backslash-escaped so the value
/// survives a later properties-file read.
#[must_use]
pub fn escape_windows_path(value: &str) -> String {
    if value.get(1..3) != Some(":\\") {
        return value.to_owned();
    }
    value.replace('\\', "\\\\").replace(':', "\\:")
}
