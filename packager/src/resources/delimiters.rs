//! Expression delimiter specifications.
//!
//! A specification is either `begin*end`, where `*` marks the expression,
//! or a single token used both to open and close, such as `@`.

use super::error::{ResourceError, Result};

/// Delimiters enabled when `use_default_delimiters` is set.
pub const DEFAULT_DELIMITERS: [&str; 2] = ["${*}", "@"];

/// A begin/end token pair surrounding an expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delimiter {
    begin: String,
    end: String,
}

impl Delimiter {
    /// Parse a delimiter specification.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::InvalidDelimiter`] for empty specifications
    /// and for `begin*end` forms with an empty side.
    ///
    /// # Examples
    ///
    /// ```
    /// use rar_packager::resources::delimiters::Delimiter;
    ///
    /// let dollar = Delimiter::parse("${*}").unwrap();
    /// assert_eq!((dollar.begin(), dollar.end()), ("${", "}"));
    ///
    /// let at = Delimiter::parse("@").unwrap();
    /// assert_eq!((at.begin(), at.end()), ("@", "@"));
    /// ```
    pub fn parse(spec: &str) -> Result<Self> {
        let invalid = |reason| ResourceError::InvalidDelimiter {
            value: spec.to_owned(),
            reason,
        };

        if spec.is_empty() {
            return Err(invalid("delimiter must not be empty"));
        }

        match spec.split_once('*') {
            Some((begin, end)) => {
                if begin.is_empty() || end.is_empty() {
                    return Err(invalid("both sides of '*' must be non-empty"));
                }
                Ok(Self {
                    begin: begin.to_owned(),
                    end: end.to_owned(),
                })
            }
            None => Ok(Self {
                begin: spec.to_owned(),
                end: spec.to_owned(),
            }),
        }
    }

    /// Token opening an expression.
    #[must_use]
    pub fn begin(&self) -> &str {
        &self.begin
    }

    /// Token closing an expression.
    #[must_use]
    pub fn end(&self) -> &str {
        &self.end
    }
}

/// Build the active delimiter list.
///
/// The defaults come first when enabled, or when no custom specification
/// is given; custom specifications follow in configuration order and
/// duplicates are dropped.
///
/// # Errors
///
/// Returns [`ResourceError::InvalidDelimiter`] when any custom
/// specification is malformed.
pub fn resolve_delimiters(custom: &[String], use_defaults: bool) -> Result<Vec<Delimiter>> {
    let use_defaults = use_defaults || custom.is_empty();
    let defaults = DEFAULT_DELIMITERS
        .iter()
        .copied()
        .filter(|_| use_defaults);
    let mut resolved: Vec<Delimiter> = Vec::new();
    for spec in defaults.chain(custom.iter().map(String::as_str)) {
        let delimiter = Delimiter::parse(spec)?;
        if !resolved.contains(&delimiter) {
            resolved.push(delimiter);
        }
    }
    Ok(resolved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::dollar_brace("${*}", "${", "}")]
    #[case::at("@", "@", "@")]
    #[case::double_brace("{{*}}", "{{", "}}")]
    fn parses_specifications(#[case] spec: &str, #[case] begin: &str, #[case] end: &str) {
        let delimiter = Delimiter::parse(spec).expect("valid delimiter");
        assert_eq!(delimiter.begin(), begin);
        assert_eq!(delimiter.end(), end);
    }

    #[rstest]
    #[case::empty("")]
    #[case::star_only("*")]
    #[case::missing_end("${*")]
    #[case::missing_begin("*}")]
    fn rejects_malformed_specifications(#[case] spec: &str) {
        let err = Delimiter::parse(spec).expect_err("invalid delimiter");
        assert!(matches!(err, ResourceError::InvalidDelimiter { .. }));
    }

    #[test]
    fn defaults_precede_custom_delimiters() {
        let resolved =
            resolve_delimiters(&["{{*}}".to_owned(), "@".to_owned()], true).expect("valid");
        let begins: Vec<&str> = resolved.iter().map(Delimiter::begin).collect();
        assert_eq!(begins, ["${", "@", "{{"]);
    }

    #[test]
    fn defaults_can_be_disabled() {
        let resolved = resolve_delimiters(&["{{*}}".to_owned()], false).expect("valid");
        assert_eq!(resolved.len(), 1);
    }

    #[test]
    fn empty_custom_set_falls_back_to_defaults() {
        let resolved = resolve_delimiters(&[], false).expect("valid");
        assert_eq!(resolved.len(), DEFAULT_DELIMITERS.len());
    }
}
