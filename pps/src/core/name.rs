//! Validated project names.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::{StarterError, StarterResult};

static NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z_][a-z0-9_]*$").expect("project name regex"));

/// A project name that is safe to use as a directory and a Python package.
///
/// The package identifier is derived from the same value, so the two can never
/// drift apart.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProjectName(String);

impl ProjectName {
    pub fn parse(raw: &str) -> StarterResult<Self> {
        let reason = if raw.is_empty() {
            Some("name must not be empty")
        } else if raw.starts_with(|c: char| c.is_ascii_digit()) {
            Some("name must not start with a digit")
        } else if raw.chars().any(char::is_whitespace) {
            Some("name must not contain whitespace")
        } else if raw.chars().any(|c| c.is_ascii_uppercase()) {
            Some("use lowercase letters (e.g. my_project)")
        } else if !NAME_RE.is_match(raw) {
            Some("only lowercase letters, digits and underscores are allowed")
        } else {
            None
        };
        match reason {
            Some(reason) => Err(StarterError::InvalidName {
                name: raw.to_string(),
                reason,
            }),
            None => Ok(Self(raw.to_string())),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Name of the importable package under `src/`.
    pub fn package_identifier(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProjectName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_lowercase_with_underscores() {
        for raw in ["sample_app", "app2", "_private", "a"] {
            let name = ProjectName::parse(raw).expect("valid name");
            assert_eq!(name.as_str(), raw);
            assert_eq!(name.package_identifier(), raw);
        }
    }

    #[test]
    fn rejects_invalid_names_with_reason() {
        let cases = [
            ("", "empty"),
            ("1app", "digit"),
            ("MyApp", "lowercase"),
            ("my app", "whitespace"),
            ("my-app", "only lowercase"),
            ("café", "only lowercase"),
        ];
        for (raw, fragment) in cases {
            let err = ProjectName::parse(raw).expect_err("invalid name");
            assert!(
                matches!(err, StarterError::InvalidName { .. }),
                "unexpected error for {raw:?}: {err}"
            );
            assert!(
                err.to_string().contains(fragment),
                "{raw:?}: '{err}' should mention '{fragment}'"
            );
        }
    }
}
