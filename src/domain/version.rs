use crate::error::{ReleaseError, Result};
use regex::Regex;
use std::fmt;
use std::sync::OnceLock;

/// A version string as reported by the version tool (e.g. "1.2.4", "2.0.0rc1", "1.0.post2")
///
/// The tool owns version arithmetic; this type only guarantees the string is
/// non-empty and shaped like a release number so it can be used in a tag name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseVersion(String);

fn version_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(
            r"^[0-9]+(\.[0-9]+)*((a|b|rc|alpha|beta)[0-9]*)?(\.?post[0-9]*)?(\.?dev[0-9]*)?(\+[A-Za-z0-9.]+)?$",
        )
        .expect("version pattern is valid")
    })
}

impl ReleaseVersion {
    /// Parse tool output, taking the last non-empty line
    pub fn parse(output: &str) -> Result<Self> {
        let candidate = output
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .last()
            .ok_or_else(|| ReleaseError::EmptyVersion("version tool printed nothing".into()))?;

        if !version_pattern().is_match(candidate) {
            return Err(ReleaseError::EmptyVersion(format!(
                "'{}' is not a version number",
                candidate
            )));
        }

        Ok(ReleaseVersion(candidate.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ReleaseVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
