//! Version bump classes understood by the version tool
//!
//! The set mirrors the bump kinds of PEP 440 aware tools such as `uv version --bump`:
//! release segments (major, minor, patch), `stable` to drop pre-release markers,
//! and the pre/post/dev qualifiers.

use crate::error::{ReleaseError, Result};
use std::fmt;
use std::str::FromStr;

/// A named category of version increment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BumpClass {
    Major,
    Minor,
    Patch,
    /// Strip pre-release qualifiers (e.g. 1.3.0rc2 -> 1.3.0)
    Stable,
    Alpha,
    Beta,
    /// Release candidate
    Rc,
    Post,
    Dev,
}

impl BumpClass {
    /// All bump classes, in the order they are offered to the operator
    pub const ALL: [BumpClass; 9] = [
        BumpClass::Major,
        BumpClass::Minor,
        BumpClass::Patch,
        BumpClass::Stable,
        BumpClass::Alpha,
        BumpClass::Beta,
        BumpClass::Rc,
        BumpClass::Post,
        BumpClass::Dev,
    ];

    /// The token passed to the version tool
    pub fn as_str(&self) -> &'static str {
        match self {
            BumpClass::Major => "major",
            BumpClass::Minor => "minor",
            BumpClass::Patch => "patch",
            BumpClass::Stable => "stable",
            BumpClass::Alpha => "alpha",
            BumpClass::Beta => "beta",
            BumpClass::Rc => "rc",
            BumpClass::Post => "post",
            BumpClass::Dev => "dev",
        }
    }

    /// Parse operator input
    ///
    /// Only an exact token match is accepted; no trimming of inner text, no aliases
    /// and no case folding. Surrounding whitespace from a terminal line is removed.
    pub fn parse(input: &str) -> Result<Self> {
        input.trim_end_matches(['\r', '\n']).parse()
    }

    /// Space separated list used in prompts
    pub fn choices() -> String {
        BumpClass::ALL
            .iter()
            .map(|b| b.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl FromStr for BumpClass {
    type Err = ReleaseError;

    fn from_str(s: &str) -> Result<Self> {
        BumpClass::ALL
            .iter()
            .copied()
            .find(|b| b.as_str() == s)
            .ok_or_else(|| ReleaseError::InvalidBumpClass(s.to_string()))
    }
}

impl fmt::Display for BumpClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
