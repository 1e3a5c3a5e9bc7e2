//! Semantic version parsing and ordering
//!
//! Only `major.minor.patch` takes part in comparisons. Pre-release and build
//! metadata (`1.2.3-beta`, `1.2.3+abc`) are accepted and ignored, and so are
//! the attached PEP 440 tags Azure CLI extensions use (`1.0.0b1`, `2.1.0rc2`).

use std::fmt;
use std::str::FromStr;

use crate::error::{BastionError, Result};

/// A `major.minor.patch` version ordered by standard precedence
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Version {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
}

impl Version {
    pub const fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    /// Parse a version marker such as `1.4.0`, `v1.4.0` or `1.4`
    pub fn parse(input: &str) -> Result<Self> {
        let invalid = || BastionError::InvalidVersion {
            input: input.to_string(),
        };

        let trimmed = input.trim();
        let trimmed = trimmed
            .strip_prefix('v')
            .or_else(|| trimmed.strip_prefix('V'))
            .unwrap_or(trimmed);
        let core = trimmed.split(['-', '+']).next().unwrap_or(trimmed);
        let core = without_attached_tag(core);

        let parts = core
            .split('.')
            .map(|part| part.parse::<u64>().map_err(|_| invalid()))
            .collect::<Result<Vec<_>>>()?;

        match parts.as_slice() {
            [major, minor] => Ok(Self::new(*major, *minor, 0)),
            [major, minor, patch] => Ok(Self::new(*major, *minor, *patch)),
            _ => Err(invalid()),
        }
    }

    /// Version this binary was built as
    pub fn current() -> Self {
        Self::parse(env!("CARGO_PKG_VERSION")).unwrap_or(Self::new(0, 0, 0))
    }
}

/// Strip a pre-release tag glued to the last number, as in `1.0.0b1`
fn without_attached_tag(core: &str) -> &str {
    match core.find(|c: char| c.is_ascii_alphabetic()) {
        Some(at)
            if core[..at].ends_with(|c: char| c.is_ascii_digit()) && !core[at..].contains('.') =>
        {
            &core[..at]
        }
        _ => core,
    }
}

impl FromStr for Version {
    type Err = BastionError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}
