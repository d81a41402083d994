use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// An immutable runtime version: major, minor, patch and an optional
/// qualifier such as `beta-2` or `SNAPSHOT`.
///
/// Ordering is lexicographic over (major, minor, patch); the qualifier only
/// breaks ties between versions whose numeric parts are equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Version {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
    pub qualifier: Option<String>,
}

impl Version {
    pub fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
            qualifier: None,
        }
    }

    pub fn with_qualifier(major: u32, minor: u32, patch: u32, qualifier: impl Into<String>) -> Self {
        Self {
            major,
            minor,
            patch,
            qualifier: Some(qualifier.into()),
        }
    }

    /// Parse strings like `1.7`, `2.0.5` or `2.1.0-beta-1`.
    ///
    /// Missing minor/patch segments default to zero; everything after the
    /// first `-` is the qualifier.
    pub fn parse(input: &str) -> Result<Self> {
        let input = input.trim();
        if input.is_empty() {
            return Err(Error::Other("empty version string".into()));
        }

        let (numeric, qualifier) = match input.split_once('-') {
            Some((n, q)) => (n, Some(q.to_string())),
            None => (input, None),
        };

        let mut parts = numeric.split('.');
        let mut next_part = |name: &str| -> Result<u32> {
            match parts.next() {
                None | Some("") => Ok(0),
                Some(p) => p
                    .parse::<u32>()
                    .map_err(|_| Error::Other(format!("invalid {name} segment in version '{input}'"))),
            }
        };

        let major = next_part("major")?;
        let minor = next_part("minor")?;
        let patch = next_part("patch")?;
        if parts.next().is_some() {
            return Err(Error::Other(format!("too many segments in version '{input}'")));
        }

        Ok(Self {
            major,
            minor,
            patch,
            qualifier,
        })
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.major, self.minor, self.patch)
            .cmp(&(other.major, other.minor, other.patch))
            .then_with(|| self.qualifier.cmp(&other.qualifier))
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)?;
        if let Some(q) = &self.qualifier {
            write!(f, "-{q}")?;
        }
        Ok(())
    }
}
