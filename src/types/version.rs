// ABOUTME: Parsed semantic version of a cert-manager release.
// ABOUTME: Accepts image tags like v1.14.4, 1.8, or v1.15.0-beta.1.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseVersionError {
    #[error("version cannot be empty")]
    Empty,

    #[error("invalid version component in {0:?}")]
    InvalidComponent(String),
}

/// A `major.minor.patch` version. Pre-release and build suffixes are
/// dropped; they never change which API a release serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ComponentVersion {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
}

impl ComponentVersion {
    pub const fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }
}

impl FromStr for ComponentVersion {
    type Err = ParseVersionError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let trimmed = input.trim();
        let unprefixed = trimmed
            .strip_prefix('v')
            .or_else(|| trimmed.strip_prefix('V'))
            .unwrap_or(trimmed);
        if unprefixed.is_empty() {
            return Err(ParseVersionError::Empty);
        }

        let core = unprefixed
            .split(['-', '+'])
            .next()
            .unwrap_or(unprefixed);

        let mut parts = core.split('.');
        let mut component = |required: bool| -> Result<u64, ParseVersionError> {
            match parts.next() {
                Some(p) => p
                    .parse()
                    .map_err(|_| ParseVersionError::InvalidComponent(input.to_string())),
                None if required => Err(ParseVersionError::InvalidComponent(input.to_string())),
                None => Ok(0),
            }
        };

        let major = component(true)?;
        let minor = component(true)?;
        let patch = component(false)?;

        if parts.next().is_some() {
            return Err(ParseVersionError::InvalidComponent(input.to_string()));
        }

        Ok(Self::new(major, minor, patch))
    }
}

impl Ord for ComponentVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.major, self.minor, self.patch).cmp(&(other.major, other.minor, other.patch))
    }
}

impl PartialOrd for ComponentVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for ComponentVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}.{}.{}", self.major, self.minor, self.patch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_prefixed_tag() {
        let v: ComponentVersion = "v1.14.4".parse().unwrap();
        assert_eq!(v, ComponentVersion::new(1, 14, 4));
    }

    #[test]
    fn parses_missing_patch() {
        let v: ComponentVersion = "1.8".parse().unwrap();
        assert_eq!(v, ComponentVersion::new(1, 8, 0));
    }

    #[test]
    fn drops_prerelease_suffix() {
        let v: ComponentVersion = "v1.15.0-beta.1".parse().unwrap();
        assert_eq!(v, ComponentVersion::new(1, 15, 0));
    }

    #[test]
    fn rejects_non_numeric_tags() {
        assert!("latest".parse::<ComponentVersion>().is_err());
        assert!("v1".parse::<ComponentVersion>().is_err());
        assert!("1.2.3.4".parse::<ComponentVersion>().is_err());
        assert_eq!("v".parse::<ComponentVersion>(), Err(ParseVersionError::Empty));
    }

    #[test]
    fn orders_numerically() {
        let old: ComponentVersion = "v0.9.1".parse().unwrap();
        let new: ComponentVersion = "v0.11.0".parse().unwrap();
        assert!(old < new);
    }
}
