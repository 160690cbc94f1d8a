use crate::domain::prerelease::PreRelease;
use crate::error::{ChroniqError, Result};
use regex::Regex;
use std::fmt;
use std::str::FromStr;

const VERSION_PATTERN: &str =
    r"^(0|[1-9][0-9]*)\.(0|[1-9][0-9]*)\.(0|[1-9][0-9]*)(?:-([0-9A-Za-z\-.]+))?$";

/// Semantic version representation: MAJOR.MINOR.PATCH[-PRERELEASE]
///
/// An empty `prerelease` means a plain release.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Version {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
    pub prerelease: String,
}

impl Default for Version {
    fn default() -> Self {
        Version::new(0, 1, 0)
    }
}

impl Version {
    /// Create a release version with no pre-release suffix
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        Version {
            major,
            minor,
            patch,
            prerelease: String::new(),
        }
    }

    /// Attach a pre-release suffix
    pub fn with_prerelease(mut self, prerelease: impl Into<String>) -> Self {
        self.prerelease = prerelease.into();
        self
    }

    /// Parse the strict textual form.
    ///
    /// Surrounding whitespace is not trimmed here; callers that read from
    /// storage trim first. Leading zeros, extra or missing components and
    /// trailing newlines are all rejected with `InvalidFormat`.
    pub fn parse(text: &str) -> Result<Self> {
        let re = Regex::new(VERSION_PATTERN).map_err(|_| ChroniqError::invalid_format(text))?;
        let captures = re
            .captures(text)
            .ok_or_else(|| ChroniqError::invalid_format(text))?;

        let component = |index: usize| -> Result<u64> {
            captures
                .get(index)
                .and_then(|m| m.as_str().parse::<u64>().ok())
                .ok_or_else(|| ChroniqError::invalid_format(text))
        };

        Ok(Version {
            major: component(1)?,
            minor: component(2)?,
            patch: component(3)?,
            prerelease: captures
                .get(4)
                .map(|m| m.as_str().to_string())
                .unwrap_or_default(),
        })
    }

    pub fn is_prerelease(&self) -> bool {
        !self.prerelease.is_empty()
    }

    /// Label of a `label.N` pre-release, if the current suffix has that shape
    pub fn prerelease_label(&self) -> Option<String> {
        PreRelease::parse(&self.prerelease).map(|pr| pr.label)
    }

    /// Increment the patch component
    ///
    /// Fails with `Overflow` (leaving the version unchanged) when patch is
    /// already `u64::MAX`.
    pub fn bump_patch(&mut self) -> Result<()> {
        let patch = increment(self.patch, self)?;
        self.patch = patch;
        self.prerelease.clear();
        Ok(())
    }

    pub fn bump_minor(&mut self) -> Result<()> {
        let minor = increment(self.minor, self)?;
        self.minor = minor;
        self.patch = 0;
        self.prerelease.clear();
        Ok(())
    }

    pub fn bump_major(&mut self) -> Result<()> {
        let major = increment(self.major, self)?;
        self.major = major;
        self.minor = 0;
        self.patch = 0;
        self.prerelease.clear();
        Ok(())
    }

    /// Advance the pre-release for `label`: `alpha.1` -> `alpha.2`, anything
    /// else -> `label.1`. Major, minor and patch are never touched.
    pub fn bump_prerelease(&mut self, label: &str) -> Result<()> {
        let next = PreRelease::next(&self.prerelease, label)?;
        self.prerelease = next.to_string();
        Ok(())
    }

    /// Apply a release-level bump
    pub fn bump(&mut self, bump_type: VersionBump) -> Result<()> {
        match bump_type {
            VersionBump::Major => self.bump_major(),
            VersionBump::Minor => self.bump_minor(),
            VersionBump::Patch => self.bump_patch(),
        }
    }
}

fn increment(component: u64, version: &Version) -> Result<u64> {
    component
        .checked_add(1)
        .ok_or_else(|| ChroniqError::Overflow(version.to_string()))
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)?;
        if !self.prerelease.is_empty() {
            write!(f, "-{}", self.prerelease)?;
        }
        Ok(())
    }
}

impl FromStr for Version {
    type Err = ChroniqError;

    fn from_str(s: &str) -> Result<Self> {
        Version::parse(s)
    }
}

/// Release-level bump
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionBump {
    Major,
    Minor,
    Patch,
}

impl FromStr for VersionBump {
    type Err = ChroniqError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "major" => Ok(VersionBump::Major),
            "minor" => Ok(VersionBump::Minor),
            "patch" => Ok(VersionBump::Patch),
            _ => Err(ChroniqError::InvalidBumpLevel(s.to_string())),
        }
    }
}

impl fmt::Display for VersionBump {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VersionBump::Major => write!(f, "major"),
            VersionBump::Minor => write!(f, "minor"),
            VersionBump::Patch => write!(f, "patch"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_version() {
        assert_eq!(Version::default().to_string(), "0.1.0");
    }

    #[test]
    fn test_version_parse() {
        let v = Version::parse("3.5.9").unwrap();
        assert_eq!((v.major, v.minor, v.patch), (3, 5, 9));
        assert!(!v.is_prerelease());
    }

    #[test]
    fn test_version_parse_prerelease() {
        let v = Version::parse("1.0.0-rc.1").unwrap();
        assert_eq!(v, Version::new(1, 0, 0).with_prerelease("rc.1"));
        assert_eq!(v.prerelease_label().as_deref(), Some("rc"));
    }

    #[test]
    fn test_version_parse_zero_components() {
        assert_eq!(Version::parse("0.0.0").unwrap(), Version::new(0, 0, 0));
        assert_eq!(Version::parse("10.20.30").unwrap(), Version::new(10, 20, 30));
    }

    #[test]
    fn test_version_parse_invalid() {
        let rejected = [
            "", "v1", "1.2", "1.2.3.4", "1..3", "a.b.c", "1.2.beta", "1.2.-1", "1.2.3\n",
            "01.02.03", " 1.2.3", "1.2.3 ", "1. 2.3", "1.2.3-", "1.2.3-al pha", "1.2.3-a_b",
        ];
        for text in rejected {
            match Version::parse(text) {
                Err(ChroniqError::InvalidFormat(carried)) => assert_eq!(carried, text),
                other => panic!("expected InvalidFormat for {:?}, got {:?}", text, other),
            }
        }
    }

    #[test]
    fn test_version_parse_overflow_is_invalid() {
        assert!(Version::parse("99999999999999999999.0.0").is_err());
    }

    #[test]
    fn test_version_round_trip() {
        let components = [0, 1, 9, 10, 99, 200, 1 << 32, u64::MAX - 1, u64::MAX];
        for &major in &components {
            for &minor in &components {
                for &patch in &components {
                    let v = Version::new(major, minor, patch);
                    assert_eq!(Version::parse(&v.to_string()).unwrap(), v);
                }
            }
        }
        let v = Version::new(4, 0, 1).with_prerelease("beta.2");
        assert_eq!(Version::parse(&v.to_string()).unwrap(), v);
    }

    #[test]
    fn test_parse_u64_max_components() {
        let v = Version::parse("18446744073709551615.18446744073709551615.18446744073709551615")
            .unwrap();
        assert_eq!(v, Version::new(u64::MAX, u64::MAX, u64::MAX));
        assert!(Version::parse("1.2.18446744073709551616").is_err());
    }

    #[test]
    fn test_bump_at_u64_max_overflows() {
        let mut v = Version::parse("1.2.18446744073709551615").unwrap();
        assert!(matches!(v.bump_patch(), Err(ChroniqError::Overflow(_))));
        assert_eq!(v, Version::new(1, 2, u64::MAX));

        let mut v = Version::new(1, u64::MAX, 7).with_prerelease("rc.1");
        assert!(matches!(v.bump(VersionBump::Minor), Err(ChroniqError::Overflow(_))));
        assert_eq!(v.to_string(), "1.18446744073709551615.7-rc.1");

        let mut v = Version::new(u64::MAX, 0, 0);
        assert!(matches!(v.bump_major(), Err(ChroniqError::Overflow(_))));
        assert_eq!(v.major, u64::MAX);
    }

    #[test]
    fn test_bump_just_below_max() {
        let mut v = Version::new(u64::MAX - 1, 3, 4);
        v.bump_major().unwrap();
        assert_eq!(v, Version::new(u64::MAX, 0, 0));

        let mut v = Version::new(u64::MAX, u64::MAX, 0);
        v.bump_patch().unwrap();
        assert_eq!(v, Version::new(u64::MAX, u64::MAX, 1));
    }

    #[test]
    fn test_bump_prerelease_counter_overflow() {
        let mut v = Version::parse("1.2.3-alpha.18446744073709551615").unwrap();
        assert!(matches!(v.bump_prerelease("alpha"), Err(ChroniqError::Overflow(_))));
        assert_eq!(v.prerelease, "alpha.18446744073709551615");

        v.bump_prerelease("beta").unwrap();
        assert_eq!(v.to_string(), "1.2.3-beta.1");
    }

    #[test]
    fn test_bump_patch() {
        let mut v = Version::new(1, 2, 3);
        v.bump_patch().unwrap();
        assert_eq!(v.to_string(), "1.2.4");
    }

    #[test]
    fn test_bump_minor() {
        let mut v = Version::new(1, 2, 3);
        v.bump_minor().unwrap();
        assert_eq!(v.to_string(), "1.3.0");
    }

    #[test]
    fn test_bump_major() {
        let mut v = Version::new(1, 2, 3);
        v.bump_major().unwrap();
        assert_eq!(v.to_string(), "2.0.0");
    }

    #[test]
    fn test_release_bumps_clear_prerelease() {
        let mut v = Version::new(1, 2, 3).with_prerelease("alpha.2");
        v.bump(VersionBump::Patch).unwrap();
        assert_eq!(v.to_string(), "1.2.4");
    }

    #[test]
    fn test_bump_prerelease_initial() {
        let mut v = Version::new(1, 2, 3);
        v.bump_prerelease("alpha").unwrap();
        assert_eq!(v.to_string(), "1.2.3-alpha.1");
    }

    #[test]
    fn test_bump_prerelease_same_label() {
        let mut v = Version::new(1, 2, 3).with_prerelease("alpha.1");
        v.bump_prerelease("alpha").unwrap();
        assert_eq!(v.to_string(), "1.2.3-alpha.2");
    }

    #[test]
    fn test_bump_prerelease_different_label() {
        let mut v = Version::new(1, 2, 3).with_prerelease("alpha.4");
        v.bump_prerelease("beta").unwrap();
        assert_eq!(v.to_string(), "1.2.3-beta.1");
    }

    #[test]
    fn test_bump_prerelease_empty_label() {
        let mut v = Version::new(1, 0, 0).with_prerelease("alpha.1");
        assert!(matches!(v.bump_prerelease(""), Err(ChroniqError::EmptyLabel)));
        assert_eq!(v.to_string(), "1.0.0-alpha.1");
    }

    #[test]
    fn test_version_bump_from_str() {
        assert_eq!("Minor".parse::<VersionBump>().unwrap(), VersionBump::Minor);
        assert!(matches!(
            "huge".parse::<VersionBump>(),
            Err(ChroniqError::InvalidBumpLevel(_))
        ));
    }
}
