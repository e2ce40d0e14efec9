use crate::domain::prerelease::PreReleaseTag;
use crate::error::{GitVersionError, Result};
use regex::Regex;
use std::cmp::Ordering;
use std::fmt;

/// Semantic version with optional pre-release tag and build metadata
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SemanticVersion {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
    pub pre_release: Option<PreReleaseTag>,
    pub build_metadata: Option<String>,
}

impl SemanticVersion {
    /// Create a new release version
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        SemanticVersion {
            major,
            minor,
            patch,
            pre_release: None,
            build_metadata: None,
        }
    }

    /// Attach a pre-release tag
    pub fn with_pre_release(mut self, tag: PreReleaseTag) -> Self {
        self.pre_release = Some(tag);
        self
    }

    /// Attach build metadata
    pub fn with_build_metadata(mut self, metadata: impl Into<String>) -> Self {
        self.build_metadata = Some(metadata.into());
        self
    }

    /// Parse a version string.
    ///
    /// Strict semver ("1.2.3-beta.1+5") is tried first; loose forms with
    /// missing components ("2.3", "4") are accepted with zeros filled in.
    /// Prefixes such as "v" are not handled here, see [`crate::domain::TagPattern`].
    pub fn parse(text: &str) -> Result<Self> {
        if let Ok(strict) = semver::Version::parse(text) {
            return Self::from_semver(&strict);
        }

        let captures = Regex::new(
            r"^(\d+)(?:\.(\d+))?(?:\.(\d+))?(?:-([0-9A-Za-z.-]+))?(?:\+([0-9A-Za-z.-]+))?$",
        )
        .ok()
        .and_then(|re| re.captures(text))
        .ok_or_else(|| GitVersionError::version(format!("Invalid version: '{}'", text)))?;

        let component = |index: usize| -> Result<u64> {
            match captures.get(index) {
                Some(m) => m.as_str().parse::<u64>().map_err(|_| {
                    GitVersionError::version(format!("Version component out of range: '{}'", text))
                }),
                None => Ok(0),
            }
        };

        let pre_release = captures
            .get(4)
            .map(|m| PreReleaseTag::parse(m.as_str()))
            .transpose()?;

        Ok(SemanticVersion {
            major: component(1)?,
            minor: component(2)?,
            patch: component(3)?,
            pre_release,
            build_metadata: captures.get(5).map(|m| m.as_str().to_string()),
        })
    }

    fn from_semver(version: &semver::Version) -> Result<Self> {
        let pre_release = if version.pre.is_empty() {
            None
        } else {
            Some(PreReleaseTag::parse(version.pre.as_str())?)
        };
        let build_metadata = if version.build.is_empty() {
            None
        } else {
            Some(version.build.as_str().to_string())
        };

        Ok(SemanticVersion {
            major: version.major,
            minor: version.minor,
            patch: version.patch,
            pre_release,
            build_metadata,
        })
    }

    /// Apply an increment.
    ///
    /// A version already carrying a pre-release tag stays on that pre-release
    /// line: only its number moves. Otherwise the requested field is bumped
    /// and lower fields reset. Build metadata is always dropped.
    ///
    /// Fails with a version error when a field would overflow.
    pub fn increment(&self, bump: VersionBump) -> Result<Self> {
        let mut next = self.clone();
        next.build_metadata = None;

        if bump == VersionBump::None {
            return Ok(next);
        }

        if let Some(tag) = &self.pre_release {
            if tag.has_number() {
                next.pre_release = Some(tag.increment_number()?);
            }
            return Ok(next);
        }

        let overflow = || GitVersionError::version(format!("Cannot increment {} ({})", self, bump));
        match bump {
            VersionBump::Major => {
                next.major = self.major.checked_add(1).ok_or_else(overflow)?;
                next.minor = 0;
                next.patch = 0;
            }
            VersionBump::Minor => {
                next.minor = self.minor.checked_add(1).ok_or_else(overflow)?;
                next.patch = 0;
            }
            VersionBump::Patch => {
                next.patch = self.patch.checked_add(1).ok_or_else(overflow)?;
            }
            VersionBump::None => {}
        }
        Ok(next)
    }

    /// "major.minor.patch" without pre-release or metadata
    pub fn major_minor_patch(&self) -> String {
        format!("{}.{}.{}", self.major, self.minor, self.patch)
    }
}

impl Ord for SemanticVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        self.major
            .cmp(&other.major)
            .then(self.minor.cmp(&other.minor))
            .then(self.patch.cmp(&other.patch))
            .then_with(|| match (&self.pre_release, &other.pre_release) {
                (None, None) => Ordering::Equal,
                (None, Some(_)) => Ordering::Greater,
                (Some(_), None) => Ordering::Less,
                (Some(a), Some(b)) => a.cmp(b),
            })
            .then_with(|| self.build_metadata.cmp(&other.build_metadata))
    }
}

impl PartialOrd for SemanticVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for SemanticVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)?;
        if let Some(tag) = &self.pre_release {
            write!(f, "-{}", tag)?;
        }
        if let Some(metadata) = &self.build_metadata {
            write!(f, "+{}", metadata)?;
        }
        Ok(())
    }
}

/// Magnitude of a version bump, ordered by severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum VersionBump {
    None,
    Patch,
    Minor,
    Major,
}

impl fmt::Display for VersionBump {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            VersionBump::None => "none",
            VersionBump::Patch => "patch",
            VersionBump::Minor => "minor",
            VersionBump::Major => "major",
        };
        write!(f, "{}", name)
    }
}
