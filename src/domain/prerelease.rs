//! Pre-release tag handling for semantic versions
//!
//! A pre-release tag is a label with an optional trailing number, such as
//! `beta.4` or `PullRequest42.1`. See https://semver.org/#spec-item-9

use crate::error::{GitVersionError, Result};
use std::fmt;
use std::str::FromStr;

/// Pre-release tag with optional number
///
/// # Examples
/// - "alpha" -> PreReleaseTag { name: "alpha", number: None }
/// - "beta.1" -> PreReleaseTag { name: "beta", number: Some(1) }
/// - "rc.3" -> PreReleaseTag { name: "rc", number: Some(3) }
///
/// Ordering compares the name first, then the number (a missing number sorts
/// before any number).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PreReleaseTag {
    /// The label, e.g. "alpha" or "PullRequest42"
    pub name: String,
    /// Optional number, incremented per build on the same label
    pub number: Option<u64>,
}

impl PreReleaseTag {
    /// Create a new pre-release tag
    pub fn new(name: impl Into<String>, number: Option<u64>) -> Self {
        PreReleaseTag {
            name: name.into(),
            number,
        }
    }

    /// Parse a pre-release tag from a string
    ///
    /// Accepts formats like "beta", "beta.1", "rc.2" or "alpha.beta.5". The
    /// last dot-separated segment is taken as the number when it is numeric.
    ///
    /// # Returns
    /// * `Ok(PreReleaseTag)` - Parsed tag
    /// * `Err` - If the string is empty or contains invalid characters
    pub fn parse(s: &str) -> Result<Self> {
        s.parse()
    }

    /// Increment the number
    ///
    /// If number is None, returns Some(1). Otherwise increments by 1.
    ///
    /// # Returns
    /// * `Err` - If the number is already at `u64::MAX`
    pub fn increment_number(&self) -> Result<Self> {
        let number = match self.number {
            Some(n) => n.checked_add(1).ok_or_else(|| {
                GitVersionError::version(format!("Pre-release number of '{}' overflows", self))
            })?,
            None => 1,
        };

        Ok(PreReleaseTag {
            name: self.name.clone(),
            number: Some(number),
        })
    }

    /// Whether the tag carries a number
    pub fn has_number(&self) -> bool {
        self.number.is_some()
    }
}

impl FromStr for PreReleaseTag {
    type Err = GitVersionError;

    fn from_str(s: &str) -> Result<Self> {
        if s.is_empty() {
            return Err(GitVersionError::version("Empty pre-release tag"));
        }

        if !s
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '.')
        {
            return Err(GitVersionError::version(format!(
                "Invalid pre-release tag: '{}'",
                s
            )));
        }

        let (name, number) = match s.rsplit_once('.') {
            Some((name, last)) if !name.is_empty() => match last.parse::<u64>() {
                Ok(n) => (name, Some(n)),
                Err(_) => (s, None),
            },
            _ => match s.parse::<u64>() {
                // A purely numeric tag ("1.0.0-4") has no name.
                Ok(n) => ("", Some(n)),
                Err(_) => (s, None),
            },
        };

        Ok(PreReleaseTag::new(name, number))
    }
}

impl fmt::Display for PreReleaseTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.name.is_empty(), self.number) {
            (true, Some(n)) => write!(f, "{}", n),
            (_, Some(n)) => write!(f, "{}.{}", self.name, n),
            (_, None) => write!(f, "{}", self.name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_with_number() {
        let tag = PreReleaseTag::parse("beta.1").unwrap();
        assert_eq!(tag.name, "beta");
        assert_eq!(tag.number, Some(1));
    }

    #[test]
    fn test_parse_without_number() {
        let tag = PreReleaseTag::parse("alpha").unwrap();
        assert_eq!(tag.name, "alpha");
        assert_eq!(tag.number, None);
    }

    #[test]
    fn test_parse_dotted_name() {
        let tag = PreReleaseTag::parse("alpha.beta.5").unwrap();
        assert_eq!(tag.name, "alpha.beta");
        assert_eq!(tag.number, Some(5));

        let tag = PreReleaseTag::parse("alpha.beta").unwrap();
        assert_eq!(tag.name, "alpha.beta");
        assert_eq!(tag.number, None);
    }

    #[test]
    fn test_parse_numeric_only() {
        let tag = PreReleaseTag::parse("4").unwrap();
        assert_eq!(tag.name, "");
        assert_eq!(tag.number, Some(4));
        assert_eq!(tag.to_string(), "4");
    }

    #[test]
    fn test_parse_invalid() {
        assert!(PreReleaseTag::parse("").is_err());
        assert!(PreReleaseTag::parse("feature/login").is_err());
        assert!(PreReleaseTag::parse("bad!tag").is_err());
    }

    #[test]
    fn test_increment_number() {
        let tag = PreReleaseTag::parse("rc.99").unwrap();
        assert_eq!(tag.increment_number().unwrap().number, Some(100));

        let tag = PreReleaseTag::new("alpha", None);
        let incremented = tag.increment_number().unwrap();
        assert_eq!(incremented.name, "alpha");
        assert_eq!(incremented.number, Some(1));
    }

    #[test]
    fn test_increment_number_overflow() {
        let tag = PreReleaseTag::new("search", Some(u64::MAX));
        let err = tag.increment_number().unwrap_err();
        assert!(
            matches!(err, GitVersionError::Version(_)),
            "Expected a version error, got: {}",
            err
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(PreReleaseTag::new("rc", Some(2)).to_string(), "rc.2");
        assert_eq!(PreReleaseTag::new("alpha", None).to_string(), "alpha");
    }

    #[test]
    fn test_ordering() {
        let alpha = PreReleaseTag::new("alpha", None);
        let alpha1 = PreReleaseTag::new("alpha", Some(1));
        let alpha2 = PreReleaseTag::new("alpha", Some(2));
        let beta1 = PreReleaseTag::new("beta", Some(1));

        assert!(alpha < alpha1);
        assert!(alpha1 < alpha2);
        assert!(alpha2 < beta1);
    }
}
