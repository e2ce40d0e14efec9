use crate::domain::version::SemanticVersion;
use crate::error::{GitVersionError, Result};
use regex::{Regex, RegexBuilder};

/// Matches version-bearing names against the configured label prefix
///
/// The prefix is a regular expression (default `[vV]?`) that may precede the
/// version in tag names and branch name segments.
#[derive(Debug, Clone)]
pub struct TagPattern {
    regex: Regex,
}

impl TagPattern {
    /// Compile a tag pattern from a label prefix expression
    pub fn new(label_prefix: &str) -> Result<Self> {
        let regex = RegexBuilder::new(&format!(r"^(?:{})(?P<version>\d.*)$", label_prefix))
            .case_insensitive(true)
            .build()
            .map_err(|e| {
                GitVersionError::config(format!(
                    "Invalid label prefix '{}': {}",
                    label_prefix, e
                ))
            })?;

        Ok(TagPattern { regex })
    }

    /// Extract the version from a name, e.g. "v1.2.3" -> 1.2.3
    ///
    /// Returns `None` when the name does not start with the prefix followed by
    /// something that parses as a version.
    pub fn version_of(&self, name: &str) -> Option<SemanticVersion> {
        let captures = self.regex.captures(name)?;
        let version = captures.name("version")?;
        SemanticVersion::parse(version.as_str()).ok()
    }

    /// Find the first `/`- or `-`-separated segment of a branch name that
    /// carries a version, e.g. "release/2.3.0" -> 2.3.0
    pub fn version_in_branch_name(&self, branch_name: &str) -> Option<SemanticVersion> {
        branch_name
            .split(['/', '-'])
            .filter(|segment| !segment.is_empty())
            .find_map(|segment| self.version_of(segment))
    }
}
