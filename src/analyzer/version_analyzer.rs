use crate::config::CommitMessageIncrementMode;
use crate::domain::VersionBump;
use crate::error::{GitVersionError, Result};
use crate::git::CommitInfo;
use crate::resolver::EffectiveConfiguration;
use crate::strategies::BaseVersion;
use regex::{Regex, RegexBuilder};

/// Decides how far to bump a base version from commit messages
pub struct VersionAnalyzer {
    mode: CommitMessageIncrementMode,
    static_increment: VersionBump,
    major: Regex,
    minor: Regex,
    patch: Regex,
    no_bump: Regex,
}

fn compile(kind: &str, pattern: &str) -> Result<Regex> {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .multi_line(true)
        .build()
        .map_err(|e| {
            GitVersionError::config(format!(
                "Invalid {} bump message pattern '{}': {}",
                kind, pattern, e
            ))
        })
}

impl VersionAnalyzer {
    /// Compile the bump message patterns of a branch
    pub fn new(configuration: &EffectiveConfiguration) -> Result<Self> {
        Ok(VersionAnalyzer {
            mode: configuration.commit_message_incrementing,
            static_increment: configuration.increment,
            major: compile("major", &configuration.major_version_bump_message)?,
            minor: compile("minor", &configuration.minor_version_bump_message)?,
            patch: compile("patch", &configuration.patch_version_bump_message)?,
            no_bump: compile("no-bump", &configuration.no_bump_message)?,
        })
    }

    /// Bump requested by a single message, if any.
    ///
    /// An explicit no-bump request counts as a match of severity `None`.
    pub fn message_bump(&self, message: &str) -> Option<VersionBump> {
        if self.no_bump.is_match(message) {
            Some(VersionBump::None)
        } else if self.major.is_match(message) {
            Some(VersionBump::Major)
        } else if self.minor.is_match(message) {
            Some(VersionBump::Minor)
        } else if self.patch.is_match(message) {
            Some(VersionBump::Patch)
        } else {
            None
        }
    }

    /// Decide the increment for `base` given the commits after it.
    ///
    /// The branch's configured increment applies when scanning is disabled,
    /// when the base version is not incremented, or when no commit asks for
    /// a bump.
    pub fn decide(&self, base: &BaseVersion, commits: &[CommitInfo]) -> VersionBump {
        if self.mode == CommitMessageIncrementMode::Disabled || !base.should_increment {
            return self.static_increment;
        }

        let merges_only = self.mode == CommitMessageIncrementMode::MergeMessageOnly;
        let requested = commits
            .iter()
            .filter(|commit| !merges_only || commit.is_merge())
            .filter_map(|commit| self.message_bump(&commit.message))
            .max();

        match requested {
            Some(bump) => {
                tracing::debug!(increment = %bump, "increment from commit messages");
                bump
            }
            None => self.static_increment,
        }
    }
}
