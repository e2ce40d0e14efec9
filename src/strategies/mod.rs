//! Base version strategies
//!
//! Each strategy looks at the history and the effective configuration and
//! proposes zero or more [`BaseVersion`] candidates. Strategies never fail
//! because they do not apply; they just propose nothing. The
//! [`aggregator`] picks the single winner.

pub mod aggregator;
pub mod configured_next_version;
pub mod fallback;
pub mod merge_message;
pub mod tagged_commit;
pub mod version_in_branch_name;

pub use aggregator::aggregate;

use crate::config::Config;
use crate::domain::{BranchCatalog, SemanticVersion, TagPattern};
use crate::error::Result;
use crate::git::HistoryView;
use crate::resolver::EffectiveConfiguration;
use git2::Oid;
use rayon::prelude::*;
use std::fmt;

/// The closed set of base version strategies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VersionStrategy {
    TaggedCommit,
    ConfiguredNextVersion,
    VersionInBranchName,
    MergeMessage,
    Fallback,
}

impl VersionStrategy {
    /// Every strategy, highest precedence first
    pub const ALL: [VersionStrategy; 5] = [
        VersionStrategy::TaggedCommit,
        VersionStrategy::ConfiguredNextVersion,
        VersionStrategy::VersionInBranchName,
        VersionStrategy::MergeMessage,
        VersionStrategy::Fallback,
    ];

    /// Precedence tier; higher wins during aggregation
    pub fn precedence(self) -> u8 {
        match self {
            VersionStrategy::TaggedCommit => 4,
            VersionStrategy::ConfiguredNextVersion => 3,
            VersionStrategy::VersionInBranchName => 2,
            VersionStrategy::MergeMessage => 1,
            VersionStrategy::Fallback => 0,
        }
    }

    /// Run this strategy
    pub fn propose(self, ctx: &StrategyContext<'_>) -> Result<Vec<BaseVersion>> {
        let candidates = match self {
            VersionStrategy::TaggedCommit => tagged_commit::propose(ctx)?,
            VersionStrategy::ConfiguredNextVersion => configured_next_version::propose(ctx)?,
            VersionStrategy::VersionInBranchName => version_in_branch_name::propose(ctx)?,
            VersionStrategy::MergeMessage => merge_message::propose(ctx)?,
            VersionStrategy::Fallback => fallback::propose(ctx)?,
        };

        for candidate in &candidates {
            tracing::debug!(strategy = %self, candidate = %candidate, "proposed base version");
        }
        Ok(candidates)
    }
}

impl fmt::Display for VersionStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            VersionStrategy::TaggedCommit => "TaggedCommit",
            VersionStrategy::ConfiguredNextVersion => "ConfiguredNextVersion",
            VersionStrategy::VersionInBranchName => "VersionInBranchName",
            VersionStrategy::MergeMessage => "MergeMessage",
            VersionStrategy::Fallback => "Fallback",
        };
        write!(f, "{}", name)
    }
}

/// A candidate starting point for the next version
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseVersion {
    /// Strategy that produced the candidate
    pub strategy: VersionStrategy,
    /// Human readable origin, e.g. "Git tag 'v1.2.0'"
    pub description: String,
    /// Whether the calculated increment is applied on top of `version`
    pub should_increment: bool,
    pub version: SemanticVersion,
    /// Commit the version is anchored at; commits after it are scanned for
    /// bump messages. `None` means the whole history.
    pub base_commit: Option<Oid>,
    /// Branch the version was taken from, if any
    pub source_branch: Option<String>,
    /// Commits between `base_commit` and the tip
    pub commits_since_base: usize,
}

impl fmt::Display for BaseVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}, {} commits since base{})",
            self.version,
            self.description,
            self.commits_since_base,
            if self.should_increment {
                ", incrementing"
            } else {
                ""
            }
        )
    }
}

/// Read-only inputs shared by all strategies
pub struct StrategyContext<'a> {
    pub history: &'a dyn HistoryView,
    pub configuration: &'a EffectiveConfiguration,
    pub config: &'a Config,
    pub catalog: &'a BranchCatalog,
    pub tag_pattern: &'a TagPattern,
}

impl StrategyContext<'_> {
    /// The tip, when it carries a version tag
    pub(crate) fn tip_tag_version(&self) -> Result<Option<SemanticVersion>> {
        let Some(tip) = self.history.tip() else {
            return Ok(None);
        };

        Ok(self
            .history
            .tags_reachable_from(tip)?
            .into_iter()
            .filter(|tag| tag.target == tip)
            .filter_map(|tag| self.tag_pattern.version_of(&tag.name))
            .max())
    }
}

/// Run every strategy on the rayon pool and collect all candidates.
///
/// The order of the returned candidates carries no meaning.
pub fn propose_all(ctx: &StrategyContext<'_>) -> Result<Vec<BaseVersion>> {
    let proposals: Vec<Vec<BaseVersion>> = VersionStrategy::ALL
        .par_iter()
        .map(|strategy| strategy.propose(ctx))
        .collect::<Result<_>>()?;

    Ok(proposals.into_iter().flatten().collect())
}


#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;

    #[test]
    fn test_precedence_is_strictly_ordered() {
        let tiers: Vec<u8> = VersionStrategy::ALL.iter().map(|s| s.precedence()).collect();
        assert!(tiers.windows(2).all(|pair| pair[0] > pair[1]));
    }

    #[test]
    fn test_propose_all_always_includes_fallback() {
        let fixture = Fixture::new(Config::default(), linear_history("develop", 3));
        let candidates = propose_all(&fixture.context()).unwrap();

        assert!(candidates
            .iter()
            .any(|c| c.strategy == VersionStrategy::Fallback));
    }

    #[test]
    fn test_propose_all_collects_multiple_strategies() {
        let mut history = linear_history("release/2.3.0", 3);
        history.add_tag("v1.0.0", oid(1));
        history.set_fork_point(oid(2));
        let fixture = Fixture::new(Config::default(), history);

        let mut strategies: Vec<String> = propose_all(&fixture.context())
            .unwrap()
            .iter()
            .map(|c| c.strategy.to_string())
            .collect();
        strategies.sort();

        assert_eq!(
            strategies,
            vec!["Fallback", "TaggedCommit", "VersionInBranchName"]
        );
    }

    #[test]
    fn test_propose_all_surfaces_fallback_error() {
        let fixture = Fixture::new(Config::default(), linear_history("main", 0));
        let err = propose_all(&fixture.context()).unwrap_err();
        assert!(err.to_string().contains("No commits found"));
    }
}
