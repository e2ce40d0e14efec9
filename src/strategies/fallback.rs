use crate::domain::SemanticVersion;
use crate::error::{GitVersionError, Result};
use crate::strategies::{BaseVersion, StrategyContext, VersionStrategy};

/// Always propose `0.0.0`, incrementing, anchored at the root commit.
///
/// # Errors
/// Precondition error when the current branch has no commits.
pub fn propose(ctx: &StrategyContext<'_>) -> Result<Vec<BaseVersion>> {
    let no_commits = || GitVersionError::precondition("No commits found on the current branch.");
    let tip = ctx.history.tip().ok_or_else(no_commits)?;
    let root = ctx.history.root_commit().ok_or_else(no_commits)?;

    Ok(vec![BaseVersion {
        strategy: VersionStrategy::Fallback,
        description: "Fallback base version".to_string(),
        should_increment: true,
        version: SemanticVersion::new(0, 0, 0),
        base_commit: Some(root),
        source_branch: None,
        commits_since_base: ctx.history.distance(Some(root), tip)?,
    }])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::strategies::test_support::*;

    #[test]
    fn test_single_incrementing_candidate_at_root() {
        let fixture = Fixture::new(Config::default(), linear_history("develop", 5));

        let candidates = propose(&fixture.context()).unwrap();
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].version, SemanticVersion::new(0, 0, 0));
        assert!(candidates[0].should_increment);
        assert_eq!(candidates[0].base_commit, Some(oid(1)));
        assert_eq!(candidates[0].commits_since_base, 4);
    }

    #[test]
    fn test_fails_without_commits() {
        let fixture = Fixture::new(Config::default(), linear_history("develop", 0));

        let err = propose(&fixture.context()).unwrap_err();
        assert!(matches!(err, GitVersionError::Precondition(_)));
        assert_eq!(
            err.to_string(),
            "Precondition failed: No commits found on the current branch."
        );
    }
}
