use crate::error::{GitVersionError, Result};
use crate::strategies::BaseVersion;
use std::cmp::Ordering;

/// Total order over candidates; `Less` means "preferred".
///
/// Higher strategy tier first, then the candidate closest to the tip, then
/// the higher version, then source branch and description by name. The
/// remaining fields only make the order total.
pub fn preference(a: &BaseVersion, b: &BaseVersion) -> Ordering {
    b.strategy
        .precedence()
        .cmp(&a.strategy.precedence())
        .then(a.commits_since_base.cmp(&b.commits_since_base))
        .then_with(|| b.version.cmp(&a.version))
        .then_with(|| match (&a.source_branch, &b.source_branch) {
            (Some(x), Some(y)) => x.cmp(y),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        })
        .then_with(|| a.description.cmp(&b.description))
        .then(b.should_increment.cmp(&a.should_increment))
        .then(a.base_commit.cmp(&b.base_commit))
}

/// Pick the winning base version.
///
/// Equal candidates are collapsed first. The result does not depend on the
/// order of `candidates`.
///
/// # Errors
/// Precondition error for an empty candidate set.
pub fn aggregate(mut candidates: Vec<BaseVersion>) -> Result<BaseVersion> {
    candidates.sort_by(preference);
    candidates.dedup();

    let mut ranked = candidates.into_iter();
    let winner = ranked
        .next()
        .ok_or_else(|| GitVersionError::precondition("No base version candidates"))?;

    tracing::debug!(
        winner = %winner,
        strategy = %winner.strategy,
        discarded = ranked.len(),
        "selected base version"
    );
    Ok(winner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SemanticVersion;
    use crate::strategies::test_support::oid;
    use crate::strategies::VersionStrategy;

    fn candidate(strategy: VersionStrategy, version: (u64, u64, u64), commits: usize) -> BaseVersion {
        BaseVersion {
            strategy,
            description: format!("{} candidate", strategy),
            should_increment: true,
            version: SemanticVersion::new(version.0, version.1, version.2),
            base_commit: Some(oid(commits as u8)),
            source_branch: None,
            commits_since_base: commits,
        }
    }

    #[test]
    fn test_empty_is_precondition_error() {
        let err = aggregate(Vec::new()).unwrap_err();
        assert!(matches!(err, GitVersionError::Precondition(_)));
    }

    #[test]
    fn test_tier_beats_everything_else() {
        let winner = aggregate(vec![
            candidate(VersionStrategy::Fallback, (0, 0, 0), 0),
            candidate(VersionStrategy::MergeMessage, (9, 0, 0), 1),
            candidate(VersionStrategy::TaggedCommit, (1, 0, 0), 10),
            candidate(VersionStrategy::VersionInBranchName, (5, 0, 0), 2),
        ])
        .unwrap();

        assert_eq!(winner.strategy, VersionStrategy::TaggedCommit);
        assert_eq!(winner.version, SemanticVersion::new(1, 0, 0));
    }

    #[test]
    fn test_fallback_only_wins_alone() {
        let winner = aggregate(vec![
            candidate(VersionStrategy::Fallback, (0, 0, 0), 0),
            candidate(VersionStrategy::MergeMessage, (0, 1, 0), 7),
        ])
        .unwrap();
        assert_eq!(winner.strategy, VersionStrategy::MergeMessage);

        let alone = aggregate(vec![candidate(VersionStrategy::Fallback, (0, 0, 0), 3)]).unwrap();
        assert_eq!(alone.strategy, VersionStrategy::Fallback);
    }

    #[test]
    fn test_same_tier_prefers_closest_then_highest() {
        let winner = aggregate(vec![
            candidate(VersionStrategy::MergeMessage, (3, 0, 0), 5),
            candidate(VersionStrategy::MergeMessage, (2, 0, 0), 1),
            candidate(VersionStrategy::MergeMessage, (2, 1, 0), 1),
        ])
        .unwrap();

        assert_eq!(winner.version, SemanticVersion::new(2, 1, 0));
    }

    #[test]
    fn test_source_branch_breaks_remaining_ties() {
        let mut a = candidate(VersionStrategy::MergeMessage, (1, 0, 0), 2);
        a.source_branch = Some("release/b".to_string());
        let mut b = a.clone();
        b.source_branch = Some("release/a".to_string());

        let winner = aggregate(vec![a, b]).unwrap();
        assert_eq!(winner.source_branch.as_deref(), Some("release/a"));
    }

    #[test]
    fn test_duplicates_collapse() {
        let c = candidate(VersionStrategy::TaggedCommit, (1, 0, 0), 0);
        let winner = aggregate(vec![c.clone(), c.clone(), c.clone()]).unwrap();
        assert_eq!(winner, c);
    }

    #[test]
    fn test_result_is_independent_of_input_order() {
        let mut tagged = candidate(VersionStrategy::TaggedCommit, (1, 2, 0), 3);
        tagged.source_branch = Some("main".to_string());
        let candidates = vec![
            candidate(VersionStrategy::Fallback, (0, 0, 0), 9),
            tagged.clone(),
            candidate(VersionStrategy::TaggedCommit, (1, 2, 0), 3),
            candidate(VersionStrategy::TaggedCommit, (1, 1, 0), 3),
            candidate(VersionStrategy::ConfiguredNextVersion, (4, 0, 0), 0),
        ];

        let expected = aggregate(candidates.clone()).unwrap();
        assert_eq!(expected, tagged);

        // Every rotation and the reversal pick the same winner
        for shift in 0..candidates.len() {
            let mut rotated = candidates.clone();
            rotated.rotate_left(shift);
            assert_eq!(aggregate(rotated.clone()).unwrap(), expected);
            rotated.reverse();
            assert_eq!(aggregate(rotated).unwrap(), expected);
        }
    }
}
