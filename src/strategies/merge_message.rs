use crate::domain::MergeMessage;
use crate::error::Result;
use crate::strategies::{BaseVersion, StrategyContext, VersionStrategy};

/// Propose versions from release branches merged into the current branch.
///
/// Every merge commit reachable from the tip whose message names a branch
/// classified as a release branch, with a version in its name, yields a
/// candidate anchored at the merge commit.
pub fn propose(ctx: &StrategyContext<'_>) -> Result<Vec<BaseVersion>> {
    let configuration = ctx.configuration;
    if !configuration.track_merge_message && !configuration.track_merge_target {
        return Ok(Vec::new());
    }
    let Some(tip) = ctx.history.tip() else {
        return Ok(Vec::new());
    };

    let mut candidates = Vec::new();
    for commit in ctx.history.commits_between(None, tip)? {
        if !commit.is_merge() {
            continue;
        }
        let Some(merge) = MergeMessage::parse(&commit.message) else {
            continue;
        };

        let archetype = ctx.catalog.classify(&merge.merged_branch);
        if !ctx.config.is_release_branch(&archetype.name) {
            continue;
        }
        let Some(version) = ctx.tag_pattern.version_in_branch_name(&merge.merged_branch) else {
            continue;
        };

        let summary = commit.message.lines().next().unwrap_or_default();
        candidates.push(BaseVersion {
            strategy: VersionStrategy::MergeMessage,
            description: format!("Merge message '{}'", summary.trim()),
            should_increment: !configuration.prevent_increment_of_merged_branch_version,
            version,
            base_commit: Some(commit.id),
            source_branch: Some(merge.merged_branch),
            commits_since_base: ctx.history.distance(Some(commit.id), tip)?,
        });
    }

    Ok(candidates)
}
