use crate::domain::merge_message::trim_branch_prefix;
use crate::error::Result;
use crate::strategies::{BaseVersion, StrategyContext, VersionStrategy};

/// Propose the version carried by a release branch's name, e.g.
/// `release/2.3.0`.
///
/// The candidate is anchored where the branch forked off, or at the root
/// commit when the fork point is unknown.
pub fn propose(ctx: &StrategyContext<'_>) -> Result<Vec<BaseVersion>> {
    if !ctx.configuration.is_release_branch {
        return Ok(Vec::new());
    }
    let Some(tip) = ctx.history.tip() else {
        return Ok(Vec::new());
    };

    let branch = trim_branch_prefix(ctx.history.current_branch());
    let Some(version) = ctx.tag_pattern.version_in_branch_name(&branch) else {
        tracing::debug!(branch = %branch, "release branch name carries no version");
        return Ok(Vec::new());
    };

    let anchor = ctx.history.fork_point().or_else(|| ctx.history.root_commit());
    Ok(vec![BaseVersion {
        strategy: VersionStrategy::VersionInBranchName,
        description: format!("Version in branch name '{}'", branch),
        should_increment: false,
        version,
        base_commit: anchor,
        commits_since_base: ctx.history.distance(anchor, tip)?,
        source_branch: Some(branch),
    }])
}
