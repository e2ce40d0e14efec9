use crate::error::Result;
use crate::strategies::{BaseVersion, StrategyContext, VersionStrategy};

/// Propose the most recent version tag reachable from the tip.
///
/// "Most recent" means fewest commits between the tag and the tip; tags on
/// the same commit are ranked by version. A tag on the tip itself is the
/// version as is.
///
/// Tags on older commits are proposed as incrementing: the tip is past that
/// release, so the next version has to move beyond it.
pub fn propose(ctx: &StrategyContext<'_>) -> Result<Vec<BaseVersion>> {
    let Some(tip) = ctx.history.tip() else {
        return Ok(Vec::new());
    };

    let mut best: Option<BaseVersion> = None;
    for tag in ctx.history.tags_reachable_from(tip)? {
        let Some(version) = ctx.tag_pattern.version_of(&tag.name) else {
            tracing::debug!(tag = %tag.name, "tag does not carry a version");
            continue;
        };

        let commits_since_base = ctx.history.distance(Some(tag.target), tip)?;
        let is_better = match &best {
            None => true,
            Some(current) => {
                commits_since_base < current.commits_since_base
                    || (commits_since_base == current.commits_since_base
                        && version > current.version)
            }
        };

        if is_better {
            best = Some(BaseVersion {
                strategy: VersionStrategy::TaggedCommit,
                description: format!("Git tag '{}'", tag.name),
                should_increment: tag.target != tip,
                version,
                base_commit: Some(tag.target),
                source_branch: None,
                commits_since_base,
            });
        }
    }

    Ok(best.into_iter().collect())
}
