use crate::domain::SemanticVersion;
use crate::error::{GitVersionError, Result};
use crate::strategies::{BaseVersion, StrategyContext, VersionStrategy};

/// Propose the `next_version` setting, unless the tip is already tagged.
pub fn propose(ctx: &StrategyContext<'_>) -> Result<Vec<BaseVersion>> {
    let Some(next_version) = &ctx.configuration.next_version else {
        return Ok(Vec::new());
    };
    let Some(tip) = ctx.history.tip() else {
        return Ok(Vec::new());
    };

    if let Some(tagged) = ctx.tip_tag_version()? {
        tracing::debug!(version = %tagged, "tip is tagged, ignoring next_version");
        return Ok(Vec::new());
    }

    let version = SemanticVersion::parse(next_version).map_err(|e| {
        GitVersionError::config(format!("Invalid next_version '{}': {}", next_version, e))
    })?;

    Ok(vec![BaseVersion {
        strategy: VersionStrategy::ConfiguredNextVersion,
        description: "next_version in configuration".to_string(),
        should_increment: false,
        version,
        base_commit: None,
        source_branch: None,
        commits_since_base: ctx.history.distance(None, tip)?,
    }])
}
