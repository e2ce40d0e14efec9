//! Effective configuration resolution
//!
//! Overlays global defaults, the matched archetype's settings and any
//! exact-branch override, then resolves an `inherit` increment by walking the
//! declared source-branch graph.

use crate::config::{
    BranchConfiguration, CommitMessageIncrementMode, Config, IncrementStrategy, VersioningMode,
};
use crate::domain::{BranchArchetype, VersionBump};
use crate::error::{GitVersionError, Result};
use crate::warning::CalculationWarning;

/// Fully merged, inheritance-resolved settings for one branch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EffectiveConfiguration {
    pub branch_name: String,
    pub archetype: String,
    /// Naming pattern of the archetype, trimmed from `{BranchName}`
    pub branch_prefix_pattern: String,
    pub increment: VersionBump,
    pub mode: VersioningMode,
    pub label: String,
    pub label_number_pattern: Option<String>,
    pub source_branches: Vec<String>,
    pub prevent_increment_of_merged_branch_version: bool,
    pub track_merge_target: bool,
    pub track_merge_message: bool,
    pub tracks_release_branches: bool,
    pub is_mainline: bool,
    pub is_release_branch: bool,
    pub pre_release_weight: u32,
    pub commit_message_incrementing: CommitMessageIncrementMode,
    pub label_prefix: String,
    pub next_version: Option<String>,
    pub major_version_bump_message: String,
    pub minor_version_bump_message: String,
    pub patch_version_bump_message: String,
    pub no_bump_message: String,
    pub label_pre_release_weight: u32,
}

/// Resolution output: the configuration plus anything worth warning about
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    pub configuration: EffectiveConfiguration,
    pub warnings: Vec<CalculationWarning>,
}

/// Produces [`EffectiveConfiguration`]s from a [`Config`]
pub struct ConfigurationResolver<'a> {
    config: &'a Config,
}

impl<'a> ConfigurationResolver<'a> {
    pub fn new(config: &'a Config) -> Self {
        ConfigurationResolver { config }
    }

    /// Resolve the effective configuration of `branch_name`, which has been
    /// classified as `archetype`.
    ///
    /// # Errors
    /// Configuration errors for an inheritance cycle, for an inheriting branch
    /// without source branches, and for a merge-target-tracking branch without
    /// source branches.
    pub fn resolve(&self, branch_name: &str, archetype: &BranchArchetype) -> Result<Resolved> {
        let mut merged = self.config.archetype_configuration(&archetype.name);
        if let Some(exact) = self.config.overrides.get(branch_name) {
            tracing::debug!(branch = %branch_name, "applying exact branch override");
            merged = merged.overlay(exact);
        }

        let source_branches = merged.source_branches.clone().unwrap_or_default();
        let mut warnings = Vec::new();

        let strategy = merged.increment.unwrap_or(IncrementStrategy::Inherit);
        let increment = match strategy.to_bump() {
            Some(bump) => bump,
            None => {
                let mut path = Vec::new();
                match self.inherited_increment(
                    &archetype.name,
                    &source_branches,
                    &mut path,
                    &mut warnings,
                )? {
                    Some(bump) => bump,
                    None => {
                        warnings.push(CalculationWarning::UnresolvedInheritance {
                            branch: branch_name.to_string(),
                            archetype: archetype.name.clone(),
                        });
                        VersionBump::None
                    }
                }
            }
        };

        for warning in &warnings {
            tracing::warn!("{}", warning);
        }

        let configuration = self.effective(branch_name, archetype, merged, source_branches, increment)?;
        tracing::debug!(
            branch = %branch_name,
            archetype = %configuration.archetype,
            increment = %configuration.increment,
            label = %configuration.label,
            "resolved effective configuration"
        );

        Ok(Resolved {
            configuration,
            warnings,
        })
    }

    /// Walk `sources` in declared order; the first one with a concrete
    /// increment (directly or through its own sources) wins.
    ///
    /// `path` holds the archetypes currently being resolved; meeting one of
    /// them again is a cycle. Returns `Ok(None)` when every source was skipped.
    fn inherited_increment(
        &self,
        archetype: &str,
        sources: &[String],
        path: &mut Vec<String>,
        warnings: &mut Vec<CalculationWarning>,
    ) -> Result<Option<VersionBump>> {
        if sources.is_empty() {
            return Err(GitVersionError::config(format!(
                "Branch '{}' inherits its increment but declares no source branches",
                archetype
            )));
        }

        path.push(archetype.to_string());

        for source in sources {
            if path.contains(source) {
                let mut chain = path.clone();
                chain.push(source.clone());
                return Err(GitVersionError::config(format!(
                    "Cycle in source branches: {}",
                    chain.join(" -> ")
                )));
            }

            if !self.config.branches.contains_key(source) {
                warnings.push(CalculationWarning::UnknownSourceBranch {
                    archetype: archetype.to_string(),
                    source: source.clone(),
                });
                continue;
            }

            let layer = self.config.archetype_configuration(source);
            let resolved = match layer.increment.and_then(IncrementStrategy::to_bump) {
                Some(bump) => Some(bump),
                None => {
                    let nested = layer.source_branches.unwrap_or_default();
                    self.inherited_increment(source, &nested, path, warnings)?
                }
            };

            if let Some(bump) = resolved {
                tracing::debug!(archetype, source = %source, increment = %bump, "inherited increment");
                path.pop();
                return Ok(Some(bump));
            }
        }

        path.pop();
        Ok(None)
    }

    fn effective(
        &self,
        branch_name: &str,
        archetype: &BranchArchetype,
        merged: BranchConfiguration,
        source_branches: Vec<String>,
        increment: VersionBump,
    ) -> Result<EffectiveConfiguration> {
        let is_mainline = merged.is_mainline.unwrap_or(false);
        let track_merge_target = merged.track_merge_target.unwrap_or(false);
        let tracks_release_branches = merged.tracks_release_branches.unwrap_or(false);

        if track_merge_target && !is_mainline && !tracks_release_branches && source_branches.is_empty()
        {
            return Err(GitVersionError::config(format!(
                "Branch type '{}' tracks its merge target but declares no source branches",
                archetype.name
            )));
        }

        Ok(EffectiveConfiguration {
            branch_name: branch_name.to_string(),
            archetype: archetype.name.clone(),
            branch_prefix_pattern: archetype.naming_pattern.as_str().to_string(),
            increment,
            mode: merged.mode.unwrap_or(VersioningMode::ContinuousDelivery),
            label: merged.label.unwrap_or_default(),
            label_number_pattern: merged.label_number_pattern,
            source_branches,
            prevent_increment_of_merged_branch_version: merged
                .prevent_increment_of_merged_branch_version
                .unwrap_or(false),
            track_merge_target,
            track_merge_message: merged.track_merge_message.unwrap_or(false),
            tracks_release_branches,
            is_mainline,
            is_release_branch: merged.is_release_branch.unwrap_or(false),
            pre_release_weight: merged.pre_release_weight.unwrap_or(0),
            commit_message_incrementing: merged
                .commit_message_incrementing
                .unwrap_or(CommitMessageIncrementMode::Enabled),
            label_prefix: self.config.label_prefix.clone(),
            next_version: self.config.next_version.clone(),
            major_version_bump_message: self.config.major_version_bump_message.clone(),
            minor_version_bump_message: self.config.minor_version_bump_message.clone(),
            patch_version_bump_message: self.config.patch_version_bump_message.clone(),
            no_bump_message: self.config.no_bump_message.clone(),
            label_pre_release_weight: self.config.label_pre_release_weight,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::parse_config;
    use crate::domain::BranchCatalog;

    fn resolve(config: &Config, branch: &str) -> Result<Resolved> {
        let catalog = BranchCatalog::new(config.catalog_entries()?)?;
        let archetype = catalog.classify(branch);
        ConfigurationResolver::new(config).resolve(branch, archetype)
    }

    #[test]
    fn test_develop_defaults() {
        let config = Config::default();
        let resolved = resolve(&config, "develop").unwrap();
        let effective = resolved.configuration;

        assert_eq!(effective.archetype, "develop");
        assert_eq!(effective.increment, VersionBump::Minor);
        assert_eq!(effective.label, "alpha");
        assert_eq!(effective.mode, VersioningMode::ContinuousDeployment);
        assert!(resolved.warnings.is_empty());
    }

    #[test]
    fn test_feature_inherits_from_develop() {
        let config = Config::default();
        let effective = resolve(&config, "feature/login").unwrap().configuration;
        assert_eq!(effective.archetype, "feature");
        assert_eq!(effective.increment, VersionBump::Minor);
        assert_eq!(effective.label, "{BranchName}");
    }

    #[test]
    fn test_unknown_inherits_from_main() {
        let config = Config::default();
        let effective = resolve(&config, "wip/foo").unwrap().configuration;
        assert_eq!(effective.archetype, "unknown");
        assert_eq!(effective.increment, VersionBump::Patch);
        assert_eq!(effective.pre_release_weight, 60000);
    }

    #[test]
    fn test_release_is_release_branch() {
        let config = Config::default();
        let effective = resolve(&config, "release/2.3.0").unwrap().configuration;
        assert!(effective.is_release_branch);
        assert_eq!(effective.increment, VersionBump::None);
        assert_eq!(effective.label, "beta");
    }

    #[test]
    fn test_exact_override_wins() {
        let config = parse_config(
            r#"
[overrides."feature/special"]
label = "special"
increment = "major"
"#,
        )
        .unwrap();

        let effective = resolve(&config, "feature/special").unwrap().configuration;
        assert_eq!(effective.label, "special");
        assert_eq!(effective.increment, VersionBump::Major);

        let other = resolve(&config, "feature/other").unwrap().configuration;
        assert_eq!(other.increment, VersionBump::Minor);
    }

    #[test]
    fn test_resolve_is_idempotent() {
        let config = Config::default();
        for branch in ["main", "develop", "release/1.0", "feature/x", "pull/3", "wip"] {
            let first = resolve(&config, branch).unwrap();
            let second = resolve(&config, branch).unwrap();
            assert_eq!(first, second);
        }
    }

    #[test]
    fn test_nested_inheritance_resolves() {
        let config = parse_config(
            r#"
[branches.develop]
increment = "inherit"
source_branches = ["main"]
"#,
        )
        .unwrap();

        // feature -> develop (inherit) -> main (patch)
        let effective = resolve(&config, "feature/x").unwrap().configuration;
        assert_eq!(effective.increment, VersionBump::Patch);
    }

    #[test]
    fn test_cycle_is_config_error() {
        let config = parse_config(
            r#"
[branches.develop]
increment = "inherit"
source_branches = ["main"]

[branches.main]
increment = "inherit"
source_branches = ["develop"]
"#,
        )
        .unwrap();

        let err = resolve(&config, "develop").unwrap_err();
        assert!(err.is_config());
        assert!(err.to_string().contains("Cycle"));
        // Deterministic: the same failure every time
        let again = resolve(&config, "develop").unwrap_err();
        assert_eq!(err.to_string(), again.to_string());
    }

    #[test]
    fn test_self_reference_is_cycle() {
        let config = parse_config(
            r#"
[branches.hotfix]
source_branches = ["hotfix"]
"#,
        )
        .unwrap();

        let err = resolve(&config, "hotfix/1.0.1").unwrap_err();
        assert!(err.to_string().contains("hotfix -> hotfix"));
    }

    #[test]
    fn test_inherit_without_sources_is_config_error() {
        let config = parse_config(
            r#"
[branches.feature]
source_branches = []
"#,
        )
        .unwrap();

        let err = resolve(&config, "feature/x").unwrap_err();
        assert!(err.to_string().contains("declares no source branches"));
    }

    #[test]
    fn test_unknown_sources_fall_back_to_none_with_warning() {
        let config = parse_config(
            r#"
[branches.feature]
source_branches = ["trunk", "integration"]
"#,
        )
        .unwrap();

        let resolved = resolve(&config, "feature/x").unwrap();
        assert_eq!(resolved.configuration.increment, VersionBump::None);
        assert_eq!(
            resolved.warnings,
            vec![
                CalculationWarning::UnknownSourceBranch {
                    archetype: "feature".to_string(),
                    source: "trunk".to_string(),
                },
                CalculationWarning::UnknownSourceBranch {
                    archetype: "feature".to_string(),
                    source: "integration".to_string(),
                },
                CalculationWarning::UnresolvedInheritance {
                    branch: "feature/x".to_string(),
                    archetype: "feature".to_string(),
                },
            ]
        );
    }

    #[test]
    fn test_merge_target_tracking_requires_sources() {
        let config = parse_config(
            r#"
[branches.hotfix]
increment = "patch"
track_merge_target = true
source_branches = []
"#,
        )
        .unwrap();

        let err = resolve(&config, "hotfix/1.0.1").unwrap_err();
        assert!(err.to_string().contains("tracks its merge target"));
    }
}
