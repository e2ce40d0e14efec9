//! End-to-end version calculation
//!
//! Branch name → archetype → effective configuration → base version
//! candidates → winning base version → increment → label → [`VersionResult`].

use crate::analyzer::VersionAnalyzer;
use crate::config::{Config, VersioningMode};
use crate::domain::{BranchCatalog, PreReleaseTag, SemanticVersion, TagPattern, VersionBump};
use crate::error::Result;
use crate::git::HistoryView;
use crate::label::LabelFormatter;
use crate::resolver::{ConfigurationResolver, EffectiveConfiguration};
use crate::strategies::{self, BaseVersion, StrategyContext, VersionStrategy};
use crate::warning::CalculationWarning;
use git2::Oid;

/// Outcome of a version calculation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionResult {
    pub version: SemanticVersion,
    pub branch_name: String,
    pub archetype: String,
    /// Description of the winning base version
    pub base_version_source: String,
    pub base_version_commit: Option<Oid>,
    pub strategy: VersionStrategy,
    /// Increment applied to the base version
    pub increment: VersionBump,
    pub commits_since_base: usize,
    /// Pre-release number shifted by the branch weight, for ordering builds
    /// of different branches
    pub weighted_pre_release_number: u64,
    pub warnings: Vec<CalculationWarning>,
}

/// Names accepted by [`VersionResult::variable`], in display order
pub const VARIABLE_NAMES: &[&str] = &[
    "Major",
    "Minor",
    "Patch",
    "MajorMinorPatch",
    "PreReleaseLabel",
    "PreReleaseNumber",
    "PreReleaseTag",
    "WeightedPreReleaseNumber",
    "BuildMetaData",
    "SemVer",
    "FullSemVer",
    "BranchName",
    "BranchType",
    "Increment",
    "VersionSource",
    "VersionSourceSha",
    "CommitsSinceVersionSource",
];

impl VersionResult {
    /// Semantic version without build metadata
    pub fn sem_ver(&self) -> String {
        let mut version = self.version.clone();
        version.build_metadata = None;
        version.to_string()
    }

    /// A single output variable by name, e.g. "FullSemVer"
    pub fn variable(&self, name: &str) -> Option<String> {
        let pre_release = self.version.pre_release.as_ref();
        let value = match name {
            "Major" => self.version.major.to_string(),
            "Minor" => self.version.minor.to_string(),
            "Patch" => self.version.patch.to_string(),
            "MajorMinorPatch" => self.version.major_minor_patch(),
            "PreReleaseLabel" => pre_release.map(|tag| tag.name.clone()).unwrap_or_default(),
            "PreReleaseNumber" => pre_release
                .and_then(|tag| tag.number)
                .map(|n| n.to_string())
                .unwrap_or_default(),
            "PreReleaseTag" => pre_release.map(|tag| tag.to_string()).unwrap_or_default(),
            "WeightedPreReleaseNumber" => self.weighted_pre_release_number.to_string(),
            "BuildMetaData" => self.version.build_metadata.clone().unwrap_or_default(),
            "SemVer" => self.sem_ver(),
            "FullSemVer" => self.version.to_string(),
            "BranchName" => self.branch_name.clone(),
            "BranchType" => self.archetype.clone(),
            "Increment" => self.increment.to_string(),
            "VersionSource" => self.base_version_source.clone(),
            "VersionSourceSha" => self
                .base_version_commit
                .map(|oid| oid.to_string())
                .unwrap_or_default(),
            "CommitsSinceVersionSource" => self.commits_since_base.to_string(),
            _ => return None,
        };
        Some(value)
    }

    /// Every variable with its value, in display order
    pub fn variables(&self) -> Vec<(&'static str, String)> {
        VARIABLE_NAMES
            .iter()
            .filter_map(|name| self.variable(name).map(|value| (*name, value)))
            .collect()
    }
}

/// Calculates versions for histories using one configuration
pub struct VersionCalculator<'a> {
    config: &'a Config,
}

impl<'a> VersionCalculator<'a> {
    pub fn new(config: &'a Config) -> Self {
        VersionCalculator { config }
    }

    /// Calculate the version of the history's current branch.
    ///
    /// Configuration problems surface before any strategy runs.
    ///
    /// # Errors
    /// Configuration errors from the catalog, resolver, label or patterns,
    /// and a precondition error when the branch has no commits.
    pub fn calculate(&self, history: &dyn HistoryView) -> Result<VersionResult> {
        let catalog = BranchCatalog::new(self.config.catalog_entries()?)?;
        let branch_name = history.current_branch();
        let archetype = catalog.classify(branch_name);

        let resolved = ConfigurationResolver::new(self.config).resolve(branch_name, archetype)?;
        let configuration = &resolved.configuration;

        let tag_pattern = TagPattern::new(&configuration.label_prefix)?;
        let analyzer = VersionAnalyzer::new(configuration)?;
        let label = LabelFormatter::new(archetype, configuration.label_number_pattern.as_deref())?
            .format(&configuration.label, branch_name)?;

        let ctx = StrategyContext {
            history,
            configuration,
            config: self.config,
            catalog: &catalog,
            tag_pattern: &tag_pattern,
        };
        let base = strategies::aggregate(strategies::propose_all(&ctx)?)?;

        let increment = match history.tip() {
            Some(tip) => {
                let commits = history.commits_between(base.base_commit, tip)?;
                analyzer.decide(&base, &commits)
            }
            None => configuration.increment,
        };

        let version = apply(&base, increment, &label, configuration)?;
        let weighted_pre_release_number = match version.pre_release.as_ref().and_then(|t| t.number) {
            Some(number) => number.saturating_add(u64::from(configuration.pre_release_weight)),
            None => u64::from(configuration.label_pre_release_weight),
        };

        tracing::debug!(version = %version, base = %base, increment = %increment, "calculated version");

        Ok(VersionResult {
            version,
            branch_name: branch_name.to_string(),
            archetype: archetype.name.clone(),
            base_version_source: base.description,
            base_version_commit: base.base_commit,
            strategy: base.strategy,
            increment: if base.should_increment {
                increment
            } else {
                VersionBump::None
            },
            commits_since_base: base.commits_since_base,
            weighted_pre_release_number,
            warnings: resolved.warnings,
        })
    }
}

/// Turn the winning base version into the final version
fn apply(
    base: &BaseVersion,
    increment: VersionBump,
    label: &str,
    configuration: &EffectiveConfiguration,
) -> Result<SemanticVersion> {
    let mut version = if base.should_increment {
        base.version.increment(increment)?
    } else {
        let mut version = base.version.clone();
        version.build_metadata = None;
        version
    };

    let mainline = configuration.mode == VersioningMode::Mainline && configuration.is_mainline;
    if label.is_empty() || mainline {
        version.pre_release = None;
    } else {
        let number = match &version.pre_release {
            Some(existing) if existing.name == label => existing.number.unwrap_or(1),
            _ => match configuration.mode {
                VersioningMode::ContinuousDeployment => base.commits_since_base as u64,
                VersioningMode::ContinuousDelivery | VersioningMode::Mainline => 1,
            },
        };
        version.pre_release = Some(PreReleaseTag::new(label, Some(number)));
    }

    if configuration.mode == VersioningMode::ContinuousDelivery && base.commits_since_base > 0 {
        version.build_metadata = Some(base.commits_since_base.to_string());
    }

    Ok(version)
}
