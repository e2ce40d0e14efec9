use crate::domain::VersionBump;
use crate::error::{GitVersionError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

pub const MAIN_BRANCH: &str = "main";
pub const DEVELOP_BRANCH: &str = "develop";
pub const RELEASE_BRANCH: &str = "release";
pub const FEATURE_BRANCH: &str = "feature";
pub const PULL_REQUEST_BRANCH: &str = "pull-request";
pub const HOTFIX_BRANCH: &str = "hotfix";
pub const SUPPORT_BRANCH: &str = "support";
pub const UNKNOWN_BRANCH: &str = "unknown";

/// Matching order of the built-in archetypes; `unknown` must stay last.
const BUILTIN_ORDER: [&str; 8] = [
    MAIN_BRANCH,
    DEVELOP_BRANCH,
    RELEASE_BRANCH,
    FEATURE_BRANCH,
    PULL_REQUEST_BRANCH,
    HOTFIX_BRANCH,
    SUPPORT_BRANCH,
    UNKNOWN_BRANCH,
];

/// File name looked up in the working directory and the user config directory
pub const CONFIG_FILE_NAME: &str = "gitversion.toml";

/// How a branch's version is incremented
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum IncrementStrategy {
    None,
    Patch,
    Minor,
    Major,
    /// Take the increment of the branch this one was created from
    Inherit,
}

impl IncrementStrategy {
    /// Concrete bump, or `None` for [`IncrementStrategy::Inherit`]
    pub fn to_bump(self) -> Option<VersionBump> {
        match self {
            IncrementStrategy::None => Some(VersionBump::None),
            IncrementStrategy::Patch => Some(VersionBump::Patch),
            IncrementStrategy::Minor => Some(VersionBump::Minor),
            IncrementStrategy::Major => Some(VersionBump::Major),
            IncrementStrategy::Inherit => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum VersioningMode {
    ContinuousDelivery,
    ContinuousDeployment,
    Mainline,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum CommitMessageIncrementMode {
    Enabled,
    Disabled,
    MergeMessageOnly,
}

/// Settings for one branch archetype, one exact branch name, or the global
/// defaults.
///
/// Every field is optional: `None` means "not set by this layer", so layers
/// can be overlaid with [`BranchConfiguration::overlay`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct BranchConfiguration {
    pub regex: Option<String>,
    pub increment: Option<IncrementStrategy>,
    pub mode: Option<VersioningMode>,
    pub label: Option<String>,
    pub label_number_pattern: Option<String>,
    pub source_branches: Option<Vec<String>>,
    pub prevent_increment_of_merged_branch_version: Option<bool>,
    pub track_merge_target: Option<bool>,
    pub track_merge_message: Option<bool>,
    pub tracks_release_branches: Option<bool>,
    pub is_mainline: Option<bool>,
    pub is_release_branch: Option<bool>,
    pub pre_release_weight: Option<u32>,
    pub commit_message_incrementing: Option<CommitMessageIncrementMode>,
}

impl BranchConfiguration {
    /// Layer `upper` on top of `self`; fields set in `upper` win
    pub fn overlay(&self, upper: &BranchConfiguration) -> BranchConfiguration {
        BranchConfiguration {
            regex: upper.regex.clone().or_else(|| self.regex.clone()),
            increment: upper.increment.or(self.increment),
            mode: upper.mode.or(self.mode),
            label: upper.label.clone().or_else(|| self.label.clone()),
            label_number_pattern: upper
                .label_number_pattern
                .clone()
                .or_else(|| self.label_number_pattern.clone()),
            source_branches: upper
                .source_branches
                .clone()
                .or_else(|| self.source_branches.clone()),
            prevent_increment_of_merged_branch_version: upper
                .prevent_increment_of_merged_branch_version
                .or(self.prevent_increment_of_merged_branch_version),
            track_merge_target: upper.track_merge_target.or(self.track_merge_target),
            track_merge_message: upper.track_merge_message.or(self.track_merge_message),
            tracks_release_branches: upper
                .tracks_release_branches
                .or(self.tracks_release_branches),
            is_mainline: upper.is_mainline.or(self.is_mainline),
            is_release_branch: upper.is_release_branch.or(self.is_release_branch),
            pre_release_weight: upper.pre_release_weight.or(self.pre_release_weight),
            commit_message_incrementing: upper
                .commit_message_incrementing
                .or(self.commit_message_incrementing),
        }
    }
}

/// Returns the default label prefix accepted in front of versions in tags.
fn default_label_prefix() -> String {
    "[vV]?".to_string()
}

/// Returns the default pattern for commit messages that force a major bump.
fn default_major_pattern() -> String {
    r"\+semver:\s?(breaking|major)".to_string()
}

/// Returns the default pattern for commit messages that force a minor bump.
fn default_minor_pattern() -> String {
    r"\+semver:\s?(feature|minor)".to_string()
}

/// Returns the default pattern for commit messages that force a patch bump.
fn default_patch_pattern() -> String {
    r"\+semver:\s?(fix|patch)".to_string()
}

/// Returns the default pattern for commit messages that suppress a bump.
fn default_no_bump_pattern() -> String {
    r"\+semver:\s?(none|skip)".to_string()
}

/// Returns the weighted pre-release number used for versions without a label.
fn default_label_pre_release_weight() -> u32 {
    60000
}

/// Complete configuration for version calculation.
///
/// Holds the global settings, the global branch defaults, per-archetype
/// configurations keyed by archetype name and per-branch overrides keyed by
/// exact branch name.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Config {
    #[serde(default = "default_label_prefix")]
    pub label_prefix: String,

    #[serde(default)]
    pub next_version: Option<String>,

    #[serde(default = "default_major_pattern")]
    pub major_version_bump_message: String,

    #[serde(default = "default_minor_pattern")]
    pub minor_version_bump_message: String,

    #[serde(default = "default_patch_pattern")]
    pub patch_version_bump_message: String,

    #[serde(default = "default_no_bump_pattern")]
    pub no_bump_message: String,

    #[serde(default = "default_label_pre_release_weight")]
    pub label_pre_release_weight: u32,

    #[serde(default)]
    pub defaults: BranchConfiguration,

    #[serde(default)]
    pub branches: BTreeMap<String, BranchConfiguration>,

    #[serde(default)]
    pub overrides: BTreeMap<String, BranchConfiguration>,
}

fn sources(names: &[&str]) -> Option<Vec<String>> {
    Some(names.iter().map(|name| name.to_string()).collect())
}

/// Global branch defaults of the GitFlow workflow.
fn gitflow_defaults() -> BranchConfiguration {
    BranchConfiguration {
        regex: None,
        increment: Some(IncrementStrategy::Inherit),
        mode: Some(VersioningMode::ContinuousDelivery),
        label: Some("{BranchName}".to_string()),
        label_number_pattern: None,
        source_branches: Some(Vec::new()),
        prevent_increment_of_merged_branch_version: Some(false),
        track_merge_target: Some(false),
        track_merge_message: Some(true),
        tracks_release_branches: Some(false),
        is_mainline: Some(false),
        is_release_branch: Some(false),
        pre_release_weight: Some(60000),
        commit_message_incrementing: Some(CommitMessageIncrementMode::Enabled),
    }
}

/// Per-archetype settings of the GitFlow workflow.
fn gitflow_branches() -> BTreeMap<String, BranchConfiguration> {
    let mut branches = BTreeMap::new();

    branches.insert(
        DEVELOP_BRANCH.to_string(),
        BranchConfiguration {
            regex: Some("^dev(elop)?(ment)?$".to_string()),
            increment: Some(IncrementStrategy::Minor),
            mode: Some(VersioningMode::ContinuousDeployment),
            source_branches: Some(Vec::new()),
            label: Some("alpha".to_string()),
            prevent_increment_of_merged_branch_version: Some(false),
            track_merge_target: Some(true),
            tracks_release_branches: Some(true),
            is_mainline: Some(false),
            is_release_branch: Some(false),
            pre_release_weight: Some(0),
            ..Default::default()
        },
    );

    branches.insert(
        MAIN_BRANCH.to_string(),
        BranchConfiguration {
            regex: Some("^master$|^main$".to_string()),
            increment: Some(IncrementStrategy::Patch),
            source_branches: sources(&[DEVELOP_BRANCH, RELEASE_BRANCH]),
            label: Some(String::new()),
            prevent_increment_of_merged_branch_version: Some(true),
            track_merge_target: Some(false),
            tracks_release_branches: Some(false),
            is_mainline: Some(true),
            is_release_branch: Some(false),
            pre_release_weight: Some(55000),
            ..Default::default()
        },
    );

    branches.insert(
        RELEASE_BRANCH.to_string(),
        BranchConfiguration {
            regex: Some("^releases?[/-]".to_string()),
            increment: Some(IncrementStrategy::None),
            source_branches: sources(&[
                DEVELOP_BRANCH,
                MAIN_BRANCH,
                SUPPORT_BRANCH,
                RELEASE_BRANCH,
            ]),
            label: Some("beta".to_string()),
            prevent_increment_of_merged_branch_version: Some(true),
            track_merge_target: Some(false),
            tracks_release_branches: Some(false),
            is_mainline: Some(false),
            is_release_branch: Some(true),
            pre_release_weight: Some(30000),
            ..Default::default()
        },
    );

    branches.insert(
        FEATURE_BRANCH.to_string(),
        BranchConfiguration {
            regex: Some("^features?[/-]".to_string()),
            increment: Some(IncrementStrategy::Inherit),
            mode: Some(VersioningMode::ContinuousDelivery),
            source_branches: sources(&[
                DEVELOP_BRANCH,
                MAIN_BRANCH,
                RELEASE_BRANCH,
                FEATURE_BRANCH,
                SUPPORT_BRANCH,
                HOTFIX_BRANCH,
            ]),
            label: Some("{BranchName}".to_string()),
            pre_release_weight: Some(30000),
            ..Default::default()
        },
    );

    branches.insert(
        PULL_REQUEST_BRANCH.to_string(),
        BranchConfiguration {
            regex: Some(r"^(pull|pull\-requests|pr)[/-]".to_string()),
            increment: Some(IncrementStrategy::Inherit),
            mode: Some(VersioningMode::ContinuousDelivery),
            source_branches: sources(&[
                DEVELOP_BRANCH,
                MAIN_BRANCH,
                RELEASE_BRANCH,
                FEATURE_BRANCH,
                SUPPORT_BRANCH,
                HOTFIX_BRANCH,
            ]),
            label: Some("PullRequest".to_string()),
            label_number_pattern: Some(r"[/-](?<number>\d+)".to_string()),
            pre_release_weight: Some(30000),
            ..Default::default()
        },
    );

    branches.insert(
        HOTFIX_BRANCH.to_string(),
        BranchConfiguration {
            regex: Some("^hotfix(es)?[/-]".to_string()),
            increment: Some(IncrementStrategy::Inherit),
            mode: Some(VersioningMode::ContinuousDelivery),
            source_branches: sources(&[
                RELEASE_BRANCH,
                MAIN_BRANCH,
                SUPPORT_BRANCH,
                HOTFIX_BRANCH,
            ]),
            label: Some("beta".to_string()),
            pre_release_weight: Some(30000),
            ..Default::default()
        },
    );

    branches.insert(
        SUPPORT_BRANCH.to_string(),
        BranchConfiguration {
            regex: Some("^support[/-]".to_string()),
            increment: Some(IncrementStrategy::Patch),
            source_branches: sources(&[MAIN_BRANCH]),
            label: Some(String::new()),
            prevent_increment_of_merged_branch_version: Some(true),
            track_merge_target: Some(false),
            tracks_release_branches: Some(false),
            is_mainline: Some(true),
            is_release_branch: Some(false),
            pre_release_weight: Some(55000),
            ..Default::default()
        },
    );

    branches.insert(
        UNKNOWN_BRANCH.to_string(),
        BranchConfiguration {
            regex: Some(".*".to_string()),
            label: Some("{BranchName}".to_string()),
            mode: Some(VersioningMode::ContinuousDelivery),
            increment: Some(IncrementStrategy::Inherit),
            source_branches: sources(&[
                MAIN_BRANCH,
                DEVELOP_BRANCH,
                RELEASE_BRANCH,
                FEATURE_BRANCH,
                PULL_REQUEST_BRANCH,
                HOTFIX_BRANCH,
                SUPPORT_BRANCH,
            ]),
            ..Default::default()
        },
    );

    branches
}

impl Default for Config {
    fn default() -> Self {
        Config {
            label_prefix: default_label_prefix(),
            next_version: None,
            major_version_bump_message: default_major_pattern(),
            minor_version_bump_message: default_minor_pattern(),
            patch_version_bump_message: default_patch_pattern(),
            no_bump_message: default_no_bump_pattern(),
            label_pre_release_weight: default_label_pre_release_weight(),
            defaults: gitflow_defaults(),
            branches: gitflow_branches(),
            overrides: BTreeMap::new(),
        }
    }
}

impl Config {
    /// Layer a configuration read from a file over this one.
    ///
    /// Branch-level tables are overlaid field by field, so a file only needs
    /// to mention the settings it changes. Global scalars come from the file,
    /// which already carries the defaults for anything it omits.
    pub fn merged_with(self, file: Config) -> Config {
        let mut branches = self.branches;
        for (name, layer) in file.branches {
            let merged = branches.get(&name).cloned().unwrap_or_default().overlay(&layer);
            branches.insert(name, merged);
        }

        let mut overrides = self.overrides;
        for (name, layer) in file.overrides {
            let merged = overrides.get(&name).cloned().unwrap_or_default().overlay(&layer);
            overrides.insert(name, merged);
        }

        Config {
            label_prefix: file.label_prefix,
            next_version: file.next_version.or(self.next_version),
            major_version_bump_message: file.major_version_bump_message,
            minor_version_bump_message: file.minor_version_bump_message,
            patch_version_bump_message: file.patch_version_bump_message,
            no_bump_message: file.no_bump_message,
            label_pre_release_weight: file.label_pre_release_weight,
            defaults: self.defaults.overlay(&file.defaults),
            branches,
            overrides,
        }
    }

    /// Global defaults overlaid with the archetype's own settings
    pub fn archetype_configuration(&self, archetype: &str) -> BranchConfiguration {
        match self.branches.get(archetype) {
            Some(branch) => self.defaults.overlay(branch),
            None => self.defaults.clone(),
        }
    }

    /// Whether the named archetype is configured as a release branch
    pub fn is_release_branch(&self, archetype: &str) -> bool {
        self.archetype_configuration(archetype)
            .is_release_branch
            .unwrap_or(false)
    }

    /// `(name, regex)` pairs in matching order.
    ///
    /// Built-in archetypes keep their GitFlow order; additional archetypes
    /// from the configuration file are placed before `unknown` in name order.
    pub fn catalog_entries(&self) -> Result<Vec<(String, String)>> {
        let custom = self
            .branches
            .keys()
            .filter(|name| !BUILTIN_ORDER.contains(&name.as_str()))
            .map(String::as_str);

        let ordered = BUILTIN_ORDER[..BUILTIN_ORDER.len() - 1]
            .iter()
            .copied()
            .chain(custom)
            .chain(std::iter::once(UNKNOWN_BRANCH))
            .filter(|name| self.branches.contains_key(*name));

        ordered
            .map(|name| -> Result<(String, String)> {
                let regex = self.branches[name].regex.clone().ok_or_else(|| {
                    GitVersionError::config(format!("Branch '{}' has no regex configured", name))
                })?;
                Ok((name.to_string(), regex))
            })
            .collect()
    }
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `gitversion.toml` in current directory
/// 3. `gitversion.toml` in user config directory
/// 4. Default (GitFlow) configuration if no file found
///
/// A file found at any step is layered over the defaults.
///
/// # Returns
/// * `Ok(Config)` - Loaded or default configuration
/// * `Err` - If file exists but cannot be read or parsed
pub fn load_config(config_path: Option<&str>) -> Result<Config> {
    let config_str = if let Some(path) = config_path {
        fs::read_to_string(path)?
    } else if Path::new(CONFIG_FILE_NAME).exists() {
        fs::read_to_string(CONFIG_FILE_NAME)?
    } else if let Some(config_dir) = dirs::config_dir() {
        let config_path = config_dir.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            fs::read_to_string(config_path)?
        } else {
            return Ok(Config::default());
        }
    } else {
        return Ok(Config::default());
    };

    parse_config(&config_str)
}

/// Parse configuration text and layer it over the defaults
pub fn parse_config(text: &str) -> Result<Config> {
    let file: Config = toml::from_str(text)?;
    Ok(Config::default().merged_with(file))
}
