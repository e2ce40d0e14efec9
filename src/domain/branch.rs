use crate::domain::merge_message::trim_branch_prefix;
use crate::error::{GitVersionError, Result};
use regex::{Regex, RegexBuilder};

/// A named class of branch identified by a naming pattern
#[derive(Debug, Clone)]
pub struct BranchArchetype {
    pub name: String,
    pub naming_pattern: Regex,
}

impl BranchArchetype {
    /// Compile an archetype; patterns always match case-insensitively
    pub fn new(name: impl Into<String>, pattern: &str) -> Result<Self> {
        let name = name.into();
        let naming_pattern = RegexBuilder::new(pattern)
            .case_insensitive(true)
            .build()
            .map_err(|e| {
                GitVersionError::config(format!(
                    "Invalid naming pattern '{}' for branch '{}': {}",
                    pattern, name, e
                ))
            })?;

        Ok(BranchArchetype {
            name,
            naming_pattern,
        })
    }

    /// Check whether a branch name belongs to this archetype
    pub fn matches(&self, branch_name: &str) -> bool {
        self.naming_pattern.is_match(branch_name)
    }

    /// Remove the part of the name matched by the naming pattern, e.g.
    /// "feature/login" -> "login".
    ///
    /// Only a strict prefix is removed; a pattern that matches the whole name
    /// (or not at the start) leaves it untouched.
    pub fn trim_prefix<'a>(&self, branch_name: &'a str) -> &'a str {
        match self.naming_pattern.find(branch_name) {
            Some(m) if m.start() == 0 && m.end() > 0 && m.end() < branch_name.len() => {
                &branch_name[m.end()..]
            }
            _ => branch_name,
        }
    }
}

impl PartialEq for BranchArchetype {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.naming_pattern.as_str() == other.naming_pattern.as_str()
    }
}

impl Eq for BranchArchetype {}

/// Ordered list of branch archetypes
///
/// The last entry is the catch-all: it is returned for any branch name that
/// no earlier entry matches, so classification never fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchCatalog {
    archetypes: Vec<BranchArchetype>,
}

impl BranchCatalog {
    /// Build a catalog from `(name, pattern)` pairs in matching order
    pub fn new<I, N, P>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (N, P)>,
        N: Into<String>,
        P: AsRef<str>,
    {
        let archetypes = entries
            .into_iter()
            .map(|(name, pattern)| BranchArchetype::new(name, pattern.as_ref()))
            .collect::<Result<Vec<_>>>()?;

        if archetypes.is_empty() {
            return Err(GitVersionError::config(
                "Branch catalog must contain at least one archetype",
            ));
        }

        Ok(BranchCatalog { archetypes })
    }

    /// Classify a branch name; the first matching archetype wins
    pub fn classify(&self, branch_name: &str) -> &BranchArchetype {
        let name = trim_branch_prefix(branch_name);
        let archetype = self
            .archetypes
            .iter()
            .find(|archetype| archetype.matches(&name))
            .unwrap_or_else(|| self.catch_all());

        tracing::debug!(branch = %branch_name, archetype = %archetype.name, "classified branch");
        archetype
    }

    /// The final, catch-all archetype
    pub fn catch_all(&self) -> &BranchArchetype {
        // `new` rejects empty catalogs
        &self.archetypes[self.archetypes.len() - 1]
    }

    /// Look up an archetype by name
    pub fn get(&self, name: &str) -> Option<&BranchArchetype> {
        self.archetypes.iter().find(|a| a.name == name)
    }
}
