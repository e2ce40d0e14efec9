use std::fmt;

/// Non-fatal issues found while calculating a version.
/// These are reported to the user but do not stop the calculation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CalculationWarning {
    /// `inherit` increment could not be resolved through any source branch
    /// and fell back to no increment
    UnresolvedInheritance { branch: String, archetype: String },
    /// A source branch names an archetype that is not configured
    UnknownSourceBranch { archetype: String, source: String },
}

impl fmt::Display for CalculationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CalculationWarning::UnresolvedInheritance { branch, archetype } => {
                write!(
                    f,
                    "Branch '{}' ({}) inherits its increment but no source branch resolves it; not incrementing",
                    branch, archetype
                )
            }
            CalculationWarning::UnknownSourceBranch { archetype, source } => {
                write!(
                    f,
                    "Branch type '{}' lists unknown source branch '{}'",
                    archetype, source
                )
            }
        }
    }
}
