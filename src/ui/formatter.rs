//! Pure formatting functions for UI output.
//!
//! Rendering is split from printing so the text can be tested; `display_*`
//! functions only print what the `format_*` functions return.

use console::style;

use crate::calculator::VersionResult;
use crate::warning::CalculationWarning;

/// Format and print an error message in red.
pub fn display_error(message: &str) {
    eprintln!("{} {}", style("ERROR:").red().bold(), message);
}

/// Format and print a warning with a yellow marker.
pub fn display_warning(warning: &CalculationWarning) {
    eprintln!("{} {}", style("⚠ WARNING:").yellow(), warning);
}

/// Render the calculated variables as aligned `Name: value` lines.
pub fn format_variables(result: &VersionResult) -> String {
    let variables = result.variables();
    let width = variables
        .iter()
        .map(|(name, _)| name.len())
        .max()
        .unwrap_or(0);

    variables
        .iter()
        .map(|(name, value)| format!("{:<width$}  {}", format!("{}:", name), value, width = width + 1))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Render the one-paragraph summary shown above the variables.
pub fn format_summary(result: &VersionResult) -> String {
    format!(
        "{} on '{}' ({})\n  from {} + {}",
        result.version, result.branch_name, result.archetype, result.base_version_source, result.increment
    )
}

/// Display the full calculation result.
pub fn display_result(result: &VersionResult) {
    println!("{}", style(format_summary(result)).bold());
    println!("{}", format_variables(result));
}

/// Display a single variable value, unstyled so it can be captured by scripts.
pub fn display_variable(value: &str) {
    println!("{}", value);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{SemanticVersion, VersionBump};
    use crate::strategies::VersionStrategy;

    fn result() -> VersionResult {
        VersionResult {
            version: SemanticVersion::parse("1.3.0-alpha.4").unwrap(),
            branch_name: "develop".to_string(),
            archetype: "develop".to_string(),
            base_version_source: "Git tag 'v1.2.0'".to_string(),
            base_version_commit: None,
            strategy: VersionStrategy::TaggedCommit,
            increment: VersionBump::Minor,
            commits_since_base: 4,
            weighted_pre_release_number: 4,
            warnings: Vec::new(),
        }
    }

    #[test]
    fn test_format_variables_aligns_values() {
        let text = format_variables(&result());
        let lines: Vec<&str> = text.lines().collect();

        assert!(lines.contains(&"Major:                      1"));
        assert!(lines.iter().any(|l| l.starts_with("FullSemVer:") && l.ends_with("1.3.0-alpha.4")));
        let columns: Vec<usize> = lines
            .iter()
            .map(|l| l.len() - l.trim_start_matches(|c: char| !c.is_whitespace()).trim_start().len())
            .collect();
        assert!(columns.windows(2).all(|pair| pair[0] == pair[1]));
    }

    #[test]
    fn test_format_summary() {
        let summary = format_summary(&result());
        assert_eq!(
            summary,
            "1.3.0-alpha.4 on 'develop' (develop)\n  from Git tag 'v1.2.0' + minor"
        );
    }

    #[test]
    fn test_display_error() {
        // Visual verification test - output is printed to stderr
        display_error("test error");
    }
}
