//! Pre-release label templates
//!
//! A label template may contain `{BranchName}` and `{Number}`:
//!
//! | Template        | Branch            | Label           |
//! |-----------------|-------------------|-----------------|
//! | `{BranchName}`  | `feature/login`   | `login`         |
//! | `{BranchName}`  | `wip/foo`         | `wip-foo`       |
//! | `PullRequest`   | `pull/42`         | `PullRequest42` |
//! | `pr{Number}`    | `pull/42`         | `pr42`          |

use crate::domain::merge_message::trim_branch_prefix;
use crate::domain::BranchArchetype;
use crate::error::{GitVersionError, Result};
use regex::{Regex, RegexBuilder};

const BRANCH_NAME_TOKEN: &str = "BranchName";
const NUMBER_TOKEN: &str = "Number";

/// Renders label templates for one branch archetype
pub struct LabelFormatter<'a> {
    archetype: &'a BranchArchetype,
    number_pattern: Option<Regex>,
}

impl<'a> LabelFormatter<'a> {
    /// Compile the archetype's label number pattern, if it has one
    pub fn new(archetype: &'a BranchArchetype, label_number_pattern: Option<&str>) -> Result<Self> {
        let number_pattern = label_number_pattern
            .map(|pattern| {
                RegexBuilder::new(pattern)
                    .case_insensitive(true)
                    .build()
                    .map_err(|e| {
                        GitVersionError::config(format!(
                            "Invalid label number pattern '{}' for branch '{}': {}",
                            pattern, archetype.name, e
                        ))
                    })
            })
            .transpose()?;

        Ok(LabelFormatter {
            archetype,
            number_pattern,
        })
    }

    /// Render `template` for `branch_name`
    ///
    /// # Errors
    /// Configuration error for an unknown `{token}`, or for `{Number}` when
    /// no number can be taken from the branch name.
    pub fn format(&self, template: &str, branch_name: &str) -> Result<String> {
        let branch_name = trim_branch_prefix(branch_name);
        let number = self.number(&branch_name);

        let token = Regex::new(r"\{([^{}]*)\}").map_err(|e| GitVersionError::config(e.to_string()))?;
        let mut label = String::with_capacity(template.len());
        let mut last = 0;
        let mut used_number = false;

        for captures in token.captures_iter(template) {
            let (Some(whole), Some(name)) = (captures.get(0), captures.get(1)) else {
                continue;
            };
            label.push_str(&template[last..whole.start()]);
            last = whole.end();

            match name.as_str() {
                BRANCH_NAME_TOKEN => label.push_str(&self.branch_name_value(&branch_name)),
                NUMBER_TOKEN => {
                    let value = number.as_deref().ok_or_else(|| {
                        GitVersionError::config(format!(
                            "Label '{}' uses {{Number}} but no number was found in branch '{}'",
                            template, branch_name
                        ))
                    })?;
                    label.push_str(value);
                    used_number = true;
                }
                other => {
                    return Err(GitVersionError::config(format!(
                        "Unknown token '{{{}}}' in label '{}'",
                        other, template
                    )))
                }
            }
        }
        label.push_str(&template[last..]);

        if !used_number {
            if let Some(number) = number {
                label.push_str(&number);
            }
        }

        Ok(label)
    }

    /// `{BranchName}`: archetype prefix removed, anything outside
    /// `[a-zA-Z0-9-]` replaced by `-`
    fn branch_name_value(&self, branch_name: &str) -> String {
        self.archetype
            .trim_prefix(branch_name)
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '-' })
            .collect()
    }

    fn number(&self, branch_name: &str) -> Option<String> {
        let captures = self.number_pattern.as_ref()?.captures(branch_name)?;
        Some(captures.name("number")?.as_str().to_string())
    }
}
