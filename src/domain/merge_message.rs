use regex::Regex;

/// Known merge message layouts, tried in order.
///
/// Each expression captures the merged branch as `source` and optionally the
/// branch merged into as `target` and a pull request number as `pr`.
const MERGE_FORMATS: &[(&str, &str)] = &[
    (
        "Default",
        r"^Merge (?:branch|tag) '(?P<source>[^']*)'(?: into (?P<target>[^\s]*))*",
    ),
    (
        "SmartGit",
        r"^Finish (?P<source>[^\s]*)(?: into (?P<target>[^\s]*))*",
    ),
    (
        "BitBucketPull",
        r"^Merge pull request #(?P<pr>\d+) (?:from|in) (?:.*) from (?P<source>[^\s]*) to (?P<target>[^\s]*)",
    ),
    (
        "BitBucketPullv7",
        r"^Pull request #(?P<pr>\d+).*\r?\n\r?\nMerge in (?:.*) from (?P<source>[^\s]*) to (?P<target>[^\s]*)",
    ),
    (
        "GitHubPull",
        r"^Merge pull request #(?P<pr>\d+) (?:from|in) (?:[^\s/]+/)?(?P<source>[^\s]*)(?: into (?P<target>[^\s]*))*",
    ),
    (
        "RemoteTracking",
        r"^Merge remote-tracking branch '(?P<source>[^\s]*)'(?: into (?P<target>[^\s]*))*",
    ),
    (
        "AzureDevOpsPull",
        r"^Merge pull request (?P<pr>\d+) from (?P<source>[^\s]*) into (?P<target>[^\s]*)",
    ),
];

/// Parsed representation of a merge commit message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeMessage {
    /// Name of the layout that matched
    pub format: &'static str,
    /// The branch that was merged in, remote and ref prefixes removed
    pub merged_branch: String,
    /// The branch merged into, when the message names it
    pub target_branch: Option<String>,
    /// Pull request number, for pull request layouts
    pub pull_request_number: Option<u64>,
}

impl MergeMessage {
    /// Parse a merge commit message
    ///
    /// Returns `None` for messages that match none of the known layouts.
    pub fn parse(message: &str) -> Option<Self> {
        for &(format, pattern) in MERGE_FORMATS {
            let Some(captures) = Regex::new(pattern)
                .ok()
                .and_then(|re| re.captures(message))
            else {
                continue;
            };

            let merged_branch = captures
                .name("source")
                .map(|m| trim_branch_prefix(m.as_str()))
                .unwrap_or_default();
            if merged_branch.is_empty() {
                continue;
            }

            return Some(MergeMessage {
                format,
                merged_branch,
                target_branch: captures
                    .name("target")
                    .map(|m| trim_branch_prefix(m.as_str())),
                pull_request_number: captures
                    .name("pr")
                    .and_then(|m| m.as_str().parse::<u64>().ok()),
            });
        }

        None
    }
}

/// Strip `refs/heads/`, `refs/remotes/<remote>/` and `origin/` from a ref name
pub fn trim_branch_prefix(name: &str) -> String {
    let name = name.trim();
    if let Some(rest) = name.strip_prefix("refs/heads/") {
        return rest.to_string();
    }
    if let Some(rest) = name.strip_prefix("refs/remotes/") {
        return rest
            .split_once('/')
            .map(|(_, branch)| branch)
            .unwrap_or(rest)
            .to_string();
    }
    name.strip_prefix("origin/").unwrap_or(name).to_string()
}
