use crate::error::{GitVersionError, Result};
use crate::git::{CommitInfo, HistoryView, TagInfo};
use git2::Oid;
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone, PartialEq, Eq)]
struct SnapshotCommit {
    message: String,
    parents: Vec<Oid>,
}

/// In-memory commit graph of one branch
///
/// Built once, then only read. Used both for repositories materialized by
/// [`crate::git::Git2Repository`] and for hand-built histories in tests.
#[derive(Debug, Clone, Default)]
pub struct HistorySnapshot {
    branch: String,
    tip: Option<Oid>,
    fork_point: Option<Oid>,
    commits: HashMap<Oid, SnapshotCommit>,
    tags: Vec<TagInfo>,
}

impl HistorySnapshot {
    /// Create an empty snapshot for a branch with no commits
    pub fn new(branch: impl Into<String>) -> Self {
        HistorySnapshot {
            branch: branch.into(),
            ..Default::default()
        }
    }

    /// Add a commit with its parents (first parent first)
    pub fn add_commit(&mut self, id: Oid, parents: Vec<Oid>, message: impl Into<String>) {
        self.commits.insert(
            id,
            SnapshotCommit {
                message: message.into(),
                parents,
            },
        );
    }

    /// Set the tip of the current branch
    pub fn set_tip(&mut self, id: Oid) {
        self.tip = Some(id);
    }

    /// Record where the current branch diverged from its source
    pub fn set_fork_point(&mut self, id: Oid) {
        self.fork_point = Some(id);
    }

    /// Add a tag pointing to a commit
    pub fn add_tag(&mut self, name: impl Into<String>, target: Oid) {
        self.tags.push(TagInfo {
            name: name.into(),
            target,
        });
    }

    pub fn contains(&self, id: Oid) -> bool {
        self.commits.contains_key(&id)
    }

    pub fn commit_count(&self) -> usize {
        self.commits.len()
    }

    fn commit(&self, id: Oid) -> Result<&SnapshotCommit> {
        self.commits.get(&id).ok_or_else(|| {
            GitVersionError::precondition(format!("Commit {} is not part of the history", id))
        })
    }

    fn info(&self, id: Oid) -> Result<CommitInfo> {
        let commit = self.commit(id)?;
        Ok(CommitInfo {
            id,
            message: commit.message.clone(),
            parent_count: commit.parents.len(),
        })
    }

    /// All commits reachable from `start`, including it
    fn ancestors(&self, start: Oid) -> Result<HashSet<Oid>> {
        let mut seen = HashSet::new();
        let mut stack = vec![start];

        while let Some(id) = stack.pop() {
            if !seen.insert(id) {
                continue;
            }
            stack.extend(self.commit(id)?.parents.iter().copied());
        }

        Ok(seen)
    }
}

impl HistoryView for HistorySnapshot {
    fn current_branch(&self) -> &str {
        &self.branch
    }

    fn tip(&self) -> Option<Oid> {
        self.tip
    }

    fn root_commit(&self) -> Option<Oid> {
        let mut current = self.tip?;
        while let Some(parent) = self
            .commits
            .get(&current)
            .and_then(|commit| commit.parents.first())
        {
            current = *parent;
        }
        Some(current)
    }

    fn fork_point(&self) -> Option<Oid> {
        self.fork_point
    }

    fn commits_between(&self, from: Option<Oid>, to: Oid) -> Result<Vec<CommitInfo>> {
        let excluded = match from {
            Some(from) => self.ancestors(from)?,
            None => HashSet::new(),
        };

        // Post-order walk: parents are emitted before their children.
        let mut ordered = Vec::new();
        let mut visited = HashSet::new();
        let mut stack = vec![(to, false)];

        while let Some((id, expanded)) = stack.pop() {
            if expanded {
                ordered.push(self.info(id)?);
                continue;
            }
            if excluded.contains(&id) || !visited.insert(id) {
                continue;
            }

            stack.push((id, true));
            for parent in self.commit(id)?.parents.iter().rev() {
                if !visited.contains(parent) && !excluded.contains(parent) {
                    stack.push((*parent, false));
                }
            }
        }

        Ok(ordered)
    }

    fn tags_reachable_from(&self, from: Oid) -> Result<Vec<TagInfo>> {
        let reachable = self.ancestors(from)?;
        let mut tags: Vec<TagInfo> = self
            .tags
            .iter()
            .filter(|tag| reachable.contains(&tag.target))
            .cloned()
            .collect();
        tags.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(tags)
    }
}
