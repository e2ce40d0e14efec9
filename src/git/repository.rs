use crate::error::{GitVersionError, Result};
use crate::git::{HistorySnapshot, HistoryView};
use git2::{BranchType, ErrorCode, Oid, Repository as Git2Repo};
use std::path::Path;

/// Name used for the branch when HEAD is detached
pub const DETACHED_HEAD: &str = "HEAD";

/// Reads a git repository into a [`HistorySnapshot`]
pub struct Git2Repository {
    repo: Git2Repo,
}

impl Git2Repository {
    /// Open or discover a git repository
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let repo = Git2Repo::discover(path)?;

        Ok(Git2Repository { repo })
    }

    /// Create from existing git2::Repository
    pub fn from_git2(repo: Git2Repo) -> Self {
        Git2Repository { repo }
    }

    /// Short name of the branch HEAD points at.
    ///
    /// Works for unborn branches (fresh repository). Returns `HEAD` when
    /// detached.
    pub fn current_branch(&self) -> Result<String> {
        match self.repo.head() {
            Ok(head) if head.is_branch() => Ok(head.shorthand().unwrap_or(DETACHED_HEAD).to_string()),
            Ok(_) => Ok(DETACHED_HEAD.to_string()),
            Err(e) if e.code() == ErrorCode::UnbornBranch => {
                let head = self.repo.find_reference("HEAD")?;
                let target = head.symbolic_target().ok_or_else(|| {
                    GitVersionError::precondition("HEAD does not point at a branch")
                })?;
                Ok(target.trim_start_matches("refs/heads/").to_string())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Materialize the history of `branch` (HEAD's branch when `None`)
    pub fn snapshot(&self, branch: Option<&str>) -> Result<HistorySnapshot> {
        let branch_name = match branch {
            Some(name) => name.to_string(),
            None => self.current_branch()?,
        };

        let mut snapshot = HistorySnapshot::new(&branch_name);
        let Some(tip) = self.branch_tip(&branch_name)? else {
            tracing::debug!(branch = %branch_name, "branch has no commits");
            return Ok(snapshot);
        };

        let mut revwalk = self.repo.revwalk()?;
        revwalk.push(tip)?;

        for oid_result in revwalk {
            let oid = oid_result?;
            let commit = self.repo.find_commit(oid)?;
            let message = String::from_utf8_lossy(commit.message_bytes()).into_owned();
            snapshot.add_commit(oid, commit.parent_ids().collect(), message);
        }
        snapshot.set_tip(tip);

        let tags = self.repo.tag_names(None)?;
        for name in tags.iter().flatten() {
            let reference = self.repo.find_reference(&format!("refs/tags/{}", name))?;
            // Tags on trees or blobs carry no version for us.
            let Ok(commit) = reference.peel_to_commit() else {
                continue;
            };
            if snapshot.contains(commit.id()) {
                snapshot.add_tag(name, commit.id());
            }
        }

        if let Some(fork_point) = self.fork_point(&branch_name, tip, &snapshot)? {
            snapshot.set_fork_point(fork_point);
        }

        tracing::debug!(
            branch = %branch_name,
            commits = snapshot.commit_count(),
            "materialized history"
        );
        Ok(snapshot)
    }

    fn branch_tip(&self, branch_name: &str) -> Result<Option<Oid>> {
        if branch_name == DETACHED_HEAD {
            return Ok(self.repo.head()?.target());
        }

        match self.repo.find_branch(branch_name, BranchType::Local) {
            Ok(branch) => Ok(branch.get().target()),
            Err(e) if e.code() == ErrorCode::NotFound => {
                // An unborn HEAD branch exists by name only.
                if self.repo.head_detached()? || self.current_branch()? != branch_name {
                    return Err(GitVersionError::precondition(format!(
                        "Cannot find branch '{}'",
                        branch_name
                    )));
                }
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Closest merge base between `tip` and the head of any other local branch
    fn fork_point(
        &self,
        branch_name: &str,
        tip: Oid,
        snapshot: &HistorySnapshot,
    ) -> Result<Option<Oid>> {
        let mut best: Option<(usize, Oid)> = None;

        for branch_result in self.repo.branches(Some(BranchType::Local))? {
            let (branch, _) = branch_result?;
            if branch.name()? == Some(branch_name) {
                continue;
            }
            let Some(head) = branch.get().target() else {
                continue;
            };

            let base = match self.repo.merge_base(tip, head) {
                Ok(base) => base,
                Err(e) if e.code() == ErrorCode::NotFound => continue,
                Err(e) => return Err(e.into()),
            };
            // Our whole history is contained in the other branch.
            if base == tip {
                continue;
            }

            let distance = snapshot.distance(Some(base), tip)?;
            if best.map_or(true, |(closest, _)| distance < closest) {
                best = Some((distance, base));
            }
        }

        Ok(best.map(|(_, base)| base))
    }
}
