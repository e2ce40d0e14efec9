//! Read-only history access
//!
//! Version calculation never talks to git directly. It consumes a
//! [`HistoryView`]: an immutable view of the current branch, its commits and
//! the tags reachable from it.
//!
//! # Overview
//!
//! - [`snapshot::HistorySnapshot`]: an in-memory commit graph implementing
//!   the trait, built by hand in tests or materialized from a repository
//! - [`repository::Git2Repository`]: reads a real repository with `git2` and
//!   produces a snapshot
//!
//! ```rust
//! # use gitversion::git::HistoryView;
//! # fn example(history: &dyn HistoryView) -> gitversion::Result<()> {
//! if let Some(tip) = history.tip() {
//!     let commits = history.commits_between(None, tip)?;
//!     println!("{} has {} commits", history.current_branch(), commits.len());
//! }
//! # Ok(())
//! # }
//! ```

pub mod repository;
pub mod snapshot;

pub use repository::Git2Repository;
pub use snapshot::HistorySnapshot;

use crate::error::Result;
use git2::Oid;

/// Commit information for analysis
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitInfo {
    pub id: Oid,
    pub message: String,
    pub parent_count: usize,
}

impl CommitInfo {
    /// A commit with more than one parent
    pub fn is_merge(&self) -> bool {
        self.parent_count > 1
    }
}

/// A tag and the commit it points at (annotated tags already peeled)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagInfo {
    pub name: String,
    pub target: Oid,
}

/// Immutable view of the history needed to calculate a version
///
/// Implementors must be `Send + Sync`: strategies read the view concurrently.
pub trait HistoryView: Send + Sync {
    /// Name of the branch being versioned
    fn current_branch(&self) -> &str;

    /// Tip commit of the current branch, `None` when it has no commits
    fn tip(&self) -> Option<Oid>;

    /// First commit reachable from the tip following first parents
    fn root_commit(&self) -> Option<Oid>;

    /// Commit where the current branch diverged from the branch it was
    /// created from, when known
    fn fork_point(&self) -> Option<Oid>;

    /// Commits reachable from `to` but not from `from`, oldest first.
    ///
    /// `from` is exclusive and `to` inclusive; with `from = None` every commit
    /// reachable from `to` is returned.
    fn commits_between(&self, from: Option<Oid>, to: Oid) -> Result<Vec<CommitInfo>>;

    /// Tags whose target is reachable from `from` (including `from` itself)
    fn tags_reachable_from(&self, from: Oid) -> Result<Vec<TagInfo>>;

    /// Number of commits in `(from, to]`
    fn distance(&self, from: Option<Oid>, to: Oid) -> Result<usize> {
        Ok(self.commits_between(from, to)?.len())
    }
}
