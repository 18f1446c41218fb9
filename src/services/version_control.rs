use async_trait::async_trait;

use crate::domain::change::ChangeEntry;
use crate::error::AppResult;

/// Which side of the index a diff is taken against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiffTarget {
    /// Unstaged changes in the working tree.
    WorkingTree,
    /// Changes already recorded in the index.
    Staged,
}

#[async_trait]
pub trait VersionControlService: Send + Sync {
    async fn list_changes(&self) -> AppResult<Vec<ChangeEntry>>;
    async fn list_staged(&self) -> AppResult<Vec<ChangeEntry>>;
    async fn diff(&self, path: &str, target: DiffTarget) -> AppResult<String>;
    /// Records the entry's current working-tree state in the index, including
    /// deletions that are already staged.
    async fn stage(&self, entry: &ChangeEntry) -> AppResult<()>;
    /// Commits everything in the index.
    async fn commit(&self, message: &str) -> AppResult<()>;
    /// Commits only `paths`, leaving anything else in the index untouched.
    async fn commit_paths(&self, message: &str, paths: &[String]) -> AppResult<()>;
}
