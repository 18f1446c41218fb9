use std::io;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use crate::domain::change::ChangeEntry;
use crate::error::{AppError, AppResult};
use crate::services::{DiffTarget, VersionControlService};

/// Version-control gateway that shells out to the `git` binary.
///
/// Arguments are always passed as a vector and paths follow `--`, so file
/// names are never interpreted by a shell or as options.
#[derive(Debug)]
pub struct GitCli {
    workspace_root: PathBuf,
}

impl GitCli {
    pub fn new(workspace_root: PathBuf) -> Self {
        Self { workspace_root }
    }

    /// Resolves the repository top level containing `dir`.
    pub async fn discover(dir: &Path) -> AppResult<Self> {
        let output = Command::new("git")
            .args(["rev-parse", "--show-toplevel"])
            .current_dir(dir)
            .output()
            .await
            .map_err(spawn_error)?;

        if !output.status.success() {
            return Err(AppError::Environment(format!(
                "{} is not inside a git repository",
                dir.display()
            )));
        }

        let root = String::from_utf8_lossy(&output.stdout).trim().to_string();
        Ok(Self::new(PathBuf::from(root)))
    }

    pub fn workspace_root(&self) -> &Path {
        &self.workspace_root
    }

    async fn run(&self, args: &[&str]) -> AppResult<String> {
        debug!(?args, root = %self.workspace_root.display(), "running git");
        let output = Command::new("git")
            .arg("-c")
            .arg("core.quotePath=false")
            .args(args)
            .current_dir(&self.workspace_root)
            .output()
            .await
            .map_err(spawn_error)?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();
            let detail = if stderr.is_empty() { stdout } else { stderr };
            let subcommand = args.first().copied().unwrap_or("git");
            return Err(AppError::VersionControl(format!(
                "git {subcommand} exited with {}: {detail}",
                output.status
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

fn spawn_error(err: io::Error) -> AppError {
    if err.kind() == io::ErrorKind::NotFound {
        AppError::Environment("git is not installed or not on PATH".to_string())
    } else {
        AppError::Io(err)
    }
}

#[async_trait]
impl VersionControlService for GitCli {
    async fn list_changes(&self) -> AppResult<Vec<ChangeEntry>> {
        let output = self
            .run(&["status", "--porcelain", "--untracked-files=all"])
            .await?;
        Ok(output
            .lines()
            .filter_map(ChangeEntry::from_porcelain_line)
            .collect())
    }

    async fn list_staged(&self) -> AppResult<Vec<ChangeEntry>> {
        let output = self.run(&["diff", "--cached", "--name-status"]).await?;
        Ok(output
            .lines()
            .filter_map(ChangeEntry::from_name_status_line)
            .collect())
    }

    async fn diff(&self, path: &str, target: DiffTarget) -> AppResult<String> {
        match target {
            DiffTarget::WorkingTree => self.run(&["diff", "--", path]).await,
            DiffTarget::Staged => self.run(&["diff", "--cached", "--", path]).await,
        }
    }

    async fn stage(&self, entry: &ChangeEntry) -> AppResult<()> {
        let path = entry.path.as_str();
        if entry.is_deleted() {
            // `add` rejects a path that is gone from both the tree and the index.
            self.run(&["rm", "--cached", "--quiet", "--ignore-unmatch", "--", path])
                .await?;
        } else {
            self.run(&["add", "--", path]).await?;
        }
        Ok(())
    }

    async fn commit(&self, message: &str) -> AppResult<()> {
        self.run(&["commit", "-m", message]).await?;
        Ok(())
    }

    async fn commit_paths(&self, message: &str, paths: &[String]) -> AppResult<()> {
        let mut args = vec!["commit", "-m", message, "--only", "--"];
        args.extend(paths.iter().map(String::as_str));
        self.run(&args).await?;
        Ok(())
    }
}
