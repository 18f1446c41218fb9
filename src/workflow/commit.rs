use std::fmt;

use tracing::{debug, warn};

use crate::context::AppContext;
use crate::domain::change::{ChangeEntry, DiffSummary};
use crate::domain::credential::ApiCredential;
use crate::error::{AppError, AppResult};
use crate::services::{DiffTarget, Interaction, NoticeLevel};
use crate::workflow::credential::resolve_credential;
use crate::workflow::generate::generate_commit_message;

const SELECT_TITLE: &str = "Select files to commit";
const CONFIRM_PROMPT: &str = "Commit message (Enter to accept, clear to cancel)";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionState {
    Idle,
    ListingChanges,
    SelectingFiles,
    BuildingSummary,
    GeneratingMessage,
    Staging,
    Committing,
    Done,
    Aborted,
    Failed,
}

impl ActionState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, ActionState::Done | ActionState::Aborted | ActionState::Failed)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitAction {
    /// Pick files interactively and commit them together.
    SelectAndCommit,
    /// Commit every changed file separately.
    CommitAll,
    /// Commit what is already staged, after confirmation.
    CommitStaged { confirm: bool },
}

impl fmt::Display for CommitAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommitAction::SelectAndCommit => f.write_str("select-and-commit"),
            CommitAction::CommitAll => f.write_str("commit-all"),
            CommitAction::CommitStaged { .. } => f.write_str("commit-staged"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitRecord {
    pub message: String,
    pub files: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileFailure {
    pub path: String,
    pub error: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionOutcome {
    pub state: ActionState,
    pub commits: Vec<CommitRecord>,
    pub failures: Vec<FileFailure>,
    pub notice: String,
}

impl ActionOutcome {
    pub fn is_failure(&self) -> bool {
        self.state == ActionState::Failed
    }

    /// Reports an error raised before an action could start, such as running
    /// outside a repository, as that action's single notification.
    pub fn setup_failed(interaction: &dyn Interaction, error: &AppError) -> Self {
        let notice = failure_notice(error);
        interaction.notify(NoticeLevel::Error, &notice);
        Self {
            state: ActionState::Failed,
            commits: Vec::new(),
            failures: Vec::new(),
            notice,
        }
    }
}

fn failure_notice(error: &AppError) -> String {
    format!("Auto-commit failed: {error}")
}

enum Finish {
    Committed(CommitRecord),
    Each {
        commits: Vec<CommitRecord>,
        failures: Vec<FileFailure>,
        total: usize,
    },
    Aborted(String),
}

/// Drives one commit action from listing to the final notification.
pub struct CommitOrchestrator<'a> {
    ctx: &'a AppContext,
    state: ActionState,
}

impl<'a> CommitOrchestrator<'a> {
    pub fn new(ctx: &'a AppContext) -> Self {
        Self {
            ctx,
            state: ActionState::Idle,
        }
    }

    pub fn state(&self) -> ActionState {
        self.state
    }

    /// Runs `action` to a terminal state. Errors never escape: they become the
    /// outcome's single notification.
    pub async fn run(&mut self, action: CommitAction) -> ActionOutcome {
        debug!(%action, "starting action");
        let result = match action {
            CommitAction::SelectAndCommit => self.select_and_commit().await,
            CommitAction::CommitAll => self.commit_all().await,
            CommitAction::CommitStaged { confirm } => self.commit_staged(confirm).await,
        };

        let outcome = match result {
            Ok(Finish::Committed(record)) => {
                self.advance(ActionState::Done);
                let notice = format!(
                    "Committed {} file(s) with message: \"{}\"",
                    record.files.len(),
                    record.message
                );
                self.outcome(vec![record], Vec::new(), notice)
            }
            Ok(Finish::Each {
                commits,
                failures,
                total,
            }) => {
                let state = if commits.is_empty() {
                    ActionState::Failed
                } else {
                    ActionState::Done
                };
                self.advance(state);
                let notice = format!(
                    "Committed {} of {} file(s); {} failed.",
                    commits.len(),
                    total,
                    failures.len()
                );
                self.outcome(commits, failures, notice)
            }
            Ok(Finish::Aborted(reason)) => {
                self.advance(ActionState::Aborted);
                self.outcome(Vec::new(), Vec::new(), reason)
            }
            Err(error) => {
                warn!(%action, %error, "action failed");
                self.advance(ActionState::Failed);
                self.outcome(Vec::new(), Vec::new(), failure_notice(&error))
            }
        };

        let level = match outcome.state {
            ActionState::Failed => NoticeLevel::Error,
            _ if !outcome.failures.is_empty() => NoticeLevel::Warning,
            _ => NoticeLevel::Info,
        };
        self.ctx.interaction.notify(level, &outcome.notice);
        outcome
    }

    fn advance(&mut self, next: ActionState) {
        debug!(from = ?self.state, to = ?next, "state transition");
        self.state = next;
    }

    fn outcome(
        &self,
        commits: Vec<CommitRecord>,
        failures: Vec<FileFailure>,
        notice: String,
    ) -> ActionOutcome {
        debug_assert!(self.state.is_terminal());
        ActionOutcome {
            state: self.state,
            commits,
            failures,
            notice,
        }
    }

    async fn select_and_commit(&mut self) -> AppResult<Finish> {
        let credential = resolve_credential(self.ctx).await?;

        self.advance(ActionState::ListingChanges);
        let changes = self.ctx.version_control.list_changes().await?;
        if changes.is_empty() {
            return Ok(Finish::Aborted("No changes to commit.".to_string()));
        }

        self.advance(ActionState::SelectingFiles);
        let labels: Vec<String> = changes.iter().map(ToString::to_string).collect();
        let selected = match self.ctx.interaction.select_many(SELECT_TITLE, &labels).await? {
            Some(indices) => pick(&changes, &indices)?,
            None => Vec::new(),
        };
        if selected.is_empty() {
            return Ok(Finish::Aborted("No files selected for commit.".to_string()));
        }

        self.advance(ActionState::BuildingSummary);
        let summary = self.build_summary(&selected, DiffTarget::WorkingTree).await?;

        self.advance(ActionState::GeneratingMessage);
        let message = self.generate(&credential, &summary).await?;

        self.advance(ActionState::Staging);
        for entry in &selected {
            self.ctx.version_control.stage(entry).await?;
        }

        self.advance(ActionState::Committing);
        let paths: Vec<String> = selected.iter().flat_map(ChangeEntry::paths).collect();
        self.ctx.version_control.commit_paths(&message, &paths).await?;

        Ok(Finish::Committed(CommitRecord {
            message,
            files: selected.iter().map(|entry| entry.path.clone()).collect(),
        }))
    }

    async fn commit_all(&mut self) -> AppResult<Finish> {
        let credential = resolve_credential(self.ctx).await?;

        self.advance(ActionState::ListingChanges);
        let changes = self.ctx.version_control.list_changes().await?;
        if changes.is_empty() {
            return Ok(Finish::Aborted("No changes to commit.".to_string()));
        }

        let mut commits = Vec::new();
        let mut failures = Vec::new();
        for entry in &changes {
            match self.commit_one(&credential, entry).await {
                Ok(message) => {
                    self.ctx.interaction.notify(
                        NoticeLevel::Info,
                        &format!("Committed {}: \"{message}\"", entry.path),
                    );
                    commits.push(CommitRecord {
                        message,
                        files: vec![entry.path.clone()],
                    });
                }
                Err(error) => {
                    warn!(path = %entry.path, %error, "file commit failed");
                    self.ctx.interaction.notify(
                        NoticeLevel::Error,
                        &format!("Failed to commit {}: {error}", entry.path),
                    );
                    failures.push(FileFailure {
                        path: entry.path.clone(),
                        error: error.to_string(),
                    });
                }
            }
        }

        Ok(Finish::Each {
            commits,
            failures,
            total: changes.len(),
        })
    }

    async fn commit_one(&mut self, credential: &ApiCredential, entry: &ChangeEntry) -> AppResult<String> {
        self.advance(ActionState::BuildingSummary);
        let summary = self
            .build_summary(std::slice::from_ref(entry), DiffTarget::WorkingTree)
            .await?;

        self.advance(ActionState::GeneratingMessage);
        let message = self.generate(credential, &summary).await?;

        self.advance(ActionState::Staging);
        self.ctx.version_control.stage(entry).await?;

        self.advance(ActionState::Committing);
        self.ctx
            .version_control
            .commit_paths(&message, &entry.paths())
            .await?;
        Ok(message)
    }

    async fn commit_staged(&mut self, confirm: bool) -> AppResult<Finish> {
        let credential = resolve_credential(self.ctx).await?;

        self.advance(ActionState::ListingChanges);
        let staged = self.ctx.version_control.list_staged().await?;
        if staged.is_empty() {
            return Ok(Finish::Aborted("No staged changes to commit.".to_string()));
        }

        self.advance(ActionState::BuildingSummary);
        let summary = self.build_summary(&staged, DiffTarget::Staged).await?;

        self.advance(ActionState::GeneratingMessage);
        let generated = self.generate(&credential, &summary).await?;

        let message = if confirm {
            match self
                .ctx
                .interaction
                .prompt_text(CONFIRM_PROMPT, Some(generated.as_str()), false)
                .await?
            {
                Some(edited) => edited.trim().to_string(),
                None => return Ok(Finish::Aborted("Commit cancelled.".to_string())),
            }
        } else {
            generated
        };
        if message.is_empty() {
            return Ok(Finish::Aborted(
                "Empty commit message; nothing committed.".to_string(),
            ));
        }

        self.advance(ActionState::Committing);
        self.ctx.version_control.commit(&message).await?;

        Ok(Finish::Committed(CommitRecord {
            message,
            files: staged.into_iter().map(|entry| entry.path).collect(),
        }))
    }

    /// Collects one diff per entry. Deleted files get a placeholder instead of
    /// their full removal diff; a file with no working-tree diff falls back to
    /// its staged diff.
    async fn build_summary(&self, entries: &[ChangeEntry], target: DiffTarget) -> AppResult<DiffSummary> {
        let vcs = &self.ctx.version_control;
        let mut summary = DiffSummary::new();
        for entry in entries {
            if entry.is_deleted() {
                summary.push_deleted(&entry.path);
                continue;
            }
            let mut diff = vcs.diff(&entry.path, target).await?;
            if diff.trim().is_empty() && target == DiffTarget::WorkingTree {
                diff = vcs.diff(&entry.path, DiffTarget::Staged).await?;
            }
            summary.push(&entry.path, diff);
        }
        Ok(summary)
    }

    async fn generate(&self, credential: &ApiCredential, summary: &DiffSummary) -> AppResult<String> {
        let message =
            generate_commit_message(self.ctx.language_model.as_ref(), credential, summary).await?;
        Ok(message.to_string())
    }
}

/// Maps selected indices back to entries, in listing order and without repeats.
fn pick(changes: &[ChangeEntry], indices: &[usize]) -> AppResult<Vec<ChangeEntry>> {
    if let Some(bad) = indices.iter().find(|&&index| index >= changes.len()) {
        return Err(AppError::Interaction(format!(
            "selection {} is out of range (1-{})",
            bad + 1,
            changes.len()
        )));
    }
    Ok(changes
        .iter()
        .enumerate()
        .filter(|(index, _)| indices.contains(index))
        .map(|(_, entry)| entry.clone())
        .collect())
}
