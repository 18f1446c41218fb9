use tracing::{debug, warn};

use crate::domain::change::DiffSummary;
use crate::domain::credential::ApiCredential;
use crate::domain::message::{CommitCategory, CommitMessage};
use crate::error::{AppError, AppResult};
use crate::services::LanguageModelService;

pub fn build_commit_prompt(summary: &DiffSummary) -> String {
    format!(
        "Generate a concise, one-line commit message with a Conventional Commit prefix from [{}] based on these file changes. \
         Reply with exactly one line and nothing else.\n{}",
        CommitCategory::token_list(),
        summary.render()
    )
}

/// Asks the model for a message describing `summary` and sanitizes the reply.
pub async fn generate_commit_message(
    language_model: &dyn LanguageModelService,
    credential: &ApiCredential,
    summary: &DiffSummary,
) -> AppResult<CommitMessage> {
    if summary.is_empty() {
        return Err(AppError::Generation("no changes to describe".to_string()));
    }

    let prompt = build_commit_prompt(summary);
    debug!(
        files = summary.files().len(),
        prompt_chars = prompt.len(),
        "generating commit message"
    );

    let raw = language_model.generate(credential, &prompt).await?;
    let message = CommitMessage::sanitize(&raw);
    debug!(raw = %raw.trim(), sanitized = %message, "commit message generated");
    if message.is_degenerate() {
        warn!(category = %message.category, "generated message has an empty description");
    }
    Ok(message)
}
