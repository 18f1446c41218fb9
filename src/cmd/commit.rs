use std::path::Path;
use std::sync::Arc;

use tracing::debug;

use crate::config::AppConfig;
use crate::context::AppContext;
use crate::error::AppResult;
use crate::infra::git::GitCli;
use crate::infra::llm::GeminiClient;
use crate::infra::settings::FileSettings;
use crate::services::Interaction;
use crate::workflow::commit::{ActionOutcome, CommitAction, CommitOrchestrator};

/// Runs `action` in the repository containing `start`. Setup errors are
/// reported through `interaction` like any other failed action.
pub async fn run(start: &Path, interaction: Arc<dyn Interaction>, action: CommitAction) -> ActionOutcome {
    match build_context(start, interaction.clone()).await {
        Ok(ctx) => CommitOrchestrator::new(&ctx).run(action).await,
        Err(error) => ActionOutcome::setup_failed(interaction.as_ref(), &error),
    }
}

async fn build_context(start: &Path, interaction: Arc<dyn Interaction>) -> AppResult<AppContext> {
    let git = GitCli::discover(start).await?;
    let config = AppConfig::load()?;
    debug!(
        root = %git.workspace_root().display(),
        model = %config.gemini_model,
        "configuration loaded"
    );

    Ok(AppContext::new(
        Arc::new(git),
        Arc::new(GeminiClient::new(config.gemini_endpoint, config.gemini_model)),
        interaction,
        Arc::new(FileSettings::open_default()?),
    ))
}
