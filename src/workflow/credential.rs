use tracing::info;

use crate::context::AppContext;
use crate::domain::credential::ApiCredential;
use crate::error::{AppError, AppResult};
use crate::services::settings::API_KEY_SETTING;

const API_KEY_PROMPT: &str = "Enter your Gemini API key";

/// Reads the stored API key, asking for (and persisting) one when absent.
pub async fn resolve_credential(ctx: &AppContext) -> AppResult<ApiCredential> {
    if let Some(credential) = ctx.settings.get(API_KEY_SETTING)?.and_then(ApiCredential::new) {
        return Ok(credential);
    }

    let entered = ctx
        .interaction
        .prompt_text(API_KEY_PROMPT, None, true)
        .await?
        .and_then(ApiCredential::new)
        .ok_or_else(|| AppError::Credential("Gemini API key is not set".to_string()))?;

    store_credential(ctx, &entered)?;
    Ok(entered)
}

pub fn store_credential(ctx: &AppContext, credential: &ApiCredential) -> AppResult<()> {
    ctx.settings.set(API_KEY_SETTING, credential.expose())?;
    info!(key = %credential.masked(), "stored Gemini API key");
    Ok(())
}
