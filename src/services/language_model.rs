use async_trait::async_trait;

use crate::domain::credential::ApiCredential;
use crate::error::AppResult;

#[async_trait]
pub trait LanguageModelService: Send + Sync {
    /// Sends `prompt` and returns the raw text of the first candidate.
    async fn generate(&self, credential: &ApiCredential, prompt: &str) -> AppResult<String>;
}
