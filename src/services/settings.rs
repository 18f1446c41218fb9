use crate::error::AppResult;

pub const API_KEY_SETTING: &str = "gemini.apiKey";
pub const MODEL_SETTING: &str = "gemini.model";
pub const ENDPOINT_SETTING: &str = "gemini.endpoint";

/// Persisted key-value settings.
pub trait SettingsStore: Send + Sync {
    fn get(&self, key: &str) -> AppResult<Option<String>>;
    fn set(&self, key: &str, value: &str) -> AppResult<()>;
}
