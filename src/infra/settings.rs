use std::path::PathBuf;

use crate::config::{StoredConfig, config_file_path};
use crate::error::{AppError, AppResult};
use crate::services::SettingsStore;
use crate::services::settings::{API_KEY_SETTING, ENDPOINT_SETTING, MODEL_SETTING};

/// [`SettingsStore`] backed by the JSON config file.
pub struct FileSettings {
    path: PathBuf,
}

impl FileSettings {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn open_default() -> AppResult<Self> {
        Ok(Self::new(config_file_path()?))
    }
}

fn field<'a>(config: &'a mut StoredConfig, key: &str) -> AppResult<&'a mut Option<String>> {
    match key {
        API_KEY_SETTING => Ok(&mut config.gemini_api_key),
        MODEL_SETTING => Ok(&mut config.gemini_model),
        ENDPOINT_SETTING => Ok(&mut config.gemini_endpoint),
        other => Err(AppError::Configuration(format!("unknown setting '{other}'"))),
    }
}

impl SettingsStore for FileSettings {
    fn get(&self, key: &str) -> AppResult<Option<String>> {
        let mut config = StoredConfig::load_from(&self.path)?;
        Ok(field(&mut config, key)?
            .take()
            .filter(|value| !value.trim().is_empty()))
    }

    fn set(&self, key: &str, value: &str) -> AppResult<()> {
        let mut config = StoredConfig::load_from(&self.path)?;
        *field(&mut config, key)? = Some(value.to_string());
        config.save_to(&self.path)?;
        tracing::debug!(key, path = %self.path.display(), "setting persisted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn persists_values_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let settings = FileSettings::new(path.clone());
        assert_eq!(settings.get(API_KEY_SETTING).unwrap(), None);
        settings.set(API_KEY_SETTING, "key-123").unwrap();
        settings.set(MODEL_SETTING, "gemini-pro").unwrap();

        let reopened = FileSettings::new(path);
        assert_eq!(reopened.get(API_KEY_SETTING).unwrap().as_deref(), Some("key-123"));
        assert_eq!(reopened.get(MODEL_SETTING).unwrap().as_deref(), Some("gemini-pro"));
        assert_eq!(reopened.get(ENDPOINT_SETTING).unwrap(), None);
    }

    #[test]
    fn rejects_unknown_keys() {
        let dir = tempfile::tempdir().unwrap();
        let settings = FileSettings::new(dir.path().join("config.json"));

        assert!(matches!(
            settings.get("editor.theme"),
            Err(AppError::Configuration(_))
        ));
        assert!(settings.set("editor.theme", "x").is_err());
    }
}
