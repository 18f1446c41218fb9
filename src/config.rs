use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

pub const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash-latest";
pub const DEFAULT_GEMINI_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";

const CONFIG_DIR_NAME: &str = "autocommit";
const CONFIG_FILE_NAME: &str = "config.json";
const CONFIG_DIR_ENV: &str = "AUTOCOMMIT_CONFIG_DIR";
const MODEL_ENV: &str = "AUTOCOMMIT_GEMINI_MODEL";
const ENDPOINT_ENV: &str = "AUTOCOMMIT_GEMINI_ENDPOINT";

/// Settings resolved for one invocation.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub gemini_model: String,
    pub gemini_endpoint: String,
}

impl AppConfig {
    pub fn load() -> AppResult<Self> {
        let stored = StoredConfig::load()?;
        Ok(Self::resolve(
            stored,
            env::var(MODEL_ENV).ok(),
            env::var(ENDPOINT_ENV).ok(),
        ))
    }

    fn resolve(
        stored: StoredConfig,
        model_override: Option<String>,
        endpoint_override: Option<String>,
    ) -> Self {
        let gemini_model = non_empty(model_override)
            .or(non_empty(stored.gemini_model))
            .unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string());
        let gemini_endpoint = non_empty(endpoint_override)
            .or(non_empty(stored.gemini_endpoint))
            .unwrap_or_else(|| DEFAULT_GEMINI_ENDPOINT.to_string());

        Self {
            gemini_model,
            gemini_endpoint,
        }
    }
}

/// On-disk configuration file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoredConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gemini_api_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gemini_model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gemini_endpoint: Option<String>,
}

impl StoredConfig {
    pub fn load() -> AppResult<Self> {
        Self::load_from(&config_file_path()?)
    }

    pub fn load_from(path: &Path) -> AppResult<Self> {
        match fs::read_to_string(path) {
            Ok(contents) if contents.trim().is_empty() => Ok(Self::default()),
            Ok(contents) => serde_json::from_str::<StoredConfig>(&contents).map_err(|err| {
                AppError::Configuration(format!("invalid config file {}: {err}", path.display()))
            }),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(AppError::Io(err)),
        }
    }

    pub fn save(&self) -> AppResult<()> {
        self.save_to(&config_file_path()?)
    }

    pub fn save_to(&self, path: &Path) -> AppResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_string_pretty(self)
            .map_err(|err| AppError::Configuration(format!("failed to write config: {err}")))?;
        fs::write(path, data)?;
        Ok(())
    }
}

pub fn config_directory() -> AppResult<PathBuf> {
    if let Some(dir) = non_empty(env::var(CONFIG_DIR_ENV).ok()) {
        return Ok(PathBuf::from(dir));
    }
    dirs::config_dir()
        .map(|dir| dir.join(CONFIG_DIR_NAME))
        .ok_or_else(|| {
            AppError::Configuration("could not determine the user config directory".to_string())
        })
}

pub fn config_file_path() -> AppResult<PathBuf> {
    Ok(config_directory()?.join(CONFIG_FILE_NAME))
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
