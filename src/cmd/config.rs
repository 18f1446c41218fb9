use clap::{Args, Subcommand};
use dialoguer::{Input, Password};

use crate::config::{DEFAULT_GEMINI_ENDPOINT, DEFAULT_GEMINI_MODEL, StoredConfig, config_file_path};
use crate::domain::credential::{ApiCredential, mask_secret};
use crate::error::{AppError, AppResult};
use crate::infra::settings::FileSettings;
use crate::services::SettingsStore;
use crate::services::settings::API_KEY_SETTING;

#[derive(Args, Debug, Clone)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigCommand {
    /// Run the interactive configuration wizard.
    Init,
    /// Show the stored configuration (secrets masked).
    Show,
    /// Store the Gemini API key, prompting for it when not given.
    SetKey {
        /// The API key. Omit to be prompted instead of leaving it in shell history.
        key: Option<String>,
    },
}

pub fn run(command: ConfigCommand) -> AppResult<()> {
    match command {
        ConfigCommand::Init => run_init(),
        ConfigCommand::Show => run_show(),
        ConfigCommand::SetKey { key } => run_set_key(key),
    }
}

fn run_init() -> AppResult<()> {
    let mut cfg = StoredConfig::load()?;

    println!("Configuring autocommit.");
    println!("Press Enter to keep the current value, '-' to clear it.");
    println!("Secrets are stored in the local config file; protect your filesystem accordingly.");
    println!();

    apply_prompt("Gemini API key", &mut cfg.gemini_api_key, true)?;
    apply_prompt(
        &format!("Gemini model (default {DEFAULT_GEMINI_MODEL})"),
        &mut cfg.gemini_model,
        false,
    )?;
    apply_prompt(
        &format!("Gemini endpoint (default {DEFAULT_GEMINI_ENDPOINT})"),
        &mut cfg.gemini_endpoint,
        false,
    )?;

    cfg.save()?;

    let path = config_file_path()?;
    println!("\nConfiguration saved to {}", path.display());
    Ok(())
}

fn run_show() -> AppResult<()> {
    let cfg = StoredConfig::load()?;
    let path = config_file_path()?;

    println!("Configuration file: {}", path.display());
    println!(
        "Gemini API key: {}",
        mask_secret(cfg.gemini_api_key.as_deref().unwrap_or(""))
    );
    println!("Gemini model: {}", display_value(&cfg.gemini_model));
    println!("Gemini endpoint: {}", display_value(&cfg.gemini_endpoint));

    Ok(())
}

fn run_set_key(key: Option<String>) -> AppResult<()> {
    let value = match key {
        Some(value) => value,
        None => match prompt("Gemini API key", None, true)? {
            PromptAction::Set(value) => value,
            PromptAction::Keep | PromptAction::Clear => String::new(),
        },
    };
    let credential = ApiCredential::new(value)
        .ok_or_else(|| AppError::Credential("API key must not be empty".to_string()))?;

    FileSettings::open_default()?.set(API_KEY_SETTING, credential.expose())?;
    println!("Gemini API key saved ({}).", credential.masked());
    Ok(())
}

fn apply_prompt(field: &str, target: &mut Option<String>, secret: bool) -> AppResult<()> {
    match prompt(field, target.as_deref(), secret)? {
        PromptAction::Keep => {}
        PromptAction::Clear => *target = None,
        PromptAction::Set(value) => *target = Some(value),
    }
    Ok(())
}

fn prompt(field: &str, current: Option<&str>, secret: bool) -> AppResult<PromptAction> {
    let label = match (current, secret) {
        (Some(_), true) => format!("{field} [****] (Enter to keep, '-' to clear)"),
        (Some(value), false) => format!("{field} [{value}] (Enter to keep, '-' to clear)"),
        (None, _) => format!("{field} (Enter to skip)"),
    };

    let answer = if secret {
        Password::new()
            .with_prompt(label)
            .allow_empty_password(true)
            .interact()
    } else {
        Input::<String>::new()
            .with_prompt(label)
            .allow_empty(true)
            .interact_text()
    }
    .map_err(|err| AppError::Interaction(err.to_string()))?;
    Ok(PromptAction::parse(&answer))
}

fn display_value(value: &Option<String>) -> String {
    value
        .as_deref()
        .filter(|v| !v.is_empty())
        .map(|v| v.to_string())
        .unwrap_or_else(|| "<default>".to_string())
}

#[derive(Debug, PartialEq, Eq)]
enum PromptAction {
    Keep,
    Clear,
    Set(String),
}

impl PromptAction {
    fn parse(input: &str) -> Self {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            PromptAction::Keep
        } else if trimmed == "-" {
            PromptAction::Clear
        } else {
            PromptAction::Set(trimmed.to_string())
        }
    }
}
