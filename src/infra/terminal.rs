use async_trait::async_trait;
use dialoguer::{Input, MultiSelect, Password};

use crate::error::{AppError, AppResult};
use crate::services::{Interaction, NoticeLevel};

/// [`Interaction`] backed by `dialoguer` prompts on the controlling terminal.
///
/// Prompts block on terminal input, so each one runs on tokio's blocking pool.
#[derive(Debug, Default)]
pub struct TerminalInteraction;

impl TerminalInteraction {
    pub fn new() -> Self {
        Self
    }
}

async fn blocking<T, F>(prompt: F) -> AppResult<T>
where
    F: FnOnce() -> dialoguer::Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(prompt)
        .await
        .map_err(|err| AppError::Interaction(format!("prompt task failed: {err}")))?
        .map_err(|err| AppError::Interaction(err.to_string()))
}

#[async_trait]
impl Interaction for TerminalInteraction {
    async fn select_many(&self, title: &str, items: &[String]) -> AppResult<Option<Vec<usize>>> {
        let title = format!("{title} (Space to toggle, Enter to confirm, Esc to cancel)");
        let items = items.to_vec();
        blocking(move || {
            MultiSelect::new()
                .with_prompt(title)
                .items(&items)
                .interact_opt()
        })
        .await
    }

    async fn prompt_text(
        &self,
        prompt: &str,
        initial: Option<&str>,
        secret: bool,
    ) -> AppResult<Option<String>> {
        let prompt = prompt.to_string();
        let answer = if secret {
            blocking(move || {
                Password::new()
                    .with_prompt(prompt)
                    .allow_empty_password(true)
                    .interact()
            })
            .await?
        } else {
            let initial = initial.unwrap_or_default().to_string();
            blocking(move || {
                Input::<String>::new()
                    .with_prompt(prompt)
                    .with_initial_text(initial)
                    .allow_empty(true)
                    .interact_text()
            })
            .await?
        };
        Ok(non_blank(answer))
    }

    fn notify(&self, level: NoticeLevel, message: &str) {
        match level {
            NoticeLevel::Info => println!("{message}"),
            NoticeLevel::Warning => eprintln!("Warning: {message}"),
            NoticeLevel::Error => eprintln!("Error: {message}"),
        }
    }
}

/// A cleared field counts as a cancelled prompt.
fn non_blank(answer: String) -> Option<String> {
    let trimmed = answer.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
