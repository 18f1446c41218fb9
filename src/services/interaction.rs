use async_trait::async_trait;

use crate::error::AppResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

/// The user-facing surface an action talks to.
#[async_trait]
pub trait Interaction: Send + Sync {
    /// Returns the chosen indices into `items`, or `None` when the user cancels.
    async fn select_many(&self, title: &str, items: &[String]) -> AppResult<Option<Vec<usize>>>;

    /// Returns the entered text, or `None` when the user cancels.
    async fn prompt_text(
        &self,
        prompt: &str,
        initial: Option<&str>,
        secret: bool,
    ) -> AppResult<Option<String>>;

    fn notify(&self, level: NoticeLevel, message: &str);
}
