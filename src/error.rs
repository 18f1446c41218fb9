use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("environment error: {0}")]
    Environment(String),
    #[error("credential error: {0}")]
    Credential(String),
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error("version control error: {0}")]
    VersionControl(String),
    #[error("could not generate a commit message: {0}")]
    Generation(String),
    #[error("interaction error: {0}")]
    Interaction(String),
    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type AppResult<T> = Result<T, AppError>;
