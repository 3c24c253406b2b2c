//! # Structured Error Handling
//!
//! Crate-wide error type using thiserror for structured error types instead
//! of `Box<dyn Error>` patterns. Model-layer functions return `sqlx::Error`
//! directly and callers lift into [`CaseflowError`] via `?`.

use thiserror::Error;

use crate::messaging::PublishError;

/// Crate-wide error type
#[derive(Error, Debug)]
pub enum CaseflowError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Publish error: {0}")]
    Publish(#[from] PublishError),
}

pub type Result<T> = std::result::Result<T, CaseflowError>;
