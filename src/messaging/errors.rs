//! # Messaging Error Types
//!
//! Structured error types for the publish path using thiserror instead of
//! `Box<dyn Error>` patterns.

use thiserror::Error;

/// Errors raised by a [`super::BusPublisher`] implementation
#[derive(Error, Debug)]
pub enum PublishError {
    #[error("Queue operation failed: {queue_name}: {message}")]
    QueueOperation { queue_name: String, message: String },

    #[error("Message serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
