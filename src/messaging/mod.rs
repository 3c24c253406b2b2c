//! # Messaging Module
//!
//! Outbound bus seam. The outbox pipeline publishes through the
//! [`BusPublisher`] trait so the dispatch logic is testable without a real
//! broker; the production implementation rides PostgreSQL message queues
//! (pgmq), one queue per outbound topic.

pub mod errors;
pub mod pgmq_publisher;

pub use errors::PublishError;
pub use pgmq_publisher::PgmqBusPublisher;

use async_trait::async_trait;

use crate::events::EventTypeToSend;

/// One publish call to the bus. Implementations must treat delivery as
/// at-least-once; the caller retries transient failures.
#[async_trait]
pub trait BusPublisher: Send + Sync {
    async fn publish(
        &self,
        event_type: EventTypeToSend,
        payload: &serde_json::Value,
    ) -> Result<(), PublishError>;
}
