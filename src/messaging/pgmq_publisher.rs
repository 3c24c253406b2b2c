//! # PostgreSQL Message Queue Publisher (pgmq-rs)
//!
//! Production [`BusPublisher`] backed by the pgmq-rs crate, one queue per
//! outbound topic.

use async_trait::async_trait;
use pgmq::PGMQueue;
use tracing::{debug, info};

use crate::events::EventTypeToSend;
use crate::messaging::{BusPublisher, PublishError};

/// pgmq-rs based outbound publisher
#[derive(Debug, Clone)]
pub struct PgmqBusPublisher {
    pgmq: PGMQueue,
}

/// Queue name for an outbound topic
pub fn topic_queue_name(event_type: EventTypeToSend) -> String {
    format!("caseflow_{}", event_type.as_str().to_lowercase())
}

impl PgmqBusPublisher {
    /// Create a new publisher using a connection string
    pub async fn new(database_url: &str) -> Result<Self, PublishError> {
        info!("🚀 Connecting to pgmq using pgmq-rs crate");

        let pgmq = PGMQueue::new(database_url.to_string())
            .await
            .map_err(|e| PublishError::QueueOperation {
                queue_name: "<connect>".to_string(),
                message: e.to_string(),
            })?;

        info!("✅ Connected to pgmq");
        Ok(Self { pgmq })
    }

    /// Create a new publisher using an existing connection pool (BYOP -
    /// Bring Your Own Pool)
    pub async fn new_with_pool(pool: sqlx::PgPool) -> Self {
        info!("🚀 Creating pgmq publisher with shared connection pool");

        let pgmq = PGMQueue::new_with_pool(pool).await;

        Self { pgmq }
    }

    /// Create every topic queue if it doesn't exist
    pub async fn initialize_topic_queues(&self) -> Result<(), PublishError> {
        info!("🏗️ Initializing {} topic queues", EventTypeToSend::ALL.len());

        for event_type in EventTypeToSend::ALL {
            let queue_name = topic_queue_name(event_type);
            self.pgmq
                .create(&queue_name)
                .await
                .map_err(|e| PublishError::QueueOperation {
                    queue_name: queue_name.clone(),
                    message: e.to_string(),
                })?;
            debug!("📋 Queue ready: {}", queue_name);
        }

        info!("✅ Initialized all topic queues");
        Ok(())
    }
}

#[async_trait]
impl BusPublisher for PgmqBusPublisher {
    async fn publish(
        &self,
        event_type: EventTypeToSend,
        payload: &serde_json::Value,
    ) -> Result<(), PublishError> {
        let queue_name = topic_queue_name(event_type);
        debug!("📤 Publishing {} event to queue: {}", event_type, queue_name);

        let message_id = self
            .pgmq
            .send(&queue_name, payload)
            .await
            .map_err(|e| PublishError::QueueOperation {
                queue_name: queue_name.clone(),
                message: e.to_string(),
            })?;

        debug!(
            "✅ Published {} event to queue: {} with id: {}",
            event_type, queue_name, message_id
        );
        Ok(())
    }
}
