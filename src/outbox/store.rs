use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::Result;
use crate::models::EventToSend;

/// The outbox table as seen by the processor. The table is the sole shared
/// resource between business writers and the dispatch reader; nothing else
/// may read or write it.
#[async_trait]
pub trait OutboxStore: Send + Sync {
    /// Up to `limit` outstanding rows, creation time ascending
    async fn fetch_oldest(&self, limit: i64) -> Result<Vec<EventToSend>>;

    /// Remove rows whose events were confirmed published
    async fn delete_batch(&self, ids: &[Uuid]) -> Result<u64>;
}

#[async_trait]
impl OutboxStore for PgPool {
    async fn fetch_oldest(&self, limit: i64) -> Result<Vec<EventToSend>> {
        Ok(EventToSend::fetch_oldest(self, limit).await?)
    }

    async fn delete_batch(&self, ids: &[Uuid]) -> Result<u64> {
        Ok(EventToSend::delete_batch(self, ids).await?)
    }
}
