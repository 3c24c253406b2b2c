use tracing::{debug, error};

use crate::error::Result;
use crate::messaging::BusPublisher;
use crate::outbox::OutboxStore;
use crate::resilience::{retry_with_backoff, RetryPolicy};

/// Drains one bounded, time-ordered chunk of queued outbox rows per call.
///
/// Deletion is a single batch at chunk end, strictly after every publish in
/// the chunk is confirmed. One event's exhausted retry aborts the remainder
/// of the chunk; rows already published in that chunk stay undeleted and are
/// resent on the next poll, which downstream consumers must tolerate under
/// at-least-once delivery.
pub struct OutboxProcessor<S, P> {
    store: S,
    publisher: P,
    chunk_size: i64,
    retry: RetryPolicy,
}

impl<S: OutboxStore, P: BusPublisher> OutboxProcessor<S, P> {
    pub fn new(store: S, publisher: P, chunk_size: i64, retry: RetryPolicy) -> Self {
        Self {
            store,
            publisher,
            chunk_size,
            retry,
        }
    }

    /// Publish up to one chunk of outstanding events, oldest first, and
    /// delete the published rows. Returns the number processed, 0 when
    /// nothing is pending.
    pub async fn process_chunk(&self) -> Result<usize> {
        let pending = self.store.fetch_oldest(self.chunk_size).await?;
        if pending.is_empty() {
            return Ok(0);
        }

        let mut completed_ids = Vec::with_capacity(pending.len());
        for event in &pending {
            // EventTransfer serializes before insert, so a row that no longer
            // parses is corrupt. Deleting it with the batch keeps one bad row
            // from blocking the chunk head forever.
            let payload: serde_json::Value = match serde_json::from_str(&event.payload) {
                Ok(payload) => payload,
                Err(parse_error) => {
                    error!(
                        event_id = %event.id,
                        event_type = %event.event_type,
                        error = %parse_error,
                        "🗑️ Dropping outbox row with unparseable payload"
                    );
                    completed_ids.push(event.id);
                    continue;
                }
            };

            let publish_result = retry_with_backoff(&self.retry, || {
                self.publisher.publish(event.event_type, &payload)
            })
            .await;

            if let Err(publish_error) = publish_result {
                error!(
                    event_id = %event.id,
                    event_type = %event.event_type,
                    error = %publish_error,
                    "❌ Publish failed after retries, aborting chunk"
                );
                return Err(publish_error.into());
            }

            completed_ids.push(event.id);
        }

        let deleted = self.store.delete_batch(&completed_ids).await?;
        debug!(
            processed = pending.len(),
            deleted = deleted,
            "📤 Outbox chunk dispatched"
        );

        Ok(pending.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventTypeToSend;
    use crate::outbox::testing::{InMemoryOutbox, RecordingPublisher};

    use std::time::Duration;

    fn fast_retry(max_attempts: u32) -> RetryPolicy {
        RetryPolicy {
            initial_delay: Duration::from_millis(1),
            multiplier: 2.0,
            max_delay: Duration::from_millis(2),
            max_attempts,
        }
    }

    #[tokio::test]
    async fn test_empty_outbox_returns_zero_and_deletes_nothing() {
        let processor = OutboxProcessor::new(
            InMemoryOutbox::default(),
            RecordingPublisher::default(),
            10,
            fast_retry(3),
        );

        assert_eq!(processor.process_chunk().await.unwrap(), 0);
        assert_eq!(processor.store.delete_calls(), 0);
    }

    #[tokio::test]
    async fn test_chunk_publishes_in_creation_order_and_deletes_all() {
        let store = InMemoryOutbox::default();
        store.seed(5, EventTypeToSend::Fulfilment);
        let processor =
            OutboxProcessor::new(store, RecordingPublisher::default(), 10, fast_retry(3));

        assert_eq!(processor.process_chunk().await.unwrap(), 5);

        let published = processor.publisher.published.lock();
        let sequence: Vec<i64> = published
            .iter()
            .map(|(_, payload)| payload["seq"].as_i64().unwrap())
            .collect();
        assert_eq!(sequence, vec![0, 1, 2, 3, 4]);
        assert_eq!(processor.store.remaining(), 0);
    }

    #[tokio::test]
    async fn test_chunk_is_bounded_by_chunk_size() {
        let store = InMemoryOutbox::default();
        store.seed(7, EventTypeToSend::Refusal);
        let processor =
            OutboxProcessor::new(store, RecordingPublisher::default(), 3, fast_retry(3));

        assert_eq!(processor.process_chunk().await.unwrap(), 3);
        assert_eq!(processor.store.remaining(), 4);
    }

    #[tokio::test]
    async fn test_transient_failure_is_retried_within_chunk() {
        let store = InMemoryOutbox::default();
        store.seed(2, EventTypeToSend::NewCase);
        let publisher = RecordingPublisher::default();
        *publisher.fail_first.lock() = 2;
        let processor = OutboxProcessor::new(store, publisher, 10, fast_retry(3));

        assert_eq!(processor.process_chunk().await.unwrap(), 2);
        assert_eq!(processor.publisher.published.lock().len(), 2);
        assert_eq!(processor.store.remaining(), 0);
    }

    #[tokio::test]
    async fn test_unparseable_payload_is_dropped_without_blocking_chunk() {
        let store = InMemoryOutbox::default();
        store.seed(1, EventTypeToSend::Fulfilment);
        let poisoned = store.seed_raw("not json", EventTypeToSend::Fulfilment);
        store.seed(1, EventTypeToSend::Fulfilment);
        let processor =
            OutboxProcessor::new(store, RecordingPublisher::default(), 10, fast_retry(3));

        assert_eq!(processor.process_chunk().await.unwrap(), 3);

        // The corrupt row is never published but is deleted with the batch,
        // so the next poll starts from an empty table.
        let published = processor.publisher.published.lock();
        assert_eq!(published.len(), 2);
        assert_eq!(processor.store.remaining(), 0);
        drop(published);
        assert!(!processor
            .store
            .fetch_oldest(10)
            .await
            .unwrap()
            .iter()
            .any(|row| row.id == poisoned));
    }

    #[tokio::test]
    async fn test_exhausted_retry_aborts_chunk_and_leaves_every_row() {
        let store = InMemoryOutbox::default();
        store.seed(4, EventTypeToSend::EqLaunch);
        let publisher = RecordingPublisher::default();
        // Call 1 (first event) succeeds; calls 2-4 are the second event's
        // three attempts, all failing.
        *publisher.fail_from.lock() = Some(2);
        let processor = OutboxProcessor::new(store, publisher, 10, fast_retry(3));

        let result = processor.process_chunk().await;

        assert!(result.is_err());
        // 1 success + 3 exhausted attempts, then the chunk aborted
        assert_eq!(processor.publisher.calls(), 4);
        assert_eq!(processor.publisher.published.lock().len(), 1);
        // No batch delete ran: the already-published first event is resent
        // on the next poll, acceptable under at-least-once delivery.
        assert_eq!(processor.store.delete_calls(), 0);
        assert_eq!(processor.store.remaining(), 4);
    }
}
