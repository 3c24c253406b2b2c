//! # Outbox Module
//!
//! Durable at-least-once outbound dispatch: one row per event, inserted in
//! the same transaction as the triggering business write
//! ([`EventTransfer`]), drained oldest-first by a single polling processor,
//! deleted only after confirmed publish. The outbox table, not the
//! in-process retrier, is the cross-restart resume mechanism.

pub mod poller;
pub mod processor;
pub mod store;
pub mod transfer;

pub use poller::OutboxPoller;
pub use processor::OutboxProcessor;
pub use store::OutboxStore;
pub use transfer::EventTransfer;

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use chrono::{Duration, Utc};
    use parking_lot::Mutex;
    use uuid::Uuid;

    use crate::error::Result;
    use crate::events::EventTypeToSend;
    use crate::messaging::{BusPublisher, PublishError};
    use crate::models::EventToSend;

    use super::OutboxStore;

    /// In-memory outbox for pipeline tests
    #[derive(Default)]
    pub struct InMemoryOutbox {
        rows: Mutex<Vec<EventToSend>>,
        delete_calls: AtomicUsize,
    }

    impl InMemoryOutbox {
        pub fn seed(&self, count: usize, event_type: EventTypeToSend) -> Vec<Uuid> {
            let base = Utc::now();
            let mut rows = self.rows.lock();
            (0..count)
                .map(|i| {
                    let id = Uuid::new_v4();
                    rows.push(EventToSend {
                        id,
                        event_type,
                        payload: format!("{{\"seq\":{i}}}"),
                        created_at: base + Duration::milliseconds(i as i64),
                    });
                    id
                })
                .collect()
        }

        pub fn seed_raw(&self, payload: &str, event_type: EventTypeToSend) -> Uuid {
            let id = Uuid::new_v4();
            self.rows.lock().push(EventToSend {
                id,
                event_type,
                payload: payload.to_string(),
                created_at: Utc::now(),
            });
            id
        }

        pub fn remaining(&self) -> usize {
            self.rows.lock().len()
        }

        pub fn delete_calls(&self) -> usize {
            self.delete_calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl OutboxStore for InMemoryOutbox {
        async fn fetch_oldest(&self, limit: i64) -> Result<Vec<EventToSend>> {
            let mut rows = self.rows.lock().clone();
            rows.sort_by_key(|row| row.created_at);
            rows.truncate(limit as usize);
            Ok(rows)
        }

        async fn delete_batch(&self, ids: &[Uuid]) -> Result<u64> {
            self.delete_calls.fetch_add(1, Ordering::SeqCst);
            let mut rows = self.rows.lock();
            let before = rows.len();
            rows.retain(|row| !ids.contains(&row.id));
            Ok((before - rows.len()) as u64)
        }
    }

    /// Publisher recording every delivered payload. Failure injection is by
    /// 1-based call number: the first `fail_first` calls fail, as does every
    /// call numbered `fail_from` or later.
    #[derive(Default)]
    pub struct RecordingPublisher {
        pub published: Mutex<Vec<(EventTypeToSend, serde_json::Value)>>,
        pub fail_first: Mutex<u32>,
        pub fail_from: Mutex<Option<u32>>,
        calls: Mutex<u32>,
    }

    impl RecordingPublisher {
        pub fn calls(&self) -> u32 {
            *self.calls.lock()
        }
    }

    #[async_trait]
    impl BusPublisher for RecordingPublisher {
        async fn publish(
            &self,
            event_type: EventTypeToSend,
            payload: &serde_json::Value,
        ) -> std::result::Result<(), PublishError> {
            let call = {
                let mut calls = self.calls.lock();
                *calls += 1;
                *calls
            };

            let should_fail = call <= *self.fail_first.lock()
                || self.fail_from.lock().is_some_and(|from| call >= from);
            if should_fail {
                return Err(PublishError::QueueOperation {
                    queue_name: "test".to_string(),
                    message: "injected failure".to_string(),
                });
            }

            self.published.lock().push((event_type, payload.clone()));
            Ok(())
        }
    }
}
