use std::time::Duration;

use tracing::{debug, error};

use crate::messaging::BusPublisher;
use crate::outbox::{OutboxProcessor, OutboxStore};

/// Schedule-triggered driver for the outbox processor. Each tick drains the
/// backlog by calling `process_chunk` until it reports nothing pending, so
/// a backlog clears faster than the schedule period without overlapping
/// drains from the same poller instance.
pub struct OutboxPoller<S, P> {
    processor: OutboxProcessor<S, P>,
    period: Duration,
}

impl<S: OutboxStore, P: BusPublisher> OutboxPoller<S, P> {
    pub fn new(processor: OutboxProcessor<S, P>, period: Duration) -> Self {
        Self { processor, period }
    }

    /// Repeatedly process chunks until the outbox reports empty. Returns the
    /// total number of events dispatched; an error leaves the remaining
    /// backlog for the next tick.
    pub async fn drain(&self) -> crate::error::Result<usize> {
        let mut total = 0;
        loop {
            let processed = self.processor.process_chunk().await?;
            if processed == 0 {
                break;
            }
            total += processed;
        }

        if total > 0 {
            debug!(dispatched = total, "📬 Outbox drained");
        }
        Ok(total)
    }

    /// Run the polling schedule forever. Drain errors are logged and the
    /// backlog is retried on the next tick; the outbox itself is the
    /// cross-restart resume mechanism.
    pub async fn run(&self) {
        let mut interval = tokio::time::interval(self.period);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            interval.tick().await;
            if let Err(e) = self.drain().await {
                error!(error = %e, "❌ Outbox drain failed, will retry on next tick");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventTypeToSend;
    use crate::outbox::testing::{InMemoryOutbox, RecordingPublisher};
    use crate::resilience::RetryPolicy;

    fn fast_retry() -> RetryPolicy {
        RetryPolicy {
            initial_delay: Duration::from_millis(1),
            multiplier: 2.0,
            max_delay: Duration::from_millis(2),
            max_attempts: 3,
        }
    }

    #[tokio::test]
    async fn test_drain_crosses_chunk_boundaries() {
        let store = InMemoryOutbox::default();
        store.seed(8, EventTypeToSend::SurveyLaunch);
        let processor = OutboxProcessor::new(store, RecordingPublisher::default(), 3, fast_retry());
        let poller = OutboxPoller::new(processor, Duration::from_millis(50));

        // 3 + 3 + 2, then a final empty chunk stops the loop
        assert_eq!(poller.drain().await.unwrap(), 8);
    }

    #[tokio::test]
    async fn test_drain_on_empty_outbox_is_a_no_op() {
        let processor = OutboxProcessor::new(
            InMemoryOutbox::default(),
            RecordingPublisher::default(),
            3,
            fast_retry(),
        );
        let poller = OutboxPoller::new(processor, Duration::from_millis(50));

        assert_eq!(poller.drain().await.unwrap(), 0);
    }
}
