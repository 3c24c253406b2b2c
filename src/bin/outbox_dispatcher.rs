//! Outbox dispatch service: polls the durable outbox and publishes queued
//! events to the bus until interrupted. Runs as a single instance per
//! deployment; the outbox table carries the backlog across restarts.

use tracing::info;

use caseflow_core::{
    CaseflowConfig, DatabaseConnection, OutboxPoller, OutboxProcessor, PgmqBusPublisher,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    caseflow_core::logging::init_structured_logging();

    let config = CaseflowConfig::from_env()?;

    let db = DatabaseConnection::from_url(&config.database_url).await?;
    db.migrate().await?;

    let publisher = PgmqBusPublisher::new_with_pool(db.pool().clone()).await;
    publisher.initialize_topic_queues().await?;

    let processor = OutboxProcessor::new(
        db.pool().clone(),
        publisher,
        config.outbox_chunk_size,
        config.retry.clone(),
    );
    let poller = OutboxPoller::new(processor, config.outbox_poll_interval);

    info!(
        chunk_size = config.outbox_chunk_size,
        poll_interval_ms = config.outbox_poll_interval.as_millis() as u64,
        "🚀 Outbox dispatcher started"
    );

    tokio::select! {
        _ = poller.run() => {}
        _ = tokio::signal::ctrl_c() => {
            info!("🛑 Shutdown signal received, stopping outbox dispatcher");
        }
    }

    Ok(())
}
