use std::time::Duration;

use crate::error::{CaseflowError, Result};
use crate::resilience::RetryPolicy;

/// Runtime configuration for the event reconciliation and outbox subsystem.
///
/// All values have sensible defaults and can be overridden from the
/// environment with `CASEFLOW_`-prefixed variables.
#[derive(Debug, Clone)]
pub struct CaseflowConfig {
    pub database_url: String,
    /// Maximum number of outbox rows drained per `process_chunk` call.
    pub outbox_chunk_size: i64,
    /// Period of the outbox poller schedule.
    pub outbox_poll_interval: Duration,
    pub retry: RetryPolicy,
    /// Survey types this deployment owns; events for other surveys are
    /// filtered out before any write.
    pub accepted_survey_types: Vec<String>,
}

impl Default for CaseflowConfig {
    fn default() -> Self {
        Self {
            database_url: "postgresql://localhost/caseflow_development".to_string(),
            outbox_chunk_size: 100,
            outbox_poll_interval: Duration::from_millis(500),
            retry: RetryPolicy::default(),
            accepted_survey_types: vec!["SOCIAL".to_string()],
        }
    }
}

impl CaseflowConfig {
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(db_url) = std::env::var("CASEFLOW_DATABASE_URL").or_else(|_| std::env::var("DATABASE_URL")) {
            config.database_url = db_url;
        }

        if let Ok(chunk_size) = std::env::var("CASEFLOW_OUTBOX_CHUNK_SIZE") {
            config.outbox_chunk_size = chunk_size.parse().map_err(|e| {
                CaseflowError::Configuration(format!("Invalid outbox_chunk_size: {e}"))
            })?;
        }

        if let Ok(interval_ms) = std::env::var("CASEFLOW_OUTBOX_POLL_INTERVAL_MS") {
            let millis: u64 = interval_ms.parse().map_err(|e| {
                CaseflowError::Configuration(format!("Invalid outbox_poll_interval_ms: {e}"))
            })?;
            config.outbox_poll_interval = Duration::from_millis(millis);
        }

        if let Ok(initial_ms) = std::env::var("CASEFLOW_RETRY_INITIAL_DELAY_MS") {
            let millis: u64 = initial_ms.parse().map_err(|e| {
                CaseflowError::Configuration(format!("Invalid retry_initial_delay_ms: {e}"))
            })?;
            config.retry.initial_delay = Duration::from_millis(millis);
        }

        if let Ok(multiplier) = std::env::var("CASEFLOW_RETRY_MULTIPLIER") {
            config.retry.multiplier = multiplier.parse().map_err(|e| {
                CaseflowError::Configuration(format!("Invalid retry_multiplier: {e}"))
            })?;
        }

        if let Ok(max_delay_ms) = std::env::var("CASEFLOW_RETRY_MAX_DELAY_MS") {
            let millis: u64 = max_delay_ms.parse().map_err(|e| {
                CaseflowError::Configuration(format!("Invalid retry_max_delay_ms: {e}"))
            })?;
            config.retry.max_delay = Duration::from_millis(millis);
        }

        if let Ok(max_attempts) = std::env::var("CASEFLOW_RETRY_MAX_ATTEMPTS") {
            config.retry.max_attempts = max_attempts.parse().map_err(|e| {
                CaseflowError::Configuration(format!("Invalid retry_max_attempts: {e}"))
            })?;
        }

        if let Ok(types) = std::env::var("CASEFLOW_ACCEPTED_SURVEY_TYPES") {
            config.accepted_survey_types = parse_survey_types(&types);
        }

        Ok(config)
    }
}

/// Parse a comma-separated allow-list, ignoring empty segments.
fn parse_survey_types(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
