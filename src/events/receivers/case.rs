use std::sync::Arc;

use sqlx::PgPool;
use tracing::debug;

use crate::error::Result;
use crate::events::filter::EventFilter;
use crate::events::types::{CaseUpdate, EventEnvelope};
use crate::models::{Case, NewCase};

/// Applies CaseUpdate events. Each event carries a full replacement snapshot,
/// so re-applying the same event under at-least-once delivery produces an
/// identical row.
pub struct CaseUpdateReceiver {
    pool: PgPool,
    filter: Arc<EventFilter>,
}

impl CaseUpdateReceiver {
    pub fn new(pool: PgPool, filter: Arc<EventFilter>) -> Self {
        Self { pool, filter }
    }

    /// Apply one inbound CaseUpdate. Events that fail the filter gate are
    /// not for us: they are discarded silently with no write and no error.
    pub async fn accept_event(&self, event: &EventEnvelope<CaseUpdate>) -> Result<()> {
        let payload = &event.payload;

        if !self
            .filter
            .is_valid_event(
                event.header.survey_id,
                payload.collection_exercise_id,
                Some(payload.case_id),
                event.header.message_id,
            )
            .await?
        {
            return Ok(());
        }

        let case = Case::upsert_ready(
            &self.pool,
            NewCase {
                id: payload.case_id,
                collection_exercise_id: payload.collection_exercise_id,
                case_ref: payload.case_ref.clone(),
                sample: payload.sample.clone(),
                sample_sensitive: payload.sample_sensitive.clone(),
                address: payload.address.clone(),
                contact: payload.contact.clone(),
                refusal_received: payload.refusal_received.clone(),
                invalid: payload.invalid,
                cohort: payload.cohort.clone(),
                created_at: payload.created_at,
                updated_at: payload.updated_at,
            },
        )
        .await?;

        debug!(
            message_id = %event.header.message_id,
            case_id = %case.id,
            status = ?case.status,
            "📋 Applied case update"
        );

        Ok(())
    }
}
