use std::sync::Arc;

use sqlx::PgPool;
use tracing::debug;

use crate::error::Result;
use crate::events::filter::EventFilter;
use crate::events::types::{EventEnvelope, UacUpdate};
use crate::models::{Case, NewUac, Uac};

/// Applies UacUpdate events. UAC codes are frequently generated before the
/// owning Case's attributes have propagated, so this receiver guarantees any
/// UAC always has a referenceable Case row by inserting a PENDING skeleton
/// when no Case exists yet. It never touches an existing Case: only the Case
/// receiver promotes PENDING to READY.
pub struct UacUpdateReceiver {
    pool: PgPool,
    filter: Arc<EventFilter>,
}

impl UacUpdateReceiver {
    pub fn new(pool: PgPool, filter: Arc<EventFilter>) -> Self {
        Self { pool, filter }
    }

    pub async fn accept_event(&self, event: &EventEnvelope<UacUpdate>) -> Result<()> {
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

        Uac::upsert_by_case_id(
            &self.pool,
            NewUac {
                case_id: payload.case_id,
                survey_id: event.header.survey_id,
                collection_exercise_id: payload.collection_exercise_id,
                wave_num: payload.wave_num,
                uac_hash: payload.uac_hash.clone(),
                qid: payload.qid.clone(),
                collection_instrument_url: payload.collection_instrument_url.clone(),
                active: payload.active,
                receipted: payload.receipted,
                eq_launched: payload.eq_launched,
            },
        )
        .await?;

        if Case::find_by_id(&self.pool, payload.case_id).await?.is_none() {
            let inserted =
                Case::insert_skeleton(&self.pool, payload.case_id, payload.collection_exercise_id)
                    .await?;
            if inserted {
                debug!(
                    message_id = %event.header.message_id,
                    case_id = %payload.case_id,
                    "🦴 Created skeleton case for early-arriving UAC"
                );
            }
        }

        debug!(
            message_id = %event.header.message_id,
            case_id = %payload.case_id,
            wave_num = payload.wave_num,
            "🔑 Applied UAC update"
        );

        Ok(())
    }
}
