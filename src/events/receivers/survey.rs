use sqlx::PgPool;
use tracing::debug;

use crate::error::Result;
use crate::events::types::{EventEnvelope, SurveyUpdate};
use crate::models::{FulfilmentProduct, Survey};

/// Applies SurveyUpdate events. Surveys are a prerequisite the filter checks
/// for Case and UAC events, so this receiver has no filter gate of its own.
pub struct SurveyUpdateReceiver {
    pool: PgPool,
}

impl SurveyUpdateReceiver {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Upsert the survey and replace its entire allowed-fulfilment list in
    /// one transaction; the child collection has no independent lifecycle.
    pub async fn accept_event(&self, event: &EventEnvelope<SurveyUpdate>) -> Result<()> {
        let payload = &event.payload;

        let mut tx = self.pool.begin().await?;

        Survey::upsert(&mut tx, payload.survey_id, &payload.name, &payload.sample_definition)
            .await?;

        let products: Vec<(String, String, Option<serde_json::Value>)> = payload
            .allowed_fulfilments
            .iter()
            .map(|f| (f.pack_code.clone(), f.description.clone(), f.metadata.clone()))
            .collect();
        FulfilmentProduct::replace_for_survey(&mut tx, payload.survey_id, &products).await?;

        tx.commit().await?;

        debug!(
            message_id = %event.header.message_id,
            survey_id = %payload.survey_id,
            fulfilments = payload.allowed_fulfilments.len(),
            "📚 Applied survey update"
        );

        Ok(())
    }
}
