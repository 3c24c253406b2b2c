use sqlx::PgPool;
use tracing::debug;

use crate::error::Result;
use crate::events::types::{CollectionExerciseUpdate, EventEnvelope};
use crate::models::CollectionExercise;

/// Applies CollectionExerciseUpdate events as plain upserts. Like surveys,
/// exercises are a prerequisite checked by the filter rather than filtered
/// themselves.
pub struct CollectionExerciseUpdateReceiver {
    pool: PgPool,
}

impl CollectionExerciseUpdateReceiver {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn accept_event(&self, event: &EventEnvelope<CollectionExerciseUpdate>) -> Result<()> {
        let payload = &event.payload;

        let exercise = CollectionExercise::upsert(
            &self.pool,
            payload.collection_exercise_id,
            payload.survey_id,
            &payload.name,
            &payload.reference,
            payload.start_date,
            payload.end_date,
            &payload.wave_config,
        )
        .await?;

        debug!(
            message_id = %event.header.message_id,
            collection_exercise_id = %exercise.id,
            "🗓️ Applied collection exercise update"
        );

        Ok(())
    }
}
