use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

/// CollectionExercise is a scheduled run of a survey. Maps to
/// `caseflow_collection_exercises` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct CollectionExercise {
    pub id: Uuid,
    pub survey_id: Uuid,
    pub name: String,
    pub reference: String,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub wave_config: serde_json::Value,
}

impl CollectionExercise {
    /// Find a collection exercise by ID
    pub async fn find_by_id(
        pool: &PgPool,
        id: Uuid,
    ) -> Result<Option<CollectionExercise>, sqlx::Error> {
        let exercise = sqlx::query_as::<_, CollectionExercise>(
            r#"
            SELECT id, survey_id, name, reference, start_date, end_date, wave_config
            FROM caseflow_collection_exercises
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(exercise)
    }

    /// Upsert the collection exercise by ID. The survey foreign key is
    /// required; an exercise arriving ahead of its survey fails and is left
    /// to the transport's redelivery.
    #[allow(clippy::too_many_arguments)]
    pub async fn upsert(
        pool: &PgPool,
        id: Uuid,
        survey_id: Uuid,
        name: &str,
        reference: &str,
        start_date: Option<DateTime<Utc>>,
        end_date: Option<DateTime<Utc>>,
        wave_config: &serde_json::Value,
    ) -> Result<CollectionExercise, sqlx::Error> {
        let exercise = sqlx::query_as::<_, CollectionExercise>(
            r#"
            INSERT INTO caseflow_collection_exercises
                (id, survey_id, name, reference, start_date, end_date, wave_config)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (id) DO UPDATE SET
                survey_id = EXCLUDED.survey_id,
                name = EXCLUDED.name,
                reference = EXCLUDED.reference,
                start_date = EXCLUDED.start_date,
                end_date = EXCLUDED.end_date,
                wave_config = EXCLUDED.wave_config
            RETURNING id, survey_id, name, reference, start_date, end_date, wave_config
            "#,
        )
        .bind(id)
        .bind(survey_id)
        .bind(name)
        .bind(reference)
        .bind(start_date)
        .bind(end_date)
        .bind(wave_config)
        .fetch_one(pool)
        .await?;

        Ok(exercise)
    }
}
