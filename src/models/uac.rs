use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

/// Uac is a single-use questionnaire access credential tied to a Case and
/// wave. Maps to `caseflow_uacs` table; upserts are keyed by case id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Uac {
    pub id: Uuid,
    pub case_id: Uuid,
    pub survey_id: Uuid,
    pub collection_exercise_id: Uuid,
    pub wave_num: i32,
    pub uac_hash: String,
    pub qid: String,
    pub collection_instrument_url: String,
    pub active: bool,
    pub receipted: bool,
    pub eq_launched: bool,
}

/// New Uac for upsert (the row id is generated on first insert)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewUac {
    pub case_id: Uuid,
    pub survey_id: Uuid,
    pub collection_exercise_id: Uuid,
    pub wave_num: i32,
    pub uac_hash: String,
    pub qid: String,
    pub collection_instrument_url: String,
    pub active: bool,
    pub receipted: bool,
    pub eq_launched: bool,
}

impl Uac {
    /// Find a UAC by its owning case ID
    pub async fn find_by_case_id(pool: &PgPool, case_id: Uuid) -> Result<Option<Uac>, sqlx::Error> {
        let uac = sqlx::query_as::<_, Uac>(
            r#"
            SELECT id, case_id, survey_id, collection_exercise_id, wave_num, uac_hash,
                   qid, collection_instrument_url, active, receipted, eq_launched
            FROM caseflow_uacs
            WHERE case_id = $1
            "#,
        )
        .bind(case_id)
        .fetch_optional(pool)
        .await?;

        Ok(uac)
    }

    /// Upsert the UAC row by case ID
    pub async fn upsert_by_case_id(pool: &PgPool, new_uac: NewUac) -> Result<Uac, sqlx::Error> {
        let uac = sqlx::query_as::<_, Uac>(
            r#"
            INSERT INTO caseflow_uacs
                (id, case_id, survey_id, collection_exercise_id, wave_num, uac_hash,
                 qid, collection_instrument_url, active, receipted, eq_launched)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            ON CONFLICT (case_id) DO UPDATE SET
                survey_id = EXCLUDED.survey_id,
                collection_exercise_id = EXCLUDED.collection_exercise_id,
                wave_num = EXCLUDED.wave_num,
                uac_hash = EXCLUDED.uac_hash,
                qid = EXCLUDED.qid,
                collection_instrument_url = EXCLUDED.collection_instrument_url,
                active = EXCLUDED.active,
                receipted = EXCLUDED.receipted,
                eq_launched = EXCLUDED.eq_launched
            RETURNING id, case_id, survey_id, collection_exercise_id, wave_num, uac_hash,
                      qid, collection_instrument_url, active, receipted, eq_launched
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(new_uac.case_id)
        .bind(new_uac.survey_id)
        .bind(new_uac.collection_exercise_id)
        .bind(new_uac.wave_num)
        .bind(new_uac.uac_hash)
        .bind(new_uac.qid)
        .bind(new_uac.collection_instrument_url)
        .bind(new_uac.active)
        .bind(new_uac.receipted)
        .bind(new_uac.eq_launched)
        .fetch_one(pool)
        .await?;

        Ok(uac)
    }
}
