use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool, Postgres, Transaction};
use uuid::Uuid;

/// Survey is the root aggregate the filter checks before any Case or UAC
/// write. Maps to `caseflow_surveys` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Survey {
    pub id: Uuid,
    pub name: String,
    pub sample_definition: serde_json::Value,
}

/// Allowed fulfilment product for a survey. Maps to
/// `caseflow_fulfilment_products` table; the whole list is replaced on every
/// survey update since it has no lifecycle of its own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct FulfilmentProduct {
    pub id: Uuid,
    pub survey_id: Uuid,
    pub pack_code: String,
    pub description: String,
    pub metadata: Option<serde_json::Value>,
}

impl Survey {
    /// Find a survey by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Survey>, sqlx::Error> {
        let survey = sqlx::query_as::<_, Survey>(
            r#"
            SELECT id, name, sample_definition
            FROM caseflow_surveys
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(survey)
    }

    /// Survey type discriminator carried in the sample definition blob.
    pub fn survey_type(&self) -> Option<&str> {
        self.sample_definition
            .get("surveyType")
            .and_then(serde_json::Value::as_str)
    }

    /// Upsert the survey row inside an open transaction.
    pub async fn upsert(
        tx: &mut Transaction<'_, Postgres>,
        id: Uuid,
        name: &str,
        sample_definition: &serde_json::Value,
    ) -> Result<Survey, sqlx::Error> {
        let survey = sqlx::query_as::<_, Survey>(
            r#"
            INSERT INTO caseflow_surveys (id, name, sample_definition)
            VALUES ($1, $2, $3)
            ON CONFLICT (id) DO UPDATE SET
                name = EXCLUDED.name,
                sample_definition = EXCLUDED.sample_definition
            RETURNING id, name, sample_definition
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(sample_definition)
        .fetch_one(&mut **tx)
        .await?;

        Ok(survey)
    }
}

impl FulfilmentProduct {
    /// Replace the survey's entire allowed-fulfilment list (remove all, then
    /// insert) inside an open transaction.
    pub async fn replace_for_survey(
        tx: &mut Transaction<'_, Postgres>,
        survey_id: Uuid,
        products: &[(String, String, Option<serde_json::Value>)],
    ) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM caseflow_fulfilment_products WHERE survey_id = $1")
            .bind(survey_id)
            .execute(&mut **tx)
            .await?;

        for (pack_code, description, metadata) in products {
            sqlx::query(
                r#"
                INSERT INTO caseflow_fulfilment_products (id, survey_id, pack_code, description, metadata)
                VALUES ($1, $2, $3, $4, $5)
                "#,
            )
            .bind(Uuid::new_v4())
            .bind(survey_id)
            .bind(pack_code)
            .bind(description)
            .bind(metadata)
            .execute(&mut **tx)
            .await?;
        }

        Ok(())
    }

    /// List the allowed fulfilment products for a survey
    pub async fn list_for_survey(
        pool: &PgPool,
        survey_id: Uuid,
    ) -> Result<Vec<FulfilmentProduct>, sqlx::Error> {
        let products = sqlx::query_as::<_, FulfilmentProduct>(
            r#"
            SELECT id, survey_id, pack_code, description, metadata
            FROM caseflow_fulfilment_products
            WHERE survey_id = $1
            ORDER BY pack_code
            "#,
        )
        .bind(survey_id)
        .fetch_all(pool)
        .await?;

        Ok(products)
    }
}
