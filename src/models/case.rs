use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

/// Completeness of a Case row. PENDING rows are skeletons created by the UAC
/// receiver as referencing placeholders; only the Case receiver promotes them
/// to READY.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "case_status", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum CaseStatus {
    Pending,
    Ready,
}

/// Case represents a single sampled unit within a collection exercise.
/// Maps to `caseflow_cases` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Case {
    pub id: Uuid,
    pub collection_exercise_id: Uuid,
    pub status: CaseStatus,
    pub case_ref: String,
    pub sample: serde_json::Value,
    pub sample_sensitive: serde_json::Value,
    pub address: serde_json::Value,
    pub contact: serde_json::Value,
    pub refusal_received: Option<String>,
    pub invalid: bool,
    pub cohort: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Full replacement snapshot of a Case (without the status, which the
/// receiver decides)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewCase {
    pub id: Uuid,
    pub collection_exercise_id: Uuid,
    pub case_ref: String,
    pub sample: serde_json::Value,
    pub sample_sensitive: serde_json::Value,
    pub address: serde_json::Value,
    pub contact: serde_json::Value,
    pub refusal_received: Option<String>,
    pub invalid: bool,
    pub cohort: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Far-future timestamp stamped onto skeleton rows so provisional data is
/// recognizable and sorts after genuine data in time-ordered views.
pub fn skeleton_sentinel() -> DateTime<Utc> {
    // 9999-01-01T00:00:00Z
    DateTime::from_timestamp(253_370_764_800, 0).unwrap_or_default()
}

impl Case {
    /// Find a case by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Case>, sqlx::Error> {
        let case = sqlx::query_as::<_, Case>(
            r#"
            SELECT id, collection_exercise_id, status, case_ref, sample, sample_sensitive,
                   address, contact, refusal_received, invalid, cohort, created_at, updated_at
            FROM caseflow_cases
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(case)
    }

    /// Apply a full replacement snapshot by case ID, setting the row READY.
    /// Overwrites a PENDING skeleton in place (same id) when one exists.
    pub async fn upsert_ready(pool: &PgPool, snapshot: NewCase) -> Result<Case, sqlx::Error> {
        let case = sqlx::query_as::<_, Case>(
            r#"
            INSERT INTO caseflow_cases
                (id, collection_exercise_id, status, case_ref, sample, sample_sensitive,
                 address, contact, refusal_received, invalid, cohort, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            ON CONFLICT (id) DO UPDATE SET
                collection_exercise_id = EXCLUDED.collection_exercise_id,
                status = EXCLUDED.status,
                case_ref = EXCLUDED.case_ref,
                sample = EXCLUDED.sample,
                sample_sensitive = EXCLUDED.sample_sensitive,
                address = EXCLUDED.address,
                contact = EXCLUDED.contact,
                refusal_received = EXCLUDED.refusal_received,
                invalid = EXCLUDED.invalid,
                cohort = EXCLUDED.cohort,
                created_at = EXCLUDED.created_at,
                updated_at = EXCLUDED.updated_at
            RETURNING id, collection_exercise_id, status, case_ref, sample, sample_sensitive,
                      address, contact, refusal_received, invalid, cohort, created_at, updated_at
            "#,
        )
        .bind(snapshot.id)
        .bind(snapshot.collection_exercise_id)
        .bind(CaseStatus::Ready)
        .bind(&snapshot.case_ref)
        .bind(&snapshot.sample)
        .bind(&snapshot.sample_sensitive)
        .bind(&snapshot.address)
        .bind(&snapshot.contact)
        .bind(&snapshot.refusal_received)
        .bind(snapshot.invalid)
        .bind(&snapshot.cohort)
        .bind(snapshot.created_at)
        .bind(snapshot.updated_at)
        .fetch_one(pool)
        .await?;

        Ok(case)
    }

    /// Insert a PENDING skeleton so a UAC always has a referenceable Case
    /// row. `ON CONFLICT DO NOTHING` keeps a racing CaseUpdate authoritative.
    /// Returns whether a row was actually inserted.
    pub async fn insert_skeleton(
        pool: &PgPool,
        id: Uuid,
        collection_exercise_id: Uuid,
    ) -> Result<bool, sqlx::Error> {
        let sentinel = skeleton_sentinel();

        let result = sqlx::query(
            r#"
            INSERT INTO caseflow_cases
                (id, collection_exercise_id, status, case_ref, sample, sample_sensitive,
                 address, contact, refusal_received, invalid, cohort, created_at, updated_at)
            VALUES ($1, $2, $3, '', '{}', '{}', '{}', '{}', NULL, FALSE, NULL, $4, $4)
            ON CONFLICT (id) DO NOTHING
            "#,
        )
        .bind(id)
        .bind(collection_exercise_id)
        .bind(CaseStatus::Pending)
        .bind(sentinel)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skeleton_sentinel_is_far_future() {
        let sentinel = skeleton_sentinel();
        assert!(sentinel > Utc::now());
        assert_eq!(sentinel.to_rfc3339(), "9999-01-01T00:00:00+00:00");
    }

    #[test]
    fn test_case_status_serde_names() {
        assert_eq!(
            serde_json::to_string(&CaseStatus::Pending).unwrap(),
            "\"PENDING\""
        );
        assert_eq!(
            serde_json::to_string(&CaseStatus::Ready).unwrap(),
            "\"READY\""
        );
    }
}
