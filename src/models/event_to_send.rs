use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgConnection, PgPool};
use uuid::Uuid;

use crate::events::EventTypeToSend;

/// One durable outbox row. Rows are inserted inside the producing
/// transaction and deleted only after a confirmed publish - never updated.
/// Maps to `caseflow_events_to_send` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct EventToSend {
    pub id: Uuid,
    pub event_type: EventTypeToSend,
    pub payload: String,
    pub created_at: DateTime<Utc>,
}

impl EventToSend {
    /// Insert an outbox row on the caller's connection. Called with a
    /// transaction connection so the publish obligation commits and rolls
    /// back with the triggering business write.
    pub async fn insert(
        conn: &mut PgConnection,
        id: Uuid,
        event_type: EventTypeToSend,
        payload: &str,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO caseflow_events_to_send (id, event_type, payload, created_at)
            VALUES ($1, $2, $3, NOW())
            "#,
        )
        .bind(id)
        .bind(event_type)
        .bind(payload)
        .execute(conn)
        .await?;

        Ok(())
    }

    /// Fetch up to `limit` outstanding rows, oldest first
    pub async fn fetch_oldest(pool: &PgPool, limit: i64) -> Result<Vec<EventToSend>, sqlx::Error> {
        let events = sqlx::query_as::<_, EventToSend>(
            r#"
            SELECT id, event_type, payload, created_at
            FROM caseflow_events_to_send
            ORDER BY created_at ASC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(pool)
        .await?;

        Ok(events)
    }

    /// Delete a batch of rows by ID, returning the number removed
    pub async fn delete_batch(pool: &PgPool, ids: &[Uuid]) -> Result<u64, sqlx::Error> {
        if ids.is_empty() {
            return Ok(0);
        }

        let result = sqlx::query("DELETE FROM caseflow_events_to_send WHERE id = ANY($1)")
            .bind(ids)
            .execute(pool)
            .await?;

        Ok(result.rows_affected())
    }
}
