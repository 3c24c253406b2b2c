use serde::Serialize;
use sqlx::{Postgres, Transaction};
use tracing::debug;
use uuid::Uuid;

use crate::error::Result;
use crate::events::EventTypeToSend;
use crate::models::EventToSend;

/// The only API the rest of the service uses to emit events. Records the
/// publish obligation durably inside the caller's own transaction: if the
/// business transaction commits, so does the obligation; if it rolls back,
/// so does the obligation.
pub struct EventTransfer;

impl EventTransfer {
    /// Queue `payload` for reliable publication on `event_type`. The
    /// returned id is for correlation and logging only - it is not a
    /// delivery confirmation.
    pub async fn send<T: Serialize>(
        tx: &mut Transaction<'_, Postgres>,
        event_type: EventTypeToSend,
        payload: &T,
    ) -> Result<Uuid> {
        let payload_text = serde_json::to_string(payload)?;
        let id = Uuid::new_v4();

        EventToSend::insert(&mut **tx, id, event_type, &payload_text).await?;

        debug!(
            event_id = %id,
            event_type = %event_type,
            "📮 Recorded outbound event in outbox"
        );
        Ok(id)
    }
}
