//! Inbound event envelope and payload types, plus the outbound topic enum.
//!
//! Payload schemas are an external contract owned by the upstream
//! case-management system and consumed read-only; field names follow its
//! camelCase convention.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Envelope header carried by every inbound update event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventHeader {
    pub message_id: Uuid,
    pub survey_id: Uuid,
    #[serde(default)]
    pub collection_exercise_id: Option<Uuid>,
    #[serde(default)]
    pub case_id: Option<Uuid>,
}

/// An inbound event: header plus one typed payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventEnvelope<T> {
    pub header: EventHeader,
    pub payload: T,
}

/// Full replacement snapshot of a Case
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseUpdate {
    pub case_id: Uuid,
    pub collection_exercise_id: Uuid,
    pub case_ref: String,
    pub sample: serde_json::Value,
    pub sample_sensitive: serde_json::Value,
    #[serde(default)]
    pub address: serde_json::Value,
    #[serde(default)]
    pub contact: serde_json::Value,
    #[serde(default)]
    pub refusal_received: Option<String>,
    #[serde(default)]
    pub invalid: bool,
    #[serde(default)]
    pub cohort: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// UAC state for one case and wave
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UacUpdate {
    pub case_id: Uuid,
    pub collection_exercise_id: Uuid,
    pub wave_num: i32,
    pub uac_hash: String,
    pub qid: String,
    pub collection_instrument_url: String,
    pub active: bool,
    #[serde(default)]
    pub receipted: bool,
    #[serde(default)]
    pub eq_launched: bool,
}

/// Survey metadata plus its replace-all fulfilment list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SurveyUpdate {
    pub survey_id: Uuid,
    pub name: String,
    pub sample_definition: serde_json::Value,
    #[serde(default)]
    pub allowed_fulfilments: Vec<FulfilmentUpdate>,
}

/// One allowed fulfilment product within a survey update
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FulfilmentUpdate {
    pub pack_code: String,
    pub description: String,
    #[serde(default)]
    pub metadata: Option<serde_json::Value>,
}

/// Collection exercise metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionExerciseUpdate {
    pub collection_exercise_id: Uuid,
    pub survey_id: Uuid,
    pub name: String,
    pub reference: String,
    #[serde(default)]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub end_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub wave_config: serde_json::Value,
}

/// Outbound workflow event topics. The variant names are the persisted and
/// wire contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "event_type_to_send", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventTypeToSend {
    Fulfilment,
    Refusal,
    InvalidCase,
    NewCase,
    EqLaunch,
    SurveyLaunch,
}

impl EventTypeToSend {
    pub const ALL: [EventTypeToSend; 6] = [
        EventTypeToSend::Fulfilment,
        EventTypeToSend::Refusal,
        EventTypeToSend::InvalidCase,
        EventTypeToSend::NewCase,
        EventTypeToSend::EqLaunch,
        EventTypeToSend::SurveyLaunch,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EventTypeToSend::Fulfilment => "FULFILMENT",
            EventTypeToSend::Refusal => "REFUSAL",
            EventTypeToSend::InvalidCase => "INVALID_CASE",
            EventTypeToSend::NewCase => "NEW_CASE",
            EventTypeToSend::EqLaunch => "EQ_LAUNCH",
            EventTypeToSend::SurveyLaunch => "SURVEY_LAUNCH",
        }
    }
}

impl std::fmt::Display for EventTypeToSend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_envelope_uses_upstream_field_names() {
        let raw = json!({
            "header": {
                "messageId": "5f3c2fcb-8a00-4c7c-9e23-7bba72ca92e4",
                "surveyId": "0d9af8cf-1f1b-4f6f-a6b1-3b9ca2f0e0ae",
                "collectionExerciseId": "2e6a1f0f-4bfd-4d41-bc74-7a542c3f9a3f",
                "caseId": "a4f6c3c2-38e7-4a24-8b3d-3f2a1d6c8e9f"
            },
            "payload": {
                "caseId": "a4f6c3c2-38e7-4a24-8b3d-3f2a1d6c8e9f",
                "collectionExerciseId": "2e6a1f0f-4bfd-4d41-bc74-7a542c3f9a3f",
                "caseRef": "10000000013",
                "sample": {"ADDRESS_LINE1": "1 High Street"},
                "sampleSensitive": {"PHONE_NUMBER": "07123456789"},
                "createdAt": "2026-01-10T09:30:00Z",
                "updatedAt": "2026-01-11T10:00:00Z"
            }
        });

        let event: EventEnvelope<CaseUpdate> =
            serde_json::from_value(raw).expect("envelope should deserialize");
        assert_eq!(event.payload.case_ref, "10000000013");
        assert_eq!(event.header.case_id, Some(event.payload.case_id));
        assert!(!event.payload.invalid);
        assert_eq!(event.payload.refusal_received, None);
    }

    #[test]
    fn test_event_type_wire_names() {
        assert_eq!(
            serde_json::to_string(&EventTypeToSend::InvalidCase).unwrap(),
            "\"INVALID_CASE\""
        );
        assert_eq!(EventTypeToSend::EqLaunch.as_str(), "EQ_LAUNCH");
        assert_eq!(EventTypeToSend::ALL.len(), 6);
    }
}
