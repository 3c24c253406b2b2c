//! # Events Module
//!
//! Inbound side of the reconciliation subsystem: event envelope and payload
//! types, the prerequisite filter, and the four update receivers. Across
//! inbound event kinds there is no ordering guarantee; out-of-order arrival
//! is tolerated via the filter and skeleton-record creation rather than by
//! buffering.

pub mod filter;
pub mod receivers;
pub mod types;

pub use filter::{EventFilter, MetadataStore};
pub use receivers::{
    CaseUpdateReceiver, CollectionExerciseUpdateReceiver, SurveyUpdateReceiver, UacUpdateReceiver,
};
pub use types::{
    CaseUpdate, CollectionExerciseUpdate, EventEnvelope, EventHeader, EventTypeToSend,
    FulfilmentUpdate, SurveyUpdate, UacUpdate,
};
