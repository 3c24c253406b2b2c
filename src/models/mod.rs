//! # Models Module
//!
//! SQLx-backed row types for the reconciled domain model and the outbox.
//! Queries are runtime-checked (`sqlx::query_as` with explicit binds) so the
//! crate builds without a prepared query cache.

pub mod case;
pub mod collection_exercise;
pub mod event_to_send;
pub mod survey;
pub mod uac;

pub use case::{skeleton_sentinel, Case, CaseStatus, NewCase};
pub use collection_exercise::CollectionExercise;
pub use event_to_send::EventToSend;
pub use survey::{FulfilmentProduct, Survey};
pub use uac::{NewUac, Uac};
