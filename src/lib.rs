#![allow(clippy::doc_markdown)] // Allow technical terms like PostgreSQL, SQLx in docs
#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # Caseflow Core
//!
//! Event reconciliation and reliable outbound dispatch core for a
//! census/survey contact-centre backend.
//!
//! ## Overview
//!
//! The crate ingests at-least-once, possibly out-of-order domain-update
//! events about Cases, UACs, Surveys and Collection Exercises from an
//! upstream case-management system, applies them into a relational model
//! while preserving referential and temporal invariants, and guarantees
//! outbound workflow events survive process crashes and broker outages via
//! a durable local outbox, a polling dispatcher, and bounded-retry publish.
//!
//! ## Architecture
//!
//! Inbound: bus -> [`events::EventFilter`] -> update receiver -> store.
//! Outbound: business write -> [`outbox::EventTransfer`] (same transaction)
//! -> outbox table -> [`outbox::OutboxPoller`] -> [`outbox::OutboxProcessor`]
//! -> retrier -> bus.
//!
//! ## Module Organization
//!
//! - [`models`] - SQLx-backed domain rows and the outbox row
//! - [`events`] - inbound envelope types, prerequisite filter, receivers
//! - [`outbox`] - durable outbox store, processor and poller
//! - [`messaging`] - bus publisher seam and pgmq implementation
//! - [`resilience`] - retry policy and exponential backoff
//! - [`database`] - connection management and embedded migrations
//! - [`config`] - environment-driven configuration
//! - [`error`] - structured error handling
//!
//! ## Delivery Contract
//!
//! At-least-once plus idempotent application. Inbound events carry full
//! replacement snapshots, so re-application is safe; outbox rows are deleted
//! strictly after a confirmed publish, so a crash between publish and delete
//! results in a resend, never a loss.

pub mod config;
pub mod database;
pub mod error;
pub mod events;
pub mod logging;
pub mod messaging;
pub mod models;
pub mod outbox;
pub mod resilience;

pub use config::CaseflowConfig;
pub use database::DatabaseConnection;
pub use error::{CaseflowError, Result};
pub use events::{
    CaseUpdateReceiver, CollectionExerciseUpdateReceiver, EventFilter, EventTypeToSend,
    SurveyUpdateReceiver, UacUpdateReceiver,
};
pub use messaging::{BusPublisher, PgmqBusPublisher, PublishError};
pub use outbox::{EventTransfer, OutboxPoller, OutboxProcessor, OutboxStore};
pub use resilience::RetryPolicy;
