//! # Update Receivers
//!
//! One receiver per inbound event kind, each applying a single event into
//! the relational model on the transport's own callback invocation. Case and
//! UAC receivers cooperate to tolerate out-of-order arrival via
//! skeleton-record creation; database errors propagate unmodified so the
//! transport's redelivery handles them.

pub mod case;
pub mod collection_exercise;
pub mod survey;
pub mod uac;

pub use case::CaseUpdateReceiver;
pub use collection_exercise::CollectionExerciseUpdateReceiver;
pub use survey::SurveyUpdateReceiver;
pub use uac::UacUpdateReceiver;
