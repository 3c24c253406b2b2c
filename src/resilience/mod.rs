//! # Resilience Module
//!
//! Bounded-retry publishing with exponential backoff. The backoff schedule is
//! a pure function of the policy and the attempt count, independent of the
//! transport, so it is unit-testable without a real broker.

pub mod retry;

pub use retry::{backoff_delay, retry_with_backoff, RetryPolicy};
