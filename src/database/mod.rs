//! # Database Operations
//!
//! Connection management with SQLx pooling and the embedded schema
//! migrations for the caseflow tables.

pub mod connection;

pub use connection::DatabaseConnection;
