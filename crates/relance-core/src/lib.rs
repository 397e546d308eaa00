//! relance-core
//!
//! Pure domain types and storage key conventions. No AWS SDK dependency —
//! this is the shared vocabulary of the Relance system.

pub mod keys;
pub mod models;
