//! relance-scoring
//!
//! Question normalization, answer validation, and score computation for
//! patient questionnaires. Pure data — no storage or network dependency.

pub mod error;
mod normalize;
mod score;
mod validate;

pub use error::ScoringError;
pub use normalize::normalize_questions;
pub use score::{compute_score, review_redirect, triggers_alert, Score};
pub use validate::{validate_answers, validate_answers_loose};
