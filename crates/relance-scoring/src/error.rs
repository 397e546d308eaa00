use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScoringError {
    #[error("answers must be an array")]
    NotAnArray,

    #[error("expected {expected} answers, got {got}")]
    LengthMismatch { expected: usize, got: usize },

    #[error("no answers provided")]
    Empty,

    #[error("answer {position} must be a whole number between 1 and 5")]
    InvalidAnswer { position: usize },
}
