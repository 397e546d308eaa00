use crate::error::ScoringError;

const MIN_ANSWER: i64 = 1;
const MAX_ANSWER: i64 = 5;

/// Strict intake path: the answer count must match the question count and
/// every element must be a whole number in [1,5]. Any bad element rejects
/// the whole submission — no partial insert.
pub fn validate_answers(
    answers: &serde_json::Value,
    expected_len: usize,
) -> Result<Vec<u8>, ScoringError> {
    let items = answers.as_array().ok_or(ScoringError::NotAnArray)?;
    if items.len() != expected_len {
        return Err(ScoringError::LengthMismatch {
            expected: expected_len,
            got: items.len(),
        });
    }
    check_elements(items)
}

/// Loose intake path: any non-empty numeric array is accepted, but a single
/// out-of-range or non-numeric element still rejects the whole submission.
pub fn validate_answers_loose(answers: &serde_json::Value) -> Result<Vec<u8>, ScoringError> {
    let items = answers.as_array().ok_or(ScoringError::NotAnArray)?;
    if items.is_empty() {
        return Err(ScoringError::Empty);
    }
    check_elements(items)
}

fn check_elements(items: &[serde_json::Value]) -> Result<Vec<u8>, ScoringError> {
    items
        .iter()
        .enumerate()
        .map(|(i, v)| match v.as_i64() {
            Some(n) if (MIN_ANSWER..=MAX_ANSWER).contains(&n) => Ok(n as u8),
            _ => Err(ScoringError::InvalidAnswer { position: i + 1 }),
        })
        .collect()
}
