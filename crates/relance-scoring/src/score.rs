/// Scores at or below this trigger a practitioner alert.
pub const ALERT_THRESHOLD: u8 = 2;

/// Averages at or above this trigger the review redirect.
pub const REVIEW_THRESHOLD: f64 = 4.5;

/// Aggregate score for one response.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Score {
    /// Unrounded mean of the answers.
    pub average: f64,
    /// `round(clamp(average, 1, 5))` — the value thresholds compare against.
    pub total: u8,
}

/// Compute the aggregate score of a validated answer set.
///
/// Callers validate non-emptiness first; answers are in [1,5].
pub fn compute_score(answers: &[u8]) -> Score {
    debug_assert!(!answers.is_empty());
    let sum: u32 = answers.iter().map(|&a| u32::from(a)).sum();
    let average = f64::from(sum) / answers.len() as f64;
    let total = average.clamp(1.0, 5.0).round() as u8;
    Score { average, total }
}

/// Whether this score warrants a low-score alert to the practitioner.
pub fn triggers_alert(score: &Score) -> bool {
    score.total <= ALERT_THRESHOLD
}

/// The review URL the patient's client should open after submission, if the
/// score is high enough and a review page is configured. Response-shaping
/// only — never a server-side redirect.
pub fn review_redirect(score: &Score, review_url: Option<&str>) -> Option<String> {
    if score.average >= REVIEW_THRESHOLD {
        review_url.map(str::to_string)
    } else {
        None
    }
}
