use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// A single question within a questionnaire.
///
/// Normalized once at the creation boundary — loosely-shaped client input
/// (bare strings, objects with varying prompt field names) never survives
/// past `relance_scoring::normalize_questions`. Order is significant and
/// preserved from creation through rendering to scoring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(tag = "type", rename_all = "snake_case")]
#[ts(export)]
pub enum Question {
    /// 1–5 satisfaction scale with labels on both ends.
    Scale {
        prompt: String,
        label_low: String,
        label_high: String,
    },
    /// Free-text question. Answered through the submission's comment field.
    FreeText { prompt: String },
}

impl Question {
    pub fn prompt(&self) -> &str {
        match self {
            Question::Scale { prompt, .. } => prompt,
            Question::FreeText { prompt } => prompt,
        }
    }
}
