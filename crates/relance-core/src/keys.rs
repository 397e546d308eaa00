//! Storage key/path conventions.
//!
//! Pure string functions — no AWS SDK dependency. These define the canonical
//! layout of rows in the Relance bucket.

use uuid::Uuid;

pub fn questionnaire(id: Uuid) -> String {
    format!("questionnaires/{id}.json")
}

pub const QUESTIONNAIRES_PREFIX: &str = "questionnaires/";

/// One response per questionnaire — keyed by the parent id so existence
/// checks need no listing.
pub fn response(questionnaire_id: Uuid) -> String {
    format!("responses/{questionnaire_id}.json")
}

pub fn alert(id: Uuid) -> String {
    format!("alerts/{id}.json")
}

pub fn practitioner(id: &str) -> String {
    format!("practitioners/{id}.json")
}

pub fn backup_log(questionnaire_id: Uuid) -> String {
    format!("backup_logs/{questionnaire_id}.json")
}
