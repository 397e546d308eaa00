use serde::{Deserialize, Serialize};
use ts_rs::TS;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum Role {
    Practitioner,
    Admin,
}

/// Practitioner profile row, mirrored from the auth provider.
/// Resolution target for alert and notification dispatch.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Practitioner {
    /// Auth provider subject id.
    pub id: String,
    pub email: String,
    pub full_name: String,
    pub role: Role,
    pub region: Option<String>,
}
