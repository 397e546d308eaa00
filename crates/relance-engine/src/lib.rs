//! relance-engine
//!
//! Questionnaire lifecycle manager and response intake. The ephemeral cache
//! is authoritative for "is this link still fillable"; durable storage is
//! authoritative for everything else (status, ownership, responses).

pub mod error;
mod intake;
mod lifecycle;

pub use error::EngineError;
pub use intake::{RawSubmission, SubmissionOutcome};
pub use lifecycle::{Created, CreateQuestionnaire, QuestionnaireSummary};

use std::sync::Arc;

use relance_cache::TtlCache;
use relance_core::models::questionnaire::Questionnaire;
use relance_mailer::Mailer;
use relance_storage::rows::RowStore;

#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Base URL the patient-facing links are built from, without a trailing
    /// slash.
    pub app_url: String,
}

pub struct Engine {
    cache: Arc<TtlCache<Questionnaire>>,
    store: Arc<dyn RowStore>,
    mailer: Arc<dyn Mailer>,
    config: EngineConfig,
}

impl Engine {
    pub fn new(
        cache: Arc<TtlCache<Questionnaire>>,
        store: Arc<dyn RowStore>,
        mailer: Arc<dyn Mailer>,
        config: EngineConfig,
    ) -> Self {
        Self {
            cache,
            store,
            mailer,
            config,
        }
    }

    pub(crate) fn link(&self, id: uuid::Uuid) -> String {
        format!("{}/q/{id}", self.config.app_url)
    }
}
