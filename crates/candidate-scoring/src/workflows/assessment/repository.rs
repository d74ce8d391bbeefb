use serde::{Deserialize, Serialize};

use super::domain::{Application, ApplicationId, Candidate, CandidateId, SurveyId};

/// Storage abstraction so the scoring service can be exercised in isolation.
pub trait ScoringRepository: Send + Sync {
    /// Upsert an application record.
    fn save_application(&self, application: &Application) -> Result<(), RepositoryError>;
    /// Upsert a candidate record.
    fn save_candidate(&self, candidate: &Candidate) -> Result<(), RepositoryError>;
    fn fetch_application(&self, id: &ApplicationId) -> Result<Option<Application>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Downstream hooks run once an application has been scored (ATS push, feedback).
pub trait ScoreNotifier: Send + Sync {
    fn push_to_ats(&self, notice: &ScoreNotice) -> Result<(), NotificationError>;
    fn generate_feedback(&self, notice: &ScoreNotice) -> Result<(), NotificationError>;
}

/// Payload describing a freshly scored application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreNotice {
    pub application_id: ApplicationId,
    pub candidate_id: CandidateId,
    pub survey_id: SurveyId,
    pub survey_name: String,
    pub overall_score: f64,
}

/// Notification dispatch error.
#[derive(Debug, thiserror::Error)]
pub enum NotificationError {
    #[error("notification transport unavailable: {0}")]
    Transport(String),
}
