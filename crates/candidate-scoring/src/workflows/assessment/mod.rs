//! Candidate survey scoring: per-question scoring, pillar aggregation, and
//! composition of the final application score.
//!
//! Persistence, the relevance oracle, and downstream notifications are injected
//! through the traits in [`repository`] and [`scoring`] so the pipeline can run
//! against in-memory adapters.

pub mod composition;
pub mod domain;
pub mod repository;
pub mod router;
pub mod scoring;
pub mod service;

#[cfg(test)]
mod tests;

pub use composition::{
    BaselineMindsetScorer, CompositeResult, DynamicPillarScores, FixedPillarScores,
    MindsetScorer, PillarMode, PillarScores, PillarTally, ScoreComposer,
};
pub use domain::{
    AnswerKind, AnswerSet, Application, ApplicationId, ApplicationStatusView, Candidate,
    CandidateId, Company, FixedWeights, Mindset, PersonalityProfile, PillarWeights, Question,
    Survey, SurveyAnswer, SurveyId, SurveyResponse,
};
pub use repository::{
    NotificationError, RepositoryError, ScoreNotice, ScoreNotifier, ScoringRepository,
};
pub use router::scoring_router;
pub use scoring::{
    OracleError, OracleFailurePolicy, QuestionScore, QuestionScorer, RelevanceOracle,
    RelevanceRequest, ScoringConfig, ScoringError,
};
pub use service::{
    ProcessedSurvey, SurveyProcessingError, SurveyProcessingResponse, SurveyResponseService,
};
