use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::composition::PillarScores;

/// Answer-map key (and question id) reserved for candidate metadata rather than a question.
pub const PERSONAL_INFO_KEY: &str = "personalInfo";

/// Identifier wrapper for candidate applications.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ApplicationId(pub String);

/// Identifier wrapper for candidates.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CandidateId(pub String);

/// Identifier wrapper for surveys; also keys the candidate's per-survey score maps.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SurveyId(pub String);

/// Immutable question definition owned by the survey configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: String,
    /// Pillar tag, e.g. `values`, `culture`, `workplace`, or a company-specific name.
    pub reference: String,
    #[serde(rename = "question")]
    pub prompt: String,
    #[serde(default)]
    pub available_answers: Vec<String>,
    #[serde(default)]
    pub correct_answers: Vec<String>,
    /// Keep the relevance oracle's explanation on free-text answers.
    #[serde(default)]
    pub retain_explanation: bool,
}

/// What the candidate submitted for a question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "answer", rename_all = "camelCase")]
pub enum AnswerKind {
    MultipleChoice(Vec<String>),
    Coding(Vec<String>),
    #[serde(rename = "text")]
    FreeText(String),
}

/// One candidate response, mutated in place by the question scorer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SurveyAnswer {
    #[serde(default)]
    pub question_id: Option<String>,
    #[serde(default)]
    pub reference: String,
    /// Absent on metadata entries such as `personalInfo`, which carry no `type`.
    #[serde(flatten)]
    pub kind: Option<AnswerKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

impl SurveyAnswer {
    pub fn new(question_id: impl Into<String>, reference: impl Into<String>, kind: AnswerKind) -> Self {
        Self {
            question_id: Some(question_id.into()),
            reference: reference.into(),
            kind: Some(kind),
            score: None,
            explanation: None,
        }
    }

    /// Identifier of the question this answer scores against, if it is a scorable record.
    pub fn scorable_question_id(&self) -> Option<&str> {
        self.question_id
            .as_deref()
            .filter(|id| !id.is_empty() && *id != PERSONAL_INFO_KEY)
    }
}

/// Answers keyed by submission entry; ordered so scoring passes are reproducible.
pub type AnswerSet = BTreeMap<String, SurveyAnswer>;

/// Fixed four-pillar weights used when the company defines no custom pillars.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FixedWeights {
    pub values: f64,
    pub culture: f64,
    pub mindset: f64,
    pub work_life: f64,
}

impl FixedWeights {
    pub fn sum(&self) -> f64 {
        self.values + self.culture + self.mindset + self.work_life
    }
}

impl Default for FixedWeights {
    fn default() -> Self {
        Self {
            values: 0.25,
            culture: 0.25,
            mindset: 0.25,
            work_life: 0.25,
        }
    }
}

/// Company-defined pillar names and their weights.
pub type PillarWeights = BTreeMap<String, f64>;

/// Company context consulted during scoring and composition.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    pub id: String,
    #[serde(default)]
    pub weightings: FixedWeights,
    /// Empty selects the fixed four-pillar model.
    #[serde(default)]
    pub pillars: PillarWeights,
}

/// Big-five style trait readings captured for a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Mindset {
    pub neuroticism: f64,
    pub extraversion: f64,
    pub openness: f64,
    pub conscientiousness: f64,
    pub agreeableness: f64,
    pub social_desirability: f64,
}

/// Target trait profile a survey's company is hiring against.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalityProfile {
    pub target_neuroticism: f64,
    pub target_extraversion: f64,
    pub target_openness: f64,
    pub target_conscientiousness: f64,
    pub target_agreeableness: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Survey {
    pub id: SurveyId,
    pub name: String,
    #[serde(default)]
    pub questions: Vec<Question>,
    pub company: Company,
    #[serde(default)]
    pub personality_profile: PersonalityProfile,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub id: CandidateId,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub mindset: Mindset,
    /// Externally supplied CV scores keyed by survey.
    #[serde(default)]
    pub cv_scores: BTreeMap<SurveyId, f64>,
    #[serde(default)]
    pub survey_scores: BTreeMap<SurveyId, f64>,
    #[serde(default)]
    pub overall_scores: BTreeMap<SurveyId, f64>,
}

impl Candidate {
    /// CV score supplied for `survey`, or 0 ("not supplied") when absent.
    pub fn cv_score_for(&self, survey: &SurveyId) -> f64 {
        self.cv_scores.get(survey).copied().unwrap_or(0.0)
    }
}

/// Application record the composed scores are written onto.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    pub id: ApplicationId,
    pub candidate_id: CandidateId,
    pub survey_id: SurveyId,
    #[serde(default)]
    pub complete: bool,
    #[serde(default)]
    pub response_id: Option<String>,
    #[serde(default)]
    pub scores: Option<PillarScores>,
    #[serde(default)]
    pub overall_score: Option<f64>,
    #[serde(default)]
    pub scored_at: Option<DateTime<Utc>>,
}

impl Application {
    pub fn new(id: ApplicationId, candidate_id: CandidateId, survey_id: SurveyId) -> Self {
        Self {
            id,
            candidate_id,
            survey_id,
            complete: false,
            response_id: None,
            scores: None,
            overall_score: None,
            scored_at: None,
        }
    }

    pub fn status_view(&self) -> ApplicationStatusView {
        ApplicationStatusView {
            application_id: self.id.clone(),
            complete: self.complete,
            pillar_score: self.scores.as_ref().map(PillarScores::overall_score),
            overall_score: self.overall_score,
        }
    }
}

/// Sanitized representation of an application's scoring state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApplicationStatusView {
    pub application_id: ApplicationId,
    pub complete: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pillar_score: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overall_score: Option<f64>,
}

/// A candidate's completed survey as submitted by intake.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SurveyResponse {
    pub id: String,
    pub survey: Survey,
    pub candidate: Candidate,
    #[serde(default)]
    pub application: Option<Application>,
    #[serde(default, rename = "answerMap")]
    pub answers: AnswerSet,
}
