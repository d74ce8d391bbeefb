use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};

use crate::workflows::assessment::domain::{
    AnswerKind, AnswerSet, Application, ApplicationId, Candidate, CandidateId, Company,
    FixedWeights, PersonalityProfile, PillarWeights, Question, Survey, SurveyAnswer, SurveyId,
    SurveyResponse, PERSONAL_INFO_KEY,
};
use crate::workflows::assessment::repository::{
    NotificationError, RepositoryError, ScoreNotice, ScoreNotifier, ScoringRepository,
};
use crate::workflows::assessment::scoring::{
    OracleError, OracleFailurePolicy, QuestionScorer, RelevanceOracle, RelevanceRequest,
    ScoringConfig,
};
use crate::workflows::assessment::{ScoreComposer, SurveyResponseService};

pub(super) const SURVEY_ID: &str = "survey-backend";

pub(super) fn approx(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 0.01,
        "expected {expected}, got {actual}"
    );
}

pub(super) fn tokens(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| value.to_string()).collect()
}

pub(super) fn question(id: &str, reference: &str, correct: &[&str]) -> Question {
    Question {
        id: id.to_string(),
        reference: reference.to_string(),
        prompt: format!("Prompt for {id}"),
        available_answers: tokens(correct),
        correct_answers: tokens(correct),
        retain_explanation: false,
    }
}

pub(super) fn text_question(id: &str, reference: &str, retain_explanation: bool) -> Question {
    Question {
        id: id.to_string(),
        reference: reference.to_string(),
        prompt: "Why do you want to work with us?".to_string(),
        available_answers: Vec::new(),
        correct_answers: Vec::new(),
        retain_explanation,
    }
}

pub(super) fn choice(question_id: &str, reference: &str, selected: &[&str]) -> SurveyAnswer {
    SurveyAnswer::new(
        question_id,
        reference,
        AnswerKind::MultipleChoice(tokens(selected)),
    )
}

pub(super) fn text(question_id: &str, reference: &str, body: &str) -> SurveyAnswer {
    SurveyAnswer::new(question_id, reference, AnswerKind::FreeText(body.to_string()))
}

/// Metadata entry as intake submits it: no question id, no answer type.
pub(super) fn personal_info() -> SurveyAnswer {
    SurveyAnswer {
        question_id: None,
        reference: String::new(),
        kind: None,
        score: None,
        explanation: None,
    }
}

pub(super) fn company(pillars: PillarWeights) -> Company {
    Company {
        id: "acme".to_string(),
        weightings: FixedWeights::default(),
        pillars,
    }
}

/// Fixed-model survey: two values, three culture, one workplace question.
pub(super) fn fixed_survey() -> Survey {
    Survey {
        id: SurveyId(SURVEY_ID.to_string()),
        name: "Backend Engineer".to_string(),
        questions: vec![
            question("v1", "values", &["always", "often", "sometimes"]),
            question("v2", "values", &["Honesty", "Ownership"]),
            question("c1", "culture", &["always", "often"]),
            question("c2", "culture", &["Remote", "Async"]),
            text_question("c3", "culture", true),
            question("w1", "workplace", &["Flexible hours", "Gym", "Childcare"]),
        ],
        company: company(PillarWeights::new()),
        personality_profile: PersonalityProfile::default(),
    }
}

pub(super) fn fixed_answers() -> AnswerSet {
    let mut answers = BTreeMap::new();
    // (1.0 + 0.75) / 3 = 58.33
    answers.insert("v1".to_string(), choice("v1", "values", &["always", "often"]));
    // 2 / 2 = 100
    answers.insert(
        "v2".to_string(),
        choice("v2", "values", &["honesty", "Ownership"]),
    );
    // 0.75 / 2 = 37.5
    answers.insert("c1".to_string(), choice("c1", "culture", &["often"]));
    // 1 / 2 = 50
    answers.insert("c2".to_string(), choice("c2", "culture", &["Async", "Office"]));
    // oracle 0.9
    answers.insert(
        "c3".to_string(),
        text("c3", "culture", "I care about your engineering culture"),
    );
    // 2 / 3 = 66.67
    answers.insert(
        "w1".to_string(),
        choice("w1", "workplace", &["Gym", "Childcare"]),
    );
    answers.insert(PERSONAL_INFO_KEY.to_string(), personal_info());
    answers
}

pub(super) fn candidate(cv_score: Option<f64>) -> Candidate {
    let mut cv_scores = BTreeMap::new();
    if let Some(score) = cv_score {
        cv_scores.insert(SurveyId(SURVEY_ID.to_string()), score);
    }
    Candidate {
        id: CandidateId("cand-42".to_string()),
        email: "jane@example.com".to_string(),
        first_name: "Jane".to_string(),
        last_name: "Doe".to_string(),
        mindset: Default::default(),
        cv_scores,
        survey_scores: BTreeMap::new(),
        overall_scores: BTreeMap::new(),
    }
}

pub(super) fn application() -> Application {
    Application::new(
        ApplicationId("app-42".to_string()),
        CandidateId("cand-42".to_string()),
        SurveyId(SURVEY_ID.to_string()),
    )
}

pub(super) fn survey_response(cv_score: Option<f64>) -> SurveyResponse {
    SurveyResponse {
        id: "resp-42".to_string(),
        survey: fixed_survey(),
        candidate: candidate(cv_score),
        application: Some(application()),
        answers: fixed_answers(),
    }
}

/// Oracle returning canned verdicts, recording every request it sees.
#[derive(Default)]
pub(super) struct ScriptedOracle {
    verdict: Option<String>,
    failure: Option<String>,
    requests: Mutex<Vec<(String, String, String)>>,
}

impl ScriptedOracle {
    pub(super) fn returning(verdict: &str) -> Self {
        Self {
            verdict: Some(verdict.to_string()),
            ..Self::default()
        }
    }

    pub(super) fn failing(reason: &str) -> Self {
        Self {
            failure: Some(reason.to_string()),
            ..Self::default()
        }
    }

    pub(super) fn requests(&self) -> Vec<(String, String, String)> {
        self.requests.lock().expect("oracle mutex poisoned").clone()
    }
}

impl RelevanceOracle for ScriptedOracle {
    fn relevance(&self, request: RelevanceRequest<'_>) -> Result<String, OracleError> {
        self.requests
            .lock()
            .expect("oracle mutex poisoned")
            .push((
                request.answer.to_string(),
                request.prompt.to_string(),
                request.survey_name.to_string(),
            ));
        if let Some(reason) = &self.failure {
            return Err(OracleError::Unavailable(reason.clone()));
        }
        Ok(self.verdict.clone().unwrap_or_default())
    }
}

pub(super) fn scorer(oracle: Arc<ScriptedOracle>) -> QuestionScorer<ScriptedOracle> {
    QuestionScorer::new(oracle, ScoringConfig::default())
}

pub(super) fn lenient_scorer(oracle: Arc<ScriptedOracle>) -> QuestionScorer<ScriptedOracle> {
    QuestionScorer::new(
        oracle,
        ScoringConfig {
            oracle_failure: OracleFailurePolicy::ScoreZero,
            ..ScoringConfig::default()
        },
    )
}

#[derive(Default)]
pub(super) struct MemoryRepository {
    applications: Mutex<HashMap<ApplicationId, Application>>,
    candidates: Mutex<HashMap<CandidateId, Candidate>>,
    saves: Mutex<usize>,
    fail_with: Option<String>,
}

impl MemoryRepository {
    pub(super) fn unavailable(reason: &str) -> Self {
        Self {
            fail_with: Some(reason.to_string()),
            ..Self::default()
        }
    }

    pub(super) fn candidate(&self, id: &CandidateId) -> Option<Candidate> {
        self.candidates
            .lock()
            .expect("repository mutex poisoned")
            .get(id)
            .cloned()
    }

    pub(super) fn application_saves(&self) -> usize {
        *self.saves.lock().expect("repository mutex poisoned")
    }
}

impl ScoringRepository for MemoryRepository {
    fn save_application(&self, application: &Application) -> Result<(), RepositoryError> {
        if let Some(reason) = &self.fail_with {
            return Err(RepositoryError::Unavailable(reason.clone()));
        }
        *self.saves.lock().expect("repository mutex poisoned") += 1;
        self.applications
            .lock()
            .expect("repository mutex poisoned")
            .insert(application.id.clone(), application.clone());
        Ok(())
    }

    fn save_candidate(&self, candidate: &Candidate) -> Result<(), RepositoryError> {
        if let Some(reason) = &self.fail_with {
            return Err(RepositoryError::Unavailable(reason.clone()));
        }
        self.candidates
            .lock()
            .expect("repository mutex poisoned")
            .insert(candidate.id.clone(), candidate.clone());
        Ok(())
    }

    fn fetch_application(
        &self,
        id: &ApplicationId,
    ) -> Result<Option<Application>, RepositoryError> {
        Ok(self
            .applications
            .lock()
            .expect("repository mutex poisoned")
            .get(id)
            .cloned())
    }
}

#[derive(Default)]
pub(super) struct MemoryNotifier {
    events: Mutex<Vec<(&'static str, ScoreNotice)>>,
    fail: bool,
}

impl MemoryNotifier {
    pub(super) fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub(super) fn events(&self) -> Vec<(&'static str, ScoreNotice)> {
        self.events.lock().expect("notifier mutex poisoned").clone()
    }

    fn record(&self, kind: &'static str, notice: &ScoreNotice) -> Result<(), NotificationError> {
        self.events
            .lock()
            .expect("notifier mutex poisoned")
            .push((kind, notice.clone()));
        if self.fail {
            return Err(NotificationError::Transport("ats offline".to_string()));
        }
        Ok(())
    }
}

impl ScoreNotifier for MemoryNotifier {
    fn push_to_ats(&self, notice: &ScoreNotice) -> Result<(), NotificationError> {
        self.record("ats", notice)
    }

    fn generate_feedback(&self, notice: &ScoreNotice) -> Result<(), NotificationError> {
        self.record("feedback", notice)
    }
}

pub(super) type TestService = SurveyResponseService<MemoryRepository, ScriptedOracle, MemoryNotifier>;

pub(super) fn service(
    repository: Arc<MemoryRepository>,
    notifier: Arc<MemoryNotifier>,
    oracle: Arc<ScriptedOracle>,
) -> TestService {
    SurveyResponseService::new(repository, notifier, scorer(oracle), ScoreComposer::default())
}

pub(super) async fn read_json_body(response: axum::response::Response) -> serde_json::Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
