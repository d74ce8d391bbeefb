use candidate_scoring::config::ScoringSettings;
use candidate_scoring::workflows::assessment::{
    Application, ApplicationId, BaselineMindsetScorer, Candidate, CandidateId, NotificationError,
    OracleError, QuestionScorer, RelevanceOracle, RelevanceRequest, RepositoryError,
    ScoreComposer, ScoreNotice, ScoreNotifier, ScoringRepository, SurveyResponseService,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::{BTreeSet, HashMap};
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

pub(crate) type LocalScoringService =
    SurveyResponseService<InMemoryScoringRepository, KeywordRelevanceOracle, LoggingScoreNotifier>;

#[derive(Default, Clone)]
pub(crate) struct InMemoryScoringRepository {
    applications: Arc<Mutex<HashMap<ApplicationId, Application>>>,
    candidates: Arc<Mutex<HashMap<CandidateId, Candidate>>>,
}

impl InMemoryScoringRepository {
    pub(crate) fn candidate(&self, id: &CandidateId) -> Option<Candidate> {
        let guard = self.candidates.lock().expect("repository mutex poisoned");
        guard.get(id).cloned()
    }
}

impl ScoringRepository for InMemoryScoringRepository {
    fn save_application(&self, application: &Application) -> Result<(), RepositoryError> {
        let mut guard = self.applications.lock().expect("repository mutex poisoned");
        guard.insert(application.id.clone(), application.clone());
        Ok(())
    }

    fn save_candidate(&self, candidate: &Candidate) -> Result<(), RepositoryError> {
        let mut guard = self.candidates.lock().expect("repository mutex poisoned");
        guard.insert(candidate.id.clone(), candidate.clone());
        Ok(())
    }

    fn fetch_application(&self, id: &ApplicationId) -> Result<Option<Application>, RepositoryError> {
        let guard = self.applications.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum NoticeKind {
    Feedback,
    AtsPush,
}

/// Records downstream notices and logs them in place of the ATS and feedback services.
#[derive(Default, Clone)]
pub(crate) struct LoggingScoreNotifier {
    events: Arc<Mutex<Vec<(NoticeKind, ScoreNotice)>>>,
}

impl LoggingScoreNotifier {
    pub(crate) fn events(&self) -> Vec<(NoticeKind, ScoreNotice)> {
        self.events.lock().expect("notifier mutex poisoned").clone()
    }

    fn record(&self, kind: NoticeKind, notice: &ScoreNotice) {
        let mut guard = self.events.lock().expect("notifier mutex poisoned");
        guard.push((kind, notice.clone()));
    }
}

impl ScoreNotifier for LoggingScoreNotifier {
    fn push_to_ats(&self, notice: &ScoreNotice) -> Result<(), NotificationError> {
        info!(
            application_id = %notice.application_id.0,
            overall_score = notice.overall_score,
            "score pushed to ATS"
        );
        self.record(NoticeKind::AtsPush, notice);
        Ok(())
    }

    fn generate_feedback(&self, notice: &ScoreNotice) -> Result<(), NotificationError> {
        info!(
            candidate_id = %notice.candidate_id.0,
            survey = %notice.survey_name,
            "candidate feedback queued"
        );
        self.record(NoticeKind::Feedback, notice);
        Ok(())
    }
}

/// Local relevance oracle: share of the prompt's keywords the answer mentions.
///
/// Keywords are distinct alphanumeric words of four or more characters, compared
/// case-insensitively.
#[derive(Debug, Clone, Copy)]
pub(crate) struct KeywordRelevanceOracle {
    delimiter: char,
}

impl KeywordRelevanceOracle {
    pub(crate) fn new(delimiter: char) -> Self {
        Self { delimiter }
    }
}

fn keywords(text: &str) -> BTreeSet<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|word| word.chars().count() >= 4)
        .map(str::to_lowercase)
        .collect()
}

impl RelevanceOracle for KeywordRelevanceOracle {
    fn relevance(&self, request: RelevanceRequest<'_>) -> Result<String, OracleError> {
        let prompt = keywords(request.prompt);
        if prompt.is_empty() {
            return Ok(format!(
                "{:.2}{}prompt has no keywords to match",
                0.0, self.delimiter
            ));
        }

        let answer = keywords(request.answer);
        let matched = prompt.intersection(&answer).count();
        let score = matched as f64 / prompt.len() as f64;
        Ok(format!(
            "{score:.2}{}answer mentions {matched} of {} prompt keywords",
            self.delimiter,
            prompt.len()
        ))
    }
}

/// Wire the scoring service against the in-memory adapters and keyword oracle.
pub(crate) fn local_scoring_service(
    settings: &ScoringSettings,
) -> (
    Arc<LocalScoringService>,
    Arc<InMemoryScoringRepository>,
    Arc<LoggingScoreNotifier>,
) {
    let repository = Arc::new(InMemoryScoringRepository::default());
    let notifier = Arc::new(LoggingScoreNotifier::default());
    let oracle = Arc::new(KeywordRelevanceOracle::new(settings.verdict_delimiter));
    let scorer = QuestionScorer::new(oracle, settings.scoring_config());
    let composer = ScoreComposer::new(Arc::new(BaselineMindsetScorer::new(
        settings.mindset_baseline,
    )));
    let service = Arc::new(SurveyResponseService::new(
        repository.clone(),
        notifier.clone(),
        scorer,
        composer,
    ));
    (service, repository, notifier)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ask(oracle: &KeywordRelevanceOracle, prompt: &str, answer: &str) -> String {
        oracle
            .relevance(RelevanceRequest {
                answer,
                prompt,
                survey_name: "Backend Engineer",
            })
            .expect("keyword oracle never fails")
    }

    #[test]
    fn keyword_oracle_reports_share_of_prompt_keywords() {
        let oracle = KeywordRelevanceOracle::new('-');
        // keywords: want, work, with
        let verdict = ask(
            &oracle,
            "Why do you want to work with us?",
            "I WANT to work on hard problems",
        );
        assert_eq!(verdict, "0.67-answer mentions 2 of 3 prompt keywords");
    }

    #[test]
    fn keyword_oracle_scores_zero_without_prompt_keywords() {
        let oracle = KeywordRelevanceOracle::new('|');
        let verdict = ask(&oracle, "Why?", "Because");
        assert_eq!(verdict, "0.00|prompt has no keywords to match");
    }

    #[test]
    fn local_service_uses_configured_delimiter() {
        let settings = ScoringSettings {
            verdict_delimiter: '|',
            ..ScoringSettings::default()
        };
        let (service, _, _) = local_scoring_service(&settings);
        let response = service.process(crate::demo::sample_response(false, None));
        assert!(response.success, "{}", response.message);
    }
}
