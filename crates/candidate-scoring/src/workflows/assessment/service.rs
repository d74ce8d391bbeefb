use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::composition::{CompositeResult, PillarScores, ScoreComposer};
use super::domain::{ApplicationId, ApplicationStatusView, SurveyResponse};
use super::repository::{RepositoryError, ScoreNotice, ScoreNotifier, ScoringRepository};
use super::scoring::{QuestionScorer, RelevanceOracle, ScoringError};

/// Uniform outcome handed back to callers of the scoring pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SurveyProcessingResponse {
    pub success: bool,
    pub overall_score: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scores: Option<PillarScores>,
    pub message: String,
}

impl SurveyProcessingResponse {
    pub fn success(overall_score: f64, scores: PillarScores) -> Self {
        Self {
            success: true,
            overall_score,
            scores: Some(scores),
            message: "Success".to_string(),
        }
    }

    pub fn failure(error: &SurveyProcessingError) -> Self {
        Self {
            success: false,
            overall_score: 0.0,
            scores: None,
            message: format!("processing failed: {error}"),
        }
    }
}

/// Detailed result of a successful pass.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessedSurvey {
    pub application_id: ApplicationId,
    pub question_scores: BTreeMap<String, f64>,
    pub scores: PillarScores,
    pub composite: CompositeResult,
}

/// Error raised by the survey processing pipeline.
#[derive(Debug, thiserror::Error)]
pub enum SurveyProcessingError {
    #[error("survey response {response_id} has no linked application")]
    MissingApplication { response_id: String },
    #[error(transparent)]
    Scoring(#[from] ScoringError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Sequences validate, score, aggregate, persist, and notify for one survey response.
pub struct SurveyResponseService<R, O: ?Sized, N> {
    repository: Arc<R>,
    notifier: Arc<N>,
    scorer: Arc<QuestionScorer<O>>,
    composer: Arc<ScoreComposer>,
}

impl<R, O, N> SurveyResponseService<R, O, N>
where
    R: ScoringRepository + 'static,
    O: RelevanceOracle + ?Sized + 'static,
    N: ScoreNotifier + 'static,
{
    pub fn new(
        repository: Arc<R>,
        notifier: Arc<N>,
        scorer: QuestionScorer<O>,
        composer: ScoreComposer,
    ) -> Self {
        Self {
            repository,
            notifier,
            scorer: Arc::new(scorer),
            composer: Arc::new(composer),
        }
    }

    /// Process a response, folding any failure into the response message.
    pub fn process(&self, response: SurveyResponse) -> SurveyProcessingResponse {
        match self.try_process(response) {
            Ok(processed) => SurveyProcessingResponse::success(
                processed.composite.blended_score,
                processed.scores,
            ),
            Err(error) => {
                warn!(%error, "survey processing failed");
                SurveyProcessingResponse::failure(&error)
            }
        }
    }

    pub fn try_process(
        &self,
        response: SurveyResponse,
    ) -> Result<ProcessedSurvey, SurveyProcessingError> {
        let SurveyResponse {
            id: response_id,
            survey,
            mut candidate,
            application,
            mut answers,
        } = response;

        let mut application = application.ok_or_else(|| {
            SurveyProcessingError::MissingApplication {
                response_id: response_id.clone(),
            }
        })?;
        application.complete = true;
        application.response_id = Some(response_id);
        self.repository.save_application(&application)?;

        let question_scores = self.scorer.score_all_questions(
            &mut answers,
            &survey.questions,
            &survey.company,
            &survey.name,
        )?;

        let scores = self.composer.aggregate_pillars_for(
            answers.values(),
            &survey.company,
            Some(&survey.company.pillars),
            &candidate.mindset,
            &survey.personality_profile,
        );

        let cv_score = candidate.cv_score_for(&survey.id);
        let composite = self
            .composer
            .compose_final(&mut application, scores.clone(), cv_score);

        candidate
            .survey_scores
            .insert(survey.id.clone(), composite.pillar_score);
        candidate
            .overall_scores
            .insert(survey.id.clone(), composite.blended_score);

        self.repository.save_application(&application)?;
        self.repository.save_candidate(&candidate)?;

        info!(
            application_id = %application.id.0,
            questions = question_scores.len(),
            pillar_score = composite.pillar_score,
            overall_score = composite.blended_score,
            "survey response scored"
        );

        let notice = ScoreNotice {
            application_id: application.id.clone(),
            candidate_id: candidate.id.clone(),
            survey_id: survey.id.clone(),
            survey_name: survey.name.clone(),
            overall_score: composite.blended_score,
        };
        self.notify(&notice);

        Ok(ProcessedSurvey {
            application_id: application.id,
            question_scores,
            scores,
            composite,
        })
    }

    fn notify(&self, notice: &ScoreNotice) {
        if let Err(error) = self.notifier.generate_feedback(notice) {
            warn!(application_id = %notice.application_id.0, %error, "feedback generation failed");
        }
        if let Err(error) = self.notifier.push_to_ats(notice) {
            warn!(application_id = %notice.application_id.0, %error, "ATS push failed");
        }
    }

    /// Fetch an application's scoring state for API responses.
    pub fn get(&self, id: &ApplicationId) -> Result<ApplicationStatusView, RepositoryError> {
        self.repository
            .fetch_application(id)?
            .map(|application| application.status_view())
            .ok_or(RepositoryError::NotFound)
    }
}
