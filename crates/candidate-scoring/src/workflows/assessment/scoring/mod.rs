mod choice;
mod relevance;

pub use relevance::{
    OracleError, RelevanceOracle, RelevanceRequest, RelevanceVerdict, DEFAULT_VERDICT_DELIMITER,
};

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::domain::{AnswerKind, AnswerSet, Company, Question, SurveyAnswer, PERSONAL_INFO_KEY};
use choice::{choice_score, ChoiceScale};

/// What to do when the relevance oracle fails for a single free-text question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OracleFailurePolicy {
    /// Fail the whole scoring pass.
    #[default]
    Abort,
    /// Score the affected question 0 and carry on.
    ScoreZero,
}

/// Scoring knobs shared by every question in a pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoringConfig {
    pub verdict_delimiter: char,
    pub oracle_failure: OracleFailurePolicy,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            verdict_delimiter: DEFAULT_VERDICT_DELIMITER,
            oracle_failure: OracleFailurePolicy::Abort,
        }
    }
}

/// Result of scoring a single answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionScore {
    /// 0-100.
    pub score: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

impl QuestionScore {
    fn zero() -> Self {
        Self {
            score: 0.0,
            explanation: None,
        }
    }
}

/// Error raised while scoring a single question.
#[derive(Debug, thiserror::Error)]
pub enum ScoringError {
    #[error("relevance oracle failed for question {question_id}: {source}")]
    Oracle {
        question_id: String,
        #[source]
        source: OracleError,
    },
    #[error("malformed relevance verdict for question {question_id}: {raw:?}")]
    MalformedVerdict { question_id: String, raw: String },
}

/// Turns raw answers into 0-100 question scores.
pub struct QuestionScorer<O: ?Sized> {
    oracle: Arc<O>,
    config: ScoringConfig,
}

impl<O> QuestionScorer<O>
where
    O: RelevanceOracle + ?Sized,
{
    pub fn new(oracle: Arc<O>, config: ScoringConfig) -> Self {
        Self { oracle, config }
    }

    /// Score one answer against its question, writing the result back onto the answer.
    ///
    /// A missing answer or question, or an answer without a kind, is a no-op scoring 0.
    pub fn score_question(
        &self,
        answer: Option<&mut SurveyAnswer>,
        question: Option<&Question>,
        company: &Company,
        survey_name: &str,
    ) -> Result<QuestionScore, ScoringError> {
        let (Some(answer), Some(question)) = (answer, question) else {
            return Ok(QuestionScore::zero());
        };

        let Some(kind) = &answer.kind else {
            return Ok(QuestionScore::zero());
        };

        let result = match kind {
            AnswerKind::MultipleChoice(selected) | AnswerKind::Coding(selected) => {
                let (scale, score) = choice_score(
                    selected,
                    &question.correct_answers,
                    &question.reference,
                    company,
                );
                debug!(
                    question_id = %question.id,
                    fixed_scale = scale == ChoiceScale::Fixed,
                    score,
                    "scored choice answer"
                );
                QuestionScore {
                    score,
                    explanation: None,
                }
            }
            AnswerKind::FreeText(text) => self.score_free_text(text, question, survey_name)?,
        };

        answer.score = Some(result.score);
        answer.explanation = result.explanation.clone();

        Ok(result)
    }

    fn score_free_text(
        &self,
        text: &str,
        question: &Question,
        survey_name: &str,
    ) -> Result<QuestionScore, ScoringError> {
        let raw = self
            .oracle
            .relevance(RelevanceRequest {
                answer: text,
                prompt: &question.prompt,
                survey_name,
            })
            .map_err(|source| ScoringError::Oracle {
                question_id: question.id.clone(),
                source,
            })?;

        let verdict = RelevanceVerdict::parse(&raw, self.config.verdict_delimiter).ok_or_else(
            || ScoringError::MalformedVerdict {
                question_id: question.id.clone(),
                raw: raw.clone(),
            },
        )?;

        debug!(question_id = %question.id, relevance = verdict.score, "scored free-text answer");

        let score = verdict.percentage();
        let explanation = question.retain_explanation.then_some(verdict.explanation);
        Ok(QuestionScore { score, explanation })
    }

    /// Score every scorable answer in the set, keyed by question id.
    ///
    /// Answers without a question id or kind, the `personalInfo` entry, and answers
    /// whose question is not part of the survey are skipped.
    pub fn score_all_questions(
        &self,
        answers: &mut AnswerSet,
        questions: &[Question],
        company: &Company,
        survey_name: &str,
    ) -> Result<BTreeMap<String, f64>, ScoringError> {
        let mut scores = BTreeMap::new();

        for (key, answer) in answers.iter_mut() {
            if key == PERSONAL_INFO_KEY {
                continue;
            }
            let Some(question_id) = answer.scorable_question_id().map(str::to_string) else {
                continue;
            };
            if answer.kind.is_none() {
                debug!(%question_id, "answer has no kind; left unscored");
                continue;
            }
            let Some(question) = questions.iter().find(|question| question.id == question_id)
            else {
                debug!(%question_id, "no matching question; answer left unscored");
                continue;
            };

            let score = match self.score_question(
                Some(&mut *answer),
                Some(question),
                company,
                survey_name,
            ) {
                Ok(result) => result.score,
                Err(error) if self.config.oracle_failure == OracleFailurePolicy::ScoreZero => {
                    warn!(%question_id, %error, "question scored 0 after oracle failure");
                    answer.score = Some(0.0);
                    answer.explanation = None;
                    0.0
                }
                Err(error) => return Err(error),
            };
            scores.insert(question_id, score);
        }

        Ok(scores)
    }
}
