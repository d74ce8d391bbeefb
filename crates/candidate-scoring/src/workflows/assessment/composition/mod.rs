//! Pillar aggregation and overall score composition.
//!
//! A company either uses the fixed four-pillar model (values, culture, mindset,
//! work-life) weighted by [`FixedWeights`], or defines its own pillar names and
//! weights. The mode is chosen once per aggregation and travels with the
//! resulting [`PillarScores`], so the overall-score formula can never mix them.

mod mindset;

pub use mindset::{BaselineMindsetScorer, MindsetScorer, DEFAULT_MINDSET_BASELINE};

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::domain::{
    Application, Company, FixedWeights, Mindset, PersonalityProfile, PillarWeights, SurveyAnswer,
};

const VALUES_PILLAR: &str = "values";
const CULTURE_PILLAR: &str = "culture";
const WORKPLACE_PILLAR: &str = "workplace";

/// Aggregation mode, selected from the company's pillar configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PillarMode<'a> {
    Fixed,
    Dynamic(&'a PillarWeights),
}

impl<'a> PillarMode<'a> {
    /// Dynamic when custom pillar weights are configured, fixed otherwise.
    pub fn select(pillars: Option<&'a PillarWeights>) -> Self {
        match pillars {
            Some(weights) if !weights.is_empty() => Self::Dynamic(weights),
            _ => Self::Fixed,
        }
    }
}

/// Fixed four-pillar averages plus the weights they are combined with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FixedPillarScores {
    pub values: f64,
    pub culture: f64,
    pub mindset: f64,
    pub growth_mindset: f64,
    pub work_life: f64,
    pub weights: FixedWeights,
}

impl FixedPillarScores {
    pub fn overall_score(&self) -> f64 {
        let total_weight = self.weights.sum();
        if total_weight <= 0.0 {
            return 0.0;
        }

        (self.values * self.weights.values
            + self.culture * self.weights.culture
            + self.mindset * self.weights.mindset
            + self.work_life * self.weights.work_life)
            / total_weight
    }
}

/// Average for one custom pillar and how many answers fed it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PillarTally {
    pub score: f64,
    pub answers: usize,
}

/// Per-pillar averages for a company-defined pillar set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DynamicPillarScores {
    pub pillars: BTreeMap<String, PillarTally>,
    pub weights: PillarWeights,
}

impl DynamicPillarScores {
    /// Average for `pillar`; 0 for a configured pillar nobody answered.
    pub fn score(&self, pillar: &str) -> Option<f64> {
        self.pillars.get(pillar).map(|tally| tally.score)
    }

    /// Weighted mean over pillars that received answers. Pillars without
    /// answers are left out of both numerator and denominator.
    pub fn overall_score(&self) -> f64 {
        let mut weighted = 0.0;
        let mut total_weight = 0.0;
        for (pillar, &weight) in &self.weights {
            let Some(tally) = self.pillars.get(pillar).filter(|tally| tally.answers > 0) else {
                continue;
            };
            weighted += tally.score * weight;
            total_weight += weight;
        }

        if total_weight <= 0.0 {
            0.0
        } else {
            weighted / total_weight
        }
    }
}

/// Pillar aggregation result; exactly one model is populated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum PillarScores {
    Fixed(FixedPillarScores),
    Dynamic(DynamicPillarScores),
}

impl PillarScores {
    pub fn overall_score(&self) -> f64 {
        match self {
            PillarScores::Fixed(scores) => scores.overall_score(),
            PillarScores::Dynamic(scores) => scores.overall_score(),
        }
    }
}

/// Final per-application output.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompositeResult {
    pub pillar_score: f64,
    /// CV score that was blended in, if one was supplied.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cv_score: Option<f64>,
    pub blended_score: f64,
}

impl CompositeResult {
    /// Averages the pillar score with a strictly positive CV score; anything
    /// else counts as "no CV score".
    pub fn blend(pillar_score: f64, cv_score: f64) -> Self {
        if cv_score > 0.0 {
            Self {
                pillar_score,
                cv_score: Some(cv_score),
                blended_score: (pillar_score + cv_score) / 2.0,
            }
        } else {
            Self {
                pillar_score,
                cv_score: None,
                blended_score: pillar_score,
            }
        }
    }
}

#[derive(Default)]
struct Bucket {
    total: f64,
    count: usize,
}

impl Bucket {
    fn add(&mut self, score: f64) {
        self.total += score;
        self.count += 1;
    }

    fn mean(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.total / self.count as f64
        }
    }
}

/// Aggregates scored answers into pillars and composes the application score.
pub struct ScoreComposer {
    mindset: Arc<dyn MindsetScorer>,
}

impl Default for ScoreComposer {
    fn default() -> Self {
        Self::new(Arc::new(BaselineMindsetScorer::default()))
    }
}

impl ScoreComposer {
    pub fn new(mindset: Arc<dyn MindsetScorer>) -> Self {
        Self { mindset }
    }

    /// Aggregate with empty candidate/target personality readings.
    pub fn aggregate_pillars<'a, I>(
        &self,
        answers: I,
        company: &Company,
        pillars: Option<&PillarWeights>,
    ) -> PillarScores
    where
        I: IntoIterator<Item = &'a SurveyAnswer>,
    {
        self.aggregate_pillars_for(
            answers,
            company,
            pillars,
            &Mindset::default(),
            &PersonalityProfile::default(),
        )
    }

    /// Aggregate scored answers; unscored answers never contribute.
    pub fn aggregate_pillars_for<'a, I>(
        &self,
        answers: I,
        company: &Company,
        pillars: Option<&PillarWeights>,
        candidate: &Mindset,
        target: &PersonalityProfile,
    ) -> PillarScores
    where
        I: IntoIterator<Item = &'a SurveyAnswer>,
    {
        let scored = answers
            .into_iter()
            .filter_map(|answer| answer.score.map(|score| (answer.reference.as_str(), score)));

        match PillarMode::select(pillars) {
            PillarMode::Fixed => {
                PillarScores::Fixed(self.aggregate_fixed(scored, company, candidate, target))
            }
            PillarMode::Dynamic(weights) => {
                PillarScores::Dynamic(aggregate_dynamic(scored, weights))
            }
        }
    }

    fn aggregate_fixed<'a>(
        &self,
        scored: impl Iterator<Item = (&'a str, f64)>,
        company: &Company,
        candidate: &Mindset,
        target: &PersonalityProfile,
    ) -> FixedPillarScores {
        let mut values = Bucket::default();
        let mut culture = Bucket::default();
        let mut work_life = Bucket::default();

        for (reference, score) in scored {
            match reference {
                VALUES_PILLAR => values.add(score),
                CULTURE_PILLAR => culture.add(score),
                WORKPLACE_PILLAR => work_life.add(score),
                _ => {}
            }
        }

        let growth_mindset =
            self.mindset.match_score(candidate, target) * company.weightings.mindset;

        FixedPillarScores {
            values: values.mean(),
            culture: culture.mean(),
            mindset: self.mindset.baseline(),
            growth_mindset,
            work_life: work_life.mean(),
            weights: company.weightings,
        }
    }

    pub fn overall_score(&self, scores: &PillarScores) -> f64 {
        scores.overall_score()
    }

    /// Blend the pillar score with the CV score and record both on the application.
    pub fn compose_final(
        &self,
        application: &mut Application,
        scores: PillarScores,
        cv_score: f64,
    ) -> CompositeResult {
        let result = CompositeResult::blend(scores.overall_score(), cv_score);

        application.scores = Some(scores);
        application.overall_score = Some(result.blended_score);
        application.scored_at = Some(Utc::now());

        result
    }
}

fn aggregate_dynamic<'a>(
    scored: impl Iterator<Item = (&'a str, f64)>,
    weights: &PillarWeights,
) -> DynamicPillarScores {
    let mut buckets: BTreeMap<&str, Bucket> = weights
        .keys()
        .map(|pillar| (pillar.as_str(), Bucket::default()))
        .collect();

    for (reference, score) in scored {
        if let Some(bucket) = buckets.get_mut(reference) {
            bucket.add(score);
        }
    }

    let pillars = buckets
        .into_iter()
        .map(|(pillar, bucket)| {
            (
                pillar.to_string(),
                PillarTally {
                    score: bucket.mean(),
                    answers: bucket.count,
                },
            )
        })
        .collect();

    DynamicPillarScores {
        pillars,
        weights: weights.clone(),
    }
}
