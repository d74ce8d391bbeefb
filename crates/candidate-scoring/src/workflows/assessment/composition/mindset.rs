use super::super::domain::{Mindset, PersonalityProfile};

/// Mindset value reported when no personality matching is wired in.
pub const DEFAULT_MINDSET_BASELINE: f64 = 50.0;

/// Hook for personality matching between a candidate and the company's target profile.
pub trait MindsetScorer: Send + Sync {
    /// Value reported in the fixed model's mindset pillar.
    fn baseline(&self) -> f64;

    /// Match between the candidate and target profile on the 0-100 scale.
    fn match_score(&self, candidate: &Mindset, target: &PersonalityProfile) -> f64;
}

/// Placeholder scorer: every candidate matches at the configured baseline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BaselineMindsetScorer {
    baseline: f64,
}

impl BaselineMindsetScorer {
    pub fn new(baseline: f64) -> Self {
        Self { baseline }
    }
}

impl Default for BaselineMindsetScorer {
    fn default() -> Self {
        Self::new(DEFAULT_MINDSET_BASELINE)
    }
}

impl MindsetScorer for BaselineMindsetScorer {
    fn baseline(&self) -> f64 {
        self.baseline
    }

    fn match_score(&self, _candidate: &Mindset, _target: &PersonalityProfile) -> f64 {
        self.baseline
    }
}
