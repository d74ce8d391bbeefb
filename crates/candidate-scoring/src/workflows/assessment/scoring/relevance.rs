use serde::{Deserialize, Serialize};

/// Delimiter the relevance oracle places between its score and explanation.
pub const DEFAULT_VERDICT_DELIMITER: char = '-';

/// Inputs handed to the relevance oracle for one free-text answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelevanceRequest<'a> {
    pub answer: &'a str,
    pub prompt: &'a str,
    pub survey_name: &'a str,
}

/// External service judging how relevant a free-text answer is to its prompt.
///
/// Implementations return the raw verdict, `"<score 0-1><delimiter><explanation>"`.
pub trait RelevanceOracle: Send + Sync {
    fn relevance(&self, request: RelevanceRequest<'_>) -> Result<String, OracleError>;
}

/// Transport-level oracle failure.
#[derive(Debug, thiserror::Error)]
pub enum OracleError {
    #[error("relevance oracle unavailable: {0}")]
    Unavailable(String),
}

/// Parsed oracle verdict.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelevanceVerdict {
    /// Relevance in [0, 1].
    pub score: f64,
    pub explanation: String,
}

impl RelevanceVerdict {
    /// Splits on the first `delimiter` whose prefix reads as a number, so `5e-1-...`
    /// keeps its exponent; the score must be finite and within [0, 1].
    pub fn parse(raw: &str, delimiter: char) -> Option<Self> {
        let (score, explanation) = raw.match_indices(delimiter).find_map(|(at, _)| {
            let score = raw[..at].trim().parse::<f64>().ok()?;
            Some((score, &raw[at + delimiter.len_utf8()..]))
        })?;
        if !score.is_finite() || !(0.0..=1.0).contains(&score) {
            return None;
        }

        Some(Self {
            score,
            explanation: explanation.trim().to_string(),
        })
    }

    /// Relevance projected onto the 0-100 question scale.
    pub fn percentage(&self) -> f64 {
        self.score * 100.0
    }
}
