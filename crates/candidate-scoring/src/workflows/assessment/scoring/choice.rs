use super::super::domain::Company;

const ALWAYS: &str = "always";
const OFTEN: &str = "often";
const SOMETIMES: &str = "sometimes";

/// How a choice question's selected tokens are turned into points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ChoiceScale {
    /// Frequency scale (always / often / sometimes) with fixed per-token points.
    Fixed,
    /// Company-specific answer set scored by match ratio.
    Variable,
}

impl ChoiceScale {
    pub(crate) fn classify(correct: &[String]) -> Self {
        let fixed = correct
            .iter()
            .any(|token| token.eq_ignore_ascii_case(ALWAYS) || token.eq_ignore_ascii_case(OFTEN));
        if fixed {
            Self::Fixed
        } else {
            Self::Variable
        }
    }
}

fn frequency_points(token: &str) -> f64 {
    if token.eq_ignore_ascii_case(ALWAYS) {
        1.0
    } else if token.eq_ignore_ascii_case(OFTEN) {
        0.75
    } else if token.eq_ignore_ascii_case(SOMETIMES) {
        0.5
    } else {
        0.0
    }
}

/// Sum of frequency points over the correct-token count, projected onto 0-100.
pub(crate) fn fixed_scale_score(selected: &[String], correct: &[String]) -> f64 {
    if correct.is_empty() {
        return 0.0;
    }

    let points: f64 = selected.iter().map(|token| frequency_points(token)).sum();
    (points / correct.len() as f64 * 100.0).min(100.0)
}

/// Share of correct tokens the candidate selected, projected onto 0-100.
///
/// `reference` and `company` are accepted for company-specific answer keys but
/// do not influence the ratio today.
pub(crate) fn variable_score(
    selected: &[String],
    correct: &[String],
    _reference: &str,
    _company: &Company,
) -> f64 {
    if correct.is_empty() {
        return 0.0;
    }

    let mut seen: Vec<String> = Vec::with_capacity(selected.len());
    let mut matches = 0usize;
    for token in selected {
        let folded = token.to_lowercase();
        if seen.contains(&folded) {
            continue;
        }
        if correct.iter().any(|candidate| candidate.to_lowercase() == folded) {
            matches += 1;
        }
        seen.push(folded);
    }

    matches as f64 / correct.len() as f64 * 100.0
}

pub(crate) fn choice_score(
    selected: &[String],
    correct: &[String],
    reference: &str,
    company: &Company,
) -> (ChoiceScale, f64) {
    match ChoiceScale::classify(correct) {
        ChoiceScale::Fixed => (ChoiceScale::Fixed, fixed_scale_score(selected, correct)),
        ChoiceScale::Variable => (
            ChoiceScale::Variable,
            variable_score(selected, correct, reference, company),
        ),
    }
}
