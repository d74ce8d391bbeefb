use crate::infra::{local_scoring_service, NoticeKind};
use candidate_scoring::config::AppConfig;
use candidate_scoring::error::AppError;
use candidate_scoring::workflows::assessment::{
    AnswerKind, AnswerSet, Application, ApplicationId, Candidate, CandidateId, Company,
    FixedWeights, PersonalityProfile, PillarScores, PillarWeights, Question, ScoringRepository,
    Survey, SurveyAnswer, SurveyId, SurveyResponse,
};
use chrono::SecondsFormat;
use clap::Args;
use std::collections::BTreeMap;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct ScoreArgs {
    /// Path to a survey response JSON document
    #[arg(value_name = "PATH")]
    pub(crate) path: PathBuf,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Score against company-defined pillars instead of the fixed four-pillar model
    #[arg(long)]
    pub(crate) dynamic: bool,
    /// CV score to blend into the final score (omit for none)
    #[arg(long)]
    pub(crate) cv_score: Option<f64>,
}

pub(crate) fn run_score(args: ScoreArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let raw = std::fs::read_to_string(&args.path)?;
    let response: SurveyResponse = serde_json::from_str(&raw)?;

    let (service, _, _) = local_scoring_service(&config.scoring);
    let outcome = service.process(response);
    println!("{}", serde_json::to_string_pretty(&outcome)?);
    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs { dynamic, cv_score } = args;
    let config = AppConfig::load()?;
    let (service, repository, notifier) = local_scoring_service(&config.scoring);

    let mode = if dynamic { "company" } else { "fixed" };
    println!("Candidate scoring demo ({mode} pillars)");

    let response = sample_response(dynamic, cv_score);
    let candidate_id = response.candidate.id.clone();
    let processed = service.try_process(response)?;

    println!("Question scores:");
    for (question_id, score) in &processed.question_scores {
        println!("  - {question_id}: {score:.2}");
    }

    println!("Pillars:");
    match &processed.scores {
        PillarScores::Fixed(scores) => {
            println!(
                "  - values {:.2} (weight {:.2})",
                scores.values, scores.weights.values
            );
            println!(
                "  - culture {:.2} (weight {:.2})",
                scores.culture, scores.weights.culture
            );
            println!(
                "  - mindset {:.2} (weight {:.2})",
                scores.mindset, scores.weights.mindset
            );
            println!(
                "  - work-life {:.2} (weight {:.2})",
                scores.work_life, scores.weights.work_life
            );
            println!("  Growth mindset: {:.2}", scores.growth_mindset);
        }
        PillarScores::Dynamic(scores) => {
            for (pillar, weight) in &scores.weights {
                let tally = scores.pillars.get(pillar);
                println!(
                    "  - {pillar} {:.2} (weight {weight:.2}, {} answers)",
                    tally.map(|tally| tally.score).unwrap_or_default(),
                    tally.map(|tally| tally.answers).unwrap_or_default()
                );
            }
        }
    }

    let composite = processed.composite;
    println!("Pillar score: {:.2}", composite.pillar_score);
    match composite.cv_score {
        Some(cv) => println!("CV score: {cv:.2}"),
        None => println!("CV score: not supplied"),
    }
    println!("Overall score: {:.2}", composite.blended_score);

    match repository.fetch_application(&processed.application_id) {
        Ok(Some(application)) => {
            if let Some(scored_at) = application.scored_at {
                println!(
                    "Scored at: {}",
                    scored_at.to_rfc3339_opts(SecondsFormat::Secs, true)
                );
            }
            match serde_json::to_string_pretty(&application.status_view()) {
                Ok(json) => println!("Public status payload:\n{}", json),
                Err(err) => println!("Public status payload unavailable: {}", err),
            }
        }
        Ok(None) => println!("Repository lookup returned no application"),
        Err(err) => println!("Repository unavailable: {}", err),
    }

    if let Some(candidate) = repository.candidate(&candidate_id) {
        println!(
            "Candidate {} now holds {} recorded survey score(s)",
            candidate.id.0,
            candidate.overall_scores.len()
        );
    }

    println!("Downstream notices:");
    for (kind, notice) in notifier.events() {
        let label = match kind {
            NoticeKind::Feedback => "feedback",
            NoticeKind::AtsPush => "ats",
        };
        println!(
            "  - {label} -> {} ({:.2})",
            notice.application_id.0, notice.overall_score
        );
    }

    Ok(())
}

const SURVEY_ID: &str = "survey-demo";

fn tokens(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| value.to_string()).collect()
}

fn choice_question(id: &str, pillar: &str, prompt: &str, correct: &[&str]) -> Question {
    Question {
        id: id.to_string(),
        reference: pillar.to_string(),
        prompt: prompt.to_string(),
        available_answers: tokens(correct),
        correct_answers: tokens(correct),
        retain_explanation: false,
    }
}

fn text_question(id: &str, pillar: &str, prompt: &str) -> Question {
    Question {
        id: id.to_string(),
        reference: pillar.to_string(),
        prompt: prompt.to_string(),
        available_answers: Vec::new(),
        correct_answers: Vec::new(),
        retain_explanation: true,
    }
}

fn answer(question: &Question, kind: AnswerKind) -> (String, SurveyAnswer) {
    (
        question.id.clone(),
        SurveyAnswer::new(question.id.clone(), question.reference.clone(), kind),
    )
}

fn fixed_model() -> (Vec<Question>, AnswerSet, PillarWeights) {
    let questions = vec![
        choice_question(
            "v1",
            "values",
            "How often do you raise concerns early?",
            &["always", "often", "sometimes"],
        ),
        choice_question(
            "v2",
            "values",
            "Which values matter most to you?",
            &["Integrity", "Ownership", "Candor"],
        ),
        choice_question(
            "c1",
            "culture",
            "How often do you pair with teammates?",
            &["always", "often"],
        ),
        text_question(
            "c2",
            "culture",
            "Describe how your team shares knowledge and feedback",
        ),
        choice_question(
            "w1",
            "workplace",
            "Which benefits are most important?",
            &["Remote", "Flexible hours", "Learning budget"],
        ),
    ];
    let answers = BTreeMap::from([
        answer(
            &questions[0],
            AnswerKind::MultipleChoice(tokens(&["always", "often"])),
        ),
        answer(
            &questions[1],
            AnswerKind::MultipleChoice(tokens(&["Integrity", "Ownership"])),
        ),
        answer(&questions[2], AnswerKind::MultipleChoice(tokens(&["always"]))),
        answer(
            &questions[3],
            AnswerKind::FreeText(
                "My team shares knowledge in weekly demos and written feedback".to_string(),
            ),
        ),
        answer(
            &questions[4],
            AnswerKind::MultipleChoice(tokens(&["Remote", "Learning budget"])),
        ),
    ]);
    (questions, answers, PillarWeights::new())
}

fn company_model() -> (Vec<Question>, AnswerSet, PillarWeights) {
    let questions = vec![
        choice_question(
            "t1",
            "technology",
            "Which languages have you shipped to production?",
            &["Java", "Python", "C++"],
        ),
        choice_question(
            "t2",
            "technology",
            "Which systems languages do you write daily?",
            &["Rust", "Go"],
        ),
        text_question(
            "l1",
            "leadership",
            "Describe how you mentor engineers and grow their ownership",
        ),
    ];
    let answers = BTreeMap::from([
        answer(
            &questions[0],
            AnswerKind::MultipleChoice(tokens(&["Java", "Python"])),
        ),
        answer(&questions[1], AnswerKind::Coding(tokens(&["Rust"]))),
        answer(
            &questions[2],
            AnswerKind::FreeText(
                "I mentor engineers through pairing and hand them ownership of design reviews"
                    .to_string(),
            ),
        ),
    ]);
    let pillars = BTreeMap::from([
        ("technology".to_string(), 0.6),
        ("leadership".to_string(), 0.4),
    ]);
    (questions, answers, pillars)
}

/// Built-in survey response used by the demo command.
pub(crate) fn sample_response(dynamic: bool, cv_score: Option<f64>) -> SurveyResponse {
    let (questions, answers, pillars) = if dynamic {
        company_model()
    } else {
        fixed_model()
    };
    let survey_id = SurveyId(SURVEY_ID.to_string());
    let candidate_id = CandidateId("cand-demo".to_string());

    SurveyResponse {
        id: "resp-demo".to_string(),
        survey: Survey {
            id: survey_id.clone(),
            name: "Platform Engineer".to_string(),
            questions,
            company: Company {
                id: "demo-co".to_string(),
                weightings: FixedWeights::default(),
                pillars,
            },
            personality_profile: PersonalityProfile::default(),
        },
        candidate: Candidate {
            id: candidate_id.clone(),
            email: "alex@example.com".to_string(),
            first_name: "Alex".to_string(),
            last_name: "Morgan".to_string(),
            mindset: Default::default(),
            cv_scores: cv_score
                .map(|score| BTreeMap::from([(survey_id.clone(), score)]))
                .unwrap_or_default(),
            survey_scores: BTreeMap::new(),
            overall_scores: BTreeMap::new(),
        },
        application: Some(Application::new(
            ApplicationId("app-demo".to_string()),
            candidate_id,
            survey_id,
        )),
        answers,
    }
}
