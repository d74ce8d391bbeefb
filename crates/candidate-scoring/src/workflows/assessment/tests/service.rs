use std::sync::Arc;

use super::common::*;
use crate::workflows::assessment::composition::PillarScores;
use crate::workflows::assessment::domain::{ApplicationId, CandidateId, SurveyId};
use crate::workflows::assessment::repository::RepositoryError;
use crate::workflows::assessment::service::SurveyProcessingError;

fn verdict() -> Arc<ScriptedOracle> {
    Arc::new(ScriptedOracle::returning("0.9-Explains why the culture fits"))
}

#[test]
fn process_scores_persists_and_notifies() {
    let repository = Arc::new(MemoryRepository::default());
    let notifier = Arc::new(MemoryNotifier::default());
    let service = service(repository.clone(), notifier.clone(), verdict());

    let processed = service
        .try_process(survey_response(Some(85.0)))
        .expect("response processes");

    assert_eq!(processed.question_scores.len(), 6);
    approx(processed.question_scores["c3"], 90.0);
    let PillarScores::Fixed(fixed) = &processed.scores else {
        panic!("expected fixed pillar scores");
    };
    approx(fixed.values, 79.17);
    approx(fixed.culture, 59.17);
    approx(fixed.work_life, 66.67);
    approx(processed.composite.pillar_score, 63.75);
    approx(processed.composite.blended_score, 74.375);

    let stored = service
        .get(&ApplicationId("app-42".to_string()))
        .expect("application stored");
    assert!(stored.complete);
    approx(stored.overall_score.expect("scored"), 74.375);
    assert_eq!(repository.application_saves(), 2);

    let candidate = repository
        .candidate(&CandidateId("cand-42".to_string()))
        .expect("candidate stored");
    let survey = SurveyId(SURVEY_ID.to_string());
    approx(candidate.survey_scores[&survey], 63.75);
    approx(candidate.overall_scores[&survey], 74.375);

    let events = notifier.events();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].0, "feedback");
    assert_eq!(events[1].0, "ats");
    approx(events[1].1.overall_score, 74.375);
}

#[test]
fn process_without_cv_score_uses_pillar_score() {
    let service = service(
        Arc::new(MemoryRepository::default()),
        Arc::new(MemoryNotifier::default()),
        verdict(),
    );

    let response = service.process(survey_response(None));

    assert!(response.success);
    assert_eq!(response.message, "Success");
    approx(response.overall_score, 63.75);
    assert!(response.scores.is_some());
}

#[test]
fn missing_application_is_reported_not_panicked() {
    let repository = Arc::new(MemoryRepository::default());
    let service = service(
        repository.clone(),
        Arc::new(MemoryNotifier::default()),
        verdict(),
    );
    let mut response = survey_response(None);
    response.application = None;

    let outcome = service.process(response.clone());
    assert!(!outcome.success);
    assert!(outcome.message.starts_with("processing failed:"));
    assert!(outcome.message.contains("no linked application"));
    assert_eq!(repository.application_saves(), 0);

    assert!(matches!(
        service.try_process(response),
        Err(SurveyProcessingError::MissingApplication { .. })
    ));
}

#[test]
fn oracle_failure_aborts_the_response() {
    let notifier = Arc::new(MemoryNotifier::default());
    let service = service(
        Arc::new(MemoryRepository::default()),
        notifier.clone(),
        Arc::new(ScriptedOracle::failing("quota exceeded")),
    );

    let outcome = service.process(survey_response(Some(85.0)));

    assert!(!outcome.success);
    assert!(outcome.message.contains("quota exceeded"));
    assert!(notifier.events().is_empty());
}

#[test]
fn repository_failures_propagate() {
    let service = service(
        Arc::new(MemoryRepository::unavailable("connection refused")),
        Arc::new(MemoryNotifier::default()),
        verdict(),
    );

    match service.try_process(survey_response(None)) {
        Err(SurveyProcessingError::Repository(RepositoryError::Unavailable(reason))) => {
            assert_eq!(reason, "connection refused")
        }
        other => panic!("expected repository failure, got {other:?}"),
    }
}

#[test]
fn notification_failures_do_not_fail_processing() {
    let notifier = Arc::new(MemoryNotifier::failing());
    let service = service(
        Arc::new(MemoryRepository::default()),
        notifier.clone(),
        verdict(),
    );

    let outcome = service.process(survey_response(Some(85.0)));

    assert!(outcome.success);
    assert_eq!(notifier.events().len(), 2);
}

#[test]
fn get_reports_unknown_applications() {
    let service = service(
        Arc::new(MemoryRepository::default()),
        Arc::new(MemoryNotifier::default()),
        verdict(),
    );

    assert!(matches!(
        service.get(&ApplicationId("missing".to_string())),
        Err(RepositoryError::NotFound)
    ));
}
