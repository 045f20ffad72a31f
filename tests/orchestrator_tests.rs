use std::sync::Arc;
use std::time::Duration;

use study_circle::compose::ContentKind;
use study_circle::llm_providers::RawResponse;
use study_circle::session::{Lane, Orchestrator, SessionEffect, StudyRequest};
use study_circle::types::Provenance;
use study_circle::StudyError;

use test_utils::{CannedBackend, generator_for, grounded_response, payload_for};

fn orchestrator(backend: &Arc<CannedBackend>) -> Orchestrator {
    Orchestrator::new(generator_for(backend))
}

#[tokio::test]
async fn test_submission_fills_every_lane() {
    let backend = Arc::new(CannedBackend::well_formed());
    let mut session = orchestrator(&backend);

    session
        .submit(StudyRequest::new("photosynthesis"))
        .expect("submission dispatched");
    assert!(session.state().busy());

    let effects = session.settle().await;
    let settled: Vec<Lane> = effects
        .iter()
        .filter_map(|effect| match effect {
            SessionEffect::LaneSettled(lane) => Some(*lane),
            _ => None,
        })
        .collect();
    assert_eq!(settled.len(), 4);

    let state = session.state();
    assert!(!state.busy());
    assert!(state.notes.view().data.is_some());
    assert_eq!(state.flashcards.data().map(Vec::len), Some(2));
    assert_eq!(state.quiz.data().map(|quiz| quiz.len()), Some(1));
    assert_eq!(state.resources.data().map(Vec::len), Some(1));
    assert_eq!(backend.calls().len(), 3);
}

#[tokio::test]
async fn test_quiz_failure_leaves_other_lanes_intact() {
    let backend = Arc::new(CannedBackend::new(|kind, query| match kind {
        ContentKind::QuizAndResources => Err(StudyError::Backend("quota exceeded".into())),
        _ => Ok(RawResponse::from_text(payload_for(kind, query))),
    }));
    let mut session = orchestrator(&backend);

    session
        .submit(StudyRequest::new("cell respiration"))
        .expect("submission dispatched");
    session.settle().await;

    let state = session.state();
    assert!(state.notes.data().is_some());
    assert!(state.flashcards.data().is_some());
    assert_eq!(
        state.lane_error(Lane::Quiz),
        Some("Gemini API Error: quota exceeded")
    );
    assert_eq!(state.lane_error(Lane::Resources), state.lane_error(Lane::Quiz));
}

#[tokio::test]
async fn test_attributions_merge_across_lanes_by_uri() {
    let backend = Arc::new(CannedBackend::new(|kind, query| {
        let citations: &[(&str, &str)] = match kind {
            ContentKind::Notes => &[("https://u1", "One"), ("https://u2", "Two")],
            ContentKind::Flashcards => &[("https://u2", "Two"), ("https://u3", "Three")],
            ContentKind::QuizAndResources => &[("https://khan.example", "Khan (web)")],
        };
        Ok(grounded_response(&payload_for(kind, query), citations))
    }));
    let mut session = orchestrator(&backend);

    session
        .submit(StudyRequest::new("photosynthesis"))
        .expect("submission dispatched");
    session.settle().await;

    let state = session.state();
    let mut uris: Vec<&str> = state.attributions.iter().map(|a| a.uri.as_str()).collect();
    uris.sort_unstable();
    assert_eq!(
        uris,
        vec!["https://khan.example", "https://u1", "https://u2", "https://u3"]
    );

    // The suggested resource shares a uri with a citation: it keeps its slot
    // but is shown as the citation
    let merged = state.merged_resources();
    assert_eq!(merged.len(), 4);
    assert_eq!(merged[0].uri, "https://khan.example");
    assert_eq!(merged[0].title, "Khan (web)");
    assert!(
        merged
            .iter()
            .all(|m| m.provenance == Provenance::WebSearchResult)
    );
}

#[tokio::test]
async fn test_stale_submission_results_are_discarded() {
    let backend = Arc::new(
        CannedBackend::well_formed().with_delay("slow topic", Duration::from_millis(150)),
    );
    let mut session = orchestrator(&backend);

    let first = session
        .submit(StudyRequest::new("slow topic"))
        .expect("first dispatched");
    let second = session
        .submit(StudyRequest::new("fast topic"))
        .expect("second dispatched");
    assert_ne!(first, second);

    session.settle().await;
    tokio::time::sleep(Duration::from_millis(400)).await;
    let late = session.apply_pending();

    let discarded = late
        .iter()
        .filter(|effect| **effect == SessionEffect::Discarded(first))
        .count();
    assert_eq!(discarded, 3);

    let state = session.state();
    assert_eq!(state.current, Some(second));
    let notes = state.notes.data().expect("notes present");
    assert!(notes.contains("fast topic"));
    assert!(!notes.contains("slow topic"));
}

#[tokio::test]
async fn test_blank_query_is_rejected_without_calls() {
    let backend = Arc::new(CannedBackend::well_formed());
    let mut session = orchestrator(&backend);

    let err = session
        .submit(StudyRequest::new("  \t "))
        .expect_err("blank query rejected");
    assert_eq!(err.to_string(), "Please enter a query.");
    assert!(!session.state().busy());
    assert_eq!(session.state().prompt.as_deref(), Some("Please enter a query."));

    tokio::time::sleep(Duration::from_millis(20)).await;
    assert!(backend.calls().is_empty());
}

#[tokio::test]
async fn test_course_plan_reaches_every_generator() {
    let backend = Arc::new(CannedBackend::well_formed());
    let mut session = orchestrator(&backend);

    session
        .submit(StudyRequest::new("genetics").with_course_plan("Unit 4: Mendelian inheritance"))
        .expect("submission dispatched");
    session.settle().await;

    let calls = backend.calls();
    assert_eq!(calls.len(), 3);
    assert!(
        calls
            .iter()
            .all(|call| call.user_content.contains("Unit 4: Mendelian inheritance"))
    );
}

#[tokio::test]
async fn test_quiz_can_be_answered_and_scored() {
    let backend = Arc::new(CannedBackend::well_formed());
    let mut session = orchestrator(&backend);

    session
        .submit(StudyRequest::new("photosynthesis"))
        .expect("submission dispatched");
    session.settle().await;

    assert!(session.submit_quiz().is_err(), "unanswered quiz cannot be graded");

    let question_id = session
        .state()
        .quiz
        .data()
        .map(|quiz| quiz.questions[0].id.clone())
        .expect("quiz present");
    assert!(session.select_answer(&question_id, "Z").is_err());
    session
        .select_answer(&question_id, "B")
        .expect("valid option");

    assert_eq!(session.submit_quiz().expect("graded"), (0, 1));
    let quiz = session.state().quiz.data().expect("quiz present");
    assert!(quiz.show_results);
    assert_eq!(quiz.questions[0].is_correct, Some(false));

    let err = session
        .select_answer(&question_id, "C")
        .expect_err("answers are locked after grading");
    assert!(matches!(err, StudyError::Validation(_)));
    let quiz = session.state().quiz.data().expect("quiz present");
    assert!(quiz.show_results);
    assert_eq!(quiz.questions[0].user_answer.as_deref(), Some("B"));
    assert_eq!(session.state().prompt.as_deref(), Some(err.to_string().as_str()));
}
