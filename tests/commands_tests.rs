use std::io::Cursor;
use std::sync::Arc;

use study_circle::commands::{GenerateParams, run_quiz};
use study_circle::session::{Lane, Orchestrator, StudyRequest};
use study_circle::ui;
use strum::IntoEnumIterator;

use test_utils::{CannedBackend, generator_for};

async fn settled_session() -> Orchestrator {
    let backend = Arc::new(CannedBackend::well_formed());
    let mut session = Orchestrator::new(generator_for(&backend));
    session
        .submit(StudyRequest::new("photosynthesis"))
        .expect("submission dispatched");
    session.settle().await;
    session
}

#[tokio::test]
async fn test_interactive_quiz_retries_invalid_letters() {
    ui::set_quiet_mode(true);
    let mut session = settled_session().await;

    // "x" and "E" are rejected before "c" is accepted
    let mut input = Cursor::new("x\nE\nc\n");
    run_quiz(&mut session, &mut input).expect("quiz runs");

    let quiz = session.state().quiz.data().expect("quiz present");
    assert!(quiz.show_results);
    assert_eq!(quiz.score(), 1);
}

#[tokio::test]
async fn test_interactive_quiz_stops_when_input_closes() {
    ui::set_quiet_mode(true);
    let mut session = settled_session().await;

    let mut input = Cursor::new("");
    run_quiz(&mut session, &mut input).expect("closed input is not an error");

    let quiz = session.state().quiz.data().expect("quiz present");
    assert!(!quiz.show_results);
    assert_eq!(quiz.answered_count(), 0);
}

#[test]
fn test_only_filter_selects_printed_lanes() {
    let everything = GenerateParams::default();
    assert!(Lane::iter().all(|lane| everything.shows(lane)));

    let params = GenerateParams {
        query: "photosynthesis".into(),
        only: vec![Lane::Notes, Lane::Resources],
        ..GenerateParams::default()
    };
    let shown: Vec<Lane> = Lane::iter().filter(|lane| params.shows(*lane)).collect();
    assert_eq!(shown, vec![Lane::Notes, Lane::Resources]);
}
