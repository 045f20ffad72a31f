use std::collections::HashSet;
use std::sync::Arc;

use study_circle::compose::{ContentKind, NO_COURSE_PLAN};
use study_circle::llm_providers::RawResponse;
use study_circle::types::UNTITLED_WEB_RESOURCE;
use study_circle::StudyError;

use test_utils::{CannedBackend, generator_for, grounded_response, payload_for};

#[tokio::test]
async fn test_notes_without_plan_use_web_search_and_keep_citations() {
    let backend = Arc::new(CannedBackend::new(|kind, query| {
        Ok(grounded_response(
            &payload_for(kind, query),
            &[
                ("https://en.wikipedia.org/wiki/Photosynthesis", "Photosynthesis"),
                ("https://biology.example/light", ""),
            ],
        ))
    }));
    let generator = generator_for(&backend);

    let response = generator
        .generate_notes("Explain photosynthesis", None)
        .await
        .expect("notes generate");

    assert!(response.notes.contains("Explain photosynthesis"));
    assert_eq!(response.attributions.len(), 2);
    assert_eq!(response.attributions[1].title, UNTITLED_WEB_RESOURCE);

    let calls = backend.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].kind, ContentKind::Notes);
    assert!(calls[0].config.uses_web_search());
    assert!(calls[0].config.response_mime_type.is_none());
    assert!(calls[0].user_content.contains(NO_COURSE_PLAN));
}

#[tokio::test]
async fn test_course_plan_switches_to_structured_output() {
    let backend = Arc::new(CannedBackend::well_formed());
    let generator = generator_for(&backend);
    let plan = "Week 3: The Calvin cycle";

    generator
        .generate_flashcards("carbon fixation", Some(plan))
        .await
        .expect("flashcards generate");
    generator
        .generate_quiz_and_resources("carbon fixation", Some(plan))
        .await
        .expect("quiz generates");

    let flashcards = &backend.calls_for(ContentKind::Flashcards)[0];
    assert!(!flashcards.config.uses_web_search());
    assert_eq!(
        flashcards.config.response_mime_type.as_deref(),
        Some("application/json")
    );
    assert!(flashcards.user_content.contains(plan));

    // Quiz and resources always search
    let quiz = &backend.calls_for(ContentKind::QuizAndResources)[0];
    assert!(quiz.config.uses_web_search());
}

#[tokio::test]
async fn test_flashcards_get_fresh_unique_ids() {
    let backend = Arc::new(CannedBackend::well_formed());
    let generator = generator_for(&backend);

    let first = generator
        .generate_flashcards("osmosis", None)
        .await
        .expect("first batch");
    let second = generator
        .generate_flashcards("osmosis", None)
        .await
        .expect("second batch");

    let ids: HashSet<&str> = first
        .flashcards
        .iter()
        .chain(&second.flashcards)
        .map(|card| card.id.as_str())
        .collect();
    assert_eq!(ids.len(), first.flashcards.len() + second.flashcards.len());
    assert_eq!(first.flashcards[0].question, "What is osmosis?");
}

#[tokio::test]
async fn test_prose_wrapped_payload_is_repaired() {
    let backend = Arc::new(CannedBackend::new(|kind, query| {
        Ok(RawResponse::from_text(format!(
            "Sure! Here is your content:\n{}\nLet me know if you need more.",
            payload_for(kind, query)
        )))
    }));
    let generator = generator_for(&backend);

    let response = generator
        .generate_quiz_and_resources("mitosis", None)
        .await
        .expect("repair succeeds");
    assert_eq!(response.quiz.len(), 1);
    assert_eq!(response.quiz[0].correct_answer, "C");
    assert!(response.quiz[0].has_consistent_answer());
    assert!(response.quiz[0].user_answer.is_none());
    assert_eq!(response.resources.len(), 1);
}

#[tokio::test]
async fn test_fenced_payload_without_resources_defaults_to_empty() {
    let backend = Arc::new(CannedBackend::new(|_, _| {
        Ok(RawResponse::from_text(
            "```json\n{\"quiz\": [{\"question\": \"Q\", \"options\": [\"a\", \"b\", \"c\", \"d\"], \"correctAnswerText\": \"a\"}]}\n```",
        ))
    }));
    let generator = generator_for(&backend);

    let response = generator
        .generate_quiz_and_resources("anything", None)
        .await
        .expect("resources are optional");
    assert!(response.resources.is_empty());
    assert!(response.quiz[0].explanation.is_none());
}

#[tokio::test]
async fn test_unrepairable_output_is_malformed_response() {
    let backend = Arc::new(CannedBackend::new(|_, _| {
        Ok(RawResponse::from_text("{\"notes\": \"cut off"))
    }));
    let generator = generator_for(&backend);

    let err = generator
        .generate_notes("thermodynamics", None)
        .await
        .expect_err("truncated JSON fails");
    assert!(matches!(err, StudyError::MalformedResponse(_)));
    assert_eq!(err.code(), "MALFORMED_RESPONSE");
}

#[tokio::test]
async fn test_backend_errors_propagate_unchanged() {
    let backend = Arc::new(CannedBackend::new(|_, _| {
        Err(StudyError::Backend("API key not valid".into()))
    }));
    let generator = generator_for(&backend);

    let err = generator
        .generate_flashcards("entropy", None)
        .await
        .expect_err("backend failure");
    assert_eq!(err.to_string(), "Gemini API Error: API key not valid");
}

#[tokio::test]
async fn test_blank_query_never_reaches_backend() {
    let backend = Arc::new(CannedBackend::well_formed());
    let generator = generator_for(&backend);

    let err = generator
        .generate_notes("   ", None)
        .await
        .expect_err("blank query");
    assert!(matches!(err, StudyError::Validation(_)));
    assert!(backend.calls().is_empty());
}

#[tokio::test]
async fn test_photosynthesis_flashcard_example() {
    let backend = Arc::new(CannedBackend::new(|_, _| {
        Ok(RawResponse::from_text(
            r#"{"flashcards":[{"question":"What is photosynthesis?","answer":"A process converting light to chemical energy."}]}"#,
        ))
    }));
    let generator = generator_for(&backend);

    let response = generator
        .generate_flashcards("Explain photosynthesis", Some(""))
        .await
        .expect("flashcards generate");

    assert!(backend.calls()[0].config.uses_web_search());
    assert_eq!(response.flashcards.len(), 1);
    let card = &response.flashcards[0];
    assert_eq!(card.question, "What is photosynthesis?");
    assert_eq!(card.answer, "A process converting light to chemical energy.");
    assert!(!card.id.is_empty());
    assert!(response.attributions.is_empty());
}
