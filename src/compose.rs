//! Request composition
//!
//! Shapes the user content, system instruction and generation configuration for
//! one content kind. Pure; no I/O.

use serde::Serialize;
use strum_macros::{Display, EnumIter};

use crate::error::{StudyError, StudyResult};
use crate::llm_providers::GenerationConfig;
use crate::prompts;
use crate::{log_debug, log_warn};

/// Substituted when the user supplied no course plan
pub const NO_COURSE_PLAN: &str = "No course plan provided.";

/// Appended after a truncated course plan
pub const TRUNCATION_MARKER: &str = "\n\n[COURSE PLAN TRUNCATED DUE TO LENGTH]";

/// The three kinds of backend request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, Serialize)]
#[strum(serialize_all = "kebab-case")]
pub enum ContentKind {
    Notes,
    Flashcards,
    QuizAndResources,
}

impl ContentKind {
    /// Top-level keys of the JSON payload this kind must produce
    pub const fn payload_keys(self) -> &'static [&'static str] {
        match self {
            Self::Notes => &["notes"],
            Self::Flashcards => &["flashcards", "question", "answer"],
            Self::QuizAndResources => &[
                "quiz",
                "options",
                "correctAnswerText",
                "resources",
                "title",
                "uri",
            ],
        }
    }

    /// Whether web search is requested regardless of the course plan
    pub const fn always_augmented(self) -> bool {
        matches!(self, Self::QuizAndResources)
    }
}

/// Everything needed for one backend call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposedRequest {
    pub kind: ContentKind,
    pub system_instruction: String,
    pub user_content: String,
    pub config: GenerationConfig,
}

/// Whether the plan carries any content
pub fn has_course_plan(course_plan: Option<&str>) -> bool {
    course_plan.is_some_and(|plan| !plan.trim().is_empty())
}

/// The plan as embedded in the prompt: placeholder, as-is, or truncated with a marker
pub fn prepare_course_plan(course_plan: Option<&str>, max_chars: usize) -> String {
    let Some(plan) = course_plan.filter(|p| !p.trim().is_empty()) else {
        return NO_COURSE_PLAN.to_string();
    };

    match plan.char_indices().nth(max_chars) {
        Some((cut, _)) => {
            log_warn!(
                "Course plan was truncated from {} to {} characters to fit within API limits.",
                plan.chars().count(),
                max_chars
            );
            format!("{}{TRUNCATION_MARKER}", &plan[..cut])
        }
        None => plan.to_string(),
    }
}

/// Web search is enabled for quiz+resources, or whenever there is no plan to ground on
pub fn augmentation_enabled(kind: ContentKind, course_plan: Option<&str>) -> bool {
    kind.always_augmented() || !has_course_plan(course_plan)
}

/// Compose the request for `kind`
pub fn compose(
    kind: ContentKind,
    query: &str,
    course_plan: Option<&str>,
    max_course_plan_chars: usize,
) -> StudyResult<ComposedRequest> {
    let query = query.trim();
    if query.is_empty() {
        return Err(StudyError::validation("Please enter a query."));
    }

    let plan = prepare_course_plan(course_plan, max_course_plan_chars);
    let user_content = format!(
        "Course Plan Context (if any):\n```\n{plan}\n```\nQuery: \"{query}\"\n\n{}",
        prompts::task_line(kind)
    );

    let augmented = augmentation_enabled(kind, course_plan);
    let config = if augmented {
        GenerationConfig::augmented()
    } else {
        GenerationConfig::structured_json()
    };

    log_debug!(
        "Composed {} request: {} chars, web search {}",
        kind,
        user_content.len(),
        if augmented { "on" } else { "off" }
    );

    Ok(ComposedRequest {
        kind,
        system_instruction: prompts::system_instruction(kind),
        user_content,
        config,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_plan_uses_placeholder_and_search() {
        for plan in [None, Some(""), Some("   \n")] {
            let request = compose(ContentKind::Flashcards, "Explain photosynthesis", plan, 100)
                .expect("composes");
            assert!(request.user_content.contains(NO_COURSE_PLAN));
            assert!(request.config.uses_web_search());
            assert!(request.config.response_mime_type.is_none());
        }
    }

    #[test]
    fn test_plan_forces_structured_output_except_quiz() {
        let plan = Some("Week 1: Light reactions");
        let notes = compose(ContentKind::Notes, "photosynthesis", plan, 100).expect("composes");
        assert!(!notes.config.uses_web_search());
        assert_eq!(
            notes.config.response_mime_type.as_deref(),
            Some("application/json")
        );
        assert!(notes.user_content.contains("Week 1: Light reactions"));

        let quiz =
            compose(ContentKind::QuizAndResources, "photosynthesis", plan, 100).expect("composes");
        assert!(quiz.config.uses_web_search());
    }

    #[test]
    fn test_truncation_appends_marker() {
        let plan = "abcdefghij";
        assert_eq!(
            prepare_course_plan(Some(plan), 4),
            format!("abcd{TRUNCATION_MARKER}")
        );
        assert_eq!(prepare_course_plan(Some(plan), 10), plan);
    }

    #[test]
    fn test_truncation_counts_characters() {
        assert_eq!(
            prepare_course_plan(Some("ééééé"), 2),
            format!("éé{TRUNCATION_MARKER}")
        );
    }

    #[test]
    fn test_query_is_embedded_and_required() {
        let request = compose(ContentKind::Notes, "  mitosis ", None, 10).expect("composes");
        assert!(request.user_content.contains("Query: \"mitosis\""));
        assert!(request.user_content.contains("study notes"));

        let err = compose(ContentKind::Notes, "   ", None, 10).expect_err("blank query");
        assert!(matches!(err, StudyError::Validation(_)));
    }

    #[test]
    fn test_kind_display() {
        assert_eq!(ContentKind::QuizAndResources.to_string(), "quiz-and-resources");
    }
}
