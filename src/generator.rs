//! Content generators
//!
//! Each generator composes a request, executes it, repairs the response and
//! maps the payload into entities. Failures propagate unchanged to the caller.

use std::sync::Arc;

use serde::de::DeserializeOwned;

use crate::citations::extract_attributions;
use crate::compose::{ContentKind, compose};
use crate::config::{Config, DEFAULT_MAX_COURSE_PLAN_CHARS};
use crate::error::StudyResult;
use crate::llm_providers::GenerationBackend;
use crate::parser::repair_parse;
use crate::types::{
    Flashcard, FlashcardsPayload, FlashcardsResponse, GroundingAttribution, NotesPayload,
    NotesResponse, QuizAndResourcesPayload, QuizAndResourcesResponse, QuizQuestion,
};
use crate::{log_debug, log_info};

/// Owns the backend handle shared by all three generators
#[derive(Clone)]
pub struct StudyGenerator {
    backend: Arc<dyn GenerationBackend>,
    max_course_plan_chars: usize,
}

impl StudyGenerator {
    pub fn new(backend: Arc<dyn GenerationBackend>) -> Self {
        Self {
            backend,
            max_course_plan_chars: DEFAULT_MAX_COURSE_PLAN_CHARS,
        }
    }

    pub fn from_config(backend: Arc<dyn GenerationBackend>, config: &Config) -> Self {
        Self::new(backend).with_max_course_plan_chars(config.max_course_plan_chars)
    }

    pub fn with_max_course_plan_chars(mut self, max_chars: usize) -> Self {
        self.max_course_plan_chars = max_chars;
        self
    }

    /// Compose, execute and repair one request
    async fn run<T>(
        &self,
        kind: ContentKind,
        query: &str,
        course_plan: Option<&str>,
    ) -> StudyResult<(T, Vec<GroundingAttribution>)>
    where
        T: DeserializeOwned,
    {
        let request = compose(kind, query, course_plan, self.max_course_plan_chars)?;
        let response = self
            .backend
            .execute(
                &request.user_content,
                &request.system_instruction,
                &request.config,
            )
            .await?;

        let payload = repair_parse::<T>(&response.text())?;
        let attributions = extract_attributions(&response);
        log_debug!("{} response carried {} citation(s)", kind, attributions.len());
        Ok((payload, attributions))
    }

    pub async fn generate_notes(
        &self,
        query: &str,
        course_plan: Option<&str>,
    ) -> StudyResult<NotesResponse> {
        let (payload, attributions) = self
            .run::<NotesPayload>(ContentKind::Notes, query, course_plan)
            .await?;
        log_info!("Generated notes ({} chars)", payload.notes.len());
        Ok(NotesResponse {
            notes: payload.notes,
            attributions,
        })
    }

    pub async fn generate_flashcards(
        &self,
        query: &str,
        course_plan: Option<&str>,
    ) -> StudyResult<FlashcardsResponse> {
        let (payload, attributions) = self
            .run::<FlashcardsPayload>(ContentKind::Flashcards, query, course_plan)
            .await?;
        let flashcards: Vec<Flashcard> = payload
            .flashcards
            .into_iter()
            .map(Flashcard::from_generated)
            .collect();
        log_info!("Generated {} flashcards", flashcards.len());
        Ok(FlashcardsResponse {
            flashcards,
            attributions,
        })
    }

    pub async fn generate_quiz_and_resources(
        &self,
        query: &str,
        course_plan: Option<&str>,
    ) -> StudyResult<QuizAndResourcesResponse> {
        let (payload, attributions) = self
            .run::<QuizAndResourcesPayload>(ContentKind::QuizAndResources, query, course_plan)
            .await?;
        let quiz: Vec<QuizQuestion> = payload
            .quiz
            .into_iter()
            .map(QuizQuestion::from_generated)
            .collect();
        let resources = payload.resources.unwrap_or_default();
        log_info!(
            "Generated {} quiz questions and {} resources",
            quiz.len(),
            resources.len()
        );
        Ok(QuizAndResourcesResponse {
            quiz,
            resources,
            attributions,
        })
    }
}
