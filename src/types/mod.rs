//! Study-aid entities and the payload shapes the model is asked to produce
//!
//! Payload types (`*Payload`, `Generated*`) mirror the JSON the model returns.
//! Entity types carry locally-assigned identity and user interaction state.

mod flashcard;
mod notes;
mod quiz;
mod resource;

pub use flashcard::{Flashcard, FlashcardsPayload, GeneratedFlashcard};
pub use notes::NotesPayload;
pub use quiz::{GeneratedQuizQuestion, Quiz, QuizQuestion};
pub use resource::{
    ExternalResource, GroundingAttribution, MergedResource, Provenance, UNTITLED_WEB_RESOURCE,
    merge_attributions, merged_resources,
};

use serde::Deserialize;

/// Combined quiz and resource payload, produced by a single backend call
#[derive(Debug, Clone, Deserialize)]
pub struct QuizAndResourcesPayload {
    pub quiz: Vec<GeneratedQuizQuestion>,
    #[serde(default)]
    pub resources: Option<Vec<ExternalResource>>,
}

/// Result of a notes generation
#[derive(Debug, Clone, PartialEq)]
pub struct NotesResponse {
    pub notes: String,
    pub attributions: Vec<GroundingAttribution>,
}

/// Result of a flashcards generation
#[derive(Debug, Clone, PartialEq)]
pub struct FlashcardsResponse {
    pub flashcards: Vec<Flashcard>,
    pub attributions: Vec<GroundingAttribution>,
}

/// Result of the combined quiz and resources generation
#[derive(Debug, Clone, PartialEq)]
pub struct QuizAndResourcesResponse {
    pub quiz: Vec<QuizQuestion>,
    pub resources: Vec<ExternalResource>,
    pub attributions: Vec<GroundingAttribution>,
}
