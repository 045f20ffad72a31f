use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A flashcard as the model returns it, without identity
#[derive(Debug, Clone, Deserialize)]
pub struct GeneratedFlashcard {
    pub question: String,
    pub answer: String,
}

/// `{"flashcards": [{"question": ..., "answer": ...}]}`
#[derive(Debug, Clone, Deserialize)]
pub struct FlashcardsPayload {
    pub flashcards: Vec<GeneratedFlashcard>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Flashcard {
    pub id: String,
    pub question: String,
    pub answer: String,
}

impl Flashcard {
    /// Assign a fresh id to a generated card
    pub fn from_generated(card: GeneratedFlashcard) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            question: card.question,
            answer: card.answer,
        }
    }
}
