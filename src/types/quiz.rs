use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{StudyError, StudyResult};
use crate::log_warn;

/// A quiz question as the model returns it
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedQuizQuestion {
    pub question: String,
    pub options: Vec<String>,
    pub correct_answer_text: String,
    #[serde(default)]
    pub explanation: Option<String>,
}

/// A multiple-choice question with the user's interaction state
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizQuestion {
    pub id: String,
    pub question: String,
    pub options: Vec<String>,
    pub correct_answer: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_answer: Option<String>,
    /// Only set once the quiz has been submitted
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_correct: Option<bool>,
}

impl QuizQuestion {
    /// Assign a fresh id and carry `correctAnswerText` over as the correct answer
    ///
    /// A correct answer missing from the options is kept as-is; the model does not
    /// enforce membership and we treat it as a data-quality defect.
    pub fn from_generated(generated: GeneratedQuizQuestion) -> Self {
        let question = Self {
            id: Uuid::new_v4().to_string(),
            question: generated.question,
            options: generated.options,
            correct_answer: generated.correct_answer_text,
            explanation: generated.explanation,
            user_answer: None,
            is_correct: None,
        };

        if !question.has_consistent_answer() {
            log_warn!(
                "Quiz question {:?} has a correct answer that is not among its options",
                question.question
            );
        }
        if !question.has_distinct_options() {
            log_warn!(
                "Quiz question {:?} has {} options, expected 4 unique",
                question.question,
                question.options.len()
            );
        }

        question
    }

    /// Whether `correct_answer` equals exactly one of the options
    pub fn has_consistent_answer(&self) -> bool {
        self.options
            .iter()
            .filter(|option| **option == self.correct_answer)
            .count()
            == 1
    }

    fn has_distinct_options(&self) -> bool {
        let mut seen: Vec<&str> = self.options.iter().map(String::as_str).collect();
        seen.sort_unstable();
        seen.dedup();
        self.options.len() == 4 && seen.len() == 4
    }
}

/// The quiz lane's data: questions plus whether results are being shown
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Quiz {
    pub questions: Vec<QuizQuestion>,
    pub show_results: bool,
}

impl Quiz {
    pub fn new(questions: Vec<QuizQuestion>) -> Self {
        Self {
            questions,
            show_results: false,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    /// Record the user's choice
    ///
    /// Answers are locked once the quiz has been graded.
    pub fn select_answer(&mut self, question_id: &str, option: &str) -> StudyResult<()> {
        if self.show_results {
            return Err(StudyError::validation(
                "This quiz has already been graded; answers can no longer be changed.",
            ));
        }

        let question = self
            .questions
            .iter_mut()
            .find(|q| q.id == question_id)
            .ok_or_else(|| StudyError::validation(format!("Unknown quiz question: {question_id}")))?;

        if !question.options.iter().any(|o| o == option) {
            return Err(StudyError::validation(format!(
                "\"{option}\" is not one of the options for this question"
            )));
        }

        question.user_answer = Some(option.to_string());
        Ok(())
    }

    pub fn answered_count(&self) -> usize {
        self.questions
            .iter()
            .filter(|q| q.user_answer.is_some())
            .count()
    }

    /// Grade every question and return the score
    ///
    /// Requires every question to be answered first.
    pub fn submit(&mut self) -> StudyResult<usize> {
        if self.answered_count() != self.questions.len() {
            return Err(StudyError::validation(format!(
                "Answer all questions before submitting ({} of {} answered)",
                self.answered_count(),
                self.questions.len()
            )));
        }

        for question in &mut self.questions {
            question.is_correct =
                Some(question.user_answer.as_deref() == Some(question.correct_answer.as_str()));
        }
        self.show_results = true;
        Ok(self.score())
    }

    /// Number of questions graded correct
    pub fn score(&self) -> usize {
        self.questions
            .iter()
            .filter(|q| q.is_correct == Some(true))
            .count()
    }
}
