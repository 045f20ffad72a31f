use std::fmt;

use crate::error::StudyResult;
use crate::types::{FlashcardsResponse, NotesResponse, QuizAndResourcesResponse};

use super::state::Lane;

/// Identifies one user submission; completions carry it so stale ones can be dropped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubmissionId(pub u64);

impl fmt::Display for SubmissionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// What the user asked for
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudyRequest {
    pub query: String,
    pub course_plan: Option<String>,
}

impl StudyRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            course_plan: None,
        }
    }

    pub fn with_course_plan(mut self, course_plan: impl Into<String>) -> Self {
        self.course_plan = Some(course_plan.into());
        self
    }
}

/// Inputs to the reducer
#[derive(Debug, Clone)]
pub enum SessionEvent {
    Submit(StudyRequest),
    NotesFinished {
        submission: SubmissionId,
        result: StudyResult<NotesResponse>,
    },
    FlashcardsFinished {
        submission: SubmissionId,
        result: StudyResult<FlashcardsResponse>,
    },
    /// Settles both the quiz and the resources lane
    QuizAndResourcesFinished {
        submission: SubmissionId,
        result: StudyResult<QuizAndResourcesResponse>,
    },
    SelectAnswer {
        question_id: String,
        option: String,
    },
    SubmitQuiz,
}

/// Work the reducer asks the caller to perform or surface
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEffect {
    /// Launch all generators for this submission
    Dispatch {
        submission: SubmissionId,
        request: StudyRequest,
    },
    /// User-visible message; nothing was dispatched
    Prompt(String),
    /// A lane reached `Done` or `Failed`
    LaneSettled(Lane),
    /// A completion for an older submission was ignored
    Discarded(SubmissionId),
    QuizScored { score: usize, total: usize },
}
