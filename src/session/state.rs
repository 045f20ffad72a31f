use strum_macros::{Display, EnumIter, EnumString};

use crate::types::{
    ExternalResource, Flashcard, GroundingAttribution, MergedResource, Quiz, merged_resources,
};

use super::events::SubmissionId;

/// The four independently loading sections of a study session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, EnumString)]
#[strum(ascii_case_insensitive)]
pub enum Lane {
    Notes,
    Flashcards,
    Quiz,
    Resources,
}

/// Lifecycle of one lane within the current submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LaneState<T> {
    Idle,
    Loading,
    Done(T),
    Failed(String),
}

impl<T> Default for LaneState<T> {
    fn default() -> Self {
        Self::Idle
    }
}

impl<T> LaneState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    pub fn is_settled(&self) -> bool {
        matches!(self, Self::Done(_) | Self::Failed(_))
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            Self::Done(data) => Some(data),
            _ => None,
        }
    }

    pub fn data_mut(&mut self) -> Option<&mut T> {
        match self {
            Self::Done(data) => Some(data),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Failed(message) => Some(message),
            _ => None,
        }
    }

    pub fn view(&self) -> LaneView<'_, T> {
        LaneView {
            loading: self.is_loading(),
            error: self.error(),
            data: self.data(),
        }
    }
}

/// Flattened read-only view of a lane for rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LaneView<'a, T> {
    pub loading: bool,
    pub error: Option<&'a str>,
    pub data: Option<&'a T>,
}

/// Everything the session knows about the current submission
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    /// Submission whose completions are accepted; `None` before the first submit
    pub current: Option<SubmissionId>,
    pub(super) next_submission: u64,
    pub notes: LaneState<String>,
    pub flashcards: LaneState<Vec<Flashcard>>,
    pub quiz: LaneState<Quiz>,
    pub resources: LaneState<Vec<ExternalResource>>,
    /// Citations accumulated across lanes, deduplicated by uri
    pub attributions: Vec<GroundingAttribution>,
    /// Last user-facing message (e.g. a rejected blank query)
    pub prompt: Option<String>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate the next submission id and make it current
    pub(super) fn begin_submission(&mut self) -> SubmissionId {
        self.next_submission += 1;
        let id = SubmissionId(self.next_submission);
        self.current = Some(id);
        id
    }

    /// Reset all lanes to loading and drop previous results
    pub(super) fn reset_lanes(&mut self) {
        self.notes = LaneState::Loading;
        self.flashcards = LaneState::Loading;
        self.quiz = LaneState::Loading;
        self.resources = LaneState::Loading;
        self.attributions.clear();
        self.prompt = None;
    }

    pub fn is_current(&self, submission: SubmissionId) -> bool {
        self.current == Some(submission)
    }

    /// Any lane still waiting on the backend
    pub fn busy(&self) -> bool {
        self.notes.is_loading()
            || self.flashcards.is_loading()
            || self.quiz.is_loading()
            || self.resources.is_loading()
    }

    pub fn lane_loading(&self, lane: Lane) -> bool {
        match lane {
            Lane::Notes => self.notes.is_loading(),
            Lane::Flashcards => self.flashcards.is_loading(),
            Lane::Quiz => self.quiz.is_loading(),
            Lane::Resources => self.resources.is_loading(),
        }
    }

    pub fn lane_error(&self, lane: Lane) -> Option<&str> {
        match lane {
            Lane::Notes => self.notes.error(),
            Lane::Flashcards => self.flashcards.error(),
            Lane::Quiz => self.quiz.error(),
            Lane::Resources => self.resources.error(),
        }
    }

    /// Suggested resources and accumulated citations as one list
    pub fn merged_resources(&self) -> Vec<MergedResource> {
        let suggested = self.resources.data().map_or(&[][..], Vec::as_slice);
        merged_resources(suggested, &self.attributions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lane_view_reflects_state() {
        let loading: LaneState<String> = LaneState::Loading;
        let view = loading.view();
        assert!(view.loading);
        assert!(view.error.is_none() && view.data.is_none());

        let failed: LaneState<String> = LaneState::Failed("boom".into());
        assert_eq!(failed.view().error, Some("boom"));
        assert!(failed.is_settled());

        let done = LaneState::Done("notes".to_string());
        assert_eq!(done.view().data.map(String::as_str), Some("notes"));
    }

    #[test]
    fn test_submission_ids_increase() {
        let mut state = SessionState::new();
        assert!(!state.busy());
        let first = state.begin_submission();
        let second = state.begin_submission();
        assert!(second > first);
        assert!(state.is_current(second));
        assert!(!state.is_current(first));
    }
}
