//! Pure reducer for a study session
//!
//! All state transitions happen here. No I/O and no async: the caller runs the
//! returned effects (spawning generators, printing prompts) after the update.

use crate::error::StudyError;
use crate::types::{GroundingAttribution, Quiz, merge_attributions};
use crate::{log_debug, log_warn};

use super::events::{SessionEffect, SessionEvent, SubmissionId};
use super::state::{Lane, LaneState, SessionState};

/// Shown when a submission arrives without a query
pub const EMPTY_QUERY_PROMPT: &str = "Please enter a query.";

// ═══════════════════════════════════════════════════════════════════════════════
// Reducer Function
// ═══════════════════════════════════════════════════════════════════════════════

/// Reducer: (state, event) → effects
pub fn reduce(state: &mut SessionState, event: SessionEvent) -> Vec<SessionEffect> {
    let mut effects = Vec::new();

    match event {
        // ─────────────────────────────────────────────────────────────────────────
        // Submission
        // ─────────────────────────────────────────────────────────────────────────
        SessionEvent::Submit(mut request) => {
            let query = request.query.trim();
            if query.is_empty() {
                state.prompt = Some(EMPTY_QUERY_PROMPT.to_string());
                effects.push(SessionEffect::Prompt(EMPTY_QUERY_PROMPT.to_string()));
                return effects;
            }
            request.query = query.to_string();

            state.reset_lanes();
            let submission = state.begin_submission();
            log_debug!("Submission {} dispatched: {:?}", submission, request.query);
            effects.push(SessionEffect::Dispatch {
                submission,
                request,
            });
        }

        // ─────────────────────────────────────────────────────────────────────────
        // Lane Completions
        // ─────────────────────────────────────────────────────────────────────────
        SessionEvent::NotesFinished { submission, result } => {
            if let Some(stale) = reject_stale(state, submission) {
                effects.push(stale);
                return effects;
            }
            state.notes = match result {
                Ok(response) => {
                    absorb_attributions(state, response.attributions);
                    LaneState::Done(response.notes)
                }
                Err(err) => failed(Lane::Notes, &err),
            };
            effects.push(SessionEffect::LaneSettled(Lane::Notes));
        }

        SessionEvent::FlashcardsFinished { submission, result } => {
            if let Some(stale) = reject_stale(state, submission) {
                effects.push(stale);
                return effects;
            }
            state.flashcards = match result {
                Ok(response) => {
                    absorb_attributions(state, response.attributions);
                    LaneState::Done(response.flashcards)
                }
                Err(err) => failed(Lane::Flashcards, &err),
            };
            effects.push(SessionEffect::LaneSettled(Lane::Flashcards));
        }

        SessionEvent::QuizAndResourcesFinished { submission, result } => {
            if let Some(stale) = reject_stale(state, submission) {
                effects.push(stale);
                return effects;
            }
            match result {
                Ok(response) => {
                    absorb_attributions(state, response.attributions);
                    state.quiz = LaneState::Done(Quiz::new(response.quiz));
                    state.resources = LaneState::Done(response.resources);
                }
                Err(err) => {
                    // One call feeds both lanes, so both report the same failure
                    state.quiz = failed(Lane::Quiz, &err);
                    state.resources = LaneState::Failed(err.to_string());
                }
            }
            effects.push(SessionEffect::LaneSettled(Lane::Quiz));
            effects.push(SessionEffect::LaneSettled(Lane::Resources));
        }

        // ─────────────────────────────────────────────────────────────────────────
        // Quiz Interaction
        // ─────────────────────────────────────────────────────────────────────────
        SessionEvent::SelectAnswer {
            question_id,
            option,
        } => {
            let outcome = match state.quiz.data_mut() {
                Some(quiz) => quiz.select_answer(&question_id, &option),
                None => Err(StudyError::validation("No quiz is available yet.")),
            };
            match outcome {
                Ok(()) => state.prompt = None,
                Err(err) => effects.push(prompt(state, &err)),
            }
        }

        SessionEvent::SubmitQuiz => {
            let outcome = match state.quiz.data_mut() {
                Some(quiz) => quiz.submit().map(|score| (score, quiz.len())),
                None => Err(StudyError::validation("No quiz is available yet.")),
            };
            match outcome {
                Ok((score, total)) => {
                    state.prompt = None;
                    effects.push(SessionEffect::QuizScored { score, total });
                }
                Err(err) => effects.push(prompt(state, &err)),
            }
        }
    }

    effects
}

// ═══════════════════════════════════════════════════════════════════════════════
// Helpers
// ═══════════════════════════════════════════════════════════════════════════════

fn reject_stale(state: &SessionState, submission: SubmissionId) -> Option<SessionEffect> {
    if state.is_current(submission) {
        return None;
    }
    log_debug!(
        "Discarding completion for stale submission {} (current: {:?})",
        submission,
        state.current
    );
    Some(SessionEffect::Discarded(submission))
}

fn absorb_attributions(state: &mut SessionState, incoming: Vec<GroundingAttribution>) {
    merge_attributions(&mut state.attributions, incoming);
}

fn failed<T>(lane: Lane, err: &StudyError) -> LaneState<T> {
    log_warn!("{} lane failed [{}]: {}", lane, err.code(), err);
    LaneState::Failed(err.to_string())
}

fn prompt(state: &mut SessionState, err: &StudyError) -> SessionEffect {
    let message = err.to_string();
    state.prompt = Some(message.clone());
    SessionEffect::Prompt(message)
}
