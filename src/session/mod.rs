//! Per-submission orchestration
//!
//! Four lanes (notes, flashcards, quiz, resources) load independently. State
//! transitions live in a pure reducer; [`Orchestrator`] runs the generators and
//! feeds their completions back through it.

mod events;
mod orchestrator;
mod reducer;
mod state;

pub use events::{SessionEffect, SessionEvent, StudyRequest, SubmissionId};
pub use orchestrator::Orchestrator;
pub use reducer::reduce;
pub use state::{Lane, LaneState, LaneView, SessionState};
