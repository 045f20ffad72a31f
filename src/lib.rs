//! Study Circle - AI study partner
//!
//! Turns a topic and an optional course plan into study notes, flashcards, a
//! short quiz and curated external resources, generated concurrently from a
//! Gemini backend whose JSON output is repaired before use.

// Allow certain clippy warnings that are stylistic
#![allow(clippy::uninlined_format_args)] // Style preference
#![allow(clippy::format_push_string)] // Performance improvement but stylistic
#![allow(clippy::return_self_not_must_use)] // Builder pattern is clear enough
#![allow(clippy::items_after_statements)] // Locally-scoped use statements are fine

pub mod citations;
pub mod cli;
pub mod commands;
pub mod compose;
pub mod config;
pub mod error;
pub mod generator;
pub mod ingest;
pub mod llm_providers;
pub mod logger;
pub mod parser;
pub mod prompts;
pub mod session;
pub mod types;
pub mod ui;

// Re-export important structs and functions for easier testing
pub use compose::ContentKind;
pub use config::Config;
pub use error::{MalformedResponse, StudyError, StudyResult};
pub use generator::StudyGenerator;
pub use llm_providers::{GeminiClient, GenerationBackend, GenerationConfig, RawResponse};
pub use session::{Lane, Orchestrator, SessionState, StudyRequest, SubmissionId};
