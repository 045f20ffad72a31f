use std::sync::Arc;

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::error::{StudyError, StudyResult};
use crate::generator::StudyGenerator;
use crate::log_debug;

use super::events::{SessionEffect, SessionEvent, StudyRequest, SubmissionId};
use super::reducer::reduce;
use super::state::SessionState;

/// Runs the generators for each submission and folds their completions into
/// [`SessionState`]
///
/// The three generator calls run concurrently; each completion is an event
/// tagged with the submission that launched it. Nothing is cancelled when a
/// newer submission arrives; older completions are simply discarded.
pub struct Orchestrator {
    generator: Arc<StudyGenerator>,
    state: SessionState,
    tx: UnboundedSender<SessionEvent>,
    rx: UnboundedReceiver<SessionEvent>,
}

impl Orchestrator {
    pub fn new(generator: StudyGenerator) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            generator: Arc::new(generator),
            state: SessionState::new(),
            tx,
            rx,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Start generating every lane for `request`
    ///
    /// A blank query is rejected without touching any lane.
    pub fn submit(&mut self, request: StudyRequest) -> StudyResult<SubmissionId> {
        let effects = self.dispatch(SessionEvent::Submit(request));
        effects
            .into_iter()
            .find_map(|effect| match effect {
                SessionEffect::Dispatch { submission, .. } => Some(Ok(submission)),
                SessionEffect::Prompt(message) => Some(Err(StudyError::Validation(message))),
                _ => None,
            })
            .unwrap_or_else(|| Err(StudyError::validation("Submission was not dispatched")))
    }

    /// Wait for the next completion and apply it
    ///
    /// Returns `None` once nothing is left in flight for the current submission.
    pub async fn next_update(&mut self) -> Option<Vec<SessionEffect>> {
        if !self.state.busy() {
            return None;
        }
        // The orchestrator holds a sender, so the channel never closes underneath us
        let event = self.rx.recv().await?;
        Some(self.dispatch(event))
    }

    /// Drive the current submission until every lane has settled
    pub async fn settle(&mut self) -> Vec<SessionEffect> {
        let mut all = Vec::new();
        while let Some(effects) = self.next_update().await {
            all.extend(effects);
        }
        all
    }

    /// Apply whatever completions have already arrived, without waiting
    pub fn apply_pending(&mut self) -> Vec<SessionEffect> {
        let mut all = Vec::new();
        while let Ok(event) = self.rx.try_recv() {
            all.extend(self.dispatch(event));
        }
        all
    }

    pub fn select_answer(&mut self, question_id: &str, option: &str) -> StudyResult<()> {
        let effects = self.dispatch(SessionEvent::SelectAnswer {
            question_id: question_id.to_string(),
            option: option.to_string(),
        });
        match first_prompt(effects) {
            Some(message) => Err(StudyError::Validation(message)),
            None => Ok(()),
        }
    }

    /// Grade the quiz; returns `(score, total)`
    pub fn submit_quiz(&mut self) -> StudyResult<(usize, usize)> {
        let effects = self.dispatch(SessionEvent::SubmitQuiz);
        let mut prompt = None;
        for effect in effects {
            match effect {
                SessionEffect::QuizScored { score, total } => return Ok((score, total)),
                SessionEffect::Prompt(message) => prompt = Some(message),
                _ => {}
            }
        }
        Err(StudyError::Validation(
            prompt.unwrap_or_else(|| "Quiz could not be graded".to_string()),
        ))
    }

    /// Reduce one event and run the effects that need the runtime
    fn dispatch(&mut self, event: SessionEvent) -> Vec<SessionEffect> {
        let effects = reduce(&mut self.state, event);
        for effect in &effects {
            if let SessionEffect::Dispatch {
                submission,
                request,
            } = effect
            {
                self.spawn_generators(*submission, request);
            }
        }
        effects
    }

    fn spawn_generators(&self, submission: SubmissionId, request: &StudyRequest) {
        log_debug!("Spawning generators for submission {}", submission);

        let generator = Arc::clone(&self.generator);
        let tx = self.tx.clone();
        let req = request.clone();
        tokio::spawn(async move {
            let result = generator
                .generate_notes(&req.query, req.course_plan.as_deref())
                .await;
            let _ = tx.send(SessionEvent::NotesFinished { submission, result });
        });

        let generator = Arc::clone(&self.generator);
        let tx = self.tx.clone();
        let req = request.clone();
        tokio::spawn(async move {
            let result = generator
                .generate_flashcards(&req.query, req.course_plan.as_deref())
                .await;
            let _ = tx.send(SessionEvent::FlashcardsFinished { submission, result });
        });

        let generator = Arc::clone(&self.generator);
        let tx = self.tx.clone();
        let req = request.clone();
        tokio::spawn(async move {
            let result = generator
                .generate_quiz_and_resources(&req.query, req.course_plan.as_deref())
                .await;
            let _ = tx.send(SessionEvent::QuizAndResourcesFinished { submission, result });
        });
    }
}

fn first_prompt(effects: Vec<SessionEffect>) -> Option<String> {
    effects.into_iter().find_map(|effect| match effect {
        SessionEffect::Prompt(message) => Some(message),
        _ => None,
    })
}
