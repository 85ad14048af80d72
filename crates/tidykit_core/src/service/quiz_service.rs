//! Quiz session: answer checking, scoring and delayed advance.
//!
//! # Responsibility
//! - Walk a fixed question list, scoring one answer per question.
//! - Show feedback for a fixed delay, then move to the next question or to
//!   the results state.
//!
//! # Invariants
//! - At most one advance is pending at a time; answers are rejected while
//!   feedback is shown.
//! - A pending advance is cancelled by `reset` and when the session is
//!   dropped, so it never fires against a torn-down session. Cancellation
//!   and the advance itself both run under the state lock.

use crate::model::quiz::QuizQuestion;
use crate::notify::ChangeNotifier;
use log::{debug, info};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// How long answer feedback stays up before the session advances.
pub const DEFAULT_ADVANCE_DELAY: Duration = Duration::from_millis(1500);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuizConfig {
    pub advance_delay: Duration,
}

impl Default for QuizConfig {
    fn default() -> Self {
        Self {
            advance_delay: DEFAULT_ADVANCE_DELAY,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuizError {
    /// The question list is empty.
    NoQuestions,
    /// Feedback for the previous answer is still showing.
    AdvancePending,
    /// Every question has been answered.
    Finished,
    /// Constructed outside a tokio runtime.
    NoRuntime,
}

impl Display for QuizError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoQuestions => write!(f, "quiz has no questions"),
            Self::AdvancePending => write!(f, "previous answer is still being shown"),
            Self::Finished => write!(f, "quiz is already finished"),
            Self::NoRuntime => write!(f, "quiz session requires a tokio runtime"),
        }
    }
}

impl Error for QuizError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuizEvent {
    Answered { question_id: String, is_correct: bool },
    Advanced { index: usize },
    Finished { score: u32, total: usize },
    Reset,
}

/// Read-only view of session state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizSnapshot {
    pub current_index: usize,
    pub current_question: Option<QuizQuestion>,
    pub total: usize,
    pub score: u32,
    pub show_feedback: bool,
    pub is_correct: bool,
    pub showing_results: bool,
    pub selected_answer: Option<String>,
}

#[derive(Debug)]
struct QuizState {
    questions: Vec<QuizQuestion>,
    current_index: usize,
    score: u32,
    show_feedback: bool,
    is_correct: bool,
    showing_results: bool,
    selected_answer: Option<String>,
}

impl QuizState {
    fn new(questions: Vec<QuizQuestion>) -> Self {
        Self {
            questions,
            current_index: 0,
            score: 0,
            show_feedback: false,
            is_correct: false,
            showing_results: false,
            selected_answer: None,
        }
    }

    fn current(&self) -> Option<&QuizQuestion> {
        self.questions.get(self.current_index)
    }

    fn advance(&mut self) -> QuizEvent {
        self.show_feedback = false;
        if self.current_index + 1 < self.questions.len() {
            self.current_index += 1;
            self.selected_answer = None;
            QuizEvent::Advanced {
                index: self.current_index,
            }
        } else {
            self.showing_results = true;
            QuizEvent::Finished {
                score: self.score,
                total: self.questions.len(),
            }
        }
    }

    fn reset(&mut self) {
        self.current_index = 0;
        self.score = 0;
        self.show_feedback = false;
        self.is_correct = false;
        self.showing_results = false;
        self.selected_answer = None;
    }

    fn snapshot(&self) -> QuizSnapshot {
        QuizSnapshot {
            current_index: self.current_index,
            current_question: self.current().cloned(),
            total: self.questions.len(),
            score: self.score,
            show_feedback: self.show_feedback,
            is_correct: self.is_correct,
            showing_results: self.showing_results,
            selected_answer: self.selected_answer.clone(),
        }
    }
}

struct PendingAdvance {
    token: CancellationToken,
    _task: JoinHandle<()>,
}

/// One run through a question list.
pub struct QuizSession {
    state: Arc<Mutex<QuizState>>,
    config: QuizConfig,
    runtime: Handle,
    pending: Option<PendingAdvance>,
    notifier: ChangeNotifier<QuizEvent>,
}

impl QuizSession {
    /// Creates a session that schedules advances on `runtime`.
    pub fn new(questions: Vec<QuizQuestion>, config: QuizConfig, runtime: Handle) -> Self {
        info!(
            "event=quiz_start module=quiz_service status=ok questions={}",
            questions.len()
        );
        Self {
            state: Arc::new(Mutex::new(QuizState::new(questions))),
            config,
            runtime,
            pending: None,
            notifier: ChangeNotifier::new(),
        }
    }

    /// Creates a session on the runtime the caller is running in.
    pub fn on_current_runtime(
        questions: Vec<QuizQuestion>,
        config: QuizConfig,
    ) -> Result<Self, QuizError> {
        let runtime = Handle::try_current().map_err(|_| QuizError::NoRuntime)?;
        Ok(Self::new(questions, config, runtime))
    }

    /// Records `answer` for the current question and schedules the advance.
    ///
    /// Returns whether the answer was correct.
    pub fn check_answer(&mut self, answer: &str) -> Result<bool, QuizError> {
        let (question_id, is_correct) = {
            let mut state = lock(&self.state);
            if state.showing_results {
                return Err(QuizError::Finished);
            }
            if state.show_feedback {
                return Err(QuizError::AdvancePending);
            }
            let Some(question) = state.current() else {
                return Err(QuizError::NoQuestions);
            };

            let question_id = question.id.clone();
            let is_correct = question.is_correct(answer);
            state.selected_answer = Some(answer.to_string());
            state.is_correct = is_correct;
            if is_correct {
                state.score += 1;
            }
            state.show_feedback = true;
            (question_id, is_correct)
        };

        debug!(
            "event=quiz_answer module=quiz_service question_id={question_id} correct={is_correct}"
        );
        self.notifier.notify(QuizEvent::Answered {
            question_id,
            is_correct,
        });
        self.schedule_advance();
        Ok(is_correct)
    }

    /// Cancels any pending advance and returns to the first question.
    pub fn reset(&mut self) {
        {
            let mut state = lock(&self.state);
            cancel(&mut self.pending);
            state.reset();
        }
        self.notifier.notify(QuizEvent::Reset);
    }

    pub fn snapshot(&self) -> QuizSnapshot {
        lock(&self.state).snapshot()
    }

    pub fn is_advance_pending(&self) -> bool {
        lock(&self.state).show_feedback
    }

    pub fn subscribe(&self) -> broadcast::Receiver<QuizEvent> {
        self.notifier.subscribe()
    }

    fn schedule_advance(&mut self) {
        self.cancel_pending();

        let token = CancellationToken::new();
        let cancelled = token.clone();
        let state = Arc::clone(&self.state);
        let notifier = self.notifier.clone();
        let delay = self.config.advance_delay;

        let task = self.runtime.spawn(async move {
            tokio::select! {
                _ = cancelled.cancelled() => {}
                _ = tokio::time::sleep(delay) => {
                    let event = {
                        let mut state = lock(&state);
                        // Cancellation happens under this lock.
                        if cancelled.is_cancelled() {
                            return;
                        }
                        state.advance()
                    };
                    notifier.notify(event);
                }
            }
        });
        self.pending = Some(PendingAdvance { token, _task: task });
    }

    fn cancel_pending(&mut self) {
        let _state = lock(&self.state);
        cancel(&mut self.pending);
    }
}

impl Drop for QuizSession {
    fn drop(&mut self) {
        self.cancel_pending();
    }
}

/// Callers hold the state lock so a task past its sleep cannot advance
/// after this returns.
fn cancel(pending: &mut Option<PendingAdvance>) {
    if let Some(pending) = pending.take() {
        pending.token.cancel();
    }
}

fn lock(state: &Mutex<QuizState>) -> MutexGuard<'_, QuizState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}
