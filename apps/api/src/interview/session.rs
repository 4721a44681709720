use serde::Serialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::interview::questions::QUESTIONS;
use crate::routes::pages::Page;

/// Delay before the client leaves a completed interview.
pub const COMPLETION_REDIRECT_MS: u64 = 2_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InterviewPhase {
    NotStarted,
    InProgress,
    Completed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CompletionReason {
    TimeUp,
    QuestionsExhausted,
    Ended,
}

/// What a call to `InterviewSession::start` did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartOutcome {
    /// Already started or finished; nothing changed.
    Unchanged,
    Running,
    /// Started with no time left and completed on the spot.
    Completed(CompletionReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CompletionRedirect {
    pub to: Page,
    pub after_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InterviewSnapshot {
    pub application_id: Uuid,
    pub phase: InterviewPhase,
    pub remaining_secs: u32,
    /// `MM:SS`
    pub remaining: String,
    pub progress_percent: f64,
    /// 1-based.
    pub question_number: usize,
    pub total_questions: usize,
    pub question: Option<&'static str>,
    pub speaking: bool,
    pub completion: Option<CompletionReason>,
    pub redirect: Option<CompletionRedirect>,
}

/// The countdown, question cursor and speaking flag of one interview.
///
/// Pure state: the registry drives `tick` once per second and calls
/// `stop_speaking` when the speaking timer fires. Every path into
/// `Completed` returns the reason exactly once.
#[derive(Debug, Clone)]
pub struct InterviewSession {
    application_id: Uuid,
    phase: InterviewPhase,
    budget_secs: u32,
    remaining_secs: u32,
    question_index: usize,
    speaking: bool,
    speaking_generation: u64,
    completion: Option<CompletionReason>,
}

impl InterviewSession {
    pub fn new(application_id: Uuid, budget_secs: u32) -> Self {
        Self {
            application_id,
            phase: InterviewPhase::NotStarted,
            budget_secs,
            remaining_secs: budget_secs,
            question_index: 0,
            speaking: false,
            speaking_generation: 0,
            completion: None,
        }
    }

    /// A session known only to have completed, e.g. from its stored row.
    pub fn closed(application_id: Uuid) -> Self {
        Self {
            application_id,
            phase: InterviewPhase::Completed,
            budget_secs: 0,
            remaining_secs: 0,
            question_index: 0,
            speaking: false,
            speaking_generation: 0,
            completion: None,
        }
    }

    pub fn phase(&self) -> InterviewPhase {
        self.phase
    }

    pub fn speaking_generation(&self) -> u64 {
        self.speaking_generation
    }

    pub fn start(&mut self) -> StartOutcome {
        if self.phase != InterviewPhase::NotStarted {
            return StartOutcome::Unchanged;
        }
        self.phase = InterviewPhase::InProgress;
        self.remaining_secs = self.budget_secs;
        self.begin_speaking();
        if self.remaining_secs == 0 {
            return match self.complete(CompletionReason::TimeUp) {
                Some(reason) => StartOutcome::Completed(reason),
                None => StartOutcome::Unchanged,
            };
        }
        StartOutcome::Running
    }

    /// One elapsed second.
    pub fn tick(&mut self) -> Option<CompletionReason> {
        if self.phase != InterviewPhase::InProgress {
            return None;
        }
        self.remaining_secs = self.remaining_secs.saturating_sub(1);
        if self.remaining_secs == 0 {
            self.complete(CompletionReason::TimeUp)
        } else {
            None
        }
    }

    /// Moves to the next question; past the last one the interview completes.
    pub fn next_question(&mut self) -> Result<Option<CompletionReason>, AppError> {
        match self.phase {
            InterviewPhase::NotStarted => Err(not_started()),
            InterviewPhase::Completed => Ok(None),
            InterviewPhase::InProgress if self.question_index + 1 < QUESTIONS.len() => {
                self.question_index += 1;
                self.begin_speaking();
                Ok(None)
            }
            InterviewPhase::InProgress => Ok(self.complete(CompletionReason::QuestionsExhausted)),
        }
    }

    pub fn end(&mut self) -> Result<Option<CompletionReason>, AppError> {
        match self.phase {
            InterviewPhase::NotStarted => Err(not_started()),
            InterviewPhase::Completed => Ok(None),
            InterviewPhase::InProgress => Ok(self.complete(CompletionReason::Ended)),
        }
    }

    /// Raises the speaking flag and returns the generation a later
    /// `stop_speaking` must present.
    pub fn begin_speaking(&mut self) -> u64 {
        self.speaking = true;
        self.speaking_generation += 1;
        self.speaking_generation
    }

    /// Lowers the flag unless a newer question started speaking since.
    pub fn stop_speaking(&mut self, generation: u64) {
        if generation == self.speaking_generation {
            self.speaking = false;
        }
    }

    fn complete(&mut self, reason: CompletionReason) -> Option<CompletionReason> {
        if self.phase == InterviewPhase::Completed {
            return None;
        }
        self.phase = InterviewPhase::Completed;
        self.speaking = false;
        self.completion = Some(reason);
        Some(reason)
    }

    pub fn snapshot(&self) -> InterviewSnapshot {
        let elapsed = self.budget_secs - self.remaining_secs.min(self.budget_secs);
        let progress_percent = if self.budget_secs == 0 {
            100.0
        } else {
            f64::from(elapsed) / f64::from(self.budget_secs) * 100.0
        };

        InterviewSnapshot {
            application_id: self.application_id,
            phase: self.phase,
            remaining_secs: self.remaining_secs,
            remaining: format_mm_ss(self.remaining_secs),
            progress_percent,
            question_number: self.question_index + 1,
            total_questions: QUESTIONS.len(),
            question: (self.phase == InterviewPhase::InProgress)
                .then(|| QUESTIONS[self.question_index]),
            speaking: self.speaking,
            completion: self.completion,
            redirect: (self.phase == InterviewPhase::Completed).then_some(CompletionRedirect {
                to: Page::InterviewComplete,
                after_ms: COMPLETION_REDIRECT_MS,
            }),
        }
    }
}

fn not_started() -> AppError {
    AppError::Validation("The interview has not started".to_string())
}

pub fn format_mm_ss(secs: u32) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}
