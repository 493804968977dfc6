use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;

use super::catalog::QuestionCatalog;
use super::domain::{Answer, AnswerHistory, AnswerValue, ChoiceOption, Question};
use super::resolve::{accumulated_signals, resolve_options, visible_questions};
use super::validate::{conform_value, AnswerRejection};

/// Recoverable failures while driving a session.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("answer to '{question_id}' rejected: {reason}")]
    InvalidAnswerKind {
        question_id: &'static str,
        reason: AnswerRejection,
    },
    #[error("interview is complete; no current question")]
    NoCurrentQuestion,
    #[error("already at the first question")]
    AtStart,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    InProgress,
    Completed,
}

impl SessionStatus {
    pub const fn label(self) -> &'static str {
        match self {
            SessionStatus::InProgress => "in progress",
            SessionStatus::Completed => "completed",
        }
    }
}

/// Immutable result of a completed interview: the committed answers, the
/// accumulated signals, and the confidence at completion (always 100 for a
/// non-empty flow).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProfileSnapshot {
    pub answers: Vec<Answer>,
    pub signals: Vec<&'static str>,
    pub confidence: u8,
}

/// What a committed answer led to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Advanced,
    Completed(ProfileSnapshot),
}

/// One interview in progress: an answer history bound to one catalog.
///
/// The session stores nothing except the history. Cursor, visibility,
/// options, signals, and confidence are all derived from it on demand, so
/// there is no cached state to fall out of sync when an answer changes.
#[derive(Debug, Clone)]
pub struct InterviewSession {
    catalog: Arc<QuestionCatalog>,
    history: AnswerHistory,
}

impl InterviewSession {
    pub fn new(catalog: Arc<QuestionCatalog>) -> Self {
        Self {
            catalog,
            history: AnswerHistory::default(),
        }
    }

    pub fn catalog(&self) -> &QuestionCatalog {
        &self.catalog
    }

    pub fn history(&self) -> &AnswerHistory {
        &self.history
    }

    /// Position in the visible sequence; always the number of committed
    /// answers.
    pub fn cursor(&self) -> usize {
        self.history.len()
    }

    pub fn visible_questions(&self) -> Vec<&Question> {
        visible_questions(&self.catalog, &self.history)
    }

    pub fn status(&self) -> SessionStatus {
        if self.is_complete() {
            SessionStatus::Completed
        } else {
            SessionStatus::InProgress
        }
    }

    pub fn is_complete(&self) -> bool {
        self.cursor() >= self.visible_questions().len()
    }

    pub fn current_question(&self) -> Result<&Question, SessionError> {
        self.visible_questions()
            .get(self.cursor())
            .copied()
            .ok_or(SessionError::NoCurrentQuestion)
    }

    /// Options for the current question, re-derived from the history.
    pub fn current_options(&self) -> Result<Vec<ChoiceOption>, SessionError> {
        let question = self.current_question()?;
        Ok(resolve_options(&self.catalog, question, &self.history))
    }

    pub fn signals(&self) -> Vec<&'static str> {
        accumulated_signals(&self.catalog, &self.history)
    }

    /// Share of the currently visible flow that has been answered, 0..=100.
    pub fn confidence(&self) -> u8 {
        let answered = self.cursor();
        let visible = self.visible_questions().len().max(1);
        ((answered * 100) / visible).min(100) as u8
    }

    /// The profile, once every visible question has an answer.
    pub fn snapshot(&self) -> Option<ProfileSnapshot> {
        if self.is_complete() {
            Some(self.build_snapshot())
        } else {
            None
        }
    }

    fn build_snapshot(&self) -> ProfileSnapshot {
        ProfileSnapshot {
            answers: self.history.answers().to_vec(),
            signals: self.signals(),
            confidence: self.confidence(),
        }
    }

    /// Validate `value` against the current question and commit it.
    ///
    /// Nothing is committed on rejection; the caller re-presents the same
    /// question with the error.
    pub fn submit_answer(&mut self, value: AnswerValue) -> Result<SubmitOutcome, SessionError> {
        let question = self.current_question()?;
        let question_id = question.id;
        let presented = resolve_options(&self.catalog, question, &self.history);
        let conformed = conform_value(question, &presented, value)
            .map_err(|reason| SessionError::InvalidAnswerKind {
                question_id,
                reason,
            })?;

        self.history.push(question_id, conformed);

        if self.is_complete() {
            Ok(SubmitOutcome::Completed(self.build_snapshot()))
        } else {
            Ok(SubmitOutcome::Advanced)
        }
    }

    /// Remove and return the most recent answer.
    ///
    /// The popped answer is handed back for pre-filling, not restored;
    /// re-confirming it goes through `submit_answer` again and earns a fresh
    /// sequence number. Answers that would be orphaned by changing an
    /// earlier one were necessarily popped on the way back to it.
    pub fn go_back(&mut self) -> Result<Answer, SessionError> {
        self.history.pop().ok_or(SessionError::AtStart)
    }
}
