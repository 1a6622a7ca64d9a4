use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::session::QuizSession;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SummaryError {
    #[error("completed_at is before started_at")]
    InvalidTimeRange,

    #[error("session is not complete ({position} of {total} questions)")]
    Incomplete { position: usize, total: usize },
}

/// Outcome of a finished play-through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizSummary {
    started_at: DateTime<Utc>,
    completed_at: DateTime<Utc>,
    total_questions: usize,
    answered: usize,
    correct: usize,
    skipped: usize,
}

impl QuizSummary {
    /// Summarize a complete session.
    ///
    /// `skipped` is the number of malformed questions dropped before the
    /// session started.
    ///
    /// # Errors
    ///
    /// Returns `SummaryError::Incomplete` while the session still has
    /// questions left, `SummaryError::InvalidTimeRange` for reversed timestamps.
    pub fn from_session(
        session: &QuizSession,
        started_at: DateTime<Utc>,
        completed_at: DateTime<Utc>,
        skipped: usize,
    ) -> Result<Self, SummaryError> {
        if !session.is_complete() {
            return Err(SummaryError::Incomplete {
                position: session.position(),
                total: session.total(),
            });
        }
        if completed_at < started_at {
            return Err(SummaryError::InvalidTimeRange);
        }

        Ok(Self {
            started_at,
            completed_at,
            total_questions: session.total(),
            answered: session.answers().len(),
            correct: session.score(),
            skipped,
        })
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn completed_at(&self) -> DateTime<Utc> {
        self.completed_at
    }

    #[must_use]
    pub fn total_questions(&self) -> usize {
        self.total_questions
    }

    #[must_use]
    pub fn answered(&self) -> usize {
        self.answered
    }

    #[must_use]
    pub fn correct(&self) -> usize {
        self.correct
    }

    #[must_use]
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    #[must_use]
    pub fn duration(&self) -> chrono::Duration {
        self.completed_at - self.started_at
    }
}
