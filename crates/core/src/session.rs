//! The quiz session engine.
//!
//! A `QuizSession` walks a fixed list of questions with a two-step
//! transition per question: `confirm` locks in the pending selection and
//! records whether it was correct, `advance` moves to the next question.
//! Between the two the selection and the recorded answer stay visible so a
//! front-end can show feedback for as long as it likes.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::{AnswerRecord, MalformedQuestion, Question};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionError {
    #[error("option {index} does not exist, the question has {option_count} options")]
    InvalidSelection { index: usize, option_count: usize },

    #[error("the session is already complete")]
    InvalidState,

    #[error("no option selected")]
    NoSelection,

    #[error("the current question was already confirmed")]
    AlreadyConfirmed,

    #[error("the current question has not been confirmed yet")]
    NotConfirmed,

    #[error(transparent)]
    MalformedQuestion(#[from] MalformedQuestion),

    #[error("inconsistent session: {0}")]
    Inconsistent(&'static str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    InProgress,
    Complete,
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// One play-through over a snapshot of questions.
///
/// Invariant: `answers.len()` is either `position` (current question not yet
/// confirmed) or `position + 1` (confirmed, waiting for `advance`).
/// Deserialization checks it again.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "SessionParts")]
pub struct QuizSession {
    questions: Vec<Question>,
    position: usize,
    answers: Vec<AnswerRecord>,
    pending_selection: Option<usize>,
}

#[derive(Deserialize)]
struct SessionParts {
    questions: Vec<Question>,
    position: usize,
    answers: Vec<AnswerRecord>,
    pending_selection: Option<usize>,
}

impl TryFrom<SessionParts> for QuizSession {
    type Error = SessionError;

    fn try_from(parts: SessionParts) -> Result<Self, Self::Error> {
        let SessionParts {
            questions,
            position,
            answers,
            pending_selection,
        } = parts;

        if position > questions.len() {
            return Err(SessionError::Inconsistent("position is past the last question"));
        }
        let confirmed = answers.len() == position + 1 && position < questions.len();
        if answers.len() != position && !confirmed {
            return Err(SessionError::Inconsistent("answers do not match the position"));
        }
        let answers_match = answers.iter().zip(&questions).all(|(answer, question)| {
            answer.question_id == question.id()
                && answer.chosen_index < question.option_count()
                && answer.correct == question.is_correct(answer.chosen_index)
        });
        if !answers_match {
            return Err(SessionError::Inconsistent("an answer does not fit its question"));
        }
        if let Some(index) = pending_selection {
            let fits = questions
                .get(position)
                .is_some_and(|question| index < question.option_count());
            if !fits {
                return Err(SessionError::Inconsistent("selection is not an option"));
            }
        }

        Ok(Self {
            questions,
            position,
            answers,
            pending_selection,
        })
    }
}

impl QuizSession {
    /// Start a session at the first question. An empty list yields a session
    /// that is already complete.
    #[must_use]
    pub fn new(questions: Vec<Question>) -> Self {
        Self {
            questions,
            position: 0,
            answers: Vec::new(),
            pending_selection: None,
        }
    }

    /// Start a session from validation results, refusing any malformed question.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::MalformedQuestion` for the first invalid entry.
    pub fn try_from_candidates<I>(candidates: I) -> Result<Self, SessionError>
    where
        I: IntoIterator<Item = Result<Question, MalformedQuestion>>,
    {
        let questions = candidates.into_iter().collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(questions))
    }

    /// Fresh session over `questions`, or over this session's questions when
    /// `None`. `self` is left untouched so a finished run can still be reviewed.
    #[must_use]
    pub fn restart(&self, questions: Option<Vec<Question>>) -> Self {
        Self::new(questions.unwrap_or_else(|| self.questions.clone()))
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        if self.position >= self.questions.len() {
            SessionState::Complete
        } else {
            SessionState::InProgress
        }
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.state() == SessionState::Complete
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn position(&self) -> usize {
        self.position
    }

    #[must_use]
    pub fn answers(&self) -> &[AnswerRecord] {
        &self.answers
    }

    #[must_use]
    pub fn pending_selection(&self) -> Option<usize> {
        self.pending_selection
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        self.questions.get(self.position)
    }

    /// Answer recorded for the current question, present between `confirm`
    /// and `advance`.
    #[must_use]
    pub fn current_answer(&self) -> Option<&AnswerRecord> {
        if self.is_complete() {
            return None;
        }
        self.answers.get(self.position)
    }

    #[must_use]
    pub fn is_confirmed(&self) -> bool {
        self.current_answer().is_some()
    }

    /// Mark `index` as the in-progress choice for the current question.
    ///
    /// # Errors
    ///
    /// `InvalidState` once complete, `AlreadyConfirmed` after `confirm`,
    /// `InvalidSelection` when `index` is not an option of the question.
    pub fn select(&mut self, index: usize) -> Result<(), SessionError> {
        let question = self.current_question().ok_or(SessionError::InvalidState)?;
        let option_count = question.option_count();
        if self.is_confirmed() {
            return Err(SessionError::AlreadyConfirmed);
        }
        if index >= option_count {
            return Err(SessionError::InvalidSelection {
                index,
                option_count,
            });
        }
        self.pending_selection = Some(index);
        Ok(())
    }

    /// Record the pending selection as the answer to the current question.
    ///
    /// The position and the selection are left as they are.
    ///
    /// # Errors
    ///
    /// `InvalidState` once complete, `AlreadyConfirmed` on a second call,
    /// `NoSelection` when nothing is selected.
    pub fn confirm(&mut self) -> Result<&AnswerRecord, SessionError> {
        let question = self.current_question().ok_or(SessionError::InvalidState)?;
        if self.is_confirmed() {
            return Err(SessionError::AlreadyConfirmed);
        }
        let chosen_index = self.pending_selection.ok_or(SessionError::NoSelection)?;

        let record = AnswerRecord {
            question_id: question.id(),
            chosen_index,
            correct: question.is_correct(chosen_index),
        };
        self.answers.push(record);
        self.answers.last().ok_or(SessionError::InvalidState)
    }

    /// Move past a confirmed question and clear the selection.
    ///
    /// # Errors
    ///
    /// `InvalidState` once complete, `NotConfirmed` before `confirm`.
    pub fn advance(&mut self) -> Result<SessionState, SessionError> {
        if self.is_complete() {
            return Err(SessionError::InvalidState);
        }
        if !self.is_confirmed() {
            return Err(SessionError::NotConfirmed);
        }
        self.position += 1;
        self.pending_selection = None;
        Ok(self.state())
    }

    /// Number of correct answers recorded so far.
    #[must_use]
    pub fn score(&self) -> usize {
        self.answers.iter().filter(|a| a.correct).count()
    }

    /// How far through the deck the player is, from `position` (0..=100).
    ///
    /// Half rounds up, so 1 of 8 reports 13.
    #[must_use]
    pub fn progress_percent(&self) -> u8 {
        let total = self.questions.len();
        if total == 0 {
            return 0;
        }
        let rounded = (200 * self.position + total) / (2 * total);
        u8::try_from(rounded.min(100)).unwrap_or(100)
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
