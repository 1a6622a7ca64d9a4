use std::sync::Arc;

use api::QuestionSource;
use chrono::{DateTime, Utc};
use quiz_core::QuizSession;
use quiz_core::model::{Deck, MalformedQuestion, QuizSummary};
use rand::rng;
use rand::seq::SliceRandom;

use crate::Clock;
use crate::error::QuizError;

/// One play-through: the session plus what was dropped while building it.
#[derive(Debug, Clone, PartialEq)]
pub struct QuizRun {
    pub session: QuizSession,
    pub skipped: Vec<MalformedQuestion>,
    pub started_at: DateTime<Utc>,
}

/// Loads the deck and hands out sessions over it.
#[derive(Clone)]
pub struct QuizService {
    clock: Clock,
    questions: Arc<dyn QuestionSource>,
    shuffle: bool,
}

impl QuizService {
    #[must_use]
    pub fn new(clock: Clock, questions: Arc<dyn QuestionSource>) -> Self {
        Self {
            clock,
            questions,
            shuffle: false,
        }
    }

    #[must_use]
    pub fn with_shuffle(mut self, shuffle: bool) -> Self {
        self.shuffle = shuffle;
        self
    }

    /// Fetch every question and start a session over the valid ones.
    ///
    /// Malformed records are logged and reported in `QuizRun::skipped`.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::Fetch` when the question source fails.
    pub async fn start(&self) -> Result<QuizRun, QuizError> {
        let records = self.questions.fetch_all().await.map_err(|err| {
            tracing::warn!(error = %err, "question fetch failed");
            QuizError::from(err)
        })?;

        let deck = Deck::from_candidates(records.into_iter().map(|r| r.into_question()));
        for malformed in deck.skipped() {
            tracing::warn!(error = %malformed, "skipping malformed question");
        }
        let (mut questions, skipped) = deck.into_parts();
        if self.shuffle {
            questions.as_mut_slice().shuffle(&mut rng());
        }

        tracing::info!(
            questions = questions.len(),
            skipped = skipped.len(),
            "quiz started"
        );
        Ok(QuizRun {
            session: QuizSession::new(questions),
            skipped,
            started_at: self.clock.now(),
        })
    }

    /// New run over the same questions in the same order.
    #[must_use]
    pub fn restart(&self, run: &QuizRun) -> QuizRun {
        QuizRun {
            session: run.session.restart(None),
            skipped: run.skipped.clone(),
            started_at: self.clock.now(),
        }
    }

    /// Summarize a finished run.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::Summary` while the run still has questions left.
    pub fn summarize(&self, run: &QuizRun) -> Result<QuizSummary, QuizError> {
        let summary = QuizSummary::from_session(
            &run.session,
            run.started_at,
            self.clock.now(),
            run.skipped.len(),
        )?;
        tracing::info!(
            correct = summary.correct(),
            total = summary.total_questions(),
            "quiz finished"
        );
        Ok(summary)
    }
}
