use quiz_core::model::{QuizSummary, option_label};
use quiz_core::{SessionError, SessionState};
use services::{QuizError, QuizRun, QuizService};

use crate::state::ViewError;
use crate::vm::time_fmt::{format_datetime, format_duration};

pub const EMPTY_MESSAGE: &str = "No questions registered yet.";
pub const CORRECT_HEADLINE: &str = "Congratulations, you got it right!";
pub const WRONG_HEADLINE: &str = "You got it wrong!";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum QuizScreen {
    Loading,
    Failed(String),
    Empty,
    Playing,
    Finished,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QuizIntent {
    Select(usize),
    Confirm,
    Next,
    Restart,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OptionFeedback {
    Correct,
    Wrong,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OptionVm {
    pub index: usize,
    pub label: char,
    pub text: String,
    pub selected: bool,
    pub feedback: Option<OptionFeedback>,
    pub disabled: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FeedbackVm {
    pub correct: bool,
    pub headline: &'static str,
    pub explanation: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResultVm {
    pub headline: String,
    pub score: usize,
    pub total: usize,
    pub duration: String,
    pub completed_at: String,
    pub skipped: usize,
}

impl ResultVm {
    fn from_summary(summary: &QuizSummary) -> Self {
        Self {
            headline: result_text(summary.correct(), summary.total_questions()),
            score: summary.correct(),
            total: summary.total_questions(),
            duration: format_duration(summary.duration()),
            completed_at: format_datetime(summary.completed_at()),
            skipped: summary.skipped(),
        }
    }

    /// Score-only result for a finished run whose timing is unusable.
    fn from_run(run: &QuizRun) -> Self {
        let score = run.session.score();
        let total = run.session.total();
        Self {
            headline: result_text(score, total),
            score,
            total,
            duration: UNKNOWN_TIME.to_string(),
            completed_at: UNKNOWN_TIME.to_string(),
            skipped: run.skipped.len(),
        }
    }
}

const UNKNOWN_TIME: &str = "unknown";

#[must_use]
pub fn result_text(score: usize, total: usize) -> String {
    format!("You got {score} of {total} right")
}

/// Identifies one load; results carrying an older ticket are dropped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LoadTicket(u64);

/// Screen model for playing a quiz.
pub struct QuizVm {
    screen: QuizScreen,
    run: Option<QuizRun>,
    result: Option<ResultVm>,
    latest_ticket: u64,
}

impl Default for QuizVm {
    fn default() -> Self {
        Self::new()
    }
}

impl QuizVm {
    #[must_use]
    pub fn new() -> Self {
        Self {
            screen: QuizScreen::Loading,
            run: None,
            result: None,
            latest_ticket: 0,
        }
    }

    #[must_use]
    pub fn screen(&self) -> &QuizScreen {
        &self.screen
    }

    /// Drop the current run and wait for a new deck.
    pub fn begin_load(&mut self) -> LoadTicket {
        self.latest_ticket += 1;
        self.screen = QuizScreen::Loading;
        self.run = None;
        self.result = None;
        LoadTicket(self.latest_ticket)
    }

    /// Apply a load result. Returns `false` if `ticket` is stale.
    pub fn finish_load(&mut self, ticket: LoadTicket, result: Result<QuizRun, QuizError>) -> bool {
        if ticket.0 != self.latest_ticket {
            tracing::debug!(ticket = ticket.0, latest = self.latest_ticket, "discarding stale quiz load");
            return false;
        }
        match result {
            Ok(run) => self.install(run),
            Err(err) => {
                self.screen = QuizScreen::Failed(ViewError::from_error(&err).message().to_string());
            }
        }
        true
    }

    /// Fetch a fresh deck and start over.
    pub async fn reload(&mut self, quiz: &QuizService) {
        let ticket = self.begin_load();
        let result = quiz.start().await;
        self.finish_load(ticket, result);
    }

    fn install(&mut self, run: QuizRun) {
        self.screen = if run.session.total() == 0 {
            QuizScreen::Empty
        } else {
            QuizScreen::Playing
        };
        self.result = None;
        self.run = Some(run);
    }

    /// Handle a synchronous intent.
    ///
    /// # Errors
    ///
    /// Returns `ViewError` if the session refuses the intent (e.g. confirming
    /// without a selection) or no run is loaded.
    pub fn apply(&mut self, intent: QuizIntent, quiz: &QuizService) -> Result<(), ViewError> {
        let Some(run) = self.run.as_mut() else {
            return Err(ViewError::Unknown);
        };
        match intent {
            QuizIntent::Select(index) => run.session.select(index).map_err(view_error)?,
            QuizIntent::Confirm => {
                run.session.confirm().map_err(view_error)?;
            }
            QuizIntent::Next => {
                if run.session.advance().map_err(view_error)? == SessionState::Complete {
                    let result = match quiz.summarize(run) {
                        Ok(summary) => ResultVm::from_summary(&summary),
                        Err(err) => {
                            tracing::warn!(error = %err, "quiz summary unavailable");
                            ResultVm::from_run(run)
                        }
                    };
                    self.result = Some(result);
                    self.screen = QuizScreen::Finished;
                }
            }
            QuizIntent::Restart => {
                let fresh = quiz.restart(run);
                self.install(fresh);
            }
        }
        Ok(())
    }

    fn playing_run(&self) -> Option<&QuizRun> {
        match self.screen {
            QuizScreen::Playing => self.run.as_ref(),
            _ => None,
        }
    }

    /// `"Question k / n"` while playing.
    #[must_use]
    pub fn header(&self) -> Option<String> {
        let session = &self.playing_run()?.session;
        Some(format!(
            "Question {} / {}",
            session.position() + 1,
            session.total()
        ))
    }

    #[must_use]
    pub fn progress_percent(&self) -> u8 {
        self.run
            .as_ref()
            .map_or(0, |run| run.session.progress_percent())
    }

    #[must_use]
    pub fn progress_label(&self) -> Option<String> {
        self.playing_run()
            .map(|run| format!("{}% complete", run.session.progress_percent()))
    }

    #[must_use]
    pub fn prompt(&self) -> Option<&str> {
        self.playing_run()?
            .session
            .current_question()
            .map(|q| q.text())
    }

    #[must_use]
    pub fn options(&self) -> Vec<OptionVm> {
        let Some(run) = self.playing_run() else {
            return Vec::new();
        };
        let session = &run.session;
        let Some(question) = session.current_question() else {
            return Vec::new();
        };
        let confirmed = session.is_confirmed();
        let selection = session.pending_selection();

        question
            .options()
            .iter()
            .enumerate()
            .map(|(index, text)| {
                let selected = selection == Some(index);
                let feedback = if !confirmed {
                    None
                } else if question.is_correct(index) {
                    Some(OptionFeedback::Correct)
                } else if selected {
                    Some(OptionFeedback::Wrong)
                } else {
                    None
                };
                OptionVm {
                    index,
                    label: option_label(index),
                    text: text.clone(),
                    selected,
                    feedback,
                    disabled: confirmed,
                }
            })
            .collect()
    }

    #[must_use]
    pub fn can_confirm(&self) -> bool {
        self.playing_run().is_some_and(|run| {
            !run.session.is_confirmed() && run.session.pending_selection().is_some()
        })
    }

    #[must_use]
    pub fn can_advance(&self) -> bool {
        self.playing_run()
            .is_some_and(|run| run.session.is_confirmed())
    }

    /// Shown once the current answer is confirmed.
    #[must_use]
    pub fn feedback(&self) -> Option<FeedbackVm> {
        let session = &self.playing_run()?.session;
        let answer = session.current_answer()?;
        let question = session.current_question()?;
        Some(FeedbackVm {
            correct: answer.correct,
            headline: if answer.correct {
                CORRECT_HEADLINE
            } else {
                WRONG_HEADLINE
            },
            explanation: question.explanation().to_string(),
        })
    }

    #[must_use]
    pub fn result(&self) -> Option<&ResultVm> {
        self.result.as_ref()
    }

    /// Notice about malformed questions left out of the deck.
    #[must_use]
    pub fn skipped_notice(&self) -> Option<String> {
        let skipped = self.run.as_ref()?.skipped.len();
        match skipped {
            0 => None,
            1 => Some("1 malformed question was skipped".to_string()),
            n => Some(format!("{n} malformed questions were skipped")),
        }
    }
}

fn view_error(err: SessionError) -> ViewError {
    ViewError::from_error(&err)
}
