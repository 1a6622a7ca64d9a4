mod answer;
mod deck;
mod ids;
mod question;
mod ranking;
mod summary;
mod user;

pub use answer::AnswerRecord;
pub use deck::{Deck, MalformedQuestion};
pub use ids::{ParseIdError, QuestionId, UserId};
pub use question::{
    MIN_OPTIONS, OPTION_COUNT, Question, QuestionDraft, QuestionError, ValidatedQuestion,
    option_label,
};
pub use ranking::{DEFAULT_RANKING_SIZE, Medal, RankedEntry, RankingEntry, rank_top};
pub use summary::{QuizSummary, SummaryError};
pub use user::{FALLBACK_DISPLAY_NAME, Identity, display_name_for};
