mod login_vm;
mod question_editor_vm;
mod quiz_vm;
mod ranking_vm;
mod time_fmt;

pub use login_vm::{LOGIN_OK, LoginAction, LoginMessage, LoginVm, REGISTER_OK};
pub use question_editor_vm::{EditorMode, QuestionEditorVm, QuestionRowVm, map_question_rows};
pub use quiz_vm::{
    CORRECT_HEADLINE, EMPTY_MESSAGE, FeedbackVm, LoadTicket, OptionFeedback, OptionVm,
    QuizIntent, QuizScreen, QuizVm, ResultVm, WRONG_HEADLINE, result_text,
};
pub use ranking_vm::{RankingRowVm, RankingVm, map_ranking_rows};
pub use time_fmt::{format_datetime, format_duration};
