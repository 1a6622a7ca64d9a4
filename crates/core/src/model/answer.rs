use serde::{Deserialize, Serialize};

use crate::model::ids::QuestionId;

/// One confirmed answer. Never mutated once recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerRecord {
    pub question_id: QuestionId,
    pub chosen_index: usize,
    pub correct: bool,
}
