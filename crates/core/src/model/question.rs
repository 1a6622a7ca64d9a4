use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ids::QuestionId;

/// Number of options the admin form always produces.
pub const OPTION_COUNT: usize = 4;

/// Fewest options a playable question may carry.
pub const MIN_OPTIONS: usize = 2;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question has no id")]
    MissingId,

    #[error("question text cannot be empty")]
    EmptyText,

    #[error("a question needs between 2 and 4 options, got {count}")]
    OptionCount { count: usize },

    #[error("option at index {index} cannot be empty")]
    EmptyOption { index: usize },

    #[error("correct index {index} is outside the {count} available options")]
    CorrectIndexOutOfRange { index: i64, count: usize },
}

/// Letter shown next to an option: `A` for index 0, `B` for 1 and so on.
#[must_use]
pub fn option_label(index: usize) -> char {
    u8::try_from(index)
        .ok()
        .and_then(|i| b'A'.checked_add(i))
        .map_or('?', char::from)
}

fn check_text(text: &str) -> Result<(), QuestionError> {
    if text.trim().is_empty() {
        return Err(QuestionError::EmptyText);
    }
    Ok(())
}

fn check_options(options: &[String]) -> Result<(), QuestionError> {
    if !(MIN_OPTIONS..=OPTION_COUNT).contains(&options.len()) {
        return Err(QuestionError::OptionCount {
            count: options.len(),
        });
    }
    if let Some(index) = options.iter().position(|o| o.trim().is_empty()) {
        return Err(QuestionError::EmptyOption { index });
    }
    Ok(())
}

fn check_correct_index(index: i64, count: usize) -> Result<usize, QuestionError> {
    usize::try_from(index)
        .ok()
        .filter(|i| *i < count)
        .ok_or(QuestionError::CorrectIndexOutOfRange { index, count })
}

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

/// A playable multiple-choice question.
///
/// Construction validates every invariant, so a `Question` always has a
/// non-empty prompt, 2..=4 non-empty options and a `correct_index` that
/// points at one of them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "QuestionParts")]
pub struct Question {
    id: QuestionId,
    text: String,
    options: Vec<String>,
    correct_index: usize,
    explanation: String,
}

#[derive(Deserialize)]
struct QuestionParts {
    id: QuestionId,
    text: String,
    options: Vec<String>,
    correct_index: i64,
    #[serde(default)]
    explanation: String,
}

impl TryFrom<QuestionParts> for Question {
    type Error = QuestionError;

    fn try_from(parts: QuestionParts) -> Result<Self, Self::Error> {
        Self::new(
            parts.id,
            parts.text,
            parts.options,
            parts.correct_index,
            parts.explanation,
        )
    }
}

impl Question {
    /// Validate raw parts into a question.
    ///
    /// # Errors
    ///
    /// Returns the first `QuestionError` found, checking text, then options,
    /// then the correct index.
    pub fn new(
        id: QuestionId,
        text: impl Into<String>,
        options: Vec<String>,
        correct_index: i64,
        explanation: impl Into<String>,
    ) -> Result<Self, QuestionError> {
        let text = text.into();
        check_text(&text)?;
        check_options(&options)?;
        let correct_index = check_correct_index(correct_index, options.len())?;

        Ok(Self {
            id,
            text,
            options,
            correct_index,
            explanation: explanation.into(),
        })
    }

    #[must_use]
    pub fn id(&self) -> QuestionId {
        self.id
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn options(&self) -> &[String] {
        &self.options
    }

    #[must_use]
    pub fn option_count(&self) -> usize {
        self.options.len()
    }

    #[must_use]
    pub fn correct_index(&self) -> usize {
        self.correct_index
    }

    #[must_use]
    pub fn explanation(&self) -> &str {
        &self.explanation
    }

    #[must_use]
    pub fn is_correct(&self, index: usize) -> bool {
        index == self.correct_index
    }

    /// Case-insensitive match against the prompt, explanation or any option.
    ///
    /// `needle` is expected to be lowercase already; an empty needle matches.
    #[must_use]
    pub fn matches(&self, needle: &str) -> bool {
        if needle.is_empty() {
            return true;
        }
        self.text.to_lowercase().contains(needle)
            || self.explanation.to_lowercase().contains(needle)
            || self
                .options
                .iter()
                .any(|o| o.to_lowercase().contains(needle))
    }
}

fn pad_options(options: &[String]) -> [String; OPTION_COUNT] {
    let mut slots: [String; OPTION_COUNT] = Default::default();
    for (slot, option) in slots.iter_mut().zip(options) {
        slot.clone_from(option);
    }
    slots
}

//
// ─── DRAFTS ────────────────────────────────────────────────────────────────────
//

/// Editable question as filled in by an administrator.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct QuestionDraft {
    pub text: String,
    pub options: [String; OPTION_COUNT],
    pub correct_index: usize,
    pub explanation: String,
}

impl QuestionDraft {
    /// Prefill a draft from an existing question; short option lists are
    /// padded with empty strings.
    #[must_use]
    pub fn from_question(question: &Question) -> Self {
        Self {
            text: question.text().to_owned(),
            options: pad_options(question.options()),
            correct_index: question.correct_index(),
            explanation: question.explanation().to_owned(),
        }
    }

    /// Prefill a draft from unvalidated parts so a broken record can be
    /// repaired. Options past the fourth are dropped and the index is
    /// clamped into range.
    #[must_use]
    pub fn from_raw(
        text: &str,
        options: &[String],
        correct_index: i64,
        explanation: &str,
    ) -> Self {
        let mut draft = Self {
            text: text.to_owned(),
            options: pad_options(options),
            correct_index: 0,
            explanation: explanation.to_owned(),
        };
        draft.set_correct_index(correct_index);
        draft
    }

    /// Set the correct index, clamping into `0..OPTION_COUNT`.
    pub fn set_correct_index(&mut self, index: i64) {
        let max = i64::try_from(OPTION_COUNT - 1).unwrap_or(i64::MAX);
        let clamped = index.clamp(0, max);
        self.correct_index = usize::try_from(clamped).unwrap_or(0);
    }

    /// # Errors
    ///
    /// Returns `QuestionError` when the text or any of the four options is
    /// blank, or the correct index is out of range.
    pub fn validate(self) -> Result<ValidatedQuestion, QuestionError> {
        check_text(&self.text)?;
        check_options(&self.options)?;
        let index = i64::try_from(self.correct_index).unwrap_or(i64::MAX);
        let correct_index = check_correct_index(index, OPTION_COUNT)?;

        Ok(ValidatedQuestion {
            text: self.text,
            options: self.options,
            correct_index,
            explanation: self.explanation,
        })
    }
}

/// A draft that passed validation and only lacks an id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedQuestion {
    text: String,
    options: [String; OPTION_COUNT],
    correct_index: usize,
    explanation: String,
}

impl ValidatedQuestion {
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn options(&self) -> &[String; OPTION_COUNT] {
        &self.options
    }

    #[must_use]
    pub fn correct_index(&self) -> usize {
        self.correct_index
    }

    #[must_use]
    pub fn explanation(&self) -> &str {
        &self.explanation
    }

    #[must_use]
    pub fn assign_id(self, id: QuestionId) -> Question {
        Question {
            id,
            text: self.text,
            options: self.options.into(),
            correct_index: self.correct_index,
            explanation: self.explanation,
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    fn opts(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| (*s).to_string()).collect()
    }

    fn filled_draft() -> QuestionDraft {
        QuestionDraft {
            text: "Which planet is largest?".into(),
            options: [
                "Mars".into(),
                "Jupiter".into(),
                "Venus".into(),
                "Earth".into(),
            ],
            correct_index: 1,
            explanation: "Jupiter is a gas giant.".into(),
        }
    }

    #[test]
    fn accepts_two_option_question() {
        let q = Question::new(QuestionId::new(2), "Q", opts(&["A", "B"]), 0, "").unwrap();
        assert_eq!(q.option_count(), 2);
        assert!(q.is_correct(0));
    }

    #[test]
    fn rejects_correct_index_past_options() {
        let err = Question::new(QuestionId::new(1), "Q", opts(&["A", "B"]), 2, "").unwrap_err();
        assert_eq!(err, QuestionError::CorrectIndexOutOfRange { index: 2, count: 2 });
    }

    #[test]
    fn rejects_negative_correct_index() {
        let err =
            Question::new(QuestionId::new(1), "Q", opts(&["A", "B", "C"]), -1, "").unwrap_err();
        assert!(matches!(err, QuestionError::CorrectIndexOutOfRange { .. }));
    }

    #[test]
    fn rejects_single_option_and_blank_option() {
        let err = Question::new(QuestionId::new(1), "Q", opts(&["A"]), 0, "").unwrap_err();
        assert_eq!(err, QuestionError::OptionCount { count: 1 });

        let err = Question::new(QuestionId::new(1), "Q", opts(&["A", " "]), 0, "").unwrap_err();
        assert_eq!(err, QuestionError::EmptyOption { index: 1 });
        assert_eq!(err.to_string(), "option at index 1 cannot be empty");
    }

    #[test]
    fn rejects_blank_text() {
        let err = Question::new(QuestionId::new(1), "  ", opts(&["A", "B"]), 0, "").unwrap_err();
        assert_eq!(err, QuestionError::EmptyText);
    }

    #[test]
    fn deserializing_revalidates() {
        let json = r#"{"id":1,"text":"Q","options":["A","B"],"correct_index":5}"#;
        assert!(serde_json::from_str::<Question>(json).is_err());

        let json = r#"{"id":1,"text":"Q","options":["A","B"],"correct_index":1}"#;
        let q: Question = serde_json::from_str(json).unwrap();
        assert_eq!(q.correct_index(), 1);
        assert_eq!(q.explanation(), "");
    }

    #[test]
    fn matches_text_options_and_explanation() {
        let q = filled_draft().validate().unwrap().assign_id(QuestionId::new(9));
        assert!(q.matches("planet"));
        assert!(q.matches("jupiter"));
        assert!(q.matches("gas giant"));
        assert!(q.matches(""));
        assert!(!q.matches("saturn"));
    }

    #[test]
    fn draft_validates_and_assigns_id() {
        let q = filled_draft().validate().unwrap().assign_id(QuestionId::new(3));
        assert_eq!(q.id(), QuestionId::new(3));
        assert_eq!(q.options().len(), OPTION_COUNT);
        assert_eq!(q.correct_index(), 1);
    }

    #[test]
    fn draft_requires_all_four_options() {
        let mut draft = filled_draft();
        draft.options[3] = String::new();
        let err = draft.validate().unwrap_err();
        assert_eq!(err, QuestionError::EmptyOption { index: 3 });
    }

    #[test]
    fn draft_clamps_correct_index() {
        let mut draft = QuestionDraft::default();
        draft.set_correct_index(9);
        assert_eq!(draft.correct_index, 3);
        draft.set_correct_index(-4);
        assert_eq!(draft.correct_index, 0);
    }

    #[test]
    fn draft_from_short_question_pads_options() {
        let q = Question::new(QuestionId::new(1), "Q", opts(&["A", "B"]), 1, "why").unwrap();
        let draft = QuestionDraft::from_question(&q);
        assert_eq!(draft.options, ["A".to_string(), "B".into(), String::new(), String::new()]);
        assert_eq!(draft.correct_index, 1);
        assert_eq!(draft.explanation, "why");
    }

    #[test]
    fn draft_from_raw_parts_pads_truncates_and_clamps() {
        let draft = QuestionDraft::from_raw("Q", &opts(&["A"]), 7, "");
        assert_eq!(draft.options, ["A".to_string(), String::new(), String::new(), String::new()]);
        assert_eq!(draft.correct_index, 3);

        let draft = QuestionDraft::from_raw("Q", &opts(&["A", "B", "C", "D", "E"]), -2, "x");
        assert_eq!(draft.options[3], "D");
        assert_eq!(draft.correct_index, 0);
        assert_eq!(draft.explanation, "x");
    }

    #[test]
    fn labels_are_letters() {
        assert_eq!(option_label(0), 'A');
        assert_eq!(option_label(3), 'D');
    }
}
