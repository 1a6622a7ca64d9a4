use std::fmt;

use thiserror::Error;

use crate::model::ids::QuestionId;
use crate::model::question::{Question, QuestionError};

/// A question record that failed validation at the source boundary.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("malformed question {}: {error}", DisplayId(.id))]
pub struct MalformedQuestion {
    pub id: Option<QuestionId>,
    #[source]
    pub error: QuestionError,
}

struct DisplayId<'a>(&'a Option<QuestionId>);

impl fmt::Display for DisplayId<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(id) => write!(f, "#{id}"),
            None => f.write_str("(no id)"),
        }
    }
}

/// Ordered questions for one play-through, plus whatever was dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Deck {
    questions: Vec<Question>,
    skipped: Vec<MalformedQuestion>,
}

impl Deck {
    /// Keep valid questions in their original order and collect the rest.
    pub fn from_candidates<I>(candidates: I) -> Self
    where
        I: IntoIterator<Item = Result<Question, MalformedQuestion>>,
    {
        let mut deck = Self::default();
        for candidate in candidates {
            match candidate {
                Ok(question) => deck.questions.push(question),
                Err(malformed) => deck.skipped.push(malformed),
            }
        }
        deck
    }

    /// Build a deck that refuses any malformed question.
    ///
    /// # Errors
    ///
    /// Returns the first `MalformedQuestion` encountered.
    pub fn strict<I>(candidates: I) -> Result<Self, MalformedQuestion>
    where
        I: IntoIterator<Item = Result<Question, MalformedQuestion>>,
    {
        let questions = candidates.into_iter().collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            questions,
            skipped: Vec::new(),
        })
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn skipped(&self) -> &[MalformedQuestion] {
        &self.skipped
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    #[must_use]
    pub fn into_parts(self) -> (Vec<Question>, Vec<MalformedQuestion>) {
        (self.questions, self.skipped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(id: u64) -> Question {
        Question::new(
            QuestionId::new(id),
            format!("Q{id}"),
            vec!["A".into(), "B".into()],
            0,
            "",
        )
        .unwrap()
    }

    fn malformed(id: u64) -> MalformedQuestion {
        MalformedQuestion {
            id: Some(QuestionId::new(id)),
            error: QuestionError::CorrectIndexOutOfRange { index: 7, count: 4 },
        }
    }

    #[test]
    fn skips_malformed_and_keeps_order() {
        let deck = Deck::from_candidates(vec![
            Ok(question(1)),
            Err(malformed(2)),
            Ok(question(3)),
        ]);

        let ids: Vec<_> = deck.questions().iter().map(Question::id).collect();
        assert_eq!(ids, vec![QuestionId::new(1), QuestionId::new(3)]);
        assert_eq!(deck.skipped(), &[malformed(2)]);
    }

    #[test]
    fn strict_refuses_malformed() {
        let err = Deck::strict(vec![Ok(question(1)), Err(malformed(2))]).unwrap_err();
        assert_eq!(err.id, Some(QuestionId::new(2)));
        assert_eq!(
            err.to_string(),
            "malformed question #2: correct index 7 is outside the 4 available options"
        );
    }
}
