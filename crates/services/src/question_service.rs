use std::iter;
use std::sync::Arc;

use api::{QuestionRecord, QuestionRepository, QuestionSource};
use quiz_core::model::{Question, QuestionDraft, QuestionError, QuestionId};

use crate::error::QuestionServiceError;

/// One question of the bank as the admin sees it. Records that fail
/// validation are kept so they can be repaired.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuestionEntry {
    Valid(Question),
    Malformed {
        record: QuestionRecord,
        problem: QuestionError,
    },
}

impl QuestionEntry {
    #[must_use]
    pub fn from_record(record: QuestionRecord) -> Self {
        match record.clone().into_question() {
            Ok(question) => Self::Valid(question),
            Err(malformed) => Self::Malformed {
                record,
                problem: malformed.error,
            },
        }
    }

    #[must_use]
    pub fn id(&self) -> Option<QuestionId> {
        match self {
            Self::Valid(question) => Some(question.id()),
            Self::Malformed { record, .. } => record.id,
        }
    }

    #[must_use]
    pub fn text(&self) -> &str {
        match self {
            Self::Valid(question) => question.text(),
            Self::Malformed { record, .. } => &record.text,
        }
    }

    #[must_use]
    pub fn options(&self) -> &[String] {
        match self {
            Self::Valid(question) => question.options(),
            Self::Malformed { record, .. } => &record.options,
        }
    }

    /// Raw index as stored; may be out of range for malformed records.
    #[must_use]
    pub fn correct_index(&self) -> i64 {
        match self {
            Self::Valid(question) => i64::try_from(question.correct_index()).unwrap_or(i64::MAX),
            Self::Malformed { record, .. } => record.correct_index,
        }
    }

    #[must_use]
    pub fn explanation(&self) -> &str {
        match self {
            Self::Valid(question) => question.explanation(),
            Self::Malformed { record, .. } => &record.explanation,
        }
    }

    #[must_use]
    pub fn problem(&self) -> Option<&QuestionError> {
        match self {
            Self::Valid(_) => None,
            Self::Malformed { problem, .. } => Some(problem),
        }
    }

    #[must_use]
    pub fn question(&self) -> Option<&Question> {
        match self {
            Self::Valid(question) => Some(question),
            Self::Malformed { .. } => None,
        }
    }

    /// Same rules as `Question::matches`; `needle` is lowercase already.
    #[must_use]
    pub fn matches(&self, needle: &str) -> bool {
        match self {
            Self::Valid(question) => question.matches(needle),
            Self::Malformed { .. } => {
                needle.is_empty()
                    || iter::once(self.text())
                        .chain(iter::once(self.explanation()))
                        .chain(self.options().iter().map(String::as_str))
                        .any(|field| field.to_lowercase().contains(needle))
            }
        }
    }

    /// Prefill the edit form, padding to four options.
    #[must_use]
    pub fn to_draft(&self) -> QuestionDraft {
        match self {
            Self::Valid(question) => QuestionDraft::from_question(question),
            Self::Malformed { record, .. } => QuestionDraft::from_raw(
                &record.text,
                &record.options,
                record.correct_index,
                &record.explanation,
            ),
        }
    }
}

impl From<Question> for QuestionEntry {
    fn from(question: Question) -> Self {
        Self::Valid(question)
    }
}

/// Entries whose text, explanation or options contain `query`, ignoring case.
/// A blank query keeps everything.
#[must_use]
pub fn filter_questions(entries: &[QuestionEntry], query: &str) -> Vec<QuestionEntry> {
    let needle = query.trim().to_lowercase();
    entries
        .iter()
        .filter(|e| e.matches(&needle))
        .cloned()
        .collect()
}

/// Admin CRUD over the question bank.
#[derive(Clone)]
pub struct QuestionService {
    source: Arc<dyn QuestionSource>,
    store: Arc<dyn QuestionRepository>,
}

impl QuestionService {
    #[must_use]
    pub fn new(source: Arc<dyn QuestionSource>, store: Arc<dyn QuestionRepository>) -> Self {
        Self { source, store }
    }

    /// Every record in source order, malformed ones included.
    ///
    /// # Errors
    ///
    /// Returns `QuestionServiceError::Api` when the source fails.
    pub async fn list(&self) -> Result<Vec<QuestionEntry>, QuestionServiceError> {
        let records = self.source.fetch_all().await?;
        let entries: Vec<QuestionEntry> =
            records.into_iter().map(QuestionEntry::from_record).collect();
        for entry in &entries {
            if let Some(problem) = entry.problem() {
                tracing::warn!(id = ?entry.id(), %problem, "malformed question in bank");
            }
        }
        Ok(entries)
    }

    /// # Errors
    ///
    /// Returns `QuestionServiceError::Api` when the source fails.
    pub async fn search(&self, query: &str) -> Result<Vec<QuestionEntry>, QuestionServiceError> {
        let entries = self.list().await?;
        Ok(filter_questions(&entries, query))
    }

    /// Validate and store a new question.
    ///
    /// # Errors
    ///
    /// Returns `QuestionServiceError::Invalid` before any remote call if the
    /// draft is incomplete, `QuestionServiceError::Api` if the store rejects it.
    pub async fn create(&self, draft: QuestionDraft) -> Result<Question, QuestionServiceError> {
        let validated = draft.validate()?;
        let question = self.store.create(&validated).await?;
        tracing::info!(id = %question.id(), "question created");
        Ok(question)
    }

    /// # Errors
    ///
    /// Same as `create`.
    pub async fn update(
        &self,
        id: QuestionId,
        draft: QuestionDraft,
    ) -> Result<Question, QuestionServiceError> {
        let validated = draft.validate()?;
        let question = self.store.update(id, &validated).await?;
        tracing::info!(%id, "question updated");
        Ok(question)
    }

    /// # Errors
    ///
    /// Returns `QuestionServiceError::Api` if the store rejects the delete.
    pub async fn delete(&self, id: QuestionId) -> Result<(), QuestionServiceError> {
        self.store.delete(id).await?;
        tracing::info!(%id, "question deleted");
        Ok(())
    }
}
