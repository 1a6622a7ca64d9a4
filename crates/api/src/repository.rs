use async_trait::async_trait;
use quiz_core::model::{
    Identity, MalformedQuestion, Question, QuestionError, QuestionId, RankingEntry, UserId,
    ValidatedQuestion,
};
use std::sync::{Arc, Mutex, MutexGuard};
use thiserror::Error;

/// Name used for ranking rows whose account has no email.
pub const ANONYMOUS_USER: &str = "User";

/// Errors surfaced by collaborator adapters.
///
/// Callers only tell success from failure and forward the message.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ApiError {
    #[error("not found")]
    NotFound,

    #[error("{message}")]
    Rejected { status: u16, message: String },

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Transport shape of a question.
///
/// Mirrors what the remote service sends, with missing values already
/// defaulted; nothing here is validated until `into_question`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuestionRecord {
    pub id: Option<QuestionId>,
    pub text: String,
    pub options: Vec<String>,
    pub correct_index: i64,
    pub explanation: String,
}

impl QuestionRecord {
    #[must_use]
    pub fn from_question(question: &Question) -> Self {
        Self {
            id: Some(question.id()),
            text: question.text().to_owned(),
            options: question.options().to_vec(),
            correct_index: i64::try_from(question.correct_index()).unwrap_or(i64::MAX),
            explanation: question.explanation().to_owned(),
        }
    }

    #[must_use]
    pub fn from_validated(id: Option<QuestionId>, question: &ValidatedQuestion) -> Self {
        Self {
            id,
            text: question.text().to_owned(),
            options: question.options().to_vec(),
            correct_index: i64::try_from(question.correct_index()).unwrap_or(i64::MAX),
            explanation: question.explanation().to_owned(),
        }
    }

    /// Validate the record into a playable question.
    ///
    /// # Errors
    ///
    /// Returns `MalformedQuestion` carrying the record id (if any) and the
    /// first failed check.
    pub fn into_question(self) -> Result<Question, MalformedQuestion> {
        let Some(id) = self.id else {
            return Err(MalformedQuestion {
                id: None,
                error: QuestionError::MissingId,
            });
        };
        Question::new(
            id,
            self.text,
            self.options,
            self.correct_index,
            self.explanation,
        )
        .map_err(|error| MalformedQuestion {
            id: Some(id),
            error,
        })
    }
}

/// Supplies the full question deck for a new session.
#[async_trait]
pub trait QuestionSource: Send + Sync {
    /// # Errors
    ///
    /// Returns `ApiError` when the deck cannot be fetched.
    async fn fetch_all(&self) -> Result<Vec<QuestionRecord>, ApiError>;
}

/// Administrative question CRUD.
#[async_trait]
pub trait QuestionRepository: Send + Sync {
    /// # Errors
    ///
    /// Returns `ApiError` if the question is rejected or cannot be stored.
    async fn create(&self, question: &ValidatedQuestion) -> Result<Question, ApiError>;

    /// # Errors
    ///
    /// Returns `ApiError::NotFound` for unknown ids, or other adapter errors.
    async fn update(
        &self,
        id: QuestionId,
        question: &ValidatedQuestion,
    ) -> Result<Question, ApiError>;

    /// # Errors
    ///
    /// Returns `ApiError::NotFound` for unknown ids, or other adapter errors.
    async fn delete(&self, id: QuestionId) -> Result<(), ApiError>;
}

#[async_trait]
pub trait AuthGateway: Send + Sync {
    /// Exchange credentials for an identity.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Rejected` for bad credentials, or other adapter errors.
    async fn login(&self, email: &str, password: &str) -> Result<Identity, ApiError>;

    /// Create an account.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Rejected` when the account cannot be created.
    async fn register(&self, email: &str, password: &str) -> Result<Identity, ApiError>;
}

#[async_trait]
pub trait RankingSource: Send + Sync {
    /// Highest scores first, at most `limit` entries.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` when scores cannot be fetched.
    async fn top_scores(&self, limit: usize) -> Result<Vec<RankingEntry>, ApiError>;
}

//
// ─── IN-MEMORY ADAPTER ─────────────────────────────────────────────────────────
//

#[derive(Debug, Clone)]
struct StoredUser {
    id: UserId,
    email: String,
    password: String,
    score: u32,
}

#[derive(Debug, Default)]
struct MemoryState {
    questions: Vec<QuestionRecord>,
    users: Vec<StoredUser>,
    next_question_id: u64,
    next_user_id: u64,
    offline: bool,
}

/// In-memory adapter for tests and offline play.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    state: Arc<Mutex<MemoryState>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed with raw records, malformed ones included.
    #[must_use]
    pub fn with_records(records: Vec<QuestionRecord>) -> Self {
        let repo = Self::new();
        if let Ok(mut state) = repo.state.lock() {
            state.next_question_id = records
                .iter()
                .filter_map(|r| r.id.map(|id| id.value()))
                .max()
                .unwrap_or(0);
            state.questions = records;
        }
        repo
    }

    /// Seed with valid questions.
    #[must_use]
    pub fn with_questions(questions: &[Question]) -> Self {
        Self::with_records(questions.iter().map(QuestionRecord::from_question).collect())
    }

    /// Make every call fail with a connection error, or recover.
    pub fn set_offline(&self, offline: bool) {
        if let Ok(mut state) = self.state.lock() {
            state.offline = offline;
        }
    }

    /// Set the score of a registered user.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotFound` if no user has this email.
    pub fn set_score(&self, email: &str, score: u32) -> Result<(), ApiError> {
        let mut state = self.lock_online()?;
        let user = state
            .users
            .iter_mut()
            .find(|u| u.email == email)
            .ok_or(ApiError::NotFound)?;
        user.score = score;
        Ok(())
    }

    fn lock(&self) -> Result<MutexGuard<'_, MemoryState>, ApiError> {
        self.state
            .lock()
            .map_err(|e| ApiError::Connection(e.to_string()))
    }

    fn lock_online(&self) -> Result<MutexGuard<'_, MemoryState>, ApiError> {
        let state = self.lock()?;
        if state.offline {
            return Err(ApiError::Connection("service unavailable".into()));
        }
        Ok(state)
    }
}

#[async_trait]
impl QuestionSource for InMemoryRepository {
    async fn fetch_all(&self) -> Result<Vec<QuestionRecord>, ApiError> {
        Ok(self.lock_online()?.questions.clone())
    }
}

#[async_trait]
impl QuestionRepository for InMemoryRepository {
    async fn create(&self, question: &ValidatedQuestion) -> Result<Question, ApiError> {
        let mut state = self.lock_online()?;
        state.next_question_id += 1;
        let id = QuestionId::new(state.next_question_id);
        state
            .questions
            .push(QuestionRecord::from_validated(Some(id), question));
        Ok(question.clone().assign_id(id))
    }

    async fn update(
        &self,
        id: QuestionId,
        question: &ValidatedQuestion,
    ) -> Result<Question, ApiError> {
        let mut state = self.lock_online()?;
        let slot = state
            .questions
            .iter_mut()
            .find(|r| r.id == Some(id))
            .ok_or(ApiError::NotFound)?;
        *slot = QuestionRecord::from_validated(Some(id), question);
        Ok(question.clone().assign_id(id))
    }

    async fn delete(&self, id: QuestionId) -> Result<(), ApiError> {
        let mut state = self.lock_online()?;
        let before = state.questions.len();
        state.questions.retain(|r| r.id != Some(id));
        if state.questions.len() == before {
            return Err(ApiError::NotFound);
        }
        Ok(())
    }
}

#[async_trait]
impl AuthGateway for InMemoryRepository {
    async fn login(&self, email: &str, password: &str) -> Result<Identity, ApiError> {
        let state = self.lock_online()?;
        state
            .users
            .iter()
            .find(|u| u.email == email && u.password == password)
            .map(|u| Identity::new(u.id, u.email.clone()))
            .ok_or_else(|| ApiError::Rejected {
                status: 401,
                message: "invalid email or password".into(),
            })
    }

    async fn register(&self, email: &str, password: &str) -> Result<Identity, ApiError> {
        let mut state = self.lock_online()?;
        if state.users.iter().any(|u| u.email == email) {
            return Err(ApiError::Rejected {
                status: 409,
                message: "email already registered".into(),
            });
        }
        state.next_user_id += 1;
        let id = UserId::new(state.next_user_id);
        state.users.push(StoredUser {
            id,
            email: email.to_owned(),
            password: password.to_owned(),
            score: 0,
        });
        Ok(Identity::new(id, email))
    }
}

#[async_trait]
impl RankingSource for InMemoryRepository {
    async fn top_scores(&self, limit: usize) -> Result<Vec<RankingEntry>, ApiError> {
        let state = self.lock_online()?;
        let mut entries: Vec<RankingEntry> = state
            .users
            .iter()
            .map(|u| RankingEntry::new(u.email.clone(), u.score))
            .collect();
        entries.sort_by(|a, b| b.score.cmp(&a.score));
        entries.truncate(limit);
        Ok(entries)
    }
}

/// Collaborators behind trait objects so adapters can be swapped.
#[derive(Clone)]
pub struct Api {
    pub questions: Arc<dyn QuestionSource>,
    pub question_store: Arc<dyn QuestionRepository>,
    pub auth: Arc<dyn AuthGateway>,
    pub ranking: Arc<dyn RankingSource>,
}

impl Api {
    #[must_use]
    pub fn in_memory() -> Self {
        Self::from_memory(InMemoryRepository::new())
    }

    #[must_use]
    pub fn from_memory(repo: InMemoryRepository) -> Self {
        Self {
            questions: Arc::new(repo.clone()),
            question_store: Arc::new(repo.clone()),
            auth: Arc::new(repo.clone()),
            ranking: Arc::new(repo),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::QuestionDraft;

    fn draft(text: &str) -> ValidatedQuestion {
        QuestionDraft {
            text: text.into(),
            options: ["a".into(), "b".into(), "c".into(), "d".into()],
            correct_index: 2,
            explanation: String::new(),
        }
        .validate()
        .unwrap()
    }

    #[test]
    fn record_without_id_is_malformed() {
        let record = QuestionRecord {
            text: "Q".into(),
            options: vec!["A".into(), "B".into()],
            ..QuestionRecord::default()
        };
        let err = record.into_question().unwrap_err();
        assert_eq!(err.id, None);
        assert_eq!(err.error, QuestionError::MissingId);
    }

    #[test]
    fn record_keeps_id_on_validation_failure() {
        let record = QuestionRecord {
            id: Some(QuestionId::new(3)),
            text: "Q".into(),
            options: vec!["A".into(), "B".into()],
            correct_index: 5,
            explanation: String::new(),
        };
        let err = record.into_question().unwrap_err();
        assert_eq!(err.id, Some(QuestionId::new(3)));
    }

    #[tokio::test]
    async fn crud_round_trip() {
        let repo = InMemoryRepository::new();
        let created = repo.create(&draft("first")).await.unwrap();
        assert_eq!(created.id(), QuestionId::new(1));

        let updated = repo.update(created.id(), &draft("edited")).await.unwrap();
        assert_eq!(updated.text(), "edited");

        let all = repo.fetch_all().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].text, "edited");

        repo.delete(created.id()).await.unwrap();
        assert!(repo.fetch_all().await.unwrap().is_empty());
        assert_eq!(repo.delete(created.id()).await.unwrap_err(), ApiError::NotFound);
    }

    #[tokio::test]
    async fn seeded_ids_continue_after_max() {
        let repo = InMemoryRepository::with_records(vec![QuestionRecord {
            id: Some(QuestionId::new(41)),
            ..QuestionRecord::default()
        }]);
        let created = repo.create(&draft("next")).await.unwrap();
        assert_eq!(created.id(), QuestionId::new(42));
    }

    #[tokio::test]
    async fn login_and_ranking() {
        let repo = InMemoryRepository::new();
        repo.register("ana@example.com", "pw").await.unwrap();
        repo.register("bob@example.com", "pw").await.unwrap();
        repo.set_score("bob@example.com", 7).unwrap();

        let identity = repo.login("ana@example.com", "pw").await.unwrap();
        assert_eq!(identity.display_name(), "ana");

        let err = repo.login("ana@example.com", "nope").await.unwrap_err();
        assert!(matches!(err, ApiError::Rejected { status: 401, .. }));

        let top = repo.top_scores(1).await.unwrap();
        assert_eq!(top, vec![RankingEntry::new("bob@example.com", 7)]);
    }

    #[tokio::test]
    async fn offline_repository_fails_every_call() {
        let repo = InMemoryRepository::new();
        repo.set_offline(true);
        assert!(matches!(
            repo.fetch_all().await.unwrap_err(),
            ApiError::Connection(_)
        ));
        repo.set_offline(false);
        assert!(repo.fetch_all().await.unwrap().is_empty());
    }
}
