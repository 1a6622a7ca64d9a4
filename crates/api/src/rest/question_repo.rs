use async_trait::async_trait;
use quiz_core::model::{Question, QuestionId, ValidatedQuestion};
use reqwest::Method;
use serde_json::Value;

use super::dto::QuestionDto;
use super::{RestClient, array_items, decode};
use crate::repository::{ApiError, QuestionRecord, QuestionRepository, QuestionSource};

const QUESTIONS_PATH: &str = "/pergunta";

fn record_from_value(value: Value) -> QuestionRecord {
    match serde_json::from_value::<QuestionDto>(value) {
        Ok(dto) => dto.into_record(),
        Err(err) => {
            tracing::warn!(error = %err, "unreadable question in listing");
            QuestionRecord::default()
        }
    }
}

fn question_from_value(value: Value) -> Result<Question, ApiError> {
    let dto: QuestionDto = decode(value)?;
    dto.into_record()
        .into_question()
        .map_err(|e| ApiError::Serialization(e.to_string()))
}

#[async_trait]
impl QuestionSource for RestClient {
    async fn fetch_all(&self) -> Result<Vec<QuestionRecord>, ApiError> {
        let body = self.get(QUESTIONS_PATH).await?;
        let records: Vec<_> = array_items(body)
            .into_iter()
            .map(record_from_value)
            .collect();
        tracing::debug!(count = records.len(), "fetched questions");
        Ok(records)
    }
}

#[async_trait]
impl QuestionRepository for RestClient {
    async fn create(&self, question: &ValidatedQuestion) -> Result<Question, ApiError> {
        let payload = QuestionDto::from_record(&QuestionRecord::from_validated(None, question));
        let body = self.send_json(Method::POST, QUESTIONS_PATH, &payload).await?;
        question_from_value(body)
    }

    async fn update(
        &self,
        id: QuestionId,
        question: &ValidatedQuestion,
    ) -> Result<Question, ApiError> {
        let payload =
            QuestionDto::from_record(&QuestionRecord::from_validated(Some(id), question));
        let body = self
            .send_json(Method::PUT, &format!("{QUESTIONS_PATH}/{id}"), &payload)
            .await?;
        question_from_value(body)
    }

    async fn delete(&self, id: QuestionId) -> Result<(), ApiError> {
        self.delete_path(&format!("{QUESTIONS_PATH}/{id}")).await?;
        Ok(())
    }
}
