use std::sync::Arc;
use std::time::Duration;

use reqwest::{Client, Method};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::repository::{
    Api, ApiError, AuthGateway, QuestionRepository, QuestionSource, RankingSource,
};

mod dto;
mod question_repo;
mod user_repo;

/// Where the quiz service listens when nothing else is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8089/api";

const FALLBACK_ERROR_MESSAGE: &str = "Failed to reach the quiz service.";

#[derive(Debug, Clone)]
pub struct RestConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for RestConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(10),
        }
    }
}

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum RestInitError {
    #[error("invalid base url: {0}")]
    InvalidBaseUrl(String),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

/// JSON-over-HTTP adapter for the remote quiz service.
#[derive(Clone, Debug)]
pub struct RestClient {
    client: Client,
    base_url: String,
}

impl RestClient {
    /// Build a client for the configured base url.
    ///
    /// # Errors
    ///
    /// Returns `RestInitError::InvalidBaseUrl` when the url is not http(s), or
    /// `RestInitError::Http` if the underlying client cannot be built.
    pub fn connect(config: &RestConfig) -> Result<Self, RestInitError> {
        let base_url = config.base_url.trim().trim_end_matches('/').to_string();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(RestInitError::InvalidBaseUrl(config.base_url.clone()));
        }
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, base_url })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    pub(crate) async fn get(&self, path: &str) -> Result<Value, ApiError> {
        self.request::<()>(Method::GET, path, None).await
    }

    pub(crate) async fn send_json<B: Serialize + Sync>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> Result<Value, ApiError> {
        self.request(method, path, Some(body)).await
    }

    pub(crate) async fn delete_path(&self, path: &str) -> Result<Value, ApiError> {
        self.request::<()>(Method::DELETE, path, None).await
    }

    /// Send a request and decode the body as JSON.
    ///
    /// Empty bodies decode to `Value::Null`; non-JSON bodies are wrapped as
    /// `{"raw": text}`.
    async fn request<B: Serialize + Sync>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<Value, ApiError> {
        tracing::debug!(%method, path, "quiz service request");
        let mut builder = self.client.request(method.clone(), self.url(path));
        if let Some(body) = body {
            builder = builder.json(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| ApiError::Connection(e.to_string()))?;
        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| ApiError::Connection(e.to_string()))?;
        let data = decode_body(&text);

        if !status.is_success() {
            let message = error_message(&data, &text);
            tracing::warn!(%method, path, status = status.as_u16(), %message, "quiz service rejected request");
            return Err(ApiError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        Ok(data)
    }
}

fn decode_body(text: &str) -> Value {
    if text.is_empty() {
        return Value::Null;
    }
    serde_json::from_str(text).unwrap_or_else(|_| serde_json::json!({ "raw": text }))
}

/// Pick the most useful message out of an error response: `message`, then
/// `error`, then the raw body, then a generic fallback.
fn error_message(data: &Value, text: &str) -> String {
    ["message", "error"]
        .iter()
        .filter_map(|key| data.get(*key).and_then(Value::as_str))
        .find(|s| !s.is_empty())
        .map(str::to_string)
        .or_else(|| (!text.is_empty()).then(|| text.to_string()))
        .unwrap_or_else(|| FALLBACK_ERROR_MESSAGE.to_string())
}

pub(crate) fn decode<T: serde::de::DeserializeOwned>(value: Value) -> Result<T, ApiError> {
    serde_json::from_value(value).map_err(|e| ApiError::Serialization(e.to_string()))
}

/// Elements of a JSON array; anything else counts as an empty list.
pub(crate) fn array_items(value: Value) -> Vec<Value> {
    match value {
        Value::Array(items) => items,
        _ => Vec::new(),
    }
}

impl Api {
    /// Build collaborators backed by the REST service.
    ///
    /// # Errors
    ///
    /// Returns `RestInitError` if the client cannot be configured.
    pub fn rest(config: &RestConfig) -> Result<Self, RestInitError> {
        let client = RestClient::connect(config)?;
        let questions: Arc<dyn QuestionSource> = Arc::new(client.clone());
        let question_store: Arc<dyn QuestionRepository> = Arc::new(client.clone());
        let auth: Arc<dyn AuthGateway> = Arc::new(client.clone());
        let ranking: Arc<dyn RankingSource> = Arc::new(client);
        Ok(Self {
            questions,
            question_store,
            auth,
            ranking,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<RestClient>();
    }

    #[test]
    fn rejects_non_http_base_url() {
        let config = RestConfig {
            base_url: "localhost:8089".into(),
            ..RestConfig::default()
        };
        assert!(matches!(
            RestClient::connect(&config),
            Err(RestInitError::InvalidBaseUrl(_))
        ));
    }

    #[test]
    fn trailing_slash_is_trimmed() {
        let config = RestConfig {
            base_url: "http://example.test/api/".into(),
            ..RestConfig::default()
        };
        let client = RestClient::connect(&config).unwrap();
        assert_eq!(client.url("/pergunta"), "http://example.test/api/pergunta");
    }

    #[test]
    fn error_message_prefers_message_then_error_then_text() {
        let text = r#"{"message":"bad","error":"worse"}"#;
        assert_eq!(error_message(&decode_body(text), text), "bad");

        let text = r#"{"error":"worse"}"#;
        assert_eq!(error_message(&decode_body(text), text), "worse");

        let text = "gateway timeout";
        assert_eq!(error_message(&decode_body(text), text), "gateway timeout");

        assert_eq!(error_message(&decode_body(""), ""), FALLBACK_ERROR_MESSAGE);
    }

    #[test]
    fn non_array_is_empty_list() {
        assert!(array_items(serde_json::json!({"items": []})).is_empty());
        assert_eq!(array_items(serde_json::json!([1, 2])).len(), 2);
    }
}
