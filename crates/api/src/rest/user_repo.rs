use async_trait::async_trait;
use quiz_core::model::{Identity, RankingEntry};
use reqwest::Method;

use super::dto::{CredentialsDto, UserDto};
use super::{RestClient, array_items, decode};
use crate::repository::{ApiError, AuthGateway, RankingSource};

const USERS_PATH: &str = "/usuario";
const LOGIN_PATH: &str = "/usuario/login";

#[async_trait]
impl AuthGateway for RestClient {
    async fn login(&self, email: &str, password: &str) -> Result<Identity, ApiError> {
        let body = self
            .send_json(Method::POST, LOGIN_PATH, &CredentialsDto { email, password })
            .await?;
        decode::<UserDto>(body)?.into_identity()
    }

    async fn register(&self, email: &str, password: &str) -> Result<Identity, ApiError> {
        let body = self
            .send_json(Method::POST, USERS_PATH, &CredentialsDto { email, password })
            .await?;
        decode::<UserDto>(body)?.into_identity()
    }
}

#[async_trait]
impl RankingSource for RestClient {
    async fn top_scores(&self, limit: usize) -> Result<Vec<RankingEntry>, ApiError> {
        let body = self.get(USERS_PATH).await?;
        let mut entries: Vec<RankingEntry> = array_items(body)
            .into_iter()
            .map(|item| {
                serde_json::from_value::<UserDto>(item)
                    .unwrap_or_default()
                    .into_ranking_entry()
            })
            .collect();
        entries.sort_by(|a, b| b.score.cmp(&a.score));
        entries.truncate(limit);
        Ok(entries)
    }
}
