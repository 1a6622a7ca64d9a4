use std::sync::Arc;

use api::RankingSource;
use quiz_core::model::{RankedEntry, rank_top};

use crate::error::RankingError;

#[derive(Clone)]
pub struct RankingService {
    source: Arc<dyn RankingSource>,
    default_limit: usize,
}

impl RankingService {
    #[must_use]
    pub fn new(source: Arc<dyn RankingSource>, default_limit: usize) -> Self {
        Self {
            source,
            default_limit,
        }
    }

    #[must_use]
    pub fn default_limit(&self) -> usize {
        self.default_limit
    }

    /// Best `limit` scores with positions and medals.
    ///
    /// # Errors
    ///
    /// Returns `RankingError::Api` when the source fails.
    pub async fn top(&self, limit: usize) -> Result<Vec<RankedEntry>, RankingError> {
        let entries = self.source.top_scores(limit).await?;
        Ok(rank_top(entries, limit))
    }

    /// # Errors
    ///
    /// Same as `top`.
    pub async fn top_default(&self) -> Result<Vec<RankedEntry>, RankingError> {
        self.top(self.default_limit).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use api::ApiError;
    use quiz_core::model::{Medal, RankingEntry};

    struct Unsorted;

    #[async_trait]
    impl RankingSource for Unsorted {
        async fn top_scores(&self, _limit: usize) -> Result<Vec<RankingEntry>, ApiError> {
            Ok(vec![
                RankingEntry::new("low", 1),
                RankingEntry::new("high", 9),
                RankingEntry::new("mid", 5),
                RankingEntry::new("tail", 0),
            ])
        }
    }

    #[tokio::test]
    async fn ranks_even_when_source_does_not_sort() {
        let service = RankingService::new(Arc::new(Unsorted), 3);
        let top = service.top_default().await.unwrap();

        let names: Vec<&str> = top.iter().map(|r| r.entry.display_name.as_str()).collect();
        assert_eq!(names, vec!["high", "mid", "low"]);
        assert_eq!(top[0].medal, Some(Medal::Gold));
        assert_eq!(top[2].position, 3);
    }
}
