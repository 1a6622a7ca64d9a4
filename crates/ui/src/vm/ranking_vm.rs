use quiz_core::model::{Medal, RankedEntry};
use services::RankingService;

use crate::state::ViewState;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RankingRowVm {
    pub position: usize,
    pub badge: String,
    pub user: String,
    pub score: u32,
}

impl From<&RankedEntry> for RankingRowVm {
    fn from(ranked: &RankedEntry) -> Self {
        Self {
            position: ranked.position,
            badge: badge(ranked.position, ranked.medal),
            user: ranked.entry.display_name.clone(),
            score: ranked.entry.score,
        }
    }
}

fn badge(position: usize, medal: Option<Medal>) -> String {
    match medal {
        Some(Medal::Gold) => "🏆".to_string(),
        Some(Medal::Silver) => "🥈".to_string(),
        Some(Medal::Bronze) => "🥉".to_string(),
        None => format!("#{position}"),
    }
}

#[must_use]
pub fn map_ranking_rows(entries: &[RankedEntry]) -> Vec<RankingRowVm> {
    entries.iter().map(RankingRowVm::from).collect()
}

pub struct RankingVm {
    rows: ViewState<Vec<RankingRowVm>>,
}

impl Default for RankingVm {
    fn default() -> Self {
        Self::new()
    }
}

impl RankingVm {
    #[must_use]
    pub fn new() -> Self {
        Self {
            rows: ViewState::Idle,
        }
    }

    pub async fn load(&mut self, ranking: &RankingService, limit: usize) {
        self.rows = ViewState::Loading;
        self.rows = ViewState::from_result(
            ranking
                .top(limit)
                .await
                .map(|entries| map_ranking_rows(&entries)),
        );
    }

    #[must_use]
    pub fn rows(&self) -> &ViewState<Vec<RankingRowVm>> {
        &self.rows
    }

    #[must_use]
    pub fn title(limit: usize) -> String {
        format!("Ranking • Top {limit}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use api::InMemoryRepository;
    use quiz_core::model::{RankingEntry, rank_top};
    use std::sync::Arc;

    #[test]
    fn badges_follow_podium() {
        let entries = rank_top(
            (1..=5).map(|i| RankingEntry::new(format!("u{i}"), 10 - i)).collect(),
            5,
        );
        let badges: Vec<String> = map_ranking_rows(&entries)
            .into_iter()
            .map(|row| row.badge)
            .collect();
        assert_eq!(badges, vec!["🏆", "🥈", "🥉", "#4", "#5"]);
    }

    #[tokio::test]
    async fn failed_load_is_an_error_state() {
        let repo = InMemoryRepository::new();
        repo.set_offline(true);
        let service = RankingService::new(Arc::new(repo), 10);
        let mut vm = RankingVm::new();
        vm.load(&service, 10).await;
        assert!(matches!(vm.rows(), ViewState::Error(_)));
        assert_eq!(RankingVm::title(10), "Ranking • Top 10");
    }
}
