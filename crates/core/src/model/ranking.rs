use serde::{Deserialize, Serialize};

/// Number of rows the ranking screen shows.
pub const DEFAULT_RANKING_SIZE: usize = 10;

/// Aggregated score of one user, as supplied by the ranking source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankingEntry {
    pub display_name: String,
    pub score: u32,
}

impl RankingEntry {
    #[must_use]
    pub fn new(display_name: impl Into<String>, score: u32) -> Self {
        Self {
            display_name: display_name.into(),
            score,
        }
    }
}

/// Podium decoration for the first three places.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Medal {
    Gold,
    Silver,
    Bronze,
}

impl Medal {
    #[must_use]
    pub fn for_position(position: usize) -> Option<Self> {
        match position {
            1 => Some(Self::Gold),
            2 => Some(Self::Silver),
            3 => Some(Self::Bronze),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankedEntry {
    pub position: usize,
    pub medal: Option<Medal>,
    pub entry: RankingEntry,
}

/// Sort by score (highest first, ties keep input order) and keep the top `limit`.
#[must_use]
pub fn rank_top(mut entries: Vec<RankingEntry>, limit: usize) -> Vec<RankedEntry> {
    entries.sort_by(|a, b| b.score.cmp(&a.score));
    entries
        .into_iter()
        .take(limit)
        .enumerate()
        .map(|(i, entry)| {
            let position = i + 1;
            RankedEntry {
                position,
                medal: Medal::for_position(position),
                entry,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ranks_by_score_and_truncates() {
        let entries = vec![
            RankingEntry::new("low", 1),
            RankingEntry::new("high", 9),
            RankingEntry::new("mid", 5),
            RankingEntry::new("mid2", 5),
        ];

        let ranked = rank_top(entries, 3);
        let names: Vec<_> = ranked.iter().map(|r| r.entry.display_name.as_str()).collect();
        assert_eq!(names, vec!["high", "mid", "mid2"]);
        assert_eq!(ranked[0].medal, Some(Medal::Gold));
        assert_eq!(ranked[2].position, 3);
        assert_eq!(ranked[2].medal, Some(Medal::Bronze));
    }

    #[test]
    fn fourth_place_has_no_medal() {
        let entries = (0..5).map(|i| RankingEntry::new(format!("u{i}"), i)).collect();
        let ranked = rank_top(entries, DEFAULT_RANKING_SIZE);
        assert_eq!(ranked.len(), 5);
        assert_eq!(ranked[3].medal, None);
        assert_eq!(ranked[3].entry.display_name, "u1");
    }
}
