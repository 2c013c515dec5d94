//! Match record types serialized to the output JSON.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Placeholder for values the page does not expose.
pub const NOT_AVAILABLE: &str = "N/A";

/// A match row from the league results page, before the match page itself
/// has been visited.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchRef {
    /// Site-assigned id, the trailing token of the row's `id` attribute.
    pub id: String,
    /// Stage header the row appeared under ("Main round", "Playoffs", ...).
    pub stage: String,
}

/// Home/away score pair for one period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuarterScore {
    pub home_score: String,
    pub away_score: String,
}

/// Period label ("Q1".."Q4", "OT") → score pair, in game order.
pub type QuarterScores = IndexMap<String, QuarterScore>;

/// Stat key → value, e.g. `"field_goals_made" → "32"`.
pub type TeamStats = IndexMap<String, String>;

/// Period label → team name → stats.
pub type QuarterStats = IndexMap<String, IndexMap<String, TeamStats>>;

/// One scraped game. Field order is the output JSON key order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub match_id: String,
    pub stage: String,
    pub date: String,
    pub home_team: String,
    pub away_team: String,
    pub home_score: String,
    pub away_score: String,
    pub quarter_scores: QuarterScores,
    pub quarter_stats: QuarterStats,
    pub scraped_at: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_serialization_keeps_nesting_and_period_order() {
        let mut quarter_scores = QuarterScores::new();
        for (label, home, away) in [("Q1", "25", "20"), ("Q2", "18", "22"), ("OT", "9", "11")] {
            quarter_scores.insert(
                label.to_string(),
                QuarterScore {
                    home_score: home.to_string(),
                    away_score: away.to_string(),
                },
            );
        }

        let mut q1_home = TeamStats::new();
        q1_home.insert("assists".to_string(), "7".to_string());
        let mut q1_away = TeamStats::new();
        q1_away.insert("assists".to_string(), "5".to_string());
        let mut q1 = IndexMap::new();
        q1.insert("Lakers".to_string(), q1_home);
        q1.insert("Celtics".to_string(), q1_away);
        let mut quarter_stats = QuarterStats::new();
        quarter_stats.insert("Q1".to_string(), q1);

        let record = MatchRecord {
            match_id: "xKtQabc1".to_string(),
            stage: "Playoffs".to_string(),
            date: "10.06.2025 02:30".to_string(),
            home_team: "Lakers".to_string(),
            away_team: "Celtics".to_string(),
            home_score: "52".to_string(),
            away_score: "53".to_string(),
            quarter_scores,
            quarter_stats,
            scraped_at: "2025-06-10T08:00:00.000000".to_string(),
        };

        let json = serde_json::to_string_pretty(&record).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["quarter_scores"]["Q1"]["home_score"], "25");
        assert_eq!(value["quarter_stats"]["Q1"]["Celtics"]["assists"], "5");

        let back: MatchRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
        // IndexMap preserves insertion order through serde
        let keys: Vec<_> = back.quarter_scores.keys().cloned().collect();
        assert_eq!(keys, vec!["Q1", "Q2", "OT"]);
    }
}
