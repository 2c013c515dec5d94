//! Pure parsing of the JSON payloads returned by in-page JavaScript.
//!
//! The scraper evaluates small scripts that serialize the relevant DOM state
//! to JSON; everything here turns those payloads into record fields without
//! touching the browser, so it can be unit tested directly.

use indexmap::IndexMap;
use serde::Deserialize;

use crate::config::STAT_CATEGORIES;

use super::types::{MatchRef, QuarterScore, QuarterScores, TeamStats, NOT_AVAILABLE};

/// One row of the results list: either a stage header or a match row.
#[derive(Debug, Clone, Deserialize)]
pub struct RawResultsRow {
    pub kind: String,
    #[serde(default)]
    pub stage: Option<String>,
    #[serde(default)]
    pub id: Option<String>,
}

/// Home/away text of one score column, `None` when the column is absent.
#[derive(Debug, Clone, Deserialize)]
pub struct RawQuarter {
    pub home: Option<String>,
    pub away: Option<String>,
}

/// Header fields of the match summary page.
#[derive(Debug, Clone, Deserialize)]
pub struct RawSummary {
    pub date: Option<String>,
    pub home_team: Option<String>,
    pub away_team: Option<String>,
    pub home_score: Option<String>,
    pub away_score: Option<String>,
}

/// One statistics row: category label plus home/away value texts.
#[derive(Debug, Clone, Deserialize)]
pub struct RawStatRow {
    pub category: Option<String>,
    #[serde(default)]
    pub values: Vec<Option<String>>,
}

/// Statistics tab payload: selected tab label plus all rows on it.
#[derive(Debug, Clone, Deserialize)]
pub struct RawStatsPayload {
    pub period: Option<String>,
    #[serde(default)]
    pub rows: Vec<RawStatRow>,
}

/// Trimmed field text, `"N/A"` when missing or empty.
pub fn field_or_na(value: Option<String>) -> String {
    match value {
        Some(v) => {
            let v = v.trim();
            if v.is_empty() {
                NOT_AVAILABLE.to_string()
            } else {
                v.to_string()
            }
        }
        None => NOT_AVAILABLE.to_string(),
    }
}

/// Walk the results rows in page order, carrying the current stage header
/// forward onto every match row beneath it.
pub fn fold_match_rows(rows: Vec<RawResultsRow>) -> Vec<MatchRef> {
    let mut matches = Vec::new();
    let mut current_stage = NOT_AVAILABLE.to_string();

    for row in rows {
        match row.kind.as_str() {
            "stage" => {
                if let Some(stage) = row.stage {
                    let stage = stage.trim();
                    if !stage.is_empty() {
                        current_stage = stage.to_string();
                    }
                }
            }
            "match" => {
                if let Some(id) = row.id {
                    // Row ids look like "g_3_ABC123xy"; the site id is the
                    // trailing token.
                    let clean_id = id.rsplit('_').next().unwrap_or(&id).to_string();
                    if !clean_id.is_empty() {
                        matches.push(MatchRef {
                            id: clean_id,
                            stage: current_stage.clone(),
                        });
                    }
                }
            }
            _ => {}
        }
    }

    matches
}

/// Truncate to the N most recent matches; the results list is already ordered
/// newest first.
pub fn select_recent(mut matches: Vec<MatchRef>, last: Option<usize>) -> Vec<MatchRef> {
    if let Some(n) = last {
        matches.truncate(n);
    }
    matches
}

/// Label for the i-th score column (1-based): Q1..Q4, then OT.
fn quarter_label(index: usize) -> String {
    if index <= 4 {
        format!("Q{}", index)
    } else {
        "OT".to_string()
    }
}

/// Build the per-quarter score map. Columns stop at the first absent one, and
/// only pairs where both sides are plain digits are kept.
pub fn parse_quarter_scores(columns: Vec<Option<RawQuarter>>) -> QuarterScores {
    let mut quarters = QuarterScores::new();

    for (i, column) in columns.into_iter().enumerate() {
        let Some(column) = column else { break };
        let (Some(home), Some(away)) = (column.home, column.away) else {
            break;
        };

        let home = home.trim();
        let away = away.trim();
        if is_digits(home) && is_digits(away) {
            quarters.insert(
                quarter_label(i + 1),
                QuarterScore {
                    home_score: home.to_string(),
                    away_score: away.to_string(),
                },
            );
        }
    }

    quarters
}

fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_digit())
}

/// Reconstruct total scores by summing quarters, for pages that omit the
/// final score element. Zero totals stay `"N/A"`.
pub fn totals_from_quarters(quarters: &QuarterScores) -> (String, String) {
    let mut home_total: u32 = 0;
    let mut away_total: u32 = 0;

    for q in quarters.values() {
        if let (Ok(h), Ok(a)) = (q.home_score.parse::<u32>(), q.away_score.parse::<u32>()) {
            home_total += h;
            away_total += a;
        }
    }

    let as_field = |total: u32| {
        if total > 0 {
            total.to_string()
        } else {
            NOT_AVAILABLE.to_string()
        }
    };
    (as_field(home_total), as_field(away_total))
}

/// Canonical period key for a statistics tab label.
pub fn period_key(label: &str) -> String {
    match label.trim() {
        "1st Quarter" => "Q1".to_string(),
        "2nd Quarter" => "Q2".to_string(),
        "3rd Quarter" => "Q3".to_string(),
        "4th Quarter" => "Q4".to_string(),
        "Overtime" => "OT".to_string(),
        other => other.to_string(),
    }
}

/// Stat category → JSON key: lowercase, spaces to underscores, everything
/// outside `[a-z0-9_]` dropped ("3-Point Field Goals %" → "3point_field_goals").
pub fn stat_key(category: &str) -> String {
    category
        .to_lowercase()
        .replace(' ', "_")
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '_')
        .collect()
}

/// What one statistics tab produced, and what it means for the period walk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PeriodTab {
    /// Usable rows under a known period label.
    Stats {
        period: String,
        home: TeamStats,
        away: TeamStats,
    },
    /// Tab loaded but none of its rows are tracked; later periods may still
    /// exist, so the walk moves on.
    Empty,
    /// No selected-tab label to read; past the last period, the walk ends.
    Missing,
}

/// Turn one statistics tab payload into a [`PeriodTab`]. Categories outside
/// the allowlist are dropped; a missing side becomes `"N/A"`.
pub fn parse_period_stats(payload: RawStatsPayload) -> PeriodTab {
    let Some(label) = payload.period else {
        return PeriodTab::Missing;
    };
    let period = period_key(&label);

    let mut home_stats = TeamStats::new();
    let mut away_stats = TeamStats::new();

    for row in payload.rows {
        let Some(category) = row.category else {
            continue;
        };
        let category = category.trim();
        if !STAT_CATEGORIES.contains(&category) {
            continue;
        }

        let key = stat_key(category);
        let value_at = |i: usize| {
            row.values
                .get(i)
                .cloned()
                .flatten()
                .map(|v| v.trim().to_string())
                .unwrap_or_else(|| NOT_AVAILABLE.to_string())
        };
        home_stats.insert(key.clone(), value_at(0));
        away_stats.insert(key, value_at(1));
    }

    if home_stats.is_empty() || away_stats.is_empty() {
        return PeriodTab::Empty;
    }
    PeriodTab::Stats {
        period,
        home: home_stats,
        away: away_stats,
    }
}

/// Nest home/away stats under their team names.
pub fn stats_by_team(
    home_team: &str,
    away_team: &str,
    home_stats: TeamStats,
    away_stats: TeamStats,
) -> IndexMap<String, TeamStats> {
    let mut by_team = IndexMap::new();
    by_team.insert(home_team.to_string(), home_stats);
    by_team.insert(away_team.to_string(), away_stats);
    by_team
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stage_row(stage: &str) -> RawResultsRow {
        RawResultsRow {
            kind: "stage".to_string(),
            stage: Some(stage.to_string()),
            id: None,
        }
    }

    fn match_row(id: &str) -> RawResultsRow {
        RawResultsRow {
            kind: "match".to_string(),
            stage: None,
            id: Some(id.to_string()),
        }
    }

    #[test]
    fn test_fold_match_rows_tracks_stage() {
        let rows = vec![
            stage_row("Main Round"),
            match_row("g_3_abc123"),
            match_row("g_3_def456"),
            stage_row("Playoffs - Final"),
            match_row("g_3_ghi789"),
        ];

        let matches = fold_match_rows(rows);
        assert_eq!(matches.len(), 3);
        assert_eq!(matches[0].id, "abc123");
        assert_eq!(matches[0].stage, "Main Round");
        assert_eq!(matches[1].stage, "Main Round");
        assert_eq!(matches[2].id, "ghi789");
        assert_eq!(matches[2].stage, "Playoffs - Final");
    }

    #[test]
    fn test_fold_match_rows_without_leading_stage() {
        let matches = fold_match_rows(vec![match_row("g_3_xyz")]);
        assert_eq!(matches[0].stage, NOT_AVAILABLE);
    }

    #[test]
    fn test_select_recent_truncates() {
        let matches: Vec<MatchRef> = (0..5)
            .map(|i| MatchRef {
                id: format!("m{}", i),
                stage: NOT_AVAILABLE.to_string(),
            })
            .collect();

        assert_eq!(select_recent(matches.clone(), Some(3)).len(), 3);
        assert_eq!(select_recent(matches.clone(), Some(10)).len(), 5);
        assert_eq!(select_recent(matches, None).len(), 5);
    }

    fn col(home: &str, away: &str) -> Option<RawQuarter> {
        Some(RawQuarter {
            home: Some(home.to_string()),
            away: Some(away.to_string()),
        })
    }

    #[test]
    fn test_parse_quarter_scores_regulation() {
        let quarters = parse_quarter_scores(vec![
            col("25", "20"),
            col("18", "22"),
            col("30", "15"),
            col("21", "19"),
            None,
        ]);

        assert_eq!(
            quarters.keys().collect::<Vec<_>>(),
            vec!["Q1", "Q2", "Q3", "Q4"]
        );
        assert_eq!(quarters["Q3"].home_score, "30");
        assert_eq!(quarters["Q3"].away_score, "15");
    }

    #[test]
    fn test_parse_quarter_scores_with_overtime() {
        let quarters = parse_quarter_scores(vec![
            col("25", "20"),
            col("18", "22"),
            col("30", "15"),
            col("21", "29"),
            col("12", "10"),
        ]);
        assert_eq!(quarters.get("OT").unwrap().home_score, "12");
    }

    #[test]
    fn test_parse_quarter_scores_skips_non_numeric() {
        let quarters = parse_quarter_scores(vec![col("25", "-"), col("18", "22")]);
        assert!(!quarters.contains_key("Q1"));
        assert_eq!(quarters["Q2"].away_score, "22");
    }

    #[test]
    fn test_parse_quarter_scores_stops_at_missing_column() {
        let quarters = parse_quarter_scores(vec![col("25", "20"), None, col("30", "15")]);
        assert_eq!(quarters.len(), 1);
    }

    #[test]
    fn test_totals_from_quarters() {
        let quarters = parse_quarter_scores(vec![
            col("25", "20"),
            col("18", "22"),
            col("30", "15"),
            col("21", "19"),
        ]);
        let (home, away) = totals_from_quarters(&quarters);
        assert_eq!(home, "94");
        assert_eq!(away, "76");
    }

    #[test]
    fn test_totals_from_empty_quarters_stay_na() {
        let (home, away) = totals_from_quarters(&QuarterScores::new());
        assert_eq!(home, NOT_AVAILABLE);
        assert_eq!(away, NOT_AVAILABLE);
    }

    #[test]
    fn test_period_key_mapping() {
        assert_eq!(period_key("1st Quarter"), "Q1");
        assert_eq!(period_key("4th Quarter"), "Q4");
        assert_eq!(period_key("Overtime"), "OT");
        assert_eq!(period_key("Match"), "Match");
    }

    #[test]
    fn test_stat_key_normalization() {
        assert_eq!(stat_key("Field Goals Made"), "field_goals_made");
        assert_eq!(stat_key("Field Goals %"), "field_goals_");
        assert_eq!(stat_key("3-Point Field Goals Made"), "3point_field_goals_made");
        assert_eq!(stat_key("2-Point Field G. Attempted"), "2point_field_g_attempted");
    }

    fn stat_row(category: &str, home: Option<&str>, away: Option<&str>) -> RawStatRow {
        RawStatRow {
            category: Some(category.to_string()),
            values: vec![home.map(String::from), away.map(String::from)],
        }
    }

    #[test]
    fn test_parse_period_stats() {
        let payload = RawStatsPayload {
            period: Some("2nd Quarter".to_string()),
            rows: vec![
                stat_row("Field Goals Made", Some("12"), Some("9")),
                stat_row("Assists", Some("7"), Some("5")),
                stat_row("Fast Break Points", Some("4"), Some("8")), // not allowlisted
            ],
        };

        let PeriodTab::Stats { period, home, away } = parse_period_stats(payload) else {
            panic!("expected recorded stats");
        };
        assert_eq!(period, "Q2");
        assert_eq!(home["field_goals_made"], "12");
        assert_eq!(away["assists"], "5");
        assert!(!home.contains_key("fast_break_points"));
    }

    #[test]
    fn test_parse_period_stats_missing_value_defaults_to_na() {
        let payload = RawStatsPayload {
            period: Some("1st Quarter".to_string()),
            rows: vec![stat_row("Blocks", Some("2"), None)],
        };

        let PeriodTab::Stats { home, away, .. } = parse_period_stats(payload) else {
            panic!("expected recorded stats");
        };
        assert_eq!(home["blocks"], "2");
        assert_eq!(away["blocks"], NOT_AVAILABLE);
    }

    #[test]
    fn test_tab_with_only_untracked_rows_is_empty_not_missing() {
        // An all-untracked tab skips just this period; only a missing tab
        // label ends the period walk.
        let payload = RawStatsPayload {
            period: Some("2nd Quarter".to_string()),
            rows: vec![stat_row("Fast Break Points", Some("4"), Some("8"))],
        };
        assert_eq!(parse_period_stats(payload), PeriodTab::Empty);

        let no_rows = RawStatsPayload {
            period: Some("3rd Quarter".to_string()),
            rows: vec![],
        };
        assert_eq!(parse_period_stats(no_rows), PeriodTab::Empty);
    }

    #[test]
    fn test_tab_without_label_ends_the_walk() {
        let no_period = RawStatsPayload {
            period: None,
            rows: vec![stat_row("Assists", Some("7"), Some("5"))],
        };
        assert_eq!(parse_period_stats(no_period), PeriodTab::Missing);
    }

    #[test]
    fn test_field_or_na() {
        assert_eq!(field_or_na(Some("  Boston Celtics ".to_string())), "Boston Celtics");
        assert_eq!(field_or_na(Some("   ".to_string())), NOT_AVAILABLE);
        assert_eq!(field_or_na(None), NOT_AVAILABLE);
    }
}
