use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt::Write as _;

use crate::domain::{FindingSet, FindingStatus};

/// Per-team point total and status counts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamLeaderboardEntry {
    pub team_name: String,
    pub total_points: i64,
    pub timely_closed: usize,
    pub late_closed: usize,
    pub re_opened: usize,
    pub still_open: usize,
}

impl TeamLeaderboardEntry {
    fn new(team_name: &str) -> Self {
        Self {
            team_name: team_name.to_string(),
            total_points: 0,
            timely_closed: 0,
            late_closed: 0,
            re_opened: 0,
            still_open: 0,
        }
    }
}

/// Group by exact team name and rank by total points, highest first.
/// Teams with equal points stay in the order they first appear.
pub fn compute_leaderboard(findings: &FindingSet) -> Vec<TeamLeaderboardEntry> {
    let mut entries: Vec<TeamLeaderboardEntry> = Vec::new();
    let mut positions: HashMap<&str, usize> = HashMap::new();

    for finding in findings {
        let idx = *positions
            .entry(finding.responsible_team.as_str())
            .or_insert_with(|| {
                entries.push(TeamLeaderboardEntry::new(&finding.responsible_team));
                entries.len() - 1
            });
        let entry = &mut entries[idx];
        entry.total_points = entry.total_points.saturating_add(finding.points);
        match finding.status {
            FindingStatus::ClosedTimely => entry.timely_closed += 1,
            FindingStatus::ClosedLate => entry.late_closed += 1,
            FindingStatus::ReOpened => entry.re_opened += 1,
            FindingStatus::Open => entry.still_open += 1,
        }
    }

    // sort_by is stable
    entries.sort_by(|a, b| b.total_points.cmp(&a.total_points));
    entries
}

/// Plain-text ranking table
pub fn render_leaderboard(entries: &[TeamLeaderboardEntry]) -> String {
    let team_width = entries
        .iter()
        .map(|e| e.team_name.chars().count())
        .max()
        .unwrap_or(0)
        .max("Team".len());

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:>4}  {:<team_width$}  {:>8}  {:>6}  {:>4}  {:>9}  {:>4}",
        "Rank", "Team", "Points", "Timely", "Late", "Re-Opened", "Open"
    );
    for (i, e) in entries.iter().enumerate() {
        let _ = writeln!(
            out,
            "{:>4}  {:<team_width$}  {:>8}  {:>6}  {:>4}  {:>9}  {:>4}",
            i + 1,
            e.team_name,
            format!("{} pts", e.total_points),
            e.timely_closed,
            e.late_closed,
            e.re_opened,
            e.still_open
        );
    }
    out
}
