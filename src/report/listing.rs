use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

use crate::constants::NOT_APPLICABLE;
use crate::domain::{Finding, FindingSet, FindingStatus};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Which way a finding's points lean
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointTone {
    Positive,
    Negative,
    Neutral,
}

impl PointTone {
    pub fn of(points: i64) -> Self {
        match points.signum() {
            1 => PointTone::Positive,
            -1 => PointTone::Negative,
            _ => PointTone::Neutral,
        }
    }
}

/// One display row of the findings table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FindingRow {
    pub id: usize,
    pub category: String,
    pub question: String,
    pub responsible_team: String,
    pub finding_date: String,
    pub closed_date: String,
    pub status: FindingStatus,
    pub reopen_count: i64,
    pub points: String,
    pub tone: PointTone,
}

impl From<&Finding> for FindingRow {
    fn from(f: &Finding) -> Self {
        Self {
            id: f.id,
            category: f.category.clone(),
            question: f.question.clone(),
            responsible_team: f.responsible_team.clone(),
            finding_date: f.issue_finding_date.format(DATE_FORMAT).to_string(),
            closed_date: f
                .issue_closed_date
                .map(|d| d.format(DATE_FORMAT).to_string())
                .unwrap_or_else(|| NOT_APPLICABLE.to_string()),
            status: f.status,
            reopen_count: f.reopen_count,
            points: points_label(f.points),
            tone: PointTone::of(f.points),
        }
    }
}

/// `+N` for positive points, plain `N` otherwise
pub fn points_label(points: i64) -> String {
    if points > 0 {
        format!("+{}", points)
    } else {
        points.to_string()
    }
}

pub fn compute_listing(findings: &FindingSet) -> Vec<FindingRow> {
    findings.iter().map(FindingRow::from).collect()
}

const HEADERS: [&str; 8] = [
    "Category",
    "Question",
    "Responsible Team",
    "Finding Date",
    "Closed Date",
    "Status",
    "Reopen Count",
    "Points",
];

/// Plain-text findings table, columns padded to their widest cell
pub fn render_listing(rows: &[FindingRow]) -> String {
    let cells: Vec<[String; 8]> = rows
        .iter()
        .map(|r| {
            [
                r.category.clone(),
                r.question.clone(),
                r.responsible_team.clone(),
                r.finding_date.clone(),
                r.closed_date.clone(),
                r.status.label().to_string(),
                r.reopen_count.to_string(),
                r.points.clone(),
            ]
        })
        .collect();

    let mut widths = HEADERS.map(|h| h.chars().count());
    for row in &cells {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    push_line(&mut out, HEADERS.iter().copied(), &widths);
    for row in &cells {
        push_line(&mut out, row.iter().map(String::as_str), &widths);
    }
    out
}

fn push_line<'a>(out: &mut String, cells: impl Iterator<Item = &'a str>, widths: &[usize]) {
    let line = cells
        .zip(widths)
        .map(|(cell, w)| format!("{:<w$}", cell, w = *w))
        .collect::<Vec<_>>()
        .join("  ");
    let _ = writeln!(out, "{}", line.trim_end());
}
