use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::NOT_APPLICABLE;
use crate::domain::{FindingSet, FindingStatus};

/// Headline counts for the dashboard view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_findings: usize,
    pub open_findings: usize,
    /// Everything that is not `Open`, re-opened findings included
    pub closed_findings: usize,
    pub re_opened_findings: usize,
    /// Mean of the known `days_to_close`, one decimal place
    pub avg_days_to_close: Option<f64>,
}

impl DashboardStats {
    pub fn avg_days_label(&self) -> String {
        match self.avg_days_to_close {
            Some(avg) => format!("{:.1}", avg),
            None => NOT_APPLICABLE.to_string(),
        }
    }
}

pub fn compute_dashboard_stats(findings: &FindingSet) -> DashboardStats {
    let total_findings = findings.len();
    let open_findings = findings
        .iter()
        .filter(|f| f.status == FindingStatus::Open)
        .count();
    let re_opened_findings = findings
        .iter()
        .filter(|f| f.status == FindingStatus::ReOpened)
        .count();

    let durations: Vec<i64> = findings.iter().filter_map(|f| f.days_to_close).collect();
    let avg_days_to_close = if durations.is_empty() {
        None
    } else {
        let mean = durations.iter().sum::<i64>() as f64 / durations.len() as f64;
        Some((mean * 10.0).round() / 10.0)
    };

    DashboardStats {
        total_findings,
        open_findings,
        closed_findings: total_findings - open_findings,
        re_opened_findings,
        avg_days_to_close,
    }
}

impl fmt::Display for DashboardStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Total Findings:            {}", self.total_findings)?;
        writeln!(f, "Open Findings:             {}", self.open_findings)?;
        writeln!(f, "Closed Findings:           {}", self.closed_findings)?;
        writeln!(f, "Re-Opened Findings:        {}", self.re_opened_findings)?;
        write!(f, "Avg. Time to Close (Days): {}", self.avg_days_label())
    }
}
