//! Validated audit-finding shapes shared by the normalizer, the session and the views.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::sync::Arc;

use crate::constants::{
    STATUS_CLOSED_LATE, STATUS_CLOSED_TIMELY, STATUS_OPEN, STATUS_REOPENED, STATUS_REOPENED_ALT,
};

/// Closed set of finding statuses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FindingStatus {
    #[serde(rename = "Open")]
    Open,
    #[serde(rename = "Closed - Timely")]
    ClosedTimely,
    #[serde(rename = "Closed - Late")]
    ClosedLate,
    #[serde(rename = "Re-Opened")]
    ReOpened,
}

impl FindingStatus {
    pub const ALL: [FindingStatus; 4] = [
        FindingStatus::Open,
        FindingStatus::ClosedTimely,
        FindingStatus::ClosedLate,
        FindingStatus::ReOpened,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            FindingStatus::Open => STATUS_OPEN,
            FindingStatus::ClosedTimely => STATUS_CLOSED_TIMELY,
            FindingStatus::ClosedLate => STATUS_CLOSED_LATE,
            FindingStatus::ReOpened => STATUS_REOPENED,
        }
    }

    /// Case-insensitive match against the recognized spreadsheet literals.
    /// "Reopened" is accepted as an alias of "Re-Opened".
    pub fn from_label(raw: &str) -> Option<Self> {
        let wanted = raw.trim().to_lowercase();
        if wanted == STATUS_REOPENED_ALT.to_lowercase() {
            return Some(FindingStatus::ReOpened);
        }
        Self::ALL
            .into_iter()
            .find(|s| s.label().to_lowercase() == wanted)
    }
}

impl fmt::Display for FindingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One validated audit issue, built from exactly one spreadsheet row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Finding {
    /// 0-based position in the sheet's data rows
    pub id: usize,
    pub category: String,
    pub question: String,
    pub responsible_team: String,
    pub issue_finding_date: NaiveDateTime,
    pub issue_closed_date: Option<NaiveDateTime>,
    pub reopen_date: Option<NaiveDateTime>,
    pub status: FindingStatus,
    pub points: i64,
    pub reopen_count: i64,
    /// Whole days from finding to closure, rounded up; set iff `issue_closed_date` is
    pub days_to_close: Option<i64>,
}

/// Immutable, index-stable result of one successful ingestion.
/// Cloning shares the underlying records.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FindingSet {
    findings: Arc<Vec<Finding>>,
}

impl FindingSet {
    pub fn new(findings: Vec<Finding>) -> Self {
        Self {
            findings: Arc::new(findings),
        }
    }

    pub fn len(&self) -> usize {
        self.findings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.findings.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Finding> {
        self.findings.iter()
    }

    pub fn get(&self, id: usize) -> Option<&Finding> {
        self.findings.get(id)
    }
}

impl<'a> IntoIterator for &'a FindingSet {
    type Item = &'a Finding;
    type IntoIter = std::slice::Iter<'a, Finding>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl Serialize for FindingSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.findings.iter())
    }
}
