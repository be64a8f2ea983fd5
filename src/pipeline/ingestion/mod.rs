//! Synchronous ingestion core: one file's bytes to a `FindingSet`, all or nothing.

use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, info, instrument, warn};

use crate::domain::FindingSet;
use crate::error::{IngestError, Result};
use crate::observability::metrics;
use crate::pipeline::processing::columns::resolve_columns;
use crate::pipeline::processing::normalize::{normalize_rows, DefaultNormalizer};
use crate::pipeline::processing::parser::{decode_sheet, SheetFormat};

/// How to read one uploaded file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestOptions {
    /// Used for format detection and in logs
    pub file_name: String,
    pub format: SheetFormat,
    /// Worksheet to read; the first one when unset. Ignored for CSV.
    pub sheet: Option<String>,
}

impl IngestOptions {
    pub fn for_file(file_name: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            ..Self::default()
        }
    }

    pub fn with_format(mut self, format: SheetFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_sheet(mut self, sheet: Option<String>) -> Self {
        self.sheet = sheet;
        self
    }
}

/// Decode, resolve columns and normalize every row.
///
/// Either every non-blank row becomes a finding or nothing is returned.
#[instrument(skip(bytes, opts), fields(file_name = %opts.file_name, bytes = bytes.len()))]
pub fn ingest(bytes: &[u8], opts: &IngestOptions) -> Result<FindingSet> {
    let started = Instant::now();
    metrics::ingest::started();

    let result = run(bytes, opts);
    metrics::ingest::duration(started.elapsed().as_secs_f64());

    match &result {
        Ok(findings) => {
            metrics::ingest::succeeded(findings.len());
            info!(findings = findings.len(), "ingestion succeeded");
        }
        Err(e) => {
            metrics::ingest::failed(e.kind());
            warn!(error = %e, kind = e.kind(), "ingestion failed");
        }
    }
    result
}

fn run(bytes: &[u8], opts: &IngestOptions) -> Result<FindingSet> {
    if bytes.is_empty() {
        return Err(IngestError::EmptyInput);
    }

    let sheet = decode_sheet(bytes, opts.format, &opts.file_name, opts.sheet.clone())?;
    if sheet.rows.is_empty() {
        return Err(IngestError::EmptyInput);
    }
    debug!(rows = sheet.rows.len(), headers = ?sheet.headers, "sheet decoded");

    // Columns come from the first data row; every row shares the header row.
    let columns = resolve_columns(sheet.rows[0].headers())?;
    let findings = normalize_rows(&DefaultNormalizer, &sheet.rows, &columns)?;
    Ok(FindingSet::new(findings))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::FindingStatus;

    const HEADER: &str = "Category,Question,Responsible Team,Issue Finding Date,Issue Closed Date,Reopen Dates,Status,Reopen Count,Accumulated Points\n";

    fn csv(rows: &[&str]) -> Vec<u8> {
        let mut out = HEADER.to_string();
        for r in rows {
            out.push_str(r);
            out.push('\n');
        }
        out.into_bytes()
    }

    fn opts() -> IngestOptions {
        IngestOptions::for_file("audit.csv")
    }

    #[test]
    fn test_ingest_csv_rows() {
        let bytes = csv(&[
            "Safety,Exits marked?,Facilities,2024-01-01,2024-01-05,,,0,10",
            ",,,,,,,,",
            "HR,Training done?,People,2024-02-01,,,REOPENED,2,-5",
        ]);
        let set = ingest(&bytes, &opts()).unwrap();
        assert_eq!(set.len(), 2);

        let first = set.get(0).unwrap();
        assert_eq!(first.status, FindingStatus::ClosedTimely);
        assert_eq!(first.days_to_close, Some(4));
        assert_eq!(first.points, 10);

        let second = set.get(1).unwrap();
        assert_eq!(second.id, 1);
        assert_eq!(second.status, FindingStatus::ReOpened);
        assert_eq!(second.reopen_count, 2);
        assert_eq!(second.points, -5);
    }

    #[test]
    fn test_empty_bytes_and_header_only_are_empty_input() {
        assert!(matches!(ingest(b"", &opts()), Err(IngestError::EmptyInput)));
        assert!(matches!(
            ingest(HEADER.as_bytes(), &opts()),
            Err(IngestError::EmptyInput)
        ));
    }

    #[test]
    fn test_missing_column_is_schema_error() {
        let bytes = b"Category,Question\nSafety,Exits?\n";
        let err = ingest(bytes, &opts()).unwrap_err();
        assert!(matches!(err, IngestError::Schema { ref column } if column == "Responsible Team"));
    }

    #[test]
    fn test_bad_date_reports_row() {
        let bytes = csv(&[
            "Safety,Q1,Facilities,2024-01-01,,,,0,1",
            "Safety,Q2,Facilities,2024-01-02,,,,0,1",
            "Safety,Q3,Facilities,someday,,,,0,1",
        ]);
        let err = ingest(&bytes, &opts()).unwrap_err();
        assert!(matches!(err, IngestError::DateParse { row: 4, .. }));
    }
}
