//! Row normalization: one decoded row in, one validated `Finding` out.
//!
//! Dates are strict (a bad date fails the whole ingestion). Numbers are lenient
//! and quietly fall back to zero.

pub mod coerce;
pub mod dates;

use chrono::NaiveDateTime;
use tracing::{debug, warn};

use crate::constants::*;
use crate::domain::{Finding, FindingStatus};
use crate::error::{IngestError, Result};
use crate::observability::metrics;
use crate::pipeline::processing::columns::HeaderMap;
use crate::types::{CellValue, RawRow};

pub use coerce::coerce_integer;
pub use dates::{days_between_ceil, parse_date_cell};

/// Trait for normalizing decoded rows into findings
pub trait Normalizer: Send + Sync {
    /// `index` is the row's 0-based position among the sheet's data rows
    fn normalize(&self, row: &RawRow, columns: &HeaderMap, index: usize) -> Result<Finding>;
}

/// The audit-sheet rules: strict dates, status inference, lenient numbers
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultNormalizer;

impl DefaultNormalizer {
    pub fn new() -> Self {
        Self
    }

    fn cell<'r>(row: &'r RawRow, columns: &HeaderMap, logical: &'static str) -> &'r CellValue {
        row.get(columns.header(logical))
    }

    fn required_date(
        row: &RawRow,
        columns: &HeaderMap,
        logical: &'static str,
        index: usize,
    ) -> Result<NaiveDateTime> {
        parse_date_cell(Self::cell(row, columns, logical)).ok_or_else(|| date_error(logical, index))
    }

    /// Blank cells and a bare 0, numeric or textual, mean "no date"
    fn optional_date(
        row: &RawRow,
        columns: &HeaderMap,
        logical: &'static str,
        index: usize,
    ) -> Result<Option<NaiveDateTime>> {
        let cell = Self::cell(row, columns, logical);
        if cell.is_blank() || is_zero(cell) {
            return Ok(None);
        }
        parse_date_cell(cell)
            .map(Some)
            .ok_or_else(|| date_error(logical, index))
    }

    fn integer(row: &RawRow, columns: &HeaderMap, logical: &'static str, index: usize) -> i64 {
        let cell = Self::cell(row, columns, logical);
        coerce_integer(cell).unwrap_or_else(|| {
            if !matches!(cell, CellValue::Empty) {
                debug!(row = index + HEADER_ROW_OFFSET, field = logical, "non-numeric value defaulted to 0");
            }
            metrics::normalize::numeric_defaulted(logical);
            0
        })
    }
}

fn is_zero(cell: &CellValue) -> bool {
    match cell {
        CellValue::Number(n) => *n == 0.0,
        CellValue::Text(s) => s.trim().parse::<f64>() == Ok(0.0),
        _ => false,
    }
}

fn date_error(logical: &str, index: usize) -> IngestError {
    IngestError::DateParse {
        row: index + HEADER_ROW_OFFSET,
        field: logical.to_string(),
    }
}

/// Status from the sheet if it names one, otherwise inferred from the dates.
/// A reopen date outranks a closed date.
pub fn determine_status(
    raw: &CellValue,
    closed: Option<NaiveDateTime>,
    reopened: Option<NaiveDateTime>,
) -> FindingStatus {
    if let CellValue::Text(s) = raw {
        if let Some(status) = FindingStatus::from_label(s) {
            return status;
        }
    }

    let inferred = if reopened.is_some() {
        FindingStatus::ReOpened
    } else if closed.is_some() {
        FindingStatus::ClosedTimely
    } else {
        FindingStatus::Open
    };
    metrics::normalize::status_inferred(inferred.label());
    inferred
}

impl Normalizer for DefaultNormalizer {
    fn normalize(&self, row: &RawRow, columns: &HeaderMap, index: usize) -> Result<Finding> {
        let issue_finding_date = Self::required_date(row, columns, ISSUE_FINDING_DATE, index)?;
        let issue_closed_date = Self::optional_date(row, columns, ISSUE_CLOSED_DATE, index)?;
        let reopen_date = Self::optional_date(row, columns, REOPEN_DATES, index)?;

        let days_to_close = issue_closed_date.map(|closed| {
            let days = days_between_ceil(issue_finding_date, closed);
            if days < 0 {
                warn!(
                    row = index + HEADER_ROW_OFFSET,
                    days, "issue closed before it was found"
                );
                metrics::normalize::negative_duration();
            }
            days
        });

        let status = determine_status(
            Self::cell(row, columns, STATUS),
            issue_closed_date,
            reopen_date,
        );

        metrics::normalize::row_processed();

        Ok(Finding {
            id: index,
            category: Self::cell(row, columns, CATEGORY).to_text(),
            question: Self::cell(row, columns, QUESTION).to_text(),
            responsible_team: Self::cell(row, columns, RESPONSIBLE_TEAM).to_text(),
            issue_finding_date,
            issue_closed_date,
            reopen_date,
            status,
            points: Self::integer(row, columns, ACCUMULATED_POINTS, index),
            reopen_count: Self::integer(row, columns, REOPEN_COUNT, index),
            days_to_close,
        })
    }
}

/// Normalize every row in order, stopping at the first failure
pub fn normalize_rows<N: Normalizer + ?Sized>(
    normalizer: &N,
    rows: &[RawRow],
    columns: &HeaderMap,
) -> Result<Vec<Finding>> {
    rows.iter()
        .enumerate()
        .map(|(index, row)| normalizer.normalize(row, columns, index))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::processing::columns::resolve_columns;
    use chrono::NaiveDate;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    fn text(s: &str) -> CellValue {
        CellValue::Text(s.to_string())
    }

    fn columns() -> HeaderMap {
        resolve_columns(REQUIRED_COLUMNS).unwrap()
    }

    fn row(overrides: &[(&str, CellValue)]) -> RawRow {
        let mut row = RawRow::new();
        for logical in REQUIRED_COLUMNS {
            let value = overrides
                .iter()
                .find(|(k, _)| *k == logical)
                .map(|(_, v)| v.clone())
                .unwrap_or_else(|| match logical {
                    CATEGORY => text("Safety"),
                    QUESTION => text("Exits marked?"),
                    RESPONSIBLE_TEAM => text("Facilities"),
                    ISSUE_FINDING_DATE => text("2024-01-01"),
                    ACCUMULATED_POINTS => CellValue::Number(10.0),
                    REOPEN_COUNT => CellValue::Number(0.0),
                    _ => CellValue::Empty,
                });
            row.push(logical, value);
        }
        row
    }

    fn normalize(row: &RawRow, index: usize) -> Result<Finding> {
        DefaultNormalizer::new().normalize(row, &columns(), index)
    }

    #[test]
    fn test_open_when_no_status_and_no_dates() {
        let finding = normalize(&row(&[]), 0).unwrap();
        assert_eq!(finding.status, FindingStatus::Open);
        assert_eq!(finding.issue_closed_date, None);
        assert_eq!(finding.days_to_close, None);
        assert_eq!(finding.category, "Safety");
        assert_eq!(finding.points, 10);
    }

    #[test]
    fn test_closed_date_infers_closed_timely() {
        let finding = normalize(&row(&[(ISSUE_CLOSED_DATE, text("2024-01-05"))]), 0).unwrap();
        assert_eq!(finding.status, FindingStatus::ClosedTimely);
        assert_eq!(finding.issue_closed_date, Some(ymd(2024, 1, 5)));
        assert_eq!(finding.days_to_close, Some(4));
    }

    #[test]
    fn test_reopen_date_outranks_closed_date() {
        let finding = normalize(
            &row(&[
                (ISSUE_CLOSED_DATE, text("2024-01-05")),
                (REOPEN_DATES, text("2024-02-01")),
            ]),
            0,
        )
        .unwrap();
        assert_eq!(finding.status, FindingStatus::ReOpened);
        assert_eq!(finding.reopen_date, Some(ymd(2024, 2, 1)));
    }

    #[test]
    fn test_explicit_status_wins_over_inference() {
        let finding = normalize(
            &row(&[
                (STATUS, text("  closed - late ")),
                (ISSUE_CLOSED_DATE, text("2024-01-05")),
            ]),
            0,
        )
        .unwrap();
        assert_eq!(finding.status, FindingStatus::ClosedLate);

        let finding = normalize(&row(&[(STATUS, text("REOPENED"))]), 0).unwrap();
        assert_eq!(finding.status, FindingStatus::ReOpened);
    }

    #[test]
    fn test_unknown_status_falls_back_to_inference() {
        let finding = normalize(&row(&[(STATUS, text("Pending"))]), 0).unwrap();
        assert_eq!(finding.status, FindingStatus::Open);
    }

    #[test]
    fn test_non_numeric_points_default_to_zero() {
        let finding = normalize(
            &row(&[
                (ACCUMULATED_POINTS, text("lots")),
                (REOPEN_COUNT, CellValue::Empty),
            ]),
            0,
        )
        .unwrap();
        assert_eq!(finding.points, 0);
        assert_eq!(finding.reopen_count, 0);

        let finding = normalize(&row(&[(ACCUMULATED_POINTS, text(" -7.9 "))]), 0).unwrap();
        assert_eq!(finding.points, -7);
    }

    #[test]
    fn test_bad_finding_date_reports_human_row_number() {
        let err = normalize(&row(&[(ISSUE_FINDING_DATE, text("yesterday"))]), 2).unwrap_err();
        assert!(matches!(
            err,
            IngestError::DateParse { row: 4, ref field } if field == ISSUE_FINDING_DATE
        ));
        assert_eq!(
            err.to_string(),
            "Invalid date format in row 4 for 'Issue Finding Date'."
        );
    }

    #[test]
    fn test_missing_finding_date_is_an_error() {
        let err = normalize(&row(&[(ISSUE_FINDING_DATE, CellValue::Empty)]), 0).unwrap_err();
        assert_eq!(err.kind(), "date_parse");
    }

    #[test]
    fn test_bad_optional_dates_are_errors() {
        let err = normalize(&row(&[(REOPEN_DATES, text("soon"))]), 0).unwrap_err();
        assert!(matches!(err, IngestError::DateParse { ref field, .. } if field == REOPEN_DATES));
    }

    #[test]
    fn test_zero_and_blank_optional_dates_are_absent() {
        let finding = normalize(
            &row(&[
                (ISSUE_CLOSED_DATE, CellValue::Number(0.0)),
                (REOPEN_DATES, text("   ")),
            ]),
            0,
        )
        .unwrap();
        assert_eq!(finding.issue_closed_date, None);
        assert_eq!(finding.reopen_date, None);
    }

    #[test]
    fn test_textual_zero_optional_dates_are_absent() {
        let finding = normalize(
            &row(&[(ISSUE_CLOSED_DATE, text("0")), (REOPEN_DATES, text(" 0.0 "))]),
            0,
        )
        .unwrap();
        assert_eq!(finding.issue_closed_date, None);
        assert_eq!(finding.reopen_date, None);
        assert_eq!(finding.days_to_close, None);
        assert_eq!(finding.status, FindingStatus::Open);
    }

    #[test]
    fn test_negative_duration_is_preserved() {
        let finding = normalize(&row(&[(ISSUE_CLOSED_DATE, text("2023-12-30"))]), 0).unwrap();
        assert_eq!(finding.days_to_close, Some(-2));
    }

    #[test]
    fn test_excel_serial_dates() {
        let finding = normalize(
            &row(&[
                (ISSUE_FINDING_DATE, CellValue::Number(45292.0)),
                (ISSUE_CLOSED_DATE, CellValue::Number(45296.0)),
            ]),
            0,
        )
        .unwrap();
        assert_eq!(finding.issue_finding_date, ymd(2024, 1, 1));
        assert_eq!(finding.days_to_close, Some(4));
    }

    #[test]
    fn test_normalize_rows_is_fail_fast() {
        let rows = vec![
            row(&[]),
            row(&[(ISSUE_FINDING_DATE, text("bad"))]),
            row(&[(ISSUE_FINDING_DATE, text("also bad"))]),
        ];
        let err = normalize_rows(&DefaultNormalizer, &rows, &columns()).unwrap_err();
        assert!(matches!(err, IngestError::DateParse { row: 3, .. }));

        let ok = normalize_rows(&DefaultNormalizer, &rows[..1], &columns()).unwrap();
        assert_eq!(ok.len(), 1);
        assert_eq!(ok[0].id, 0);
    }

    #[test]
    fn test_determine_status_ignores_non_text() {
        assert_eq!(
            determine_status(&CellValue::Number(1.0), None, None),
            FindingStatus::Open
        );
    }
}
