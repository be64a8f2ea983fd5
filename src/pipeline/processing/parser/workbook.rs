use calamine::{open_workbook_auto_from_rs, Data, Reader};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use std::io::Cursor;
use tracing::{debug, info};

use super::{sheet_from_grid, SheetDecoder};
use crate::error::{IngestError, Result};
use crate::types::{CellValue, DecodedSheet};

/// Excel-family workbook decoder (xlsx, xlsm, xlsb, xls, ods).
/// Reads the named worksheet, or the first one when no name is configured.
#[derive(Debug, Clone, Default)]
pub struct WorkbookDecoder {
    pub sheet: Option<String>,
}

impl WorkbookDecoder {
    pub fn new(sheet: Option<String>) -> Self {
        Self { sheet }
    }
}

impl SheetDecoder for WorkbookDecoder {
    fn decode(&self, bytes: &[u8]) -> Result<DecodedSheet> {
        debug!("WorkbookDecoder: start bytes_len={}", bytes.len());
        let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))?;

        let range = match &self.sheet {
            Some(name) => {
                if !workbook.sheet_names().iter().any(|n| n == name) {
                    return Err(IngestError::Decode(format!(
                        "worksheet \"{}\" not found",
                        name
                    )));
                }
                workbook.worksheet_range(name)?
            }
            None => workbook.worksheet_range_at(0).ok_or(IngestError::EmptyInput)??,
        };

        info!(
            "WorkbookDecoder: worksheet={} size={:?}",
            self.sheet.as_deref().unwrap_or("<first>"),
            range.get_size()
        );

        let grid = range
            .rows()
            .map(|row| row.iter().map(cell_from_data).collect::<Vec<_>>());
        Ok(sheet_from_grid(grid))
    }

    fn format_name(&self) -> &'static str {
        "workbook"
    }
}

/// Map a calamine cell onto the decoder's cell model
fn cell_from_data(data: &Data) -> CellValue {
    match data {
        Data::Empty => CellValue::Empty,
        Data::String(s) if s.is_empty() => CellValue::Empty,
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Float(f) => CellValue::Number(*f),
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Bool(b) => CellValue::Text(if *b { "TRUE" } else { "FALSE" }.to_string()),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(naive) => CellValue::Date(naive),
            None => CellValue::Number(dt.as_f64()),
        },
        Data::DateTimeIso(s) => parse_iso(s)
            .map(CellValue::Date)
            .unwrap_or_else(|| CellValue::Text(s.clone())),
        Data::DurationIso(s) => CellValue::Text(s.clone()),
        Data::Error(e) => CellValue::Text(format!("#{:?}", e)),
    }
}

/// ODS stores dates as ISO strings
fn parse_iso(s: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.naive_utc()))
        .or_else(|| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}
