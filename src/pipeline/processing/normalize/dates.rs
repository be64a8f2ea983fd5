use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime};

use crate::types::CellValue;

const MS_PER_DAY: i64 = 86_400_000;

/// Largest serial Excel accepts (9999-12-31)
const MAX_EXCEL_SERIAL: f64 = 2_958_465.0;

// Tried in order; first match wins.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%m-%d-%Y",
    "%m/%d/%y",
    "%B %d, %Y",
    "%B %d %Y",
    "%d %B %Y",
    "%d-%B-%Y",
];

/// Interpret a cell as a point in time.
///
/// `None` means the cell holds something that is not a date. Callers decide
/// whether an empty cell is acceptable before calling this.
pub fn parse_date_cell(cell: &CellValue) -> Option<NaiveDateTime> {
    match cell {
        CellValue::Empty => None,
        CellValue::Date(dt) => Some(*dt),
        CellValue::Number(serial) => from_excel_serial(*serial),
        CellValue::Text(s) => parse_date_text(s),
    }
}

/// Excel 1900 date system. Serials before 60 sit ahead of the phantom
/// 1900-02-29 and need a base one day later.
pub fn from_excel_serial(serial: f64) -> Option<NaiveDateTime> {
    if !serial.is_finite() || serial <= 0.0 || serial > MAX_EXCEL_SERIAL + 1.0 {
        return None;
    }
    let base = if serial < 60.0 {
        NaiveDate::from_ymd_opt(1899, 12, 31)?
    } else {
        NaiveDate::from_ymd_opt(1899, 12, 30)?
    };
    let whole_days = serial.trunc() as i64;
    let ms = ((serial - serial.trunc()) * MS_PER_DAY as f64).round() as i64;
    let day = base.checked_add_signed(Duration::days(whole_days))?;
    day.and_hms_opt(0, 0, 0)?
        .checked_add_signed(Duration::milliseconds(ms))
}

pub fn parse_date_text(raw: &str) -> Option<NaiveDateTime> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_utc());
    }

    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .filter(plausible_year)
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .filter_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
                .find(|d| (1000..=9999).contains(&d.year()))
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

/// `%Y` happily reads two-digit years; those belong to `%y`.
fn plausible_year(dt: &NaiveDateTime) -> bool {
    (1000..=9999).contains(&dt.year())
}

/// Whole days from `found` to `closed`, rounded up. Negative when the closure
/// predates the finding.
pub fn days_between_ceil(found: NaiveDateTime, closed: NaiveDateTime) -> i64 {
    let ms = (closed - found).num_milliseconds();
    let q = ms / MS_PER_DAY;
    if ms % MS_PER_DAY > 0 {
        q + 1
    } else {
        q
    }
}
