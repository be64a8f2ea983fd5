use chrono::{NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

/// Loosely typed cell value as handed back by the sheet decoder.
/// Nothing past the row normalizer sees this type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub enum CellValue {
    #[default]
    Empty,
    Text(String),
    Number(f64),
    Date(NaiveDateTime),
}

impl CellValue {
    /// True for missing cells and text that is only whitespace
    pub fn is_blank(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// Display text of the cell, used for verbatim pass-through fields
    pub fn to_text(&self) -> String {
        match self {
            CellValue::Empty => String::new(),
            CellValue::Text(s) => s.clone(),
            CellValue::Number(n) => format_number(*n),
            CellValue::Date(dt) => {
                if dt.time() == NaiveTime::MIN {
                    dt.format("%Y-%m-%d").to_string()
                } else {
                    dt.format("%Y-%m-%d %H:%M:%S").to_string()
                }
            }
        }
    }
}

/// Integral floats print without a fractional part, like spreadsheet UIs do.
fn format_number(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

/// One decoded sheet row: header string -> cell, in sheet column order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawRow {
    cells: Vec<(String, CellValue)>,
}

impl RawRow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pairs<I, K>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, CellValue)>,
        K: Into<String>,
    {
        Self {
            cells: pairs.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }

    pub fn push(&mut self, header: impl Into<String>, value: CellValue) {
        self.cells.push((header.into(), value));
    }

    /// Cell under `header`; absent headers read as `Empty`.
    pub fn get(&self, header: &str) -> &CellValue {
        static EMPTY: CellValue = CellValue::Empty;
        self.cells
            .iter()
            .find(|(h, _)| h == header)
            .map(|(_, v)| v)
            .unwrap_or(&EMPTY)
    }

    pub fn headers(&self) -> impl Iterator<Item = &str> {
        self.cells.iter().map(|(h, _)| h.as_str())
    }

    pub fn is_blank(&self) -> bool {
        self.cells.iter().all(|(_, v)| v.is_blank())
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// Output of the decoding collaborator
#[derive(Debug, Clone, Default)]
pub struct DecodedSheet {
    /// Header row after blank/duplicate disambiguation
    pub headers: Vec<String>,
    /// Non-blank data rows in sheet order
    pub rows: Vec<RawRow>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_number_display_drops_integral_fraction() {
        assert_eq!(CellValue::Number(10.0).to_text(), "10");
        assert_eq!(CellValue::Number(-2.5).to_text(), "-2.5");
    }

    #[test]
    fn test_date_display() {
        let d = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        assert_eq!(
            CellValue::Date(d.and_hms_opt(0, 0, 0).unwrap()).to_text(),
            "2024-03-09"
        );
        assert_eq!(
            CellValue::Date(d.and_hms_opt(13, 5, 0).unwrap()).to_text(),
            "2024-03-09 13:05:00"
        );
    }

    #[test]
    fn test_raw_row_lookup_and_blankness() {
        let row = RawRow::from_pairs([
            ("Category", CellValue::Text("Safety".into())),
            ("Status", CellValue::Text("   ".into())),
        ]);
        assert_eq!(row.get("Category"), &CellValue::Text("Safety".into()));
        assert_eq!(row.get("Missing"), &CellValue::Empty);
        assert!(!row.is_blank());
        assert_eq!(row.headers().collect::<Vec<_>>(), vec!["Category", "Status"]);

        let blank = RawRow::from_pairs([("A", CellValue::Empty), ("B", CellValue::Text(" ".into()))]);
        assert!(blank.is_blank());
    }
}
