use crate::types::CellValue;

/// Read an integer out of a cell, truncating toward zero.
///
/// Blank text counts as zero. `None` means the cell could not be read as a
/// number at all, or its value does not fit in an `i64`, and the caller
/// should fall back to its default.
pub fn coerce_integer(cell: &CellValue) -> Option<i64> {
    match cell {
        CellValue::Number(n) => truncate(*n),
        CellValue::Text(s) => {
            let s = s.trim();
            if s.is_empty() {
                return Some(0);
            }
            s.parse::<f64>().ok().and_then(truncate)
        }
        CellValue::Empty | CellValue::Date(_) => None,
    }
}

// -2^63 is exact in f64; 2^63 is one past i64::MAX
const I64_LOWER: f64 = -9_223_372_036_854_775_808.0;
const I64_UPPER: f64 = 9_223_372_036_854_775_808.0;

fn truncate(n: f64) -> Option<i64> {
    let t = n.trunc();
    if t.is_finite() && t >= I64_LOWER && t < I64_UPPER {
        Some(t as i64)
    } else {
        None
    }
}
