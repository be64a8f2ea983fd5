use csv::ReaderBuilder;
use tracing::debug;

use super::{sheet_from_grid, SheetDecoder};
use crate::error::Result;
use crate::types::{CellValue, DecodedSheet};

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

/// Delimited text decoder. Every non-empty field is `Text`; numbers and dates
/// are recognized later by the normalizer.
#[derive(Debug, Clone)]
pub struct CsvDecoder {
    pub delimiter: u8,
}

impl Default for CsvDecoder {
    fn default() -> Self {
        Self { delimiter: b',' }
    }
}

impl CsvDecoder {
    pub fn tab_separated() -> Self {
        Self { delimiter: b'\t' }
    }
}

impl SheetDecoder for CsvDecoder {
    fn decode(&self, bytes: &[u8]) -> Result<DecodedSheet> {
        let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
        debug!("CsvDecoder: start bytes_len={}", bytes.len());

        let mut rdr = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .delimiter(self.delimiter)
            .from_reader(bytes);

        let mut grid = Vec::new();
        for record in rdr.records() {
            let record = record?;
            grid.push(
                record
                    .iter()
                    .map(|field| {
                        if field.is_empty() {
                            CellValue::Empty
                        } else {
                            CellValue::Text(field.to_string())
                        }
                    })
                    .collect::<Vec<_>>(),
            );
        }

        Ok(sheet_from_grid(grid.into_iter()))
    }

    fn format_name(&self) -> &'static str {
        "csv"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_csv_with_bom_and_quotes() {
        let data = b"\xEF\xBB\xBFCategory,Question\r\nSafety,\"Are exits, marked?\"\r\n,\r\nHR,Training\r\n";
        let sheet = CsvDecoder::default().decode(data).unwrap();
        assert_eq!(sheet.headers, vec!["Category", "Question"]);
        assert_eq!(sheet.rows.len(), 2);
        assert_eq!(
            sheet.rows[0].get("Question"),
            &CellValue::Text("Are exits, marked?".to_string())
        );
        assert_eq!(sheet.rows[1].get("Category"), &CellValue::Text("HR".to_string()));
    }

    #[test]
    fn test_decode_tab_separated() {
        let data = b"A\tB\n1\t\n";
        let sheet = CsvDecoder::tab_separated().decode(data).unwrap();
        assert_eq!(sheet.headers, vec!["A", "B"]);
        assert_eq!(sheet.rows[0].get("A"), &CellValue::Text("1".to_string()));
        assert_eq!(sheet.rows[0].get("B"), &CellValue::Empty);
    }

    #[test]
    fn test_header_only_csv_has_no_rows() {
        let sheet = CsvDecoder::default().decode(b"A,B\n").unwrap();
        assert_eq!(sheet.headers.len(), 2);
        assert!(sheet.rows.is_empty());
    }

    #[test]
    fn test_invalid_utf8_is_decode_error() {
        let err = CsvDecoder::default().decode(b"A\n\xFF\xFE\n").unwrap_err();
        assert_eq!(err.kind(), "decode");
    }
}
