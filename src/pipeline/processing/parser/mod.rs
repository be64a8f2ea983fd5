//! Sheet decoding: raw bytes to loosely typed rows.
//!
//! Decoders only care about layout. Type coercion and validation happen in the
//! normalizer, so every decoder hands back the same `DecodedSheet` shape.

pub mod delimited;
pub mod workbook;

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::Path;
use tracing::{debug, warn};

use crate::error::Result;
use crate::observability::metrics;
use crate::types::{CellValue, DecodedSheet, RawRow};

pub use delimited::CsvDecoder;
pub use workbook::WorkbookDecoder;

/// Header name given to blank header cells, suffixed on repeats
pub const EMPTY_HEADER: &str = "__EMPTY";

/// Input container format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SheetFormat {
    /// Decide from the file extension, then from the leading bytes
    #[default]
    Auto,
    /// Comma or tab separated text
    Csv,
    /// Excel-family workbook (xlsx, xlsm, xlsb, xls, ods)
    Workbook,
}

impl SheetFormat {
    /// Format implied by a file name's extension; `Auto` when it says nothing.
    pub fn from_file_name(name: &str) -> Self {
        let ext = Path::new(name)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        match ext.as_deref() {
            Some("csv") | Some("tsv") | Some("txt") => SheetFormat::Csv,
            Some("xlsx") | Some("xlsm") | Some("xlsb") | Some("xls") | Some("xla")
            | Some("ods") => SheetFormat::Workbook,
            _ => SheetFormat::Auto,
        }
    }

    /// Sniff the container from magic bytes. Zip (xlsx, ods) and OLE (xls)
    /// archives are workbooks; everything else is treated as delimited text.
    pub fn sniff(bytes: &[u8]) -> Self {
        const ZIP_MAGIC: &[u8] = b"PK\x03\x04";
        const OLE_MAGIC: &[u8] = &[0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1];
        if bytes.starts_with(ZIP_MAGIC) || bytes.starts_with(OLE_MAGIC) {
            SheetFormat::Workbook
        } else {
            SheetFormat::Csv
        }
    }

    /// Collapse `Auto` into a concrete format
    pub fn resolve(self, file_name: &str, bytes: &[u8]) -> Self {
        match self {
            SheetFormat::Auto => match SheetFormat::from_file_name(file_name) {
                SheetFormat::Auto => SheetFormat::sniff(bytes),
                concrete => concrete,
            },
            concrete => concrete,
        }
    }
}

/// Turns a file's bytes into header-keyed rows
pub trait SheetDecoder: Send + Sync {
    fn decode(&self, bytes: &[u8]) -> Result<DecodedSheet>;

    /// Label used in logs and metrics
    fn format_name(&self) -> &'static str;
}

/// A wrapper that adds metrics to any decoder implementation
pub struct MetricsDecoder<D: SheetDecoder> {
    inner: D,
}

impl<D: SheetDecoder> MetricsDecoder<D> {
    pub fn new(inner: D) -> Self {
        Self { inner }
    }
}

impl<D: SheetDecoder> SheetDecoder for MetricsDecoder<D> {
    fn decode(&self, bytes: &[u8]) -> Result<DecodedSheet> {
        let start_time = std::time::Instant::now();
        metrics::decoder::bytes_processed(bytes.len());

        match self.inner.decode(bytes) {
            Ok(sheet) => {
                metrics::decoder::decode_success(self.inner.format_name());
                metrics::decoder::rows_decoded(sheet.rows.len() as u64);
                metrics::decoder::duration(start_time.elapsed().as_secs_f64());
                Ok(sheet)
            }
            Err(e) => {
                metrics::decoder::decode_error(self.inner.format_name());
                metrics::decoder::duration(start_time.elapsed().as_secs_f64());
                Err(e)
            }
        }
    }

    fn format_name(&self) -> &'static str {
        self.inner.format_name()
    }
}

/// Pick a decoder for an already resolved format
pub fn decoder_for(
    format: SheetFormat,
    file_name: &str,
    sheet: Option<String>,
) -> Box<dyn SheetDecoder> {
    match format {
        SheetFormat::Workbook => Box::new(MetricsDecoder::new(WorkbookDecoder::new(sheet))),
        SheetFormat::Csv | SheetFormat::Auto => {
            if sheet.is_some() {
                warn!("sheet name ignored for delimited input");
            }
            let is_tsv = file_name.to_ascii_lowercase().ends_with(".tsv");
            let decoder = if is_tsv {
                CsvDecoder::tab_separated()
            } else {
                CsvDecoder::default()
            };
            Box::new(MetricsDecoder::new(decoder))
        }
    }
}

/// Resolve the format, then decode with the matching decoder
pub fn decode_sheet(
    bytes: &[u8],
    format: SheetFormat,
    file_name: &str,
    sheet: Option<String>,
) -> Result<DecodedSheet> {
    let format = format.resolve(file_name, bytes);
    debug!(?format, file_name, "decoding sheet");
    decoder_for(format, file_name, sheet).decode(bytes)
}

/// Build a sheet from a cell grid whose first row is the header row.
/// Fully blank data rows are dropped; short rows are padded with `Empty`.
pub(crate) fn sheet_from_grid<I>(mut grid: I) -> DecodedSheet
where
    I: Iterator<Item = Vec<CellValue>>,
{
    let Some(header_cells) = grid.next() else {
        return DecodedSheet::default();
    };
    let headers = disambiguate_headers(header_cells.iter().map(CellValue::to_text));

    let mut rows = Vec::new();
    let mut skipped = 0usize;
    for cells in grid {
        let mut cells = cells.into_iter();
        let row = RawRow::from_pairs(
            headers
                .iter()
                .map(|h| (h.clone(), cells.next().unwrap_or_default())),
        );
        if row.is_blank() {
            skipped += 1;
            continue;
        }
        rows.push(row);
    }

    debug!(
        headers = headers.len(),
        rows = rows.len(),
        blank_rows_skipped = skipped,
        "decoded sheet grid"
    );
    DecodedSheet { headers, rows }
}

/// Blank headers become `__EMPTY`; repeats get `_1`, `_2`, ... appended.
fn disambiguate_headers<I>(raw: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut used: HashSet<String> = HashSet::new();
    let mut next_suffix: HashMap<String, usize> = HashMap::new();
    let mut out = Vec::new();

    for header in raw {
        let base = if header.is_empty() {
            EMPTY_HEADER.to_string()
        } else {
            header
        };
        let mut name = base.clone();
        while used.contains(&name) {
            let n = next_suffix.entry(base.clone()).or_insert(1);
            name = format!("{}_{}", base, n);
            *n += 1;
        }
        used.insert(name.clone());
        out.push(name);
    }
    out
}
