//! Column resolution: required logical columns to the headers a sheet actually uses.

use std::collections::HashMap;
use tracing::debug;

use crate::constants::REQUIRED_COLUMNS;
use crate::error::{IngestError, Result};

/// Logical column name -> actual header string found in the sheet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderMap {
    columns: HashMap<&'static str, String>,
}

impl HeaderMap {
    /// Actual header for a logical column. Only the required columns are
    /// ever resolved, so asking for anything else yields `None`.
    pub fn get(&self, logical: &str) -> Option<&str> {
        self.columns.get(logical).map(String::as_str)
    }

    /// Same as `get` for columns known to be in the required schema
    pub fn header(&self, logical: &'static str) -> &str {
        self.get(logical).unwrap_or(logical)
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

fn header_key(s: &str) -> String {
    s.trim().to_lowercase()
}

/// Resolve every required column against `headers`, in schema order.
///
/// Matching trims surrounding whitespace and ignores case on both sides. The
/// first header in sheet order wins when several match. Fails on the first
/// required column without a match.
pub fn resolve_columns<'a, I>(headers: I) -> Result<HeaderMap>
where
    I: IntoIterator<Item = &'a str>,
{
    let headers: Vec<&str> = headers.into_iter().collect();
    let mut columns = HashMap::with_capacity(REQUIRED_COLUMNS.len());

    for logical in REQUIRED_COLUMNS {
        let key = header_key(logical);
        let actual = headers
            .iter()
            .find(|h| header_key(h) == key)
            .ok_or_else(|| IngestError::Schema {
                column: logical.to_string(),
            })?;
        if *actual != logical {
            debug!(logical, actual = %actual, "column matched loosely");
        }
        columns.insert(logical, actual.to_string());
    }

    Ok(HeaderMap { columns })
}
