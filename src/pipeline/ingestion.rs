use std::fs;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord};
use tracing::info;

use crate::error::{PipelineError, Result};

/// Untyped slice of the source file: header names plus raw records.
#[derive(Debug)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<StringRecord>,
}

/// Reads the postings CSV into a [`RawTable`].
///
/// The file must exist and contain at least one data row beyond the header.
/// A leading UTF-8 byte-order marker is tolerated.
pub fn read_table(path: &Path) -> Result<RawTable> {
    if !path.exists() {
        return Err(PipelineError::SourceNotFound(path.to_path_buf()));
    }

    info!(path = %path.display(), "Loading postings data");
    let content = fs::read_to_string(path)?;
    let content = content.strip_prefix('\u{feff}').unwrap_or(&content);

    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(content.as_bytes());

    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        rows.push(record?);
    }

    if rows.is_empty() {
        return Err(PipelineError::EmptySource(path.to_path_buf()));
    }

    Ok(RawTable { headers, rows })
}
