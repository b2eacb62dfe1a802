//! CSV Codec
//!
//! Reads price exports into `RawTable` and writes tables back out.

use anyhow::{Context, Result};
use csv::{ReaderBuilder, WriterBuilder};
use std::io::Read;

use crate::domain::entities::price_row::RawTable;

const UTF8_BOM: char = '\u{feff}';

/// Parse CSV with a header row
///
/// Records may be shorter or longer than the header; the validator pads and trims them.
pub fn read_raw_table<R: Read>(reader: R) -> Result<RawTable> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers: Vec<String> = reader
        .headers()
        .context("Failed to read CSV header")?
        .iter()
        .enumerate()
        .map(|(i, h)| {
            if i == 0 {
                h.trim_start_matches(UTF8_BOM).to_string()
            } else {
                h.to_string()
            }
        })
        .collect();

    if headers.iter().all(|h| h.trim().is_empty()) {
        anyhow::bail!("CSV has no header row");
    }

    let mut records = Vec::new();
    for (line, record) in reader.records().enumerate() {
        let record = record.with_context(|| format!("Failed to parse CSV record {}", line + 1))?;
        records.push(record.iter().map(str::to_string).collect());
    }

    Ok(RawTable::new(headers, records))
}

/// Serialize a header row and records to CSV bytes
///
/// Records may be wider than the header.
pub fn write_records(headers: &[String], records: &[Vec<String>]) -> Result<Vec<u8>> {
    let mut writer = WriterBuilder::new().flexible(true).from_writer(Vec::new());
    writer
        .write_record(headers)
        .context("Failed to write CSV header")?;
    for record in records {
        writer
            .write_record(record)
            .context("Failed to write CSV record")?;
    }
    writer
        .into_inner()
        .map_err(|e| anyhow::anyhow!("Failed to flush CSV writer: {}", e))
}
