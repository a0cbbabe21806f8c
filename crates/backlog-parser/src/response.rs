use std::borrow::Cow;

use csv::StringRecord;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::errors::ResponseError;
use crate::model::{RawRow, RawTable, COLUMN_COUNT};

pub const FIELD_SEPARATOR: char = '|';

/// Substrings whose joint presence marks the first data line as a header.
const HEADER_MARKERS: [&str; 3] = ["Epic", "Backlog", "PIC"];

static CODE_FENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"```[A-Za-z0-9_+-]*").expect("code fence pattern is valid"));

/// Reads the pipe-delimited table a model returns for a backlog prompt.
///
/// The reply is treated as untrusted text: code fences and prose lines are
/// dropped, and the remaining lines must form a strict six column table. A
/// single malformed line fails the whole reply.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResponseParser;

impl ResponseParser {
    pub fn parse(&self, raw: &str) -> Result<RawTable, ResponseError> {
        if raw.trim().is_empty() {
            return Err(ResponseError::EmptyResponse);
        }

        let cleaned = strip_code_fences(raw);
        let data_lines = extract_data_lines(&cleaned);
        let Some(first_line) = data_lines.first() else {
            return Err(ResponseError::NoDataLines);
        };

        let header_detected = looks_like_header(first_line);
        if !header_detected {
            debug!("model response has no header row; applying canonical header");
        }

        let block = data_lines.join("\n");
        let mut reader = Self::reader_builder(header_detected).from_reader(block.as_bytes());

        if header_detected {
            let header = reader.headers().map_err(ResponseError::from_csv)?;
            Self::ensure_column_count(header, 1)?;
        }

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record.map_err(ResponseError::from_csv)?;
            let line = record
                .position()
                .map(|pos| pos.line())
                .unwrap_or_default();
            Self::ensure_column_count(&record, line)?;
            let cells: [&str; COLUMN_COUNT] =
                std::array::from_fn(|idx| record.get(idx).unwrap_or_default());
            rows.push(RawRow::new(cells));
        }

        if rows.is_empty() {
            return Err(ResponseError::EmptyData);
        }

        debug!(rows = rows.len(), header_detected, "parsed model response");
        Ok(RawTable {
            header_detected,
            rows,
        })
    }

    fn reader_builder(has_headers: bool) -> csv::ReaderBuilder {
        let mut builder = csv::ReaderBuilder::new();
        builder
            .delimiter(FIELD_SEPARATOR as u8)
            .has_headers(has_headers)
            .trim(csv::Trim::All);
        builder
    }

    fn ensure_column_count(record: &StringRecord, line: u64) -> Result<(), ResponseError> {
        if record.len() == COLUMN_COUNT {
            Ok(())
        } else {
            Err(ResponseError::ColumnCount {
                line,
                expected: COLUMN_COUNT,
                found: record.len(),
            })
        }
    }
}

pub fn strip_code_fences(raw: &str) -> Cow<'_, str> {
    CODE_FENCE.replace_all(raw, "")
}

/// Keeps the trimmed lines that carry at least one field separator.
pub fn extract_data_lines(text: &str) -> Vec<&str> {
    text.lines()
        .map(str::trim)
        .filter(|line| line.contains(FIELD_SEPARATOR))
        .collect()
}

// Substring match, so "Epic Name|Backlog Item|PIC" also counts as a header.
pub fn looks_like_header(line: &str) -> bool {
    HEADER_MARKERS.iter().all(|marker| line.contains(marker))
}
