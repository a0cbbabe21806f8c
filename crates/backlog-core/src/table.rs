use backlog_parser::{BacklogColumn, CANONICAL_HEADER, COLUMN_COUNT};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::Result;

/// The rendered result of one pipeline run: the canonical header plus rows of
/// display-ready strings. Missing values are already empty strings here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BacklogTable {
    headers: [&'static str; COLUMN_COUNT],
    rows: Vec<[String; COLUMN_COUNT]>,
}

impl BacklogTable {
    pub fn new(rows: Vec<[String; COLUMN_COUNT]>) -> Self {
        Self {
            headers: CANONICAL_HEADER,
            rows,
        }
    }

    pub fn headers(&self) -> &[&'static str; COLUMN_COUNT] {
        &self.headers
    }

    pub fn rows(&self) -> &[[String; COLUMN_COUNT]] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column(&self, column: BacklogColumn) -> impl Iterator<Item = &str> + '_ {
        self.rows.iter().map(move |row| row[column.index()].as_str())
    }

    /// Header line plus one line per row, fields joined by tabs.
    pub fn to_tsv(&self) -> Result<String> {
        self.to_delimited(b'\t')
    }

    pub fn to_delimited(&self, delimiter: u8) -> Result<String> {
        let mut writer = csv::WriterBuilder::new()
            .delimiter(delimiter)
            .terminator(csv::Terminator::Any(b'\n'))
            .from_writer(Vec::new());

        writer.write_record(self.headers)?;
        for row in &self.rows {
            writer.write_record(row)?;
        }

        let bytes = writer
            .into_inner()
            .map_err(|err| csv::Error::from(err.into_error()))?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    /// One JSON object per row keyed by header name, in header order.
    pub fn to_json(&self) -> Value {
        let rows = self
            .rows
            .iter()
            .map(|row| {
                let object: Map<String, Value> = self
                    .headers
                    .iter()
                    .zip(row.iter())
                    .map(|(header, value)| (header.to_string(), Value::String(value.clone())))
                    .collect();
                Value::Object(object)
            })
            .collect();
        Value::Array(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(cells: [&str; COLUMN_COUNT]) -> [String; COLUMN_COUNT] {
        cells.map(str::to_string)
    }

    fn sample() -> BacklogTable {
        BacklogTable::new(vec![
            row(["Auth", "Fix login bug", "Alice", "In Progress", "02 June 2025", "05 June 2025"]),
            row(["Infra", "Set up CI", "Bob", "To Do", "", ""]),
        ])
    }

    #[test]
    fn tsv_has_header_and_one_line_per_row() -> anyhow::Result<()> {
        let tsv = sample().to_tsv()?;
        assert_eq!(
            tsv,
            "Epic\tBacklog\tPIC\tStatus\tStart Date\tEnd Date\n\
             Auth\tFix login bug\tAlice\tIn Progress\t02 June 2025\t05 June 2025\n\
             Infra\tSet up CI\tBob\tTo Do\t\t\n"
        );
        Ok(())
    }

    #[test]
    fn tsv_quotes_cells_containing_tabs() -> anyhow::Result<()> {
        let table = BacklogTable::new(vec![row(["Auth", "a\tb", "", "", "", ""])]);
        let tsv = table.to_tsv()?;
        assert!(tsv.ends_with("Auth\t\"a\tb\"\t\t\t\t\n"));
        Ok(())
    }

    #[test]
    fn json_rows_are_keyed_by_header() {
        let json = sample().to_json();
        assert_eq!(json[0]["Epic"], "Auth");
        assert_eq!(json[0]["Start Date"], "02 June 2025");
        assert_eq!(json[1]["End Date"], "");
        assert_eq!(json.as_array().map(Vec::len), Some(2));
    }

    #[test]
    fn column_iterates_display_values() {
        let table = sample();
        assert_eq!(
            table.column(BacklogColumn::Pic).collect::<Vec<_>>(),
            vec!["Alice", "Bob"]
        );
        assert_eq!(table.headers(), &CANONICAL_HEADER);
    }
}
