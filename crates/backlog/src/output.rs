use std::fs;
use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result};
use backlog_core::BacklogTable;
use comfy_table::{presets::UTF8_FULL, Table};

#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Boxed table for reading in a terminal
    #[default]
    Table,
    /// Tab-separated, ready to paste into a spreadsheet
    Tsv,
    Csv,
    /// Array of objects keyed by header name
    Json,
}

pub fn render(table: &BacklogTable, format: OutputFormat) -> Result<String> {
    let rendered = match format {
        OutputFormat::Table => {
            let mut view = Table::new();
            view.load_preset(UTF8_FULL);
            view.set_header(table.headers().iter());
            for row in table.rows() {
                view.add_row(row.iter());
            }
            format!("{view}\n")
        }
        OutputFormat::Tsv => table.to_tsv()?,
        OutputFormat::Csv => table.to_delimited(b',')?,
        OutputFormat::Json => {
            let mut json = serde_json::to_string_pretty(&table.to_json())?;
            json.push('\n');
            json
        }
    };
    Ok(rendered)
}

/// Writes to `path` when given, stdout otherwise.
pub fn emit(rendered: &str, path: Option<&Path>) -> Result<()> {
    match path {
        Some(path) => fs::write(path, rendered)
            .with_context(|| format!("failed to write output to {}", path.display())),
        None => {
            let mut stdout = io::stdout().lock();
            stdout
                .write_all(rendered.as_bytes())
                .and_then(|()| stdout.flush())
                .context("failed to write output to stdout")
        }
    }
}
