use backlog_parser::{BacklogColumn, COLUMN_COUNT};
use chrono::{Datelike, NaiveDate};
use polars::prelude::*;

use crate::record::BacklogRecord;
use crate::table::BacklogTable;

pub const DISPLAY_DATE_FORMAT: &str = "%d %B %Y";

const POSITION_COLUMN: &str = "position";
const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;

/// Builds a frame with one column per field plus the input position of each
/// record. Dates are stored as polars `Date` so missing values stay null.
pub fn records_to_frame(records: &[BacklogRecord]) -> PolarsResult<DataFrame> {
    let mut cols: Vec<Column> = Vec::with_capacity(COLUMN_COUNT + 1);

    for column in BacklogColumn::ALL {
        let series = if column.is_date() {
            let days: Vec<Option<i32>> = records
                .iter()
                .map(|record| record.date(column).map(date_to_epoch_days))
                .collect();
            Series::new(column.canonical_name().into(), days).cast(&DataType::Date)?
        } else {
            let values: Vec<&str> = records
                .iter()
                .map(|record| record.text(column).unwrap_or_default())
                .collect();
            Series::new(column.canonical_name().into(), values)
        };
        cols.push(series.into());
    }

    let positions: Vec<i64> = (0..records.len() as i64).collect();
    cols.push(Series::new(POSITION_COLUMN.into(), positions).into());

    DataFrame::new(cols)
}

/// Epic ascending, then start date ascending with nulls last. Equal keys keep
/// their input order.
pub fn sort_frame(df: &DataFrame) -> PolarsResult<DataFrame> {
    df.sort(
        [
            BacklogColumn::Epic.canonical_name(),
            BacklogColumn::StartDate.canonical_name(),
        ],
        SortMultipleOptions::default()
            .with_order_descending(false)
            .with_nulls_last(true)
            .with_maintain_order(true),
    )
}

pub fn assemble(records: &[BacklogRecord]) -> PolarsResult<BacklogTable> {
    let rows = sorted_records(records)?.iter().map(render_row).collect();
    Ok(BacklogTable::new(rows))
}

/// Stable ordering of records by the same keys the frame sort uses.
pub fn sorted_records(records: &[BacklogRecord]) -> PolarsResult<Vec<BacklogRecord>> {
    Ok(sorted_positions(records)?
        .into_iter()
        .map(|position| records[position].clone())
        .collect())
}

fn sorted_positions(records: &[BacklogRecord]) -> PolarsResult<Vec<usize>> {
    let sorted = sort_frame(&records_to_frame(records)?)?;
    let positions = sorted.column(POSITION_COLUMN)?.i64()?;
    Ok(positions
        .into_no_null_iter()
        .map(|position| position as usize)
        .collect())
}

pub fn render_row(record: &BacklogRecord) -> [String; COLUMN_COUNT] {
    BacklogColumn::ALL.map(|column| {
        if column.is_date() {
            render_date(record.date(column))
        } else {
            record.text(column).unwrap_or_default().to_string()
        }
    })
}

pub fn render_date(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format(DISPLAY_DATE_FORMAT).to_string())
        .unwrap_or_default()
}

fn date_to_epoch_days(date: NaiveDate) -> i32 {
    date.num_days_from_ce() - UNIX_EPOCH_DAYS_FROM_CE
}
