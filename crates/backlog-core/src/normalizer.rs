use backlog_parser::{BacklogColumn, DateLocalizer, RawRow, RawTable};
use chrono::NaiveDate;
use tracing::debug;

use crate::record::BacklogRecord;

/// Shape of a date after localization, e.g. `2 June 2025`.
pub const LOCALIZED_DATE_FORMAT: &str = "%d %B %Y";

/// Converts parsed rows into typed records. Dates that cannot be localized or
/// parsed become `None`; the row itself is always kept.
pub fn normalize(table: &RawTable, localizer: &DateLocalizer) -> Vec<BacklogRecord> {
    let mut unresolved = 0usize;

    let records: Vec<BacklogRecord> = table
        .rows
        .iter()
        .map(|row| {
            let record = normalize_row(row, localizer);
            unresolved += [BacklogColumn::StartDate, BacklogColumn::EndDate]
                .into_iter()
                .filter(|&column| record.date(column).is_none() && !row.get(column).is_empty())
                .count();
            record
        })
        .collect();

    if unresolved > 0 {
        debug!(
            rows = records.len(),
            unresolved, "some backlog dates were not recognized and were left empty"
        );
    }

    records
}

pub fn normalize_row(row: &RawRow, localizer: &DateLocalizer) -> BacklogRecord {
    BacklogRecord {
        epic: row.epic.clone(),
        backlog: row.backlog.clone(),
        pic: row.pic.clone(),
        status: row.status.clone(),
        start_date: normalize_date(row.get(BacklogColumn::StartDate), localizer),
        end_date: normalize_date(row.get(BacklogColumn::EndDate), localizer),
    }
}

pub fn normalize_date(text: &str, localizer: &DateLocalizer) -> Option<NaiveDate> {
    let localized = localizer.localize(text)?;
    NaiveDate::parse_from_str(&localized, LOCALIZED_DATE_FORMAT).ok()
}
