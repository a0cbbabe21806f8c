use backlog_parser::BacklogColumn;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A backlog item after date normalization. Missing dates stay `None` until
/// the table is rendered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BacklogRecord {
    pub epic: String,
    pub backlog: String,
    pub pic: String,
    pub status: String,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl BacklogRecord {
    pub fn text(&self, column: BacklogColumn) -> Option<&str> {
        match column {
            BacklogColumn::Epic => Some(&self.epic),
            BacklogColumn::Backlog => Some(&self.backlog),
            BacklogColumn::Pic => Some(&self.pic),
            BacklogColumn::Status => Some(&self.status),
            BacklogColumn::StartDate | BacklogColumn::EndDate => None,
        }
    }

    pub fn date(&self, column: BacklogColumn) -> Option<NaiveDate> {
        match column {
            BacklogColumn::StartDate => self.start_date,
            BacklogColumn::EndDate => self.end_date,
            _ => None,
        }
    }
}
