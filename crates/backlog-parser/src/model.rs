use std::fmt;

use serde::{Deserialize, Serialize};

pub const COLUMN_COUNT: usize = 6;

pub const CANONICAL_HEADER: [&str; COLUMN_COUNT] = [
    "Epic",
    "Backlog",
    "PIC",
    "Status",
    "Start Date",
    "End Date",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BacklogColumn {
    Epic,
    Backlog,
    Pic,
    Status,
    StartDate,
    EndDate,
}

impl BacklogColumn {
    pub const ALL: [BacklogColumn; COLUMN_COUNT] = [
        BacklogColumn::Epic,
        BacklogColumn::Backlog,
        BacklogColumn::Pic,
        BacklogColumn::Status,
        BacklogColumn::StartDate,
        BacklogColumn::EndDate,
    ];

    pub fn canonical_name(&self) -> &'static str {
        CANONICAL_HEADER[self.index()]
    }

    pub fn index(&self) -> usize {
        match self {
            BacklogColumn::Epic => 0,
            BacklogColumn::Backlog => 1,
            BacklogColumn::Pic => 2,
            BacklogColumn::Status => 3,
            BacklogColumn::StartDate => 4,
            BacklogColumn::EndDate => 5,
        }
    }

    pub fn is_date(&self) -> bool {
        matches!(self, BacklogColumn::StartDate | BacklogColumn::EndDate)
    }
}

impl fmt::Display for BacklogColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.canonical_name())
    }
}

/// One data line of the model reply, split into the six canonical cells.
/// Cells are trimmed but otherwise untouched; dates are still free text here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRow {
    pub epic: String,
    pub backlog: String,
    pub pic: String,
    pub status: String,
    pub start_date: String,
    pub end_date: String,
}

impl RawRow {
    pub fn new(cells: [&str; COLUMN_COUNT]) -> Self {
        let [epic, backlog, pic, status, start_date, end_date] =
            cells.map(|cell| cell.trim().to_string());
        Self {
            epic,
            backlog,
            pic,
            status,
            start_date,
            end_date,
        }
    }

    pub fn get(&self, column: BacklogColumn) -> &str {
        match column {
            BacklogColumn::Epic => &self.epic,
            BacklogColumn::Backlog => &self.backlog,
            BacklogColumn::Pic => &self.pic,
            BacklogColumn::Status => &self.status,
            BacklogColumn::StartDate => &self.start_date,
            BacklogColumn::EndDate => &self.end_date,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawTable {
    /// Whether the first data line of the reply was taken as a header row.
    pub header_detected: bool,
    pub rows: Vec<RawRow>,
}

impl RawTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
