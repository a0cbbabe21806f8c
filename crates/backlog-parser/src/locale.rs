//! Month-name tables and the date localizer built on them.
//!
//! Each locale is a plain lookup table from lower-cased local month names to
//! canonical English names. Supporting a new locale means adding a table, the
//! lookup itself never changes.

#[derive(Debug, PartialEq, Eq)]
pub struct MonthTable {
    pub locale: &'static str,
    pub months: [(&'static str, &'static str); 12],
}

pub const INDONESIAN_MONTHS: MonthTable = MonthTable {
    locale: "id",
    months: [
        ("januari", "January"),
        ("februari", "February"),
        ("maret", "March"),
        ("april", "April"),
        ("mei", "May"),
        ("juni", "June"),
        ("juli", "July"),
        ("agustus", "August"),
        ("september", "September"),
        ("oktober", "October"),
        ("november", "November"),
        ("desember", "December"),
    ],
};

impl MonthTable {
    /// `name` must already be lower-cased.
    pub fn canonical_month(&self, name: &str) -> Option<&'static str> {
        self.months
            .iter()
            .find(|(local, _)| *local == name)
            .map(|(_, canonical)| *canonical)
    }
}

#[derive(Debug, Clone)]
pub struct DateLocalizer {
    tables: Vec<&'static MonthTable>,
}

impl Default for DateLocalizer {
    fn default() -> Self {
        Self::new(vec![&INDONESIAN_MONTHS])
    }
}

impl DateLocalizer {
    pub fn new(tables: Vec<&'static MonthTable>) -> Self {
        Self { tables }
    }

    /// Rewrites `<day> <local month> <year>` as `<day> <English month> <year>`.
    ///
    /// Returns `None` unless the text is exactly three whitespace separated
    /// tokens whose middle token is a month known to one of the tables.
    pub fn localize(&self, text: &str) -> Option<String> {
        let tokens: Vec<&str> = text.split_whitespace().collect();
        let [day, month, year] = tokens.as_slice() else {
            return None;
        };

        let month = month.to_lowercase();
        let canonical = self
            .tables
            .iter()
            .find_map(|table| table.canonical_month(&month))?;

        Some(format!("{day} {canonical} {year}"))
    }
}

/// Localizes with the default (Indonesian) table.
pub fn localize_date(text: &str) -> Option<String> {
    DateLocalizer::default().localize(text)
}
