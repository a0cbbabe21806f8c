pub mod errors;
pub mod locale;
pub mod model;
mod response;

pub use errors::ResponseError;
pub use locale::{localize_date, DateLocalizer, MonthTable, INDONESIAN_MONTHS};
pub use model::{BacklogColumn, RawRow, RawTable, CANONICAL_HEADER, COLUMN_COUNT};
pub use response::{
    extract_data_lines, looks_like_header, strip_code_fences, ResponseParser, FIELD_SEPARATOR,
};
