pub mod assembler;
pub mod error;
pub mod generator;
pub mod normalizer;
pub mod pipeline;
pub mod record;
pub mod table;

pub use assembler::{assemble, render_date, sorted_records, DISPLAY_DATE_FORMAT};
pub use error::{PipelineError, Result};
pub use generator::{GenerationError, TextGenerator};
pub use normalizer::{normalize, normalize_date};
pub use pipeline::{process_response, run, BacklogPipeline};
pub use record::BacklogRecord;
pub use table::BacklogTable;

pub use backlog_parser::{
    localize_date, BacklogColumn, DateLocalizer, MonthTable, RawRow, RawTable, ResponseError,
    ResponseParser, CANONICAL_HEADER, INDONESIAN_MONTHS,
};
