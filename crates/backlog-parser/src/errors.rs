use thiserror::Error;

#[derive(Debug, Error)]
pub enum ResponseError {
    #[error("model response was empty")]
    EmptyResponse,

    #[error("model response did not contain any '|' delimited lines")]
    NoDataLines,

    #[error("line {line} has {found} columns, expected {expected}")]
    ColumnCount {
        line: u64,
        expected: usize,
        found: usize,
    },

    #[error("pipe table could not be read: {source}")]
    Csv {
        #[source]
        source: csv::Error,
    },

    #[error("model response contained a header but no data rows")]
    EmptyData,
}

impl ResponseError {
    /// Folds the reader's ragged-row error into a column count mismatch; any
    /// other reader failure stays a structural CSV error.
    pub(crate) fn from_csv(err: csv::Error) -> Self {
        if let csv::ErrorKind::UnequalLengths {
            pos,
            expected_len,
            len,
        } = err.kind()
        {
            return ResponseError::ColumnCount {
                line: pos.as_ref().map(|p| p.line()).unwrap_or_default(),
                expected: *expected_len as usize,
                found: *len as usize,
            };
        }
        ResponseError::Csv { source: err }
    }
}
