use thiserror::Error;

pub type Result<T> = std::result::Result<T, RecordError>;

#[derive(Error, Debug)]
pub enum RecordError {
    #[error("required column missing from input: {column}")]
    MissingColumn { column: String },

    #[error("can't read input: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed delimited input: {0}")]
    Csv(#[from] csv::Error),

    #[error("json (de)serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("bad config: {parameter} = {value}")]
    InvalidConfig { parameter: String, value: String },

    #[error(transparent)]
    DateParse(#[from] DateParseError),

    #[error("offset is not a whole number of days: {value:?}")]
    InvalidOffset { value: String },

    #[error("survival table is broken: {message}")]
    InvalidTable { message: String },

    #[error("table has no subjects")]
    EmptyTable,
}

/// a date field that is empty or doesn't match the expected format
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("can't parse date {value:?} with format {format:?}")]
pub struct DateParseError {
    pub value: String,
    pub format: String,
}

impl RecordError {
    pub fn missing_column(column: impl Into<String>) -> Self {
        Self::MissingColumn { column: column.into() }
    }

    pub fn invalid_config(parameter: impl Into<String>, value: impl Into<String>) -> Self {
        Self::InvalidConfig {
            parameter: parameter.into(),
            value: value.into(),
        }
    }

    pub fn invalid_offset(value: impl Into<String>) -> Self {
        Self::InvalidOffset { value: value.into() }
    }

    pub fn invalid_table(message: impl Into<String>) -> Self {
        Self::InvalidTable { message: message.into() }
    }

    /// row-level problems are recoverable, everything else aborts the batch
    pub fn is_row_level(&self) -> bool {
        matches!(self, Self::DateParse(_) | Self::InvalidOffset { .. })
    }
}
