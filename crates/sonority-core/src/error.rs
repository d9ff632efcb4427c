use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// The catalog source lacks one or more required columns.
    #[error("schema error: missing required columns: {}", .columns.join(", "))]
    MissingRequiredColumns { columns: Vec<String> },

    /// A recommendation feature cell is empty or not a finite number.
    #[error("schema error: row {row} has invalid value {value:?} in column {column}")]
    InvalidFeatureValue {
        row: usize,
        column: String,
        value: String,
    },

    #[error("insufficient data: {rows} rows for {columns} numeric columns")]
    InsufficientData { rows: usize, columns: usize },

    #[error("missing column: {0}")]
    MissingColumn(String),

    /// A query vector does not define every recommendation feature.
    #[error("incompatible feature vector: missing or non-finite {}", .keys.join(", "))]
    IncompatibleVector { keys: Vec<String> },
}

impl Error {
    /// Returns `true` for structural catalog errors that must abort startup.
    pub fn is_schema(&self) -> bool {
        matches!(
            self,
            Self::MissingRequiredColumns { .. } | Self::InvalidFeatureValue { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;
