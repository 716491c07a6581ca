use thiserror::Error;

/// Everything that can go wrong while reformatting a corpus or a model.
///
/// All variants are fatal: the binaries log the message and exit non-zero.
#[derive(Debug, Error)]
pub enum FormatError {
    /// Declared term count in the corpus header disagrees with the vocabulary.
    #[error("Consistency error: corpus header declares {declared} terms but vocabulary has {actual}")]
    Consistency { declared: usize, actual: usize },

    /// A row of the corpus or model file could not be used.
    #[error("Malformed row at line {line}: {reason}")]
    MalformedRow { line: usize, reason: String },

    /// Missing or invalid command-line input.
    #[error("Usage error: {0}")]
    Usage(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV export failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON export failed: {0}")]
    Json(#[from] serde_json::Error),
}

impl FormatError {
    pub(crate) fn malformed(line: usize, reason: impl Into<String>) -> Self {
        FormatError::MalformedRow {
            line,
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, FormatError>;
