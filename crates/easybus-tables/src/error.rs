/// Errors that can occur while loading lookup tables.
#[derive(Debug, thiserror::Error)]
pub enum TableError {
    /// The table document could not be read from disk.
    #[error("failed reading table file {path}: {source}")]
    Read {
        path: std::path::PathBuf,
        source: std::io::Error,
    },

    /// The table document is not valid JSON or misses required fields.
    #[error("invalid table document: {0}")]
    Parse(#[from] serde_json::Error),

    /// A required table section is missing or empty.
    #[error("table section '{0}' is empty")]
    EmptySection(&'static str),
}

pub type Result<T> = std::result::Result<T, TableError>;
