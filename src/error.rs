#[derive(Debug, thiserror::Error)]
pub enum CollectionError {
    #[error("No card list found: {0}")]
    ShapeNotFound(String),

    #[error("DuckDB error: {0}")]
    Storage(#[from] duckdb::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Corrupt stored record: {0}")]
    CorruptRecord(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

/// Stable, machine-readable classification of a [`CollectionError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    ShapeNotFound,
    Storage,
    InvalidJson,
    Io,
    InvalidArgument,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::ShapeNotFound => "shape_not_found",
            ErrorKind::Storage => "storage",
            ErrorKind::InvalidJson => "invalid_json",
            ErrorKind::Io => "io",
            ErrorKind::InvalidArgument => "invalid_argument",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl CollectionError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CollectionError::ShapeNotFound(_) => ErrorKind::ShapeNotFound,
            CollectionError::Storage(_) | CollectionError::CorruptRecord(_) => {
                ErrorKind::Storage
            }
            CollectionError::Json(_) => ErrorKind::InvalidJson,
            CollectionError::Io(_) => ErrorKind::Io,
            CollectionError::InvalidArgument(_) => ErrorKind::InvalidArgument,
        }
    }

    /// Short description suitable for showing to the user who sent the export.
    ///
    /// Always leads with a fixed sentence for the error kind; the underlying
    /// detail is appended only where it helps the user pick another export.
    pub fn user_message(&self) -> String {
        match self {
            CollectionError::ShapeNotFound(detail) => format!(
                "Could not find a card list in the provided JSON ({detail}). \
                 Export the collection again or upload a different file."
            ),
            CollectionError::Json(e) => format!(
                "The provided file is not valid JSON (line {}, column {}).",
                e.line(),
                e.column()
            ),
            CollectionError::InvalidArgument(detail) => {
                format!("The request could not be processed: {detail}.")
            }
            CollectionError::Storage(_)
            | CollectionError::CorruptRecord(_)
            | CollectionError::Io(_) => {
                "The collection could not be saved or loaded. Please try again later."
                    .to_string()
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, CollectionError>;
