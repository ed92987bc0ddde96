/// Errors from document store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A collection or resource key was empty or not usable as a path component.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The requested collection or resource does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// I/O error from the underlying filesystem.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Stored bytes are not valid JSON or do not match the requested shape.
    #[error("deserialization error: {0}")]
    Deserialization(String),
}

impl StoreError {
    pub(crate) fn record_not_found(collection: &str, resource: &str) -> Self {
        Self::NotFound(format!("{collection}/{resource}"))
    }

    pub(crate) fn collection_not_found(collection: &str) -> Self {
        Self::NotFound(collection.to_string())
    }

    /// Returns `true` for [`StoreError::NotFound`].
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
