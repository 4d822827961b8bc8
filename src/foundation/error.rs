/// Convenience result type used across mapslide.
pub type MapResult<T> = Result<T, MapError>;

/// Top-level error taxonomy used by rendering APIs.
///
/// None of these are retried. A failed render produces no usable artifact.
#[derive(thiserror::Error, Debug)]
pub enum MapError {
    /// Malformed or mutually exclusive options, detected before any data fetch.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Geometry fetch or decode failure; fatal to the current render or frame.
    #[error("data source error: {0}")]
    DataSource(String),

    /// A feature requested of a back-end or output mode that does not implement it.
    #[error("unsupported combination: {0}")]
    Unsupported(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl MapError {
    /// Build a [`MapError::Configuration`] value.
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Build a [`MapError::DataSource`] value.
    pub fn data_source(msg: impl Into<String>) -> Self {
        Self::DataSource(msg.into())
    }

    /// Build a [`MapError::Unsupported`] value.
    pub fn unsupported(msg: impl Into<String>) -> Self {
        Self::Unsupported(msg.into())
    }

    /// Build a [`MapError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// Whether this error was raised by option validation.
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration(_))
    }
}

impl From<serde_json::Error> for MapError {
    fn from(e: serde_json::Error) -> Self {
        Self::serde(e.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
