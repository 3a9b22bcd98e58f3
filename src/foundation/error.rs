/// Convenience result type used across Clipdeck.
pub type ClipdeckResult<T> = Result<T, ClipdeckError>;

/// Top-level error taxonomy used by engine APIs.
///
/// The numeric resolvers never produce errors; these variants are reserved for
/// explicit format checks, document validation and (de)serialization.
#[derive(thiserror::Error, Debug)]
pub enum ClipdeckError {
    /// A string that is not a 26-character base-32 identifier.
    #[error("invalid identifier: {0}")]
    InvalidIdentifier(String),

    /// Invalid timeline document data.
    #[error("validation error: {0}")]
    Validation(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ClipdeckError {
    /// Build a [`ClipdeckError::InvalidIdentifier`] value.
    pub fn invalid_identifier(msg: impl Into<String>) -> Self {
        Self::InvalidIdentifier(msg.into())
    }

    /// Build a [`ClipdeckError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`ClipdeckError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

impl From<serde_json::Error> for ClipdeckError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serde(err.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
