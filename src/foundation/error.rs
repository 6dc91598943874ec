/// Convenience result type used across actfx.
pub type FxResult<T> = Result<T, FxError>;

/// Top-level error taxonomy used by the effect pipeline.
#[derive(thiserror::Error, Debug)]
pub enum FxError {
    /// A parameter is unknown, has the wrong type or lies outside its declared range.
    #[error("invalid parameter: {0}")]
    InvalidParam(String),

    /// The selection cannot be satisfied by the document (bad indices, empty ranges).
    #[error("selection error: {0}")]
    Selection(String),

    /// The document violates one of its invariants.
    #[error("document error: {0}")]
    Document(String),

    /// A pixel algorithm received inconsistent input.
    #[error("processing error: {0}")]
    Processing(String),

    /// Errors when serializing or deserializing documents and configs.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl FxError {
    /// Build a [`FxError::InvalidParam`] value.
    pub fn invalid_param(msg: impl Into<String>) -> Self {
        Self::InvalidParam(msg.into())
    }

    /// Build a [`FxError::Selection`] value.
    pub fn selection(msg: impl Into<String>) -> Self {
        Self::Selection(msg.into())
    }

    /// Build a [`FxError::Document`] value.
    pub fn document(msg: impl Into<String>) -> Self {
        Self::Document(msg.into())
    }

    /// Build a [`FxError::Processing`] value.
    pub fn processing(msg: impl Into<String>) -> Self {
        Self::Processing(msg.into())
    }

    /// Build a [`FxError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

impl From<serde_json::Error> for FxError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serde(err.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
