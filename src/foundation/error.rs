/// Convenience result type used across overlayz.
pub type OverlayzResult<T> = Result<T, OverlayzError>;

/// Error taxonomy for engine and helper APIs.
///
/// Every variant is local to the operation that produced it: a failing call leaves the engine in
/// the state it had before the call.
#[derive(thiserror::Error, Debug)]
pub enum OverlayzError {
    /// The hosting region is missing/degenerate, or the engine was used before `initialize`.
    #[error("initialization error: {0}")]
    Initialization(String),

    /// An image source could not be fetched or decoded.
    #[error("image load error: {0}")]
    ImageLoad(String),

    /// The surface could not be serialized or handed to the export sink.
    #[error("export error: {0}")]
    Export(String),

    /// Invalid user-provided data (catalogs, options, CLI arguments).
    #[error("validation error: {0}")]
    Validation(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl OverlayzError {
    /// Build a [`OverlayzError::Initialization`] value.
    pub fn initialization(msg: impl Into<String>) -> Self {
        Self::Initialization(msg.into())
    }

    /// Build a [`OverlayzError::ImageLoad`] value.
    pub fn image_load(msg: impl Into<String>) -> Self {
        Self::ImageLoad(msg.into())
    }

    /// Build a [`OverlayzError::Export`] value.
    pub fn export(msg: impl Into<String>) -> Self {
        Self::Export(msg.into())
    }

    /// Build a [`OverlayzError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Wrap any error chain as an image load failure, keeping the full context chain in the message.
    pub(crate) fn image_load_from(err: anyhow::Error) -> Self {
        Self::ImageLoad(format!("{err:#}"))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
