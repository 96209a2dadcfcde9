/// Convenience result type used across the crate.
pub type VeneerResult<T> = Result<T, VeneerError>;

/// Top-level error taxonomy used by synthesis and compositing APIs.
#[derive(thiserror::Error, Debug)]
pub enum VeneerError {
    /// Invalid caller-provided data: zero dimensions, malformed mockups, bad paths.
    #[error("validation error: {0}")]
    Validation(String),

    /// Source or mockup bytes failed to load or decode.
    #[error("image decode error: {0}")]
    Decode(String),

    /// A synthesis surface could not be allocated (texture exceeds the hard cap).
    #[error("surface error: {0}")]
    Surface(String),

    /// Bitmap export attempted with a cross-origin source that was never proxied.
    #[error("tainted export: {0}")]
    TaintedExport(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl VeneerError {
    /// Build a [`VeneerError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`VeneerError::Decode`] value.
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Build a [`VeneerError::Surface`] value.
    pub fn surface(msg: impl Into<String>) -> Self {
        Self::Surface(msg.into())
    }

    /// Build a [`VeneerError::TaintedExport`] value.
    pub fn tainted_export(msg: impl Into<String>) -> Self {
        Self::TaintedExport(msg.into())
    }
}
