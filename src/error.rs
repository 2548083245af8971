use thiserror::Error;

/// Top-level error type for the Geolis renderer.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error(transparent)]
    Kernel(#[from] KernelError),

    #[error(transparent)]
    Tessellation(#[from] TessellationError),
}

/// Errors raised while reading a kernel boundary structure.
#[derive(Debug, Error)]
pub enum KernelError {
    #[error("entity not found: {0}")]
    EntityNotFound(&'static str),

    #[error("invalid boundary: {0}")]
    InvalidBoundary(String),
}

/// Errors related to tessellation.
#[derive(Debug, Error)]
pub enum TessellationError {
    #[error("tessellation failed: {0}")]
    Failed(String),
}

/// Convenience type alias for results using [`RenderError`].
pub type Result<T> = std::result::Result<T, RenderError>;
