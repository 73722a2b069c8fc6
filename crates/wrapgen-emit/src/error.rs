//! Emission error types.

use std::path::PathBuf;

/// Errors that can occur while generating wrapper source.
#[derive(Debug, thiserror::Error)]
pub enum EmitError {
    /// The front end or AST decoding failed.
    #[error(transparent)]
    Extract(#[from] wrapgen_clang::ExtractError),

    /// The library profile is unusable.
    #[error(transparent)]
    Profile(#[from] wrapgen_core::WrapError),

    /// The header yielded no prefixed function declarations.
    #[error("no declarations extracted from {}", header.display())]
    NothingExtracted { header: PathBuf },

    /// A prologue or epilogue file could not be read.
    #[error("failed to read frame file {}: {source}", path.display())]
    Frame {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Formatting into the output buffer failed.
    #[error("formatting error: {0}")]
    Fmt(#[from] std::fmt::Error),
}

/// Result type alias for emission operations.
pub type Result<T> = std::result::Result<T, EmitError>;
