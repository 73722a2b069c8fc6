//! Extraction error types.

use std::path::PathBuf;

/// Errors that stop extraction. All of them are fatal for the header.
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    /// The header to parse does not exist.
    #[error("header not found: {}", path.display())]
    HeaderNotFound { path: PathBuf },

    /// The front-end program could not be started.
    #[error("failed to run `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The front end ran but did not produce a translation unit.
    #[error("front end exited with {status}:\n{stderr}")]
    FrontEndFailed { status: String, stderr: String },

    /// The AST dump is not the JSON we expect.
    #[error("malformed AST dump: {0}")]
    Json(#[from] serde_json::Error),

    /// The AST root is not a translation unit.
    #[error("expected TranslationUnitDecl at AST root, found {kind}")]
    NotATranslationUnit { kind: String },
}

/// Result type alias for extraction operations.
pub type Result<T> = std::result::Result<T, ExtractError>;
