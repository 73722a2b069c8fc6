//! Core error types.

/// Errors raised while loading or validating wrapgen configuration.
#[derive(Debug, thiserror::Error)]
pub enum WrapError {
    /// The library profile is structurally valid TOML but unusable.
    #[error("invalid library profile: {detail}")]
    InvalidProfile { detail: String },

    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for core operations.
pub type Result<T> = std::result::Result<T, WrapError>;
