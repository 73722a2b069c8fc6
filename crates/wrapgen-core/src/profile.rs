//! Library profile: everything wrapgen needs to know about the wrapped API.
//!
//! A profile is the `[library]` table of a `wrapgen.toml`. Every field has a
//! default matching SDL3, so an empty table is a complete profile.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, WrapError};

/// Naming conventions and exclusion lists for one wrapped C library.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LibraryProfile {
    /// Name prefix that marks a public declaration (e.g. `"SDL_"`).
    pub prefix: String,
    /// Leading marker of implementation-private names (e.g. `"_"`).
    #[serde(alias = "hidden-marker")]
    pub hidden_marker: String,
    /// Name of the prologue helper that raises the wrapper's exception.
    #[serde(alias = "error-helper")]
    pub error_helper: String,
    /// Substrings that flag a function as a release/destroy candidate.
    #[serde(alias = "release-markers")]
    pub release_markers: Vec<String>,
    /// Owning-context types whose children are released through them.
    #[serde(alias = "owner-types")]
    pub owner_types: Vec<String>,
    /// Release-looking functions that are not ownership releases.
    pub deny: Vec<String>,
    /// Functions removed from the forwarding surface entirely.
    pub skip: Vec<String>,
    /// Treat `void *` returns as nullable pointers instead of unchecked.
    #[serde(alias = "check-untyped-pointers")]
    pub check_untyped_pointers: bool,
}

impl Default for LibraryProfile {
    fn default() -> Self {
        Self {
            prefix: "SDL_".to_string(),
            hidden_marker: "_".to_string(),
            error_helper: "Throw".to_string(),
            release_markers: vec!["Destroy".to_string(), "Release".to_string()],
            owner_types: vec!["SDL_GPUDevice".to_string()],
            deny: [
                "SDL_MemoryBarrierReleaseFunction",
                "SDL_DestroyHapticEffect",
                "SDL_DestroyProperties",
                "SDL_ReleaseCameraFrame",
                "SDL_GL_DestroyContext",
                "SDL_Metal_DestroyView",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            skip: [
                "SDL_size_mul_check_overflow_builtin",
                "SDL_size_add_check_overflow_builtin",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            check_untyped_pointers: false,
        }
    }
}

impl LibraryProfile {
    /// Parse a profile from a TOML string holding the table's fields.
    pub fn parse(input: &str) -> Result<Self> {
        let profile: LibraryProfile = toml::from_str(input)?;
        profile.validate()?;
        Ok(profile)
    }

    /// Parse a profile from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Reject profiles that would make every later stage meaningless.
    pub fn validate(&self) -> Result<()> {
        if self.prefix.is_empty() {
            return Err(WrapError::InvalidProfile {
                detail: "prefix must not be empty".to_string(),
            });
        }
        if self.release_markers.iter().all(|m| m.is_empty()) {
            return Err(WrapError::InvalidProfile {
                detail: "release_markers needs at least one non-empty marker".to_string(),
            });
        }
        if self.error_helper.trim().is_empty() {
            return Err(WrapError::InvalidProfile {
                detail: "error_helper must name the prologue's raising function".to_string(),
            });
        }
        Ok(())
    }

    /// Whether `name` carries the library prefix.
    pub fn has_prefix(&self, name: &str) -> bool {
        name.starts_with(&self.prefix)
    }

    /// `name` with the library prefix removed, or unchanged if unprefixed.
    pub fn strip_prefix<'n>(&self, name: &'n str) -> &'n str {
        name.strip_prefix(self.prefix.as_str()).unwrap_or(name)
    }

    /// Whether `name` looks like a release/destroy function.
    pub fn is_release_like(&self, name: &str) -> bool {
        self.release_markers
            .iter()
            .any(|m| !m.is_empty() && name.contains(m.as_str()))
    }

    pub fn is_denied(&self, name: &str) -> bool {
        self.deny.iter().any(|d| d == name)
    }

    pub fn is_skipped(&self, name: &str) -> bool {
        self.skip.iter().any(|s| s == name)
    }

    pub fn is_owner_type(&self, type_name: &str) -> bool {
        self.owner_types.iter().any(|t| t == type_name)
    }
}
