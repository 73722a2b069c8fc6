//! CLI command implementations.

pub mod generate;
pub mod init;
pub mod inspect;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use wrapgen_clang::{extract_header, ClangFrontEnd, Extraction};
use wrapgen_core::LibraryProfile;

use crate::manifest::WrapgenManifest;

/// Input options given on the command line. Each one overrides the manifest.
#[derive(Debug, Default, Clone)]
pub struct InputOverrides {
    pub header: Option<String>,
    pub include_dirs: Vec<String>,
    pub clang: Option<String>,
}

/// Effective input settings after merging manifest and command line.
#[derive(Debug, Clone)]
pub struct InputSettings {
    pub header: PathBuf,
    pub include_dirs: Vec<String>,
    pub front_end: ClangFrontEnd,
    pub profile: LibraryProfile,
}

impl InputSettings {
    /// Merge `overrides` over the manifest found in `project_dir`.
    ///
    /// Relative paths from the manifest are taken relative to `project_dir`;
    /// command-line paths are used as given.
    pub fn resolve(
        project_dir: &Path,
        manifest: Option<&WrapgenManifest>,
        overrides: &InputOverrides,
    ) -> Result<Self> {
        let input = manifest.map(|m| &m.input);

        let header = match (&overrides.header, input.and_then(|i| i.header.as_deref())) {
            (Some(header), _) => PathBuf::from(header),
            (None, Some(header)) => project_dir.join(header),
            (None, None) => anyhow::bail!(
                "no header given (pass --header or set [input] header in wrapgen.toml)"
            ),
        };

        let include_dirs = if !overrides.include_dirs.is_empty() {
            overrides.include_dirs.clone()
        } else {
            input
                .map(|i| {
                    i.include_dirs
                        .iter()
                        .map(|dir| project_relative(project_dir, dir))
                        .collect()
                })
                .unwrap_or_default()
        };

        let program = overrides
            .clang
            .clone()
            .or_else(|| input.and_then(|i| i.clang.clone()))
            .unwrap_or_else(|| "clang".to_string());
        let front_end = ClangFrontEnd::new()
            .with_program(program)
            .with_args(input.map(|i| i.clang_args.clone()).unwrap_or_default());

        Ok(Self {
            header,
            include_dirs,
            front_end,
            profile: manifest.map(|m| m.library.clone()).unwrap_or_default(),
        })
    }

    /// Run the front end and extract declarations.
    pub fn extract(&self) -> Result<Extraction> {
        extract_header(&self.front_end, &self.header, &self.include_dirs, &self.profile)
            .with_context(|| format!("extracting declarations from {}", self.header.display()))
    }
}

/// Anchor a bare relative include directory at the project directory.
///
/// Search-path flags and absolute paths pass through unchanged.
fn project_relative(project_dir: &Path, entry: &str) -> String {
    if entry.starts_with('-') || Path::new(entry).is_absolute() {
        entry.to_string()
    } else {
        project_dir.join(entry).display().to_string()
    }
}
