//! `wrapgen.toml` manifest parsing.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use wrapgen_core::LibraryProfile;

/// File name searched for by [`WrapgenManifest::find_and_load`].
pub const MANIFEST_FILE: &str = "wrapgen.toml";

/// The top-level manifest structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WrapgenManifest {
    #[serde(default)]
    pub input: InputConfig,
    #[serde(default)]
    pub output: OutputConfig,
    /// Naming conventions and exclusion lists; defaults to SDL3.
    #[serde(default)]
    pub library: LibraryProfile,
}

/// What to parse and how.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InputConfig {
    /// Umbrella header of the wrapped library.
    #[serde(default)]
    pub header: Option<String>,
    /// Include directories or ready-made search-path flags.
    #[serde(default, alias = "include-dirs")]
    pub include_dirs: Vec<String>,
    /// Front-end program (default `clang`).
    #[serde(default)]
    pub clang: Option<String>,
    /// Extra front-end flags.
    #[serde(default, alias = "clang-args")]
    pub clang_args: Vec<String>,
}

/// Where the generated source goes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub path: Option<String>,
    /// Replacement for the bundled prologue.
    #[serde(default)]
    pub prologue: Option<String>,
    /// Replacement for the bundled epilogue.
    #[serde(default)]
    pub epilogue: Option<String>,
}

impl WrapgenManifest {
    /// Search upward from `start_dir` for a `wrapgen.toml` file, parse and
    /// return it along with the directory it was found in.
    pub fn find_and_load(start_dir: &Path) -> Result<Option<(Self, PathBuf)>> {
        let mut dir = start_dir.to_path_buf();
        loop {
            let candidate = dir.join(MANIFEST_FILE);
            if candidate.is_file() {
                return Ok(Some((Self::load(&candidate)?, dir)));
            }
            if !dir.pop() {
                break;
            }
        }
        Ok(None)
    }

    /// Load and validate a manifest from an explicit path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("parsing {}", path.display()))
    }

    /// Parse a manifest from a TOML string.
    pub fn parse(s: &str) -> Result<Self> {
        let manifest: WrapgenManifest = toml::from_str(s)?;
        manifest.library.validate()?;
        Ok(manifest)
    }

    /// Default template for `wrapgen init`.
    pub fn template() -> String {
        let profile = LibraryProfile::default();
        format!(
            r#"[input]
header = "SDL/include/SDL3/SDL.h"
include_dirs = ["SDL/include"]
# clang = "clang"
# clang_args = []

[output]
path = "SDL.hpp"
# prologue = "prologue.hpp"
# epilogue = "epilogue.hpp"

[library]
prefix = "{prefix}"
hidden_marker = "{hidden}"
error_helper = "{helper}"
release_markers = {markers}
owner_types = {owners}
deny = {deny}
skip = {skip}
check_untyped_pointers = false
"#,
            prefix = profile.prefix,
            hidden = profile.hidden_marker,
            helper = profile.error_helper,
            markers = toml_list(&profile.release_markers),
            owners = toml_list(&profile.owner_types),
            deny = toml_list(&profile.deny),
            skip = toml_list(&profile.skip),
        )
    }
}

fn toml_list(items: &[String]) -> String {
    let quoted: Vec<_> = items.iter().map(|s| format!("\"{s}\"")).collect();
    format!("[{}]", quoted.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_full_manifest() {
        let toml_str = r#"
[input]
header = "include/lib.h"
include_dirs = ["include", "-isystem/opt/lib/include"]
clang = "clang-18"
clang_args = ["-DLIB_NO_INLINE"]

[output]
path = "gen/lib.hpp"
prologue = "gen/prologue.hpp"

[library]
prefix = "Lib_"
owner_types = ["Lib_Device"]
deny = []
"#;
        let manifest = WrapgenManifest::parse(toml_str).unwrap();
        assert_eq!(manifest.input.header.as_deref(), Some("include/lib.h"));
        assert_eq!(manifest.input.include_dirs.len(), 2);
        assert_eq!(manifest.input.clang.as_deref(), Some("clang-18"));
        assert_eq!(manifest.input.clang_args, ["-DLIB_NO_INLINE"]);
        assert_eq!(manifest.output.path.as_deref(), Some("gen/lib.hpp"));
        assert!(manifest.output.epilogue.is_none());
        assert_eq!(manifest.library.prefix, "Lib_");
        assert!(manifest.library.deny.is_empty());
        assert_eq!(manifest.library.error_helper, "Throw");
    }

    #[test]
    fn parse_empty_manifest_defaults_to_sdl3() {
        let manifest = WrapgenManifest::parse("").unwrap();
        assert!(manifest.input.header.is_none());
        assert_eq!(manifest.library, LibraryProfile::default());
    }

    #[test]
    fn invalid_library_is_rejected() {
        let err = WrapgenManifest::parse("[library]\nprefix = \"\"\n").unwrap_err();
        assert!(format!("{err:#}").contains("prefix"));
    }

    #[test]
    fn template_round_trips() {
        let manifest = WrapgenManifest::parse(&WrapgenManifest::template()).unwrap();
        assert_eq!(manifest.input.header.as_deref(), Some("SDL/include/SDL3/SDL.h"));
        assert_eq!(manifest.output.path.as_deref(), Some("SDL.hpp"));
        assert_eq!(manifest.library, LibraryProfile::default());
    }

    #[test]
    fn find_and_load_walks_up() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(MANIFEST_FILE), "[input]\nheader = \"lib.h\"\n").unwrap();
        let nested = dir.path().join("a/b");
        std::fs::create_dir_all(&nested).unwrap();

        let (manifest, found) = WrapgenManifest::find_and_load(&nested).unwrap().unwrap();
        assert_eq!(found, dir.path());
        assert_eq!(manifest.input.header.as_deref(), Some("lib.h"));
    }

    #[test]
    fn find_and_load_none_when_absent() {
        let dir = tempfile::tempdir().unwrap();
        // The temp dir's ancestors are not expected to hold a wrapgen.toml.
        let result = WrapgenManifest::find_and_load(dir.path()).unwrap();
        assert!(result.is_none());
    }
}
