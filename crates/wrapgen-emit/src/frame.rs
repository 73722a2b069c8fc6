//! Prologue and epilogue text surrounding the generated declarations.

use std::path::{Path, PathBuf};

use crate::error::{EmitError, Result};

const BUNDLED_PROLOGUE: &str = include_str!("../templates/prologue.hpp");
const BUNDLED_EPILOGUE: &str = include_str!("../templates/epilogue.hpp");

/// Fixed text written before and after the generated sections.
///
/// The prologue must define the error helper named by the profile and the
/// `UniqueHandle`/`DeviceOwned` templates the holders instantiate, and open
/// the namespace the epilogue closes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub prologue: String,
    pub epilogue: String,
}

impl Default for Frame {
    fn default() -> Self {
        Self::bundled()
    }
}

impl Frame {
    /// The SDL3 prologue/epilogue shipped with wrapgen.
    pub fn bundled() -> Self {
        Self {
            prologue: BUNDLED_PROLOGUE.to_string(),
            epilogue: BUNDLED_EPILOGUE.to_string(),
        }
    }

    /// Bundled texts with either part replaced by a file's contents.
    pub fn load(prologue: Option<&Path>, epilogue: Option<&Path>) -> Result<Self> {
        let mut frame = Self::bundled();
        if let Some(path) = prologue {
            frame.prologue = read(path)?;
        }
        if let Some(path) = epilogue {
            frame.epilogue = read(path)?;
        }
        Ok(frame)
    }
}

fn read(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|source| EmitError::Frame {
        path: PathBuf::from(path),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_frame_matches_sdl3() {
        let frame = Frame::bundled();
        assert!(frame.prologue.contains("#include <SDL3/SDL.h>"));
        assert!(frame.prologue.contains("namespace sdl"));
        assert!(frame.prologue.contains("inline void Throw(std::source_location location)"));
        assert!(frame.prologue.contains("class UniqueHandle"));
        assert!(frame.prologue.contains("class DeviceOwned"));
        assert!(frame.epilogue.contains("} // namespace sdl"));
    }

    #[test]
    fn load_overrides_one_part() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prologue.h");
        std::fs::write(&path, "namespace lib {\n").unwrap();

        let frame = Frame::load(Some(&path), None).unwrap();
        assert_eq!(frame.prologue, "namespace lib {\n");
        assert_eq!(frame.epilogue, Frame::bundled().epilogue);
    }

    #[test]
    fn load_missing_file_names_it() {
        let err = Frame::load(None, Some(Path::new("/nonexistent/epilogue.h"))).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/epilogue.h"));
    }
}
