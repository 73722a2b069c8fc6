//! AST-producing front ends.

use std::path::Path;
use std::process::Command;

use tracing::{debug, error};

use crate::error::{ExtractError, Result};

/// Something that turns a header into a clang-style JSON AST dump.
pub trait FrontEnd {
    /// Parse `header` with `include_dirs` on the search path and return the
    /// JSON text of its translation unit.
    fn dump_ast(&self, header: &Path, include_dirs: &[String]) -> Result<String>;
}

/// Runs `clang -fsyntax-only -Xclang -ast-dump=json` as a child process.
#[derive(Debug, Clone)]
pub struct ClangFrontEnd {
    program: String,
    extra_args: Vec<String>,
}

impl Default for ClangFrontEnd {
    fn default() -> Self {
        Self {
            program: "clang".to_string(),
            extra_args: Vec::new(),
        }
    }
}

impl ClangFrontEnd {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a specific clang binary (e.g. `clang-18` or an absolute path).
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    /// Extra flags placed before the include paths.
    pub fn with_args(mut self, args: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.extra_args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    fn command(&self, header: &Path, include_dirs: &[String]) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.arg("-fsyntax-only")
            .arg("-Xclang")
            .arg("-ast-dump=json")
            .args(&self.extra_args)
            .args(include_dirs.iter().map(|dir| include_flag(dir)))
            .arg(header);
        cmd
    }
}

impl FrontEnd for ClangFrontEnd {
    fn dump_ast(&self, header: &Path, include_dirs: &[String]) -> Result<String> {
        if !header.is_file() {
            return Err(ExtractError::HeaderNotFound {
                path: header.to_path_buf(),
            });
        }

        debug!(program = %self.program, header = %header.display(), "running front end");
        let output = self
            .command(header, include_dirs)
            .output()
            .map_err(|source| ExtractError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim_end().to_string();
            error!(header = %header.display(), status = %output.status, "front end failed");
            return Err(ExtractError::FrontEndFailed {
                status: output.status.to_string(),
                stderr,
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// Turn an include entry into a search-path flag.
///
/// Entries that already are flags pass through unchanged.
pub fn include_flag(entry: &str) -> String {
    if ["-I", "-isystem", "-iquote", "-idirafter"]
        .iter()
        .any(|flag| entry.starts_with(flag))
    {
        entry.to_string()
    } else {
        format!("-I{entry}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn include_flags() {
        assert_eq!(include_flag("SDL/include"), "-ISDL/include");
        assert_eq!(include_flag("-ISDL/include"), "-ISDL/include");
        assert_eq!(include_flag("-isystem/usr/include"), "-isystem/usr/include");
        assert_eq!(include_flag("-iquote."), "-iquote.");
    }

    #[test]
    fn command_line_layout() {
        let front_end = ClangFrontEnd::new()
            .with_program("clang-18")
            .with_args(["-DSDL_DISABLE_ANALYZE_MACROS"]);
        let cmd = front_end.command(Path::new("SDL.h"), &["include".to_string()]);

        assert_eq!(cmd.get_program(), "clang-18");
        let args: Vec<_> = cmd
            .get_args()
            .map(|a| a.to_string_lossy().into_owned())
            .collect();
        assert_eq!(
            args,
            [
                "-fsyntax-only",
                "-Xclang",
                "-ast-dump=json",
                "-DSDL_DISABLE_ANALYZE_MACROS",
                "-Iinclude",
                "SDL.h",
            ]
        );
    }

    #[test]
    fn missing_header_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let err = ClangFrontEnd::new()
            .dump_ast(&dir.path().join("nope.h"), &[])
            .unwrap_err();
        assert!(matches!(err, ExtractError::HeaderNotFound { .. }));
    }

    #[test]
    fn unspawnable_front_end_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let header = dir.path().join("lib.h");
        std::fs::write(&header, "int Lib_Init(void);\n").unwrap();

        let err = ClangFrontEnd::new()
            .with_program("wrapgen-no-such-clang")
            .dump_ast(&header, &[])
            .unwrap_err();
        assert!(matches!(err, ExtractError::Spawn { .. }));
        assert!(err.to_string().contains("wrapgen-no-such-clang"));
    }
}
