//! `wrapgen generate`: header in, wrapper source out.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use tracing::info;
use wrapgen_emit::{generate, Frame, GenerateRequest, Generated};

use super::{InputOverrides, InputSettings};
use crate::manifest::WrapgenManifest;

/// Where generated source is written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    Stdout,
    File(PathBuf),
}

impl Destination {
    /// `-` means stdout; command-line paths win over the manifest's.
    fn resolve(
        project_dir: &Path,
        manifest: Option<&WrapgenManifest>,
        output: Option<&str>,
    ) -> Result<Self> {
        match (output, manifest.and_then(|m| m.output.path.as_deref())) {
            (Some("-"), _) => Ok(Self::Stdout),
            (Some(path), _) => Ok(Self::File(PathBuf::from(path))),
            (None, Some(path)) => Ok(Self::File(project_dir.join(path))),
            (None, None) => {
                bail!("no output given (pass --output or set [output] path in wrapgen.toml)")
            }
        }
    }
}

/// Run the full pipeline and write the result.
///
/// Nothing is written unless every stage succeeded.
pub fn run(
    project_dir: &Path,
    manifest: Option<&WrapgenManifest>,
    overrides: &InputOverrides,
    output: Option<&str>,
) -> Result<()> {
    let settings = InputSettings::resolve(project_dir, manifest, overrides)?;
    let destination = Destination::resolve(project_dir, manifest, output)?;
    let frame = load_frame(project_dir, manifest)?;

    let request = GenerateRequest {
        header: settings.header.clone(),
        include_dirs: settings.include_dirs.clone(),
        frame,
    };
    let generated = generate(&settings.front_end, &request, &settings.profile)
        .with_context(|| format!("generating wrappers for {}", settings.header.display()))?;

    write_output(&destination, &generated)?;
    eprint!("{}", generated.report);
    Ok(())
}

fn load_frame(project_dir: &Path, manifest: Option<&WrapgenManifest>) -> Result<Frame> {
    let output = manifest.map(|m| &m.output);
    let prologue = output
        .and_then(|o| o.prologue.as_deref())
        .map(|p| project_dir.join(p));
    let epilogue = output
        .and_then(|o| o.epilogue.as_deref())
        .map(|p| project_dir.join(p));
    Ok(Frame::load(prologue.as_deref(), epilogue.as_deref())?)
}

fn write_output(destination: &Destination, generated: &Generated) -> Result<()> {
    match destination {
        Destination::Stdout => {
            let mut stdout = std::io::stdout().lock();
            stdout
                .write_all(generated.source.as_bytes())
                .context("writing generated source to stdout")?;
            stdout.flush()?;
        }
        Destination::File(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)
                    .with_context(|| format!("creating {}", parent.display()))?;
            }
            fs::write(path, &generated.source)
                .with_context(|| format!("writing {}", path.display()))?;
            info!(path = %path.display(), bytes = generated.source.len(), "wrote wrapper source");
        }
    }
    Ok(())
}
