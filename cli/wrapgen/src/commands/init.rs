//! `wrapgen init`: write a starter `wrapgen.toml`.

use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};

use crate::manifest::{WrapgenManifest, MANIFEST_FILE};

/// Create `wrapgen.toml` in `dir`. Refuses to overwrite unless `force`.
pub fn run(dir: &Path, force: bool) -> Result<()> {
    let path = dir.join(MANIFEST_FILE);
    if path.exists() && !force {
        bail!("{} already exists (use --force to overwrite)", path.display());
    }

    fs::write(&path, WrapgenManifest::template())
        .with_context(|| format!("writing {}", path.display()))?;

    println!("Created {}", path.display());
    Ok(())
}
