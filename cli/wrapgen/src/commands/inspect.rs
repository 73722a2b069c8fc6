//! `wrapgen inspect`: look at what would be generated without emitting code.

use std::fmt::Write;
use std::path::Path;

use anyhow::{bail, Result};
use serde_json::json;
use wrapgen_clang::Extraction;
use wrapgen_core::{LibraryProfile, OwnershipKind};
use wrapgen_emit::analyze;

use super::{InputOverrides, InputSettings};
use crate::manifest::WrapgenManifest;

/// What to show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InspectView {
    /// Every forwarded function with its return contract.
    Functions,
    /// The ownership registry and unresolved releases.
    Ownership,
    /// Prefixed struct names found in the header.
    Structs,
}

impl InspectView {
    pub fn parse(s: &str) -> Result<Self> {
        match s {
            "functions" | "contracts" => Ok(Self::Functions),
            "ownership" | "holders" => Ok(Self::Ownership),
            "structs" => Ok(Self::Structs),
            _ => bail!("unknown view '{s}' (expected functions, ownership or structs)"),
        }
    }
}

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InspectFormat {
    Text,
    Json,
}

impl InspectFormat {
    pub fn parse(s: &str) -> Result<Self> {
        match s {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => bail!("unknown format '{s}' (expected text or json)"),
        }
    }
}

pub fn run(
    project_dir: &Path,
    manifest: Option<&WrapgenManifest>,
    overrides: &InputOverrides,
    view: &str,
    format: &str,
) -> Result<()> {
    let view = InspectView::parse(view)?;
    let format = InspectFormat::parse(format)?;
    let settings = InputSettings::resolve(project_dir, manifest, overrides)?;
    let extraction = settings.extract()?;
    print!("{}", render_view(view, format, &extraction, &settings.profile)?);
    Ok(())
}

/// Render one view of an extraction.
pub fn render_view(
    view: InspectView,
    format: InspectFormat,
    extraction: &Extraction,
    profile: &LibraryProfile,
) -> Result<String> {
    let analysis = analyze(extraction, profile);
    let mut out = String::new();

    match (view, format) {
        (InspectView::Functions, InspectFormat::Text) => {
            writeln!(out, "--- Functions: {} ---", analysis.functions.len())?;
            for function in &analysis.functions {
                let decl = function.decl;
                let args: Vec<_> = decl.arguments.iter().map(|a| a.declaration.as_str()).collect();
                let ellipsis = if decl.is_variadic { ", ..." } else { "" };
                writeln!(
                    out,
                    "  {:<17} {}({}{ellipsis})",
                    function.contract.as_str(),
                    decl.namespaced_name,
                    args.join(", ")
                )?;
            }
        }
        (InspectView::Functions, InspectFormat::Json) => {
            writeln!(out, "{}", serde_json::to_string_pretty(&analysis.functions)?)?;
        }
        (InspectView::Ownership, InspectFormat::Text) => {
            let registry = &analysis.resolution.registry;
            writeln!(out, "--- Holders: {} ---", registry.len())?;
            for entry in registry.iter() {
                let topology = match &entry.kind {
                    OwnershipKind::SingleOwner => "single-owner".to_string(),
                    OwnershipKind::DeviceOwned { owner_type } => {
                        format!("device-owned by {owner_type}")
                    }
                };
                writeln!(
                    out,
                    "  {:<24} {} via {} ({topology})",
                    entry.holder_name(profile),
                    entry.pointee_type,
                    entry.release_function
                )?;
            }
            let unresolved = &analysis.resolution.unresolved;
            if !unresolved.is_empty() {
                writeln!(out)?;
                writeln!(out, "--- Unresolved releases: {} ---", unresolved.len())?;
                for release in unresolved {
                    writeln!(out, "  {release}")?;
                }
            }
        }
        (InspectView::Ownership, InspectFormat::Json) => {
            let value = json!({
                "holders": analysis.resolution.registry.entries(),
                "unresolved": analysis.resolution.unresolved,
            });
            writeln!(out, "{}", serde_json::to_string_pretty(&value)?)?;
        }
        (InspectView::Structs, InspectFormat::Text) => {
            writeln!(out, "--- Structs: {} ---", extraction.structs.len())?;
            for name in &extraction.structs {
                writeln!(out, "  {name}")?;
            }
        }
        (InspectView::Structs, InspectFormat::Json) => {
            writeln!(out, "{}", serde_json::to_string_pretty(&extraction.structs)?)?;
        }
    }

    Ok(out)
}
