//! Generation pipeline orchestrator.

use std::path::PathBuf;

use tracing::{debug, info};
use wrapgen_clang::{extract_header, Extraction, FrontEnd};
use wrapgen_core::{
    classify_all, resolve, ClassifiedFunction, LibraryProfile, OwnershipKind, Resolution,
};

use crate::emit::{emit_source, unique_by_name};
use crate::error::{EmitError, Result};
use crate::frame::Frame;
use crate::report::{source_digest, GenerationReport};

/// Input of one generation run.
#[derive(Debug, Clone)]
pub struct GenerateRequest {
    pub header: PathBuf,
    /// Include entries, forwarded to the front end as search-path flags.
    pub include_dirs: Vec<String>,
    pub frame: Frame,
}

/// Output of a successful generation run.
#[derive(Debug, Clone)]
pub struct Generated {
    pub source: String,
    pub report: GenerationReport,
}

/// Classified, deduplicated functions plus the resolved ownership registry.
#[derive(Debug)]
pub struct Analysis<'a> {
    /// Every wrappable declaration, redeclarations included.
    pub classified: Vec<ClassifiedFunction<'a>>,
    /// First declaration of each name; the forwarding surface.
    pub functions: Vec<ClassifiedFunction<'a>>,
    pub resolution: Resolution,
}

/// Classify and resolve an extraction without emitting anything.
pub fn analyze<'a>(extraction: &'a Extraction, profile: &LibraryProfile) -> Analysis<'a> {
    let classified = classify_all(&extraction.functions, profile);
    let functions = unique_by_name(&classified);
    let resolution = resolve(&functions, profile);
    debug!(
        classified = classified.len(),
        unique = functions.len(),
        "classification done"
    );
    Analysis {
        classified,
        functions,
        resolution,
    }
}

/// Emit the wrapper source for an already extracted header.
pub fn render(
    extraction: &Extraction,
    frame: &Frame,
    profile: &LibraryProfile,
) -> Result<Generated> {
    let analysis = analyze(extraction, profile);
    let source = emit_source(
        frame,
        &analysis.functions,
        &analysis.resolution.registry,
        profile,
    )?;

    let mut report = GenerationReport {
        declarations: extraction.functions.len(),
        skipped: extraction.functions.len() - analysis.classified.len(),
        duplicates: analysis.classified.len() - analysis.functions.len(),
        forwarders: analysis.functions.len(),
        structs: extraction.structs.len(),
        unresolved: analysis.resolution.unresolved.clone(),
        digest: source_digest(&source),
        ..GenerationReport::default()
    };
    for function in &analysis.functions {
        report.contracts.record(function.contract);
        if function.decl.is_variadic {
            report.variadic += 1;
        }
    }
    for entry in analysis.resolution.registry.iter() {
        match entry.kind {
            OwnershipKind::SingleOwner => report.single_owner_holders += 1,
            OwnershipKind::DeviceOwned { .. } => report.device_owned_holders += 1,
        }
    }

    Ok(Generated { source, report })
}

/// Run extraction → classification → release pairing → emission.
///
/// Fails without producing any source if the front end fails or the header
/// yields no prefixed declarations.
pub fn generate(
    front_end: &dyn FrontEnd,
    request: &GenerateRequest,
    profile: &LibraryProfile,
) -> Result<Generated> {
    profile.validate()?;

    let extraction = extract_header(front_end, &request.header, &request.include_dirs, profile)?;
    if extraction.is_empty() {
        return Err(EmitError::NothingExtracted {
            header: request.header.clone(),
        });
    }

    let generated = render(&extraction, &request.frame, profile)?;
    info!(
        header = %request.header.display(),
        forwarders = generated.report.forwarders,
        holders = generated.report.holders(),
        unresolved = generated.report.unresolved.len(),
        "generated wrapper source"
    );
    Ok(generated)
}
