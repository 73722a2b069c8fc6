//! C++ emission for holders and forwarding functions.
//!
//! Output is built with `write!` into a `String`; every holder and every
//! forwarder ends with one blank line so sections concatenate cleanly.

use std::collections::HashSet;
use std::fmt::{self, Write};

use tracing::debug;
use wrapgen_core::{
    ClassifiedFunction, Declaration, LibraryProfile, OwnershipEntry, OwnershipKind,
    OwnershipRegistry, ReturnContract,
};

use crate::frame::Frame;

/// Keep the first declaration of each raw name, preserving order.
pub fn unique_by_name<'a>(functions: &[ClassifiedFunction<'a>]) -> Vec<ClassifiedFunction<'a>> {
    let mut seen = HashSet::new();
    functions
        .iter()
        .filter(|f| seen.insert(f.decl.name.as_str()))
        .copied()
        .collect()
}

/// Write the complete output file: prologue, holders, forwarders, epilogue.
///
/// `functions` is emitted as given; deduplicate with [`unique_by_name`] first.
pub fn emit_source(
    frame: &Frame,
    functions: &[ClassifiedFunction<'_>],
    registry: &OwnershipRegistry,
    profile: &LibraryProfile,
) -> Result<String, fmt::Error> {
    let mut out = String::with_capacity(frame.prologue.len() + functions.len() * 256);

    out.push_str(&frame.prologue);
    if !frame.prologue.ends_with('\n') {
        out.push('\n');
    }
    out.push('\n');

    for entry in registry.iter() {
        write_holder(&mut out, entry, profile)?;
    }
    for function in functions {
        write_forwarder(&mut out, function, profile)?;
    }

    out.push_str(&frame.epilogue);
    Ok(out)
}

/// Emit the release functor and holder alias for one ownership entry.
pub fn write_holder<W: Write>(
    out: &mut W,
    entry: &OwnershipEntry,
    profile: &LibraryProfile,
) -> fmt::Result {
    let holder = entry.holder_name(profile);
    let object = &entry.pointee_type;
    let release = &entry.release_function;

    writeln!(out, "struct {holder}Release")?;
    writeln!(out, "{{")?;
    match &entry.kind {
        OwnershipKind::SingleOwner => {
            writeln!(out, "    void operator()({object} *object) const")?;
            writeln!(out, "    {{")?;
            writeln!(out, "        {release}(object);")?;
        }
        OwnershipKind::DeviceOwned { owner_type } => {
            writeln!(out, "    void operator()({owner_type} *owner, {object} *object) const")?;
            writeln!(out, "    {{")?;
            writeln!(out, "        {release}(owner, object);")?;
        }
    }
    writeln!(out, "    }}")?;
    writeln!(out, "}};")?;

    match &entry.kind {
        OwnershipKind::SingleOwner => {
            writeln!(out, "using {holder} = UniqueHandle<{object}, {holder}Release>;")?;
        }
        OwnershipKind::DeviceOwned { owner_type } => {
            writeln!(
                out,
                "using {holder} = DeviceOwned<{owner_type}, {object}, {holder}Release>;"
            )?;
        }
    }
    writeln!(out)
}

/// Emit one forwarding function according to its return contract.
pub fn write_forwarder<W: Write>(
    out: &mut W,
    function: &ClassifiedFunction<'_>,
    profile: &LibraryProfile,
) -> fmt::Result {
    let decl = function.decl;
    let contract = function.contract;
    if decl.is_variadic {
        debug!(function = %decl.name, "forwarding fixed parameters of variadic function");
    }

    let location = fresh_name(decl, "location");
    let mut params: Vec<String> = decl
        .arguments
        .iter()
        .map(|a| a.declaration.clone())
        .collect();
    if contract.takes_location() {
        params.push(format!(
            "std::source_location {location} = std::source_location::current()"
        ));
    }
    let args = decl
        .arguments
        .iter()
        .map(|a| a.name.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    let call = format!("{}({args})", decl.name);

    let return_type = match contract {
        ReturnContract::BooleanSuccess => "void",
        _ => decl.return_type.spelling.as_str(),
    };
    writeln!(
        out,
        "inline {}({})",
        join_declarator(return_type, &decl.namespaced_name),
        params.join(", ")
    )?;
    writeln!(out, "{{")?;
    match contract {
        ReturnContract::Unchecked => writeln!(out, "    return {call};")?,
        ReturnContract::Void => writeln!(out, "    {call};")?,
        ReturnContract::BooleanSuccess => {
            writeln!(out, "    if (!{call})")?;
            write_raise(out, &profile.error_helper, &location)?;
        }
        ReturnContract::NullablePointer => {
            let result = fresh_name(decl, "result");
            writeln!(out, "    {} = {call};", join_declarator(return_type, &result))?;
            writeln!(out, "    if (!{result})")?;
            write_raise(out, &profile.error_helper, &location)?;
            writeln!(out, "    return {result};")?;
        }
    }
    writeln!(out, "}}")?;
    writeln!(out)
}

fn write_raise<W: Write>(out: &mut W, helper: &str, location: &str) -> fmt::Result {
    writeln!(out, "    {{")?;
    writeln!(out, "        {helper}({location});")?;
    writeln!(out, "    }}")
}

/// `SDL_Window *` + `name` → `SDL_Window *name`; `int` + `name` → `int name`.
fn join_declarator(type_spelling: &str, name: &str) -> String {
    if type_spelling.ends_with('*') {
        format!("{type_spelling}{name}")
    } else {
        format!("{type_spelling} {name}")
    }
}

/// `base`, or `base_`, `base__`... if a parameter already uses the name.
fn fresh_name(decl: &Declaration, base: &str) -> String {
    let mut name = base.to_string();
    while decl.arguments.iter().any(|a| a.name == name) {
        name.push('_');
    }
    name
}
