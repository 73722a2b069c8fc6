//! AST traversal: from a JSON dump to ordered declarations.

use std::collections::HashSet;
use std::path::Path;

use tracing::{debug, warn};
use wrapgen_core::{Argument, Declaration, LibraryProfile, TypeDescriptor};

use crate::ast::AstNode;
use crate::error::{ExtractError, Result};
use crate::frontend::FrontEnd;

/// Everything pulled out of one header, in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extraction {
    pub functions: Vec<Declaration>,
    /// Prefixed `struct` names, deduplicated.
    pub structs: Vec<String>,
}

impl Extraction {
    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }
}

/// Parse `header` through `front_end` and extract its declarations.
pub fn extract_header(
    front_end: &dyn FrontEnd,
    header: &Path,
    include_dirs: &[String],
    profile: &LibraryProfile,
) -> Result<Extraction> {
    let json = front_end.dump_ast(header, include_dirs)?;
    extract_from_json(&json, profile)
}

/// Extract declarations from a clang JSON AST dump.
pub fn extract_from_json(json: &str, profile: &LibraryProfile) -> Result<Extraction> {
    let root: AstNode = serde_json::from_str(json)?;
    if !root.is("TranslationUnitDecl") {
        return Err(ExtractError::NotATranslationUnit { kind: root.kind });
    }

    let mut visitor = Visitor::new(profile);
    visitor.visit_all(&root.inner);
    let extraction = visitor.finish();
    debug!(
        functions = extraction.functions.len(),
        structs = extraction.structs.len(),
        "extraction done"
    );
    Ok(extraction)
}

struct Visitor<'p> {
    profile: &'p LibraryProfile,
    functions: Vec<Declaration>,
    structs: Vec<String>,
    seen_structs: HashSet<String>,
}

impl<'p> Visitor<'p> {
    fn new(profile: &'p LibraryProfile) -> Self {
        Self {
            profile,
            functions: Vec::new(),
            structs: Vec::new(),
            seen_structs: HashSet::new(),
        }
    }

    fn visit_all(&mut self, nodes: &[AstNode]) {
        for node in nodes {
            self.visit(node);
        }
    }

    fn visit(&mut self, node: &AstNode) {
        if node.is_implicit {
            return;
        }
        match node.kind.as_str() {
            // extern "C" { ... }
            "LinkageSpecDecl" => self.visit_all(&node.inner),
            "FunctionDecl" => self.visit_function(node),
            "RecordDecl" => self.visit_record(node),
            _ => {}
        }
    }

    fn visit_record(&mut self, node: &AstNode) {
        if node.tag_used.as_deref() != Some("struct") {
            return;
        }
        let Some(name) = node.name() else { return };
        if self.profile.has_prefix(name) && self.seen_structs.insert(name.to_string()) {
            self.structs.push(name.to_string());
        }
    }

    fn visit_function(&mut self, node: &AstNode) {
        let Some(name) = node.name() else { return };
        if !self.profile.has_prefix(name) {
            return;
        }
        let Some(fn_type) = node.qual_type() else {
            warn!(function = name, "function without a type, skipping");
            return;
        };
        let Some(return_spelling) = split_return_type(fn_type) else {
            warn!(function = name, ty = fn_type, "unsupported return type, skipping");
            return;
        };

        let arguments = node
            .children("ParmVarDecl")
            .enumerate()
            .map(|(i, param)| {
                let arg_name = param
                    .name()
                    .map(String::from)
                    .unwrap_or_else(|| format!("arg{i}"));
                Argument::new(arg_name, param.qual_type().unwrap_or("int"))
            })
            .collect();

        self.functions.push(Declaration::new(
            name,
            TypeDescriptor::from_spelling(return_spelling),
            arguments,
            node.variadic,
            self.profile,
        ));
    }

    fn finish(self) -> Extraction {
        Extraction {
            functions: self.functions,
            structs: self.structs,
        }
    }
}

/// Return-type part of a function type spelling (`"bool (SDL_Window *)"` →
/// `"bool"`).
///
/// Returns `None` when the return type itself needs declarator syntax around
/// the parameter list, i.e. a function returning a bare function pointer.
pub fn split_return_type(fn_type: &str) -> Option<&str> {
    let mut fn_type = fn_type.trim();
    if let Some(pos) = fn_type.find(") __attribute__") {
        fn_type = &fn_type[..=pos];
    }
    if !fn_type.ends_with(')') {
        return None;
    }

    let mut depth = 0usize;
    let mut open = None;
    for (i, c) in fn_type.char_indices().rev() {
        match c {
            ')' => depth += 1,
            '(' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    open = Some(i);
                    break;
                }
            }
            _ => {}
        }
    }

    let ret = fn_type[..open?].trim_end();
    if ret.is_empty() || ret.ends_with(')') {
        None
    } else {
        Some(ret)
    }
}
