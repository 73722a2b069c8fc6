//! Parsed declarations and C type spellings.
//!
//! Types are kept exactly as the front end spelled them, because the emitter
//! copies them verbatim into wrapper signatures. A coarse [`TypeKind`] is
//! derived from the spelling for classification. Handles qualifiers, plain and
//! multi-level pointers, function-pointer and array declarators. Does NOT see
//! through typedefs: a typedef that hides a pointer is [`TypeKind::Other`].

use serde::Serialize;

use crate::classify::NameShape;
use crate::profile::LibraryProfile;

/// Qualifiers that may trail a pointer declarator (`char *const`).
const TRAILING_QUALIFIERS: &[&str] = &[
    "const",
    "volatile",
    "__restrict",
    "restrict",
    "_Nonnull",
    "_Nullable",
    "_Null_unspecified",
];

/// Coarse kind of a C type, as far as classification cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeKind {
    Bool,
    Pointer,
    Void,
    Other,
}

/// A type as spelled by the front end plus its derived kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypeDescriptor {
    pub kind: TypeKind,
    pub spelling: String,
}

impl TypeDescriptor {
    /// Derive a descriptor from a front-end type spelling.
    pub fn from_spelling(spelling: &str) -> Self {
        let spelling = spelling.trim();
        let kind = if spelling == "void" {
            TypeKind::Void
        } else if is_pointer_spelling(spelling) {
            TypeKind::Pointer
        } else if matches!(strip_qualifiers(spelling), "bool" | "_Bool") {
            TypeKind::Bool
        } else {
            TypeKind::Other
        };
        Self {
            kind,
            spelling: spelling.to_string(),
        }
    }

    /// Whether this is `void *` (optionally const-qualified).
    pub fn is_untyped_pointer(&self) -> bool {
        self.kind == TypeKind::Pointer
            && pointee_spelling(&self.spelling)
                .is_some_and(|p| strip_qualifiers(&p) == "void")
    }
}

impl std::fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.spelling)
    }
}

/// One formal parameter of a [`Declaration`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Argument {
    /// Parameter name as used in forwarding calls.
    pub name: String,
    /// Full parameter spelling reused in emitted signatures.
    pub declaration: String,
    pub is_pointer: bool,
    /// Pointee spelling; `Some` exactly when `is_pointer`.
    pub pointee: Option<String>,
}

impl Argument {
    /// Build an argument from its name and the front end's type spelling.
    pub fn new(name: impl Into<String>, type_spelling: &str) -> Self {
        let name = name.into();
        let type_spelling = type_spelling.trim();
        let pointee = pointee_spelling(type_spelling);
        Self {
            declaration: declaration_text(type_spelling, &name),
            is_pointer: pointee.is_some(),
            pointee,
            name,
        }
    }
}

/// One parsed function declaration. Immutable once extracted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Declaration {
    /// Raw C name, e.g. `SDL_CreateWindow`.
    pub name: String,
    /// Name with the library prefix stripped, e.g. `CreateWindow`.
    pub namespaced_name: String,
    pub return_type: TypeDescriptor,
    pub arguments: Vec<Argument>,
    pub is_variadic: bool,
    pub is_hidden: bool,
    pub has_prefix: bool,
}

impl Declaration {
    /// Create a declaration, deriving the name-shape flags from `profile`.
    pub fn new(
        name: impl Into<String>,
        return_type: TypeDescriptor,
        arguments: Vec<Argument>,
        is_variadic: bool,
        profile: &LibraryProfile,
    ) -> Self {
        let name = name.into();
        let shape = NameShape::of(&name, profile);
        Self {
            name,
            namespaced_name: shape.namespaced_name,
            return_type,
            arguments,
            is_variadic,
            is_hidden: shape.is_hidden,
            has_prefix: shape.has_prefix,
        }
    }

    pub fn arity(&self) -> usize {
        self.arguments.len()
    }
}

/// Whether a type spelling denotes a pointer.
pub fn is_pointer_spelling(spelling: &str) -> bool {
    spelling.contains("(*") || trim_trailing_qualifiers(spelling).ends_with('*')
}

/// Spelling of the pointed-to type, or `None` for non-pointers.
///
/// `const char *` → `const char`, `char **` → `char *`,
/// `void (*)(void *)` → `void (void *)`.
pub fn pointee_spelling(spelling: &str) -> Option<String> {
    let spelling = spelling.trim();
    if spelling.contains("(*)") {
        return Some(spelling.replacen("(*)", "", 1).trim().to_string());
    }
    let base = trim_trailing_qualifiers(spelling);
    base.strip_suffix('*')
        .map(|rest| rest.trim_end().to_string())
}

/// Spell a parameter declaration the way the front end pretty-prints it.
///
/// Pointers bind the name to the star (`SDL_Window *window`); function
/// pointers and arrays place the name inside the declarator.
pub fn declaration_text(type_spelling: &str, name: &str) -> String {
    if let Some(pos) = type_spelling.find("(*") {
        let (head, tail) = type_spelling.split_at(pos + 2);
        return format!("{head}{name}{tail}");
    }
    if let Some(pos) = type_spelling.find('[') {
        let (head, tail) = type_spelling.split_at(pos);
        return format!("{} {name}{tail}", head.trim_end());
    }
    if type_spelling.ends_with('*') {
        format!("{type_spelling}{name}")
    } else {
        format!("{type_spelling} {name}")
    }
}

/// The type a spelling names, without qualifiers or an elaborated `struct`
/// keyword: `const struct SDL_Thing` → `SDL_Thing`.
///
/// Spellings that differ only in these words denote one type for ownership.
pub fn type_key(spelling: &str) -> &str {
    let mut rest = trim_trailing_qualifiers(spelling).trim_start();
    while let Some(tail) = ["const ", "volatile ", "struct "]
        .iter()
        .find_map(|q| rest.strip_prefix(q))
    {
        rest = tail.trim_start();
    }
    rest
}

/// Drop qualifiers that follow the last declarator (`char *const` → `char *`).
fn trim_trailing_qualifiers(spelling: &str) -> &str {
    let mut rest = spelling.trim_end();
    loop {
        let next = TRAILING_QUALIFIERS.iter().find_map(|q| {
            rest.strip_suffix(q)
                .filter(|head| head.is_empty() || head.ends_with([' ', '*']))
        });
        match next {
            Some(head) => rest = head.trim_end(),
            None => return rest,
        }
    }
}

/// Drop leading and trailing qualifiers around a non-pointer type.
fn strip_qualifiers(spelling: &str) -> &str {
    let mut rest = trim_trailing_qualifiers(spelling);
    while let Some(tail) = ["const ", "volatile "]
        .iter()
        .find_map(|q| rest.strip_prefix(q))
    {
        rest = tail.trim_start();
    }
    rest
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_from_spelling() {
        assert_eq!(TypeDescriptor::from_spelling("bool").kind, TypeKind::Bool);
        assert_eq!(TypeDescriptor::from_spelling("_Bool").kind, TypeKind::Bool);
        assert_eq!(TypeDescriptor::from_spelling("const bool").kind, TypeKind::Bool);
        assert_eq!(TypeDescriptor::from_spelling("void").kind, TypeKind::Void);
        assert_eq!(TypeDescriptor::from_spelling("SDL_Window *").kind, TypeKind::Pointer);
        assert_eq!(TypeDescriptor::from_spelling("const char *").kind, TypeKind::Pointer);
        assert_eq!(TypeDescriptor::from_spelling("char *const").kind, TypeKind::Pointer);
        assert_eq!(TypeDescriptor::from_spelling("void (*)(void)").kind, TypeKind::Pointer);
        assert_eq!(TypeDescriptor::from_spelling("Uint32").kind, TypeKind::Other);
        assert_eq!(TypeDescriptor::from_spelling("int").kind, TypeKind::Other);
        // A typedef that hides a pointer is not recognisable from its name.
        assert_eq!(TypeDescriptor::from_spelling("SDL_FunctionPointer").kind, TypeKind::Other);
    }

    #[test]
    fn untyped_pointer_detection() {
        assert!(TypeDescriptor::from_spelling("void *").is_untyped_pointer());
        assert!(TypeDescriptor::from_spelling("const void *").is_untyped_pointer());
        assert!(!TypeDescriptor::from_spelling("void **").is_untyped_pointer());
        assert!(!TypeDescriptor::from_spelling("SDL_Window *").is_untyped_pointer());
        assert!(!TypeDescriptor::from_spelling("void").is_untyped_pointer());
    }

    #[test]
    fn pointee_of_pointers() {
        assert_eq!(pointee_spelling("SDL_Window *").as_deref(), Some("SDL_Window"));
        assert_eq!(pointee_spelling("const char *").as_deref(), Some("const char"));
        assert_eq!(pointee_spelling("char **").as_deref(), Some("char *"));
        assert_eq!(pointee_spelling("char *const").as_deref(), Some("char"));
        assert_eq!(pointee_spelling("char *restrict").as_deref(), Some("char"));
        assert_eq!(
            pointee_spelling("void (*)(void *)").as_deref(),
            Some("void (void *)")
        );
        assert_eq!(pointee_spelling("int"), None);
        assert_eq!(pointee_spelling("SDL_PropertiesID"), None);
    }

    #[test]
    fn qualifier_suffix_needs_a_boundary() {
        // `myconst` is a type name, not a qualifier.
        assert!(!is_pointer_spelling("myconst"));
        assert_eq!(trim_trailing_qualifiers("char * const volatile"), "char *");
    }

    #[test]
    fn type_key_ignores_qualifiers_and_struct_keyword() {
        assert_eq!(type_key("SDL_Thing"), "SDL_Thing");
        assert_eq!(type_key("const SDL_Thing"), "SDL_Thing");
        assert_eq!(type_key("struct SDL_Thing"), "SDL_Thing");
        assert_eq!(type_key("const struct SDL_Thing"), "SDL_Thing");
        assert_eq!(type_key("SDL_Thing const"), "SDL_Thing");
        assert_eq!(type_key("char *"), "char *");
        assert_eq!(type_key("constant"), "constant");
    }

    #[test]
    fn declaration_text_styles() {
        assert_eq!(declaration_text("SDL_Window *", "window"), "SDL_Window *window");
        assert_eq!(declaration_text("const char *", "title"), "const char *title");
        assert_eq!(declaration_text("int", "w"), "int w");
        assert_eq!(
            declaration_text("void (*)(void *)", "callback"),
            "void (*callback)(void *)"
        );
        assert_eq!(declaration_text("float[4]", "color"), "float color[4]");
        assert_eq!(declaration_text("char *const", "name"), "char *const name");
    }

    #[test]
    fn argument_from_spelling() {
        let arg = Argument::new("window", "SDL_Window *");
        assert!(arg.is_pointer);
        assert_eq!(arg.pointee.as_deref(), Some("SDL_Window"));
        assert_eq!(arg.declaration, "SDL_Window *window");

        let arg = Argument::new("flags", "SDL_WindowFlags");
        assert!(!arg.is_pointer);
        assert!(arg.pointee.is_none());
    }

    #[test]
    fn declaration_name_shape() {
        let profile = LibraryProfile::default();
        let decl = Declaration::new(
            "SDL_CreateWindow",
            TypeDescriptor::from_spelling("SDL_Window *"),
            vec![Argument::new("title", "const char *")],
            false,
            &profile,
        );
        assert!(decl.has_prefix);
        assert!(!decl.is_hidden);
        assert_eq!(decl.namespaced_name, "CreateWindow");
        assert_eq!(decl.arity(), 1);

        let hidden = Declaration::new(
            "_internal_helper",
            TypeDescriptor::from_spelling("int"),
            Vec::new(),
            false,
            &profile,
        );
        assert!(!hidden.has_prefix);
        assert!(hidden.is_hidden);
        assert_eq!(hidden.namespaced_name, "_internal_helper");
    }
}
