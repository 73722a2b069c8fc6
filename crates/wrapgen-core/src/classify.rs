//! Return-contract classification.
//!
//! Each function's return type decides how its wrapper reports failure:
//! a `bool` false or a null pointer becomes an exception, everything else is
//! forwarded unchanged.

use serde::Serialize;

use crate::model::{Declaration, TypeDescriptor, TypeKind};
use crate::profile::LibraryProfile;

/// How a wrapper treats the wrapped function's return value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReturnContract {
    /// Returned value forwarded unchanged.
    Unchecked,
    /// `false` signals failure; wrapper returns nothing.
    BooleanSuccess,
    /// Null signals failure; wrapper returns the non-null pointer.
    NullablePointer,
    /// No return value.
    Void,
}

impl ReturnContract {
    /// Whether the wrapper takes a trailing call-site location parameter.
    pub fn takes_location(self) -> bool {
        matches!(self, Self::BooleanSuccess | Self::NullablePointer)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Unchecked => "unchecked",
            Self::BooleanSuccess => "boolean-success",
            Self::NullablePointer => "nullable-pointer",
            Self::Void => "void",
        }
    }

    pub const ALL: [ReturnContract; 4] = [
        Self::BooleanSuccess,
        Self::NullablePointer,
        Self::Unchecked,
        Self::Void,
    ];
}

impl std::fmt::Display for ReturnContract {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Name-derived flags of a declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameShape {
    pub has_prefix: bool,
    pub is_hidden: bool,
    pub namespaced_name: String,
}

impl NameShape {
    pub fn of(name: &str, profile: &LibraryProfile) -> Self {
        Self {
            has_prefix: profile.has_prefix(name),
            is_hidden: !profile.hidden_marker.is_empty()
                && name.starts_with(&profile.hidden_marker),
            namespaced_name: profile.strip_prefix(name).to_string(),
        }
    }
}

/// Map a return type to its contract.
///
/// `void *` stays [`ReturnContract::Unchecked`] unless the profile opts in,
/// since many such APIs return null legitimately.
pub fn classify(return_type: &TypeDescriptor, profile: &LibraryProfile) -> ReturnContract {
    match return_type.kind {
        TypeKind::Bool => ReturnContract::BooleanSuccess,
        TypeKind::Void => ReturnContract::Void,
        TypeKind::Pointer
            if return_type.is_untyped_pointer() && !profile.check_untyped_pointers =>
        {
            ReturnContract::Unchecked
        }
        TypeKind::Pointer => ReturnContract::NullablePointer,
        TypeKind::Other => ReturnContract::Unchecked,
    }
}

/// A declaration paired with its return contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ClassifiedFunction<'a> {
    #[serde(flatten)]
    pub decl: &'a Declaration,
    pub contract: ReturnContract,
}

/// Classify every wrappable declaration, preserving source order.
///
/// Unprefixed and skip-listed declarations are dropped here so no later stage
/// sees them.
pub fn classify_all<'a>(
    functions: &'a [Declaration],
    profile: &LibraryProfile,
) -> Vec<ClassifiedFunction<'a>> {
    functions
        .iter()
        .filter(|decl| decl.has_prefix && !profile.is_skipped(&decl.name))
        .map(|decl| ClassifiedFunction {
            decl,
            contract: classify(&decl.return_type, profile),
        })
        .collect()
}
