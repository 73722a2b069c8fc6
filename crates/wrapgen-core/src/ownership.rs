//! Release-pairing resolution and the ownership registry.
//!
//! The wrapped library carries no ownership metadata, so release functions
//! are found by name (`Destroy`, `Release`) and sorted by arity into the two
//! topologies the library actually uses:
//!
//! - `Lib_DestroyBar(Bar *)`: the resource releases itself ([`OwnershipKind::SingleOwner`]).
//! - `Lib_ReleaseWidget(Device *, Widget *)`: the resource is released
//!   through its owning context ([`OwnershipKind::DeviceOwned`]).
//!
//! Anything else that looks like a release is reported as unresolved and
//! left out of the registry.

use std::collections::HashMap;

use serde::Serialize;
use tracing::{debug, warn};

use crate::classify::ClassifiedFunction;
use crate::model::{type_key, Declaration};
use crate::profile::LibraryProfile;

/// Ownership topology of a resolved release function.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum OwnershipKind {
    SingleOwner,
    DeviceOwned { owner_type: String },
}

/// One resolved acquire/release relationship.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OwnershipEntry {
    pub pointee_type: String,
    pub release_function: String,
    #[serde(flatten)]
    pub kind: OwnershipKind,
}

impl OwnershipEntry {
    /// Name of the emitted holder type: the pointee with the prefix stripped.
    pub fn holder_name(&self, profile: &LibraryProfile) -> String {
        profile.strip_prefix(type_key(&self.pointee_type)).to_string()
    }
}

/// Ordered pointee-type → entry map. First registration wins.
///
/// Keyed on [`type_key`], so `SDL_Thing`, `const SDL_Thing` and
/// `struct SDL_Thing` share one entry.
#[derive(Debug, Default, Clone)]
pub struct OwnershipRegistry {
    entries: Vec<OwnershipEntry>,
    index: HashMap<String, usize>,
}

impl OwnershipRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, pointee_type: &str) -> bool {
        self.index.contains_key(type_key(pointee_type))
    }

    pub fn get(&self, pointee_type: &str) -> Option<&OwnershipEntry> {
        self.index
            .get(type_key(pointee_type))
            .map(|&i| &self.entries[i])
    }

    /// Register an entry. Returns false if its pointee type is already owned.
    pub fn register(&mut self, entry: OwnershipEntry) -> bool {
        if self.contains(&entry.pointee_type) {
            return false;
        }
        self.index
            .insert(type_key(&entry.pointee_type).to_string(), self.entries.len());
        self.entries.push(entry);
        true
    }

    /// Entries in first-resolution order.
    pub fn entries(&self) -> &[OwnershipEntry] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = &OwnershipEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Why a release-like function fits neither ownership topology.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "kebab-case")]
pub enum UnresolvedReason {
    /// Takes neither one nor two arguments.
    Arity { arity: usize },
    /// One argument, but not a pointer.
    NotAPointer,
    /// Owner matched, but the released argument is not a pointer.
    ChildNotPointer,
    /// Two arguments whose first is not a known owner type.
    UnknownOwner { first: Option<String> },
}

impl std::fmt::Display for UnresolvedReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Arity { arity } => write!(f, "takes {arity} arguments"),
            Self::NotAPointer => f.write_str("argument is not a pointer"),
            Self::ChildNotPointer => f.write_str("released argument is not a pointer"),
            Self::UnknownOwner { first: Some(ty) } => {
                write!(f, "first argument `{ty}` is not an owner type")
            }
            Self::UnknownOwner { first: None } => {
                f.write_str("first argument is not a pointer to an owner type")
            }
        }
    }
}

/// Outcome of matching one release-like function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReleaseMatch {
    SingleOwner(OwnershipEntry),
    DeviceOwned(OwnershipEntry),
    /// Fits a topology, but its pointee type is already owned.
    AlreadyHandled { pointee_type: String },
    /// On the profile's deny list.
    Denied,
    Unresolved(UnresolvedReason),
}

/// A release-like function that fits no topology.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnresolvedRelease {
    pub function: String,
    #[serde(flatten)]
    pub reason: UnresolvedReason,
}

impl std::fmt::Display for UnresolvedRelease {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.function, self.reason)
    }
}

/// Registry plus the classification gaps found while building it.
#[derive(Debug, Default, Clone)]
pub struct Resolution {
    pub registry: OwnershipRegistry,
    pub unresolved: Vec<UnresolvedRelease>,
}

/// Match one release-like declaration against the known topologies.
///
/// The deny list is consulted first. Does not register anything.
pub fn match_release(
    decl: &Declaration,
    registry: &OwnershipRegistry,
    profile: &LibraryProfile,
) -> ReleaseMatch {
    if profile.is_denied(&decl.name) {
        return ReleaseMatch::Denied;
    }

    let entry = |pointee: &str, kind| OwnershipEntry {
        pointee_type: pointee.to_string(),
        release_function: decl.name.clone(),
        kind,
    };
    let already = |pointee: &str| ReleaseMatch::AlreadyHandled {
        pointee_type: pointee.to_string(),
    };

    match decl.arguments.as_slice() {
        [arg] => match arg.pointee.as_deref() {
            Some(pointee) if registry.contains(pointee) => already(pointee),
            Some(pointee) => ReleaseMatch::SingleOwner(entry(pointee, OwnershipKind::SingleOwner)),
            None => ReleaseMatch::Unresolved(UnresolvedReason::NotAPointer),
        },
        [owner, child] => {
            let owner_type = owner
                .pointee
                .as_deref()
                .filter(|ty| profile.is_owner_type(ty));
            match (owner_type, child.pointee.as_deref()) {
                (Some(_), Some(pointee)) if registry.contains(pointee) => already(pointee),
                (Some(owner_type), Some(pointee)) => ReleaseMatch::DeviceOwned(entry(
                    pointee,
                    OwnershipKind::DeviceOwned {
                        owner_type: owner_type.to_string(),
                    },
                )),
                (Some(_), None) => ReleaseMatch::Unresolved(UnresolvedReason::ChildNotPointer),
                (None, _) => ReleaseMatch::Unresolved(UnresolvedReason::UnknownOwner {
                    first: owner.pointee.clone(),
                }),
            }
        }
        args => ReleaseMatch::Unresolved(UnresolvedReason::Arity { arity: args.len() }),
    }
}

/// Scan the classified stream for release functions and build the registry.
pub fn resolve(functions: &[ClassifiedFunction<'_>], profile: &LibraryProfile) -> Resolution {
    let mut resolution = Resolution::default();

    for function in functions {
        let decl = function.decl;
        if !profile.is_release_like(&decl.name) {
            continue;
        }
        match match_release(decl, &resolution.registry, profile) {
            ReleaseMatch::SingleOwner(entry) | ReleaseMatch::DeviceOwned(entry) => {
                debug!(function = %decl.name, pointee = %entry.pointee_type, "resolved release");
                resolution.registry.register(entry);
            }
            ReleaseMatch::AlreadyHandled { pointee_type } => {
                debug!(function = %decl.name, pointee = %pointee_type, "pointee already owned");
            }
            ReleaseMatch::Denied => {
                debug!(function = %decl.name, "release on deny list");
            }
            ReleaseMatch::Unresolved(reason) => {
                warn!(function = %decl.name, %reason, "unresolved release pattern");
                resolution.unresolved.push(UnresolvedRelease {
                    function: decl.name.clone(),
                    reason,
                });
            }
        }
    }

    debug!(
        holders = resolution.registry.len(),
        unresolved = resolution.unresolved.len(),
        "release pairing done"
    );
    resolution
}
