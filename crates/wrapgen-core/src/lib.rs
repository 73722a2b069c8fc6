//! Declaration model and analysis passes for wrapgen.
//!
//! wrapgen reads the public declarations of a prefix-namespaced C library and
//! emits a C++ wrapper layer that turns the library's failure conventions into
//! exceptions and synthesizes RAII holders for acquire/release pairs. This
//! crate holds everything between extraction and emission.
//!
//! ## Modules
//!
//! - [`model`]: Declarations, arguments, and type spellings
//! - [`profile`]: Per-library configuration (prefix, deny list, owner types)
//! - [`classify`]: Return-contract classification and name shape
//! - [`ownership`]: Release-pairing resolution and the ownership registry

pub mod classify;
pub mod error;
pub mod model;
pub mod ownership;
pub mod profile;

pub use classify::{classify, classify_all, ClassifiedFunction, NameShape, ReturnContract};
pub use error::WrapError;
pub use model::{type_key, Argument, Declaration, TypeDescriptor, TypeKind};
pub use ownership::{
    match_release, resolve, OwnershipEntry, OwnershipKind, OwnershipRegistry, ReleaseMatch,
    Resolution, UnresolvedReason, UnresolvedRelease,
};
pub use profile::LibraryProfile;
