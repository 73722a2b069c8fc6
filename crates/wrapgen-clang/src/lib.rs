//! Declaration extraction for wrapgen.
//!
//! Runs a C front end over one header, decodes the JSON AST it dumps, and
//! returns the library's public function declarations in first-seen order.
//!
//! ## Modules
//!
//! - [`frontend`]: The [`FrontEnd`] seam and the clang subprocess implementation
//! - [`ast`]: Serde model of clang's JSON AST nodes
//! - [`extract`]: Traversal from AST to [`Extraction`]

pub mod ast;
pub mod error;
pub mod extract;
pub mod frontend;

pub use error::ExtractError;
pub use extract::{extract_from_json, extract_header, Extraction};
pub use frontend::{include_flag, ClangFrontEnd, FrontEnd};
