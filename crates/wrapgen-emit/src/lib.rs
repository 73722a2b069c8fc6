//! Source emission for wrapgen.
//!
//! Turns classified declarations and the ownership registry into one C++
//! source file: a fixed prologue, RAII holder types, exception-raising
//! forwarding functions, and a fixed epilogue.
//!
//! ## Modules
//!
//! - [`frame`]: Bundled and user-supplied prologue/epilogue text
//! - [`emit`]: Holder and forwarder emission
//! - [`pipeline`]: Extract → classify → resolve → emit in one call
//! - [`report`]: Summary of a generation run

pub mod emit;
pub mod error;
pub mod frame;
pub mod pipeline;
pub mod report;

pub use emit::{emit_source, unique_by_name};
pub use error::EmitError;
pub use frame::Frame;
pub use pipeline::{analyze, generate, render, Analysis, GenerateRequest, Generated};
pub use report::{ContractCounts, GenerationReport};
