//! Generation report.

use std::fmt;

use serde::Serialize;
use sha2::{Digest, Sha256};
use wrapgen_core::{ReturnContract, UnresolvedRelease};

/// Forwarder counts per return contract.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ContractCounts {
    pub boolean_success: usize,
    pub nullable_pointer: usize,
    pub unchecked: usize,
    pub void: usize,
}

impl ContractCounts {
    pub fn record(&mut self, contract: ReturnContract) {
        *self.slot(contract) += 1;
    }

    pub fn get(&self, contract: ReturnContract) -> usize {
        match contract {
            ReturnContract::BooleanSuccess => self.boolean_success,
            ReturnContract::NullablePointer => self.nullable_pointer,
            ReturnContract::Unchecked => self.unchecked,
            ReturnContract::Void => self.void,
        }
    }

    fn slot(&mut self, contract: ReturnContract) -> &mut usize {
        match contract {
            ReturnContract::BooleanSuccess => &mut self.boolean_success,
            ReturnContract::NullablePointer => &mut self.nullable_pointer,
            ReturnContract::Unchecked => &mut self.unchecked,
            ReturnContract::Void => &mut self.void,
        }
    }
}

/// Summary of one generation run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GenerationReport {
    /// Prefixed declarations found in the header.
    pub declarations: usize,
    /// Declarations dropped by the skip list.
    pub skipped: usize,
    /// Redeclarations folded into an earlier forwarder.
    pub duplicates: usize,
    /// Forwarding functions emitted.
    pub forwarders: usize,
    pub contracts: ContractCounts,
    /// Variadic functions forwarded with fixed parameters only.
    pub variadic: usize,
    pub single_owner_holders: usize,
    pub device_owned_holders: usize,
    pub structs: usize,
    /// Release-like functions left out of the ownership registry.
    pub unresolved: Vec<UnresolvedRelease>,
    /// Hex SHA-256 of the emitted source.
    pub digest: String,
}

impl GenerationReport {
    pub fn holders(&self) -> usize {
        self.single_owner_holders + self.device_owned_holders
    }
}

/// Hex SHA-256 digest of generated source text.
pub fn source_digest(source: &str) -> String {
    Sha256::digest(source.as_bytes())
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect()
}

impl fmt::Display for GenerationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Generation Report ===")?;
        writeln!(
            f,
            "Declarations: {} ({} skipped, {} duplicates)",
            self.declarations, self.skipped, self.duplicates
        )?;
        writeln!(f, "Structs: {}", self.structs)?;
        writeln!(f)?;

        writeln!(f, "--- Forwarders: {} ---", self.forwarders)?;
        for contract in ReturnContract::ALL {
            writeln!(f, "  {contract}: {}", self.contracts.get(contract))?;
        }
        if self.variadic > 0 {
            writeln!(f, "  variadic (fixed parameters only): {}", self.variadic)?;
        }

        writeln!(f)?;
        writeln!(f, "--- Holders: {} ---", self.holders())?;
        writeln!(f, "  single-owner: {}", self.single_owner_holders)?;
        writeln!(f, "  device-owned: {}", self.device_owned_holders)?;

        if !self.unresolved.is_empty() {
            writeln!(f)?;
            writeln!(f, "--- Unresolved releases: {} ---", self.unresolved.len())?;
            for release in &self.unresolved {
                writeln!(f, "  {release}")?;
            }
        }

        writeln!(f)?;
        writeln!(f, "Digest: {}", self.digest)
    }
}
