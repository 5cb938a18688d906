// Tue Jan 13 2026 - Alex

pub mod error;
pub mod exporter;
pub mod formatter;

pub use error::OutputError;
pub use exporter::write_output;
pub use formatter::{OutputFormat, OutputFormatter};

use crate::memory::{Address, AddressSpace};
use crate::orchestrator::ScanReport;
use crate::signature::RelocKind;
use indexmap::IndexMap;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SymbolKind {
    Code,
    Data,
}

impl SymbolKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SymbolKind::Code => "code",
            SymbolKind::Data => "data",
        }
    }
}

impl fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a symbol in the list came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SymbolSource {
    /// The signature itself matched here.
    Match,
    /// Recovered from a relocation inside a matched signature.
    Reference,
}

impl SymbolSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            SymbolSource::Match => "match",
            SymbolSource::Reference => "reference",
        }
    }
}

impl fmt::Display for SymbolSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolEntry {
    pub address: Address,
    pub kind: SymbolKind,
    pub name: String,
    pub source: SymbolSource,
}

/// Named addresses, unique by address and sorted ascending.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolList {
    pub entries: Vec<SymbolEntry>,
}

impl SymbolList {
    /// Matches are placed first so they win over references to the same
    /// address. Matches that fall inside the header have no address and are
    /// left out.
    pub fn from_report(report: &ScanReport, space: &AddressSpace) -> Self {
        let mut by_address: IndexMap<Address, SymbolEntry> = IndexMap::new();

        for found in &report.matches {
            match space.to_address(found.offset) {
                Ok(address) => {
                    by_address.entry(address).or_insert_with(|| SymbolEntry {
                        address,
                        kind: SymbolKind::Code,
                        name: found.name.clone(),
                        source: SymbolSource::Match,
                    });
                }
                Err(e) => log::warn!("Skipping {}: {}", found.name, e),
            }
        }

        for reloc in report.matches.iter().flat_map(|m| m.relocations.iter()) {
            let address = Address::new(reloc.address);
            let kind = match reloc.kind {
                RelocKind::Targ26 => SymbolKind::Code,
                RelocKind::Hi16 | RelocKind::Lo16 => SymbolKind::Data,
            };
            by_address.entry(address).or_insert_with(|| SymbolEntry {
                address,
                kind,
                name: reloc.name.clone(),
                source: SymbolSource::Reference,
            });
        }

        let entries = by_address
            .into_values()
            .sorted_by_key(|entry| entry.address)
            .collect();
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SymbolEntry> {
        self.entries.iter()
    }

    pub fn count_kind(&self, kind: SymbolKind) -> usize {
        self.entries.iter().filter(|e| e.kind == kind).count()
    }
}
