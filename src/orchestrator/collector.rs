// Thu Jan 16 2026 - Alex

use crate::engine::RelocationResult;
use crate::orchestrator::coordinator::ScanEvent;
use indexmap::IndexMap;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

/// A matched signature with the addresses recovered from it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolMatch {
    pub index: usize,
    pub name: String,
    pub offset: usize,
    pub relocations: Vec<RelocationResult>,
}

/// Everything a scan found, ordered by signature index.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanReport {
    pub matches: Vec<SymbolMatch>,
    pub scanned: usize,
    pub total: usize,
    pub completed: bool,
}

impl ScanReport {
    pub fn matched_count(&self) -> usize {
        self.matches.len()
    }

    pub fn unmatched_count(&self) -> usize {
        self.scanned.saturating_sub(self.matches.len())
    }

    pub fn relocation_count(&self) -> usize {
        self.matches.iter().map(|m| m.relocations.len()).sum()
    }

    pub fn get(&self, name: &str) -> Option<&SymbolMatch> {
        self.matches.iter().find(|m| m.name == name)
    }
}

#[derive(Default)]
struct Collected {
    matches: IndexMap<usize, SymbolMatch>,
    scanned: usize,
    completed: bool,
}

/// Folds scan events into a [`ScanReport`]. Safe to feed from several
/// threads; events for one signature must arrive in their emitted order.
pub struct ResultCollector {
    total: usize,
    inner: Mutex<Collected>,
}

impl ResultCollector {
    pub fn new(total: usize) -> Self {
        Self {
            total,
            inner: Mutex::new(Collected::default()),
        }
    }

    pub fn record(&self, event: ScanEvent) {
        let mut inner = self.inner.lock();
        match event {
            ScanEvent::Result { index, name, offset } => {
                inner.matches.insert(
                    index,
                    SymbolMatch {
                        index,
                        name,
                        offset,
                        relocations: Vec::new(),
                    },
                );
            }
            ScanEvent::RelocResult {
                index,
                name,
                address,
                kind,
            } => {
                if let Some(entry) = inner.matches.get_mut(&index) {
                    entry.relocations.push(RelocationResult { name, address, kind });
                }
            }
            ScanEvent::Progress { .. } => inner.scanned += 1,
            ScanEvent::Done { .. } => inner.completed = true,
        }
    }

    pub fn scanned(&self) -> usize {
        self.inner.lock().scanned
    }

    pub fn finish(self) -> ScanReport {
        let mut inner = self.inner.into_inner();
        inner.matches.sort_keys();
        ScanReport {
            matches: inner.matches.into_values().collect(),
            scanned: inner.scanned,
            total: self.total,
            completed: inner.completed,
        }
    }
}
