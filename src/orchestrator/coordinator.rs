// Thu Jan 16 2026 - Alex

use crate::engine::{AddressResolver, Matcher, RelocationResult};
use crate::memory::ImageReader;
use crate::signature::codec::WORD_SIZE;
use crate::signature::{RelocKind, Signature};
use std::collections::VecDeque;

/// How candidate offsets are chosen for each signature.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ScanPolicy {
    /// Only these offsets, in this order.
    Targeted(Vec<usize>),
    /// Every word-aligned offset at which the symbol fits.
    #[default]
    Exhaustive,
}

impl ScanPolicy {
    /// `thorough` forces a full sweep; otherwise a supplied list is used as is.
    pub fn select(candidates: Option<Vec<usize>>, thorough: bool) -> Self {
        match candidates {
            Some(list) if !thorough => ScanPolicy::Targeted(list),
            _ => ScanPolicy::Exhaustive,
        }
    }

    pub fn is_exhaustive(&self) -> bool {
        matches!(self, ScanPolicy::Exhaustive)
    }
}

/// Event produced while scanning a batch. `index` is the signature's position
/// in the batch it was drawn from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanEvent {
    Result { index: usize, name: String, offset: usize },
    RelocResult { index: usize, name: String, address: u32, kind: RelocKind },
    /// One signature finished, matched or not.
    Progress { index: usize, matched: bool },
    /// The whole batch finished.
    Done { scanned: usize },
}

impl ScanEvent {
    pub fn index(&self) -> Option<usize> {
        match self {
            ScanEvent::Result { index, .. }
            | ScanEvent::RelocResult { index, .. }
            | ScanEvent::Progress { index, .. } => Some(*index),
            ScanEvent::Done { .. } => None,
        }
    }
}

pub struct ScanCoordinator<'a, R: ImageReader + ?Sized> {
    image: &'a R,
    signatures: &'a [Signature],
    policy: &'a ScanPolicy,
    first_index: usize,
}

impl<'a, R: ImageReader + ?Sized> ScanCoordinator<'a, R> {
    pub fn new(image: &'a R, signatures: &'a [Signature], policy: &'a ScanPolicy) -> Self {
        Self {
            image,
            signatures,
            policy,
            first_index: 0,
        }
    }

    /// Number the signatures from `first` instead of zero, for slices of a
    /// larger batch.
    pub fn with_first_index(mut self, first: usize) -> Self {
        self.first_index = first;
        self
    }

    /// First offset at which `signature` matches under the current policy.
    pub fn find(&self, signature: &Signature) -> Option<usize> {
        let matcher = Matcher::new(self.image);
        match self.policy {
            ScanPolicy::Targeted(candidates) => candidates
                .iter()
                .copied()
                .find(|&offset| matcher.matches(offset, signature)),
            ScanPolicy::Exhaustive => {
                let last = self.image.len().checked_sub(signature.len())?;
                (0..=last)
                    .step_by(WORD_SIZE)
                    .find(|&offset| matcher.matches(offset, signature))
            }
        }
    }

    pub fn resolve(&self, offset: usize, signature: &Signature) -> Vec<RelocationResult> {
        AddressResolver::new(self.image).resolve(offset, signature)
    }

    /// Lazily scan the batch, one signature per step.
    pub fn events(self) -> ScanEvents<'a, R> {
        ScanEvents {
            coordinator: self,
            next: 0,
            pending: VecDeque::new(),
            finished: false,
        }
    }
}

pub struct ScanEvents<'a, R: ImageReader + ?Sized> {
    coordinator: ScanCoordinator<'a, R>,
    next: usize,
    pending: VecDeque<ScanEvent>,
    finished: bool,
}

impl<'a, R: ImageReader + ?Sized> ScanEvents<'a, R> {
    fn scan_next(&mut self) {
        let coordinator = &self.coordinator;
        let signature = &coordinator.signatures[self.next];
        let index = coordinator.first_index + self.next;
        self.next += 1;

        let found = coordinator.find(signature);
        if let Some(offset) = found {
            log::debug!("Found {} at {:#x}", signature.name(), offset);
            self.pending.push_back(ScanEvent::Result {
                index,
                name: signature.name().to_string(),
                offset,
            });
            for result in coordinator.resolve(offset, signature) {
                self.pending.push_back(ScanEvent::RelocResult {
                    index,
                    name: result.name,
                    address: result.address,
                    kind: result.kind,
                });
            }
        }
        self.pending.push_back(ScanEvent::Progress {
            index,
            matched: found.is_some(),
        });
    }
}

impl<'a, R: ImageReader + ?Sized> Iterator for ScanEvents<'a, R> {
    type Item = ScanEvent;

    fn next(&mut self) -> Option<ScanEvent> {
        if let Some(event) = self.pending.pop_front() {
            return Some(event);
        }
        if self.next < self.coordinator.signatures.len() {
            self.scan_next();
            return self.pending.pop_front();
        }
        if !self.finished {
            self.finished = true;
            return Some(ScanEvent::Done {
                scanned: self.coordinator.signatures.len(),
            });
        }
        None
    }
}
