// Thu Jan 16 2026 - Alex

use crate::memory::ImageReader;
use crate::orchestrator::collector::{ResultCollector, ScanReport};
use crate::orchestrator::coordinator::{ScanCoordinator, ScanEvent, ScanPolicy};
use crate::orchestrator::ScanError;
use crate::signature::Signature;
use rayon::prelude::*;
use std::ops::Range;
use std::sync::mpsc::{channel, Sender};
use std::thread;

/// Split `total` signatures into at most `units` contiguous, disjoint,
/// non-empty ranges whose sizes differ by at most one.
pub fn partition(total: usize, units: usize) -> Vec<Range<usize>> {
    if total == 0 {
        return Vec::new();
    }

    let units = units.clamp(1, total);
    let base = total / units;
    let extra = total % units;

    let mut ranges = Vec::with_capacity(units);
    let mut start = 0;
    for unit in 0..units {
        let len = base + usize::from(unit < extra);
        ranges.push(start..start + len);
        start += len;
    }
    ranges
}

/// Runs a batch across a rayon pool, one coordinator per slice.
pub struct ParallelScanner {
    threads: usize,
    units_per_thread: usize,
    policy: ScanPolicy,
}

impl ParallelScanner {
    pub fn new(threads: usize) -> Self {
        Self {
            threads: threads.max(1),
            units_per_thread: 4,
            policy: ScanPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: ScanPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Number of signature slices handed to each pool thread.
    pub fn with_units_per_thread(mut self, units: usize) -> Self {
        self.units_per_thread = units.max(1);
        self
    }

    pub fn threads(&self) -> usize {
        self.threads
    }

    pub fn policy(&self) -> &ScanPolicy {
        &self.policy
    }

    /// Scan every signature and send events to `sender` as they happen.
    ///
    /// Events of one signature arrive in order and contiguously; signatures
    /// from different slices interleave. Exactly one `Done` is sent last. A
    /// closed receiver stops each slice at its next send.
    pub fn scan<R>(&self, image: &R, signatures: &[Signature], sender: Sender<ScanEvent>) -> Result<(), ScanError>
    where
        R: ImageReader + Sync + ?Sized,
    {
        let pool = rayon::ThreadPoolBuilder::new().num_threads(self.threads).build()?;
        let ranges = partition(signatures.len(), self.threads * self.units_per_thread);
        log::debug!(
            "Scanning {} signatures in {} slices on {} threads",
            signatures.len(),
            ranges.len(),
            self.threads
        );

        let policy = &self.policy;
        let unit_sender = sender.clone();
        pool.install(move || {
            ranges.into_par_iter().for_each_with(unit_sender, |tx, range| {
                let first = range.start;
                let events = ScanCoordinator::new(image, &signatures[range], policy)
                    .with_first_index(first)
                    .events()
                    .filter(|event| !matches!(event, ScanEvent::Done { .. }));
                for event in events {
                    if tx.send(event).is_err() {
                        return;
                    }
                }
            });
        });

        let _ = sender.send(ScanEvent::Done {
            scanned: signatures.len(),
        });
        Ok(())
    }

    /// Scan on a background thread, handing each event to `on_event` on the
    /// calling thread before collecting it into the report.
    pub fn run<R, F>(&self, image: &R, signatures: &[Signature], mut on_event: F) -> Result<ScanReport, ScanError>
    where
        R: ImageReader + Sync + ?Sized,
        F: FnMut(&ScanEvent),
    {
        let (tx, rx) = channel();
        let collector = ResultCollector::new(signatures.len());

        thread::scope(|scope| {
            let worker = scope.spawn(move || self.scan(image, signatures, tx));

            for event in rx {
                on_event(&event);
                collector.record(event);
            }

            worker.join().map_err(|_| ScanError::WorkerPanicked)?
        })?;

        Ok(collector.finish())
    }
}

impl Default for ParallelScanner {
    fn default() -> Self {
        Self::new(num_cpus::get())
    }
}
