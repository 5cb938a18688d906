// Wed Jan 15 2026 - Alex

use crate::orchestrator::ScanEvent;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::time::Duration;

const TEMPLATE: &str = "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}";

/// Progress bar driven by scan events, one step per finished signature.
pub struct ScanProgress {
    bar: ProgressBar,
    matched: usize,
    references: usize,
}

impl ScanProgress {
    pub fn new(total: usize, visible: bool) -> Self {
        let style = ProgressStyle::default_bar()
            .template(TEMPLATE)
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▓▒░ ");

        let bar = ProgressBar::new(total as u64);
        bar.set_style(style);
        if visible {
            bar.enable_steady_tick(Duration::from_millis(100));
        } else {
            bar.set_draw_target(ProgressDrawTarget::hidden());
        }

        Self {
            bar,
            matched: 0,
            references: 0,
        }
    }

    pub fn hidden(total: usize) -> Self {
        Self::new(total, false)
    }

    pub fn on_event(&mut self, event: &ScanEvent) {
        match event {
            ScanEvent::Result { name, .. } => {
                self.matched += 1;
                self.bar.set_message(name.clone());
            }
            ScanEvent::RelocResult { .. } => self.references += 1,
            ScanEvent::Progress { .. } => self.bar.inc(1),
            ScanEvent::Done { .. } => {
                self.bar.set_message(format!("{} matched", self.matched));
            }
        }
    }

    pub fn matched(&self) -> usize {
        self.matched
    }

    pub fn references(&self) -> usize {
        self.references
    }

    pub fn position(&self) -> u64 {
        self.bar.position()
    }

    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signature::RelocKind;

    #[test]
    fn test_counts_events() {
        let mut progress = ScanProgress::hidden(2);
        let events = [
            ScanEvent::Result { index: 0, name: "osInitialize".into(), offset: 0x40 },
            ScanEvent::RelocResult {
                index: 0,
                name: "__osInitialize_common".into(),
                address: 0x8000_1000,
                kind: RelocKind::Targ26,
            },
            ScanEvent::Progress { index: 0, matched: true },
            ScanEvent::Progress { index: 1, matched: false },
            ScanEvent::Done { scanned: 2 },
        ];
        for event in &events {
            progress.on_event(event);
        }
        assert_eq!(progress.matched(), 1);
        assert_eq!(progress.references(), 1);
        assert_eq!(progress.position(), 2);
        progress.finish();
    }
}
