// Tue Jan 13 2026 - Alex

use log::LevelFilter;
use std::time::Instant;

pub fn level_from_str(s: &str) -> LevelFilter {
    match s.to_lowercase().as_str() {
        "error" => LevelFilter::Error,
        "warn" | "warning" => LevelFilter::Warn,
        "info" => LevelFilter::Info,
        "debug" => LevelFilter::Debug,
        "trace" => LevelFilter::Trace,
        "off" => LevelFilter::Off,
        _ => LevelFilter::Info,
    }
}

/// `-v` raises the configured level one step per flag.
pub fn raise_level(level: LevelFilter, verbosity: u8) -> LevelFilter {
    let mut level = level;
    for _ in 0..verbosity {
        level = match level {
            LevelFilter::Off => LevelFilter::Error,
            LevelFilter::Error => LevelFilter::Warn,
            LevelFilter::Warn => LevelFilter::Info,
            LevelFilter::Info => LevelFilter::Debug,
            LevelFilter::Debug | LevelFilter::Trace => LevelFilter::Trace,
        };
    }
    level
}

/// Install the global logger. Safe to call more than once; later calls are
/// ignored.
pub fn init_logging(level: LevelFilter) {
    let _ = env_logger::Builder::new()
        .filter_level(level)
        .format_timestamp(None)
        .try_init();
}

pub struct ScopedTimer {
    name: String,
    start: Instant,
}

impl ScopedTimer {
    pub fn new(name: &str) -> Self {
        log::debug!("[TIMER] {} started", name);
        Self {
            name: name.to_string(),
            start: Instant::now(),
        }
    }

    pub fn elapsed_ms(&self) -> f64 {
        self.start.elapsed().as_secs_f64() * 1000.0
    }
}

impl Drop for ScopedTimer {
    fn drop(&mut self) {
        log::debug!("[TIMER] {} took {:.2}ms", self.name, self.elapsed_ms());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_from_str() {
        assert_eq!(level_from_str("DEBUG"), LevelFilter::Debug);
        assert_eq!(level_from_str("warning"), LevelFilter::Warn);
        assert_eq!(level_from_str("nonsense"), LevelFilter::Info);
    }

    #[test]
    fn test_raise_level() {
        assert_eq!(raise_level(LevelFilter::Info, 0), LevelFilter::Info);
        assert_eq!(raise_level(LevelFilter::Info, 1), LevelFilter::Debug);
        assert_eq!(raise_level(LevelFilter::Warn, 5), LevelFilter::Trace);
    }

    #[test]
    fn test_init_twice_is_harmless() {
        init_logging(LevelFilter::Debug);
        init_logging(LevelFilter::Trace);
        let timer = ScopedTimer::new("noop");
        assert!(timer.elapsed_ms() >= 0.0);
    }
}
