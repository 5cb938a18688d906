// Tue Jan 13 2026 - Alex

pub mod candidates;
pub mod collector;
pub mod coordinator;
pub mod error;
pub mod scheduler;

pub use candidates::likely_function_offsets;
pub use collector::{ResultCollector, ScanReport, SymbolMatch};
pub use coordinator::{ScanCoordinator, ScanEvent, ScanEvents, ScanPolicy};
pub use error::ScanError;
pub use scheduler::{partition, ParallelScanner};
