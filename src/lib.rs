// Tue Jan 13 2026 - Alex

pub mod config;
pub mod engine;
pub mod memory;
pub mod orchestrator;
pub mod output;
pub mod signature;
pub mod ui;
pub mod utils;

pub use config::Config;
pub use engine::{AddressResolver, MatchOutcome, Matcher, RelocationResult};
pub use memory::{Address, AddressSpace, BinaryImage, ImageReader};
pub use orchestrator::{ParallelScanner, ScanCoordinator, ScanEvent, ScanPolicy, ScanReport};
pub use output::{OutputFormat, OutputFormatter, SymbolList};
pub use signature::{RelocKind, Relocation, Signature, SignatureDatabase};
