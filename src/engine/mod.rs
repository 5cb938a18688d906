// Tue Jan 13 2026 - Alex

pub mod matcher;
pub mod resolver;

pub use matcher::{MatchOutcome, Matcher};
pub use resolver::{AddressResolver, RelocationResult};
