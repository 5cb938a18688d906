// Tue Jan 13 2026 - Alex

pub mod codec;
pub mod database;
pub mod error;
pub mod parser;
pub mod relocation;
pub mod signature;

pub use codec::Contribution;
pub use database::{LoadReport, RejectedRecord, SignatureDatabase, SignatureFormat};
pub use error::SignatureError;
pub use relocation::{RelocKind, Relocation};
pub use signature::{RelocationRecord, Signature, SignatureRecord, PREFIX_LEN};
