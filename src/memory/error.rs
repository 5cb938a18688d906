// Tue Jan 13 2026 - Alex

use thiserror::Error;

#[derive(Error, Debug)]
pub enum MemoryError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Image is empty: {0}")]
    EmptyImage(String),
    #[error("Offset {offset:#x} precedes the {header:#x} byte header")]
    InsideHeader { offset: usize, header: u32 },
}
