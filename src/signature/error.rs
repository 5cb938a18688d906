// Tue Jan 13 2026 - Alex

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SignatureError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Directory walk error: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Parse error on line {line}: {message}")]
    Parse { line: usize, message: String },
    #[error("Unknown relocation kind: {0}")]
    UnknownRelocationKind(String),
    #[error("Symbol '{name}' has zero size")]
    EmptySymbol { name: String },
    #[error("Symbol '{name}' size {size:#x} is not a multiple of 4")]
    UnalignedSize { name: String, size: u32 },
    #[error("Symbol '{name}' relocation at {offset:#x} lies outside its {size:#x} bytes")]
    RelocationOutOfRange { name: String, offset: u32, size: u32 },
    #[error("Symbol '{name}' relocation at {offset:#x} is not word aligned")]
    UnalignedRelocation { name: String, offset: u32 },
    #[error("Symbol '{name}' has more than one relocation at {offset:#x}")]
    DuplicateRelocation { name: String, offset: u32 },
}

impl SignatureError {
    pub fn parse(line: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            line,
            message: message.into(),
        }
    }

    /// True for errors that reject a single record rather than a whole file.
    pub fn is_malformed_record(&self) -> bool {
        matches!(
            self,
            Self::EmptySymbol { .. }
                | Self::UnalignedSize { .. }
                | Self::RelocationOutOfRange { .. }
                | Self::UnalignedRelocation { .. }
                | Self::DuplicateRelocation { .. }
        )
    }
}
