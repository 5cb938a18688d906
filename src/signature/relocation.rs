// Tue Jan 13 2026 - Alex

use crate::signature::SignatureError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Instruction field rewritten by the linker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RelocKind {
    /// 26-bit jump target (`j`/`jal`).
    Targ26,
    /// Upper half of a split 32-bit immediate (`lui`).
    Hi16,
    /// Lower half of a split 32-bit immediate (`addiu`, loads, stores).
    Lo16,
}

impl RelocKind {
    pub const ALL: [RelocKind; 3] = [RelocKind::Targ26, RelocKind::Hi16, RelocKind::Lo16];

    pub fn as_str(&self) -> &'static str {
        match self {
            RelocKind::Targ26 => "targ26",
            RelocKind::Hi16 => "hi16",
            RelocKind::Lo16 => "lo16",
        }
    }

    pub fn directive(&self) -> &'static str {
        match self {
            RelocKind::Targ26 => ".targ26",
            RelocKind::Hi16 => ".hi16",
            RelocKind::Lo16 => ".lo16",
        }
    }
}

impl fmt::Display for RelocKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RelocKind {
    type Err = SignatureError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim_start_matches('.') {
            "targ26" => Ok(RelocKind::Targ26),
            "hi16" => Ok(RelocKind::Hi16),
            "lo16" => Ok(RelocKind::Lo16),
            _ => Err(SignatureError::UnknownRelocationKind(s.to_string())),
        }
    }
}

/// One relocated instruction inside a symbol.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relocation {
    pub kind: RelocKind,
    pub name: String,
    /// Byte offset of the instruction from the start of the owning symbol.
    pub offset: u32,
}

impl Relocation {
    pub fn new(kind: RelocKind, name: impl Into<String>, offset: u32) -> Self {
        Self {
            kind,
            name: name.into(),
            offset,
        }
    }

    pub fn offset(&self) -> usize {
        self.offset as usize
    }

    /// A `hi16` directly followed by a `lo16` against the same name.
    pub fn pairs_with(&self, next: &Relocation) -> bool {
        self.kind == RelocKind::Hi16 && next.kind == RelocKind::Lo16 && self.name == next.name
    }
}

impl fmt::Display for Relocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} @ {:#x}", self.kind.directive(), self.name, self.offset)
    }
}
