// Tue Jan 13 2026 - Alex

use crate::signature::codec::WORD_SIZE;
use crate::signature::{RelocKind, Relocation, SignatureError};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of leading bytes covered by the early-rejection checksum.
pub const PREFIX_LEN: u32 = 8;

/// A validated, immutable function signature.
///
/// Relocations are sorted by strictly increasing offset and every one of them
/// covers a whole word inside the symbol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    name: String,
    size: u32,
    crc_a: u32,
    crc_b: u32,
    relocations: Vec<Relocation>,
}

impl Signature {
    pub fn new(
        name: impl Into<String>,
        size: u32,
        crc_a: u32,
        crc_b: u32,
        mut relocations: Vec<Relocation>,
    ) -> Result<Self, SignatureError> {
        let name = name.into();

        if size == 0 {
            return Err(SignatureError::EmptySymbol { name });
        }
        if size as usize % WORD_SIZE != 0 {
            return Err(SignatureError::UnalignedSize { name, size });
        }

        relocations.sort_by_key(|r| r.offset);

        let mut previous: Option<u32> = None;
        for reloc in &relocations {
            if reloc.offset as usize % WORD_SIZE != 0 {
                return Err(SignatureError::UnalignedRelocation { name, offset: reloc.offset });
            }
            if reloc.offset >= size || size - reloc.offset < WORD_SIZE as u32 {
                return Err(SignatureError::RelocationOutOfRange {
                    name,
                    offset: reloc.offset,
                    size,
                });
            }
            if previous == Some(reloc.offset) {
                return Err(SignatureError::DuplicateRelocation { name, offset: reloc.offset });
            }
            previous = Some(reloc.offset);
        }

        Ok(Self {
            name,
            size,
            crc_a,
            crc_b,
            relocations,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn len(&self) -> usize {
        self.size as usize
    }

    pub fn crc_a(&self) -> u32 {
        self.crc_a
    }

    pub fn crc_b(&self) -> u32 {
        self.crc_b
    }

    pub fn relocations(&self) -> &[Relocation] {
        &self.relocations
    }

    pub fn has_relocations(&self) -> bool {
        !self.relocations.is_empty()
    }

    /// Length of the crcA window, `min(size, 8)`.
    pub fn prefix_len(&self) -> usize {
        self.size.min(PREFIX_LEN) as usize
    }

    pub fn count_relocations(&self, kind: RelocKind) -> usize {
        self.relocations.iter().filter(|r| r.kind == kind).count()
    }

    /// Storage form, one relocation record per `(kind, name)` in order of
    /// first use.
    pub fn to_record(&self) -> SignatureRecord {
        let mut grouped: IndexMap<(RelocKind, &str), Vec<u32>> = IndexMap::new();
        for reloc in &self.relocations {
            grouped.entry((reloc.kind, reloc.name.as_str())).or_default().push(reloc.offset);
        }

        let mut record = SignatureRecord::new(self.name.clone(), self.size, self.crc_a, self.crc_b);
        for ((kind, name), offsets) in grouped {
            record = record.with_relocation(kind, name, offsets);
        }
        record
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({:#x} bytes, crc {:08X}/{:08X}, {} relocations)",
            self.name,
            self.size,
            self.crc_a,
            self.crc_b,
            self.relocations.len()
        )
    }
}

/// Relocations against one name and kind, as stored in a database file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelocationRecord {
    pub kind: RelocKind,
    pub name: String,
    pub offsets: Vec<u32>,
}

/// Unvalidated symbol record as read from storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignatureRecord {
    pub name: String,
    pub size: u32,
    pub crc_a: u32,
    pub crc_b: u32,
    #[serde(default)]
    pub relocations: Vec<RelocationRecord>,
}

impl SignatureRecord {
    pub fn new(name: impl Into<String>, size: u32, crc_a: u32, crc_b: u32) -> Self {
        Self {
            name: name.into(),
            size,
            crc_a,
            crc_b,
            relocations: Vec::new(),
        }
    }

    pub fn with_relocation(mut self, kind: RelocKind, name: impl Into<String>, offsets: Vec<u32>) -> Self {
        self.relocations.push(RelocationRecord {
            kind,
            name: name.into(),
            offsets,
        });
        self
    }

    /// Expand per-name offset lists into individual relocations and validate.
    pub fn into_signature(self) -> Result<Signature, SignatureError> {
        let relocations = self
            .relocations
            .into_iter()
            .flat_map(|record| {
                let RelocationRecord { kind, name, offsets } = record;
                offsets
                    .into_iter()
                    .map(move |offset| Relocation::new(kind, name.clone(), offset))
            })
            .collect();

        Signature::new(self.name, self.size, self.crc_a, self.crc_b, relocations)
    }
}
