// Tue Jan 13 2026 - Alex

//! Fixtures for building synthetic MIPS functions and the signatures that
//! describe them.

use crate::memory::ImageReader;
use crate::signature::codec::{self, WORD_SIZE};
use crate::signature::{RelocKind, Relocation, Signature, PREFIX_LEN};
use crate::utils::crc32::Crc32;
use std::cell::Cell;

pub const NOP: u32 = 0x0000_0000;
pub const JR_RA: u32 = 0x03E0_0008;

pub const SP: u32 = 29;
pub const RA: u32 = 31;
pub const A0: u32 = 4;
pub const V0: u32 = 2;

pub fn jal(target: u32) -> u32 {
    0x0C00_0000 | ((target >> 2) & 0x03FF_FFFF)
}

pub fn lui(rt: u32, imm: u16) -> u32 {
    0x3C00_0000 | (rt << 16) | imm as u32
}

pub fn addiu(rt: u32, rs: u32, imm: i16) -> u32 {
    0x2400_0000 | (rs << 21) | (rt << 16) | imm as u16 as u32
}

pub fn sw(rt: u32, base: u32, imm: i16) -> u32 {
    0xAC00_0000 | (base << 21) | (rt << 16) | imm as u16 as u32
}

pub fn lw(rt: u32, base: u32, imm: i16) -> u32 {
    0x8C00_0000 | (base << 21) | (rt << 16) | imm as u16 as u32
}

/// Assembles a function word by word, recording relocations as it goes.
#[derive(Debug, Clone)]
pub struct FunctionBuilder {
    name: String,
    words: Vec<u32>,
    relocations: Vec<Relocation>,
}

impl FunctionBuilder {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            words: Vec::new(),
            relocations: Vec::new(),
        }
    }

    pub fn word(mut self, word: u32) -> Self {
        self.words.push(word);
        self
    }

    pub fn words(mut self, words: &[u32]) -> Self {
        self.words.extend_from_slice(words);
        self
    }

    pub fn reloc(mut self, kind: RelocKind, name: &str, word: u32) -> Self {
        let offset = (self.words.len() * WORD_SIZE) as u32;
        self.relocations.push(Relocation::new(kind, name, offset));
        self.words.push(word);
        self
    }

    pub fn bytes(&self) -> Vec<u8> {
        self.words.iter().flat_map(|w| w.to_be_bytes()).collect()
    }

    pub fn relocations(&self) -> &[Relocation] {
        &self.relocations
    }

    pub fn signature(&self) -> Signature {
        let bytes = self.bytes();
        let (crc_a, crc_b) = masked_checksums(&bytes, &self.relocations);
        Signature::new(
            self.name.clone(),
            bytes.len() as u32,
            crc_a,
            crc_b,
            self.relocations.clone(),
        )
        .unwrap()
    }
}

/// Reference checksums: mask a copy of the whole body, then hash it in one go.
pub fn masked_checksums(bytes: &[u8], relocations: &[Relocation]) -> (u32, u32) {
    let mut masked = bytes.to_vec();
    for reloc in relocations {
        let at = reloc.offset();
        let raw = codec::read_word(&masked[at..]).unwrap();
        masked[at..at + WORD_SIZE].copy_from_slice(&codec::mask(raw, reloc.kind));
    }

    let prefix = masked.len().min(PREFIX_LEN as usize);
    let mut crc = Crc32::new();
    crc.update(&masked[..prefix]);
    let crc_a = crc.value();
    crc.update(&masked[prefix..]);
    (crc_a, crc.value())
}

/// `len` bytes of filler with `body` copied in at `at`.
pub fn image_with(len: usize, at: usize, body: &[u8]) -> Vec<u8> {
    let mut image: Vec<u8> = (0..len).map(|i| (i as u8).wrapping_mul(37) ^ 0x5A).collect();
    image[at..at + body.len()].copy_from_slice(body);
    image
}

pub fn put_words(image: &mut [u8], at: usize, words: &[u32]) {
    for (i, word) in words.iter().enumerate() {
        let start = at + i * WORD_SIZE;
        image[start..start + WORD_SIZE].copy_from_slice(&word.to_be_bytes());
    }
}

/// Reader that remembers the furthest byte anyone asked for.
pub struct TrackingReader {
    data: Vec<u8>,
    max_end: Cell<usize>,
    reads: Cell<usize>,
}

impl TrackingReader {
    pub fn new(data: Vec<u8>) -> Self {
        Self {
            data,
            max_end: Cell::new(0),
            reads: Cell::new(0),
        }
    }

    pub fn max_end(&self) -> usize {
        self.max_end.get()
    }

    pub fn reads(&self) -> usize {
        self.reads.get()
    }
}

impl ImageReader for TrackingReader {
    fn len(&self) -> usize {
        self.data.len()
    }

    fn read_bytes(&self, offset: usize, len: usize) -> Option<&[u8]> {
        self.reads.set(self.reads.get() + 1);
        let end = offset.saturating_add(len);
        if end > self.max_end.get() {
            self.max_end.set(end);
        }
        self.data.read_bytes(offset, len)
    }
}
