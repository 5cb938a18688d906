// Tue Jan 13 2026 - Alex

//! Masking and decoding of relocated MIPS instruction fields.
//!
//! Instructions are big-endian 32-bit words. Masking always works on a copy of
//! the four bytes; the image itself is never touched.

use crate::signature::RelocKind;

pub const WORD_SIZE: usize = 4;

/// KSEG0 base that `j`/`jal` targets are resolved against.
pub const TARG26_BASE: u32 = 0x8000_0000;

const TARG26_FIELD: u32 = 0x03FF_FFFF;

/// Contribution of one relocated instruction to a resolved address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Contribution {
    /// Complete address from a jump target.
    Address(u32),
    /// Upper half of a split address.
    High(u16),
    /// Sign-extended lower half of a split address.
    Low(i16),
}

/// Zero the relocatable field of `raw` for checksumming.
pub fn mask(raw: [u8; WORD_SIZE], kind: RelocKind) -> [u8; WORD_SIZE] {
    let mut word = raw;
    match kind {
        RelocKind::Targ26 => {
            word[0] &= 0xFC;
            word[1] = 0;
            word[2] = 0;
            word[3] = 0;
        }
        RelocKind::Hi16 | RelocKind::Lo16 => {
            word[2] = 0;
            word[3] = 0;
        }
    }
    word
}

/// Decode the field of an unmasked instruction.
pub fn decode(raw: [u8; WORD_SIZE], kind: RelocKind) -> Contribution {
    let word = u32::from_be_bytes(raw);
    match kind {
        RelocKind::Targ26 => Contribution::Address(TARG26_BASE + (word & TARG26_FIELD) * 4),
        RelocKind::Hi16 => Contribution::High((word & 0xFFFF) as u16),
        RelocKind::Lo16 => Contribution::Low((word & 0xFFFF) as u16 as i16),
    }
}

/// `(hi << 16) + sext(lo)`, truncated to 32 bits.
pub fn combine(hi: u16, lo: i16) -> u32 {
    ((hi as u32) << 16).wrapping_add(lo as i32 as u32)
}

pub fn read_word(bytes: &[u8]) -> Option<[u8; WORD_SIZE]> {
    bytes.get(..WORD_SIZE)?.try_into().ok()
}
