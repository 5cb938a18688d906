// Wed Jan 15 2026 - Alex

use crate::memory::ImageReader;
use crate::signature::codec::{self, WORD_SIZE};
use crate::signature::{Relocation, Signature};
use crate::utils::crc32::Crc32;

/// Outcome of testing one signature at one offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchOutcome {
    Matched,
    /// The symbol would run past the end of the image.
    OutOfRange,
    /// Rejected by crcA; nothing past the prefix was read.
    PrefixMismatch,
    /// crcA agreed, crcB did not.
    BodyMismatch,
}

impl MatchOutcome {
    pub fn is_match(&self) -> bool {
        matches!(self, MatchOutcome::Matched)
    }
}

/// Tests signatures against a binary image with relocated fields masked out.
///
/// Stateless apart from the borrowed image, so one matcher can be shared by
/// any number of threads when the reader is `Sync`.
pub struct Matcher<'a, R: ImageReader + ?Sized> {
    image: &'a R,
}

impl<'a, R: ImageReader + ?Sized> Matcher<'a, R> {
    pub fn new(image: &'a R) -> Self {
        Self { image }
    }

    pub fn matches(&self, offset: usize, signature: &Signature) -> bool {
        self.test(offset, signature).is_match()
    }

    pub fn test(&self, offset: usize, signature: &Signature) -> MatchOutcome {
        if !self.image.in_bounds(offset, signature.len()) {
            return MatchOutcome::OutOfRange;
        }

        let mut walk = Walk {
            image: self.image,
            base: offset,
            pos: 0,
            relocations: signature.relocations(),
            next: 0,
        };

        let mut crc_a = Crc32::new();
        let mut crc_b = Crc32::new();

        let fed = walk.feed_until(signature.prefix_len(), |bytes| {
            crc_a.update(bytes);
            crc_b.update(bytes);
        });
        if fed.is_none() {
            return MatchOutcome::OutOfRange;
        }
        if crc_a.value() != signature.crc_a() {
            return MatchOutcome::PrefixMismatch;
        }

        if walk.feed_until(signature.len(), |bytes| crc_b.update(bytes)).is_none() {
            return MatchOutcome::OutOfRange;
        }
        if crc_b.value() != signature.crc_b() {
            return MatchOutcome::BodyMismatch;
        }

        log::trace!("{} matched at {:#x}", signature.name(), offset);
        MatchOutcome::Matched
    }
}

/// Cursor over a candidate symbol that yields raw runs between relocations and
/// masked words at them.
struct Walk<'a, R: ImageReader + ?Sized> {
    image: &'a R,
    base: usize,
    pos: usize,
    relocations: &'a [Relocation],
    next: usize,
}

impl<'a, R: ImageReader + ?Sized> Walk<'a, R> {
    /// Feed everything from the cursor up to `limit` (relative to the symbol)
    /// into `sink`. `limit` is always word aligned, as are relocations, so a
    /// masked word never straddles it.
    fn feed_until<F>(&mut self, limit: usize, mut sink: F) -> Option<()>
    where
        F: FnMut(&[u8]),
    {
        while self.pos < limit {
            match self.relocations.get(self.next) {
                Some(reloc) if reloc.offset() == self.pos => {
                    let raw = self.image.read_word(self.base + self.pos)?;
                    sink(&codec::mask(raw, reloc.kind));
                    self.pos += WORD_SIZE;
                    self.next += 1;
                }
                upcoming => {
                    let end = upcoming.map(|r| r.offset()).unwrap_or(limit).min(limit);
                    let bytes = self.image.read_bytes(self.base + self.pos, end - self.pos)?;
                    sink(bytes);
                    self.pos = end;
                }
            }
        }
        Some(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signature::RelocKind;
    use crate::utils::testing::*;

    fn leaf() -> FunctionBuilder {
        FunctionBuilder::new("osGetCount").words(&[0x4002_4800, JR_RA, NOP, NOP])
    }

    fn caller() -> FunctionBuilder {
        FunctionBuilder::new("osCreateThread")
            .word(addiu(SP, SP, -24))
            .reloc(RelocKind::Targ26, "__osDisableInt", jal(0x8032_1000))
            .word(sw(RA, SP, 20))
            .reloc(RelocKind::Hi16, "__osActiveQueue", lui(A0, 0x8033))
            .reloc(RelocKind::Lo16, "__osActiveQueue", addiu(A0, A0, -0x7F00))
            .word(lw(RA, SP, 20))
            .word(JR_RA)
            .word(addiu(SP, SP, 24))
    }

    #[test]
    fn test_plain_match() {
        let func = leaf();
        let image = image_with(0x40, 0x10, &func.bytes());
        let matcher = Matcher::new(&image);
        assert_eq!(matcher.test(0x10, &func.signature()), MatchOutcome::Matched);
        assert!(!matcher.matches(0x14, &func.signature()));
    }

    #[test]
    fn test_mask_invariance() {
        let sig = caller().signature();

        let relinked = FunctionBuilder::new("osCreateThread")
            .word(addiu(SP, SP, -24))
            .reloc(RelocKind::Targ26, "__osDisableInt", jal(0x8004_5670))
            .word(sw(RA, SP, 20))
            .reloc(RelocKind::Hi16, "__osActiveQueue", lui(A0, 0x8010))
            .reloc(RelocKind::Lo16, "__osActiveQueue", addiu(A0, A0, 0x1234))
            .word(lw(RA, SP, 20))
            .word(JR_RA)
            .word(addiu(SP, SP, 24));

        let image = image_with(0x100, 0x40, &relinked.bytes());
        assert_eq!(Matcher::new(&image).test(0x40, &sig), MatchOutcome::Matched);
    }

    #[test]
    fn test_single_byte_sensitivity() {
        let func = leaf();
        let sig = func.signature();
        let clean = image_with(0x40, 0x08, &func.bytes());

        for i in 0..sig.len() {
            let mut image = clean.clone();
            image[0x08 + i] ^= 0x01;
            let outcome = Matcher::new(&image).test(0x08, &sig);
            let expected = if i < sig.prefix_len() {
                MatchOutcome::PrefixMismatch
            } else {
                MatchOutcome::BodyMismatch
            };
            assert_eq!(outcome, expected, "byte {}", i);
        }
    }

    #[test]
    fn test_unmasked_bits_still_count() {
        // Changing the register field of the relocated lui is a different function.
        let sig = caller().signature();
        let other = FunctionBuilder::new("osCreateThread")
            .word(addiu(SP, SP, -24))
            .reloc(RelocKind::Targ26, "__osDisableInt", jal(0x8032_1000))
            .word(sw(RA, SP, 20))
            .reloc(RelocKind::Hi16, "__osActiveQueue", lui(V0, 0x8033))
            .reloc(RelocKind::Lo16, "__osActiveQueue", addiu(A0, A0, -0x7F00))
            .word(lw(RA, SP, 20))
            .word(JR_RA)
            .word(addiu(SP, SP, 24));
        let image = other.bytes();
        assert_eq!(Matcher::new(&image).test(0, &sig), MatchOutcome::BodyMismatch);
    }

    #[test]
    fn test_prefix_rejection_reads_nothing_past_window() {
        let func = caller();
        let sig = func.signature();
        let mut data = image_with(0x200, 0x80, &func.bytes());
        data[0x80] ^= 0xFF;

        let reader = TrackingReader::new(data);
        let outcome = Matcher::new(&reader).test(0x80, &sig);
        assert_eq!(outcome, MatchOutcome::PrefixMismatch);
        assert!(reader.max_end() <= 0x80 + 8, "read up to {:#x}", reader.max_end());
        assert!(reader.reads() > 0);
    }

    #[test]
    fn test_full_match_reads_whole_symbol_once() {
        let func = caller();
        let sig = func.signature();
        let reader = TrackingReader::new(image_with(0x200, 0x80, &func.bytes()));
        assert!(Matcher::new(&reader).matches(0x80, &sig));
        assert_eq!(reader.max_end(), 0x80 + sig.len());
    }

    #[test]
    fn test_relocation_on_prefix_boundary() {
        // Relocation occupying bytes 4..8 ends exactly on the crcA cutoff.
        let func = FunctionBuilder::new("boundary")
            .word(addiu(SP, SP, -8))
            .reloc(RelocKind::Targ26, "target", jal(0x8020_0000))
            .word(NOP);
        let sig = func.signature();
        assert_eq!(sig.prefix_len(), 8);

        let moved = FunctionBuilder::new("boundary")
            .word(addiu(SP, SP, -8))
            .reloc(RelocKind::Targ26, "target", jal(0x8030_0000))
            .word(NOP);
        assert!(Matcher::new(&moved.bytes()).matches(0, &sig));
    }

    #[test]
    fn test_small_symbol_with_relocation_past_prefix() {
        // size == 8: crcA and crcB cover the same bytes.
        let func = FunctionBuilder::new("tail")
            .word(NOP)
            .reloc(RelocKind::Targ26, "next", jal(0x8000_1000));
        let sig = func.signature();
        assert_eq!(sig.crc_a(), sig.crc_b());
        assert!(Matcher::new(&func.bytes()).matches(0, &sig));

        let single = FunctionBuilder::new("one").reloc(RelocKind::Hi16, "g", lui(A0, 0x8000));
        let sig = single.signature();
        assert_eq!(sig.prefix_len(), 4);
        let image = lui(A0, 0x8044).to_be_bytes().to_vec();
        assert!(Matcher::new(&image).matches(0, &sig));
    }

    #[test]
    fn test_out_of_range_is_silent() {
        let func = leaf();
        let sig = func.signature();
        let image = image_with(0x20, 0x10, &func.bytes());
        let matcher = Matcher::new(&image);
        assert_eq!(matcher.test(0x14, &sig), MatchOutcome::OutOfRange);
        assert_eq!(matcher.test(usize::MAX - 2, &sig), MatchOutcome::OutOfRange);
        assert!(matcher.matches(0x10, &sig));
    }
}
