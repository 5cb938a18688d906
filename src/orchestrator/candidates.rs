// Thu Jan 16 2026 - Alex

//! Cheap guesses at where functions start, used for targeted scans.

use crate::memory::ImageReader;
use crate::signature::codec::WORD_SIZE;
use std::collections::BTreeSet;

const JR_RA: u32 = 0x03E0_0008;
const ADDIU_SP_SP: u32 = 0x27BD;

/// `addiu sp, sp, -imm`: a stack frame being opened.
fn is_frame_setup(word: u32) -> bool {
    word >> 16 == ADDIU_SP_SP && (word as u16 as i16) < 0
}

/// Offsets of likely function entry points, ascending and unique.
///
/// An offset qualifies if it opens a stack frame, or if it holds the first
/// non-zero word after a `jr ra` and its delay slot (leaf functions and
/// padding between objects).
pub fn likely_function_offsets<R: ImageReader + ?Sized>(image: &R) -> Vec<usize> {
    let mut offsets = BTreeSet::new();
    let end = image.len() - image.len() % WORD_SIZE;
    let mut offset = 0;

    while offset < end {
        let Some(word) = image.read_u32_be(offset) else {
            break;
        };

        if is_frame_setup(word) {
            offsets.insert(offset);
        }

        if word == JR_RA {
            let mut next = offset + 2 * WORD_SIZE;
            while next < end {
                match image.read_u32_be(next) {
                    Some(0) => next += WORD_SIZE,
                    Some(_) => {
                        offsets.insert(next);
                        break;
                    }
                    None => break,
                }
            }
        }

        offset += WORD_SIZE;
    }

    log::debug!("{} likely function offsets", offsets.len());
    offsets.into_iter().collect()
}
