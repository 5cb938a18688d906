// Wed Jan 15 2026 - Alex

use crate::signature::codec::{self, WORD_SIZE};

/// Read-only, offset-addressed view of a binary image.
///
/// Everything the scanner touches goes through `read_bytes`, so an
/// implementation can observe exactly which bytes a scan looked at.
pub trait ImageReader {
    fn len(&self) -> usize;

    /// `len` bytes starting at `offset`, or `None` if the range runs past the end.
    fn read_bytes(&self, offset: usize, len: usize) -> Option<&[u8]>;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn read_word(&self, offset: usize) -> Option<[u8; WORD_SIZE]> {
        self.read_bytes(offset, WORD_SIZE).and_then(codec::read_word)
    }

    fn read_u32_be(&self, offset: usize) -> Option<u32> {
        self.read_word(offset).map(u32::from_be_bytes)
    }

    /// True when `len` bytes at `offset` lie inside the image.
    fn in_bounds(&self, offset: usize, len: usize) -> bool {
        offset
            .checked_add(len)
            .map(|end| end <= self.len())
            .unwrap_or(false)
    }
}

impl ImageReader for [u8] {
    fn len(&self) -> usize {
        <[u8]>::len(self)
    }

    fn read_bytes(&self, offset: usize, len: usize) -> Option<&[u8]> {
        let end = offset.checked_add(len)?;
        self.get(offset..end)
    }
}

impl ImageReader for Vec<u8> {
    fn len(&self) -> usize {
        Vec::len(self)
    }

    fn read_bytes(&self, offset: usize, len: usize) -> Option<&[u8]> {
        self.as_slice().read_bytes(offset, len)
    }
}

impl<T: ImageReader + ?Sized> ImageReader for &T {
    fn len(&self) -> usize {
        (**self).len()
    }

    fn read_bytes(&self, offset: usize, len: usize) -> Option<&[u8]> {
        (**self).read_bytes(offset, len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slice_reader_bounds() {
        let data = vec![0x27u8, 0xBD, 0xFF, 0xE8, 0xAF, 0xBF];
        assert_eq!(data.read_bytes(0, 4), Some(&data[0..4]));
        assert_eq!(data.read_bytes(4, 2), Some(&data[4..6]));
        assert_eq!(data.read_bytes(4, 4), None);
        assert_eq!(data.read_bytes(usize::MAX, 2), None);
        assert_eq!(data.read_u32_be(0), Some(0x27BD_FFE8));
        assert!(data.in_bounds(2, 4));
        assert!(!data.in_bounds(3, 4));
        assert!(!data.in_bounds(usize::MAX, 1));
    }
}
