// Tue Jan 13 2026 - Alex

use crate::memory::{ImageReader, MemoryError};
use memmap2::Mmap;
use std::fmt;
use std::fs::File;
use std::path::{Path, PathBuf};

/// First word of a cartridge ROM in native (big-endian) order.
pub const ROM_MAGIC: [u8; 4] = [0x80, 0x37, 0x12, 0x40];

/// Byte order of an image as stored on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteOrder {
    /// `.z64`, or any image without a recognised ROM header.
    BigEndian,
    /// `.v64`, bytes swapped within each halfword.
    ByteSwapped,
    /// `.n64`, bytes reversed within each word.
    LittleEndian,
}

impl ByteOrder {
    pub fn detect(data: &[u8]) -> Self {
        match data.get(..4) {
            Some([0x37, 0x80, 0x40, 0x12]) => ByteOrder::ByteSwapped,
            Some([0x40, 0x12, 0x37, 0x80]) => ByteOrder::LittleEndian,
            _ => ByteOrder::BigEndian,
        }
    }

    /// Rewrite `data` in place into big-endian order.
    pub fn normalize(&self, data: &mut [u8]) {
        match self {
            ByteOrder::BigEndian => {}
            ByteOrder::ByteSwapped => {
                for half in data.chunks_exact_mut(2) {
                    half.swap(0, 1);
                }
            }
            ByteOrder::LittleEndian => {
                for word in data.chunks_exact_mut(4) {
                    word.reverse();
                }
            }
        }
    }
}

impl fmt::Display for ByteOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ByteOrder::BigEndian => "big-endian",
            ByteOrder::ByteSwapped => "byte-swapped",
            ByteOrder::LittleEndian => "little-endian",
        };
        f.write_str(name)
    }
}

enum Storage {
    Mapped(Mmap),
    Owned(Vec<u8>),
}

impl Storage {
    fn as_slice(&self) -> &[u8] {
        match self {
            Storage::Mapped(mmap) => mmap.as_ref(),
            Storage::Owned(data) => data.as_slice(),
        }
    }
}

/// Immutable binary image in big-endian word order.
///
/// Images that are already big-endian stay memory-mapped; the other orders are
/// copied once and normalised.
pub struct BinaryImage {
    storage: Storage,
    original_order: ByteOrder,
    path: Option<PathBuf>,
}

impl BinaryImage {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, MemoryError> {
        let path = path.as_ref();
        let file = File::open(path)?;

        if file.metadata()?.len() == 0 {
            return Err(MemoryError::EmptyImage(path.display().to_string()));
        }

        let mmap = unsafe { Mmap::map(&file) }?;
        let order = ByteOrder::detect(&mmap);

        let storage = match order {
            ByteOrder::BigEndian => Storage::Mapped(mmap),
            _ => {
                let mut data = mmap.to_vec();
                order.normalize(&mut data);
                Storage::Owned(data)
            }
        };

        log::debug!("Loaded {} ({} bytes, {})", path.display(), storage.as_slice().len(), order);

        Ok(Self {
            storage,
            original_order: order,
            path: Some(path.to_path_buf()),
        })
    }

    pub fn from_bytes(mut data: Vec<u8>) -> Self {
        let order = ByteOrder::detect(&data);
        order.normalize(&mut data);
        Self {
            storage: Storage::Owned(data),
            original_order: order,
            path: None,
        }
    }

    pub fn as_slice(&self) -> &[u8] {
        self.storage.as_slice()
    }

    pub fn original_order(&self) -> ByteOrder {
        self.original_order
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn is_mapped(&self) -> bool {
        matches!(self.storage, Storage::Mapped(_))
    }

    pub fn has_rom_header(&self) -> bool {
        self.as_slice().starts_with(&ROM_MAGIC)
    }
}

impl ImageReader for BinaryImage {
    fn len(&self) -> usize {
        self.as_slice().len()
    }

    fn read_bytes(&self, offset: usize, len: usize) -> Option<&[u8]> {
        self.as_slice().read_bytes(offset, len)
    }
}

impl fmt::Debug for BinaryImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BinaryImage")
            .field("len", &self.len())
            .field("original_order", &self.original_order)
            .field("mapped", &self.is_mapped())
            .field("path", &self.path)
            .finish()
    }
}
