// Tue Jan 13 2026 - Alex

pub mod address;
pub mod error;
pub mod image;
pub mod traits;

pub use address::{Address, AddressSpace};
pub use error::MemoryError;
pub use image::{BinaryImage, ByteOrder, ROM_MAGIC};
pub use traits::ImageReader;
