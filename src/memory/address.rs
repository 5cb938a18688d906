// Tue Jan 13 2026 - Alex

use crate::memory::MemoryError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Add;

/// 32-bit virtual address in the target's address space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Address {
    value: u32,
}

impl Address {
    pub fn new(value: u32) -> Self {
        Self { value }
    }

    pub fn as_u32(&self) -> u32 {
        self.value
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:08X}", self.value)
    }
}

impl fmt::LowerHex for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::LowerHex::fmt(&self.value, f)
    }
}

impl fmt::UpperHex for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::UpperHex::fmt(&self.value, f)
    }
}

impl Add<u32> for Address {
    type Output = Self;
    fn add(self, rhs: u32) -> Self::Output {
        Self { value: self.value.wrapping_add(rhs) }
    }
}

impl From<u32> for Address {
    fn from(value: u32) -> Self {
        Self::new(value)
    }
}

impl From<Address> for u32 {
    fn from(addr: Address) -> Self {
        addr.value
    }
}

/// Maps image offsets to virtual addresses: `base + offset - header_size`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressSpace {
    pub base: u32,
    pub header_size: u32,
}

impl AddressSpace {
    pub const DEFAULT_BASE: u32 = 0x8000_0000;

    pub fn new(base: u32, header_size: u32) -> Self {
        Self { base, header_size }
    }

    pub fn to_address(&self, offset: usize) -> Result<Address, MemoryError> {
        let header = self.header_size as usize;
        if offset < header {
            return Err(MemoryError::InsideHeader {
                offset,
                header: self.header_size,
            });
        }
        Ok(Address::new(self.base.wrapping_add((offset - header) as u32)))
    }
}

impl Default for AddressSpace {
    fn default() -> Self {
        Self::new(Self::DEFAULT_BASE, 0)
    }
}
