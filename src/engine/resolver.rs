// Wed Jan 15 2026 - Alex

use crate::memory::ImageReader;
use crate::signature::codec::{self, Contribution};
use crate::signature::{RelocKind, Signature};
use serde::{Deserialize, Serialize};

/// Absolute address recovered for a name referenced by a matched symbol.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RelocationResult {
    pub name: String,
    pub address: u32,
    /// `targ26` for jump targets, `hi16` for a combined hi/lo pair.
    pub kind: RelocKind,
}

/// Recovers referenced addresses from the unmasked bytes of a matched symbol.
pub struct AddressResolver<'a, R: ImageReader + ?Sized> {
    image: &'a R,
}

impl<'a, R: ImageReader + ?Sized> AddressResolver<'a, R> {
    pub fn new(image: &'a R) -> Self {
        Self { image }
    }

    /// Results in relocation order. Only meaningful after a full match at
    /// `offset`; a `lo16` without a preceding same-name `hi16` and a `hi16`
    /// without its `lo16` yield nothing.
    pub fn resolve(&self, offset: usize, signature: &Signature) -> Vec<RelocationResult> {
        let relocations = signature.relocations();
        let mut results = Vec::new();
        let mut index = 0;

        while index < relocations.len() {
            let reloc = &relocations[index];
            let Some(raw) = self.image.read_word(offset + reloc.offset()) else {
                index += 1;
                continue;
            };

            match (reloc.kind, codec::decode(raw, reloc.kind)) {
                (RelocKind::Targ26, Contribution::Address(address)) => {
                    log::trace!("{} -> {} @ {:08X}", signature.name(), reloc.name, address);
                    results.push(RelocationResult {
                        name: reloc.name.clone(),
                        address,
                        kind: RelocKind::Targ26,
                    });
                }
                (RelocKind::Hi16, Contribution::High(hi)) => {
                    if let Some(next) = relocations.get(index + 1).filter(|next| reloc.pairs_with(next)) {
                        if let Some(Contribution::Low(lo)) = self
                            .image
                            .read_word(offset + next.offset())
                            .map(|raw| codec::decode(raw, next.kind))
                        {
                            let address = codec::combine(hi, lo);
                            log::trace!("{} -> {} @ {:08X} (hi/lo)", signature.name(), reloc.name, address);
                            results.push(RelocationResult {
                                name: reloc.name.clone(),
                                address,
                                kind: RelocKind::Hi16,
                            });
                        }
                        index += 1;
                    }
                }
                _ => {}
            }
            index += 1;
        }

        results
    }
}
