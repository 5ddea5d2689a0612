//! # Extended System Description Table (XSDT)
//!
//! The XSDT is the revision 2 root table: a standard header followed by a
//! packed array of 64-bit physical addresses, one per description table.
//! The entry array is not self-describing, so selecting a table means
//! mapping each entry's header and inspecting it in turn.

use crate::AcpiError;
use crate::checksum;
use crate::mem::FirmwareMemory;
use crate::sdt::{self, HEADER_LEN, SdtHeader, Signature};
use log::{info, warn};

/// Width of one entry in the trailing address array.
pub const ENTRY_SIZE: usize = size_of::<u64>();

/// Validated view over an XSDT, spanning its full declared length.
pub struct Xsdt<'a> {
    bytes: &'a [u8],
}

impl<'a> Xsdt<'a> {
    /// Validate an XSDT held in a byte slice.
    ///
    /// # Errors
    /// [`AcpiError::InvalidSignature`] if the table is not an XSDT,
    /// [`AcpiError::Truncated`] if the slice cannot hold the declared
    /// length, and [`AcpiError::ChecksumMismatch`] if the bytes do not sum
    /// to zero.
    pub fn from_bytes(bytes: &'a [u8]) -> Result<Self, AcpiError> {
        let header = SdtHeader::from_bytes(bytes)?;
        if header.signature() != Signature::XSDT {
            return Err(AcpiError::InvalidSignature);
        }
        let declared = header.length() as usize;
        if declared > bytes.len() {
            return Err(AcpiError::Truncated {
                declared: header.length(),
            });
        }
        let bytes = &bytes[..declared];
        if !checksum::verify(bytes) {
            return Err(AcpiError::ChecksumMismatch);
        }
        Ok(Self { bytes })
    }

    /// Map and validate the XSDT at a physical address.
    ///
    /// # Errors
    /// Same conditions as [`Xsdt::from_bytes`].
    ///
    /// # Safety
    /// `addr` must be the non-null physical address of a readable table,
    /// per the [`FirmwareMemory`] contract.
    pub unsafe fn parse<M: FirmwareMemory>(mem: &'a M, addr: u64) -> Result<Self, AcpiError> {
        let header = unsafe { SdtHeader::parse(mem, addr)? };
        let bytes = unsafe { mem.map_ro(addr, header.length() as usize) };
        Self::from_bytes(bytes)
    }

    /// Number of address entries following the header.
    ///
    /// A trailing fragment shorter than one entry does not count.
    #[must_use]
    pub fn entry_count(&self) -> usize {
        (self.bytes.len() - HEADER_LEN) / ENTRY_SIZE
    }

    /// Physical table addresses in array order.
    pub fn entries(&self) -> impl Iterator<Item = u64> + '_ {
        self.bytes[HEADER_LEN..]
            .chunks_exact(ENTRY_SIZE)
            .map(|chunk| sdt::read_u64_le(chunk, 0))
    }

    /// Walk the entries in array order and return the address of the first
    /// table carrying `signature` at `min_revision` or above.
    ///
    /// Null, unreadable and non-matching entries are logged and skipped; a
    /// later entry may still match.
    ///
    /// # Errors
    /// [`AcpiError::NotFound`] when no entry qualifies.
    ///
    /// # Safety
    /// Every non-null entry address must be mappable per the
    /// [`FirmwareMemory`] contract.
    pub unsafe fn find_table<M: FirmwareMemory>(
        &self,
        mem: &M,
        signature: Signature,
        min_revision: u8,
    ) -> Result<u64, AcpiError> {
        info!("XSDT holds {} entries", self.entry_count());
        for (index, addr) in self.entries().enumerate() {
            if addr == 0 {
                warn!("entry {index}: null address, skipping");
                continue;
            }
            let header = match unsafe { SdtHeader::parse(mem, addr) } {
                Ok(header) => header,
                Err(err) => {
                    warn!("entry {index}: {err}, skipping");
                    continue;
                }
            };
            let found = header.signature();
            if found != signature {
                info!("entry {index}: {found} at {addr:#x}");
                continue;
            }
            if header.revision() < min_revision {
                info!(
                    "entry {index}: {found} revision {} is below {min_revision}, skipping",
                    header.revision()
                );
                continue;
            }
            info!(
                "entry {index}: {found} revision {} at {addr:#x}, selected",
                header.revision()
            );
            return Ok(addr);
        }
        Err(AcpiError::NotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn xsdt_image(entries: &[u64]) -> Vec<u8> {
        let len = HEADER_LEN + entries.len() * ENTRY_SIZE;
        let mut bytes = vec![0u8; len];
        bytes[0..4].copy_from_slice(b"XSDT");
        bytes[4..8].copy_from_slice(&u32::try_from(len).unwrap().to_le_bytes());
        bytes[8] = 1;
        for (index, addr) in entries.iter().enumerate() {
            let offset = HEADER_LEN + index * ENTRY_SIZE;
            bytes[offset..offset + ENTRY_SIZE].copy_from_slice(&addr.to_le_bytes());
        }
        checksum::recompute(&mut bytes, sdt::CHECKSUM_OFFSET);
        bytes
    }

    #[test]
    fn exposes_entries_in_array_order() {
        let bytes = xsdt_image(&[0x1000, 0x2000, 0x3000]);
        let xsdt = Xsdt::from_bytes(&bytes).unwrap();

        assert_eq!(xsdt.entry_count(), 3);
        let entries: Vec<u64> = xsdt.entries().collect();
        assert_eq!(entries, [0x1000, 0x2000, 0x3000]);
    }

    #[test]
    fn accepts_an_empty_entry_array() {
        let bytes = xsdt_image(&[]);
        let xsdt = Xsdt::from_bytes(&bytes).unwrap();

        assert_eq!(xsdt.entry_count(), 0);
        assert_eq!(xsdt.entries().count(), 0);
    }

    #[test]
    fn rejects_a_foreign_signature() {
        let mut bytes = xsdt_image(&[0x1000]);
        bytes[0..4].copy_from_slice(b"RSDT");
        checksum::recompute(&mut bytes, sdt::CHECKSUM_OFFSET);

        assert!(matches!(
            Xsdt::from_bytes(&bytes),
            Err(AcpiError::InvalidSignature)
        ));
    }

    #[test]
    fn rejects_a_broken_checksum() {
        let mut bytes = xsdt_image(&[0x1000]);
        bytes[HEADER_LEN] = bytes[HEADER_LEN].wrapping_add(1);

        assert!(matches!(
            Xsdt::from_bytes(&bytes),
            Err(AcpiError::ChecksumMismatch)
        ));
    }

    #[test]
    fn rejects_a_slice_shorter_than_declared() {
        let bytes = xsdt_image(&[0x1000, 0x2000]);
        let short = &bytes[..bytes.len() - ENTRY_SIZE];

        assert!(matches!(
            Xsdt::from_bytes(short),
            Err(AcpiError::Truncated { .. })
        ));
    }

    #[test]
    fn ignores_a_trailing_partial_entry() {
        let mut bytes = xsdt_image(&[0x1000]);
        // Declare three extra bytes, too few for another address.
        let len = u32::try_from(bytes.len() + 3).unwrap();
        bytes[4..8].copy_from_slice(&len.to_le_bytes());
        bytes.extend_from_slice(&[0, 0, 0]);
        checksum::recompute(&mut bytes, sdt::CHECKSUM_OFFSET);

        let xsdt = Xsdt::from_bytes(&bytes).unwrap();
        assert_eq!(xsdt.entry_count(), 1);
        assert_eq!(xsdt.entries().count(), 1);
    }
}
