//! # Root System Description Pointer (RSDP)
//!
//! The RSDP is the entry into the ACPI table chain. Firmware publishes its
//! physical address through the configuration table; everything else is
//! reached by following pointers from here.
//!
//! ```text
//! offset  0: signature     [u8; 8]  "RSD PTR "
//! offset  8: checksum      u8       (covers the first 20 bytes)
//! offset  9: OEM id        [u8; 6]
//! offset 15: revision      u8       (2 or higher for ACPI 2.0+)
//! offset 16: RSDT address  u32 LE   (legacy 32-bit pointer)
//! offset 20: length        u32 LE
//! offset 24: XSDT address  u64 LE
//! offset 32: ext. checksum u8       (covers the declared length)
//! offset 33: reserved      [u8; 3]
//! ```
//!
//! Only revision 2 and above is accepted: earlier structures end at offset
//! 20 and carry no XSDT pointer at all.

use crate::AcpiError;
use crate::checksum;
use crate::mem::FirmwareMemory;
use crate::sdt::{read_u32_le, read_u64_le};

/// The pointer structure signature, trailing space included.
pub const SIGNATURE: [u8; 8] = *b"RSD PTR ";

/// Extent of the ACPI 1.0 part; the first checksum covers exactly these bytes.
pub const LEGACY_LEN: usize = 20;

/// Smallest structure that carries an XSDT pointer and an extended checksum.
pub const V2_LEN: usize = 36;

/// Lowest revision with the 64-bit fields present.
pub const MIN_REVISION: u8 = 2;

/// Validated view over a revision 2+ pointer structure.
#[derive(Clone, Copy)]
pub struct Rsdp<'a> {
    bytes: &'a [u8],
}

impl<'a> Rsdp<'a> {
    /// Validate a pointer structure held in a byte slice.
    ///
    /// Both checksums must hold: the legacy one over the first 20 bytes and
    /// the extended one over the declared length.
    ///
    /// # Errors
    /// [`AcpiError::Truncated`] if the slice or the declared length is too
    /// short, [`AcpiError::InvalidSignature`] on a signature mismatch,
    /// [`AcpiError::InvalidRevision`] below revision 2, and
    /// [`AcpiError::ChecksumMismatch`] if either checksum fails.
    pub fn from_bytes(bytes: &'a [u8]) -> Result<Self, AcpiError> {
        if bytes.len() < V2_LEN {
            // Fewer than 36 bytes here; the cast cannot truncate.
            #[allow(clippy::cast_possible_truncation)]
            return Err(AcpiError::Truncated {
                declared: bytes.len() as u32,
            });
        }
        if bytes[0..8] != SIGNATURE {
            return Err(AcpiError::InvalidSignature);
        }
        let rsdp = Self { bytes };
        if rsdp.revision() < MIN_REVISION {
            return Err(AcpiError::InvalidRevision {
                found: rsdp.revision(),
            });
        }
        if !checksum::verify(&bytes[..LEGACY_LEN]) {
            return Err(AcpiError::ChecksumMismatch);
        }
        let declared = rsdp.length() as usize;
        if declared < V2_LEN || declared > bytes.len() {
            return Err(AcpiError::Truncated {
                declared: rsdp.length(),
            });
        }
        if !checksum::verify(&bytes[..declared]) {
            return Err(AcpiError::ChecksumMismatch);
        }
        Ok(rsdp)
    }

    /// Map and validate the pointer structure at a physical address.
    ///
    /// The legacy 20 bytes are mapped first and must pass the signature,
    /// revision and legacy-checksum gates on their own: a revision below 2
    /// means the structure ends at offset 20, and the length field past it
    /// is unrelated firmware data that must never size a mapping. Only
    /// after those gates is the window widened to the declared length for
    /// the extended checksum.
    ///
    /// # Errors
    /// Same conditions as [`Rsdp::from_bytes`].
    ///
    /// # Safety
    /// `addr` must be the non-null physical address of readable firmware
    /// memory, per the [`FirmwareMemory`] contract.
    pub unsafe fn parse<M: FirmwareMemory>(mem: &'a M, addr: u64) -> Result<Self, AcpiError> {
        let legacy = unsafe { mem.map_ro(addr, LEGACY_LEN) };
        if legacy[0..8] != SIGNATURE {
            return Err(AcpiError::InvalidSignature);
        }
        let revision = legacy[15];
        if revision < MIN_REVISION {
            return Err(AcpiError::InvalidRevision { found: revision });
        }
        if !checksum::verify(legacy) {
            return Err(AcpiError::ChecksumMismatch);
        }

        let fixed = unsafe { mem.map_ro(addr, V2_LEN) };
        let declared = read_u32_le(fixed, 20);
        if (declared as usize) < V2_LEN {
            return Err(AcpiError::Truncated { declared });
        }
        let bytes = unsafe { mem.map_ro(addr, declared as usize) };
        Self::from_bytes(bytes)
    }

    #[must_use]
    pub fn revision(&self) -> u8 {
        self.bytes[15]
    }

    /// Declared length of the whole structure in bytes.
    #[must_use]
    pub fn length(&self) -> u32 {
        read_u32_le(self.bytes, 20)
    }

    /// Legacy 32-bit RSDT address. Present for completeness; discovery
    /// follows the 64-bit pointer instead.
    #[must_use]
    pub fn rsdt_address(&self) -> u32 {
        read_u32_le(self.bytes, 16)
    }

    /// Physical address of the Extended System Description Table.
    #[must_use]
    pub fn xsdt_address(&self) -> u64 {
        read_u64_le(self.bytes, 24)
    }
}
