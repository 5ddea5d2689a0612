//! # System Description Table Header
//!
//! Every ACPI table other than the RSDP opens with the same 36-byte header:
//!
//! ```text
//! offset  0: signature        [u8; 4]
//! offset  4: declared length  u32 LE (header included)
//! offset  8: revision         u8
//! offset  9: checksum         u8     (covers the declared length)
//! offset 10: OEM / creator metadata, vendor-defined trailing fields
//! ```
//!
//! [`SdtHeader`] is a bounds-checked view over those bytes. It deliberately
//! covers only the header: the declared length routinely exceeds the mapped
//! window during discovery, and callers widen the window themselves once
//! they know how much to trust.

use crate::AcpiError;
use crate::mem::FirmwareMemory;
use core::fmt;

/// Size of the fixed header shared by all system description tables.
pub const HEADER_LEN: usize = 36;

/// Offset of the checksum byte within any system description table.
///
/// The same offset applies to every header subtype; it is named once here
/// instead of being repeated as a literal at each patch site.
pub const CHECKSUM_OFFSET: usize = 9;

/// A four-character table signature.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Signature(pub [u8; 4]);

impl Signature {
    /// Extended System Description Table.
    pub const XSDT: Self = Self(*b"XSDT");

    /// Fixed ACPI Description Table. The signature reads `FACP` for
    /// historical reasons.
    pub const FADT: Self = Self(*b"FACP");
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0.escape_ascii(), f)
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Signature({})", self.0.escape_ascii())
    }
}

/// Bounds-checked view over a system description table header.
#[derive(Clone, Copy)]
pub struct SdtHeader<'a> {
    bytes: &'a [u8],
}

impl<'a> SdtHeader<'a> {
    /// Parse a header from a byte slice.
    ///
    /// The slice must hold at least the fixed header; the declared length
    /// must cover the fixed header as well. Bytes past the header are
    /// ignored by this view.
    ///
    /// # Errors
    /// [`AcpiError::Truncated`] if either length is too small.
    pub fn from_bytes(bytes: &'a [u8]) -> Result<Self, AcpiError> {
        if bytes.len() < HEADER_LEN {
            // The slice holds fewer than 36 bytes here; the cast cannot truncate.
            #[allow(clippy::cast_possible_truncation)]
            return Err(AcpiError::Truncated {
                declared: bytes.len() as u32,
            });
        }
        let header = Self { bytes };
        if (header.length() as usize) < HEADER_LEN {
            return Err(AcpiError::Truncated {
                declared: header.length(),
            });
        }
        Ok(header)
    }

    /// Map the fixed header at a physical address and parse it.
    ///
    /// # Errors
    /// [`AcpiError::Truncated`] if the declared length is below the fixed
    /// header size.
    ///
    /// # Safety
    /// `addr` must be the non-null physical address of a readable table
    /// header, per the [`FirmwareMemory`] contract.
    pub unsafe fn parse<M: FirmwareMemory>(mem: &'a M, addr: u64) -> Result<Self, AcpiError> {
        let bytes = unsafe { mem.map_ro(addr, HEADER_LEN) };
        Self::from_bytes(bytes)
    }

    #[must_use]
    pub fn signature(&self) -> Signature {
        Signature([self.bytes[0], self.bytes[1], self.bytes[2], self.bytes[3]])
    }

    /// Declared length of the whole table in bytes, header included.
    #[must_use]
    pub fn length(&self) -> u32 {
        read_u32_le(self.bytes, 4)
    }

    #[must_use]
    pub fn revision(&self) -> u8 {
        self.bytes[8]
    }

    #[must_use]
    pub fn checksum(&self) -> u8 {
        self.bytes[CHECKSUM_OFFSET]
    }
}

pub(crate) fn read_u32_le(bytes: &[u8], offset: usize) -> u32 {
    let mut raw = [0u8; 4];
    raw.copy_from_slice(&bytes[offset..offset + 4]);
    u32::from_le_bytes(raw)
}

pub(crate) fn read_u64_le(bytes: &[u8], offset: usize) -> u64 {
    let mut raw = [0u8; 8];
    raw.copy_from_slice(&bytes[offset..offset + 8]);
    u64::from_le_bytes(raw)
}
