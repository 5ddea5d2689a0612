//! # Fixed ACPI Description Table (FADT)
//!
//! The FADT (signature `FACP`) describes fixed hardware features. This
//! module names only the part it touches: the 32-bit feature flags word at
//! byte offset 112, and within it the Low Power S0 Idle capability bit that
//! tells an operating system to prefer S0 idle over S3 sleep.
//!
//! The patch is a single in-place bit flip followed by a checksum repair.
//! Everything else in the table, vendor fields included, passes through
//! untouched.

use crate::AcpiError;
use crate::checksum;
use crate::mem::FirmwareMemory;
use crate::sdt::{self, CHECKSUM_OFFSET, SdtHeader, Signature};
use log::info;

/// Byte offset of the fixed feature flags word.
pub const FLAGS_OFFSET: usize = 112;

/// ACPI 5.0 introduced the Low Power S0 Idle bit; older revisions reserve it.
pub const MIN_REVISION: u8 = 5;

/// Fixed feature flags word (32-bit).
///
/// Layout (LSB first):
/// - bits 0..20: unrelated fixed feature bits, preserved verbatim
/// - bit 21: Low Power S0 Idle capable
/// - bits 22..31: unrelated and reserved bits, preserved verbatim
#[bitfield_struct::bitfield(u32)]
#[derive(PartialEq, Eq)]
pub struct FadtFlags {
    #[bits(21)]
    __low: u32,
    #[bits(1)]
    pub low_power_s0_idle: bool,
    #[bits(10)]
    __high: u16,
}

/// Result of a patch attempt against a structurally valid table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatchOutcome {
    /// The firmware already advertises the capability; nothing was written.
    AlreadyEnabled {
        /// The flags word as found.
        flags: FadtFlags,
    },
    /// The bit was set and the checksum byte rewritten.
    Applied {
        /// The flags word before the patch.
        old: FadtFlags,
        /// The flags word as written.
        new: FadtFlags,
    },
}

/// Enable the Low Power S0 Idle flag in a table held as a mutable slice.
///
/// The table must present the `FACP` signature at revision 5 or above and
/// declare enough bytes to reach past the flags word. When the bit is
/// already set the slice is left untouched; otherwise the flag is written
/// and the checksum byte recomputed so the declared range sums to zero
/// again.
///
/// # Errors
/// [`AcpiError::InvalidSignature`] for anything that is not a FADT,
/// [`AcpiError::InvalidRevision`] below revision 5, and
/// [`AcpiError::Truncated`] if either the declared length or the slice is
/// too short.
pub fn set_low_power_idle(table: &mut [u8]) -> Result<PatchOutcome, AcpiError> {
    let header = SdtHeader::from_bytes(table)?;
    if header.signature() != Signature::FADT {
        return Err(AcpiError::InvalidSignature);
    }
    if header.revision() < MIN_REVISION {
        return Err(AcpiError::InvalidRevision {
            found: header.revision(),
        });
    }
    let length = header.length();
    let declared = length as usize;
    if declared < FLAGS_OFFSET + size_of::<u32>() || declared > table.len() {
        return Err(AcpiError::Truncated { declared: length });
    }

    // Mutations stay within the declared range; trailing slack in the
    // caller's slice is none of our business.
    let table = &mut table[..declared];
    let flags = FadtFlags::from_bits(sdt::read_u32_le(table, FLAGS_OFFSET));
    info!("FADT flags: {:#010x}", flags.into_bits());
    if flags.low_power_s0_idle() {
        return Ok(PatchOutcome::AlreadyEnabled { flags });
    }

    let updated = flags.with_low_power_s0_idle(true);
    table[FLAGS_OFFSET..FLAGS_OFFSET + size_of::<u32>()]
        .copy_from_slice(&updated.into_bits().to_le_bytes());
    info!("setting new checksum");
    checksum::recompute(table, CHECKSUM_OFFSET);

    Ok(PatchOutcome::Applied {
        old: flags,
        new: updated,
    })
}

/// Map the table at a physical address and enable the flag in place.
///
/// # Errors
/// Same conditions as [`set_low_power_idle`].
///
/// # Safety
/// `addr` must be the non-null physical address of a readable and writable
/// table, per the [`FirmwareMemory`] contract.
pub unsafe fn enable_low_power_idle<M: FirmwareMemory>(
    mem: &M,
    addr: u64,
) -> Result<PatchOutcome, AcpiError> {
    // The header window is dropped before the writable one is taken out.
    let length = {
        let header = unsafe { SdtHeader::parse(mem, addr)? };
        header.length()
    };
    let table = unsafe { mem.map_rw(addr, length as usize) };
    set_low_power_idle(table)
}
