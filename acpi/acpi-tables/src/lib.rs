//! # ACPI Table Discovery and Patching
//!
//! Building blocks for walking the ACPI table chain exposed by UEFI firmware
//! and for repairing table checksums after an in-place mutation:
//!
//! - [`checksum`]: the modular byte-sum arithmetic shared by every table.
//! - [`rsdp`]: the Root System Description Pointer (the chain entry point).
//! - [`sdt`]: the generic System Description Table header.
//! - [`xsdt`]: the Extended System Description Table and its entry scan.
//! - [`fadt`]: the Fixed ACPI Description Table and the Low Power S0 Idle
//!   capability patch.
//! - [`mem`]: the firmware memory seam ([`FirmwareMemory`]) that turns
//!   physical table addresses into byte windows.
//!
//! ## Design
//!
//! All tables are **views over byte slices**. A view is only constructed
//! after its structure's declared length has been bounds-checked, so the
//! accessors themselves stay panic-free on firmware-provided input. Nothing
//! here copies, allocates, or frees: the single mutating operation
//! ([`fadt::set_low_power_idle`]) flips one flag bit in place and rewrites
//! the table's checksum byte.
//!
//! Discovery functions come in two layers. `from_bytes` constructors parse a
//! slice the caller already holds and are entirely safe; `parse` variants
//! take a [`FirmwareMemory`] plus a physical address and are `unsafe`
//! because the address originates from firmware data structures the type
//! system cannot vouch for.

#![cfg_attr(not(any(test, doctest)), no_std)]

pub mod checksum;
pub mod fadt;
pub mod mem;
pub mod rsdp;
pub mod sdt;
pub mod xsdt;

pub use crate::fadt::{FadtFlags, PatchOutcome};
pub use crate::mem::FirmwareMemory;
pub use crate::rsdp::Rsdp;
pub use crate::sdt::{SdtHeader, Signature};
pub use crate::xsdt::Xsdt;

/// Validation failures encountered while walking the table chain.
///
/// Every variant is stage-local: callers report it and move on to the next
/// candidate, except [`AcpiError::NotFound`], which marks an exhausted scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AcpiError {
    /// The table does not carry the expected signature constant.
    #[error("unexpected table signature")]
    InvalidSignature,
    /// The table revision predates the feature being looked for.
    #[error("table revision {found} is below the supported minimum")]
    InvalidRevision { found: u8 },
    /// The byte sum over the declared length is not zero.
    #[error("table checksum mismatch")]
    ChecksumMismatch,
    /// The declared length and the table's actual extent disagree: one of
    /// them is too small for the other.
    #[error("table is truncated (declared length {declared})")]
    Truncated { declared: u32 },
    /// A scan ran to completion without a qualifying table.
    #[error("no table matched the requested signature and revision")]
    NotFound,
}
