//! # Boot-Time Physical Memory Access
//!
//! While boot services are active, UEFI keeps physical memory identity
//! mapped, so the physical table addresses found in firmware structures are
//! directly dereferenceable.

use acpi_tables::mem::FirmwareMemory;

/// The identity mapping maintained by firmware before `ExitBootServices`.
pub struct BootMemory;

impl FirmwareMemory for BootMemory {
    unsafe fn map_ro(&self, addr: u64, len: usize) -> &[u8] {
        // SAFETY: identity mapping while boot services are active; the
        // caller vouches for `addr` and `len` per the trait contract.
        unsafe { core::slice::from_raw_parts(addr as usize as *const u8, len) }
    }

    unsafe fn map_rw(&self, addr: u64, len: usize) -> &mut [u8] {
        // SAFETY: as above; ACPI tables live in writable boot-services
        // memory, and the caller guarantees the window is unaliased.
        unsafe { core::slice::from_raw_parts_mut(addr as usize as *mut u8, len) }
    }
}
