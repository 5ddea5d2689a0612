//! # Firmware Memory Access
//!
//! The table chain is a linked structure of physical addresses owned by the
//! firmware. This trait is the one seam between the parsing code and that
//! memory: discovery asks for a read-only window at an address, the patcher
//! asks for a writable one. Production code backs it with the identity
//! mapping guaranteed while UEFI boot services are running; tests back it
//! with an owned buffer posing as firmware memory.

/// Maps physical addresses to byte windows.
///
/// Implementations do not validate anything about the contents; callers
/// bounds-check a structure's declared length before widening a window.
pub trait FirmwareMemory {
    /// Read-only window of `len` bytes starting at physical address `addr`.
    ///
    /// # Safety
    /// The caller must guarantee that `addr` is non-null and that the whole
    /// window stays readable, unaliased by writers, and unmoved for the
    /// lifetime of the returned slice.
    unsafe fn map_ro(&self, addr: u64, len: usize) -> &[u8];

    /// Writable window of `len` bytes starting at physical address `addr`.
    ///
    /// # Safety
    /// As [`FirmwareMemory::map_ro`], and additionally the caller must be
    /// the only accessor of the window while the returned slice lives; no
    /// window obtained earlier from this mapper may be used afterwards.
    unsafe fn map_rw(&self, addr: u64, len: usize) -> &mut [u8];
}
