//! # Patch Orchestration
//!
//! Drives one linear pass over the firmware's table chain: scan the UEFI
//! configuration table for ACPI root pointer entries, validate the
//! RSDP/XSDT pair behind the first entry that holds up, walk the XSDT for a
//! qualifying FADT, and flip the flag in place.
//!
//! Selection is first match everywhere. Firmware publishes the ACPI 1.0 and
//! 2.0 GUIDs pointing at the same structure more often than not, so once a
//! chain validates end to end there is nothing left to learn from the
//! remaining entries.

use acpi_tables::AcpiError;
use acpi_tables::fadt::{self, FadtFlags, PatchOutcome};
use acpi_tables::mem::FirmwareMemory;
use acpi_tables::rsdp::Rsdp;
use acpi_tables::sdt::Signature;
use acpi_tables::xsdt::Xsdt;
use log::{debug, info, warn};
use uefi::prelude::*;
use uefi::table::cfg::{ACPI2_GUID, ACPI_GUID, ConfigTableEntry};

/// Terminal states of one patch run.
pub enum RunOutcome {
    /// The flag was clear and has been set; the checksum is repaired.
    Patched { old: FadtFlags, new: FadtFlags },
    /// Firmware already advertises the capability; nothing was written.
    AlreadyEnabled { flags: FadtFlags },
    /// No configuration table entry yielded a valid RSDP/XSDT pair.
    RootPointerNotFound,
    /// The XSDT holds no FADT at revision 5 or above.
    PowerTableNotFound,
    /// A qualifying FADT was found but rejected the patch.
    PatchFailed(AcpiError),
}

/// Run the whole pass against the live configuration table.
pub fn run<M: FirmwareMemory>(mem: &M) -> RunOutcome {
    system::with_config_table(|entries| scan_and_patch(mem, entries))
}

fn scan_and_patch<M: FirmwareMemory>(mem: &M, entries: &[ConfigTableEntry]) -> RunOutcome {
    info!("scanning {} configuration table entries", entries.len());

    let Some(xsdt) = locate_xsdt(mem, entries) else {
        return RunOutcome::RootPointerNotFound;
    };

    let Ok(fadt_addr) = (unsafe { xsdt.find_table(mem, Signature::FADT, fadt::MIN_REVISION) })
    else {
        return RunOutcome::PowerTableNotFound;
    };

    // SAFETY: the address came out of a checksum-validated XSDT entry and
    // the XSDT view is no longer touched once the writable window exists.
    match unsafe { fadt::enable_low_power_idle(mem, fadt_addr) } {
        Ok(PatchOutcome::Applied { old, new }) => RunOutcome::Patched { old, new },
        Ok(PatchOutcome::AlreadyEnabled { flags }) => RunOutcome::AlreadyEnabled { flags },
        Err(err) => RunOutcome::PatchFailed(err),
    }
}

/// Walk the configuration table in order and return the first XSDT that
/// validates all the way from its RSDP.
///
/// Entries that fail any stage are logged and skipped; a later entry may
/// still carry a healthy chain.
fn locate_xsdt<'a, M: FirmwareMemory>(
    mem: &'a M,
    entries: &[ConfigTableEntry],
) -> Option<Xsdt<'a>> {
    for (index, entry) in entries.iter().enumerate() {
        if entry.guid != ACPI2_GUID && entry.guid != ACPI_GUID {
            debug!("entry {index}: not an ACPI root pointer, skipping");
            continue;
        }
        let rsdp_addr = entry.address as usize as u64;
        if rsdp_addr == 0 {
            warn!("entry {index}: ACPI entry with a null address, skipping");
            continue;
        }

        // SAFETY: a non-null address from the firmware configuration table
        // points at readable boot-services memory.
        let rsdp = match unsafe { Rsdp::parse(mem, rsdp_addr) } {
            Ok(rsdp) => rsdp,
            Err(err) => {
                warn!("entry {index}: RSDP at {rsdp_addr:#x} rejected: {err}");
                continue;
            }
        };
        info!(
            "entry {index}: RSDP revision {} at {rsdp_addr:#x}",
            rsdp.revision()
        );

        let xsdt_addr = rsdp.xsdt_address();
        if xsdt_addr == 0 {
            warn!("entry {index}: RSDP carries a null XSDT address, skipping");
            continue;
        }

        // SAFETY: the address came out of a checksum-validated RSDP.
        match unsafe { Xsdt::parse(mem, xsdt_addr) } {
            Ok(xsdt) => {
                info!("entry {index}: XSDT at {xsdt_addr:#x}");
                return Some(xsdt);
            }
            Err(err) => {
                warn!("entry {index}: XSDT at {xsdt_addr:#x} rejected: {err}");
            }
        }
    }
    None
}
