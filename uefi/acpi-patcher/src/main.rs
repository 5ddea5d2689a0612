//! # FADT Low Power S0 Idle Patcher
//!
//! A UEFI application that enables the Low Power S0 Idle capability bit in
//! the firmware's FADT, in place, before an operating system boots. Some
//! boards ship with the bit clear even though the platform handles S0 idle
//! fine; flipping it lets the OS pick modern standby over S3 sleep.
//!
//! The run is a single linear pass:
//!
//! ```text
//! configuration table → RSDP → XSDT → FADT → flag bit + checksum repair
//! ```
//!
//! Every stage reports its findings on the console. The application always
//! returns [`Status::SUCCESS`]: the outcome is already on screen, and a
//! failure status would only make some firmwares drop the boot entry.

#![cfg_attr(not(any(test, doctest)), no_std)]
#![no_main]
#![allow(unsafe_code)]

mod logger;
mod memory;
mod patcher;

use crate::logger::ConsoleLogger;
use crate::memory::BootMemory;
use crate::patcher::RunOutcome;
use log::LevelFilter;
use uefi::prelude::*;
use uefi::proto::console::text::Color;

#[entry]
fn efi_main() -> Status {
    // Initialize the UEFI helpers (system table access for println!)
    if uefi::helpers::init().is_err() {
        return Status::UNSUPPORTED;
    }

    ConsoleLogger::new(LevelFilter::Debug)
        .init()
        .expect("logger init");

    banner();

    let outcome = patcher::run(&BootMemory);
    report(&outcome);

    pause();
    Status::SUCCESS
}

fn banner() {
    say(
        Color::White,
        format_args!("AcpiPatcher {}", env!("CARGO_PKG_VERSION")),
    );
}

fn report(outcome: &RunOutcome) {
    match outcome {
        RunOutcome::Patched { old, new } => say(
            Color::Green,
            format_args!(
                "Low Power S0 Idle enabled: flags {:#010x} -> {:#010x}, checksum rewritten",
                old.into_bits(),
                new.into_bits()
            ),
        ),
        RunOutcome::AlreadyEnabled { flags } => say(
            Color::Green,
            format_args!(
                "Low Power S0 Idle already enabled (flags {:#010x}), nothing to do",
                flags.into_bits()
            ),
        ),
        RunOutcome::RootPointerNotFound => say(
            Color::Red,
            format_args!("no valid ACPI root pointer in the configuration table"),
        ),
        RunOutcome::PowerTableNotFound => say(
            Color::Red,
            format_args!("no FADT at revision 5 or above; this firmware predates the flag"),
        ),
        RunOutcome::PatchFailed(err) => {
            say(Color::Red, format_args!("patch failed: {err}"));
        }
    }
}

/// Print one line in `color`, then drop back to the regular palette.
fn say(color: Color, args: core::fmt::Arguments<'_>) {
    let _ = system::with_stdout(|stdout| stdout.set_color(color, Color::Black));
    uefi::println!("{args}");
    let _ = system::with_stdout(|stdout| stdout.set_color(Color::LightGray, Color::Black));
}

/// Block until a key arrives, so the report survives on firmwares that
/// repaint the screen as soon as the application returns.
fn pause() {
    say(Color::Yellow, format_args!("Press any key to continue ..."));

    system::with_stdin(|stdin| {
        let _ = stdin.reset(false);
        if let Some(mut event) = stdin.wait_for_key_event() {
            let _ = uefi::boot::wait_for_event(core::slice::from_mut(&mut event));
        }
        let _ = stdin.read_key();
    });
}
