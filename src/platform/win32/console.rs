// ── Diagnostics console attachment ────────────────────────────────────────────
//
// Debug builds only; the module is compiled out of release binaries.
// Allocates a fresh console and rebinds the three standard handles to it so
// that `println!`/`eprintln!` in `diag` land somewhere visible.  Allocation
// failure is a soft failure — the caller falls back to the silent sink.
// Rebind results are deliberately unverified: a handle that fails to rebind
// just leaves that stream writing to nowhere, which the OS tolerates.

#![allow(unsafe_code)]

use windows::{
    core::{w, PCWSTR},
    Win32::{
        Foundation::{GENERIC_READ, GENERIC_WRITE},
        Storage::FileSystem::{
            CreateFileW, FILE_FLAGS_AND_ATTRIBUTES, FILE_SHARE_READ, FILE_SHARE_WRITE,
            OPEN_EXISTING,
        },
        System::Console::{
            AllocConsole, SetConsoleTitleW, SetStdHandle, STD_ERROR_HANDLE, STD_HANDLE,
            STD_INPUT_HANDLE, STD_OUTPUT_HANDLE,
        },
    },
};

/// Allocate a console and rebind stdout, stderr, and stdin to it.
///
/// Returns `true` when the console is live.  `false` means the rest of the
/// bootstrap proceeds without one; subsequent diagnostic writes are dropped
/// by the OS rather than causing failure.
pub(crate) fn attach() -> bool {
    // SAFETY: AllocConsole has no preconditions; it fails (benignly) when
    // the process already owns a console.
    if unsafe { AllocConsole() }.is_err() {
        return false;
    }

    rebind(STD_OUTPUT_HANDLE, w!("CONOUT$"), GENERIC_WRITE.0);
    rebind(STD_ERROR_HANDLE, w!("CONOUT$"), GENERIC_WRITE.0);
    rebind(STD_INPUT_HANDLE, w!("CONIN$"), GENERIC_READ.0);

    // SAFETY: static null-terminated UTF-16 literal; the console was just
    // allocated above.  Title failures are cosmetic and ignored.
    unsafe {
        let _ = SetConsoleTitleW(w!("Vellum Debug Console"));
    }

    true
}

/// Point one standard-handle slot at a console device.
fn rebind(slot: STD_HANDLE, device: PCWSTR, access: u32) {
    // SAFETY: device is a static null-terminated UTF-16 literal naming a
    // console pseudo-file; with a console attached, opening it yields a
    // handle the OS accepts in SetStdHandle.  The handle is intentionally
    // left open for the process lifetime, like the streams it replaces.
    unsafe {
        if let Ok(handle) = CreateFileW(
            device,
            access,
            FILE_SHARE_READ | FILE_SHARE_WRITE,
            None,
            OPEN_EXISTING,
            FILE_FLAGS_AND_ATTRIBUTES(0),
            None,
        ) {
            let _ = SetStdHandle(slot, handle);
        }
    }
}
