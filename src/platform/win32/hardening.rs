// ── Process security posture ──────────────────────────────────────────────────
//
// Write-once hardening applied before any window or console exists.  These
// are best-effort calls: failure is indistinguishable from success at this
// layer and is never fatal, so every result is deliberately discarded.

#![allow(unsafe_code)]

use windows::Win32::System::LibraryLoader::{
    SetDefaultDllDirectories, LOAD_LIBRARY_SEARCH_DEFAULT_DIRS,
};
use windows::Win32::System::Threading::{
    SetProcessDEPPolicy, PROCESS_DEP_DISABLE_ATL_THUNK_EMULATION, PROCESS_DEP_ENABLE,
};

use super::dpi;

/// Configure DPI awareness and OS-level exploit mitigations.
///
/// Idempotent; invoked once at process start, before everything else:
///   • Per-Monitor v2 DPI awareness, so the OS never bitmap-scales the
///     window content.
///   • DLL search path restricted to the OS-default safe directories, so a
///     planted DLL in the working directory is never loaded.
///   • DEP enforced, with the ATL-thunk-emulation exception disabled.
pub(crate) fn apply() {
    dpi::init();

    // SAFETY: both calls only narrow process-wide policy flags and have no
    // preconditions.  They must run before any library is loaded by name;
    // `apply` is the first thing the bootstrap does.
    unsafe {
        let _ = SetDefaultDllDirectories(LOAD_LIBRARY_SEARCH_DEFAULT_DIRS);
        let _ = SetProcessDEPPolicy(PROCESS_DEP_ENABLE | PROCESS_DEP_DISABLE_ATL_THUNK_EMULATION);
    }
}
