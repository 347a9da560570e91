// ── Component runtime (COM apartment) ─────────────────────────────────────────
//
// The embedded engine loads its extensions through COM, which must be
// initialized on this thread before the host window (and therefore the
// engine view) can be created.  `ComRuntime` pairs the init with its
// release: `CoUninitialize` runs in `Drop`, and `Win32Host` keeps the value
// in an `Option` so the release happens exactly once on every exit path.

#![allow(unsafe_code)]

use windows::Win32::System::Com::{CoInitializeEx, CoUninitialize, COINIT_APARTMENTTHREADED};

use crate::error::{Result, ShellError};

/// Proof that the COM apartment is initialized on the bootstrap thread.
pub(crate) struct ComRuntime(());

impl ComRuntime {
    /// Initialize COM under single-threaded apartment semantics.
    ///
    /// `S_FALSE` (already initialized on this thread) counts as success; a
    /// matching `CoUninitialize` is owed either way and `Drop` provides it.
    pub(crate) fn init() -> Result<Self> {
        // SAFETY: first COM call on the bootstrap thread; the reserved
        // pointer must be None per the CoInitializeEx contract.
        let hr = unsafe { CoInitializeEx(None, COINIT_APARTMENTTHREADED) };
        if hr.is_err() {
            return Err(ShellError::Win32 {
                function: "CoInitializeEx",
                code: hr.0 as u32,
            });
        }
        Ok(Self(()))
    }
}

impl Drop for ComRuntime {
    fn drop(&mut self) {
        // SAFETY: balances the successful CoInitializeEx in `init`, on the
        // same thread (the whole bootstrap is single-threaded).
        unsafe { CoUninitialize() };
    }
}
