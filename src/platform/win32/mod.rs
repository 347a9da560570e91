// ── Win32 platform implementation ─────────────────────────────────────────────
//
// This is one of exactly two modules in the codebase where `unsafe` code is
// permitted (the other is `engine`).  Every `unsafe` block MUST carry a
// `// SAFETY:` comment that states:
//   • which invariant makes the operation sound, and
//   • what the caller is responsible for maintaining.
//
// Nothing in this module is `pub` beyond what callers genuinely need; keep
// the unsafe surface as small as possible.

#![allow(unsafe_code)]

// ── Sub-modules ───────────────────────────────────────────────────────────────

pub(crate) mod com; // component runtime: COM apartment init / release
#[cfg(debug_assertions)]
pub(crate) mod console; // diagnostics console attachment (debug builds only)
pub(crate) mod dpi; // DPI awareness and 96-DPI scaling helpers
pub(crate) mod hardening; // process security posture, applied once at start
pub(crate) mod window; // host window, WndProc, message loop

use windows::Win32::Foundation::{GetLastError, HINSTANCE};
use windows::Win32::System::LibraryLoader::GetModuleHandleW;

use crate::bootstrap::Host;
use crate::diag::DiagSink;
use crate::error::{Result, ShellError};
use crate::project::EmbeddedProject;

/// Capture the current Win32 last-error code and wrap it in a `ShellError`.
///
/// Call immediately after a Win32 function that signals failure —
/// `GetLastError` reads thread-local state that can be overwritten by any
/// subsequent API call.
pub(crate) fn last_error(function: &'static str) -> ShellError {
    // SAFETY: GetLastError reads thread-local state set by the last Win32
    // call.  It is always safe to call and never fails.
    let code = unsafe { GetLastError() };
    ShellError::Win32 {
        function,
        code: code.0,
    }
}

// ── Win32Host ─────────────────────────────────────────────────────────────────

/// The real bootstrap host: owns the process-wide singletons acquired during
/// startup and maps each `bootstrap::Host` stage onto Win32.
///
/// The COM handle sits in an `Option` so release happens exactly once no
/// matter which exit path asks for it; the `Drop` on `ComRuntime` is the
/// single place `CoUninitialize` is called.
pub(crate) struct Win32Host {
    hinstance: HINSTANCE,
    com: Option<com::ComRuntime>,
    window: Option<window::HostWindow>,
}

impl Win32Host {
    /// Capture the executable's module handle.  Everything else is deferred
    /// to the bootstrap stages.
    pub(crate) fn new() -> Result<Self> {
        // SAFETY: GetModuleHandleW(None) returns the .exe's own HMODULE,
        // which is valid for the process lifetime and never fails in practice.
        let hmodule = unsafe { GetModuleHandleW(None) }.map_err(ShellError::from)?;

        // HMODULE converts to HINSTANCE losslessly; they are the same
        // underlying value on Windows.
        Ok(Self {
            hinstance: hmodule.into(),
            com: None,
            window: None,
        })
    }
}

impl Host for Win32Host {
    fn harden_process(&mut self) {
        hardening::apply();
    }

    fn attach_diagnostics(&mut self) -> DiagSink {
        DiagSink::attach()
    }

    fn init_component_runtime(&mut self) -> Result<()> {
        self.com = Some(com::ComRuntime::init()?);
        Ok(())
    }

    fn release_component_runtime(&mut self) {
        // take() makes a second release (or a release before init) a no-op.
        drop(self.com.take());
    }

    fn create_host_window(&mut self, project: &EmbeddedProject) -> Result<()> {
        let mut hosted = window::HostWindow::create(self.hinstance, project.clone())?;
        hosted.set_quit_on_close(true);
        self.window = Some(hosted);
        Ok(())
    }

    fn run_event_loop(&mut self) -> Result<()> {
        let pumped = window::message_loop();
        // The loop only ends once the window is gone; drop the host-window
        // state (engine view, then the engine library) before the component
        // runtime is released.
        drop(self.window.take());
        pumped
    }
}
