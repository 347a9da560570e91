// ── Platform abstraction layer ────────────────────────────────────────────────
//
// This module defines the interface the rest of the codebase uses to talk to
// the OS.  No `unsafe` lives here; all Win32 FFI is confined to the `win32`
// sub-module and never leaks outward.  On non-Windows hosts the platform
// layer is absent and only the platform-neutral bootstrap core compiles.

#[cfg(windows)]
pub mod win32;
