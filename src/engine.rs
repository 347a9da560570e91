// ── Embedded engine hosting ───────────────────────────────────────────────────
//
// This is one of exactly two modules where `unsafe` is permitted.
// Every `unsafe` block MUST carry a `// SAFETY:` comment.
//
// ── Library ownership model ───────────────────────────────────────────────────
//
// `EngineDll` owns the single `LoadLibraryW` call for the engine library
// and the resolved view-creation entry point.  It is stored in the window
// state and lives longer than the `EngineView` it creates.  `EngineView`
// holds only the child `HWND`; Windows destroys that child as part of
// parent-window teardown, so the view's drop is a no-op and `FreeLibrary`
// (in `EngineDll::drop`) runs after the window is gone.
//
// Everything past this boundary — what the engine draws into the surface,
// how it interprets its startup arguments — is the engine's business.  The
// shell hands over a parent window, a size, the asset-bundle location, and
// the forwarded arguments, and never looks inside.

#![allow(unsafe_code)]

use windows::{
    core::{s, PCWSTR},
    Win32::{
        Foundation::{HMODULE, HWND},
        System::LibraryLoader::{FreeLibrary, GetProcAddress, LoadLibraryW},
        UI::WindowsAndMessaging::{SetWindowPos, SWP_NOACTIVATE, SWP_NOZORDER},
    },
};

use crate::{
    error::{Result, ShellError},
    platform::win32::last_error,
    project::EmbeddedProject,
};

// ── Engine identity ───────────────────────────────────────────────────────────

const DLL_NAME: &str = "vellum_engine.dll";

/// The engine's view-creation entry point.
///
/// Creates a rendering-surface child window under `parent`, sized
/// `width` × `height`, booted from the asset bundle at `assets_dir` with the
/// given startup arguments.  Returns the surface `HWND`, or null on failure.
type CreateViewFn = unsafe extern "system" fn(
    parent: HWND,
    width: i32,
    height: i32,
    assets_dir: PCWSTR,
    argv: *const PCWSTR,
    argc: usize,
) -> HWND;

// ── EngineDll ─────────────────────────────────────────────────────────────────

/// RAII handle to the loaded engine library and its resolved entry point.
///
/// `FreeLibrary` is called on `Drop`, which must happen after the engine's
/// view window has been destroyed.
pub(crate) struct EngineDll {
    module: HMODULE,
    create_view: CreateViewFn,
}

impl EngineDll {
    /// Load `vellum_engine.dll` from the directories left open by the
    /// `SetDefaultDllDirectories` hardening: the application directory and
    /// the system directories, never the working directory.
    pub(crate) fn load() -> Result<Self> {
        let name: Vec<u16> = DLL_NAME.encode_utf16().chain(std::iter::once(0)).collect();

        // SAFETY: name is a valid null-terminated UTF-16 string.
        let module =
            unsafe { LoadLibraryW(PCWSTR(name.as_ptr())) }.map_err(ShellError::from)?;

        // SAFETY: module was just returned by a successful LoadLibraryW;
        // the export name is a static null-terminated ANSI string.
        let raw = unsafe { GetProcAddress(module, s!("vellum_engine_create_view")) };
        let Some(raw) = raw else {
            let e = last_error("GetProcAddress");
            // SAFETY: module is valid and owned solely by this function;
            // freeing it here keeps the failure path leak-free.
            unsafe {
                let _ = FreeLibrary(module);
            }
            return Err(e);
        };

        // SAFETY: the engine library contract defines this export with the
        // CreateViewFn signature; transmuting the FARPROC to it is the
        // documented way to call a resolved export.
        let create_view: CreateViewFn = unsafe { std::mem::transmute(raw) };

        Ok(Self {
            module,
            create_view,
        })
    }
}

impl Drop for EngineDll {
    fn drop(&mut self) {
        // SAFETY: self.module was returned by a successful LoadLibraryW and
        // has not been freed since.  The engine view HWND is already gone
        // (Windows destroys child windows during parent teardown, and the
        // window state drops its view before this handle).
        unsafe {
            let _ = FreeLibrary(self.module);
        }
    }
}

// ── EngineView ────────────────────────────────────────────────────────────────

/// The embedded rendering surface: a child window created and painted by the
/// engine.  Exclusively owned by the host window for its entire lifetime.
///
/// Does **not** own the engine library handle — that is `EngineDll`'s job.
/// The child `HWND` is destroyed automatically by Windows when the parent is
/// destroyed; no explicit cleanup is needed here.
pub(crate) struct EngineView {
    hwnd: HWND,
}

impl EngineView {
    /// Ask the engine to create its rendering surface inside `parent`.
    pub(crate) fn attach(
        dll: &EngineDll,
        parent: HWND,
        width: i32,
        height: i32,
        project: &EmbeddedProject,
    ) -> Result<Self> {
        let assets: Vec<u16> = project
            .assets_dir()
            .to_string_lossy()
            .encode_utf16()
            .chain(std::iter::once(0))
            .collect();

        // Arguments cross the boundary as an array of null-terminated UTF-16
        // strings; both the backing buffers and the pointer array must
        // outlive the call below.
        let arg_bufs: Vec<Vec<u16>> = project
            .args()
            .iter()
            .map(|a| a.encode_utf16().chain(std::iter::once(0)).collect())
            .collect();
        let arg_ptrs: Vec<PCWSTR> = arg_bufs.iter().map(|a| PCWSTR(a.as_ptr())).collect();

        // SAFETY: parent is a valid window handle mid-WM_CREATE; assets and
        // every element of arg_ptrs point into buffers that live until after
        // the call returns; argc matches the pointer array length.
        let hwnd = unsafe {
            (dll.create_view)(
                parent,
                width,
                height,
                PCWSTR(assets.as_ptr()),
                arg_ptrs.as_ptr(),
                arg_ptrs.len(),
            )
        };

        if hwnd.0.is_null() {
            return Err(ShellError::Engine {
                detail: "view creation returned a null handle",
            });
        }

        Ok(Self { hwnd })
    }

    /// Resize the surface to fill `width` × `height` at the client origin.
    pub(crate) fn resize(&self, width: i32, height: i32) {
        // SAFETY: hwnd is the engine's child window, alive while the parent
        // is alive.  Resize failures are not actionable here and are ignored.
        unsafe {
            let _ = SetWindowPos(
                self.hwnd,
                None,
                0,
                0,
                width,
                height,
                SWP_NOZORDER | SWP_NOACTIVATE,
            );
        }
    }
}
