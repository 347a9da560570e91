// ── Host window ───────────────────────────────────────────────────────────────
//
// Responsibilities in this file (unsafe confined here):
//   • Register the host window class.
//   • Create the single top-level window at its fixed, DPI-scaled geometry.
//   • Host the engine's rendering surface in the client area (WM_CREATE /
//     WM_SIZE) and abort window creation if the surface cannot be created.
//   • Honor the quit-on-close flag: WM_DESTROY posts WM_QUIT only when set.
//   • Run the blocking Win32 message loop.
//
// Window state lives in a heap allocation reachable from the WndProc via
// GWLP_USERDATA; `HostWindow` owns that allocation and frees it on drop.

#![allow(unsafe_code)]

use std::ffi::c_void;

use windows::{
    core::{w, PCWSTR},
    Win32::{
        Foundation::{HINSTANCE, HWND, LPARAM, LRESULT, RECT, WPARAM},
        Graphics::Gdi::{GetStockObject, HBRUSH, WHITE_BRUSH},
        UI::WindowsAndMessaging::{
            CreateWindowExW, DefWindowProcW, DestroyWindow, DispatchMessageW, GetClientRect,
            GetMessageW, GetWindowLongPtrW, LoadCursorW, LoadIconW, PostQuitMessage,
            RegisterClassExW, SetWindowLongPtrW, ShowWindow, TranslateMessage, UpdateWindow,
            CREATESTRUCTW, CS_HREDRAW, CS_VREDRAW, GWLP_USERDATA, IDC_ARROW,
            IDI_APPLICATION, MSG, SW_SHOW, WINDOW_EX_STYLE, WM_CLOSE, WM_CREATE, WM_DESTROY,
            WM_NCCREATE, WM_NCDESTROY, WM_SIZE, WNDCLASSEXW, WS_OVERLAPPEDWINDOW,
        },
    },
};

use super::{dpi, last_error};
use crate::{
    engine::{EngineDll, EngineView},
    error::{Result, ShellError},
    project::EmbeddedProject,
};

// ── Window identity ───────────────────────────────────────────────────────────

/// Atom name used to register the host window class.
const CLASS_NAME: PCWSTR = w!("VellumHostWindow");

/// Title bar text.
const WINDOW_TITLE: PCWSTR = w!("Vellum Journal");

/// Initial screen origin, in 96-DPI units.
const ORIGIN_X: i32 = 10;
const ORIGIN_Y: i32 = 10;

/// Initial window size, in 96-DPI units.
const INITIAL_WIDTH: i32 = 1280;
const INITIAL_HEIGHT: i32 = 720;

// ── Window state ──────────────────────────────────────────────────────────────

/// Everything the WndProc needs, boxed so its address is stable and stashed
/// in GWLP_USERDATA at WM_NCCREATE.
///
/// Field order is drop order: the engine library is freed only after the
/// view struct (whose HWND Windows already destroyed with the parent).
struct WindowState {
    project: EmbeddedProject,
    view: Option<EngineView>,
    engine: EngineDll,
    /// When set, closing this window ends the whole process.
    quit_on_close: bool,
    /// Error recorded when WM_CREATE aborts window creation, so `create`
    /// can report the real cause instead of a generic CreateWindowExW code.
    create_error: Option<ShellError>,
}

// ── HostWindow ────────────────────────────────────────────────────────────────

/// The single top-level window hosting the embedded rendering surface.
///
/// Owns the window state allocation (and through it the engine library and
/// view) for the window's entire lifetime.  At most one exists per process.
pub(crate) struct HostWindow {
    hwnd: HWND,
    state: *mut WindowState,
}

impl HostWindow {
    /// Register the class, load the engine library, and create the window
    /// with its surface attached and visible.
    ///
    /// Any failure along the way — library load, window creation, surface
    /// creation inside WM_CREATE — surfaces as one error with nothing left
    /// dangling.
    pub(crate) fn create(hinstance: HINSTANCE, project: EmbeddedProject) -> Result<Self> {
        register_class(hinstance)?;

        let engine = EngineDll::load()?;
        let state_ptr = Box::into_raw(Box::new(WindowState {
            project,
            view: None,
            engine,
            quit_on_close: false,
            create_error: None,
        }));

        // Fixed geometry is defined at 96 DPI; scale to the system DPI so
        // the window comes up the same physical size everywhere.
        let scale = dpi::get_system_dpi();

        // SAFETY: CLASS_NAME was just registered; hinstance is the exe's
        // module.  state_ptr is a valid heap pointer handed to WM_NCCREATE
        // via lpCreateParams; on failure it is reclaimed below, on success
        // ownership moves into the returned HostWindow.
        let created = unsafe {
            CreateWindowExW(
                WINDOW_EX_STYLE(0),
                CLASS_NAME,
                WINDOW_TITLE,
                WS_OVERLAPPEDWINDOW,
                dpi::scale(ORIGIN_X, scale),
                dpi::scale(ORIGIN_Y, scale),
                dpi::scale(INITIAL_WIDTH, scale),
                dpi::scale(INITIAL_HEIGHT, scale),
                None,
                None,
                hinstance,
                Some(state_ptr as *const c_void),
            )
        };

        let hwnd = match created {
            Ok(hwnd) => hwnd,
            Err(e) => {
                // SAFETY: creation failed, so no window refers to state_ptr
                // any more (WM_NCDESTROY has already cleared GWLP_USERDATA if
                // the window got far enough to set it); reclaiming the box
                // here is the unique ownership path.
                let mut state = unsafe { Box::from_raw(state_ptr) };
                // WM_CREATE aborting records the real cause; anything else
                // surfaces as the OS error CreateWindowExW reported.
                return Err(state
                    .create_error
                    .take()
                    .unwrap_or_else(|| ShellError::from(e)));
            }
        };

        // SAFETY: hwnd was just returned by CreateWindowExW and is valid.
        // ShowWindow returns the previous visibility state; UpdateWindow
        // returns a success BOOL — both are intentionally ignored here.
        unsafe {
            let _ = ShowWindow(hwnd, SW_SHOW);
            let _ = UpdateWindow(hwnd);
        }

        Ok(Self {
            hwnd,
            state: state_ptr,
        })
    }

    /// Bind closure of this window to termination of the whole process:
    /// when set, WM_DESTROY posts WM_QUIT and the message loop ends.
    pub(crate) fn set_quit_on_close(&mut self, quit: bool) {
        // SAFETY: self.state is the live allocation created in `create`;
        // all access happens on the single UI thread.
        unsafe {
            (*self.state).quit_on_close = quit;
        }
    }
}

impl Drop for HostWindow {
    fn drop(&mut self) {
        // SAFETY: DestroyWindow is a benign failure if the user already
        // closed the window.  The state box is freed only after the window
        // is gone, so any WndProc reentrancy during destruction still sees
        // a valid pointer.
        unsafe {
            let _ = DestroyWindow(self.hwnd);
            drop(Box::from_raw(self.state));
        }
    }
}

// ── Window class registration ─────────────────────────────────────────────────

fn register_class(hinstance: HINSTANCE) -> Result<()> {
    // SAFETY: LoadIconW with IDI_APPLICATION always succeeds; it loads the
    // built-in application icon resource, which exists on all Windows versions.
    let icon = unsafe { LoadIconW(None, IDI_APPLICATION) }.map_err(ShellError::from)?;

    // SAFETY: LoadCursorW with IDC_ARROW always succeeds; the arrow cursor is
    // a built-in resource guaranteed to exist on all Windows versions.
    let cursor = unsafe { LoadCursorW(None, IDC_ARROW) }.map_err(ShellError::from)?;

    // SAFETY: GetStockObject with WHITE_BRUSH always returns a valid HGDIOBJ.
    // Casting to HBRUSH is correct: stock brush objects are compatible types.
    let bg_brush = unsafe { HBRUSH(GetStockObject(WHITE_BRUSH).0) };

    let wndclass = WNDCLASSEXW {
        // WNDCLASSEXW is ~72 bytes; the cast to u32 is always lossless.
        cbSize: std::mem::size_of::<WNDCLASSEXW>() as u32,
        // Repaint on resize; the engine surface covers the client area, so
        // this only matters for the brief gap before WM_CREATE finishes.
        style: CS_HREDRAW | CS_VREDRAW,
        lpfnWndProc: Some(wnd_proc),
        cbClsExtra: 0,
        cbWndExtra: 0,
        hInstance: hinstance,
        hIcon: icon,
        hCursor: cursor,
        hbrBackground: bg_brush,
        lpszMenuName: PCWSTR::null(),
        lpszClassName: CLASS_NAME,
        hIconSm: icon,
    };

    // SAFETY: wndclass is fully initialised with valid handles;
    // CLASS_NAME is a valid null-terminated UTF-16 string literal.
    let atom = unsafe { RegisterClassExW(&wndclass) };
    if atom == 0 {
        return Err(last_error("RegisterClassExW"));
    }

    Ok(())
}

// ── Message loop ──────────────────────────────────────────────────────────────

/// Blocking retrieval and dispatch of OS messages until WM_QUIT.
///
/// This is the only blocking operation in the whole bootstrap; the sole way
/// out is the quit message posted when the host window (with quit-on-close
/// set) is destroyed.
pub(crate) fn message_loop() -> Result<()> {
    let mut msg = MSG::default();

    loop {
        // SAFETY: &mut msg is a valid MSG pointer; a None window retrieves
        // messages for all windows on this thread; 0,0 filter accepts all.
        let ret = unsafe { GetMessageW(&mut msg, None, 0, 0) };

        match ret.0 {
            // GetMessageW returns -1 on error.
            -1 => return Err(last_error("GetMessageW")),
            // Returns 0 when WM_QUIT is retrieved — exit the loop cleanly.
            0 => break,
            // Any other value: a normal message to dispatch.
            _ => unsafe {
                // SAFETY: msg was populated by a successful GetMessageW call.
                // TranslateMessage return value (whether it generated WM_CHAR)
                // and DispatchMessageW's LRESULT are intentionally unused.
                let _ = TranslateMessage(&msg);
                let _ = DispatchMessageW(&msg);
            },
        }
    }

    Ok(())
}

// ── Window procedure ──────────────────────────────────────────────────────────

// SAFETY: wnd_proc is registered as lpfnWndProc in WNDCLASSEXW.
// Windows guarantees that hwnd, msg, wparam, and lparam are valid for the
// lifetime of this call; the state pointer is stashed at WM_NCCREATE and
// cleared at WM_NCDESTROY, so every dereference below sees a live allocation.
unsafe extern "system" fn wnd_proc(
    hwnd: HWND,
    msg: u32,
    wparam: WPARAM,
    lparam: LPARAM,
) -> LRESULT {
    if msg == WM_NCCREATE {
        // SAFETY: for WM_NCCREATE, lparam points at the CREATESTRUCTW whose
        // lpCreateParams is the WindowState pointer passed to CreateWindowExW.
        let cs = &*(lparam.0 as *const CREATESTRUCTW);
        SetWindowLongPtrW(hwnd, GWLP_USERDATA, cs.lpCreateParams as isize);
        return DefWindowProcW(hwnd, msg, wparam, lparam);
    }

    let state_ptr = GetWindowLongPtrW(hwnd, GWLP_USERDATA) as *mut WindowState;
    if state_ptr.is_null() {
        // Messages before WM_NCCREATE or after WM_NCDESTROY.
        return DefWindowProcW(hwnd, msg, wparam, lparam);
    }
    let state = &mut *state_ptr;

    match msg {
        // ── Lifecycle ─────────────────────────────────────────────────────────
        WM_CREATE => {
            let mut rect = RECT::default();
            // SAFETY: hwnd is the window being created; rect is a valid out
            // pointer.  On the unlikely failure the surface starts at 0×0 and
            // the first WM_SIZE corrects it.
            let _ = GetClientRect(hwnd, &mut rect);

            match EngineView::attach(
                &state.engine,
                hwnd,
                rect.right - rect.left,
                rect.bottom - rect.top,
                &state.project,
            ) {
                Ok(view) => {
                    state.view = Some(view);
                    LRESULT(0)
                }
                Err(e) => {
                    // Returning -1 makes CreateWindowExW fail; `create`
                    // reports this recorded error.
                    state.create_error = Some(e);
                    LRESULT(-1)
                }
            }
        }

        WM_CLOSE => {
            // SAFETY: hwnd is the window being closed; DestroyWindow triggers
            // WM_DESTROY below.
            let _ = DestroyWindow(hwnd);
            LRESULT(0)
        }

        WM_DESTROY => {
            if state.quit_on_close {
                // SAFETY: PostQuitMessage is always safe to call from
                // WM_DESTROY; it posts WM_QUIT to this thread's queue, which
                // is the event loop's single exit.
                PostQuitMessage(0);
            }
            LRESULT(0)
        }

        WM_NCDESTROY => {
            // The allocation is owned and freed by HostWindow; just stop
            // routing messages to it.
            SetWindowLongPtrW(hwnd, GWLP_USERDATA, 0);
            DefWindowProcW(hwnd, msg, wparam, lparam)
        }

        // ── Layout ────────────────────────────────────────────────────────────
        WM_SIZE => {
            // lparam low word = new client width, high word = new client height.
            let width = (lparam.0 & 0xFFFF) as i32;
            let height = ((lparam.0 >> 16) & 0xFFFF) as i32;
            if let Some(view) = &state.view {
                view.resize(width, height);
            }
            LRESULT(0)
        }

        // Default processing for all unhandled messages.
        // SAFETY: hwnd and message parameters are valid — provided by Windows.
        _ => DefWindowProcW(hwnd, msg, wparam, lparam),
    }
}
