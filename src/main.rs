// ── Safety policy ────────────────────────────────────────────────────────────
// Unsafe code is forbidden everywhere except:
//   • `platform::win32` – Win32 / WinAPI FFI
//   • `engine`          – embedded-engine library loading and view hosting
// Each unsafe block in those modules MUST carry a `// SAFETY:` comment.
#![deny(unsafe_code)]

// Release builds run as a GUI application (no console window).
// Debug builds keep the console subsystem so diagnostic output has somewhere
// to go even before the console in `diag` is attached.
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod bootstrap;
mod diag;
#[cfg(windows)]
mod engine;
mod error;
mod platform;
mod project;

/// Startup arguments forwarded to the embedded engine: the process command
/// line minus argument zero (the executable path), order preserved, contents
/// uninterpreted.  Lossy conversion keeps construction infallible.
fn forwarded_args() -> Vec<String> {
    std::env::args_os()
        .skip(1)
        .map(|a| a.to_string_lossy().into_owned())
        .collect()
}

#[cfg(windows)]
fn main() {
    let code = match platform::win32::Win32Host::new() {
        Ok(mut host) => bootstrap::run(&mut host, forwarded_args()),
        Err(e) => {
            // Pre-bootstrap failure (module handle unavailable).  No console
            // exists yet; stderr is the only output path and is invisible in
            // release builds — the exit code is the contract.
            eprintln!("vellum: startup failed: {e}");
            bootstrap::EXIT_FAILURE
        }
    };
    std::process::exit(code);
}

#[cfg(not(windows))]
fn main() {
    let _ = forwarded_args();
    eprintln!("vellum: the host shell only runs on Windows");
    std::process::exit(bootstrap::EXIT_FAILURE);
}
