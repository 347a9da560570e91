// ── Central error type ────────────────────────────────────────────────────────
//
// All fallible operations in the shell return `error::Result<T>`.  No panics
// in production paths; failures surface as a diagnostic line (debug builds)
// and a failure exit code from the bootstrap.

/// Every error the host shell can produce.
#[derive(Debug)]
pub enum ShellError {
    /// A Win32 API call returned a failure code.
    Win32 {
        /// The name of the failing function, for display purposes.
        function: &'static str,
        /// The raw Win32 error code (`GetLastError()` value) or HRESULT.
        code: u32,
    },

    /// The embedded engine library misbehaved at the hosting boundary.
    Engine {
        /// What the engine failed to do.
        detail: &'static str,
    },
}

impl std::fmt::Display for ShellError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Win32 { function, code } => {
                write!(f, "{function} failed (error {code:#010x})")
            }
            Self::Engine { detail } => write!(f, "engine error: {detail}"),
        }
    }
}

impl std::error::Error for ShellError {}

// Convert a windows-crate error (HRESULT) directly into a ShellError so that
// `?` can be used on `windows::core::Result<T>` throughout the FFI modules.
#[cfg(windows)]
impl From<windows::core::Error> for ShellError {
    fn from(e: windows::core::Error) -> Self {
        // HRESULT.0 is i32; reinterpret bits as u32 for display purposes.
        // Win32 errors appear as 0x8007xxxx HRESULTs.
        Self::Win32 {
            function: "windows",
            code: e.code().0 as u32,
        }
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ShellError>;

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn win32_display_names_function_and_code() {
        let e = ShellError::Win32 {
            function: "CreateWindowExW",
            code: 0x8007_0057,
        };
        assert_eq!(e.to_string(), "CreateWindowExW failed (error 0x80070057)");
    }

    #[test]
    fn engine_display_carries_detail() {
        let e = ShellError::Engine {
            detail: "view creation returned a null handle",
        };
        assert_eq!(
            e.to_string(),
            "engine error: view creation returned a null handle"
        );
    }
}
