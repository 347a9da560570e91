// ── Embedded project descriptor ───────────────────────────────────────────────
//
// Pure Rust, no Win32 imports.  Describes where the engine's bundled assets
// live and which startup arguments to hand to its entry point.  The shell
// never interprets the arguments; that is entirely the engine's business.

use std::path::{Path, PathBuf};

/// Relative location of the engine's asset bundle, resolved by the engine
/// against the executable directory.  Compile-time fixed.
pub(crate) const ASSETS_DIR: &str = "data";

/// Everything the embedded engine needs to start: the asset-bundle location
/// and the verbatim startup argument list (process command line minus the
/// executable path).
///
/// Construction cannot fail.
#[derive(Debug, Clone)]
pub(crate) struct EmbeddedProject {
    assets_dir: PathBuf,
    args: Vec<String>,
}

impl EmbeddedProject {
    /// Build a descriptor forwarding `args` unmodified and in order.
    pub(crate) fn new(args: Vec<String>) -> Self {
        Self {
            assets_dir: PathBuf::from(ASSETS_DIR),
            args,
        }
    }

    /// The asset-bundle directory, relative to the executable.
    pub(crate) fn assets_dir(&self) -> &Path {
        &self.assets_dir
    }

    /// Startup arguments for the engine entry point.
    pub(crate) fn args(&self) -> &[String] {
        &self.args
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forwards_single_argument_verbatim() {
        let p = EmbeddedProject::new(vec![r"--journal-dir=C:\data".to_owned()]);
        assert_eq!(p.args(), [r"--journal-dir=C:\data"]);
    }

    #[test]
    fn preserves_argument_order() {
        let p = EmbeddedProject::new(vec![
            "--verbose".to_owned(),
            r"--journal-dir=C:\data".to_owned(),
            "--locale=en-GB".to_owned(),
        ]);
        assert_eq!(
            p.args(),
            ["--verbose", r"--journal-dir=C:\data", "--locale=en-GB"]
        );
    }

    #[test]
    fn empty_command_line_yields_no_arguments() {
        let p = EmbeddedProject::new(Vec::new());
        assert!(p.args().is_empty());
    }

    #[test]
    fn assets_dir_is_the_fixed_bundle_location() {
        let p = EmbeddedProject::new(Vec::new());
        assert_eq!(p.assets_dir(), Path::new("data"));
    }
}
