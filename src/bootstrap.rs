// ── Bootstrap orchestration ───────────────────────────────────────────────────
//
// One linear, single-threaded sequence of stages: harden the process, attach
// diagnostics, initialize the component runtime, build the project
// descriptor, create the host window, pump messages, release the runtime.
// Each stage either succeeds and the next runs, or fails and the process
// exits after releasing whatever was already acquired.
//
// The OS-facing stages sit behind the `Host` trait so the sequencing and
// failure/release ordering can be tested with injected outcomes; the real
// implementation is `platform::win32::Win32Host`.

use crate::diag::DiagSink;
use crate::error::Result;
use crate::project::EmbeddedProject;

/// Exit code for a clean shutdown after the event loop ends normally.
pub(crate) const EXIT_SUCCESS: i32 = 0;

/// Exit code when component-runtime initialization or window creation fails.
pub(crate) const EXIT_FAILURE: i32 = 1;

/// The OS-facing bootstrap stages, in the order `run` invokes them.
pub(crate) trait Host {
    /// Best-effort process hardening (DPI awareness, DLL search path, DEP).
    /// Runs before anything else; has no failure path at this layer.
    fn harden_process(&mut self);

    /// Attach the diagnostics sink.  Console allocation failure downgrades
    /// to the silent sink; it never fails the bootstrap.
    fn attach_diagnostics(&mut self) -> DiagSink;

    /// Initialize the component runtime the engine needs for extension
    /// loading.  On success a matching release call is owed on every
    /// subsequent exit path.
    fn init_component_runtime(&mut self) -> Result<()>;

    /// Release the component runtime.  Must be a no-op if the runtime was
    /// never initialized; must release at most once.
    fn release_component_runtime(&mut self);

    /// Create the single host window with its embedded rendering surface,
    /// visible and with quit-on-close set.
    fn create_host_window(&mut self, project: &EmbeddedProject) -> Result<()>;

    /// Block on the OS message loop until the quit signal posted by closing
    /// the host window.
    fn run_event_loop(&mut self) -> Result<()>;
}

/// Drive the whole bootstrap and return the process exit code.
///
/// `args` is the command line minus the executable path; it is forwarded
/// verbatim to the embedded project descriptor.
pub(crate) fn run<H: Host>(host: &mut H, args: Vec<String>) -> i32 {
    host.harden_process();
    let diag = host.attach_diagnostics();

    diag.note("initializing component runtime");
    if let Err(e) = host.init_component_runtime() {
        diag.report_failure(&format!("component runtime initialization: {e}"));
        return EXIT_FAILURE;
    }
    diag.note("component runtime ready");

    diag.note("building embedded project descriptor");
    let project = EmbeddedProject::new(args);

    diag.note("creating host window");
    if let Err(e) = host.create_host_window(&project) {
        diag.report_failure(&format!("host window creation: {e}"));
        host.release_component_runtime();
        return EXIT_FAILURE;
    }
    diag.note("host window visible");

    diag.note("entering message loop");
    let pumped = host.run_event_loop();
    diag.note("message loop ended");

    // The release is owed on every path past initialization, including a
    // failing message loop.
    host.release_component_runtime();
    diag.note("component runtime released");

    match pumped {
        Ok(()) => {
            diag.note("shutting down");
            diag.linger();
            EXIT_SUCCESS
        }
        Err(e) => {
            diag.report_failure(&format!("message loop: {e}"));
            EXIT_FAILURE
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ShellError;

    /// Scripted host: records the stage order and fails where told to.
    struct FakeHost {
        fail_runtime: bool,
        fail_window: bool,
        fail_loop: bool,
        calls: Vec<&'static str>,
        runtime_initialized: bool,
        runtime_releases: usize,
        window_created: bool,
        window_args: Vec<String>,
    }

    impl FakeHost {
        fn new() -> Self {
            Self {
                fail_runtime: false,
                fail_window: false,
                fail_loop: false,
                calls: Vec::new(),
                runtime_initialized: false,
                runtime_releases: 0,
                window_created: false,
                window_args: Vec::new(),
            }
        }
    }

    fn injected(function: &'static str) -> ShellError {
        ShellError::Win32 {
            function,
            code: 0xDEAD_BEEF,
        }
    }

    impl Host for FakeHost {
        fn harden_process(&mut self) {
            self.calls.push("harden");
        }

        fn attach_diagnostics(&mut self) -> DiagSink {
            self.calls.push("diagnostics");
            DiagSink::Silent
        }

        fn init_component_runtime(&mut self) -> Result<()> {
            self.calls.push("init_runtime");
            if self.fail_runtime {
                return Err(injected("CoInitializeEx"));
            }
            self.runtime_initialized = true;
            Ok(())
        }

        fn release_component_runtime(&mut self) {
            self.calls.push("release_runtime");
            assert!(
                self.runtime_initialized,
                "released a runtime that was never initialized"
            );
            self.runtime_releases += 1;
        }

        fn create_host_window(&mut self, project: &EmbeddedProject) -> Result<()> {
            self.calls.push("create_window");
            if self.fail_window {
                return Err(injected("CreateWindowExW"));
            }
            self.window_created = true;
            self.window_args = project.args().to_vec();
            Ok(())
        }

        fn run_event_loop(&mut self) -> Result<()> {
            self.calls.push("event_loop");
            if self.fail_loop {
                return Err(injected("GetMessageW"));
            }
            Ok(())
        }
    }

    #[test]
    fn stages_run_in_order_on_the_clean_path() {
        let mut host = FakeHost::new();
        let code = run(&mut host, Vec::new());
        assert_eq!(code, EXIT_SUCCESS);
        assert_eq!(
            host.calls,
            [
                "harden",
                "diagnostics",
                "init_runtime",
                "create_window",
                "event_loop",
                "release_runtime",
            ]
        );
    }

    #[test]
    fn runtime_init_failure_exits_without_window_or_release() {
        let mut host = FakeHost::new();
        host.fail_runtime = true;
        let code = run(&mut host, Vec::new());
        assert_eq!(code, EXIT_FAILURE);
        assert!(!host.window_created);
        assert_eq!(host.runtime_releases, 0);
        assert!(!host.calls.contains(&"create_window"));
    }

    #[test]
    fn window_failure_releases_runtime_exactly_once() {
        let mut host = FakeHost::new();
        host.fail_window = true;
        let code = run(&mut host, Vec::new());
        assert_eq!(code, EXIT_FAILURE);
        assert_eq!(host.runtime_releases, 1);
        assert!(!host.calls.contains(&"event_loop"));
    }

    #[test]
    fn clean_window_close_releases_runtime_and_succeeds() {
        let mut host = FakeHost::new();
        let code = run(&mut host, Vec::new());
        assert_eq!(code, EXIT_SUCCESS);
        assert_eq!(host.runtime_releases, 1);
    }

    #[test]
    fn event_loop_failure_still_releases_runtime() {
        let mut host = FakeHost::new();
        host.fail_loop = true;
        let code = run(&mut host, Vec::new());
        assert_eq!(code, EXIT_FAILURE);
        assert_eq!(host.runtime_releases, 1);
    }

    #[test]
    fn command_line_arguments_reach_the_window_stage_verbatim() {
        let mut host = FakeHost::new();
        let code = run(
            &mut host,
            vec![r"--journal-dir=C:\data".to_owned(), "--verbose".to_owned()],
        );
        assert_eq!(code, EXIT_SUCCESS);
        assert_eq!(host.window_args, [r"--journal-dir=C:\data", "--verbose"]);
    }
}
