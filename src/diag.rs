// ── Diagnostics sink ──────────────────────────────────────────────────────────
//
// The debug configuration attaches a console and narrates every bootstrap
// stage; release builds carry a no-op sink instead.  Selecting the sink once
// at construction keeps conditional diagnostics out of the stage code.
//
// Console allocation failing is a soft failure: the sink degrades to
// `Silent` and the bootstrap proceeds unchanged.

/// Where stage markers and failure reports go.
pub(crate) enum DiagSink {
    /// An attached debug console; lines are written to stdout/stderr.
    #[allow(dead_code)] // only constructed by debug Windows builds
    Console,
    /// Diagnostics are dropped.
    Silent,
}

impl DiagSink {
    /// Attach the diagnostics console.
    ///
    /// Debug Windows builds try `AllocConsole`; on success the two fixed
    /// introductory lines are emitted and later markers appear on the
    /// console.  Everywhere else this returns the silent sink.
    pub(crate) fn attach() -> Self {
        #[cfg(all(windows, debug_assertions))]
        {
            if crate::platform::win32::console::attach() {
                let sink = Self::Console;
                sink.note("debug console attached");
                sink.note("vellum shell starting");
                return sink;
            }
        }
        Self::Silent
    }

    /// One-line stage marker.  Observable only; not part of the contract.
    pub(crate) fn note(&self, msg: &str) {
        if let Self::Console = self {
            println!("[vellum] {msg}");
        }
    }

    /// One-line failure report naming the failed stage.
    pub(crate) fn report_failure(&self, msg: &str) {
        if let Self::Console = self {
            eprintln!("[vellum] error: {msg}");
        }
    }

    /// Hold the console open briefly so trailing output stays visible
    /// before the process exits.  No-op for the silent sink.
    pub(crate) fn linger(&self) {
        if let Self::Console = self {
            std::thread::sleep(std::time::Duration::from_secs(1));
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn silent_sink_is_inert() {
        let sink = DiagSink::Silent;
        sink.note("never printed");
        sink.report_failure("never printed");
    }

    #[test]
    fn silent_linger_returns_immediately() {
        let t0 = std::time::Instant::now();
        DiagSink::Silent.linger();
        assert!(t0.elapsed() < std::time::Duration::from_millis(100));
    }
}
