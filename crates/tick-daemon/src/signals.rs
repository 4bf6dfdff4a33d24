//! Signal handling for graceful daemon shutdown.
//!
//! SIGTERM and SIGINT request shutdown; SIGHUP requests an immediate
//! metrics report. Signal handlers only flip atomic flags, which the tick
//! loop polls between ticks.

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Arc;
use tracing::{debug, info};

/// Shared state between the signal handlers and the tick loop.
#[derive(Debug)]
pub struct SignalState {
    /// Set when a shutdown signal is received.
    shutdown_requested: AtomicBool,
    /// Set when an on-demand report is requested.
    report_requested: AtomicBool,
    /// Count of signals received (for diagnostics).
    signal_count: AtomicU32,
}

impl Default for SignalState {
    fn default() -> Self {
        Self::new()
    }
}

impl SignalState {
    /// Create a new signal state.
    #[must_use]
    pub fn new() -> Self {
        Self {
            shutdown_requested: AtomicBool::new(false),
            report_requested: AtomicBool::new(false),
            signal_count: AtomicU32::new(0),
        }
    }

    /// Check if shutdown has been requested.
    #[inline]
    #[must_use]
    pub fn shutdown_requested(&self) -> bool {
        self.shutdown_requested.load(Ordering::Relaxed)
    }

    /// Check if a report has been requested (and clear the flag).
    #[inline]
    pub fn take_report_request(&self) -> bool {
        self.report_requested.swap(false, Ordering::Relaxed)
    }

    /// Request shutdown (callable from any thread).
    pub fn request_shutdown(&self) {
        self.shutdown_requested.store(true, Ordering::Relaxed);
    }

    /// Request an on-demand report (callable from any thread).
    pub fn request_report(&self) {
        self.report_requested.store(true, Ordering::Relaxed);
    }

    /// Total signals received so far.
    #[must_use]
    pub fn signal_count(&self) -> u32 {
        self.signal_count.load(Ordering::Relaxed)
    }

    fn record_signal(&self) {
        self.signal_count.fetch_add(1, Ordering::Relaxed);
    }
}

/// Handle for signal management.
#[derive(Clone)]
pub struct SignalHandler {
    state: Arc<SignalState>,
}

impl SignalHandler {
    /// Create a signal handler and register the process signal handlers.
    ///
    /// On Unix this hooks SIGTERM, SIGINT, and SIGHUP. Elsewhere only
    /// manual shutdown requests are supported.
    ///
    /// # Errors
    ///
    /// Returns an error if handler registration fails.
    pub fn new() -> std::io::Result<Self> {
        let handler = Self {
            state: Arc::new(SignalState::new()),
        };

        #[cfg(unix)]
        handler.register_unix_handlers();

        Ok(handler)
    }

    /// Register Unix signal handlers.
    ///
    /// Handlers must be async-signal-safe, so they only touch static
    /// atomics; a poll thread forwards the flags into the shared state.
    #[cfg(unix)]
    fn register_unix_handlers(&self) {
        use std::os::raw::c_int;

        static SHUTDOWN_FLAG: AtomicBool = AtomicBool::new(false);
        static REPORT_FLAG: AtomicBool = AtomicBool::new(false);

        let state = Arc::clone(&self.state);
        std::thread::spawn(move || loop {
            if SHUTDOWN_FLAG.swap(false, Ordering::Relaxed) {
                info!("shutdown signal received");
                state.record_signal();
                state.request_shutdown();
            }
            if REPORT_FLAG.swap(false, Ordering::Relaxed) {
                info!("report signal received");
                state.record_signal();
                state.request_report();
            }
            if state.shutdown_requested() {
                break;
            }
            std::thread::sleep(std::time::Duration::from_millis(10));
        });

        extern "C" fn shutdown_handler(_: c_int) {
            SHUTDOWN_FLAG.store(true, Ordering::Relaxed);
        }

        extern "C" fn report_handler(_: c_int) {
            REPORT_FLAG.store(true, Ordering::Relaxed);
        }

        // SAFETY: the handlers only store to static atomics, which is
        // async-signal-safe, and registration happens before any signal
        // can be observed by this handler.
        unsafe {
            libc::signal(libc::SIGTERM, shutdown_handler as libc::sighandler_t);
            libc::signal(libc::SIGINT, shutdown_handler as libc::sighandler_t);
            libc::signal(libc::SIGHUP, report_handler as libc::sighandler_t);
        }

        debug!("Unix signal handlers registered");
    }

    /// Check if shutdown has been requested.
    #[inline]
    #[must_use]
    pub fn shutdown_requested(&self) -> bool {
        self.state.shutdown_requested()
    }

    /// Check if an on-demand report has been requested (clears the flag).
    #[inline]
    pub fn take_report_request(&self) -> bool {
        self.state.take_report_request()
    }

    /// Manually request shutdown.
    pub fn request_shutdown(&self) {
        info!("manual shutdown requested");
        self.state.request_shutdown();
    }

    /// Access the shared signal state.
    #[must_use]
    pub fn state(&self) -> &SignalState {
        &self.state
    }
}
