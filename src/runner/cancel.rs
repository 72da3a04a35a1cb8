//! Cooperative cancellation.
//!
//! SIGINT sets a process-wide flag. Long waits sleep in short slices and
//! check the flag between slices, so an interrupt is observed promptly and
//! the run can still seal and report what it has.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

static INTERRUPTED: AtomicBool = AtomicBool::new(false);

/// Longest uninterrupted sleep inside [`CancelFlag::sleep`].
pub const SLEEP_SLICE: Duration = Duration::from_millis(100);

#[cfg(unix)]
extern "C" fn on_interrupt(_signal: libc::c_int) {
    INTERRUPTED.store(true, Ordering::SeqCst);
}

/// Install the SIGINT handler. Safe to call more than once.
pub fn install_interrupt_handler() {
    #[cfg(unix)]
    {
        let handler = on_interrupt as extern "C" fn(libc::c_int);
        // SAFETY: the handler only stores to an atomic, which is async-signal-safe.
        unsafe {
            libc::signal(libc::SIGINT, handler as libc::sighandler_t);
        }
        tracing::debug!("Installed SIGINT handler");
    }
}

/// Shared cancellation flag for one provisioning run.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag {
    cancelled: Arc<AtomicBool>,
    watch_signal: bool,
}

impl CancelFlag {
    /// A flag that is only cancelled through [`CancelFlag::cancel`].
    pub fn new() -> Self {
        Self::default()
    }

    /// A flag that also trips on SIGINT. Installs the handler.
    pub fn with_interrupt() -> Self {
        install_interrupt_handler();
        Self {
            cancelled: Arc::new(AtomicBool::new(false)),
            watch_signal: true,
        }
    }

    /// Request cancellation.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    /// Whether cancellation was requested.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
            || (self.watch_signal && INTERRUPTED.load(Ordering::SeqCst))
    }

    /// Sleep for `duration` unless cancelled first.
    ///
    /// Returns `false` if the sleep was cut short by cancellation.
    pub fn sleep(&self, duration: Duration) -> bool {
        let deadline = Instant::now() + duration;
        loop {
            if self.is_cancelled() {
                return false;
            }
            let now = Instant::now();
            if now >= deadline {
                return true;
            }
            std::thread::sleep(SLEEP_SLICE.min(deadline - now));
        }
    }
}
