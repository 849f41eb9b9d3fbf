//! Cooperative stop flag raised by SIGINT or SIGTERM.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

use tracing::info;

use crate::error::{FirewallError, Result};

#[derive(Debug, Clone, Default)]
pub struct Shutdown {
    requested: Arc<AtomicBool>,
}

impl Shutdown {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request(&self) {
        self.requested.store(true, Ordering::SeqCst);
    }

    pub fn is_requested(&self) -> bool {
        self.requested.load(Ordering::SeqCst)
    }

    /// Routes SIGINT and SIGTERM to this flag.
    ///
    /// Must run on the main thread before any other thread is spawned: the
    /// signals are blocked here so every later thread inherits the mask,
    /// and a dedicated thread collects them with `sigwait`.
    pub fn install_signal_handler(&self) -> Result<()> {
        // SAFETY: sigset_t is plain data, zero is a valid starting value and
        // is reinitialised by sigemptyset before use.
        let mask = unsafe {
            let mut mask: libc::sigset_t = std::mem::zeroed();
            libc::sigemptyset(&mut mask);
            libc::sigaddset(&mut mask, libc::SIGINT);
            libc::sigaddset(&mut mask, libc::SIGTERM);

            let rc = libc::pthread_sigmask(libc::SIG_BLOCK, &mask, std::ptr::null_mut());
            if rc != 0 {
                return Err(FirewallError::Signal(format!(
                    "pthread_sigmask failed with code {}",
                    rc
                )));
            }
            mask
        };

        let requested = Arc::clone(&self.requested);
        thread::Builder::new()
            .name("signal-wait".to_string())
            .spawn(move || {
                let mut sig: libc::c_int = 0;
                loop {
                    // SAFETY: mask was initialised above and outlives the call.
                    if unsafe { libc::sigwait(&mask, &mut sig) } == 0 {
                        info!(signal = sig, "Shutdown signal received");
                        requested.store(true, Ordering::SeqCst);
                        break;
                    }
                }
            })
            .map_err(|e| FirewallError::Signal(e.to_string()))?;

        Ok(())
    }
}
