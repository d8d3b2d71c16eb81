//! Ctrl-C handling shared by the CLI and interactive subprocesses.

use std::sync::atomic::{AtomicUsize, Ordering};

use anyhow::{Context, Result};

static SUSPENDED: AtomicUsize = AtomicUsize::new(0);

/// Installs a process-wide Ctrl-C handler.
///
/// `on_interrupt` runs unless an interactive child currently owns the
/// terminal, in which case the signal is left to the child.
///
/// # Errors
/// Returns an error when a handler is already installed.
pub fn install_interrupt_handler<F>(mut on_interrupt: F) -> Result<()>
where
    F: FnMut() + Send + 'static,
{
    ctrlc::set_handler(move || {
        if interrupts_suspended() {
            tracing::debug!("interrupt forwarded to interactive child");
            return;
        }
        on_interrupt();
    })
    .context("failed to set Ctrl+C handler")
}

#[must_use]
pub fn interrupts_suspended() -> bool {
    SUSPENDED.load(Ordering::SeqCst) > 0
}

pub(crate) struct InterruptSuspendGuard;

impl InterruptSuspendGuard {
    pub(crate) fn new() -> Self {
        SUSPENDED.fetch_add(1, Ordering::SeqCst);
        Self
    }
}

impl Drop for InterruptSuspendGuard {
    fn drop(&mut self) {
        SUSPENDED.fetch_sub(1, Ordering::SeqCst);
    }
}
