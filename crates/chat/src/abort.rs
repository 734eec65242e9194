//! Cooperative cancellation plumbing.
//!
//! The caller owns an [`AbortController`] per logical conversation turn;
//! the core holds the matching [`AbortSignal`] and checks it between
//! events. [`TurnGate`] enforces the one-controller-per-turn rule:
//! adopting a new controller aborts the previous turn's.

use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};
use tokio::sync::Notify;

#[derive(Debug, Default)]
struct Inner {
    aborted: AtomicBool,
    notify: Notify,
}

/// Caller-side handle that cancels the turn it was handed to.
///
/// Clones share the same signal; aborting any clone aborts all.
#[derive(Clone, Debug, Default)]
pub struct AbortController {
    inner: Arc<Inner>,
}

impl AbortController {
    /// Create a fresh controller.
    pub fn new() -> Self {
        Self::default()
    }

    /// The signal the core watches.
    pub fn signal(&self) -> AbortSignal {
        AbortSignal {
            inner: self.inner.clone(),
        }
    }

    /// Fire the signal. Idempotent.
    pub fn abort(&self) {
        self.inner.aborted.store(true, Ordering::Release);
        self.inner.notify.notify_waiters();
    }

    /// Whether the signal has fired.
    pub fn is_aborted(&self) -> bool {
        self.inner.aborted.load(Ordering::Acquire)
    }

    fn same(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

/// Core-side view of an [`AbortController`].
///
/// The default signal is inert; it never fires. Used for calls that are
/// not tied to a turn, such as title summarization.
#[derive(Clone, Debug, Default)]
pub struct AbortSignal {
    inner: Arc<Inner>,
}

impl AbortSignal {
    /// Whether the controller has fired.
    pub fn is_aborted(&self) -> bool {
        self.inner.aborted.load(Ordering::Acquire)
    }

    /// Resolve once the controller fires.
    pub async fn cancelled(&self) {
        loop {
            // Register before checking so an abort between the check and
            // the await cannot be missed.
            let notified = self.inner.notify.notified();
            if self.is_aborted() {
                return;
            }
            notified.await;
        }
    }
}

/// One live controller per logical conversation turn.
///
/// History is only ever mutated by the single active turn; the gate is
/// what enforces that, not a lock.
#[derive(Debug, Default)]
pub struct TurnGate {
    active: Option<AbortController>,
}

impl TurnGate {
    /// Adopt the controller for a new turn, aborting the previous turn's
    /// controller if it is a different one.
    pub fn adopt(&mut self, controller: &AbortController) -> AbortSignal {
        if let Some(prev) = self.active.replace(controller.clone())
            && !prev.same(controller)
        {
            prev.abort();
        }
        controller.signal()
    }

    /// Abort the active turn, if any.
    pub fn abort_active(&mut self) {
        if let Some(controller) = self.active.take() {
            controller.abort();
        }
    }
}
