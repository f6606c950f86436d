//! # Notification Bus
//!
//! Synchronous fan-out of registry change events to registered
//! listeners. Listeners are invoked after the mutating call has
//! committed and after the registry's state lock has been released, so a
//! listener may call back into the registry.
//!
//! A panicking listener is isolated: the panic is caught, logged, and
//! the remaining listeners still run.

use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

/// What changed. Carried for logging; listeners that care about specific
/// accounts re-query the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistryEvent {
    AccountsChanged,
    DefaultOutgoingChanged,
    SimCallManagerChanged,
}

/// Observer of registry mutations. Every method has an empty default
/// body so implementors override only what they watch.
pub trait RegistryListener: Send + Sync {
    fn on_accounts_changed(&self) {}
    fn on_default_outgoing_changed(&self) {}
    fn on_sim_call_manager_changed(&self) {}
}

/// Listener registry. Dispatch snapshots the listener list before
/// iterating, so a listener may add or remove listeners (including
/// itself) from inside a callback without deadlocking.
#[derive(Default)]
pub struct NotificationBus {
    listeners: Mutex<Vec<Arc<dyn RegistryListener>>>,
    dispatched: AtomicU64,
}

impl NotificationBus {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_listener(&self, listener: Arc<dyn RegistryListener>) {
        self.lock().push(listener);
    }

    /// Remove a previously added listener, matched by pointer identity.
    pub fn remove_listener(&self, listener: &Arc<dyn RegistryListener>) {
        self.lock().retain(|l| !Arc::ptr_eq(l, listener));
    }

    /// Number of listener callbacks dispatched so far, panicking ones
    /// included.
    #[must_use]
    pub fn dispatched(&self) -> u64 {
        self.dispatched.load(Ordering::Relaxed)
    }

    pub fn notify(&self, event: RegistryEvent) {
        let snapshot: Vec<Arc<dyn RegistryListener>> = self.lock().clone();
        tracing::debug!(
            "[tc-reg] notifying {} listener(s) of {event:?}",
            snapshot.len()
        );
        for listener in snapshot {
            self.dispatched.fetch_add(1, Ordering::Relaxed);
            let outcome = panic::catch_unwind(AssertUnwindSafe(|| match event {
                RegistryEvent::AccountsChanged => listener.on_accounts_changed(),
                RegistryEvent::DefaultOutgoingChanged => listener.on_default_outgoing_changed(),
                RegistryEvent::SimCallManagerChanged => listener.on_sim_call_manager_changed(),
            }));
            if outcome.is_err() {
                tracing::warn!("[tc-reg] listener panicked handling {event:?}; continuing");
            }
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<Arc<dyn RegistryListener>>> {
        self.listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}
