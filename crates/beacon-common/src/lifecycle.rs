//! Host readiness signal.
//!
//! The hosting client flips readiness exactly once per session via
//! [`HostLifecycle::trigger_ready`]. Components that must not start before
//! that point either check [`HostLifecycle::is_ready`] or register a
//! one-shot listener with [`HostLifecycle::once_ready`].

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::watch;
use tracing::debug;

type Listener = Box<dyn FnOnce() + Send + 'static>;

/// Handle returned by [`HostLifecycle::once_ready`], used to deregister.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

#[derive(Default)]
struct Listeners {
    pending: Vec<(ListenerId, Listener)>,
    next_id: u64,
}

/// Cloneable readiness handle shared between the host and its plugins.
#[derive(Clone)]
pub struct HostLifecycle {
    listeners: Arc<Mutex<Listeners>>,
    ready: Arc<watch::Sender<bool>>,
}

impl HostLifecycle {
    pub fn new() -> Self {
        let (ready, _) = watch::channel(false);
        Self {
            listeners: Arc::new(Mutex::new(Listeners::default())),
            ready: Arc::new(ready),
        }
    }

    /// Whether the host has finished startup.
    pub fn is_ready(&self) -> bool {
        *self.ready.borrow()
    }

    /// Register a listener that runs once when the host becomes ready.
    ///
    /// If the host is already ready the listener runs immediately on the
    /// calling thread and `None` is returned.
    pub fn once_ready<F>(&self, listener: F) -> Option<ListenerId>
    where
        F: FnOnce() + Send + 'static,
    {
        let mut listeners = self.lock();
        if self.is_ready() {
            drop(listeners);
            listener();
            return None;
        }
        let id = ListenerId(listeners.next_id);
        listeners.next_id += 1;
        listeners.pending.push((id, Box::new(listener)));
        Some(id)
    }

    /// Remove a listener that has not fired yet. Returns `false` if it
    /// already ran or was never registered.
    pub fn off(&self, id: ListenerId) -> bool {
        let mut listeners = self.lock();
        let before = listeners.pending.len();
        listeners.pending.retain(|(lid, _)| *lid != id);
        listeners.pending.len() != before
    }

    /// Mark the host ready and run every pending listener.
    ///
    /// Listeners are removed before they run, so firing again only
    /// affects listeners registered in between (there are none once the
    /// host is ready, since late registrations run immediately).
    pub fn trigger_ready(&self) {
        let pending = {
            let mut listeners = self.lock();
            let was_ready = self.ready.send_replace(true);
            if was_ready {
                debug!("host ready fired again");
            }
            std::mem::take(&mut listeners.pending)
        };

        debug!(listeners = pending.len(), "host ready");
        for (_, listener) in pending {
            listener();
        }
    }

    /// Wait until the host is ready. Returns immediately if it already is.
    pub async fn wait_ready(&self) {
        let mut rx = self.ready.subscribe();
        // The sender lives as long as `self`, so this cannot fail.
        let _ = rx.wait_for(|ready| *ready).await;
    }

    fn lock(&self) -> MutexGuard<'_, Listeners> {
        self.listeners.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for HostLifecycle {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for HostLifecycle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HostLifecycle")
            .field("ready", &self.is_ready())
            .field("pending_listeners", &self.lock().pending.len())
            .finish()
    }
}
