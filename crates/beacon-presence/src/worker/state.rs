//! Worker activation state machine.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use beacon_common::{HostLifecycle, ListenerId};
use tracing::{debug, info};

/// Activation state of a [`PresenceWorker`]. Never moves backwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerState {
    Uninitialized,
    /// Waiting for the host's ready signal.
    PendingReady,
    Initialized,
}

/// The background routine a worker starts.
pub trait WorkerRoutine: Send + Sync {
    /// Start the routine. Called at most once per worker.
    fn initialize(self: Arc<Self>);
}

pub struct PresenceWorker {
    routine: Arc<dyn WorkerRoutine>,
    state: Mutex<WorkerState>,
    listener: Mutex<Option<(HostLifecycle, ListenerId)>>,
}

impl PresenceWorker {
    pub fn new(routine: Arc<dyn WorkerRoutine>) -> Arc<Self> {
        Arc::new(Self {
            routine,
            state: Mutex::new(WorkerState::Uninitialized),
            listener: Mutex::new(None),
        })
    }

    pub fn state(&self) -> WorkerState {
        *lock(&self.state)
    }

    /// Start the routine now if the host is ready or `auto_init` is set;
    /// otherwise wait for the host's ready signal.
    ///
    /// Repeated calls are no-ops once the worker is pending or initialized.
    pub fn initialize_worker(self: &Arc<Self>, host: &HostLifecycle, auto_init: bool) -> WorkerState {
        if auto_init || host.is_ready() {
            self.activate();
            return self.state();
        }

        if !self.transition(|s| s == WorkerState::Uninitialized, WorkerState::PendingReady) {
            return self.state();
        }

        debug!("presence worker waiting for host ready");
        let worker: Weak<Self> = Arc::downgrade(self);
        // Runs inline if the host became ready since the check above, so
        // no lock may be held here.
        let id = host.once_ready(move || {
            if let Some(worker) = worker.upgrade() {
                worker.on_host_ready();
            }
        });

        if let Some(id) = id {
            *lock(&self.listener) = Some((host.clone(), id));
            // Ready may have fired on another thread before the id was stored.
            if self.state() == WorkerState::Initialized {
                self.deregister();
            }
        }

        self.state()
    }

    /// Start the routine unless it already started. Returns `true` if this
    /// call started it.
    pub fn activate(&self) -> bool {
        if !self.transition(|s| s != WorkerState::Initialized, WorkerState::Initialized) {
            return false;
        }
        self.deregister();
        self.start_routine();
        true
    }

    /// Host readiness callback. Only acts while pending; duplicate
    /// firings are ignored.
    pub fn on_host_ready(&self) {
        if !self.transition(|s| s == WorkerState::PendingReady, WorkerState::Initialized) {
            debug!(state = ?self.state(), "ignoring host ready");
            return;
        }
        self.deregister();
        self.start_routine();
    }

    /// Move to `to` if the current state satisfies `allowed`.
    fn transition(&self, allowed: impl Fn(WorkerState) -> bool, to: WorkerState) -> bool {
        let mut state = lock(&self.state);
        if !allowed(*state) {
            return false;
        }
        *state = to;
        true
    }

    fn deregister(&self) {
        if let Some((host, id)) = lock(&self.listener).take() {
            host.off(id);
        }
    }

    fn start_routine(&self) {
        info!("initializing presence worker");
        Arc::clone(&self.routine).initialize();
    }
}

impl std::fmt::Debug for PresenceWorker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PresenceWorker")
            .field("state", &self.state())
            .finish()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct CountingRoutine {
        calls: AtomicUsize,
    }

    impl CountingRoutine {
        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl WorkerRoutine for CountingRoutine {
        fn initialize(self: Arc<Self>) {
            self.calls.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn setup() -> (Arc<CountingRoutine>, Arc<PresenceWorker>, HostLifecycle) {
        let routine = Arc::new(CountingRoutine::default());
        let worker = PresenceWorker::new(routine.clone());
        (routine, worker, HostLifecycle::new())
    }

    #[test]
    fn starts_uninitialized() {
        let (routine, worker, _) = setup();
        assert_eq!(worker.state(), WorkerState::Uninitialized);
        assert_eq!(routine.calls(), 0);
    }

    #[test]
    fn ready_host_initializes_immediately() {
        let (routine, worker, host) = setup();
        host.trigger_ready();

        let state = worker.initialize_worker(&host, false);
        assert_eq!(state, WorkerState::Initialized);
        assert_eq!(routine.calls(), 1);
    }

    #[test]
    fn auto_init_skips_readiness_gate() {
        let (routine, worker, host) = setup();

        let state = worker.initialize_worker(&host, true);
        assert_eq!(state, WorkerState::Initialized);
        assert_eq!(routine.calls(), 1);
    }

    #[test]
    fn waits_for_ready_then_initializes_once() {
        let (routine, worker, host) = setup();

        let state = worker.initialize_worker(&host, false);
        assert_eq!(state, WorkerState::PendingReady);
        assert_eq!(routine.calls(), 0);

        host.trigger_ready();
        assert_eq!(worker.state(), WorkerState::Initialized);
        assert_eq!(routine.calls(), 1);

        host.trigger_ready();
        assert_eq!(routine.calls(), 1);
    }

    #[test]
    fn duplicate_ready_callbacks_are_ignored() {
        let (routine, worker, host) = setup();
        worker.initialize_worker(&host, false);

        worker.on_host_ready();
        worker.on_host_ready();
        assert_eq!(routine.calls(), 1);
    }

    #[test]
    fn ready_before_initialize_call_does_nothing() {
        let (routine, worker, _) = setup();
        worker.on_host_ready();
        assert_eq!(worker.state(), WorkerState::Uninitialized);
        assert_eq!(routine.calls(), 0);
    }

    #[test]
    fn repeated_initialize_while_pending_registers_one_listener() {
        let (routine, worker, host) = setup();

        assert_eq!(worker.initialize_worker(&host, false), WorkerState::PendingReady);
        assert_eq!(worker.initialize_worker(&host, false), WorkerState::PendingReady);

        host.trigger_ready();
        assert_eq!(routine.calls(), 1);
    }

    #[test]
    fn initialize_after_initialized_is_noop() {
        let (routine, worker, host) = setup();
        host.trigger_ready();

        worker.initialize_worker(&host, false);
        worker.initialize_worker(&host, true);
        worker.initialize_worker(&host, false);
        assert_eq!(routine.calls(), 1);
    }

    #[test]
    fn listener_is_deregistered_after_ready() {
        let (_, worker, host) = setup();
        worker.initialize_worker(&host, false);
        assert!(lock(&worker.listener).is_some());

        host.trigger_ready();
        assert!(lock(&worker.listener).is_none());
    }

    #[test]
    fn activate_while_pending_deregisters_listener() {
        let (routine, worker, host) = setup();
        worker.initialize_worker(&host, false);

        assert!(worker.activate());
        assert!(!worker.activate());
        assert!(lock(&worker.listener).is_none());

        host.trigger_ready();
        assert_eq!(routine.calls(), 1);
    }

    #[test]
    fn dropped_worker_ignores_ready() {
        let (routine, worker, host) = setup();
        worker.initialize_worker(&host, false);
        drop(worker);

        host.trigger_ready();
        assert_eq!(routine.calls(), 0);
    }
}
