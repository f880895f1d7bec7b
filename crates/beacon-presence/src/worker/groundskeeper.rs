//! Periodic upkeep of watched presences.
//!
//! Keeps a reference-counted watch list, renews subscriptions before the
//! service expires them, caches the latest presence per person, and drops
//! cached entries once nobody watches them.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use beacon_common::{EventBus, PersonId, PresenceEvent};
use tokio::sync::broadcast;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::error::PresenceResult;
use crate::presence::{BatchSubscriptionManager, PresenceOptions, StatusRecord};

use super::state::WorkerRoutine;

/// Shortest period between upkeep passes.
const MIN_INTERVAL: Duration = Duration::from_secs(1);

/// Furthest ahead any renewal deadline is placed.
const MAX_HORIZON: Duration = Duration::from_secs(100 * 365 * 24 * 60 * 60);

#[derive(Debug, Clone)]
pub struct GroundskeeperOptions {
    pub interval: Duration,
    pub subscription_ttl: Duration,
    pub renew_margin: Duration,
    pub event_capacity: usize,
}

impl From<&PresenceOptions> for GroundskeeperOptions {
    fn from(options: &PresenceOptions) -> Self {
        Self {
            interval: options.groundskeeper_interval,
            subscription_ttl: options.subscription_ttl,
            renew_margin: options.renew_margin,
            event_capacity: options.event_capacity,
        }
    }
}

#[derive(Default)]
struct Roster {
    /// Watch reference counts.
    watchers: HashMap<PersonId, usize>,
    /// When each active subscription expires on the service.
    subscriptions: HashMap<PersonId, Instant>,
    presences: HashMap<PersonId, StatusRecord>,
}

pub struct Groundskeeper {
    batch: Arc<BatchSubscriptionManager>,
    options: GroundskeeperOptions,
    events: EventBus,
    roster: Mutex<Roster>,
    shutdown: CancellationToken,
    running: AtomicBool,
}

impl Groundskeeper {
    /// Intervals shorter than one second are raised to one second.
    pub fn new(
        batch: Arc<BatchSubscriptionManager>,
        mut options: GroundskeeperOptions,
    ) -> Arc<Self> {
        options.interval = options.interval.max(MIN_INTERVAL);
        Arc::new(Self {
            batch,
            events: EventBus::new(options.event_capacity.max(1)),
            options,
            roster: Mutex::new(Roster::default()),
            shutdown: CancellationToken::new(),
            running: AtomicBool::new(false),
        })
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<PresenceEvent> {
        self.events.subscribe()
    }

    /// Add a watch reference. Returns the new count.
    pub fn enqueue(&self, id: PersonId) -> usize {
        let mut roster = self.roster();
        let count = roster.watchers.entry(id).or_insert(0);
        *count += 1;
        *count
    }

    /// Drop a watch reference. Returns the remaining count; at zero the id
    /// is no longer watched.
    pub fn dequeue(&self, id: &PersonId) -> usize {
        let mut roster = self.roster();
        match roster.watchers.get_mut(id) {
            Some(count) if *count > 1 => {
                *count -= 1;
                *count
            }
            Some(_) => {
                roster.watchers.remove(id);
                0
            }
            None => 0,
        }
    }

    pub fn is_watched(&self, id: &PersonId) -> bool {
        self.roster().watchers.contains_key(id)
    }

    pub fn watched(&self) -> Vec<PersonId> {
        let mut ids: Vec<PersonId> = self.roster().watchers.keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Latest cached presence for `id`.
    pub fn presence(&self, id: &PersonId) -> Option<StatusRecord> {
        self.roster().presences.get(id).cloned()
    }

    /// Record an inbound presence and publish it.
    pub fn apply_update(&self, record: StatusRecord) {
        let Some(person_id) = record.person_id() else {
            debug!("dropping presence update without subject");
            return;
        };

        let event = PresenceEvent::Updated {
            person_id: person_id.clone(),
            status: record
                .status
                .as_ref()
                .map(ToString::to_string)
                .unwrap_or_default(),
            last_active: record.last_active.clone(),
        };
        self.roster().presences.insert(person_id, record);
        self.events.publish(event);
    }

    /// One upkeep pass: evict unwatched entries, then renew every watched
    /// subscription that is missing or about to expire.
    ///
    /// Returns the number of subscriptions renewed.
    pub async fn tick(&self) -> PresenceResult<usize> {
        let now = Instant::now();
        let (due, evicted) = {
            let mut roster = self.roster();
            let Roster {
                watchers,
                subscriptions,
                presences,
            } = &mut *roster;

            let mut evicted: Vec<PersonId> = presences
                .keys()
                .filter(|id| !watchers.contains_key(*id))
                .cloned()
                .collect();
            evicted.sort();
            for id in &evicted {
                presences.remove(id);
            }
            subscriptions.retain(|id, _| watchers.contains_key(id));

            let horizon = deadline(now, self.options.renew_margin);
            let mut due: Vec<PersonId> = watchers
                .keys()
                .filter(|id| subscriptions.get(*id).map_or(true, |expires| *expires <= horizon))
                .cloned()
                .collect();
            due.sort();
            (due, evicted)
        };

        for person_id in evicted {
            self.events.publish(PresenceEvent::Evicted { person_id });
        }

        if due.is_empty() {
            return Ok(0);
        }

        debug!(count = due.len(), "renewing presence subscriptions");
        let responses = self
            .batch
            .subscribe(&due, self.options.subscription_ttl)
            .await?;

        let expires = deadline(Instant::now(), self.options.subscription_ttl);
        {
            let mut roster = self.roster();
            for id in &due {
                if roster.watchers.contains_key(id) {
                    roster.subscriptions.insert(id.clone(), expires);
                }
            }
        }

        for status in responses.into_iter().filter_map(|r| r.status) {
            self.apply_update(status);
        }
        Ok(due.len())
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Stop the periodic task.
    pub fn shutdown(&self) {
        self.shutdown.cancel();
    }

    fn roster(&self) -> MutexGuard<'_, Roster> {
        self.roster.lock().unwrap_or_else(PoisonError::into_inner)
    }

    async fn run(self: Arc<Self>) {
        let mut interval = tokio::time::interval(self.options.interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = self.shutdown.cancelled() => break,
                _ = interval.tick() => {
                    if let Err(e) = self.tick().await {
                        warn!(error = %e, "presence renewal failed, retrying next tick");
                    }
                }
            }
        }

        self.running.store(false, Ordering::SeqCst);
        self.events.publish(PresenceEvent::WorkerStopped);
        info!("groundskeeper stopped");
    }
}

impl WorkerRoutine for Groundskeeper {
    fn initialize(self: Arc<Self>) {
        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            warn!("no tokio runtime available, groundskeeper not started");
            return;
        };
        if self.shutdown.is_cancelled() || self.running.swap(true, Ordering::SeqCst) {
            return;
        }

        info!(interval = ?self.options.interval, "groundskeeper started");
        self.events.publish(PresenceEvent::WorkerStarted);
        handle.spawn(self.run());
    }
}

/// `now + after`, capped at [`MAX_HORIZON`].
fn deadline(now: Instant, after: Duration) -> Instant {
    now.checked_add(after.min(MAX_HORIZON)).unwrap_or(now)
}
