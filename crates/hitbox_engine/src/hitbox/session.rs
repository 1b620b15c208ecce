//! Restartable per-tick hitbox sessions
//!
//! A [`HitboxSession`] is a cheap, cloneable handle. Gameplay code configures
//! it, calls [`HitboxSession::start`] to schedule a tick task, and receives
//! hits through push callbacks or by blocking in [`HitboxSession::wait`] from
//! another thread. The task snapshots the configuration at start, so editing
//! the settings only affects the next run.
//!
//! Every callback receives a slice of entities. In single-hit mode that slice
//! is the one terminal hit; otherwise each newly discovered entity is
//! delivered in its own call.

use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Weak};
use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex};

use crate::ecs::EntityId;
use crate::error::ConfigurationError;
use crate::schedule::{TaskId, TaskStatus, TickContext, TickScheduler, TickTask};
use crate::spatial::World;

use super::hit_filter::Detection;
use super::instant::HitboxQuery;
use super::settings::HitboxSettings;

/// Push callback invoked with newly detected entities
pub type HitCallback = Box<dyn FnMut(&[EntityId]) + Send>;

#[derive(Debug, Default)]
struct SessionState {
    settings: HitboxSettings,
    running: bool,
    generation: u64,
    task: Option<TaskId>,
    hits: Vec<EntityId>,
}

#[derive(Default)]
struct SessionShared {
    state: Mutex<SessionState>,
    hit_signal: Condvar,
    callbacks: Mutex<Vec<HitCallback>>,
}

impl SessionShared {
    fn is_current(&self, generation: u64) -> bool {
        let state = self.state.lock();
        state.running && state.generation == generation
    }

    /// Merge one tick's detection into the hit list
    fn record(&self, generation: u64, detection: Detection) -> TaskStatus {
        let (fresh, status) = {
            let mut state = self.state.lock();
            if state.generation != generation {
                return TaskStatus::Finished;
            }

            let fresh = match detection {
                Detection::Single(Some(entity)) => {
                    state.hits = vec![entity];
                    state.running = false;
                    state.task = None;
                    log::debug!("Single-hit session stopped on {:?}", entity);
                    vec![entity]
                }
                Detection::Single(None) => Vec::new(),
                Detection::Many(found) => {
                    let mut fresh = Vec::new();
                    for entity in found {
                        if !state.hits.contains(&entity) {
                            state.hits.push(entity);
                            fresh.push(entity);
                        }
                    }
                    fresh
                }
            };

            if !fresh.is_empty() {
                self.hit_signal.notify_all();
            }
            let status = if state.running {
                TaskStatus::Pending
            } else {
                TaskStatus::Finished
            };
            (fresh, status)
        };

        for entity in fresh {
            self.dispatch(&[entity]);
        }
        status
    }

    /// Run every callback with the registry unlocked
    ///
    /// Callbacks registered while dispatching are kept and first run on the
    /// next dispatch.
    fn dispatch(&self, hits: &[EntityId]) {
        let mut active = std::mem::take(&mut *self.callbacks.lock());
        for (index, callback) in active.iter_mut().enumerate() {
            if panic::catch_unwind(AssertUnwindSafe(|| callback(hits))).is_err() {
                log::error!("Hit callback #{} panicked, continuing with the rest", index);
            }
        }

        let mut callbacks = self.callbacks.lock();
        let registered = std::mem::replace(&mut *callbacks, active);
        callbacks.extend(registered);
    }
}

/// Tick task driving one run of a session
struct SessionTask {
    shared: Weak<SessionShared>,
    generation: u64,
    query: HitboxQuery,
}

impl TickTask for SessionTask {
    fn name(&self) -> &str {
        "hitbox session"
    }

    fn tick(&mut self, world: &dyn World, context: &mut TickContext<'_>) -> TaskStatus {
        let Some(shared) = self.shared.upgrade() else {
            log::debug!("Hitbox session dropped while running");
            return TaskStatus::Finished;
        };
        if !shared.is_current(self.generation) {
            return TaskStatus::Finished;
        }

        let detection = self
            .query
            .cast(world, context.rules, context.debug.as_deref_mut());
        if detection.is_empty() {
            return TaskStatus::Pending;
        }
        shared.record(self.generation, detection)
    }
}

/// Handle to a stateful, restartable hitbox
///
/// Clones share the same session. Once every handle is dropped, a running
/// session finishes on its next tick.
#[derive(Clone, Default)]
pub struct HitboxSession {
    shared: Arc<SessionShared>,
}

impl HitboxSession {
    /// Create an idle session with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an idle session with the given settings
    pub fn with_settings(settings: HitboxSettings) -> Self {
        let session = Self::new();
        session.shared.state.lock().settings = settings;
        session
    }

    /// Edit the settings used by the next `start`
    pub fn configure(&self, edit: impl FnOnce(&mut HitboxSettings)) {
        edit(&mut self.shared.state.lock().settings);
    }

    /// Copy of the current settings
    pub fn settings(&self) -> HitboxSettings {
        self.shared.state.lock().settings.clone()
    }

    /// Validate the settings and begin querying once per tick
    ///
    /// Starting a running session does nothing and returns the id of the
    /// task already scheduled. Accumulated hits are kept across restarts.
    ///
    /// # Errors
    /// Returns a [`ConfigurationError`] if the settings are contradictory;
    /// the session stays idle and nothing is scheduled.
    pub fn start(&self, scheduler: &mut TickScheduler) -> Result<TaskId, ConfigurationError> {
        let mut state = self.shared.state.lock();
        if let (true, Some(task)) = (state.running, state.task) {
            log::debug!("Hitbox session already running as {:?}", task);
            return Ok(task);
        }

        let query = state.settings.build().map_err(|err| {
            log::warn!("Hitbox session not started: {}", err);
            err
        })?;

        state.generation += 1;
        state.running = true;
        let task = scheduler.spawn(Box::new(SessionTask {
            shared: Arc::downgrade(&self.shared),
            generation: state.generation,
            query,
        }));
        state.task = Some(task);

        log::info!("Hitbox session started ({:?})", task);
        Ok(task)
    }

    /// Stop querying; takes effect before the next tick's query
    pub fn stop(&self) {
        let mut state = self.shared.state.lock();
        if state.running {
            state.running = false;
            state.task = None;
            log::info!("Hitbox session stopped");
        }
    }

    /// Whether the session is querying every tick
    pub fn is_running(&self) -> bool {
        self.shared.state.lock().running
    }

    /// Snapshot of the hits so far, in discovery order
    pub fn hits(&self) -> Vec<EntityId> {
        self.shared.state.lock().hits.clone()
    }

    /// Forget every hit; already-hit entities can be hit again
    pub fn reset_hits(&self) {
        self.shared.state.lock().hits.clear();
    }

    /// Register a push callback
    ///
    /// Callbacks run on the ticking thread with no session lock held, so
    /// they may call `stop`, `hits`, `reset_hits` or `on_hit`. A callback
    /// registered from inside a callback first runs on the next new hit.
    pub fn on_hit(&self, callback: impl FnMut(&[EntityId]) + Send + 'static) {
        self.shared.callbacks.lock().push(Box::new(callback));
    }

    /// Block until at least one hit exists and return the hits
    ///
    /// There is no timeout; a session that never hits blocks forever. Must
    /// not be called from the thread that steps the scheduler.
    pub fn wait(&self) -> Vec<EntityId> {
        let mut state = self.shared.state.lock();
        while state.hits.is_empty() {
            self.shared.hit_signal.wait(&mut state);
        }
        state.hits.clone()
    }

    /// Like [`wait`](Self::wait), giving up after `timeout`
    pub fn wait_timeout(&self, timeout: Duration) -> Option<Vec<EntityId>> {
        let deadline = Instant::now() + timeout;
        let mut state = self.shared.state.lock();
        while state.hits.is_empty() {
            if self.shared.hit_signal.wait_until(&mut state, deadline).timed_out() {
                break;
            }
        }
        (!state.hits.is_empty()).then(|| state.hits.clone())
    }
}

impl std::fmt::Debug for HitboxSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.shared.state.lock();
        f.debug_struct("HitboxSession")
            .field("running", &state.running)
            .field("hits", &state.hits)
            .field("settings", &state.settings)
            .finish()
    }
}
