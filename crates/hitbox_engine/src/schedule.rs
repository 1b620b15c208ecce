//! Tick Scheduling
//!
//! Every periodic piece of hit detection (running sessions, detached limb
//! detectors) is a [`TickTask`] owned by a [`TickScheduler`]. The host calls
//! [`TickScheduler::step`] once per simulation frame; tasks run one after the
//! other in spawn order and never preempt each other mid-query.

use crate::config::HitboxRules;
use crate::debug::DebugDraw;
use crate::foundation::time::TickClock;
use crate::spatial::World;

/// Unique identifier for scheduled tasks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(pub u64);

/// What a task wants after running for one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskStatus {
    /// Run again next tick
    Pending,
    /// Drop the task
    Finished,
}

/// Per-tick inputs shared by every task
pub struct TickContext<'a> {
    /// Clock after advancing for this tick
    pub clock: TickClock,
    /// Gameplay rules
    pub rules: &'a HitboxRules,
    /// Debug draw queue, present only while debug mode is on
    pub debug: Option<&'a mut DebugDraw>,
}

/// Cooperative unit of periodic work
pub trait TickTask: Send {
    /// Short label for logging
    fn name(&self) -> &str;

    /// Run one tick's worth of work
    fn tick(&mut self, world: &dyn World, context: &mut TickContext<'_>) -> TaskStatus;
}

struct ScheduledTask {
    id: TaskId,
    task: Box<dyn TickTask>,
}

/// Owner of every live tick task
pub struct TickScheduler {
    tasks: Vec<ScheduledTask>,
    clock: TickClock,
    next_id: u64,
}

impl TickScheduler {
    /// Create an empty scheduler
    pub fn new() -> Self {
        Self {
            tasks: Vec::new(),
            clock: TickClock::new(),
            next_id: 0,
        }
    }

    /// Register a task; it first runs on the next `step`
    pub fn spawn(&mut self, task: Box<dyn TickTask>) -> TaskId {
        let id = TaskId(self.next_id);
        self.next_id += 1;
        log::debug!("Scheduled task '{}' as {:?}", task.name(), id);
        self.tasks.push(ScheduledTask { id, task });
        id
    }

    /// Drop a task before it finishes on its own
    pub fn cancel(&mut self, id: TaskId) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|scheduled| scheduled.id != id);
        before != self.tasks.len()
    }

    /// Whether a task is still scheduled
    pub fn is_scheduled(&self, id: TaskId) -> bool {
        self.tasks.iter().any(|scheduled| scheduled.id == id)
    }

    /// Number of live tasks
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Whether no task is scheduled
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Clock as of the last step
    pub fn clock(&self) -> &TickClock {
        &self.clock
    }

    /// Advance the clock and run every task once
    ///
    /// Finished tasks are dropped. Returns how many tasks are still live.
    pub fn step(
        &mut self,
        world: &dyn World,
        delta_time: f32,
        rules: &HitboxRules,
        mut debug: Option<&mut DebugDraw>,
    ) -> usize {
        self.clock.advance(delta_time);
        let clock = self.clock;

        self.tasks.retain_mut(|scheduled| {
            let mut context = TickContext {
                clock,
                rules,
                debug: debug.as_deref_mut(),
            };
            match scheduled.task.tick(world, &mut context) {
                TaskStatus::Pending => true,
                TaskStatus::Finished => {
                    log::debug!("Task '{}' ({:?}) finished", scheduled.task.name(), scheduled.id);
                    false
                }
            }
        });

        self.tasks.len()
    }
}

impl Default for TickScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for TickScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TickScheduler")
            .field("tasks", &self.tasks.len())
            .field("clock", &self.clock)
            .finish()
    }
}
