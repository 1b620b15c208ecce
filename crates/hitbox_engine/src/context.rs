//! Application-level hit detection context

use crate::config::{Config, HitboxRules, SettingsError};
use crate::debug::{DebugDraw, DebugFlag};
use crate::hitbox::{Detection, HitboxQuery};
use crate::schedule::TickScheduler;
use crate::spatial::World;

/// Owner of the rules, debug state and scheduler
///
/// The host creates one context, hands its scheduler to sessions and limb
/// detectors, and calls [`HitboxContext::step`] once per simulation frame.
#[derive(Debug, Default)]
pub struct HitboxContext {
    /// Gameplay rules
    rules: HitboxRules,

    /// Debug mode switch
    debug: DebugFlag,

    /// Proxy shapes emitted while debug mode is on
    draw: DebugDraw,

    /// Live tick tasks
    scheduler: TickScheduler,
}

impl HitboxContext {
    /// Create a context with the given rules, debug mode off
    pub fn new(rules: HitboxRules) -> Self {
        log::info!("Initializing hitbox context...");
        Self {
            rules,
            ..Self::default()
        }
    }

    /// Create a context with rules loaded from a `.toml` or `.ron` file
    ///
    /// # Errors
    /// Returns a [`SettingsError`] if the file cannot be read or parsed.
    pub fn from_rules_file(path: &str) -> Result<Self, SettingsError> {
        HitboxRules::load_from_file(path).map(Self::new)
    }

    /// Advance one tick: expire debug shapes, then run every task
    pub fn step(&mut self, world: &dyn World, delta_time: f32) {
        self.draw.update(delta_time);
        let debug = self.debug.is_enabled().then_some(&mut self.draw);
        self.scheduler.step(world, delta_time, &self.rules, debug);
    }

    /// Run a one-shot query now, drawing its proxy in debug mode
    pub fn cast<W: World + ?Sized>(&mut self, query: &HitboxQuery, world: &W) -> Detection {
        let debug = self.debug.is_enabled().then_some(&mut self.draw);
        query.cast(world, &self.rules, debug)
    }

    /// Switch debug mode; pending proxies are cleared when it turns off
    pub fn set_debug(&mut self, enabled: bool) {
        self.debug.set(enabled);
        if !enabled {
            self.draw.clear();
        }
    }

    /// Whether debug mode is on
    pub fn debug_enabled(&self) -> bool {
        self.debug.is_enabled()
    }

    /// Debug flag, for subscribing to changes
    pub fn debug_mut(&mut self) -> &mut DebugFlag {
        &mut self.debug
    }

    /// Proxy shapes currently visible
    pub fn draw(&self) -> &DebugDraw {
        &self.draw
    }

    /// Gameplay rules
    pub fn rules(&self) -> &HitboxRules {
        &self.rules
    }

    /// Scheduler that sessions and detectors are spawned on
    pub fn scheduler_mut(&mut self) -> &mut TickScheduler {
        &mut self.scheduler
    }
}
