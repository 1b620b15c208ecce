//! One-shot hitbox queries
//!
//! A [`HitboxQuery`] resolves its pose for the current tick, asks the engine
//! for overlapping bodies and filters them down to hit entities. Sessions run
//! one of these per tick; gameplay code can also call it directly.

use crate::config::HitboxRules;
use crate::debug::DebugDraw;
use crate::physics::QueryFilter;
use crate::spatial::World;

use super::hit_filter::{filter_candidates, Detection, DetectionMode};
use super::pose::Pose;
use super::volume::Volume;

/// Validated, self-contained hitbox query
#[derive(Debug, Clone, PartialEq)]
pub struct HitboxQuery {
    /// Where the volume sits
    pub pose: Pose,
    /// What region is tested
    pub volume: Volume,
    /// Bodies the engine must ignore
    pub filter: QueryFilter,
    /// Which entities count as hits
    pub mode: DetectionMode,
    /// Stop at the first accepted entity
    pub single: bool,
}

impl HitboxQuery {
    /// Query with an empty filter, reporting characters
    pub fn new(pose: Pose, volume: Volume) -> Self {
        Self {
            pose,
            volume,
            filter: QueryFilter::new(),
            mode: DetectionMode::default(),
            single: false,
        }
    }

    /// Builder pattern: set the exclusion filter
    pub fn with_filter(mut self, filter: QueryFilter) -> Self {
        self.filter = filter;
        self
    }

    /// Builder pattern: set the detection mode
    pub fn with_mode(mut self, mode: DetectionMode) -> Self {
        self.mode = mode;
        self
    }

    /// Builder pattern: stop at the first hit
    pub fn with_single(mut self, single: bool) -> Self {
        self.single = single;
        self
    }

    /// Run the query against the world as it is now
    ///
    /// When `debug` is given, a proxy of the tested volume is pushed to it.
    /// A core-relative pose whose core has vanished hits nothing.
    pub fn cast<W: World + ?Sized>(
        &self,
        world: &W,
        rules: &HitboxRules,
        debug: Option<&mut DebugDraw>,
    ) -> Detection {
        let Some(pose) = self.pose.resolve(world) else {
            log::debug!("Hitbox core body is gone, skipping query");
            return self.empty();
        };

        if let Some(debug) = debug {
            self.volume.draw(debug, &pose, rules.debug_lifetime);
        }

        let candidates = self.volume.query(world, &pose, &self.filter);
        if candidates.is_empty() {
            return self.empty();
        }

        filter_candidates(world, &candidates, self.mode, self.single, rules)
    }

    fn empty(&self) -> Detection {
        if self.single {
            Detection::Single(None)
        } else {
            Detection::Many(Vec::new())
        }
    }
}
