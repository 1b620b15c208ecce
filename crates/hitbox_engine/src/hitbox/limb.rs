//! Directional limb collision detection
//!
//! Scans every limb of an entity once per tick. A limb whose scaled box
//! overlaps something casts short rays along the six world axes; a ray whose
//! first hit is one of the overlapping bodies produces a [`LimbContact`],
//! handed to the caller's callback. The callback decides whether detection
//! goes on (`ControlFlow::Continue`) or ends with a value (`ControlFlow::Break`).

use std::ops::ControlFlow;
use std::panic::{self, AssertUnwindSafe};

use bitflags::bitflags;

use crate::config::HitboxRules;
use crate::ecs::{BodyId, EntityId};
use crate::foundation::math::Vec3;
use crate::foundation::time::{TickClock, TickSource};
use crate::physics::{QueryFilter, RayHit};
use crate::schedule::{TaskId, TaskStatus, TickContext, TickScheduler, TickTask};
use crate::spatial::{query_box, query_ray, World};

/// One of the six world axis directions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// +X
    Right,
    /// -X
    Left,
    /// +Y
    Up,
    /// -Y
    Down,
    /// +Z
    Backward,
    /// -Z
    Forward,
}

impl Direction {
    /// Every direction, in scan order
    pub const ALL: [Direction; 6] = [
        Direction::Right,
        Direction::Left,
        Direction::Up,
        Direction::Down,
        Direction::Backward,
        Direction::Forward,
    ];

    /// Unit vector along this direction
    pub fn vector(self) -> Vec3 {
        match self {
            Self::Right => Vec3::new(1.0, 0.0, 0.0),
            Self::Left => Vec3::new(-1.0, 0.0, 0.0),
            Self::Up => Vec3::new(0.0, 1.0, 0.0),
            Self::Down => Vec3::new(0.0, -1.0, 0.0),
            Self::Backward => Vec3::new(0.0, 0.0, 1.0),
            Self::Forward => Vec3::new(0.0, 0.0, -1.0),
        }
    }

    /// This direction as a set member
    pub fn flag(self) -> Directions {
        match self {
            Self::Right => Directions::RIGHT,
            Self::Left => Directions::LEFT,
            Self::Up => Directions::UP,
            Self::Down => Directions::DOWN,
            Self::Backward => Directions::BACKWARD,
            Self::Forward => Directions::FORWARD,
        }
    }
}

bitflags! {
    /// Set of ray directions
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Directions: u8 {
        /// +X
        const RIGHT = 1 << 0;
        /// -X
        const LEFT = 1 << 1;
        /// +Y
        const UP = 1 << 2;
        /// -Y
        const DOWN = 1 << 3;
        /// +Z
        const BACKWARD = 1 << 4;
        /// -Z
        const FORWARD = 1 << 5;
        /// Both vertical directions
        const VERTICAL = Self::UP.bits() | Self::DOWN.bits();
        /// All four horizontal directions
        const HORIZONTAL = Self::RIGHT.bits() | Self::LEFT.bits() | Self::BACKWARD.bits() | Self::FORWARD.bits();
    }
}

/// Which directions get a ray
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DirectionFilter {
    /// Every direction
    #[default]
    All,
    /// Only the listed directions
    Allow(Directions),
    /// Every direction except the listed ones
    Deny(Directions),
}

impl DirectionFilter {
    /// Whether a ray is cast along `direction`
    pub fn permits(self, direction: Direction) -> bool {
        match self {
            Self::All => true,
            Self::Allow(set) => set.contains(direction.flag()),
            Self::Deny(set) => !set.contains(direction.flag()),
        }
    }
}

/// A limb touching another body
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LimbContact {
    /// The limb that overlapped
    pub limb: BodyId,
    /// The body it touched
    pub body: BodyId,
    /// Direction of the ray that confirmed the contact
    pub direction: Direction,
    /// The confirming ray hit
    pub hit: RayHit,
}

/// How a detection run ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LimbOutcome<T> {
    /// The callback broke out with a value
    Detected(T),
    /// No contact was accepted before the timeout
    TimedOut,
    /// The entity was destroyed or left its container
    Removed,
    /// The tick source ran dry
    Interrupted,
}

impl<T> LimbOutcome<T> {
    /// The callback's value, if detection succeeded
    pub fn detected(self) -> Option<T> {
        match self {
            Self::Detected(value) => Some(value),
            _ => None,
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Self::Detected(_) => "detected",
            Self::TimedOut => "timed out",
            Self::Removed => "entity removed",
            Self::Interrupted => "interrupted",
        }
    }
}

/// Contact callback
pub type LimbCallback<T> = Box<dyn FnMut(&LimbContact) -> ControlFlow<T> + Send>;

/// Per-tick limb contact scanner for one entity
pub struct LimbCollisionDetector<T> {
    entity: EntityId,
    callback: LimbCallback<T>,
    scale: f32,
    filter: QueryFilter,
    timeout: f32,
    directions: DirectionFilter,
    ray_padding: f32,
    started_at: Option<f64>,
    container: Option<Option<String>>,
}

impl<T> LimbCollisionDetector<T> {
    /// Detector for `entity` with the limb defaults from `rules`
    ///
    /// The default filter ignores the characters and cosmetic containers.
    pub fn new(
        entity: EntityId,
        rules: &HitboxRules,
        callback: impl FnMut(&LimbContact) -> ControlFlow<T> + Send + 'static,
    ) -> Self {
        Self {
            entity,
            callback: Box::new(callback),
            scale: rules.limb_scale,
            filter: QueryFilter::new()
                .exclude_container(&rules.characters_container)
                .exclude_container(&rules.cosmetic_container),
            timeout: rules.limb_timeout,
            directions: DirectionFilter::All,
            ray_padding: rules.limb_ray_padding,
            started_at: None,
            container: None,
        }
    }

    /// Builder pattern: limb box scale multiplier
    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }

    /// Builder pattern: replace the exclusion filter
    pub fn with_filter(mut self, filter: QueryFilter) -> Self {
        self.filter = filter;
        self
    }

    /// Builder pattern: timeout in seconds
    pub fn with_timeout(mut self, timeout: f32) -> Self {
        self.timeout = timeout;
        self
    }

    /// Builder pattern: restrict ray directions
    pub fn with_directions(mut self, directions: DirectionFilter) -> Self {
        self.directions = directions;
        self
    }

    /// Run on the calling thread until detection ends
    ///
    /// Scans once immediately, then once after every tick pulled from
    /// `ticks`. The world is only read, so an engine handle that tracks the
    /// live simulation is expected here.
    pub fn run_blocking<W, S>(mut self, world: &W, ticks: &mut S) -> LimbOutcome<T>
    where
        W: World + ?Sized,
        S: TickSource + ?Sized,
    {
        let mut clock = TickClock::new();
        self.begin(world, clock.elapsed());
        loop {
            if let Some(outcome) = self.poll(world, clock.elapsed()) {
                log::debug!("Limb detection for {:?} {}", self.entity, outcome.label());
                return outcome;
            }
            let Some(delta_time) = ticks.next_tick() else {
                return LimbOutcome::Interrupted;
            };
            clock.advance(delta_time);
        }
    }

    /// Record the start time and the container the entity must stay in
    fn begin<W: World + ?Sized>(&mut self, world: &W, now: f64) {
        if self.started_at.is_none() {
            self.started_at = Some(now);
        }
        if self.container.is_none() {
            self.container = Some(world.container(self.entity).map(str::to_string));
        }
    }

    /// Scan once; `now` is the elapsed time in seconds
    fn poll<W: World + ?Sized>(&mut self, world: &W, now: f64) -> Option<LimbOutcome<T>> {
        self.begin(world, now);
        let started_at = self.started_at.unwrap_or(now);
        let expected = self.container.as_ref().and_then(Option::as_deref);

        if !world.entity_exists(self.entity) || world.container(self.entity) != expected {
            return Some(LimbOutcome::Removed);
        }
        if now - started_at > f64::from(self.timeout) {
            return Some(LimbOutcome::TimedOut);
        }

        self.scan(world).map(LimbOutcome::Detected)
    }

    fn scan<W: World + ?Sized>(&mut self, world: &W) -> Option<T> {
        let root = world.root_body(self.entity);
        let ray_length = self.scale + self.ray_padding;

        for limb in world.entity_bodies(self.entity) {
            if Some(limb) == root {
                continue;
            }
            let (Some(pose), Some(size)) = (world.body_transform(limb), world.body_size(limb)) else {
                continue;
            };

            let overlaps = query_box(world, &pose, size * self.scale, &self.filter);
            if overlaps.is_empty() {
                continue;
            }

            for direction in Direction::ALL {
                if !self.directions.permits(direction) {
                    continue;
                }
                let Some(hit) = query_ray(world, pose.position, direction.vector() * ray_length, &self.filter) else {
                    continue;
                };
                if !overlaps.contains(&hit.body) {
                    continue;
                }

                let contact = LimbContact {
                    limb,
                    body: hit.body,
                    direction,
                    hit,
                };
                if let ControlFlow::Break(value) = self.notify(&contact) {
                    return Some(value);
                }
            }
        }
        None
    }

    fn notify(&mut self, contact: &LimbContact) -> ControlFlow<T> {
        let callback = &mut self.callback;
        panic::catch_unwind(AssertUnwindSafe(|| callback(contact))).unwrap_or_else(|_| {
            log::error!("Limb callback panicked, continuing detection");
            ControlFlow::Continue(())
        })
    }
}

impl<T: 'static> LimbCollisionDetector<T> {
    /// Run as a detached tick task; the outcome is only logged
    ///
    /// The entity's container and the start time are taken now, so leaving
    /// the container before the next step still ends detection.
    pub fn spawn<W: World + ?Sized>(mut self, world: &W, scheduler: &mut TickScheduler) -> TaskId {
        self.begin(world, scheduler.clock().elapsed());
        scheduler.spawn(Box::new(self))
    }
}

impl<T: 'static> TickTask for LimbCollisionDetector<T> {
    fn name(&self) -> &str {
        "limb collision"
    }

    fn tick(&mut self, world: &dyn World, context: &mut TickContext<'_>) -> TaskStatus {
        match self.poll(world, context.clock.elapsed()) {
            Some(outcome) => {
                log::debug!("Limb detection for {:?} {}", self.entity, outcome.label());
                TaskStatus::Finished
            }
            None => TaskStatus::Pending,
        }
    }
}

impl<T> std::fmt::Debug for LimbCollisionDetector<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LimbCollisionDetector")
            .field("entity", &self.entity)
            .field("scale", &self.scale)
            .field("timeout", &self.timeout)
            .field("directions", &self.directions)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Transform;
    use crate::foundation::time::FixedTicks;
    use crate::scene::Scene;
    use crate::spatial::SceneModel;
    use crate::test_support::{spawn_character, FailingWorld};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    const DT: f32 = 1.0 / 60.0;

    /// A character with a head limb just under a ceiling slab
    fn cramped_room() -> (Scene, EntityId, EntityId) {
        let mut scene = Scene::new();
        let dummy = spawn_character(&mut scene, "Dummy", Vec3::zeros());
        scene.add_body(
            dummy,
            "Head",
            Transform::from_position(Vec3::new(0.0, 1.5, 0.0)),
            Vec3::new(1.0, 1.0, 1.0),
        );

        let ceiling = scene.spawn_entity("Ceiling");
        scene.add_body(
            ceiling,
            "Slab",
            Transform::from_position(Vec3::new(0.0, 2.2, 0.0)),
            Vec3::new(4.0, 0.4, 4.0),
        );
        (scene, dummy, ceiling)
    }

    #[test]
    fn test_direction_filters() {
        assert!(DirectionFilter::All.permits(Direction::Down));
        assert!(DirectionFilter::Allow(Directions::VERTICAL).permits(Direction::Up));
        assert!(!DirectionFilter::Allow(Directions::VERTICAL).permits(Direction::Left));
        assert!(!DirectionFilter::Deny(Directions::UP).permits(Direction::Up));
        assert!(DirectionFilter::Deny(Directions::UP).permits(Direction::Forward));
    }

    #[test]
    fn test_ceiling_contact_fires_once_upward() {
        let (scene, dummy, ceiling) = cramped_room();
        let rules = HitboxRules::default();
        let contacts = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&contacts);

        let detector = LimbCollisionDetector::new(dummy, &rules, move |contact: &LimbContact| {
            sink.lock().unwrap().push(*contact);
            ControlFlow::Break(contact.direction)
        });
        let outcome = detector.run_blocking(&scene, &mut FixedTicks::limited(DT, 10));

        assert_eq!(outcome, LimbOutcome::Detected(Direction::Up));
        let contacts = contacts.lock().unwrap();
        assert_eq!(contacts.len(), 1);
        assert_eq!(scene.body_entity(contacts[0].body), Some(ceiling));
        assert!((contacts[0].hit.distance - 0.5).abs() < 1e-4);
    }

    #[test]
    fn test_continue_keeps_scanning() {
        let (scene, dummy, _) = cramped_room();
        let rules = HitboxRules::default();
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);

        let detector = LimbCollisionDetector::new(dummy, &rules, move |_: &LimbContact| {
            let call = counter.fetch_add(1, Ordering::SeqCst) + 1;
            if call < 2 {
                ControlFlow::Continue(())
            } else {
                ControlFlow::Break(call)
            }
        });
        let outcome = detector.run_blocking(&scene, &mut FixedTicks::limited(DT, 10));

        assert_eq!(outcome, LimbOutcome::Detected(2));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_times_out_when_always_continuing() {
        let (scene, dummy, _) = cramped_room();
        let rules = HitboxRules::default();
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);

        let detector = LimbCollisionDetector::<()>::new(dummy, &rules, move |_: &LimbContact| {
            counter.fetch_add(1, Ordering::SeqCst);
            ControlFlow::Continue(())
        })
        .with_timeout(0.5);
        let outcome = detector.run_blocking(&scene, &mut FixedTicks::limited(DT, 600));

        assert_eq!(outcome, LimbOutcome::TimedOut);
        let calls = calls.load(Ordering::SeqCst);
        assert!((30..=32).contains(&calls), "{calls} scans before the timeout");
    }

    #[test]
    fn test_denied_direction_never_fires() {
        let (scene, dummy, _) = cramped_room();
        let rules = HitboxRules::default();
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);

        let detector = LimbCollisionDetector::<()>::new(dummy, &rules, move |_: &LimbContact| {
            counter.fetch_add(1, Ordering::SeqCst);
            ControlFlow::Break(())
        })
        .with_directions(DirectionFilter::Deny(Directions::UP));
        let outcome = detector.run_blocking(&scene, &mut FixedTicks::limited(DT, 5));

        assert_eq!(outcome, LimbOutcome::Interrupted);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_root_body_is_not_a_limb() {
        let mut scene = Scene::new();
        let dummy = spawn_character(&mut scene, "Dummy", Vec3::zeros());
        let floor = scene.spawn_entity("Floor");
        scene.add_body(
            floor,
            "Slab",
            Transform::from_position(Vec3::new(0.0, -1.2, 0.0)),
            Vec3::new(4.0, 0.4, 4.0),
        );

        let detector = LimbCollisionDetector::<()>::new(dummy, &HitboxRules::default(), |_: &LimbContact| {
            ControlFlow::Break(())
        });
        let outcome = detector.run_blocking(&scene, &mut FixedTicks::limited(DT, 3));
        assert_eq!(outcome, LimbOutcome::Interrupted);
    }

    #[test]
    fn test_panicking_callback_counts_as_continue() {
        let (scene, dummy, _) = cramped_room();
        let rules = HitboxRules::default();

        let detector = LimbCollisionDetector::<()>::new(dummy, &rules, |_: &LimbContact| {
            panic!("bad contact handler")
        })
        .with_timeout(0.1);
        let outcome = detector.run_blocking(&scene, &mut FixedTicks::limited(DT, 60));

        assert_eq!(outcome, LimbOutcome::TimedOut);
    }

    #[test]
    fn test_spawned_detector_ends_when_entity_leaves_container() {
        let (mut scene, dummy, _) = cramped_room();
        let rules = HitboxRules::default();
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let mut scheduler = TickScheduler::new();

        LimbCollisionDetector::<()>::new(dummy, &rules, move |_: &LimbContact| {
            counter.fetch_add(1, Ordering::SeqCst);
            ControlFlow::Continue(())
        })
        .spawn(&scene, &mut scheduler);

        assert_eq!(scheduler.step(&scene, DT, &rules, None), 1);
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        scene.set_container(dummy, None);
        assert_eq!(scheduler.step(&scene, DT, &rules, None), 0);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_spawned_detector_removed_before_first_step() {
        let (mut scene, dummy, _) = cramped_room();
        let rules = HitboxRules::default();
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let mut scheduler = TickScheduler::new();

        LimbCollisionDetector::<()>::new(dummy, &rules, move |_: &LimbContact| {
            counter.fetch_add(1, Ordering::SeqCst);
            ControlFlow::Continue(())
        })
        .spawn(&scene, &mut scheduler);

        scene.set_container(dummy, None);
        assert_eq!(scheduler.step(&scene, DT, &rules, None), 0);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_engine_failure_times_out_without_contacts() {
        let (scene, dummy, _) = cramped_room();
        let rules = HitboxRules::default();
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let world = FailingWorld(scene);

        assert!(query_ray(&world, Vec3::zeros(), Vec3::new(0.0, 2.0, 0.0), &QueryFilter::new()).is_none());

        let detector = LimbCollisionDetector::<()>::new(dummy, &rules, move |_: &LimbContact| {
            counter.fetch_add(1, Ordering::SeqCst);
            ControlFlow::Break(())
        })
        .with_timeout(0.1);
        let outcome = detector.run_blocking(&world, &mut FixedTicks::limited(DT, 60));

        assert_eq!(outcome, LimbOutcome::TimedOut);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_removed_when_entity_despawned() {
        let (mut scene, dummy, _) = cramped_room();
        let rules = HitboxRules::default();
        let mut detector = LimbCollisionDetector::<()>::new(dummy, &rules, |_: &LimbContact| {
            ControlFlow::Continue(())
        });

        assert!(detector.poll(&scene, 0.0).is_none());
        scene.despawn_entity(dummy);
        assert_eq!(detector.poll(&scene, DT.into()), Some(LimbOutcome::Removed));
    }
}
