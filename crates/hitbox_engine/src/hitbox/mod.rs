//! Hit detection core
//!
//! - [`HitboxQuery`]: one-shot volume query filtered down to hit entities
//! - [`HitboxSession`]: restartable per-tick hitbox with push callbacks and
//!   blocking waits
//! - [`LimbCollisionDetector`]: per-limb directional contact scanning

pub mod hit_filter;
pub mod instant;
pub mod limb;
pub mod pose;
pub mod session;
pub mod settings;
pub mod volume;

pub use hit_filter::{filter_candidates, Detection, DetectionMode};
pub use instant::HitboxQuery;
pub use limb::{
    Direction, DirectionFilter, Directions, LimbCallback, LimbCollisionDetector, LimbContact,
    LimbOutcome,
};
pub use pose::{Axis, Offset, Pose};
pub use session::{HitCallback, HitboxSession};
pub use settings::HitboxSettings;
pub use volume::{Shape, Volume};
