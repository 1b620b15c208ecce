//! Settable hitbox fields and their validation
//!
//! Gameplay code fills in a [`HitboxSettings`] (or loads a preset from disk),
//! and [`HitboxSettings::build`] checks it before a session starts.

use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::ecs::BodyId;
use crate::error::ConfigurationError;
use crate::foundation::math::{Transform, Vec3};
use crate::physics::QueryFilter;

use super::hit_filter::DetectionMode;
use super::instant::HitboxQuery;
use super::pose::{Axis, Offset, Pose};
use super::volume::{Shape, Volume};

/// Raw hitbox configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HitboxSettings {
    /// Full volume size
    pub size: Vec3,

    /// Shape tag: `"Box"` (alias `"Block"`) or `"Sphere"` (alias `"Ball"`),
    /// case-insensitive
    pub shape: String,

    /// Which entities count as hits
    pub mode: DetectionMode,

    /// Stop after the first hit
    pub single: bool,

    /// Fixed world transform; exclusive with core-relative mode
    pub transform: Option<Transform>,

    /// Follow the core body instead of a fixed transform
    pub core_relative: bool,

    /// Reference body for core-relative mode
    #[serde(skip)]
    pub core: Option<BodyId>,

    /// Offset components; a raw vector when no axes are given
    pub offset: Vec<f32>,

    /// Local axes the offset components are measured along
    pub offset_axes: Option<Vec<Axis>>,

    /// Bodies the queries ignore
    #[serde(skip)]
    pub filter: QueryFilter,
}

impl Default for HitboxSettings {
    fn default() -> Self {
        Self {
            size: Vec3::new(1.0, 1.0, 1.0),
            shape: Shape::Box.to_string(),
            mode: DetectionMode::default(),
            single: false,
            transform: None,
            core_relative: false,
            core: None,
            offset: Vec::new(),
            offset_axes: None,
            filter: QueryFilter::default(),
        }
    }
}

impl Config for HitboxSettings {}

impl HitboxSettings {
    /// Check the settings and turn them into a query
    ///
    /// # Errors
    /// Returns a [`ConfigurationError`] for contradictory pose settings,
    /// mismatched offset axes or an unknown shape tag.
    pub fn build(&self) -> Result<HitboxQuery, ConfigurationError> {
        if self.transform.is_some() && (self.core_relative || self.core.is_some()) {
            return Err(ConfigurationError::ConflictingPoseModes);
        }
        if self.core.is_some() && !self.core_relative {
            return Err(ConfigurationError::CoreWithoutRelativeMode);
        }

        let shape: Shape = self.shape.parse()?;
        let offset = self.offset()?;
        let pose = self.pose(offset)?;

        Ok(HitboxQuery {
            pose,
            volume: Volume {
                size: self.size,
                shape,
            },
            filter: self.filter.clone(),
            mode: self.mode,
            single: self.single,
        })
    }

    fn pose(&self, offset: Offset) -> Result<Pose, ConfigurationError> {
        if !self.core_relative {
            return self
                .transform
                .map(Pose::Fixed)
                .ok_or(ConfigurationError::MissingPose);
        }

        let core = self.core.ok_or(ConfigurationError::MissingCore)?;
        Ok(Pose::CoreRelative { core, offset })
    }

    fn offset(&self) -> Result<Offset, ConfigurationError> {
        match &self.offset_axes {
            Some(axes) => {
                if axes.len() > 3 {
                    return Err(ConfigurationError::TooManyAxes(axes.len()));
                }
                if axes.len() != self.offset.len() {
                    return Err(ConfigurationError::AxisCountMismatch {
                        axes: axes.len(),
                        components: self.offset.len(),
                    });
                }
                Ok(Offset::Along(axes.iter().copied().zip(self.offset.iter().copied()).collect()))
            }
            None => {
                if self.offset.len() > 3 {
                    return Err(ConfigurationError::OffsetWithoutAxes(self.offset.len()));
                }
                let mut vector = Vec3::zeros();
                for (component, value) in vector.iter_mut().zip(&self.offset) {
                    *component = *value;
                }
                Ok(Offset::Vector(vector))
            }
        }
    }
}
