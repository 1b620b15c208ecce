//! Error types for hitbox configuration and engine queries

use thiserror::Error;

/// Invalid or contradictory hitbox configuration
///
/// Returned by [`HitboxSession::start`](crate::hitbox::HitboxSession::start);
/// the session stays idle and no task is spawned.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    /// A fixed transform was given together with a core-relative pose
    #[error("a fixed transform and a core-relative pose are mutually exclusive")]
    ConflictingPoseModes,

    /// A reference body was set while core-relative mode is disabled
    #[error("a core body can only be set when core-relative mode is enabled")]
    CoreWithoutRelativeMode,

    /// Core-relative mode is enabled but no reference body was given
    #[error("core-relative mode requires a core body")]
    MissingCore,

    /// Neither a fixed transform nor a core-relative pose was given
    #[error("no pose configured: set a transform or enable core-relative mode")]
    MissingPose,

    /// Axis tags and offset components differ in count
    #[error("{axes} offset axes given for {components} offset components")]
    AxisCountMismatch {
        /// Number of axis tags
        axes: usize,
        /// Number of offset components
        components: usize,
    },

    /// More axis tags than there are local axes
    #[error("at most 3 offset axes are supported, got {0}")]
    TooManyAxes(usize),

    /// A raw offset vector with more than three components
    #[error("an offset without axes must have at most 3 components, got {0}")]
    OffsetWithoutAxes(usize),

    /// Shape tag other than box or sphere
    #[error("unsupported hitbox shape: {0}")]
    UnsupportedShape(String),
}

/// Failure reported by the engine's spatial query collaborator
///
/// The core never propagates these past the tick loop; they degrade to an
/// empty candidate set and are retried on the next tick.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    /// The engine could not run the query
    #[error("engine query failed: {0}")]
    Engine(String),

    /// A body handle the engine does not know about
    #[error("unknown body in query")]
    UnknownBody,
}
