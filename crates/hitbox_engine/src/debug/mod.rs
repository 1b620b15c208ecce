//! Debug visualization
//!
//! A context-owned debug flag and the queue of proxy shapes hitbox queries
//! emit while it is on.

pub mod draw;
pub mod flag;

pub use draw::{hitbox_color, DebugDraw, DebugShape};
pub use flag::{DebugFlag, DebugObserver};
