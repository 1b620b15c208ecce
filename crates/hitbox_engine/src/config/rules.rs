//! Gameplay rules shared by every hitbox and limb detector

use serde::{Deserialize, Serialize};

use super::Config;

/// Attribute and container names plus timing defaults
///
/// Owned by the [`HitboxContext`](crate::HitboxContext) and handed to
/// tick tasks, so games can rename flags without touching the core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HitboxRules {
    /// Attribute that must be truthy for a life-bearing entity to be hit
    pub eligibility_flag: String,

    /// Attribute that, when truthy, removes an entity from every result
    pub invulnerability_flag: String,

    /// Container holding character entities
    pub characters_container: String,

    /// Container holding purely cosmetic entities that never block queries
    pub cosmetic_container: String,

    /// Seconds a debug proxy volume stays visible
    pub debug_lifetime: f32,

    /// Default limb box scale multiplier
    pub limb_scale: f32,

    /// Default limb detection timeout in seconds
    pub limb_timeout: f32,

    /// Extra ray length past the limb scale
    pub limb_ray_padding: f32,
}

impl Default for HitboxRules {
    fn default() -> Self {
        Self {
            eligibility_flag: "Combo".to_string(),
            invulnerability_flag: "IFrame".to_string(),
            characters_container: "Characters".to_string(),
            cosmetic_container: "UnobstructiveAssets".to_string(),
            debug_lifetime: 0.1,
            limb_scale: 1.2,
            limb_timeout: 2.0,
            limb_ray_padding: 0.5,
        }
    }
}

impl Config for HitboxRules {}
