//! Candidate classification and deduplication
//!
//! Turns the raw bodies returned by a spatial query into the entities a
//! hitbox is allowed to hit.

use serde::{Deserialize, Serialize};

use crate::config::HitboxRules;
use crate::ecs::{BodyId, EntityId};
use crate::spatial::SceneModel;

/// Which kinds of entity a hitbox reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DetectionMode {
    /// Life-bearing entities whose eligibility flag is set
    #[default]
    Characters,
    /// Entities without a life-bearing component
    NonCharacters,
    /// Both of the above
    All,
}

impl DetectionMode {
    /// Whether `entity` belongs to this mode
    ///
    /// A life-bearing entity without the eligibility flag matches no mode.
    pub fn admits<M: SceneModel + ?Sized>(self, model: &M, entity: EntityId, rules: &HitboxRules) -> bool {
        let life_bearing = model.is_life_bearing(entity);
        let character = life_bearing && model.flag(entity, &rules.eligibility_flag);

        match self {
            Self::Characters => character,
            Self::NonCharacters => !life_bearing,
            Self::All => character || !life_bearing,
        }
    }
}

/// Result of a hitbox query
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Detection {
    /// First accepted entity, for single-hit queries
    Single(Option<EntityId>),
    /// Every accepted entity in discovery order, without duplicates
    Many(Vec<EntityId>),
}

impl Detection {
    /// Whether nothing was hit
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Single(hit) => hit.is_none(),
            Self::Many(hits) => hits.is_empty(),
        }
    }

    /// Hit entities as a list
    pub fn into_vec(self) -> Vec<EntityId> {
        match self {
            Self::Single(hit) => hit.into_iter().collect(),
            Self::Many(hits) => hits,
        }
    }
}

/// Resolve candidate bodies to the entities `mode` accepts
///
/// Invulnerable entities are dropped under every mode. With `single`, the
/// first accepted entity is returned and later candidates are not examined.
pub fn filter_candidates<M: SceneModel + ?Sized>(
    model: &M,
    candidates: &[BodyId],
    mode: DetectionMode,
    single: bool,
    rules: &HitboxRules,
) -> Detection {
    let mut accepted: Vec<EntityId> = Vec::new();

    for &body in candidates {
        let Some(entity) = model.body_entity(body) else {
            continue;
        };
        if accepted.contains(&entity) {
            continue;
        }
        if !mode.admits(model, entity, rules) {
            continue;
        }
        if model.flag(entity, &rules.invulnerability_flag) {
            continue;
        }

        if single {
            return Detection::Single(Some(entity));
        }
        accepted.push(entity);
    }

    if single {
        Detection::Single(None)
    } else {
        Detection::Many(accepted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::{Transform, Vec3};
    use crate::scene::Scene;

    struct Fixture {
        scene: Scene,
        rules: HitboxRules,
        eligible: EntityId,
        ineligible: EntityId,
        prop: EntityId,
    }

    impl Fixture {
        fn new() -> Self {
            let mut scene = Scene::new();
            let rules = HitboxRules::default();

            let eligible = scene.spawn_entity("Eligible");
            scene.set_life_bearing(eligible, true);
            scene.set_attribute(eligible, &rules.eligibility_flag, true);

            // Life-bearing but not currently comboable
            let ineligible = scene.spawn_entity("Ineligible");
            scene.set_life_bearing(ineligible, true);

            let prop = scene.spawn_entity("Barrel");

            for entity in [eligible, ineligible, prop] {
                scene.add_body(entity, "Body", Transform::identity(), Vec3::new(1.0, 1.0, 1.0));
            }

            Self {
                scene,
                rules,
                eligible,
                ineligible,
                prop,
            }
        }

        fn all_bodies(&self) -> Vec<BodyId> {
            [self.eligible, self.ineligible, self.prop]
                .into_iter()
                .flat_map(|entity| self.scene.entity_bodies(entity))
                .collect()
        }

        fn run(&self, mode: DetectionMode) -> Vec<EntityId> {
            filter_candidates(&self.scene, &self.all_bodies(), mode, false, &self.rules).into_vec()
        }
    }

    #[test]
    fn test_characters_require_eligibility_flag() {
        let fixture = Fixture::new();
        assert_eq!(fixture.run(DetectionMode::Characters), vec![fixture.eligible]);
    }

    #[test]
    fn test_non_characters_exclude_life_bearing() {
        let mut fixture = Fixture::new();
        // The eligibility flag has no say for non-characters
        fixture.scene.set_attribute(fixture.prop, "Combo", true);

        assert_eq!(fixture.run(DetectionMode::NonCharacters), vec![fixture.prop]);
    }

    #[test]
    fn test_ineligible_character_invisible_to_all_modes() {
        // Surprising but intended: a life-bearing entity without the flag is
        // neither a character nor a non-character
        let fixture = Fixture::new();
        let all = fixture.run(DetectionMode::All);

        assert_eq!(all, vec![fixture.eligible, fixture.prop]);
        assert!(!all.contains(&fixture.ineligible));
    }

    #[test]
    fn test_invulnerable_excluded_in_every_mode() {
        let mut fixture = Fixture::new();
        fixture.scene.set_attribute(fixture.eligible, "IFrame", true);
        fixture.scene.set_attribute(fixture.prop, "IFrame", true);

        for mode in [DetectionMode::Characters, DetectionMode::NonCharacters, DetectionMode::All] {
            assert!(fixture.run(mode).is_empty(), "{mode:?} returned an invulnerable entity");
        }
    }

    #[test]
    fn test_cleared_invulnerability_flag_is_ignored() {
        let mut fixture = Fixture::new();
        fixture.scene.set_attribute(fixture.eligible, "IFrame", false);

        assert_eq!(fixture.run(DetectionMode::Characters), vec![fixture.eligible]);
    }

    #[test]
    fn test_multiple_bodies_deduplicated() {
        let mut fixture = Fixture::new();
        fixture.scene.add_body(fixture.prop, "Lid", Transform::identity(), Vec3::new(1.0, 1.0, 1.0));
        let bodies = fixture.scene.entity_bodies(fixture.prop);
        assert_eq!(bodies.len(), 2);

        let hits = filter_candidates(&fixture.scene, &bodies, DetectionMode::All, false, &fixture.rules);
        assert_eq!(hits, Detection::Many(vec![fixture.prop]));
    }

    #[test]
    fn test_single_returns_first_accepted() {
        let fixture = Fixture::new();
        let hit = filter_candidates(
            &fixture.scene,
            &fixture.all_bodies(),
            DetectionMode::All,
            true,
            &fixture.rules,
        );

        assert_eq!(hit, Detection::Single(Some(fixture.eligible)));
    }

    #[test]
    fn test_single_without_match() {
        let fixture = Fixture::new();
        let hit = filter_candidates(&fixture.scene, &[], DetectionMode::All, true, &fixture.rules);

        assert!(hit.is_empty());
        assert_eq!(hit, Detection::Single(None));
    }
}
