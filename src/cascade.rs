//! Cascade engine: scripted knock-on effects when resources cross thresholds.

use serde::{Deserialize, Serialize};

use crate::constants::{
    CASCADE_BOOM_CEILING, CASCADE_BOOM_STREAK, CASCADE_COOLDOWN_TURNS, CASCADE_FLOOR,
    CHAOS_CASCADE_BUMP,
};
use crate::resources::{EffectVector, ResourceChanges, ResourceKind};
use crate::session::SessionState;

/// Threshold condition for one cascade rule.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Condition {
    /// Resource strictly below a floor.
    Below { resource: ResourceKind, floor: i32 },
    /// Resource strictly above a ceiling while a win streak is running.
    AboveWithStreak {
        resource: ResourceKind,
        ceiling: i32,
        min_streak: u32,
    },
}

impl Condition {
    fn holds(self, state: &SessionState) -> bool {
        match self {
            Self::Below { resource, floor } => state.resources.get(resource) < floor,
            Self::AboveWithStreak {
                resource,
                ceiling,
                min_streak,
            } => state.resources.get(resource) > ceiling && state.streak > min_streak,
        }
    }
}

/// A scripted secondary consequence. Fires at most once per continuous
/// occurrence of its condition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CascadeRule {
    pub key: &'static str,
    pub message: &'static str,
    condition: Condition,
    pub effects: EffectVector,
}

/// Rule table in fixed priority order: collapse > unrest > scandal > boom.
const RULES: [CascadeRule; 4] = [
    CascadeRule {
        key: "economic-collapse",
        message: "log.cascade.economic-collapse",
        condition: Condition::Below {
            resource: ResourceKind::Economy,
            floor: CASCADE_FLOOR,
        },
        effects: EffectVector {
            popularity: -8,
            stability: -10,
            media: 0,
            economy: 0,
        },
    },
    CascadeRule {
        key: "civil-unrest",
        message: "log.cascade.civil-unrest",
        condition: Condition::Below {
            resource: ResourceKind::Stability,
            floor: CASCADE_FLOOR,
        },
        effects: EffectVector {
            popularity: -10,
            stability: 0,
            media: 0,
            economy: -5,
        },
    },
    CascadeRule {
        key: "media-scandal",
        message: "log.cascade.media-scandal",
        condition: Condition::Below {
            resource: ResourceKind::Media,
            floor: CASCADE_FLOOR,
        },
        effects: EffectVector {
            popularity: -8,
            stability: -5,
            media: 0,
            economy: 0,
        },
    },
    CascadeRule {
        key: "popularity-boom",
        message: "log.cascade.popularity-boom",
        condition: Condition::AboveWithStreak {
            resource: ResourceKind::Popularity,
            ceiling: CASCADE_BOOM_CEILING,
            min_streak: CASCADE_BOOM_STREAK,
        },
        effects: EffectVector {
            popularity: 0,
            stability: 5,
            media: 5,
            economy: 3,
        },
    },
];

/// A cascade that fired this tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CascadeHit {
    pub key: String,
    pub message: String,
    pub effects: EffectVector,
    pub changes: ResourceChanges,
}

/// Evaluate the rule table against the post-resolution state.
///
/// Rules whose conditions have cleared re-arm first; then, if no cooldown
/// is pending, the first armed rule whose condition holds fires: its
/// effects apply through the resource store, chaos rises, and the global
/// cooldown starts. At most one cascade fires per tick.
pub fn check(state: &mut SessionState) -> Option<CascadeHit> {
    for rule in &RULES {
        if !rule.condition.holds(state) {
            state.active_cascades.remove(rule.key);
        }
    }

    if state.cascade_cooldown > 0 {
        return None;
    }

    for rule in &RULES {
        if rule.condition.holds(state) && !state.active_cascades.contains(rule.key) {
            let changes = state.resources.apply(&rule.effects);
            state.cascades_triggered += 1;
            state.bump_chaos(CHAOS_CASCADE_BUMP);
            state.active_cascades.insert(rule.key.to_string());
            state.cascade_cooldown = CASCADE_COOLDOWN_TURNS;
            state.logs.push(String::from(rule.message));
            return Some(CascadeHit {
                key: String::from(rule.key),
                message: String::from(rule.message),
                effects: rule.effects,
                changes,
            });
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::ResourceSet;

    fn state_with(resources: ResourceSet) -> SessionState {
        let mut state = SessionState::default();
        state.resources = resources;
        state
    }

    #[test]
    fn low_economy_triggers_collapse_once() {
        let mut state = state_with(ResourceSet::new(50, 50, 50, 10));
        let hit = check(&mut state).expect("collapse fires");
        assert_eq!(hit.key, "economic-collapse");
        assert_eq!(state.cascades_triggered, 1);
        assert_eq!(state.chaos, 10);
        assert_eq!(state.cascade_cooldown, CASCADE_COOLDOWN_TURNS);

        // Condition still true, cooldown elapsed: must not re-fire.
        state.cascade_cooldown = 0;
        assert!(check(&mut state).is_none(), "single fire per occurrence");
        assert_eq!(state.cascades_triggered, 1);
    }

    #[test]
    fn rule_rearms_after_condition_clears() {
        let mut state = state_with(ResourceSet::new(50, 50, 50, 10));
        assert!(check(&mut state).is_some());

        state.resources = ResourceSet::new(50, 50, 50, 40);
        state.cascade_cooldown = 0;
        assert!(check(&mut state).is_none(), "cleared condition, no fire");
        assert!(!state.active_cascades.contains("economic-collapse"));

        state.resources = ResourceSet::new(50, 50, 50, 5);
        let hit = check(&mut state).expect("re-armed rule fires again");
        assert_eq!(hit.key, "economic-collapse");
        assert_eq!(state.cascades_triggered, 2);
    }

    #[test]
    fn cooldown_blocks_other_rules() {
        let mut state = state_with(ResourceSet::new(50, 10, 50, 10));
        let hit = check(&mut state).expect("highest-priority rule fires");
        assert_eq!(hit.key, "economic-collapse", "collapse outranks unrest");

        // Unrest condition holds and is armed, but the cooldown is pending.
        assert!(check(&mut state).is_none());

        state.cascade_cooldown = 0;
        let hit = check(&mut state).expect("unrest fires after cooldown");
        assert_eq!(hit.key, "civil-unrest");
    }

    #[test]
    fn boom_needs_both_popularity_and_streak() {
        let mut state = state_with(ResourceSet::new(90, 50, 50, 50));
        state.streak = 2;
        assert!(check(&mut state).is_none(), "streak too short");

        state.streak = 4;
        let hit = check(&mut state).expect("boom fires");
        assert_eq!(hit.key, "popularity-boom");
        assert_eq!(state.resources.stability, 55);
    }

    #[test]
    fn cascade_changes_are_clamped() {
        let mut state = state_with(ResourceSet::new(3, 50, 50, 10));
        let hit = check(&mut state).expect("collapse fires");
        let pop = hit
            .changes
            .iter()
            .find(|c| c.kind == ResourceKind::Popularity)
            .unwrap();
        assert_eq!(pop.new, 0, "clamped at the floor");
        assert_eq!(pop.applied(), -3);
    }
}
