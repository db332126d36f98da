//! Decision resolution: option validation, character modifiers, meta-state.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::characters::CharacterMods;
use crate::constants::{
    CHAOS_DISASTER_BUMP, CHAOS_PER_TURN, DISASTER_TOTAL_THRESHOLD, LOG_STREAK_BROKEN,
};
use crate::data::{CardCategory, DecisionCard};
use crate::numbers::round_f64_to_i32;
use crate::resources::{EffectVector, ResourceChanges, ResourceKind, ResourceSet};
use crate::session::SessionState;

/// Caller-contract violations. The presentation layer must never submit an
/// option index it was not shown; this is not a recoverable game state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("option index {index} out of range for card with {available} options")]
    OptionOutOfRange { index: usize, available: usize },
}

/// Everything that came out of resolving one chosen option.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resolution {
    /// Scaled (post-modifier) delta before clamping.
    pub final_delta: EffectVector,
    /// Resources after application.
    pub resources: ResourceSet,
    /// Per-resource changes that actually landed, post-clamp.
    pub changes: ResourceChanges,
    /// Sum of the scaled pre-clamp deltas; drives streak and chaos.
    pub total_change: i32,
}

/// Scale a raw effect vector by the character's modifiers, rounding each
/// resource half away from zero.
#[must_use]
pub fn scale_effects(raw: &EffectVector, mods: &CharacterMods) -> EffectVector {
    let mut scaled = EffectVector::default();
    for kind in ResourceKind::ALL {
        let value = raw.get(kind);
        if value == 0 {
            continue;
        }
        let factor = mods.factor(kind);
        scaled.set(
            kind,
            round_f64_to_i32(f64::from(value) * f64::from(factor)),
        );
    }
    scaled
}

/// Resolve a chosen option against the session state.
///
/// Applies the modifier-scaled delta through the resource store, then
/// updates the streak, chaos, and category counters.
///
/// # Errors
///
/// Returns `ResolveError::OptionOutOfRange` when `option_index` does not
/// address an option on the card.
pub fn resolve(
    card: &DecisionCard,
    option_index: usize,
    mods: &CharacterMods,
    state: &mut SessionState,
) -> Result<Resolution, ResolveError> {
    let option = card
        .options
        .get(option_index)
        .ok_or(ResolveError::OptionOutOfRange {
            index: option_index,
            available: card.options.len(),
        })?;

    let final_delta = scale_effects(&option.effects, mods);
    let changes = state.resources.apply(&final_delta);
    let total_change = final_delta.total();

    if total_change > 0 {
        state.streak += 1;
    } else if total_change < DISASTER_TOTAL_THRESHOLD {
        state.streak = 0;
        state.bump_chaos(CHAOS_DISASTER_BUMP);
        state.logs.push(String::from(LOG_STREAK_BROKEN));
    }
    state.bump_chaos(CHAOS_PER_TURN);

    if card.category == CardCategory::Absurd {
        state.absurd_cards_seen += 1;
    }

    Ok(Resolution {
        final_delta,
        resources: state.resources,
        changes,
        total_change,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::CardOption;

    fn card_with(effects: EffectVector, category: CardCategory) -> DecisionCard {
        DecisionCard {
            id: String::from("test"),
            title: String::from("Test"),
            text: String::from("desc"),
            category,
            options: vec![
                CardOption {
                    label: String::from("Pick me"),
                    effects,
                },
                CardOption {
                    label: String::from("Or me"),
                    effects: EffectVector::default(),
                },
            ],
        }
    }

    #[test]
    fn modifier_scaling_rounds_half_away_from_zero() {
        let mods = CharacterMods {
            economy: 1.3,
            ..CharacterMods::default()
        };
        let raw = EffectVector {
            economy: -10,
            ..EffectVector::default()
        };
        let scaled = scale_effects(&raw, &mods);
        assert_eq!(scaled.economy, -13, "round(-10 * 1.3)");

        let mods = CharacterMods {
            popularity: 0.85,
            ..CharacterMods::default()
        };
        let raw = EffectVector {
            popularity: 10,
            ..EffectVector::default()
        };
        assert_eq!(scale_effects(&raw, &mods).popularity, 9, "round(8.5) away from zero");
    }

    #[test]
    fn out_of_range_option_is_a_contract_violation() {
        let card = card_with(EffectVector::default(), CardCategory::Domestic);
        let mods = CharacterMods::default();
        let mut state = SessionState::default();
        let err = resolve(&card, 5, &mods, &mut state).unwrap_err();
        assert_eq!(
            err,
            ResolveError::OptionOutOfRange {
                index: 5,
                available: 2
            }
        );
    }

    #[test]
    fn positive_outcome_extends_streak() {
        let card = card_with(
            EffectVector {
                popularity: 5,
                economy: 2,
                ..EffectVector::default()
            },
            CardCategory::Domestic,
        );
        let mut state = SessionState::default();
        let resolution = resolve(&card, 0, &CharacterMods::default(), &mut state).unwrap();
        assert_eq!(resolution.total_change, 7);
        assert_eq!(state.streak, 1);
        assert_eq!(state.chaos, 1, "per-turn chaos drift");
    }

    #[test]
    fn disaster_resets_streak_and_bumps_chaos() {
        let card = card_with(
            EffectVector {
                popularity: -12,
                stability: -10,
                ..EffectVector::default()
            },
            CardCategory::Domestic,
        );
        let mut state = SessionState::default();
        state.streak = 4;
        let resolution = resolve(&card, 0, &CharacterMods::default(), &mut state).unwrap();
        assert_eq!(resolution.total_change, -22);
        assert_eq!(state.streak, 0);
        assert_eq!(state.chaos, 6, "disaster bump plus per-turn drift");
        assert!(state.logs.iter().any(|l| l == LOG_STREAK_BROKEN));
    }

    #[test]
    fn mildly_negative_outcome_leaves_streak_alone() {
        let card = card_with(
            EffectVector {
                media: -5,
                ..EffectVector::default()
            },
            CardCategory::Domestic,
        );
        let mut state = SessionState::default();
        state.streak = 2;
        resolve(&card, 0, &CharacterMods::default(), &mut state).unwrap();
        assert_eq!(state.streak, 2);
        assert_eq!(state.chaos, 1);
    }

    #[test]
    fn absurd_cards_are_counted() {
        let card = card_with(EffectVector::default(), CardCategory::Absurd);
        let mut state = SessionState::default();
        resolve(&card, 0, &CharacterMods::default(), &mut state).unwrap();
        resolve(&card, 1, &CharacterMods::default(), &mut state).unwrap();
        assert_eq!(state.absurd_cards_seen, 2);
    }

    #[test]
    fn resolution_reports_clamped_changes() {
        let card = card_with(
            EffectVector {
                popularity: -60,
                ..EffectVector::default()
            },
            CardCategory::Domestic,
        );
        let mut state = SessionState::default();
        let resolution = resolve(&card, 0, &CharacterMods::default(), &mut state).unwrap();
        assert_eq!(resolution.final_delta.popularity, -60, "pre-clamp delta");
        assert_eq!(resolution.resources.popularity, 0);
        assert_eq!(resolution.changes.len(), 1);
        assert_eq!(resolution.changes[0].applied(), -50, "post-clamp effect");
    }
}
