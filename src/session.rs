//! Session state and the turn controller that drives a full game.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use thiserror::Error;

use crate::cascade::{self, CascadeHit};
use crate::characters::{Character, CharacterMods};
use crate::constants::{
    CHAOS_MAX, HISTORY_CAP, LOG_CARD_INVALID, LOG_CRISIS_DRAWN, LOG_DECK_FALLBACK_CARD,
    LOG_ENDING_PREFIX, LOG_GAME_OVER, LOG_SESSION_START, LOG_TERM_LIMIT, TURN_LIMIT,
};
use crate::data::{CardCatalog, DecisionCard};
use crate::deck::{DeckSequencer, DrawSource};
use crate::endings::{self, EndingRule};
use crate::resolver::{self, ResolveError, Resolution};
use crate::resources::{EffectVector, ResourceKind, ResourceSet};
use crate::rng::{RngBundle, StreamPositions};

/// Coarse lifecycle phase of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GamePhase {
    #[default]
    Title,
    Menu,
    CharacterSelection,
    Playing,
    Ended,
}

impl GamePhase {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Menu => "menu",
            Self::CharacterSelection => "character_selection",
            Self::Playing => "playing",
            Self::Ended => "ended",
        }
    }
}

impl fmt::Display for GamePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Complete serializable snapshot of one playthrough.
///
/// Everything the controller needs to resume a session lives here,
/// including the deck arrangement and random stream positions, so a
/// resumed session continues exactly where the saved one stopped.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SessionState {
    #[serde(default)]
    pub phase: GamePhase,
    #[serde(default)]
    pub seed: u64,
    #[serde(default)]
    pub character_id: Option<String>,
    #[serde(default)]
    pub mods: CharacterMods,
    #[serde(default)]
    pub resources: ResourceSet,
    /// Turn number, counted from 1 once play begins.
    #[serde(default)]
    pub turn: u32,
    #[serde(default)]
    pub streak: u32,
    #[serde(default)]
    pub chaos: i32,
    /// Recently drawn card ids, newest last, capped.
    #[serde(default)]
    pub history: Vec<String>,
    #[serde(default)]
    pub absurd_cards_seen: u32,
    #[serde(default)]
    pub crisis_cards_seen: u32,
    #[serde(default)]
    pub cascades_triggered: u32,
    #[serde(default)]
    pub cascade_cooldown: u8,
    /// Cascade keys currently latched (fired and not yet cleared).
    #[serde(default)]
    pub active_cascades: HashSet<String>,
    #[serde(default)]
    pub ending_id: Option<String>,
    /// Structured log keys accumulated over the session.
    #[serde(default)]
    pub logs: Vec<String>,
    /// Deck arrangement at save time, so a resume continues the pass.
    #[serde(default)]
    pub deck_order: Vec<String>,
    #[serde(default)]
    pub deck_cursor: usize,
    #[serde(default)]
    pub rng_positions: StreamPositions,
}

impl SessionState {
    /// Raise (or lower) chaos, clamped to `0..=100`.
    pub fn bump_chaos(&mut self, amount: i32) {
        self.chaos = (self.chaos + amount).clamp(0, CHAOS_MAX);
    }

    /// Record a drawn card id, evicting the oldest past the cap.
    pub fn push_history(&mut self, card_id: String) {
        self.history.push(card_id);
        if self.history.len() > HISTORY_CAP {
            self.history.remove(0);
        }
    }
}

/// Errors surfaced by the session controller.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("operation not valid in phase '{phase}'")]
    WrongPhase { phase: GamePhase },
    #[error("no card has been drawn this turn")]
    NoCardDrawn,
    #[error(transparent)]
    Resolve(#[from] ResolveError),
}

/// Notable things that happened during one submitted choice, in order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum GameEvent {
    ResourceChanged {
        kind: ResourceKind,
        old: i32,
        new: i32,
    },
    CascadeFired {
        key: String,
        message: String,
        effects: EffectVector,
    },
    EndingSelected {
        id: String,
    },
}

/// Everything produced by resolving one turn.
#[derive(Debug, Clone, PartialEq)]
pub struct TurnOutcome {
    pub resolution: Resolution,
    pub cascade: Option<CascadeHit>,
    pub ending: Option<&'static EndingRule>,
    pub events: Vec<GameEvent>,
}

/// Drives one playthrough: phase transitions, draws, and turn resolution.
pub struct SessionController {
    state: SessionState,
    sequencer: DeckSequencer,
    rng: RngBundle,
    current_card: Option<DecisionCard>,
    rejected: Vec<String>,
}

impl SessionController {
    /// Start a fresh session over the given catalog.
    #[must_use]
    pub fn new(catalog: &CardCatalog, seed: u64) -> Self {
        let state = SessionState {
            seed,
            ..SessionState::default()
        };
        Self {
            state,
            sequencer: DeckSequencer::new(catalog),
            rng: RngBundle::from_user_seed(seed),
            current_card: None,
            rejected: catalog.rejected().to_vec(),
        }
    }

    /// Resume from a saved snapshot.
    ///
    /// The deck pass and the random streams pick up at their saved
    /// positions, so a resumed session draws the same cards the
    /// uninterrupted one would have. A snapshot whose deck arrangement no
    /// longer matches the catalog falls back to a fresh pass.
    #[must_use]
    pub fn from_state(catalog: &CardCatalog, state: SessionState) -> Self {
        let rng = RngBundle::resume(state.seed, state.rng_positions);
        let sequencer = DeckSequencer::resume(catalog, &state.deck_order, state.deck_cursor);
        Self {
            state,
            sequencer,
            rng,
            current_card: None,
            rejected: catalog.rejected().to_vec(),
        }
    }

    fn require_phase(&self, phase: GamePhase) -> Result<(), SessionError> {
        if self.state.phase == phase {
            Ok(())
        } else {
            Err(SessionError::WrongPhase {
                phase: self.state.phase,
            })
        }
    }

    /// Title screen to main menu.
    pub fn open_menu(&mut self) -> Result<(), SessionError> {
        self.require_phase(GamePhase::Title)?;
        self.state.phase = GamePhase::Menu;
        Ok(())
    }

    /// Main menu to the character roster.
    pub fn start_character_selection(&mut self) -> Result<(), SessionError> {
        self.require_phase(GamePhase::Menu)?;
        self.state.phase = GamePhase::CharacterSelection;
        Ok(())
    }

    /// Lock in a character and enter play.
    ///
    /// Resources reset to the character's starting profile and the
    /// session log records the start plus any catalog complaints.
    pub fn select_character(&mut self, character: &Character) -> Result<(), SessionError> {
        self.require_phase(GamePhase::CharacterSelection)?;
        self.state.resources.reset(character.start);
        self.state.mods = character.mods;
        self.state.character_id = Some(character.id.clone());
        self.state.turn = 1;
        self.state.phase = GamePhase::Playing;
        self.state.logs.push(String::from(LOG_SESSION_START));
        if self.sequencer.is_degenerate() {
            self.state.logs.push(String::from(LOG_DECK_FALLBACK_CARD));
        }
        for rejected in &self.rejected {
            self.state.logs.push(format!("{LOG_CARD_INVALID}:{rejected}"));
        }
        Ok(())
    }

    /// Draw the card for the current turn.
    ///
    /// Replaces any undrawn card already on the table. Crisis draws are
    /// counted and logged but never consume a deck slot.
    pub fn draw_card(&mut self) -> Result<&DecisionCard, SessionError> {
        self.require_phase(GamePhase::Playing)?;
        let last_seen = self.state.history.last().map(String::as_str);
        let draw = self
            .sequencer
            .next_card(self.state.chaos, last_seen, &self.rng);
        if draw.source == DrawSource::CrisisPool {
            self.state.crisis_cards_seen += 1;
            self.state.logs.push(String::from(LOG_CRISIS_DRAWN));
        }
        self.state.push_history(draw.card.id.clone());
        Ok(&*self.current_card.insert(draw.card))
    }

    /// The card awaiting a choice, if one has been drawn.
    #[must_use]
    pub fn current_card(&self) -> Option<&DecisionCard> {
        self.current_card.as_ref()
    }

    /// Resolve the player's choice for the drawn card.
    ///
    /// Runs the full turn pipeline: resolution, cascade check, collapse
    /// short-circuit, then turn advance and the term-limit check. On an
    /// out-of-range option the drawn card stays on the table.
    pub fn submit_choice(&mut self, option_index: usize) -> Result<TurnOutcome, SessionError> {
        self.require_phase(GamePhase::Playing)?;
        let card = self
            .current_card
            .clone()
            .ok_or(SessionError::NoCardDrawn)?;

        let mods = self.state.mods;
        let resolution = resolver::resolve(&card, option_index, &mods, &mut self.state)?;
        self.current_card = None;

        if self.state.cascade_cooldown > 0 {
            self.state.cascade_cooldown -= 1;
        }

        let mut events: Vec<GameEvent> = resolution
            .changes
            .iter()
            .map(|change| GameEvent::ResourceChanged {
                kind: change.kind,
                old: change.old,
                new: change.new,
            })
            .collect();

        let cascade = cascade::check(&mut self.state);
        if let Some(hit) = &cascade {
            events.push(GameEvent::CascadeFired {
                key: hit.key.clone(),
                message: hit.message.clone(),
                effects: hit.effects,
            });
            events.extend(hit.changes.iter().map(|change| GameEvent::ResourceChanged {
                kind: change.kind,
                old: change.old,
                new: change.new,
            }));
        }

        let ending = if self.state.resources.any_zero() {
            Some(endings::select_ending(&self.state))
        } else if self.state.turn >= TURN_LIMIT {
            self.state.logs.push(String::from(LOG_TERM_LIMIT));
            Some(endings::select_ending(&self.state))
        } else {
            self.state.turn += 1;
            None
        };

        if let Some(rule) = ending {
            self.state.phase = GamePhase::Ended;
            self.state.ending_id = Some(String::from(rule.id));
            self.state
                .logs
                .push(format!("{LOG_ENDING_PREFIX}{}", rule.id));
            self.state.logs.push(String::from(LOG_GAME_OVER));
            events.push(GameEvent::EndingSelected {
                id: String::from(rule.id),
            });
        }

        Ok(TurnOutcome {
            resolution,
            cascade,
            ending,
            events,
        })
    }

    /// Read access to the live state.
    #[must_use]
    pub const fn state(&self) -> &SessionState {
        &self.state
    }

    /// Point-in-time copy for persistence, with the deck arrangement and
    /// stream positions folded in so `from_state` can continue the run.
    #[must_use]
    pub fn snapshot(&self) -> SessionState {
        let mut state = self.state.clone();
        state.deck_order = self.sequencer.order();
        state.deck_cursor = self.sequencer.cursor();
        state.rng_positions = self.rng.positions();
        state
    }

    /// Consume the controller, keeping only the resumable state.
    #[must_use]
    pub fn into_state(self) -> SessionState {
        self.snapshot()
    }
}
