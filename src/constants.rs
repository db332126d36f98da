//! Centralized balance and tuning constants for Mandate game logic.
//!
//! These values define the deterministic math for the core simulation.
//! Keeping them together ensures that gameplay can only be adjusted via
//! code changes reviewed in version control, rather than through external
//! JSON assets.

// Logging keys -------------------------------------------------------------
pub(crate) const LOG_SESSION_START: &str = "log.session.start";
pub(crate) const LOG_CARD_INVALID: &str = "log.catalog.card-invalid";
pub(crate) const LOG_DECK_FALLBACK_CARD: &str = "log.deck.fallback-card";
pub(crate) const LOG_CRISIS_DRAWN: &str = "log.deck.crisis";
pub(crate) const LOG_STREAK_BROKEN: &str = "log.resolve.streak-broken";
pub(crate) const LOG_GAME_OVER: &str = "log.session.game-over";
pub(crate) const LOG_TERM_LIMIT: &str = "log.session.term-limit";
pub(crate) const LOG_ENDING_PREFIX: &str = "log.ending.";

// Resource bounds ----------------------------------------------------------
pub(crate) const RESOURCE_MIN: i32 = 0;
pub(crate) const RESOURCE_MAX: i32 = 100;
pub(crate) const DEFAULT_RESOURCE_VALUE: i32 = 50;

// Session tuning -----------------------------------------------------------
pub(crate) const TURN_LIMIT: u32 = 100;
pub(crate) const HISTORY_CAP: usize = 12;
pub(crate) const CHAOS_MAX: i32 = 100;
pub(crate) const CHAOS_PER_TURN: i32 = 1;
pub(crate) const CHAOS_DISASTER_BUMP: i32 = 5;
pub(crate) const DISASTER_TOTAL_THRESHOLD: i32 = -20;

// Deck tuning --------------------------------------------------------------
pub(crate) const CRISIS_CHANCE_DIVISOR: f64 = 200.0;

// Cascade tuning -----------------------------------------------------------
pub(crate) const CASCADE_FLOOR: i32 = 20;
pub(crate) const CASCADE_BOOM_CEILING: i32 = 80;
pub(crate) const CASCADE_BOOM_STREAK: u32 = 3;
pub(crate) const CASCADE_COOLDOWN_TURNS: u8 = 3;
pub(crate) const CHAOS_CASCADE_BUMP: i32 = 10;
