//! Decision card typing and catalog loading.

use serde::{Deserialize, Serialize};

use crate::resources::EffectVector;

const DEFAULT_CARD_DATA: &str = include_str!("../assets/data/cards.json");
const SATIRE_CARD_DATA: &str = include_str!("../assets/data/satire.json");

/// Broad flavor tag for a decision card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CardCategory {
    #[default]
    Domestic,
    Foreign,
    Economic,
    Social,
    Crisis,
    Scandal,
    Absurd,
}

impl CardCategory {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Domestic => "domestic",
            Self::Foreign => "foreign",
            Self::Economic => "economic",
            Self::Social => "social",
            Self::Crisis => "crisis",
            Self::Scandal => "scandal",
            Self::Absurd => "absurd",
        }
    }
}

/// One selectable option on a card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardOption {
    pub label: String,
    #[serde(default)]
    pub effects: EffectVector,
}

/// A decision scenario presented to the player. Immutable after load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionCard {
    pub id: String,
    pub title: String,
    pub text: String,
    #[serde(default)]
    pub category: CardCategory,
    #[serde(default)]
    pub options: Vec<CardOption>,
}

impl DecisionCard {
    /// A card needs at least two options to be playable.
    #[must_use]
    pub fn is_playable(&self) -> bool {
        self.options.len() >= 2
    }
}

/// Raw card list as shipped in assets or fetched externally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct CardList {
    pub cards: Vec<DecisionCard>,
}

impl CardList {
    /// Parse a card list from JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON cannot be parsed into valid card data.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Validated catalog of decision cards plus the separate crisis pool.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CardCatalog {
    decisions: Vec<DecisionCard>,
    crises: Vec<DecisionCard>,
    /// Ids of cards rejected at load for having fewer than two options.
    rejected: Vec<String>,
}

impl CardCatalog {
    /// Build a catalog from a main card list; crisis-category cards are
    /// routed to the separate crisis pool, unplayable cards are excluded.
    /// The bundled satirical set is always appended.
    #[must_use]
    pub fn from_cards(main: Vec<DecisionCard>) -> Self {
        let satire = CardList::from_json(SATIRE_CARD_DATA).unwrap_or_default();
        let mut catalog = Self::default();
        for card in main.into_iter().chain(satire.cards) {
            catalog.admit(card);
        }
        catalog
    }

    /// Load the bundled static catalog.
    #[must_use]
    pub fn load_from_static() -> Self {
        let main = CardList::from_json(DEFAULT_CARD_DATA).unwrap_or_default();
        Self::from_cards(main.cards)
    }

    /// Build a catalog from an externally fetched card list, falling back
    /// to the bundled set when the external data is empty or malformed.
    /// Never surfaces the failure to the player.
    #[must_use]
    pub fn from_external(json: &str) -> Self {
        match CardList::from_json(json) {
            Ok(list) if !list.cards.is_empty() => Self::from_cards(list.cards),
            _ => Self::load_from_static(),
        }
    }

    fn admit(&mut self, card: DecisionCard) {
        if !card.is_playable() {
            self.rejected.push(card.id);
            return;
        }
        if card.category == CardCategory::Crisis {
            self.crises.push(card);
        } else {
            self.decisions.push(card);
        }
    }

    /// Normal decision cards, in load order.
    #[must_use]
    pub fn decisions(&self) -> &[DecisionCard] {
        &self.decisions
    }

    /// Crisis cards; drawn from their own pool, never from the deck.
    #[must_use]
    pub fn crises(&self) -> &[DecisionCard] {
        &self.crises
    }

    /// Ids rejected at load time, for diagnostics.
    #[must_use]
    pub fn rejected(&self) -> &[String] {
        &self.rejected
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.decisions.is_empty()
    }

    /// Compiled-in deck used when no valid cards survive loading. Two
    /// cards, so the anti-repeat guarantee holds even for a degenerate
    /// catalog.
    #[must_use]
    pub fn fallback_deck() -> Vec<DecisionCard> {
        vec![
            Self::fallback_card(),
            DecisionCard {
                id: String::from("fallback-suggestion-box"),
                title: String::from("The Suggestion Box"),
                text: String::from(
                    "The palace suggestion box contains one note: 'more cards'. \
                     Someone should look into that.",
                ),
                category: CardCategory::Domestic,
                options: vec![
                    CardOption {
                        label: String::from("Commission a committee"),
                        effects: EffectVector {
                            stability: 1,
                            economy: -1,
                            ..EffectVector::default()
                        },
                    },
                    CardOption {
                        label: String::from("Lose the key"),
                        effects: EffectVector {
                            media: -1,
                            popularity: 1,
                            ..EffectVector::default()
                        },
                    },
                ],
            },
        ]
    }

    /// Compiled-in card guaranteed to be playable. This is the safety net
    /// for a degenerate catalog: the sequencer hands it out rather than
    /// leaving the game stuck.
    #[must_use]
    pub fn fallback_card() -> DecisionCard {
        DecisionCard {
            id: String::from("fallback-quiet-day"),
            title: String::from("A Quiet Day"),
            text: String::from(
                "Nothing is on fire. Your advisors suggest either taking credit \
                 for the calm or preemptively blaming the opposition for it.",
            ),
            category: CardCategory::Domestic,
            options: vec![
                CardOption {
                    label: String::from("Take credit"),
                    effects: EffectVector {
                        popularity: 2,
                        media: -1,
                        ..EffectVector::default()
                    },
                },
                CardOption {
                    label: String::from("Blame the opposition"),
                    effects: EffectVector {
                        stability: -1,
                        media: 2,
                        ..EffectVector::default()
                    },
                },
            ],
        }
    }

    /// Empty catalog (useful for tests).
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            decisions: Vec::new(),
            crises: Vec::new(),
            rejected: Vec::new(),
        }
    }
}
