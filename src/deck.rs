//! Deck sequencing: fair non-repeating card draws with crisis injection.

use rand::Rng;

use crate::constants::CRISIS_CHANCE_DIVISOR;
use crate::data::{CardCatalog, DecisionCard};
use crate::rng::RngBundle;

/// Where a drawn card came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawSource {
    /// Normal draw advancing the deck cursor.
    Deck,
    /// Crisis override; does not consume a deck slot.
    CrisisPool,
}

/// A card handed to the session for the current turn.
#[derive(Debug, Clone, PartialEq)]
pub struct Draw {
    pub card: DecisionCard,
    pub source: DrawSource,
}

/// Produces a fair, non-repeating stream of cards for one session.
///
/// The working deck is a shuffled copy of the active catalog; the crisis
/// pool is drawn from independently and never consumes deck slots. When
/// the catalog has no playable cards at all, the compiled-in fallback pair
/// becomes the deck, so the sequencer never returns a card with fewer
/// than two options.
#[derive(Debug, Clone)]
pub struct DeckSequencer {
    deck: Vec<DecisionCard>,
    crises: Vec<DecisionCard>,
    cursor: usize,
    degenerate: bool,
}

impl DeckSequencer {
    #[must_use]
    pub fn new(catalog: &CardCatalog) -> Self {
        let degenerate = catalog.is_empty();
        let deck = if degenerate {
            CardCatalog::fallback_deck()
        } else {
            catalog.decisions().to_vec()
        };
        Self {
            deck,
            crises: catalog.crises().to_vec(),
            cursor: 0,
            // cursor at deck length forces a shuffle on the first draw
            degenerate,
        }
        .with_exhausted_cursor()
    }

    fn with_exhausted_cursor(mut self) -> Self {
        self.cursor = self.deck.len();
        self
    }

    /// Rebuild a sequencer mid-pass from a persisted arrangement.
    ///
    /// `order` is the deck's card ids in their saved arrangement and
    /// `cursor` the position within it. If the saved order no longer
    /// matches the catalog (a card renamed or removed since the save),
    /// the sequencer starts a fresh pass instead.
    #[must_use]
    pub fn resume(catalog: &CardCatalog, order: &[String], cursor: usize) -> Self {
        let fresh = Self::new(catalog);
        if order.len() != fresh.deck.len() {
            return fresh;
        }
        let mut remaining = fresh.deck.clone();
        let mut deck = Vec::with_capacity(order.len());
        for id in order {
            let Some(pos) = remaining.iter().position(|card| &card.id == id) else {
                return fresh;
            };
            deck.push(remaining.swap_remove(pos));
        }
        Self {
            cursor: cursor.min(deck.len()),
            deck,
            crises: fresh.crises,
            degenerate: fresh.degenerate,
        }
    }

    /// Position within the current pass.
    #[must_use]
    pub const fn cursor(&self) -> usize {
        self.cursor
    }

    /// Card ids in their current arrangement, for persistence.
    #[must_use]
    pub fn order(&self) -> Vec<String> {
        self.deck.iter().map(|card| card.id.clone()).collect()
    }

    /// Whether the active catalog had no playable cards.
    #[must_use]
    pub const fn is_degenerate(&self) -> bool {
        self.degenerate
    }

    /// Cards remaining before the next reshuffle.
    #[must_use]
    pub const fn remaining(&self) -> usize {
        self.deck.len().saturating_sub(self.cursor)
    }

    fn reshuffle<R: Rng>(&mut self, rng: &mut R) {
        // Fisher-Yates
        for i in (1..self.deck.len()).rev() {
            let j = rng.gen_range(0..=i);
            self.deck.swap(i, j);
        }
        self.cursor = 0;
    }

    /// Draw the card for the next turn.
    ///
    /// `chaos` drives the crisis override probability (`chaos / 200`);
    /// `last_seen` is the most recent history entry and is never returned
    /// again on the immediately following turn, including across a
    /// reshuffle boundary.
    pub fn next_card(&mut self, chaos: i32, last_seen: Option<&str>, rng: &RngBundle) -> Draw {
        if let Some(card) = self.roll_crisis(chaos, last_seen, rng) {
            return Draw {
                card,
                source: DrawSource::CrisisPool,
            };
        }

        let mut deck_rng = rng.deck();
        if self.cursor >= self.deck.len() {
            self.reshuffle(&mut *deck_rng);
        }

        if self.deck.len() > 1
            && last_seen == Some(self.deck[self.cursor].id.as_str())
            && self.cursor + 1 < self.deck.len()
        {
            // Swap the clashing card one slot forward: the replacement is
            // drawn now, the skipped card next, keeping a full pass at
            // exactly one appearance per card.
            self.deck.swap(self.cursor, self.cursor + 1);
        }

        let card = self.deck[self.cursor].clone();
        self.cursor += 1;
        Draw {
            card,
            source: DrawSource::Deck,
        }
    }

    fn roll_crisis(
        &self,
        chaos: i32,
        last_seen: Option<&str>,
        rng: &RngBundle,
    ) -> Option<DecisionCard> {
        if self.crises.is_empty() {
            return None;
        }
        let chance = f64::from(chaos.max(0)) / CRISIS_CHANCE_DIVISOR;
        let mut crisis_rng = rng.crisis();
        if crisis_rng.gen_range(0.0..1.0) >= chance {
            return None;
        }
        let idx = crisis_rng.gen_range(0..self.crises.len());
        let card = &self.crises[idx];
        if last_seen == Some(card.id.as_str()) {
            // Uniform redraw one slot over keeps consecutive turns distinct
            // even when the crisis pool is tiny.
            if self.crises.len() == 1 {
                return None;
            }
            let next = (idx + 1) % self.crises.len();
            return Some(self.crises[next].clone());
        }
        Some(card.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{CardCategory, CardOption, DecisionCard};
    use crate::resources::EffectVector;
    use std::collections::HashMap;

    fn card(id: &str, category: CardCategory) -> DecisionCard {
        DecisionCard {
            id: id.to_string(),
            title: format!("Card {id}"),
            text: String::from("desc"),
            category,
            options: vec![
                CardOption {
                    label: String::from("Yes"),
                    effects: EffectVector::default(),
                },
                CardOption {
                    label: String::from("No"),
                    effects: EffectVector::default(),
                },
            ],
        }
    }

    fn catalog(ids: &[&str]) -> CardCatalog {
        CardCatalog::from_cards(
            ids.iter()
                .map(|id| card(id, CardCategory::Domestic))
                .collect(),
        )
    }

    fn drive(sequencer: &mut DeckSequencer, rng: &RngBundle, turns: usize) -> Vec<String> {
        let mut seen = Vec::new();
        let mut last: Option<String> = None;
        for _ in 0..turns {
            let draw = sequencer.next_card(0, last.as_deref(), rng);
            last = Some(draw.card.id.clone());
            seen.push(draw.card.id.clone());
        }
        seen
    }

    #[test]
    fn no_consecutive_repeats_across_reshuffles() {
        // chaos 0 keeps the crisis override silent; satire cards are
        // appended to the custom set, so the deck is larger than `ids`.
        let catalog = catalog(&["a", "b", "c", "d"]);
        for seed in 0..20 {
            let rng = RngBundle::from_user_seed(seed);
            let mut sequencer = DeckSequencer::new(&catalog);
            let seen = drive(&mut sequencer, &rng, 60);
            for pair in seen.windows(2) {
                assert_ne!(pair[0], pair[1], "repeat with seed {seed}");
            }
        }
    }

    #[test]
    fn full_pass_draws_every_card_exactly_once() {
        let catalog = catalog(&["a", "b", "c", "d", "e"]);
        let deck_size = catalog.decisions().len();
        let rng = RngBundle::from_user_seed(11);
        let mut sequencer = DeckSequencer::new(&catalog);

        let seen = drive(&mut sequencer, &rng, deck_size);
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for id in &seen {
            *counts.entry(id.as_str()).or_default() += 1;
        }
        assert_eq!(counts.len(), deck_size);
        assert!(counts.values().all(|&n| n == 1), "uneven pass: {counts:?}");
    }

    #[test]
    fn degenerate_catalog_serves_playable_fallbacks() {
        let empty = CardCatalog::empty();
        let rng = RngBundle::from_user_seed(3);
        let mut sequencer = DeckSequencer::new(&empty);
        assert!(sequencer.is_degenerate());

        let seen = drive(&mut sequencer, &rng, 10);
        for pair in seen.windows(2) {
            assert_ne!(pair[0], pair[1]);
        }
        let mut last = None;
        for _ in 0..4 {
            let draw = sequencer.next_card(0, last, &rng);
            assert!(draw.card.options.len() >= 2);
            last = None;
        }
    }

    #[test]
    fn resume_restores_the_pass_in_progress() {
        let catalog = catalog(&["a", "b", "c", "d", "e"]);
        let rng = RngBundle::from_user_seed(17);
        let mut sequencer = DeckSequencer::new(&catalog);
        let mut last: Option<String> = None;
        for _ in 0..3 {
            last = Some(sequencer.next_card(0, last.as_deref(), &rng).card.id.clone());
        }

        let order = sequencer.order();
        let cursor = sequencer.cursor();
        let resumed_rng = RngBundle::resume(17, rng.positions());
        let mut resumed = DeckSequencer::resume(&catalog, &order, cursor);
        assert_eq!(resumed.remaining(), sequencer.remaining());

        let mut resumed_last = last.clone();
        for _ in 0..10 {
            let expected = sequencer.next_card(0, last.as_deref(), &rng).card.id;
            let got = resumed
                .next_card(0, resumed_last.as_deref(), &resumed_rng)
                .card
                .id;
            assert_eq!(expected, got);
            last = Some(expected);
            resumed_last = Some(got);
        }
    }

    #[test]
    fn resume_with_a_stale_order_starts_a_fresh_pass() {
        let catalog = catalog(&["a", "b"]);
        let resumed = DeckSequencer::resume(&catalog, &[String::from("ghost")], 1);
        assert!(!resumed.is_degenerate());
        assert_eq!(resumed.remaining(), 0, "fresh pass shuffles on first draw");
    }

    #[test]
    fn max_chaos_caps_crisis_chance_at_half() {
        let mut cards: Vec<DecisionCard> = ["a", "b", "c"]
            .iter()
            .map(|id| card(id, CardCategory::Domestic))
            .collect();
        cards.push(card("crisis-1", CardCategory::Crisis));
        cards.push(card("crisis-2", CardCategory::Crisis));
        let catalog = CardCatalog::from_cards(cards);

        let rng = RngBundle::from_user_seed(5);
        let mut sequencer = DeckSequencer::new(&catalog);
        let mut crisis_draws = 0_u32;
        let turns = 600;
        let mut last: Option<String> = None;
        for _ in 0..turns {
            let draw = sequencer.next_card(100, last.as_deref(), &rng);
            if draw.source == DrawSource::CrisisPool {
                crisis_draws += 1;
            }
            last = Some(draw.card.id.clone());
        }
        let ratio = f64::from(crisis_draws) / f64::from(turns);
        assert!(
            (0.4..0.6).contains(&ratio),
            "expected roughly half crisis draws, got {ratio:.3}"
        );
    }

    #[test]
    fn zero_chaos_never_draws_crisis() {
        let mut cards = vec![card("a", CardCategory::Domestic)];
        cards.push(card("b", CardCategory::Domestic));
        cards.push(card("crisis-1", CardCategory::Crisis));
        let catalog = CardCatalog::from_cards(cards);

        let rng = RngBundle::from_user_seed(8);
        let mut sequencer = DeckSequencer::new(&catalog);
        let mut last: Option<String> = None;
        for _ in 0..50 {
            let draw = sequencer.next_card(0, last.as_deref(), &rng);
            assert_eq!(draw.source, DrawSource::Deck);
            last = Some(draw.card.id.clone());
        }
    }

    #[test]
    fn crisis_draws_do_not_consume_deck_slots() {
        let mut cards: Vec<DecisionCard> = ["a", "b", "c", "d"]
            .iter()
            .map(|id| card(id, CardCategory::Domestic))
            .collect();
        cards.push(card("crisis-1", CardCategory::Crisis));
        let catalog = CardCatalog::from_cards(cards);
        let deck_size = catalog.decisions().len();

        let rng = RngBundle::from_user_seed(21);
        let mut sequencer = DeckSequencer::new(&catalog);
        let mut deck_ids = Vec::new();
        let mut last: Option<String> = None;
        while deck_ids.len() < deck_size {
            let draw = sequencer.next_card(100, last.as_deref(), &rng);
            if draw.source == DrawSource::Deck {
                deck_ids.push(draw.card.id.clone());
            }
            last = Some(draw.card.id.clone());
        }
        let mut unique = deck_ids.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(unique.len(), deck_size, "deck pass disturbed by crises");
    }
}
