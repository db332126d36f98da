//! Deterministic, domain-separated random streams for the simulation.
//!
//! Deck shuffling and crisis rolls consume independent streams so that a
//! crisis override never perturbs the deck permutation. Given a fixed user
//! seed the whole engine replays identically.

use hmac::{Hmac, Mac};
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use std::cell::{RefCell, RefMut};

fn derive_stream_seed(user_seed: u64, domain_tag: &[u8]) -> u64 {
    let mut mac =
        Hmac::<Sha256>::new_from_slice(&user_seed.to_le_bytes()).expect("64-bit seed is valid key");
    mac.update(domain_tag);
    let digest = mac.finalize().into_bytes();
    let seed_bytes: [u8; 8] = digest[..8].try_into().expect("digest slice length");
    u64::from_le_bytes(seed_bytes)
}

/// Counting wrapper for RNG streams providing draw instrumentation.
#[derive(Debug, Clone)]
pub struct CountingRng<R> {
    rng: R,
    draws: u64,
}

impl CountingRng<ChaCha20Rng> {
    fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha20Rng::seed_from_u64(seed),
            draws: 0,
        }
    }

    /// Current word position within the ChaCha stream.
    #[must_use]
    pub fn word_pos(&self) -> u128 {
        self.rng.get_word_pos()
    }

    fn seek(&mut self, word_pos: u128) {
        self.rng.set_word_pos(word_pos);
    }
}

/// Word positions of every stream, captured at save time so a resumed
/// session continues the streams instead of replaying them from the top.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StreamPositions {
    #[serde(default)]
    pub deck: u128,
    #[serde(default)]
    pub crisis: u128,
}

impl<R: rand::RngCore> CountingRng<R> {
    /// Number of draw calls performed against this stream.
    #[must_use]
    pub const fn draws(&self) -> u64 {
        self.draws
    }
}

impl<R: rand::RngCore> rand::RngCore for CountingRng<R> {
    fn next_u32(&mut self) -> u32 {
        self.draws = self.draws.saturating_add(1);
        self.rng.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.draws = self.draws.saturating_add(1);
        self.rng.next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.draws = self.draws.saturating_add(1);
        self.rng.fill_bytes(dest);
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.draws = self.draws.saturating_add(1);
        self.rng.try_fill_bytes(dest)
    }
}

/// Named random streams derived from one user-visible seed.
#[derive(Debug, Clone)]
pub struct RngBundle {
    deck: RefCell<CountingRng<ChaCha20Rng>>,
    crisis: RefCell<CountingRng<ChaCha20Rng>>,
}

impl RngBundle {
    /// Construct the bundle from a user-visible seed.
    #[must_use]
    pub fn from_user_seed(seed: u64) -> Self {
        let deck = CountingRng::new(derive_stream_seed(seed, b"deck"));
        let crisis = CountingRng::new(derive_stream_seed(seed, b"crisis"));
        Self {
            deck: RefCell::new(deck),
            crisis: RefCell::new(crisis),
        }
    }

    /// Rebuild the bundle with every stream wound forward to a previously
    /// captured position.
    #[must_use]
    pub fn resume(seed: u64, positions: StreamPositions) -> Self {
        let bundle = Self::from_user_seed(seed);
        bundle.deck.borrow_mut().seek(positions.deck);
        bundle.crisis.borrow_mut().seek(positions.crisis);
        bundle
    }

    /// Capture the current position of every stream for persistence.
    #[must_use]
    pub fn positions(&self) -> StreamPositions {
        StreamPositions {
            deck: self.deck.borrow().word_pos(),
            crisis: self.crisis.borrow().word_pos(),
        }
    }

    /// Access the deck shuffle/draw stream.
    #[must_use]
    pub fn deck(&self) -> RefMut<'_, CountingRng<ChaCha20Rng>> {
        self.deck.borrow_mut()
    }

    /// Access the crisis override stream.
    #[must_use]
    pub fn crisis(&self) -> RefMut<'_, CountingRng<ChaCha20Rng>> {
        self.crisis.borrow_mut()
    }
}
