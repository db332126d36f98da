//! Mandate Game Engine
//!
//! Platform-agnostic core logic for Mandate, a satirical political
//! decision-card game. This crate provides all game mechanics without UI
//! or platform-specific dependencies.

pub mod cascade;
pub mod characters;
mod constants;
pub mod data;
pub mod deck;
pub mod endings;
pub mod numbers;
pub mod resolver;
pub mod resources;
pub mod rng;
pub mod session;

// Re-export commonly used types
pub use cascade::CascadeHit;
pub use characters::{Character, CharacterList, CharacterMods};
pub use data::{CardCatalog, CardCategory, CardOption, DecisionCard};
pub use deck::{DeckSequencer, Draw, DrawSource};
pub use endings::{EndingRule, Rank, SpecialCounter, Trigger, select_ending};
pub use resolver::{Resolution, ResolveError, resolve};
pub use resources::{EffectVector, ResourceChange, ResourceChanges, ResourceKind, ResourceSet};
pub use rng::{RngBundle, StreamPositions};
pub use session::{
    GameEvent, GamePhase, SessionController, SessionError, SessionState, TurnOutcome,
};

/// Trait for abstracting content loading operations
/// Platform-specific implementations should provide this
pub trait CardSource {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Load the decision-card catalog from the platform-specific source
    ///
    /// # Errors
    ///
    /// Returns an error if the card data cannot be loaded.
    fn load_catalog(&self) -> Result<CardCatalog, Self::Error>;

    /// Load the playable character roster
    ///
    /// # Errors
    ///
    /// Returns an error if the character data cannot be loaded.
    fn load_characters(&self) -> Result<CharacterList, Self::Error>;
}

/// Trait for abstracting save/load operations
/// Platform-specific implementations should provide this
pub trait SaveStorage {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Save a session snapshot
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot cannot be saved.
    fn save_session(&self, save_name: &str, state: &SessionState) -> Result<(), Self::Error>;

    /// Load a session snapshot
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot cannot be loaded.
    fn load_session(&self, save_name: &str) -> Result<Option<SessionState>, Self::Error>;

    /// Delete a saved session
    ///
    /// # Errors
    ///
    /// Returns an error if the save cannot be deleted.
    fn delete_save(&self, save_name: &str) -> Result<(), Self::Error>;
}

/// Main game engine for managing sessions over a content source and store
pub struct GameEngine<C, S>
where
    C: CardSource,
    S: SaveStorage,
{
    source: C,
    storage: S,
}

impl<C, S> GameEngine<C, S>
where
    C: CardSource,
    S: SaveStorage,
{
    /// Create a new game engine with the provided card source and storage
    pub const fn new(source: C, storage: S) -> Self {
        Self { source, storage }
    }

    /// Start a fresh session with the given seed
    ///
    /// # Errors
    ///
    /// Returns an error if the card catalog cannot be loaded.
    pub fn create_session(&self, seed: u64) -> Result<SessionController, C::Error> {
        let catalog = self.source.load_catalog()?;
        Ok(SessionController::new(&catalog, seed))
    }

    /// The character roster offered at selection
    ///
    /// # Errors
    ///
    /// Returns an error if the character data cannot be loaded.
    pub fn characters(&self) -> Result<CharacterList, C::Error> {
        self.source.load_characters()
    }

    /// Save a session snapshot
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot cannot be saved.
    pub fn save_session(&self, save_name: &str, state: &SessionState) -> Result<(), S::Error> {
        self.storage.save_session(save_name, state)
    }

    /// Load and rehydrate a saved session
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot cannot be loaded or the catalog
    /// cannot be reloaded for rehydration.
    pub fn load_session(&self, save_name: &str) -> Result<Option<SessionController>, anyhow::Error>
    where
        C::Error: Into<anyhow::Error>,
        S::Error: Into<anyhow::Error>,
    {
        if let Some(state) = self.storage.load_session(save_name).map_err(Into::into)? {
            // Rehydrate against freshly loaded content
            let catalog = self.source.load_catalog().map_err(Into::into)?;
            Ok(Some(SessionController::from_state(&catalog, state)))
        } else {
            Ok(None)
        }
    }

    /// Delete a saved session
    ///
    /// # Errors
    ///
    /// Returns an error if the save cannot be deleted.
    pub fn delete_save(&self, save_name: &str) -> Result<(), S::Error> {
        self.storage.delete_save(save_name)
    }
}
