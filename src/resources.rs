//! Resource store: the four bounded stats and their clamped mutation paths.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;
use std::str::FromStr;

use crate::constants::{DEFAULT_RESOURCE_VALUE, RESOURCE_MAX, RESOURCE_MIN};

/// The closed set of resources tracked by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Popularity,
    Stability,
    Media,
    Economy,
}

impl ResourceKind {
    /// All four resources in canonical order.
    pub const ALL: [Self; 4] = [
        Self::Popularity,
        Self::Stability,
        Self::Media,
        Self::Economy,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Popularity => "popularity",
            Self::Stability => "stability",
            Self::Media => "media",
            Self::Economy => "economy",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResourceKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "popularity" => Ok(Self::Popularity),
            "stability" => Ok(Self::Stability),
            "media" => Ok(Self::Media),
            "economy" => Ok(Self::Economy),
            _ => Err(()),
        }
    }
}

/// A signed delta over the four resources. Missing JSON keys mean zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct EffectVector {
    #[serde(default)]
    pub popularity: i32,
    #[serde(default)]
    pub stability: i32,
    #[serde(default)]
    pub media: i32,
    #[serde(default)]
    pub economy: i32,
}

impl EffectVector {
    #[must_use]
    pub const fn get(&self, kind: ResourceKind) -> i32 {
        match kind {
            ResourceKind::Popularity => self.popularity,
            ResourceKind::Stability => self.stability,
            ResourceKind::Media => self.media,
            ResourceKind::Economy => self.economy,
        }
    }

    pub fn set(&mut self, kind: ResourceKind, value: i32) {
        match kind {
            ResourceKind::Popularity => self.popularity = value,
            ResourceKind::Stability => self.stability = value,
            ResourceKind::Media => self.media = value,
            ResourceKind::Economy => self.economy = value,
        }
    }

    /// Sum of all four deltas, used for streak and chaos accounting.
    #[must_use]
    pub const fn total(&self) -> i32 {
        self.popularity + self.stability + self.media + self.economy
    }

    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.popularity == 0 && self.stability == 0 && self.media == 0 && self.economy == 0
    }
}

/// A single observed resource change, post-clamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceChange {
    pub kind: ResourceKind,
    pub old: i32,
    pub new: i32,
}

impl ResourceChange {
    /// The delta that was actually applied (post-clamp minus pre-clamp).
    #[must_use]
    pub const fn applied(&self) -> i32 {
        self.new - self.old
    }
}

/// Per-resource changes that actually landed; at most four entries.
pub type ResourceChanges = SmallVec<[ResourceChange; 4]>;

/// The four bounded stats. Every stored value stays in `[0, 100]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceSet {
    pub popularity: i32,
    pub stability: i32,
    pub media: i32,
    pub economy: i32,
}

impl Default for ResourceSet {
    fn default() -> Self {
        Self {
            popularity: DEFAULT_RESOURCE_VALUE,
            stability: DEFAULT_RESOURCE_VALUE,
            media: DEFAULT_RESOURCE_VALUE,
            economy: DEFAULT_RESOURCE_VALUE,
        }
    }
}

impl ResourceSet {
    #[must_use]
    pub const fn new(popularity: i32, stability: i32, media: i32, economy: i32) -> Self {
        Self {
            popularity,
            stability,
            media,
            economy,
        }
    }

    #[must_use]
    pub const fn get(&self, kind: ResourceKind) -> i32 {
        match kind {
            ResourceKind::Popularity => self.popularity,
            ResourceKind::Stability => self.stability,
            ResourceKind::Media => self.media,
            ResourceKind::Economy => self.economy,
        }
    }

    fn set(&mut self, kind: ResourceKind, value: i32) {
        match kind {
            ResourceKind::Popularity => self.popularity = value,
            ResourceKind::Stability => self.stability = value,
            ResourceKind::Media => self.media = value,
            ResourceKind::Economy => self.economy = value,
        }
    }

    /// Clamp all four values into the legal range. Idempotent.
    pub fn clamp(&mut self) {
        self.popularity = self.popularity.clamp(RESOURCE_MIN, RESOURCE_MAX);
        self.stability = self.stability.clamp(RESOURCE_MIN, RESOURCE_MAX);
        self.media = self.media.clamp(RESOURCE_MIN, RESOURCE_MAX);
        self.economy = self.economy.clamp(RESOURCE_MIN, RESOURCE_MAX);
    }

    /// Apply a delta with clamping, reporting the changes that landed.
    ///
    /// The reported deltas are post-clamp minus pre-clamp, not the raw
    /// requested values; resources whose stored value did not move emit
    /// nothing. The presentation layer shows real effect, not intent.
    pub fn apply(&mut self, delta: &EffectVector) -> ResourceChanges {
        let mut changes = ResourceChanges::new();
        for kind in ResourceKind::ALL {
            let requested = delta.get(kind);
            if requested == 0 {
                continue;
            }
            let old = self.get(kind);
            let new = (old + requested).clamp(RESOURCE_MIN, RESOURCE_MAX);
            if new != old {
                self.set(kind, new);
                changes.push(ResourceChange { kind, old, new });
            }
        }
        changes
    }

    /// Replace all four values wholesale, clamped. Used at character select.
    pub fn reset(&mut self, initial: Self) {
        *self = initial;
        self.clamp();
    }

    /// The weakest resource and its value, in canonical order on ties.
    #[must_use]
    pub fn lowest(&self) -> (ResourceKind, i32) {
        let mut worst = (ResourceKind::Popularity, self.popularity);
        for kind in ResourceKind::ALL {
            let value = self.get(kind);
            if value < worst.1 {
                worst = (kind, value);
            }
        }
        worst
    }

    /// True when any single resource has bottomed out.
    #[must_use]
    pub const fn any_zero(&self) -> bool {
        self.popularity == RESOURCE_MIN
            || self.stability == RESOURCE_MIN
            || self.media == RESOURCE_MIN
            || self.economy == RESOURCE_MIN
    }

    /// All four resources are at or above the given floor.
    #[must_use]
    pub const fn all_at_least(&self, floor: i32) -> bool {
        self.popularity >= floor
            && self.stability >= floor
            && self.media >= floor
            && self.economy >= floor
    }

    /// All four resources are at or below the given ceiling.
    #[must_use]
    pub const fn all_at_most(&self, ceiling: i32) -> bool {
        self.popularity <= ceiling
            && self.stability <= ceiling
            && self.media <= ceiling
            && self.economy <= ceiling
    }
}
