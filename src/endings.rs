//! Ending evaluation: a prioritized, static rule table over session state.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

use crate::resources::{ResourceKind, ResourceSet};
use crate::session::SessionState;

/// Ordinal quality tier for an ending, best to worst.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Rank {
    S,
    A,
    B,
    C,
    D,
    F,
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::S => "S",
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
            Self::D => "D",
            Self::F => "F",
        };
        f.write_str(label)
    }
}

/// Meta-counters usable in special triggers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpecialCounter {
    Chaos,
    AbsurdCardsSeen,
    CrisisCardsSeen,
    CascadesTriggered,
}

impl SpecialCounter {
    fn value(self, state: &SessionState) -> u32 {
        match self {
            Self::Chaos => u32::try_from(state.chaos.max(0)).unwrap_or(0),
            Self::AbsurdCardsSeen => state.absurd_cards_seen,
            Self::CrisisCardsSeen => state.crisis_cards_seen,
            Self::CascadesTriggered => state.cascades_triggered,
        }
    }
}

/// Resource-shaped trigger forms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceTrigger {
    /// Every resource at or above the floor.
    All { min: i32 },
    /// Every resource at or below the ceiling.
    AllBelow { max: i32 },
    /// Per-resource thresholds, direction inferred from magnitude.
    PerKey(Vec<(ResourceKind, i32)>),
}

/// Trigger predicate over the full session state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Trigger {
    Resources(ResourceTrigger),
    Turn { turns: u32 },
    Special { counter: SpecialCounter, min: u32 },
    Combo(Vec<Trigger>),
}

/// Threshold direction is inferred from magnitude: 50 or more reads as
/// "needs a high value" (`>=`), anything lower as "needs a low value"
/// (`<=`). Exactly 50 is a high bar.
fn per_key_holds(resources: &ResourceSet, kind: ResourceKind, threshold: i32) -> bool {
    let value = resources.get(kind);
    if threshold >= 50 {
        value >= threshold
    } else {
        value <= threshold
    }
}

impl Trigger {
    fn holds(&self, state: &SessionState) -> bool {
        match self {
            Self::Resources(trigger) => match trigger {
                ResourceTrigger::All { min } => state.resources.all_at_least(*min),
                ResourceTrigger::AllBelow { max } => state.resources.all_at_most(*max),
                ResourceTrigger::PerKey(entries) => entries
                    .iter()
                    .all(|(kind, threshold)| per_key_holds(&state.resources, *kind, *threshold)),
            },
            Self::Turn { turns } => state.turn >= *turns,
            Self::Special { counter, min } => counter.value(state) >= *min,
            Self::Combo(parts) => parts.iter().all(|part| part.holds(state)),
        }
    }
}

/// One entry in the static ending catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EndingRule {
    pub id: &'static str,
    pub title: &'static str,
    pub epilogue: &'static str,
    pub rank: Rank,
    pub trigger: Trigger,
}

const DEFAULT_ENDING_ID: &str = "balanced-mandate";

fn build_catalog() -> Vec<EndingRule> {
    use ResourceKind::{Economy, Media, Popularity, Stability};
    use ResourceTrigger::{All, AllBelow, PerKey};

    vec![
        // Special tier, checked first.
        EndingRule {
            id: "house-of-cards",
            title: "House of Cards",
            epilogue: "Everything fell at once, in alphabetical order.",
            rank: Rank::F,
            trigger: Trigger::Combo(vec![
                Trigger::Resources(AllBelow { max: 30 }),
                Trigger::Special {
                    counter: SpecialCounter::Chaos,
                    min: 70,
                },
            ]),
        },
        EndingRule {
            id: "chaos-reign",
            title: "Reign of Chaos",
            epilogue: "Historians will need a new font for this chapter.",
            rank: Rank::F,
            trigger: Trigger::Special {
                counter: SpecialCounter::Chaos,
                min: 90,
            },
        },
        EndingRule {
            id: "cascade-spiral",
            title: "The Doom Spiral",
            epilogue: "Each disaster politely introduced the next.",
            rank: Rank::D,
            trigger: Trigger::Special {
                counter: SpecialCounter::CascadesTriggered,
                min: 6,
            },
        },
        EndingRule {
            id: "crisis-addict",
            title: "Crisis Management Theater",
            epilogue: "You never governed; you only responded, dramatically.",
            rank: Rank::D,
            trigger: Trigger::Special {
                counter: SpecialCounter::CrisisCardsSeen,
                min: 10,
            },
        },
        EndingRule {
            id: "court-jester",
            title: "The Court Jester",
            epilogue: "The pigeons, the timezone, the goat. Especially the goat.",
            rank: Rank::C,
            trigger: Trigger::Special {
                counter: SpecialCounter::AbsurdCardsSeen,
                min: 8,
            },
        },
        // Blanket resource tier. Checked before the narrower combos so an
        // across-the-board triumph or collapse takes the stronger ending.
        EndingRule {
            id: "golden-age",
            title: "The Golden Age",
            epilogue: "Statues were erected. Tasteful ones, even.",
            rank: Rank::S,
            trigger: Trigger::Resources(All { min: 85 }),
        },
        EndingRule {
            id: "total-ruin",
            title: "Total Ruin",
            epilogue: "The country is fine. The country is on fire.",
            rank: Rank::F,
            trigger: Trigger::Resources(AllBelow { max: 15 }),
        },
        EndingRule {
            id: "media-emperor",
            title: "The Media Emperor",
            epilogue: "Reality now requires your press office's approval.",
            rank: Rank::A,
            trigger: Trigger::Combo(vec![
                Trigger::Resources(PerKey(vec![(Media, 85)])),
                Trigger::Resources(PerKey(vec![(Popularity, 70)])),
            ]),
        },
        EndingRule {
            id: "iron-grip",
            title: "The Iron Grip",
            epilogue: "Perfect order, empty squares, very quiet applause.",
            rank: Rank::B,
            trigger: Trigger::Combo(vec![
                Trigger::Resources(PerKey(vec![(Stability, 90)])),
                Trigger::Resources(PerKey(vec![(Popularity, 30)])),
            ]),
        },
        EndingRule {
            id: "beloved-ghost",
            title: "The Beloved Ghost",
            epilogue: "Adored by millions, covered by no one.",
            rank: Rank::B,
            trigger: Trigger::Combo(vec![
                Trigger::Resources(PerKey(vec![(Popularity, 90)])),
                Trigger::Resources(PerKey(vec![(Media, 25)])),
            ]),
        },
        EndingRule {
            id: "oligarchs-darling",
            title: "The Oligarchs' Darling",
            epilogue: "The economy thrived. The economists fled.",
            rank: Rank::C,
            trigger: Trigger::Combo(vec![
                Trigger::Resources(PerKey(vec![(Economy, 90)])),
                Trigger::Resources(PerKey(vec![(Popularity, 40)])),
            ]),
        },
        // Per-resource tier.
        EndingRule {
            id: "exiled",
            title: "The Quiet Exile",
            epilogue: "A one-way ticket, purchased by popular demand.",
            rank: Rank::F,
            trigger: Trigger::Resources(PerKey(vec![(Popularity, 0)])),
        },
        EndingRule {
            id: "coup",
            title: "The Eleven O'Clock Coup",
            epilogue: "The generals apologized for the inconvenience.",
            rank: Rank::F,
            trigger: Trigger::Resources(PerKey(vec![(Stability, 0)])),
        },
        EndingRule {
            id: "blackout",
            title: "The Blackout",
            epilogue: "Your last press release was read by the intern who wrote it.",
            rank: Rank::F,
            trigger: Trigger::Resources(PerKey(vec![(Media, 0)])),
        },
        EndingRule {
            id: "bankrupt",
            title: "The National Garage Sale",
            epilogue: "The treasury now accepts exposure as payment.",
            rank: Rank::F,
            trigger: Trigger::Resources(PerKey(vec![(Economy, 0)])),
        },
        EndingRule {
            id: "puppet-of-the-press",
            title: "Puppet of the Press",
            epilogue: "You held the office; the columnists held the pen.",
            rank: Rank::B,
            trigger: Trigger::Resources(PerKey(vec![(Media, 90)])),
        },
        EndingRule {
            id: "teflon",
            title: "The Teflon Leader",
            epilogue: "Nothing stuck. Absolutely nothing.",
            rank: Rank::A,
            trigger: Trigger::Resources(PerKey(vec![(Popularity, 85)])),
        },
        EndingRule {
            id: "steady-hand",
            title: "The Steady Hand",
            epilogue: "Unremarkable, unscandalous, re-electable.",
            rank: Rank::B,
            trigger: Trigger::Resources(All { min: 60 }),
        },
        EndingRule {
            id: "grey-manager",
            title: "The Grey Manager",
            epilogue: "Nobody remembers your term. That was the achievement.",
            rank: Rank::D,
            trigger: Trigger::Resources(AllBelow { max: 35 }),
        },
        // Turn tier.
        EndingRule {
            id: "long-haul",
            title: "The Long Haul",
            epilogue: "You survived. The bar was low, but you cleared it.",
            rank: Rank::C,
            trigger: Trigger::Turn { turns: 100 },
        },
        // Designated default, also matched last at the cap.
        EndingRule {
            id: DEFAULT_ENDING_ID,
            title: "The Balanced Mandate",
            epilogue: "History shrugged, approvingly.",
            rank: Rank::B,
            trigger: Trigger::Turn { turns: 100 },
        },
    ]
}

/// The full prioritized catalog: special/combo tier, then resource tier,
/// then turn tier, with the default ending last.
pub fn catalog() -> &'static [EndingRule] {
    static CATALOG: OnceLock<Vec<EndingRule>> = OnceLock::new();
    CATALOG.get_or_init(build_catalog)
}

/// The designated fallback when no rule matches at the turn cap.
#[must_use]
pub fn default_ending() -> &'static EndingRule {
    catalog()
        .iter()
        .find(|rule| rule.id == DEFAULT_ENDING_ID)
        .expect("default ending present in catalog")
}

/// First matching rule in priority order, if any.
#[must_use]
pub fn evaluate(state: &SessionState) -> Option<&'static EndingRule> {
    catalog().iter().find(|rule| rule.trigger.holds(state))
}

/// Evaluate with the guaranteed fallback; used at game over and the cap.
#[must_use]
pub fn select_ending(state: &SessionState) -> &'static EndingRule {
    evaluate(state).unwrap_or_else(default_ending)
}
