use std::cmp::Ordering;
use std::fmt;
use strum::IntoEnumIterator;
use strum_macros::{AsRefStr, EnumIter, EnumString};

/// The ten card kinds of the game.
///
/// Discriminants and serialized names are part of the stored record format:
/// reordering or renaming a variant is a breaking schema change.
///
/// Cards are not `Ord`: the kinds form a defeat cycle, see [`Card::beats`].
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    serde::Serialize,
    serde::Deserialize,
    EnumIter,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Card {
    #[default]
    Rabbit = 1,
    Snake = 2,
    Fox = 3,
    Wolf = 4,
    Leopard = 5,
    Lion = 6,
    Bear = 7,
    Tiger = 8,
    Hunter = 9,
    Bacteria = 10,
}

impl Card {
    pub fn value(self) -> u8 {
        self as u8
    }

    /// Rabbit through Tiger.
    pub fn is_animal(self) -> bool {
        self.value() <= Card::Tiger.value()
    }

    /// Whether `self` defeats `other` in a confrontation.
    ///
    /// Animals eat weaker animals, the Hunter shoots every animal, Bacteria
    /// infect the Hunter, and any animal shrugs off Bacteria. Identical
    /// cards never defeat each other.
    pub fn beats(self, other: Card) -> bool {
        match (self, other) {
            (Card::Hunter, other) => other.is_animal(),
            (Card::Bacteria, other) => other == Card::Hunter,
            (_, Card::Bacteria) => true,
            (_, Card::Hunter) => false,
            (this, other) => this.value() > other.value(),
        }
    }

    /// `Greater` when `self` wins, `Less` when `other` wins.
    pub fn confront(self, other: Card) -> Ordering {
        if self.beats(other) {
            Ordering::Greater
        } else if other.beats(self) {
            Ordering::Less
        } else {
            Ordering::Equal
        }
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_ref())
    }
}

impl TryFrom<u8> for Card {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Card::iter()
            .find(|card| card.value() == value)
            .ok_or_else(|| format!("Unknown card value: {}", value))
    }
}
