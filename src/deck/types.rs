use serde::{Deserialize, Serialize};

/// Stable index of a deck within the pool
pub type DeckId = usize;

/// A deck archetype: a name, the class it belongs to, and its target share
/// of the field. Classes constrain lineup legality (one deck per class).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Deck {
    pub name: String,
    pub class: String,
    #[serde(default)]
    pub frequency: f64,
}

/// An ordered set of 4 decks from 4 distinct classes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Lineup {
    pub decks: [DeckId; 4],
}

impl Lineup {
    pub fn new(decks: [DeckId; 4]) -> Self {
        Lineup { decks }
    }

    /// Lineup with deck at `ban` removed, preserving the order of the rest
    pub fn without(&self, ban: usize) -> [DeckId; 3] {
        let mut rest = [0; 3];
        let mut k = 0;
        for (i, &deck) in self.decks.iter().enumerate() {
            if i != ban {
                rest[k] = deck;
                k += 1;
            }
        }
        rest
    }

    pub fn contains(&self, deck: DeckId) -> bool {
        self.decks.contains(&deck)
    }
}
