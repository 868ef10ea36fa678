pub mod matchups;
pub mod pool;
pub mod types;

pub use matchups::{MatchupError, MatchupMatrix};
pub use pool::{DeckPool, DeckPoolError};
pub use types::{Deck, DeckId, Lineup};
