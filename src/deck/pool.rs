use crate::deck::types::{Deck, DeckId, Lineup};
use std::collections::HashMap;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DeckPoolError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("Deck not found: {0}")]
    DeckNotFound(String),
    #[error("Duplicate deck name: {0}")]
    DuplicateDeck(String),
    #[error("Invalid deck data: {0}")]
    InvalidDeck(String),
    #[error("Need at least 4 distinct classes to form a lineup, got {0}")]
    TooFewClasses(usize),
}

/// The closed universe of decks for one run, loaded from JSON
pub struct DeckPool {
    decks: Vec<Deck>,
    index: HashMap<String, DeckId>,
}

impl DeckPool {
    /// Load decks from a JSON file (array of {name, class, frequency})
    pub fn from_file(path: &str) -> Result<Self, DeckPoolError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    /// Load decks from a JSON string
    pub fn from_json_str(content: &str) -> Result<Self, DeckPoolError> {
        let decks: Vec<Deck> = serde_json::from_str(content)?;
        Self::from_decks(decks)
    }

    /// Build a pool from already-constructed decks, validating the universe
    pub fn from_decks(decks: Vec<Deck>) -> Result<Self, DeckPoolError> {
        if decks.is_empty() {
            return Err(DeckPoolError::InvalidDeck("no decks loaded".to_string()));
        }

        let mut index = HashMap::new();
        for (id, deck) in decks.iter().enumerate() {
            if deck.frequency < 0.0 || !deck.frequency.is_finite() {
                return Err(DeckPoolError::InvalidDeck(format!(
                    "deck '{}' has invalid frequency {}",
                    deck.name, deck.frequency
                )));
            }
            if index.insert(deck.name.clone(), id).is_some() {
                return Err(DeckPoolError::DuplicateDeck(deck.name.clone()));
            }
        }

        Ok(DeckPool { decks, index })
    }

    /// Get a deck by id
    pub fn deck(&self, id: DeckId) -> &Deck {
        &self.decks[id]
    }

    /// Look up a deck id by name
    pub fn index_of(&self, name: &str) -> Result<DeckId, DeckPoolError> {
        self.index
            .get(name)
            .copied()
            .ok_or_else(|| DeckPoolError::DeckNotFound(name.to_string()))
    }

    /// All deck names in pool order
    pub fn names(&self) -> Vec<&str> {
        self.decks.iter().map(|d| d.name.as_str()).collect()
    }

    /// Target frequencies in pool order
    pub fn frequencies(&self) -> Vec<f64> {
        self.decks.iter().map(|d| d.frequency).collect()
    }

    pub fn len(&self) -> usize {
        self.decks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.decks.is_empty()
    }

    /// Distinct class names, sorted for deterministic enumeration
    pub fn classes(&self) -> Vec<&str> {
        let mut classes: Vec<&str> = self.decks.iter().map(|d| d.class.as_str()).collect();
        classes.sort_unstable();
        classes.dedup();
        classes
    }

    /// Deck names of a lineup, joined for display
    pub fn lineup_names(&self, lineup: &Lineup) -> String {
        lineup
            .decks
            .iter()
            .map(|&id| self.decks[id].name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Enumerate every legal lineup: each 4-combination of classes crossed
    /// with the per-class deck choices
    pub fn possible_lineups(&self) -> Result<Vec<Lineup>, DeckPoolError> {
        let classes = self.classes();
        if classes.len() < 4 {
            return Err(DeckPoolError::TooFewClasses(classes.len()));
        }

        let mut by_class: Vec<Vec<DeckId>> = vec![Vec::new(); classes.len()];
        for (id, deck) in self.decks.iter().enumerate() {
            let slot = classes
                .iter()
                .position(|&c| c == deck.class)
                .ok_or_else(|| DeckPoolError::InvalidDeck(deck.class.clone()))?;
            by_class[slot].push(id);
        }

        let mut lineups = Vec::new();
        let n = classes.len();
        for a in 0..n {
            for b in (a + 1)..n {
                for c in (b + 1)..n {
                    for d in (c + 1)..n {
                        for &da in &by_class[a] {
                            for &db in &by_class[b] {
                                for &dc in &by_class[c] {
                                    for &dd in &by_class[d] {
                                        lineups.push(Lineup::new([da, db, dc, dd]));
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }

        Ok(lineups)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pool_json() -> &'static str {
        r#"[
            {"name": "Ramp Druid", "class": "Druid", "frequency": 10.0},
            {"name": "Aggro Druid", "class": "Druid", "frequency": 5.0},
            {"name": "Control Priest", "class": "Priest", "frequency": 8.0},
            {"name": "Secret Mage", "class": "Mage", "frequency": 12.0},
            {"name": "Pirate Rogue", "class": "Rogue", "frequency": 6.0},
            {"name": "Big Warrior", "class": "Warrior", "frequency": 3.0}
        ]"#
    }

    #[test]
    fn test_load_pool() {
        let pool = DeckPool::from_json_str(pool_json()).expect("Failed to load pool");
        assert_eq!(pool.len(), 6);
        assert_eq!(pool.classes(), vec!["Druid", "Mage", "Priest", "Rogue", "Warrior"]);
    }

    #[test]
    fn test_index_of() {
        let pool = DeckPool::from_json_str(pool_json()).expect("Failed to load pool");
        let id = pool.index_of("Secret Mage").expect("Secret Mage should exist");
        assert_eq!(pool.deck(id).name, "Secret Mage");
        assert!(pool.index_of("Nonexistent Deck").is_err());
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let json = r#"[
            {"name": "Ramp Druid", "class": "Druid", "frequency": 1.0},
            {"name": "Ramp Druid", "class": "Druid", "frequency": 2.0},
            {"name": "Control Priest", "class": "Priest", "frequency": 1.0},
            {"name": "Secret Mage", "class": "Mage", "frequency": 1.0},
            {"name": "Pirate Rogue", "class": "Rogue", "frequency": 1.0}
        ]"#;
        assert!(DeckPool::from_json_str(json).is_err());
    }

    #[test]
    fn test_negative_frequency_rejected() {
        let json = r#"[{"name": "X", "class": "Druid", "frequency": -1.0}]"#;
        assert!(DeckPool::from_json_str(json).is_err());
    }

    #[test]
    fn test_lineup_enumeration_count() {
        // 5 classes, Druid has 2 decks: C(5,4) combinations, those including
        // Druid contribute double
        let pool = DeckPool::from_json_str(pool_json()).expect("Failed to load pool");
        let lineups = pool.possible_lineups().expect("Should enumerate");
        // Combos without Druid: C(4,4) = 1 lineup. Combos with Druid:
        // C(4,3) = 4 class picks x 2 Druid decks = 8 lineups.
        assert_eq!(lineups.len(), 9);
    }

    #[test]
    fn test_lineups_have_distinct_classes() {
        let pool = DeckPool::from_json_str(pool_json()).expect("Failed to load pool");
        for lineup in pool.possible_lineups().expect("Should enumerate") {
            let mut classes: Vec<&str> = lineup
                .decks
                .iter()
                .map(|&id| pool.deck(id).class.as_str())
                .collect();
            classes.sort_unstable();
            classes.dedup();
            assert_eq!(classes.len(), 4, "All 4 classes must be distinct");
        }
    }

    #[test]
    fn test_too_few_classes() {
        let json = r#"[
            {"name": "A", "class": "Druid", "frequency": 1.0},
            {"name": "B", "class": "Mage", "frequency": 1.0},
            {"name": "C", "class": "Priest", "frequency": 1.0}
        ]"#;
        let pool = DeckPool::from_json_str(json).expect("Failed to load pool");
        assert!(matches!(
            pool.possible_lineups(),
            Err(DeckPoolError::TooFewClasses(3))
        ));
    }
}
