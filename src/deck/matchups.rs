use crate::deck::pool::DeckPool;
use crate::deck::types::DeckId;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MatchupError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Matchup table is empty")]
    Empty,
    #[error("Matchup table is not square: {rows} rows, {cols} columns")]
    NotSquare { rows: usize, cols: usize },
    #[error("Invalid matchup format at line {line}: {reason}")]
    InvalidFormat { line: usize, reason: String },
    #[error("Matchup value out of range at ({row}, {col}): {value}")]
    OutOfRange { row: usize, col: usize, value: f64 },
    #[error("Matchup table missing deck: {0}")]
    MissingDeck(String),
    #[error("Unknown deck in matchup table: {0}")]
    UnknownDeck(String),
}

/// Square deck-vs-deck win probability table, row = hero, column = villain.
/// Stored normalized to [0, 1]; external data arrives as percentages.
/// The diagonal is never consulted (a deck does not play itself).
#[derive(Debug, Clone, PartialEq)]
pub struct MatchupMatrix {
    size: usize,
    probs: Vec<f64>,
}

impl MatchupMatrix {
    /// Build from win percentages in [0, 100], normalizing by 100
    pub fn from_percentages(rows: Vec<Vec<f64>>) -> Result<Self, MatchupError> {
        let mut matrix = Self::validated(rows, 100.0)?;
        for p in &mut matrix.probs {
            *p /= 100.0;
        }
        Ok(matrix)
    }

    /// Build directly from probabilities in [0, 1]
    pub fn from_probabilities(rows: Vec<Vec<f64>>) -> Result<Self, MatchupError> {
        Self::validated(rows, 1.0)
    }

    fn validated(rows: Vec<Vec<f64>>, scale: f64) -> Result<Self, MatchupError> {
        let size = rows.len();
        if size == 0 {
            return Err(MatchupError::Empty);
        }

        let mut probs = Vec::with_capacity(size * size);
        for (i, row) in rows.iter().enumerate() {
            if row.len() != size {
                return Err(MatchupError::NotSquare {
                    rows: size,
                    cols: row.len(),
                });
            }
            for (j, &value) in row.iter().enumerate() {
                if !value.is_finite() || value < 0.0 || value > scale {
                    return Err(MatchupError::OutOfRange {
                        row: i,
                        col: j,
                        value,
                    });
                }
                probs.push(value);
            }
        }

        Ok(MatchupMatrix { size, probs })
    }

    /// Parse a comma-separated table keyed by deck names and reorder it to
    /// pool order. First line is a header of villain names; every following
    /// line is "HeroName,p1,p2,..." with percentages in [0, 100].
    pub fn from_csv_str(content: &str, pool: &DeckPool) -> Result<Self, MatchupError> {
        let mut lines = content
            .lines()
            .enumerate()
            .map(|(n, l)| (n + 1, l.trim()))
            .filter(|(_, l)| !l.is_empty() && !l.starts_with('#'));

        let (header_line, header) = lines.next().ok_or(MatchupError::Empty)?;
        let columns: Vec<&str> = header.split(',').skip(1).map(str::trim).collect();
        if columns.len() != pool.len() {
            return Err(MatchupError::InvalidFormat {
                line: header_line,
                reason: format!("expected {} columns, got {}", pool.len(), columns.len()),
            });
        }

        let mut col_ids = Vec::with_capacity(columns.len());
        for name in &columns {
            let id = pool
                .index_of(name)
                .map_err(|_| MatchupError::UnknownDeck(name.to_string()))?;
            // A repeated column would shadow another deck's entries
            if col_ids.contains(&id) {
                return Err(MatchupError::InvalidFormat {
                    line: header_line,
                    reason: format!("duplicate column '{}'", name),
                });
            }
            col_ids.push(id);
        }

        let mut rows: Vec<Option<Vec<f64>>> = vec![None; pool.len()];
        for (line_num, line) in lines {
            let mut parts = line.split(',').map(str::trim);
            let name = parts.next().unwrap_or_default();
            let hero = pool
                .index_of(name)
                .map_err(|_| MatchupError::UnknownDeck(name.to_string()))?;
            if rows[hero].is_some() {
                return Err(MatchupError::InvalidFormat {
                    line: line_num,
                    reason: format!("duplicate row for '{}'", name),
                });
            }

            let mut row = vec![0.0; pool.len()];
            let mut count = 0;
            for (k, cell) in parts.enumerate() {
                let value: f64 = cell.parse().map_err(|_| MatchupError::InvalidFormat {
                    line: line_num,
                    reason: format!("'{}' is not a number", cell),
                })?;
                if k >= col_ids.len() {
                    return Err(MatchupError::InvalidFormat {
                        line: line_num,
                        reason: "too many columns".to_string(),
                    });
                }
                row[col_ids[k]] = value;
                count += 1;
            }
            if count != col_ids.len() {
                return Err(MatchupError::NotSquare {
                    rows: pool.len(),
                    cols: count,
                });
            }
            rows[hero] = Some(row);
        }

        let mut table = Vec::with_capacity(pool.len());
        for (id, row) in rows.into_iter().enumerate() {
            table.push(row.ok_or_else(|| MatchupError::MissingDeck(pool.deck(id).name.clone()))?);
        }

        Self::from_percentages(table)
    }

    /// Load the matchup table from a file
    pub fn from_file(path: &str, pool: &DeckPool) -> Result<Self, MatchupError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_csv_str(&content, pool)
    }

    /// Hero's probability of beating villain in a single game
    #[inline]
    pub fn get(&self, hero: DeckId, villain: DeckId) -> f64 {
        self.probs[hero * self.size + villain]
    }

    /// Number of decks covered by the table
    pub fn size(&self) -> usize {
        self.size
    }
}
