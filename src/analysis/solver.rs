use thiserror::Error;

#[derive(Error, Debug)]
pub enum SolverError {
    #[error("Payoff matrix is empty")]
    EmptyMatrix,
    #[error("Payoff matrix is not rectangular: row {row} has {got} columns, expected {expected}")]
    NotRectangular { row: usize, got: usize, expected: usize },
    #[error("Payoff matrix has non-finite entry at ({row}, {col})")]
    NonFiniteEntry { row: usize, col: usize },
    #[error("Solver iteration count must be positive")]
    ZeroIterations,
}

/// Zero-sum game payoff matrix: the row player maximizes, the column player
/// minimizes. Rectangular and finite by construction.
#[derive(Debug, Clone, PartialEq)]
pub struct PayoffMatrix {
    rows: usize,
    cols: usize,
    values: Vec<f64>,
}

impl PayoffMatrix {
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self, SolverError> {
        if rows.is_empty() || rows[0].is_empty() {
            return Err(SolverError::EmptyMatrix);
        }
        let cols = rows[0].len();
        let mut values = Vec::with_capacity(rows.len() * cols);
        for (i, row) in rows.iter().enumerate() {
            if row.len() != cols {
                return Err(SolverError::NotRectangular {
                    row: i,
                    got: row.len(),
                    expected: cols,
                });
            }
            for (j, &v) in row.iter().enumerate() {
                if !v.is_finite() {
                    return Err(SolverError::NonFiniteEntry { row: i, col: j });
                }
                values.push(v);
            }
        }
        Ok(PayoffMatrix {
            rows: rows.len(),
            cols,
            values,
        })
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.values[row * self.cols + col]
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }
}

/// Approximate equilibrium of a payoff matrix found by fictitious play
#[derive(Debug, Clone, PartialEq)]
pub struct Solution {
    /// How many iterations each row was the row player's best response
    pub row_counts: Vec<u32>,
    /// How many iterations each column was the column player's best response
    pub col_counts: Vec<u32>,
    /// Approximate value of the game for the row player
    pub value: f64,
}

/// Approximate the Nash equilibrium value of a zero-sum matrix game by
/// fictitious play: each side repeatedly best-responds to the opponent's
/// cumulative payoffs. Ties break toward the lowest index, which keeps the
/// iteration fully deterministic.
pub fn solve(payoff: &PayoffMatrix, iterations: u32) -> Result<Solution, SolverError> {
    if iterations == 0 {
        return Err(SolverError::ZeroIterations);
    }

    let rows = payoff.rows();
    let cols = payoff.cols();
    let mut row_cum = vec![0.0f64; rows];
    let mut col_cum = vec![0.0f64; cols];
    let mut row_counts = vec![0u32; rows];
    let mut col_counts = vec![0u32; cols];

    let mut active = 0;
    for _ in 0..iterations {
        row_counts[active] += 1;
        for j in 0..cols {
            col_cum[j] += payoff.get(active, j);
        }

        let mut best_col = 0;
        for j in 1..cols {
            if col_cum[j] < col_cum[best_col] {
                best_col = j;
            }
        }
        col_counts[best_col] += 1;
        for i in 0..rows {
            row_cum[i] += payoff.get(i, best_col);
        }

        active = 0;
        for i in 1..rows {
            if row_cum[i] > row_cum[active] {
                active = i;
            }
        }
    }

    let max_row = row_cum.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let min_col = col_cum.iter().cloned().fold(f64::INFINITY, f64::min);
    let value = (max_row + min_col) / 2.0 / iterations as f64;

    Ok(Solution {
        row_counts,
        col_counts,
        value,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payoff(rows: Vec<Vec<f64>>) -> PayoffMatrix {
        PayoffMatrix::from_rows(rows).expect("matrix should build")
    }

    #[test]
    fn test_rejects_empty_matrix() {
        assert!(matches!(
            PayoffMatrix::from_rows(vec![]),
            Err(SolverError::EmptyMatrix)
        ));
        assert!(matches!(
            PayoffMatrix::from_rows(vec![vec![]]),
            Err(SolverError::EmptyMatrix)
        ));
    }

    #[test]
    fn test_rejects_ragged_matrix() {
        assert!(matches!(
            PayoffMatrix::from_rows(vec![vec![1.0, 2.0], vec![3.0]]),
            Err(SolverError::NotRectangular { row: 1, .. })
        ));
    }

    #[test]
    fn test_rejects_non_finite() {
        assert!(matches!(
            PayoffMatrix::from_rows(vec![vec![1.0, f64::INFINITY]]),
            Err(SolverError::NonFiniteEntry { row: 0, col: 1 })
        ));
    }

    #[test]
    fn test_rejects_zero_iterations() {
        let m = payoff(vec![vec![0.5]]);
        assert!(matches!(solve(&m, 0), Err(SolverError::ZeroIterations)));
    }

    #[test]
    fn test_single_entry_value() {
        let m = payoff(vec![vec![0.7]]);
        let solution = solve(&m, 1000).expect("should solve");
        assert!((solution.value - 0.7).abs() < 1e-12);
        assert_eq!(solution.row_counts, vec![1000]);
        assert_eq!(solution.col_counts, vec![1000]);
    }

    #[test]
    fn test_dominant_row_converges_to_guaranteed_payoff() {
        // Row 0 dominates; the column player's best response is column 1,
        // so the value is row 0's worst case: 0.8
        let m = payoff(vec![vec![0.9, 0.8], vec![0.2, 0.1]]);
        let solution = solve(&m, 1000).expect("should solve");
        assert!((solution.value - 0.8).abs() < 1e-3);
        assert_eq!(solution.row_counts[1], 0, "dominated row never active");
    }

    #[test]
    fn test_matching_pennies_value() {
        let m = payoff(vec![vec![1.0, 0.0], vec![0.0, 1.0]]);
        let solution = solve(&m, 1000).expect("should solve");
        assert!((solution.value - 0.5).abs() < 0.05);
        // Equilibrium is a 50/50 mix
        let share = solution.row_counts[0] as f64 / 1000.0;
        assert!((share - 0.5).abs() < 0.1);
    }

    #[test]
    fn test_uniform_matrix_value() {
        let m = payoff(vec![vec![0.5; 4]; 4]);
        let solution = solve(&m, 1000).expect("should solve");
        assert!((solution.value - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_tie_break_lowest_index() {
        // All-zero matrix: every row and column ties forever, so the lowest
        // index must stay active throughout
        let m = payoff(vec![vec![0.0, 0.0], vec![0.0, 0.0]]);
        let solution = solve(&m, 100).expect("should solve");
        assert_eq!(solution.row_counts, vec![100, 0]);
        assert_eq!(solution.col_counts, vec![100, 0]);
        assert_eq!(solution.value, 0.0);
    }

    #[test]
    fn test_deterministic() {
        let m = payoff(vec![
            vec![0.52, 0.44, 0.61],
            vec![0.48, 0.50, 0.39],
            vec![0.55, 0.62, 0.47],
        ]);
        let a = solve(&m, 1000).expect("should solve");
        let b = solve(&m, 1000).expect("should solve");
        assert_eq!(a, b, "solver must be deterministic");
    }
}
