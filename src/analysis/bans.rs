//! Ban-phase payoff matrices.
//!
//! Before a Conquest match each side removes one deck from the opponent's
//! lineup, without seeing the other side's choice. Entry (i, j) of a ban
//! matrix is the hero's match win probability when hero deck i and villain
//! deck j are the ones removed; handing the matrix to the game solver gives
//! the expected outcome under optimal mixed bans from both sides.

use crate::analysis::conquest::{
    conquest_bo3, conquest_bo5, conquest_bo5_fixed, conquest_recursive,
};
use crate::analysis::solver::PayoffMatrix;
use crate::deck::{DeckId, Lineup, MatchupMatrix};

fn drop_one<const N: usize, const K: usize>(decks: &[DeckId; N], ban: usize) -> [DeckId; K] {
    let mut rest = [0; K];
    let mut k = 0;
    for (i, &deck) in decks.iter().enumerate() {
        if i != ban {
            rest[k] = deck;
            k += 1;
        }
    }
    rest
}

/// 4x4 Bo5 ban matrix for a pair of 4-deck lineups
pub fn ban_matrix_bo5(m: &MatchupMatrix, hero: &Lineup, villain: &Lineup) -> PayoffMatrix {
    let rows = (0..4)
        .map(|i| {
            let h = hero.without(i);
            (0..4)
                .map(|j| conquest_bo5(m, h, villain.without(j)))
                .collect()
        })
        .collect();
    // Probabilities are finite and the rows square by construction
    PayoffMatrix::from_rows(rows).expect("ban matrix is well-formed")
}

/// 4x4 Bo5 ban matrix built from the fixed-order approximation
pub fn ban_matrix_bo5_fixed(m: &MatchupMatrix, hero: &Lineup, villain: &Lineup) -> PayoffMatrix {
    let rows = (0..4)
        .map(|i| {
            let h = hero.without(i);
            (0..4)
                .map(|j| conquest_bo5_fixed(m, h, villain.without(j)))
                .collect()
        })
        .collect();
    PayoffMatrix::from_rows(rows).expect("ban matrix is well-formed")
}

/// 3x3 Bo3 ban matrix for 3-deck lineups
pub fn ban_matrix_bo3(m: &MatchupMatrix, hero: &[DeckId; 3], villain: &[DeckId; 3]) -> PayoffMatrix {
    let rows = (0..3)
        .map(|i| {
            let h: [DeckId; 2] = drop_one(hero, i);
            (0..3)
                .map(|j| conquest_bo3(m, h, drop_one(villain, j)))
                .collect()
        })
        .collect();
    PayoffMatrix::from_rows(rows).expect("ban matrix is well-formed")
}

/// 5x5 Bo7 ban matrix for 5-deck lineups, via the general recursive engine
pub fn ban_matrix_bo7(m: &MatchupMatrix, hero: &[DeckId; 5], villain: &[DeckId; 5]) -> PayoffMatrix {
    let rows = (0..5)
        .map(|i| {
            let h: [DeckId; 4] = drop_one(hero, i);
            (0..5)
                .map(|j| {
                    let v: [DeckId; 4] = drop_one(villain, j);
                    conquest_recursive(m, &h, &v)
                })
                .collect()
        })
        .collect();
    PayoffMatrix::from_rows(rows).expect("ban matrix is well-formed")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::solver::solve;

    fn uniform(n: usize, p: f64) -> MatchupMatrix {
        MatchupMatrix::from_probabilities(vec![vec![p; n]; n]).expect("matrix should build")
    }

    fn matrix8() -> MatchupMatrix {
        let mut rows = vec![vec![0.5; 8]; 8];
        for i in 0..8 {
            for j in (i + 1)..8 {
                let p = 0.35 + 0.05 * ((i * 3 + j * 5) % 7) as f64;
                rows[i][j] = p;
                rows[j][i] = 1.0 - p;
            }
        }
        MatchupMatrix::from_probabilities(rows).expect("matrix should build")
    }

    #[test]
    fn test_mirror_matchup_all_half() {
        let m = uniform(8, 0.5);
        let hero = Lineup::new([0, 1, 2, 3]);
        let villain = Lineup::new([4, 5, 6, 7]);
        let payoff = ban_matrix_bo5(&m, &hero, &villain);
        for i in 0..4 {
            for j in 0..4 {
                assert!((payoff.get(i, j) - 0.5).abs() < 1e-12);
            }
        }
        let solution = solve(&payoff, 1000).expect("should solve");
        assert!((solution.value - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_ban_matrix_shape() {
        let m = matrix8();
        let payoff = ban_matrix_bo5(&m, &Lineup::new([0, 1, 2, 3]), &Lineup::new([4, 5, 6, 7]));
        assert_eq!(payoff.rows(), 4);
        assert_eq!(payoff.cols(), 4);

        let payoff = ban_matrix_bo3(&m, &[0, 1, 2], &[4, 5, 6]);
        assert_eq!(payoff.rows(), 3);
        assert_eq!(payoff.cols(), 3);
    }

    #[test]
    fn test_entries_match_engine() {
        let m = matrix8();
        let hero = Lineup::new([0, 1, 2, 3]);
        let villain = Lineup::new([4, 5, 6, 7]);
        let payoff = ban_matrix_bo5(&m, &hero, &villain);
        // Banning hero 0 and villain 2 leaves [1,2,3] vs [4,5,7]
        let expected = conquest_bo5(&m, [1, 2, 3], [4, 5, 7]);
        assert_eq!(payoff.get(0, 2), expected);
    }

    #[test]
    fn test_evaluation_is_idempotent() {
        let m = matrix8();
        let hero = Lineup::new([0, 2, 5, 7]);
        let villain = Lineup::new([1, 3, 4, 6]);
        let a = ban_matrix_bo5(&m, &hero, &villain);
        let b = ban_matrix_bo5(&m, &hero, &villain);
        assert_eq!(a, b, "identical inputs must give bit-identical matrices");

        let fa = ban_matrix_bo5_fixed(&m, &hero, &villain);
        let fb = ban_matrix_bo5_fixed(&m, &hero, &villain);
        assert_eq!(fa, fb);
    }

    #[test]
    fn test_bo7_matrix_shape_and_range() {
        let m = matrix8();
        let payoff = ban_matrix_bo7(&m, &[0, 1, 2, 3, 4], &[3, 4, 5, 6, 7]);
        assert_eq!(payoff.rows(), 5);
        assert_eq!(payoff.cols(), 5);
        for i in 0..5 {
            for j in 0..5 {
                let p = payoff.get(i, j);
                assert!((0.0..=1.0).contains(&p));
            }
        }
    }
}
