//! Last Hero Standing probabilities.
//!
//! Unlike Conquest, the winner of a game keeps its deck: the loser retires
//! the beaten deck and openly picks a replacement. That makes deck choice a
//! sequential minimax rather than a uniform draw, so the recursion assumes
//! the losing side always re-picks the deck best for itself.

use crate::analysis::solver::{solve, PayoffMatrix, Solution, SolverError};
use crate::deck::{DeckId, MatchupMatrix};

/// Hero's match win probability with both active decks already chosen.
///
/// `calls` counts the non-terminal recursion steps, for profiling the
/// exponential blowup on larger lineups.
pub fn lhs_value(
    m: &MatchupMatrix,
    hero: &[DeckId],
    villain: &[DeckId],
    hero_active: usize,
    villain_active: usize,
    calls: &mut u64,
) -> f64 {
    let current = m.get(hero[hero_active], villain[villain_active]);

    // Hero takes this game: the villain retires the beaten deck and picks
    // the replacement that hurts the hero most
    let win = if villain.len() == 1 {
        current
    } else {
        let mut rest = villain.to_vec();
        rest.remove(villain_active);
        let mut continuation = 1.0f64;
        for next_pick in 0..rest.len() {
            let value = lhs_value(m, hero, &rest, hero_active, next_pick, calls);
            if value < continuation {
                continuation = value;
            }
        }
        *calls += 1;
        current * continuation
    };

    // Hero loses this game: retire the active deck and pick the best
    // replacement
    let lose = if hero.len() == 1 {
        0.0
    } else {
        let mut rest = hero.to_vec();
        rest.remove(hero_active);
        let mut continuation = 0.0f64;
        for next_pick in 0..rest.len() {
            let value = lhs_value(m, &rest, villain, next_pick, villain_active, calls);
            if value > continuation {
                continuation = value;
            }
        }
        *calls += 1;
        (1.0 - current) * continuation
    };

    win + lose
}

/// Payoff matrix over the simultaneous opening picks: entry (i, j) is the
/// hero's win probability when the hero opens with deck i and the villain
/// with deck j
pub fn lhs_first_pick(
    m: &MatchupMatrix,
    hero: &[DeckId],
    villain: &[DeckId],
    calls: &mut u64,
) -> Result<PayoffMatrix, SolverError> {
    let rows = hero
        .iter()
        .enumerate()
        .map(|(i, _)| {
            villain
                .iter()
                .enumerate()
                .map(|(j, _)| lhs_value(m, hero, villain, i, j, calls))
                .collect()
        })
        .collect();
    PayoffMatrix::from_rows(rows)
}

/// Ban matrix for Last Hero Standing: rows index the villain's ban, columns
/// the hero's ban; each cell is the equilibrium value of the remaining
/// first-pick sub-game.
pub fn lhs_ban_matrix(
    m: &MatchupMatrix,
    hero: &[DeckId],
    villain: &[DeckId],
    iterations: u32,
) -> Result<PayoffMatrix, SolverError> {
    let mut calls = 0u64;
    let mut rows = Vec::with_capacity(villain.len());
    for i in 0..villain.len() {
        let mut v_rest = villain.to_vec();
        v_rest.remove(i);
        let mut row = Vec::with_capacity(hero.len());
        for j in 0..hero.len() {
            let mut h_rest = hero.to_vec();
            h_rest.remove(j);
            let first_pick = lhs_first_pick(m, &h_rest, &v_rest, &mut calls)?;
            let Solution { value, .. } = solve(&first_pick, iterations)?;
            row.push(value);
        }
        rows.push(row);
    }
    PayoffMatrix::from_rows(rows)
}
