//! Conquest match win probabilities.
//!
//! Conquest rules: every game, each side's active deck is drawn uniformly
//! from its decks that have not yet won a game; the winning deck retires,
//! and the first side to retire its whole lineup takes the match. The
//! functions here compute the hero's exact match win probability from a
//! single-game matchup matrix, enumerating every possible order of deck
//! usage weighted by how likely that order is to arise.

use crate::deck::{DeckId, MatchupMatrix};

/// Win probability of a Bo3 Conquest match (2 decks per side after bans).
/// Closed form over the at-most-3 game outcomes.
pub fn conquest_bo3(m: &MatchupMatrix, hero: [DeckId; 2], villain: [DeckId; 2]) -> f64 {
    let [h1, h2] = hero;
    let [v1, v2] = villain;

    (m.get(h1, v1) * m.get(h2, v1) * (2.0 - m.get(h1, v2) - m.get(h2, v2))
        + m.get(h1, v2) * m.get(h2, v2) * (2.0 - m.get(h1, v1) - m.get(h2, v1))
        + m.get(h1, v1) * m.get(h2, v2)
        + m.get(h1, v2) * m.get(h2, v1))
        * 0.5
}

const ALL_RETIRED: usize = 0b111;

/// Win probability of a Bo5 Conquest match (3 decks per side after bans).
///
/// Exact. Tracks the probability distribution over "retired sets": state
/// (hm, vm) holds the probability that after the games played so far the
/// hero decks in bitmask `hm` and the villain decks in bitmask `vm` have
/// each won exactly one game. Five rounds resolve every branch, because a
/// side retires one deck per game it wins and the match ends at 3.
pub fn conquest_bo5(m: &MatchupMatrix, hero: [DeckId; 3], villain: [DeckId; 3]) -> f64 {
    let mut dist = [[0.0f64; 8]; 8];
    dist[0][0] = 1.0;
    let mut hero_wins = 0.0;

    for _game in 0..5 {
        let mut next = [[0.0f64; 8]; 8];
        for hm in 0..8 {
            for vm in 0..8 {
                let p = dist[hm][vm];
                if p == 0.0 {
                    continue;
                }
                let hero_alive = 3 - (hm as u32).count_ones() as usize;
                let villain_alive = 3 - (vm as u32).count_ones() as usize;
                let pick = p / (hero_alive * villain_alive) as f64;

                for hi in 0..3 {
                    if hm & (1 << hi) != 0 {
                        continue;
                    }
                    for vi in 0..3 {
                        if vm & (1 << vi) != 0 {
                            continue;
                        }
                        let win = m.get(hero[hi], villain[vi]);

                        let hm_next = hm | (1 << hi);
                        if hm_next == ALL_RETIRED {
                            hero_wins += pick * win;
                        } else {
                            next[hm_next][vm] += pick * win;
                        }

                        let vm_next = vm | (1 << vi);
                        if vm_next != ALL_RETIRED {
                            // A full villain mask is a lost match; its mass
                            // is dropped here
                            next[hm][vm_next] += pick * (1.0 - win);
                        }
                    }
                }
            }
        }
        dist = next;
    }

    hero_wins
}

/// Approximate Bo5 variant with the hero's deck order fixed: the hero opens
/// with its first deck and advances to the next only after a win, while the
/// villain randomizes as usual. Carries a small unquantified bias relative
/// to [`conquest_bo5`]; use only when the hero's opening choice is not free.
pub fn conquest_bo5_fixed(m: &MatchupMatrix, hero: [DeckId; 3], villain: [DeckId; 3]) -> f64 {
    // State (wins, vm): hero has retired its first `wins` decks and the
    // villain decks in `vm` have each won a game
    let mut dist = [[0.0f64; 8]; 3];
    dist[0][0] = 1.0;
    let mut hero_wins = 0.0;

    for _game in 0..5 {
        let mut next = [[0.0f64; 8]; 3];
        for wins in 0..3 {
            for vm in 0..8 {
                let p = dist[wins][vm];
                if p == 0.0 {
                    continue;
                }
                let villain_alive = 3 - (vm as u32).count_ones() as usize;
                let pick = p / villain_alive as f64;
                let active = hero[wins];

                for vi in 0..3 {
                    if vm & (1 << vi) != 0 {
                        continue;
                    }
                    let win = m.get(active, villain[vi]);

                    if wins + 1 == 3 {
                        hero_wins += pick * win;
                    } else {
                        next[wins + 1][vm] += pick * win;
                    }

                    let vm_next = vm | (1 << vi);
                    if vm_next != ALL_RETIRED {
                        next[wins][vm_next] += pick * (1.0 - win);
                    }
                }
            }
        }
        dist = next;
    }

    hero_wins
}

/// Fully general Conquest win probability for arbitrary deck lists.
///
/// Exponential in the list lengths; intended for the formats the closed
/// forms do not cover (Bo7 and up), with at most ~5 decks per side. The
/// villain's game-win chance reads the villain's own matchup row, matching
/// the hero-side convention under the `m[i][j] + m[j][i] = 1` invariant.
pub fn conquest_recursive(m: &MatchupMatrix, hero: &[DeckId], villain: &[DeckId]) -> f64 {
    if hero.is_empty() {
        return 1.0;
    }
    if villain.is_empty() {
        return 0.0;
    }

    let total = (hero.len() * villain.len()) as f64;
    let mut chance = 0.0;

    for (i, &h) in hero.iter().enumerate() {
        let game_win: f64 = villain.iter().map(|&v| m.get(h, v)).sum::<f64>() / total;
        let mut rest = hero.to_vec();
        rest.remove(i);
        chance += game_win * conquest_recursive(m, &rest, villain);
    }

    for (j, &v) in villain.iter().enumerate() {
        let game_win: f64 = hero.iter().map(|&h| m.get(v, h)).sum::<f64>() / total;
        let mut rest = villain.to_vec();
        rest.remove(j);
        chance += game_win * conquest_recursive(m, hero, &rest);
    }

    chance
}
