//! Artificial field generation.
//!
//! Turns per-deck target frequencies into a concrete weighted population of
//! lineups by randomized relaxation: every pass, each lineup's weight is
//! nudged up or down with a probability proportional to how many of its
//! decks are under- or over-represented against the target marginals. The
//! result approximates the targets without an exact combinatorial solve,
//! and deliberately stays noisy; real fields are not exact either.

use crate::deck::{DeckId, Lineup};
use crate::progress::ProgressFn;
use crate::rng::FieldRng;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FieldError {
    #[error("No lineups to weight")]
    EmptyLineups,
    #[error("Total deck frequency must be positive, got {0}")]
    NonPositiveFrequency(f64),
    #[error("random_target must be at least 1")]
    ZeroRandomTarget,
    #[error("Lineup references deck {deck} outside the {decks}-deck universe")]
    DeckOutOfRange { deck: DeckId, decks: usize },
}

/// A lineup and how often it occurs in the simulated field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldEntry {
    pub lineup: Lineup,
    pub weight: u32,
}

/// Tunables for field generation
#[derive(Debug, Clone)]
pub struct FieldConfig {
    /// Relaxation passes over the lineup list
    pub iterations: u32,
    /// Exploration noise: a weight change with pressure `c` happens with
    /// probability c / random_target. Lower converges harder but risks
    /// settling in a poor local shape.
    pub random_target: u32,
    /// Expected total field weight the frequencies are scaled to
    pub field_size: f64,
}

impl Default for FieldConfig {
    fn default() -> Self {
        FieldConfig {
            iterations: 2000,
            random_target: 40,
            field_size: 400.0,
        }
    }
}

/// How often progress is reported, in relaxation passes
const PROGRESS_EVERY: u32 = 100;

/// Generate a weighted field of lineups whose per-deck usage approximates
/// `frequencies` (arbitrary non-negative weights, renormalized internally).
/// Lineups ending at weight zero are pruned. Convergence is approximate and
/// the procedure is intentionally stochastic; pass a seeded [`FieldRng`]
/// for reproducibility.
pub fn generate_field(
    frequencies: &[f64],
    lineups: &[Lineup],
    config: &FieldConfig,
    rng: &mut FieldRng,
    progress: Option<&ProgressFn>,
) -> Result<Vec<FieldEntry>, FieldError> {
    if lineups.is_empty() {
        return Err(FieldError::EmptyLineups);
    }
    if config.random_target == 0 {
        return Err(FieldError::ZeroRandomTarget);
    }
    for lineup in lineups {
        for &deck in &lineup.decks {
            if deck >= frequencies.len() {
                return Err(FieldError::DeckOutOfRange {
                    deck,
                    decks: frequencies.len(),
                });
            }
        }
    }

    let total: f64 = frequencies.iter().sum();
    if !(total > 0.0) || !total.is_finite() {
        return Err(FieldError::NonPositiveFrequency(total));
    }

    // Each lineup fields 4 decks, so a deck's target usage count is its
    // share of the field times 4
    let scale = config.field_size / total;
    let targets: Vec<f64> = frequencies.iter().map(|f| f * scale * 4.0).collect();
    let mut usage = vec![0u32; frequencies.len()];
    let mut weights = vec![0u32; lineups.len()];

    for pass in 0..config.iterations {
        for (lineup, weight) in lineups.iter().zip(weights.iter_mut()) {
            relax_lineup(lineup, weight, &targets, &mut usage, config.random_target, rng);
        }

        if pass % PROGRESS_EVERY == 0 {
            if let Some(report) = progress {
                let fraction = pass as f64 / config.iterations as f64;
                report(
                    fraction,
                    &format!("Generating field... {}%", (fraction * 100.0) as u32),
                );
            }
        }
    }

    Ok(lineups
        .iter()
        .zip(weights)
        .filter(|(_, weight)| *weight > 0)
        .map(|(&lineup, weight)| FieldEntry { lineup, weight })
        .collect())
}

/// One relaxation step for one lineup: pressure counts how many of its
/// decks sit under target minus how many sit over
fn relax_lineup(
    lineup: &Lineup,
    weight: &mut u32,
    targets: &[f64],
    usage: &mut [u32],
    random_target: u32,
    rng: &mut FieldRng,
) {
    let mut pressure = 0i32;
    for &deck in &lineup.decks {
        if targets[deck] > usage[deck] as f64 {
            pressure += 1;
        } else if (usage[deck] as f64) > targets[deck] {
            pressure -= 1;
        }
    }

    if pressure > 0 {
        if pressure as u32 > rng.random_below(random_target) {
            *weight += 1;
            for &deck in &lineup.decks {
                usage[deck] += 1;
            }
        }
    } else if pressure < 0 {
        if *weight == 0 {
            return;
        }
        if (-pressure) as u32 > rng.random_below(random_target) {
            *weight -= 1;
            for &deck in &lineup.decks {
                usage[deck] -= 1;
            }
        }
    }
}
