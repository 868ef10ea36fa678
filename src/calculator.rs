//! Lineup win-rate calculation.
//!
//! The outer loop of the whole analysis: every candidate lineup is scored
//! against every weighted field entry by solving the ban-phase sub-game,
//! and the weighted average becomes the lineup's expected win-rate. Each
//! (lineup, opponent) pair is pure and independent, so the lineup loop
//! fans out across a rayon worker pool and the first failure aborts the
//! whole run; a bad deck reference is a data bug, not a transient.

use crate::analysis::bans::ban_matrix_bo5;
use crate::analysis::solver::{solve, SolverError};
use crate::deck::{DeckId, Lineup, MatchupMatrix};
use crate::field::FieldEntry;
use crate::progress::{CancelToken, ProgressFn};
use rayon::prelude::*;
use serde::Serialize;
use std::sync::atomic::{AtomicUsize, Ordering};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CalcError {
    #[error("No lineups to evaluate")]
    EmptyLineups,
    #[error("Field is empty")]
    EmptyField,
    #[error("Field has zero total weight")]
    ZeroFieldWeight,
    #[error("Lineup references deck {deck} outside the {decks}-deck matchup table")]
    DeckOutOfRange { deck: DeckId, decks: usize },
    #[error("Solver error: {0}")]
    Solver(#[from] SolverError),
    #[error("Calculation cancelled")]
    Cancelled,
    #[error("Failed to build worker pool: {0}")]
    ThreadPool(String),
}

/// A lineup and its aggregate win-rate against the field
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LineupResult {
    pub lineup: Lineup,
    pub win_rate: f64,
}

/// Knobs for the calculation run
#[derive(Debug, Clone)]
pub struct CalcOptions {
    /// Fictitious-play iterations per ban sub-game
    pub solver_iterations: u32,
    /// Worker cap; `None` uses one worker per core
    pub max_workers: Option<usize>,
}

impl Default for CalcOptions {
    fn default() -> Self {
        CalcOptions {
            solver_iterations: 1000,
            max_workers: None,
        }
    }
}

/// How often progress is reported, in completed lineups
const PROGRESS_EVERY: usize = 50;

/// Score one lineup against the whole field: the weighted average of the
/// ban sub-game equilibrium value over every opponent
pub fn evaluate_lineup(
    m: &MatchupMatrix,
    lineup: &Lineup,
    field: &[FieldEntry],
    total_weight: f64,
    solver_iterations: u32,
) -> Result<f64, CalcError> {
    let mut value = 0.0;
    for entry in field {
        let payoff = ban_matrix_bo5(m, lineup, &entry.lineup);
        let solution = solve(&payoff, solver_iterations)?;
        value += solution.value * entry.weight as f64;
    }
    Ok(value / total_weight)
}

/// Compute win-rates for every lineup against the field and return them
/// sorted by win-rate, best first. Order among exact ties is unspecified.
pub fn calculate_lineups(
    m: &MatchupMatrix,
    field: &[FieldEntry],
    lineups: &[Lineup],
    options: &CalcOptions,
    progress: Option<&ProgressFn>,
    cancel: Option<&CancelToken>,
) -> Result<Vec<LineupResult>, CalcError> {
    if lineups.is_empty() {
        return Err(CalcError::EmptyLineups);
    }
    if field.is_empty() {
        return Err(CalcError::EmptyField);
    }
    let total_weight: f64 = field.iter().map(|e| e.weight as f64).sum();
    if total_weight <= 0.0 {
        return Err(CalcError::ZeroFieldWeight);
    }
    for lineup in lineups.iter().chain(field.iter().map(|e| &e.lineup)) {
        for &deck in &lineup.decks {
            if deck >= m.size() {
                return Err(CalcError::DeckOutOfRange {
                    deck,
                    decks: m.size(),
                });
            }
        }
    }

    let completed = AtomicUsize::new(0);
    let total = lineups.len();

    let run = || -> Result<Vec<LineupResult>, CalcError> {
        lineups
            .par_iter()
            .map(|lineup| {
                if cancel.map_or(false, |token| token.is_cancelled()) {
                    return Err(CalcError::Cancelled);
                }

                let win_rate =
                    evaluate_lineup(m, lineup, field, total_weight, options.solver_iterations)?;

                let done = completed.fetch_add(1, Ordering::Relaxed) + 1;
                if done % PROGRESS_EVERY == 0 {
                    if let Some(report) = progress {
                        report(
                            done as f64 / total as f64,
                            &format!("Calculating lineups... {}/{}", done, total),
                        );
                    }
                }

                Ok(LineupResult {
                    lineup: *lineup,
                    win_rate,
                })
            })
            .collect()
    };

    let mut results = match options.max_workers {
        Some(workers) => rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .build()
            .map_err(|e| CalcError::ThreadPool(e.to_string()))?
            .install(run),
        None => run(),
    }?;

    if let Some(report) = progress {
        report(1.0, "Sorting results...");
    }

    results.sort_by(|a, b| {
        b.win_rate
            .partial_cmp(&a.win_rate)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    Ok(results)
}
