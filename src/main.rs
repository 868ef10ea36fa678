mod analysis;
mod calculator;
mod deck;
mod field;
mod progress;
mod rng;

use analysis::bans::{ban_matrix_bo5, ban_matrix_bo5_fixed};
use analysis::solver::solve;
use calculator::{calculate_lineups, CalcOptions, LineupResult};
use clap::{Parser, Subcommand};
use deck::{DeckPool, Lineup, MatchupMatrix};
use field::{generate_field, FieldConfig, FieldEntry};
use indicatif::{ProgressBar, ProgressStyle};
use rng::FieldRng;

#[derive(Parser)]
#[command(name = "conquest-lineups")]
#[command(about = "Conquest lineup win-rate calculator", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Deck universe file (JSON array of name/class/frequency)
    #[arg(short, long, default_value = "decks.json")]
    decks: String,

    /// Matchup win-percentage table (CSV keyed by deck names)
    #[arg(short, long, default_value = "matchups.csv")]
    matchups: String,

    /// Seed for field generation (for reproducibility)
    #[arg(short, long)]
    seed: Option<u64>,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a field and rank every lineup against it (default)
    Run {
        /// Field relaxation passes
        #[arg(short, long, default_value = "2000")]
        iterations: u32,

        /// Field exploration noise (lower = sharper convergence)
        #[arg(short, long, default_value = "40")]
        random_target: u32,

        /// Expected total field weight
        #[arg(short, long, default_value = "400")]
        field_size: f64,

        /// How many of the best lineups to print
        #[arg(short, long, default_value = "20")]
        top: usize,

        /// Worker cap (default: one per core)
        #[arg(short, long)]
        workers: Option<usize>,

        /// Results file (default: data/results-<timestamp>.csv)
        #[arg(short, long)]
        output: Option<String>,

        /// Print results as JSON instead of a table
        #[arg(short, long)]
        json: bool,
    },

    /// Generate a field and show how well it tracks the deck frequencies
    Field {
        #[arg(short, long, default_value = "2000")]
        iterations: u32,

        #[arg(short, long, default_value = "40")]
        random_target: u32,

        #[arg(short, long, default_value = "400")]
        field_size: f64,
    },

    /// Show the ban matrix and equilibrium for one lineup pair
    Bans {
        /// Hero lineup: four deck names, comma separated
        hero: String,

        /// Villain lineup: four deck names, comma separated
        villain: String,

        /// Use the fixed-order Bo5 approximation
        #[arg(long)]
        fixed: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    let pool = match DeckPool::from_file(&cli.decks) {
        Ok(pool) => {
            eprintln!("✓ Loaded {} decks from {}", pool.len(), cli.decks);
            pool
        }
        Err(e) => {
            eprintln!("✗ Failed to load decks: {}", e);
            std::process::exit(1);
        }
    };

    let matchups = match MatchupMatrix::from_file(&cli.matchups, &pool) {
        Ok(m) => {
            eprintln!("✓ Loaded {}x{} matchup table from {}", m.size(), m.size(), cli.matchups);
            m
        }
        Err(e) => {
            eprintln!("✗ Failed to load matchups: {}", e);
            std::process::exit(1);
        }
    };

    match cli.command {
        Some(Commands::Run {
            iterations,
            random_target,
            field_size,
            top,
            workers,
            output,
            json,
        }) => {
            let config = FieldConfig { iterations, random_target, field_size };
            run_calculation(&pool, &matchups, &config, cli.seed, top, workers, output, json);
        }
        Some(Commands::Field {
            iterations,
            random_target,
            field_size,
        }) => {
            let config = FieldConfig { iterations, random_target, field_size };
            show_field(&pool, &config, cli.seed);
        }
        Some(Commands::Bans { hero, villain, fixed }) => {
            show_bans(&pool, &matchups, &hero, &villain, fixed);
        }
        None => {
            run_calculation(&pool, &matchups, &FieldConfig::default(), cli.seed, 20, None, None, false);
        }
    }
}

fn progress_bar() -> ProgressBar {
    let bar = ProgressBar::new(1000);
    bar.set_style(
        ProgressStyle::with_template("{msg:32} [{bar:40.cyan/blue}] {percent:>3}%")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );
    bar
}

fn build_field(
    pool: &DeckPool,
    lineups: &[Lineup],
    config: &FieldConfig,
    seed: Option<u64>,
) -> (Vec<FieldEntry>, u64) {
    let mut rng = FieldRng::new(seed);
    let seed = rng.seed();

    let bar = progress_bar();
    let report = |fraction: f64, msg: &str| {
        bar.set_position((fraction * 1000.0) as u64);
        bar.set_message(msg.to_string());
    };

    let field = match generate_field(&pool.frequencies(), lineups, config, &mut rng, Some(&report))
    {
        Ok(field) => field,
        Err(e) => {
            eprintln!("✗ Failed to generate field: {}", e);
            std::process::exit(1);
        }
    };
    bar.finish_and_clear();

    if field.is_empty() {
        eprintln!("✗ Field came out empty; raise iterations or frequencies");
        std::process::exit(1);
    }

    (field, seed)
}

#[allow(clippy::too_many_arguments)]
fn run_calculation(
    pool: &DeckPool,
    matchups: &MatchupMatrix,
    config: &FieldConfig,
    seed: Option<u64>,
    top: usize,
    workers: Option<usize>,
    output: Option<String>,
    json: bool,
) {
    let lineups = match pool.possible_lineups() {
        Ok(lineups) => lineups,
        Err(e) => {
            eprintln!("✗ Cannot enumerate lineups: {}", e);
            std::process::exit(1);
        }
    };

    eprintln!("\n=== Conquest Lineup Calculator ===\n");
    eprintln!("Decks: {}", pool.len());
    eprintln!("Lineups: {}", lineups.len());

    let start = std::time::Instant::now();
    let (field, seed) = build_field(pool, &lineups, config, seed);
    eprintln!("Field: {} lineups (seed {})", field.len(), seed);
    eprintln!();

    let bar = progress_bar();
    let report = |fraction: f64, msg: &str| {
        bar.set_position((fraction * 1000.0) as u64);
        bar.set_message(msg.to_string());
    };
    let options = CalcOptions {
        max_workers: workers,
        ..CalcOptions::default()
    };

    let results = match calculate_lineups(matchups, &field, &lineups, &options, Some(&report), None)
    {
        Ok(results) => results,
        Err(e) => {
            eprintln!("✗ Calculation failed: {}", e);
            std::process::exit(1);
        }
    };
    bar.finish_and_clear();
    let elapsed = start.elapsed();

    if json {
        print_json(pool, &results);
    } else {
        print_table(pool, &results, top);
    }

    let path = output.unwrap_or_else(|| {
        format!("data/results-{}.csv", chrono::Local::now().format("%Y%m%d-%H%M%S"))
    });
    match save_results(&path, pool, &results) {
        Ok(()) => eprintln!("\nResults saved to: {}", path),
        Err(e) => eprintln!("\n✗ Failed to save results: {}", e),
    }

    eprintln!(
        "Completed in {:.2?} ({:.0} lineups/sec)",
        elapsed,
        results.len() as f64 / elapsed.as_secs_f64()
    );
}

fn print_table(pool: &DeckPool, results: &[LineupResult], top: usize) {
    println!("=== Top {} Lineups ===\n", top.min(results.len()));
    for (rank, result) in results.iter().take(top).enumerate() {
        let pct = result.win_rate * 100.0;
        let bar = "█".repeat((pct / 2.0) as usize);
        println!(
            "{:3}. {:5.2}% {} {}",
            rank + 1,
            pct,
            bar,
            pool.lineup_names(&result.lineup)
        );
    }
}

fn print_json(pool: &DeckPool, results: &[LineupResult]) {
    #[derive(serde::Serialize)]
    struct Row<'a> {
        decks: Vec<&'a str>,
        win_rate: f64,
    }

    let rows: Vec<Row> = results
        .iter()
        .map(|r| Row {
            decks: r.lineup.decks.iter().map(|&id| pool.deck(id).name.as_str()).collect(),
            win_rate: r.win_rate,
        })
        .collect();

    match serde_json::to_string_pretty(&rows) {
        Ok(text) => println!("{}", text),
        Err(e) => eprintln!("✗ Failed to serialize results: {}", e),
    }
}

fn save_results(
    path: &str,
    pool: &DeckPool,
    results: &[LineupResult],
) -> Result<(), std::io::Error> {
    if let Some(dir) = std::path::Path::new(path).parent() {
        if !dir.as_os_str().is_empty() {
            std::fs::create_dir_all(dir)?;
        }
    }

    let mut content = String::new();
    for result in results {
        for &id in &result.lineup.decks {
            content.push_str(&pool.deck(id).name);
            content.push(',');
        }
        content.push_str(&format!("{:.6}\n", result.win_rate));
    }
    std::fs::write(path, content)
}

fn show_field(pool: &DeckPool, config: &FieldConfig, seed: Option<u64>) {
    let lineups = match pool.possible_lineups() {
        Ok(lineups) => lineups,
        Err(e) => {
            eprintln!("✗ Cannot enumerate lineups: {}", e);
            std::process::exit(1);
        }
    };

    let (field, seed) = build_field(pool, &lineups, config, seed);
    let total_weight: u64 = field.iter().map(|e| e.weight as u64).sum();

    println!("\n=== Generated Field ===\n");
    println!("Lineups in field: {} (of {} possible)", field.len(), lineups.len());
    println!("Total weight: {}", total_weight);
    println!("Seed: {}", seed);

    let mut usage = vec![0u64; pool.len()];
    for entry in &field {
        for &deck in &entry.lineup.decks {
            usage[deck] += entry.weight as u64;
        }
    }

    let frequencies = pool.frequencies();
    let total_frequency: f64 = frequencies.iter().sum();
    println!("\nPer-deck usage vs target:");
    for (id, &used) in usage.iter().enumerate() {
        let target = frequencies[id] / total_frequency * config.field_size * 4.0;
        println!(
            "  {:28} {:6} (target {:7.1})",
            pool.deck(id).name,
            used,
            target
        );
    }

    let mut heaviest: Vec<&FieldEntry> = field.iter().collect();
    heaviest.sort_by(|a, b| b.weight.cmp(&a.weight));
    println!("\nMost common lineups:");
    for entry in heaviest.iter().take(10) {
        println!("  {:3}x {}", entry.weight, pool.lineup_names(&entry.lineup));
    }
}

fn parse_lineup(pool: &DeckPool, names: &str) -> Lineup {
    let parts: Vec<&str> = names.split(',').map(str::trim).collect();
    if parts.len() != 4 {
        eprintln!("✗ A lineup needs exactly 4 deck names, got {}", parts.len());
        std::process::exit(1);
    }
    let mut decks = [0; 4];
    for (slot, name) in parts.iter().enumerate() {
        match pool.index_of(name) {
            Ok(id) => decks[slot] = id,
            Err(e) => {
                eprintln!("✗ {}", e);
                std::process::exit(1);
            }
        }
    }
    Lineup::new(decks)
}

fn show_bans(pool: &DeckPool, matchups: &MatchupMatrix, hero: &str, villain: &str, fixed: bool) {
    let hero = parse_lineup(pool, hero);
    let villain = parse_lineup(pool, villain);

    let payoff = if fixed {
        ban_matrix_bo5_fixed(matchups, &hero, &villain)
    } else {
        ban_matrix_bo5(matchups, &hero, &villain)
    };

    println!("\n=== Ban Matrix (hero ban x villain ban) ===\n");
    for i in 0..4 {
        let row: Vec<String> = (0..4).map(|j| format!("{:6.4}", payoff.get(i, j))).collect();
        println!(
            "  ban {:28} {}",
            pool.deck(hero.decks[i]).name,
            row.join("  ")
        );
    }

    let solution = match solve(&payoff, 1000) {
        Ok(solution) => solution,
        Err(e) => {
            eprintln!("✗ Solver failed: {}", e);
            std::process::exit(1);
        }
    };

    println!("\nEquilibrium value: {:.4}", solution.value);
    println!("\nHero ban mix:");
    for (i, &count) in solution.row_counts.iter().enumerate() {
        println!(
            "  {:28} {:5.1}%",
            pool.deck(hero.decks[i]).name,
            count as f64 / 10.0
        );
    }
    println!("\nVillain ban mix:");
    for (j, &count) in solution.col_counts.iter().enumerate() {
        println!(
            "  {:28} {:5.1}%",
            pool.deck(villain.decks[j]).name,
            count as f64 / 10.0
        );
    }
}
