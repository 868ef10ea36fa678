use conquest_lineups::analysis::{ban_matrix_bo5, conquest_bo5, solve};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use conquest_lineups::deck::{Lineup, MatchupMatrix};
use conquest_lineups::field::{generate_field, FieldConfig};
use conquest_lineups::rng::FieldRng;

fn test_matchups(size: usize) -> MatchupMatrix {
    let rows: Vec<Vec<f64>> = (0..size)
        .map(|i| {
            (0..size)
                .map(|j| {
                    if i == j {
                        0.5
                    } else {
                        0.35 + 0.3 * (((i * 7 + j * 3) % 11) as f64 / 10.0)
                    }
                })
                .collect()
        })
        .collect();
    MatchupMatrix::from_probabilities(rows).expect("valid matchup table")
}

fn benchmark_conquest_bo5(c: &mut Criterion) {
    let m = test_matchups(8);

    c.bench_function("conquest_bo5", |b| {
        b.iter(|| conquest_bo5(black_box(&m), black_box([0, 1, 2]), black_box([3, 4, 5])))
    });
}

fn benchmark_ban_evaluation(c: &mut Criterion) {
    let m = test_matchups(8);
    let hero = Lineup::new([0, 1, 2, 3]);
    let villain = Lineup::new([4, 5, 6, 7]);

    c.bench_function("ban_matrix_and_solve", |b| {
        b.iter(|| {
            let payoff = ban_matrix_bo5(black_box(&m), black_box(&hero), black_box(&villain));
            solve(black_box(&payoff), black_box(1000))
        })
    });
}

fn benchmark_field_generation(c: &mut Criterion) {
    let frequencies = vec![10.0, 8.0, 6.0, 4.0, 2.0, 2.0, 1.0, 1.0];
    let lineups: Vec<Lineup> = (0..5usize)
        .flat_map(|a| (5..8usize).map(move |b| Lineup::new([a, b, (a + 1) % 5, 5 + (b + 1) % 3])))
        .collect();
    let config = FieldConfig {
        iterations: 200,
        ..FieldConfig::default()
    };

    c.bench_function("generate_field_200_passes", |b| {
        b.iter(|| {
            let mut rng = FieldRng::new(Some(42));
            generate_field(
                black_box(&frequencies),
                black_box(&lineups),
                black_box(&config),
                &mut rng,
                None,
            )
        })
    });
}

criterion_group!(
    benches,
    benchmark_conquest_bo5,
    benchmark_ban_evaluation,
    benchmark_field_generation
);
criterion_main!(benches);
