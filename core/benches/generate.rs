use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use rand::{SeedableRng, rngs::SmallRng};
use std::hint::black_box;
use sweeper_core::{Board, GameConfig, GameSession};

const TIERS: [(&str, GameConfig); 4] = [
    ("beginner", GameConfig::beginner()),
    ("intermediate", GameConfig::intermediate()),
    ("expert", GameConfig::expert()),
    // rejection sampling slows down as the board fills up
    ("dense", GameConfig::new_unchecked(16, 30, 400)),
];

fn bench_generate(c: &mut Criterion) {
    let mut group = c.benchmark_group("generate");
    for (name, config) in TIERS {
        group.bench_with_input(BenchmarkId::from_parameter(name), &config, |b, &config| {
            let mut rng = SmallRng::seed_from_u64(0);
            b.iter(|| Board::generate(black_box(config), &mut rng))
        });
    }
    group.finish();
}

fn bench_first_click(c: &mut Criterion) {
    let mut group = c.benchmark_group("first_click");
    for (name, config) in TIERS {
        group.bench_with_input(BenchmarkId::from_parameter(name), &config, |b, &config| {
            b.iter_batched(
                || GameSession::new(config, 1).expect("tier config is valid"),
                |mut game| {
                    let start = game.board().safe_start().unwrap_or((0, 0));
                    black_box(game.reveal(start))
                },
                criterion::BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

criterion_group!(benches, bench_generate, bench_first_click);
criterion_main!(benches);
