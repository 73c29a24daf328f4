use criterion::{black_box, criterion_group, criterion_main, Criterion};

use phalanx::battle::{Battle, DistanceCache, UnitBuilder, compute_outlooks};
use phalanx::core::types::Side;

fn line_battle(per_side: usize) -> Battle {
    let mut battle = Battle::new(12345);
    for i in 0..per_side {
        battle.push(
            UnitBuilder::new(Side::Red)
                .coords(0.0, i as f32)
                .health(50.0)
                .build()
                .unwrap(),
        );
        battle.push(
            UnitBuilder::new(Side::Blue)
                .coords(20.0, i as f32)
                .health(50.0)
                .build()
                .unwrap(),
        );
    }
    battle
}

fn bench_outlooks(c: &mut Criterion) {
    let battle = line_battle(100);
    c.bench_function("outlooks_200_units", |b| {
        b.iter(|| {
            let mut cache = DistanceCache::new();
            compute_outlooks(black_box(battle.units()), &mut cache)
        })
    });
}

fn bench_round(c: &mut Criterion) {
    let battle = line_battle(100);
    c.bench_function("round_200_units", |b| {
        b.iter(|| {
            let mut round = battle.clone();
            round.update();
            black_box(round.units().len())
        })
    });
}

fn bench_long_battle(c: &mut Criterion) {
    let battle = line_battle(25);
    c.bench_function("fifty_rounds_50_units", |b| {
        b.iter(|| {
            let mut run = battle.clone();
            for _ in 0..50 {
                run.update();
            }
            black_box(run.is_finished())
        })
    });
}

criterion_group!(benches, bench_outlooks, bench_round, bench_long_battle);
criterion_main!(benches);
