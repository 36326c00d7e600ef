//! Benchmarks for scenario encoding and decoding.
//!
//! Run with: cargo bench -p scenario

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use engine::factors::FactorCatalog;
use engine::reduction::{ReductionStrategy, StrategyFields, Timeframe};
use engine::session::CalculationSession;
use engine::sources::SOURCE_TABLE;
use scenario::scenario_codec::{decode_scenario, encode_scenario};
use scenario::serialize;

fn busy_session() -> CalculationSession {
    let mut session = CalculationSession {
        region: "AU".to_string(),
        ..Default::default()
    };
    for (i, source) in SOURCE_TABLE.iter().enumerate() {
        session.inputs.set_quantity(source.id, 1_000.0 * (i + 1) as f64);
    }
    for i in 0..50 {
        let mut strategy = ReductionStrategy::new(
            format!("s{i}"),
            StrategyFields::percentage("electricity", 1.5).with_timeframe(Timeframe::Long),
        );
        strategy.confirm(50_000.0);
        session.strategies.push(strategy);
    }
    session
}

fn bench_scenario_codec(c: &mut Criterion) {
    let catalog = FactorCatalog::builtin();
    let session = busy_session();
    let snapshot = serialize(&session, &catalog);
    let bytes = encode_scenario(&snapshot).unwrap();

    c.bench_function("serialize", |b| {
        b.iter(|| serialize(black_box(&session), &catalog))
    });
    c.bench_function("encode_scenario", |b| {
        b.iter(|| encode_scenario(black_box(&snapshot)).unwrap())
    });
    c.bench_function("decode_scenario", |b| {
        b.iter(|| decode_scenario(black_box(&bytes)).unwrap())
    });
}

criterion_group!(benches, bench_scenario_codec);
criterion_main!(benches);
