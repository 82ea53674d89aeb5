//! Benchmarks for the match engine.
//!
//! Covers whole simulated matches plus the two per-frame hot paths:
//! contact detection and contact resolution.

#![allow(missing_docs)]
#![allow(clippy::unwrap_used)]

use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};
use colhex::game::{Color, HexGrid, PlayerRegistry, Point, Pulse, resolve_contact};
use colhex::physics::contacts_for_step;
use colhex::sim::{SimConfig, run_match};

fn bench_match_2p(c: &mut Criterion) {
    let config = SimConfig::default();

    c.bench_function("match_2p", |b| {
        b.iter(|| {
            let result = run_match(black_box(42), black_box(&config));
            black_box(result)
        });
    });
}

fn bench_match_6p(c: &mut Criterion) {
    let config = SimConfig::with_colors(&Color::ALL);

    c.bench_function("match_6p", |b| {
        b.iter(|| {
            let result = run_match(black_box(42), black_box(&config));
            black_box(result)
        });
    });
}

fn bench_contacts_for_step(c: &mut Criterion) {
    // Default board size, pulse in the middle
    let grid = HexGrid::new(17, 12, 20.0).unwrap();
    let origin = grid.cell_id_at(8, 6).unwrap();
    let center = grid.cell(origin).unwrap().center;
    let mut pulse = Pulse::new(center, origin, 12.0);
    pulse.grow(40.0);

    c.bench_function("contacts_for_step", |b| {
        b.iter(|| black_box(contacts_for_step(black_box(&pulse), &grid, 10.0)));
    });
}

fn bench_resolve_contact(c: &mut Criterion) {
    let mut grid = HexGrid::new(17, 12, 20.0).unwrap();
    grid.activate_all();
    let mut registry = PlayerRegistry::new();
    registry.register(Color::Red, false).unwrap();
    registry.register(Color::Blue, false).unwrap();

    let cell = grid.cell_id_at(8, 6).unwrap();
    let center = grid.cell(cell).unwrap().center;
    let pulse = Point::new(center.x - 40.0, center.y);

    // Red and Blue trade the same cell back and forth
    c.bench_function("resolve_contact_steal", |b| {
        let mut taker = Color::Red;
        b.iter(|| {
            let outcome = resolve_contact(&mut grid, &mut registry, taker, pulse, black_box(cell));
            taker = if taker == Color::Red {
                Color::Blue
            } else {
                Color::Red
            };
            black_box(outcome)
        });
    });
}

criterion_group!(
    benches,
    bench_match_2p,
    bench_match_6p,
    bench_contacts_for_step,
    bench_resolve_contact
);
criterion_main!(benches);
