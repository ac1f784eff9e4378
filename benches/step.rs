//! Benchmarks for the simulation step.
//!
//! Run with: `cargo bench` (add `--features parallel` for the rayon force pass)

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use ionsim::{ParticleSystem, Region, Vec2};

fn domain() -> Region {
    Region::new(-10.0, 10.0, -10.0, 10.0)
}

fn membrane(capacity: usize) -> ParticleSystem {
    let mut system = ParticleSystem::new(capacity, domain());
    system.add_blockage(Region::new(-10.0, -3.0, -0.5, 0.5));
    system.add_pump(Region::new(-3.0, -1.0, -0.5, 0.5));
    system.add_blockage(Region::new(-1.0, 1.0, -0.5, 0.5));
    system.add_gate(Region::new(1.0, 3.0, -0.5, 0.5));
    system.add_blockage(Region::new(3.0, 10.0, -0.5, 0.5));
    system.add_concentration_regulator(Region::new(-10.0, 10.0, -10.0, -1.0), capacity / 2);
    system.create_particles(capacity / 2, Region::new(-10.0, 10.0, -10.0, -1.0));
    system
}

fn bench_update(c: &mut Criterion) {
    let mut group = c.benchmark_group("update");

    for count in [100, 300, 1000] {
        group.bench_with_input(BenchmarkId::new("membrane", count), &count, |b, &count| {
            let mut system = membrane(count);
            b.iter(|| {
                system.update();
                black_box(system.positions());
            })
        });
    }

    for count in [100, 300, 1000] {
        group.bench_with_input(BenchmarkId::new("free", count), &count, |b, &count| {
            let mut system = ParticleSystem::new(count, domain());
            system.create_particles(count, Region::new(-9.0, 9.0, -9.0, 9.0));
            b.iter(|| {
                system.update();
                black_box(system.positions());
            })
        });
    }

    group.finish();
}

fn bench_queries(c: &mut Criterion) {
    let mut group = c.benchmark_group("queries");
    let mut system = membrane(1000);
    for _ in 0..50 {
        system.update();
    }

    group.bench_function("membrane_potential", |b| {
        b.iter(|| black_box(system.membrane_potential()))
    });

    group.bench_function("write_positions_xyz", |b| {
        let mut out = Vec::new();
        b.iter(|| {
            system.write_positions_xyz(&mut out);
            black_box(&out);
        })
    });

    group.bench_function("gate_sense", |b| {
        let gate = system.gates()[0];
        let positions: Vec<Vec2> = system.positions().to_vec();
        b.iter(|| black_box(gate.sense(&positions, 1e-3)))
    });

    group.finish();
}

criterion_group!(benches, bench_update, bench_queries);
criterion_main!(benches);
