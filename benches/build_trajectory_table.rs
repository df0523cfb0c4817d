use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use conic_orbit::central_body::CentralBody;
use conic_orbit::kepler::{propagate_from_periapsis, SolverSettings};
use conic_orbit::orbit_type::conic_section::ConicSection;
use conic_orbit::session::params::SessionParams;
use conic_orbit::session::{default_elements, OrbitSession};
use conic_orbit::trajectories::{TableSettings, TrajectoryTable};

/// Random ellipse, e ∈ [0, 0.98]
#[inline]
fn random_ellipse(rng: &mut StdRng) -> ConicSection {
    let a = rng.random_range(1.0..20.0);
    let e = rng.random_range(0.0..=0.98);
    ConicSection::new(a, e).unwrap()
}

/// Random hyperbola, e ∈ [1.02, 5]
#[inline]
fn random_hyperbola(rng: &mut StdRng) -> ConicSection {
    let a = -rng.random_range(0.5..20.0);
    let e = rng.random_range(1.02..=5.0);
    ConicSection::new(a, e).unwrap()
}

fn bench_table_ellipse(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(0xC0FFEE);
    let settings = TableSettings::default();

    c.bench_function("build_trajectory_table/ellipse_181", |b| {
        b.iter_batched(
            || random_ellipse(&mut rng),
            |conic| {
                let table = TrajectoryTable::build(black_box(&conic), &settings).unwrap();
                black_box(table);
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_table_hyperbola(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(0xFEEDFACE);
    let settings = TableSettings::default();

    c.bench_function("build_trajectory_table/hyperbola_181", |b| {
        b.iter_batched(
            || random_hyperbola(&mut rng),
            |conic| {
                let table = TrajectoryTable::build(black_box(&conic), &settings).unwrap();
                black_box(table);
            },
            BatchSize::SmallInput,
        )
    });
}

/// Single solve at a random time of flight, high-eccentricity ellipse
fn bench_universal_solver(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(0xBADF00D);
    let samples = 10_000usize;
    let conic = ConicSection::new(10.0, 0.98).unwrap();
    let period = conic.period().unwrap();
    let settings = SolverSettings::default();

    c.bench_function("propagate_from_periapsis/e=0.98", |b| {
        b.iter_batched(
            || {
                (0..samples)
                    .map(|_| rng.random_range(-period / 2.0..period / 2.0))
                    .collect::<Vec<_>>()
            },
            |times| {
                for dt in times {
                    black_box(propagate_from_periapsis(&conic, black_box(dt), &settings));
                }
            },
            BatchSize::LargeInput,
        )
    });
}

/// One minute of animation at 60 frames per second
fn bench_session_ticks(c: &mut Criterion) {
    c.bench_function("orbit_session/3600_ticks", |b| {
        b.iter_batched(
            || {
                let mut session = OrbitSession::new(
                    CentralBody::Earth,
                    default_elements(),
                    SessionParams::default(),
                )
                .unwrap();
                session.play().unwrap();
                session
            },
            |mut session| {
                for _ in 0..3600 {
                    black_box(session.tick(black_box(1.0 / 60.0)));
                }
            },
            BatchSize::SmallInput,
        )
    });
}

criterion_group!(
    name = benches;
    config = Criterion::default();
    targets = bench_table_ellipse, bench_table_hyperbola, bench_universal_solver, bench_session_ticks
);
criterion_main!(benches);
