use criterion::{criterion_group, criterion_main, Criterion};
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::hint::black_box;

use pareto_store::{Archive, Direction, Point};

const SEED: u64 = 42;
const DIM: usize = 4;

fn random_point(rng: &mut StdRng) -> Point {
    Point::new((0..DIM).map(|_| rng.gen_range(0.0..1000.0)).collect::<Vec<_>>())
}

fn bench_archive_insert(c: &mut Criterion, size: usize) {
    let mut rng = StdRng::seed_from_u64(SEED);
    let points: Vec<Point> = (0..size).map(|_| random_point(&mut rng)).collect();
    c.bench_function(&format!("archive insert {size}"), |b| {
        b.iter(|| {
            let mut archive: Archive<usize> = Archive::new(Direction::all_minimize(DIM), size);
            for (i, p) in points.iter().enumerate() {
                black_box(archive.insert(p.clone(), i).unwrap());
            }
            archive
        })
    });
}

fn insert_1k(c: &mut Criterion) {
    bench_archive_insert(c, 1_000);
}

fn insert_10k(c: &mut Criterion) {
    bench_archive_insert(c, 10_000);
}

criterion_group!(benches, insert_1k, insert_10k);
criterion_main!(benches);
