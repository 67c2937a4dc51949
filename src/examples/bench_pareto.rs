use std::time::Instant;

use rand::Rng;
use rand::prelude::ThreadRng;

use pareto_store::{Archive, Direction, Front, Point};

fn random_point(rng: &mut ThreadRng, dim: usize) -> Point {
    Point::new((0..dim).map(|_| rng.gen::<f64>()).collect::<Vec<_>>())
}

fn bench_front(dim: usize, nb_elts: usize) {
    let mut rng = rand::thread_rng();
    let points: Vec<Point> = (0..nb_elts).map(|_| random_point(&mut rng, dim)).collect();

    let mut front: Front<usize> = Front::new(Direction::all_minimize(dim));
    let start_insert = Instant::now();
    for (i, p) in points.iter().enumerate() {
        let _ = front.insert(p.clone(), i);
    }
    let time_insert = start_insert.elapsed().as_secs_f32();
    println!(
        "\t{:<8} inserts in {} seconds ({} inserts/s), {} survive",
        nb_elts,
        time_insert,
        nb_elts as f32 / time_insert,
        front.len(),
    );

    let keys: Vec<Point> = front.entries().into_iter().map(|(k, _)| k.clone()).collect();
    let mut nb_erased = 0usize;
    let start_erase = Instant::now();
    for k in &keys {
        nb_erased += front.erase(k);
    }
    let time_erase = start_erase.elapsed().as_secs_f32();
    println!(
        "\t{:<8} erases in {} seconds ({} erases/s)",
        nb_erased,
        time_erase,
        nb_erased as f32 / time_erase,
    );
}

fn bench_archive(dim: usize, nb_elts: usize, capacity: usize) {
    let mut rng = rand::thread_rng();
    let points: Vec<Point> = (0..nb_elts).map(|_| random_point(&mut rng, dim)).collect();

    let mut archive: Archive<usize> = Archive::new(Direction::all_minimize(dim), capacity);
    let start_insert = Instant::now();
    for (i, p) in points.iter().enumerate() {
        let _ = archive.insert(p.clone(), i);
    }
    let time_insert = start_insert.elapsed().as_secs_f32();
    println!(
        "\t{:<8} inserts in {} seconds ({} inserts/s), {} layers, {} entries",
        nb_elts,
        time_insert,
        nb_elts as f32 / time_insert,
        archive.front_count(),
        archive.total_size(),
    );
}

pub fn main() {
    println!("Front, 2 dimensions:");
    bench_front(2, 1_000_000);
    println!("Front, 4 dimensions:");
    bench_front(4, 200_000);
    println!("Archive, 2 dimensions, capacity 10000:");
    bench_archive(2, 1_000_000, 10_000);
}
