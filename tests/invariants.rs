//! Property tests for the invariants documented on [`pareto_store::Front`]
//! and [`pareto_store::Archive`]: non-domination within a front, layered
//! domination and boundedness across an archive, and the insert/erase
//! round-trip.

use pareto_store::{Archive, Direction, Front, Point};
use proptest::prelude::*;

fn dir2_min() -> Direction {
    Direction::all_minimize(2)
}

proptest! {
    #[test]
    fn front_stays_non_dominated(coords in proptest::collection::vec((-50.0f64..50.0, -50.0f64..50.0), 0..40)) {
        let mut f: Front<usize> = Front::new(dir2_min());
        for (i, (x, y)) in coords.iter().enumerate() {
            f.insert(Point::new([*x, *y]), i).unwrap();
        }
        let entries = f.entries();
        for (i, (p, _)) in entries.iter().enumerate() {
            for (j, (q, _)) in entries.iter().enumerate() {
                if i != j {
                    prop_assert!(!p.dominates(q, &dir2_min()), "{:?} dominates {:?} within the same front", p, q);
                }
            }
        }
    }

    #[test]
    fn front_insert_then_erase_every_key_is_empty(coords in proptest::collection::vec((-50.0f64..50.0, -50.0f64..50.0), 0..30)) {
        let mut f: Front<usize> = Front::new(dir2_min());
        let mut keys = Vec::new();
        for (i, (x, y)) in coords.iter().enumerate() {
            let p = Point::new([*x, *y]);
            if f.insert(p.clone(), i).unwrap() {
                keys.push(p);
            }
        }
        for k in &keys {
            prop_assert_eq!(f.erase(k), 1);
        }
        prop_assert!(f.is_empty());
    }

    #[test]
    fn archive_is_bounded_and_layered_by_domination(
        coords in proptest::collection::vec((-50.0f64..50.0, -50.0f64..50.0), 0..60),
        capacity in 1usize..20,
    ) {
        let mut a: Archive<usize> = Archive::new(dir2_min(), capacity);
        for (i, (x, y)) in coords.iter().enumerate() {
            a.insert(Point::new([*x, *y]), i).unwrap();
        }
        prop_assert!(a.total_size() <= capacity);
        // every layer has at least one entry, and every point in layer j is
        // dominated by some point in an earlier layer i < j.
        for i in 0..a.front_count() {
            prop_assert!(a.front(i).unwrap().len() > 0);
        }
        for j in 1..a.front_count() {
            let later = a.front(j).unwrap();
            for (p, _) in later.entries() {
                let dominated = (0..j).any(|i| a.front(i).unwrap().dominates(p));
                prop_assert!(dominated, "entry {:?} in layer {j} is not dominated by any earlier layer", p);
            }
        }
    }

    #[test]
    fn archive_insert_then_erase_every_key_is_empty(coords in proptest::collection::vec((-50.0f64..50.0, -50.0f64..50.0), 0..30)) {
        // capacity high enough that nothing gets trimmed mid-run, so every
        // insert that lands stays until explicitly erased.
        let mut a: Archive<usize> = Archive::new(dir2_min(), coords.len().max(1));
        for (i, (x, y)) in coords.iter().enumerate() {
            a.insert(Point::new([*x, *y]), i).unwrap();
        }
        // read back whatever is actually present rather than trusting each
        // insert's own return value, since a later cascade can still evict
        // an earlier "stored" entry before this read.
        let keys: Vec<Point> = (0..a.front_count())
            .flat_map(|i| a.front(i).unwrap().entries().into_iter().map(|(p, _)| p.clone()).collect::<Vec<_>>())
            .collect();
        for k in &keys {
            prop_assert_eq!(a.erase(k), 1);
        }
        prop_assert!(a.is_empty());
    }
}
