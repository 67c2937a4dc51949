//! Exercises the log-producing code paths (insertion, deletion, archive
//! capacity eviction) under an initialized logger, so the `log::trace!`/
//! `log::warn!` call sites are at least reached once under test.

use pareto_store::{Archive, Direction, Point};

#[test]
fn archive_capacity_eviction_logs_a_warning() {
    let _ = env_logger::builder().is_test(true).try_init();

    let mut a: Archive<usize> = Archive::new(Direction::all_minimize(2), 2);
    for i in 0..10 {
        let c = (10 - i) as f64;
        a.insert(Point::new([c, i as f64]), i).unwrap();
    }
    assert!(a.total_size() <= 2);
}

#[test]
fn kd_tree_insert_and_erase_log_trace_paths() {
    let _ = env_logger::builder().is_test(true).try_init();

    let mut f = pareto_store::Front::<usize>::new(Direction::all_minimize(2));
    for (i, c) in [[0.0, 5.0], [1.0, 4.0], [2.0, 3.0], [3.0, 2.0], [4.0, 1.0]].iter().enumerate() {
        f.insert(Point::new(*c), i).unwrap();
    }
    assert_eq!(f.len(), 5);
    assert_eq!(f.erase(&Point::new([2.0, 3.0])), 1);
    assert_eq!(f.len(), 4);
}
