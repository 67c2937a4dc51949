//! Predicates driving spatial-index traversal.
//!
//! A predicate answers two questions used by the traversal in
//! [`crate::index::kd_tree`]: *can a key satisfy this?* (used to emit an
//! entry) and *can any key inside this box satisfy this?* (used to prune a
//! subtree). `Satisfies` always answers "maybe" to the second question since
//! it wraps an opaque caller callable.

use std::rc::Rc;

use crate::bbox::Bbox;
use crate::point::Point;

/// A predicate over points, evaluated during a spatial traversal.
#[derive(Clone)]
pub enum Predicate {
    /// Point lies in the closed box (boundary included).
    Intersects(Bbox),
    /// Point lies in the open box (boundary excluded).
    Within(Bbox),
    /// Point lies strictly outside the closed box.
    Disjoint(Bbox),
    /// The `k` points nearest to a query point, in non-decreasing distance.
    /// Always evaluated via the dedicated best-first traversal, never via
    /// `admits_point`/`admits_box`.
    Nearest(Point, usize),
    /// Arbitrary caller-supplied predicate.
    Satisfies(Rc<dyn Fn(&Point) -> bool>),
}

impl std::fmt::Debug for Predicate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Predicate::Intersects(b) => f.debug_tuple("Intersects").field(b).finish(),
            Predicate::Within(b) => f.debug_tuple("Within").field(b).finish(),
            Predicate::Disjoint(b) => f.debug_tuple("Disjoint").field(b).finish(),
            Predicate::Nearest(p, k) => f.debug_tuple("Nearest").field(p).field(k).finish(),
            Predicate::Satisfies(_) => f.debug_tuple("Satisfies").field(&"<fn>").finish(),
        }
    }
}

impl Predicate {
    /// Does `p` satisfy this predicate? (the "emit" query)
    pub fn admits_point(&self, p: &Point) -> bool {
        match self {
            Predicate::Intersects(b) => b.contains_point(p),
            Predicate::Within(b) => b.contains_point_open(p),
            Predicate::Disjoint(b) => !b.contains_point(p),
            Predicate::Nearest(..) => true,
            Predicate::Satisfies(f) => f(p),
        }
    }

    /// Can any point inside `mbr` possibly satisfy this predicate? Returning
    /// `false` lets the traversal prune the whole subtree.
    pub fn admits_box(&self, mbr: &Bbox) -> bool {
        match self {
            Predicate::Intersects(b) => !b.is_disjoint(mbr),
            Predicate::Within(b) => !b.is_disjoint(mbr),
            Predicate::Disjoint(b) => !b.contains_box(mbr),
            Predicate::Nearest(..) => true,
            Predicate::Satisfies(_) => true,
        }
    }

    /// Discriminator used to order a predicate list cheapest/most-selective
    /// first when the list contains a `Disjoint`. Root MBR volume is the
    /// yardstick; smaller selectivity weight sorts first.
    pub fn selectivity_weight(&self, root_volume: f64) -> f64 {
        match self {
            Predicate::Intersects(b) | Predicate::Within(b) => b.volume(),
            Predicate::Disjoint(b) => (root_volume - b.volume()).max(0.0),
            Predicate::Nearest(..) => 0.0,
            Predicate::Satisfies(_) => root_volume,
        }
    }
}

/// Orders a predicate list cheapest/most-selective first whenever it
/// contains a [`Predicate::Disjoint`]; stable and deterministic even when
/// `root_volume` is zero (an all-empty front).
pub fn order_predicates(predicates: &mut [Predicate], root_volume: f64) {
    if predicates.iter().any(|p| matches!(p, Predicate::Disjoint(_))) {
        predicates.sort_by(|a, b| {
            a.selectivity_weight(root_volume)
                .partial_cmp(&b.selectivity_weight(root_volume))
                .unwrap_or(std::cmp::Ordering::Equal)
        });
    }
}

#[cfg(test)]
pub mod test {
    use super::*;

    #[test]
    fn test_intersects_includes_boundary() {
        let b = Bbox::new(Point::new([0.0, 0.0]), Point::new([1.0, 1.0]));
        let pred = Predicate::Intersects(b);
        assert!(pred.admits_point(&Point::new([0.0, 0.0])));
        assert!(pred.admits_point(&Point::new([1.0, 1.0])));
    }

    #[test]
    fn test_within_excludes_boundary() {
        let b = Bbox::new(Point::new([0.0, 0.0]), Point::new([1.0, 1.0]));
        let pred = Predicate::Within(b);
        assert!(!pred.admits_point(&Point::new([0.0, 0.0])));
        assert!(pred.admits_point(&Point::new([0.5, 0.5])));
    }

    #[test]
    fn test_disjoint_excludes_closed_box() {
        let b = Bbox::new(Point::new([0.0, 0.0]), Point::new([1.0, 1.0]));
        let pred = Predicate::Disjoint(b);
        assert!(!pred.admits_point(&Point::new([0.0, 0.0])));
        assert!(pred.admits_point(&Point::new([2.0, 2.0])));
    }

    #[test]
    fn test_satisfies_custom_fn() {
        let pred = Predicate::Satisfies(Rc::new(|p: &Point| p.get(0) > 3.0));
        assert!(pred.admits_point(&Point::new([4.0])));
        assert!(!pred.admits_point(&Point::new([2.0])));
        // box query always "maybe" for custom predicates
        let b = Bbox::new(Point::new([0.0]), Point::new([1.0]));
        assert!(pred.admits_box(&b));
    }

    #[test]
    fn test_order_predicates_stable_when_empty_volume() {
        let mut preds = vec![
            Predicate::Disjoint(Bbox::new(Point::new([0.0]), Point::new([0.0]))),
            Predicate::Intersects(Bbox::new(Point::new([0.0]), Point::new([0.0]))),
        ];
        order_predicates(&mut preds, 0.0);
        assert_eq!(preds.len(), 2);
    }
}
