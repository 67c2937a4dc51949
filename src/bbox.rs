//! Axis-aligned bounding boxes.

use crate::point::Point;

/// An axis-aligned box `(min, max)` with `min[i] <= max[i]` for every axis.
///
/// Construction always normalises rather than failing: corners are swapped
/// per axis as needed so `min[i] <= max[i]` always holds.
#[derive(Debug, Clone, PartialEq)]
pub struct Bbox {
    min: Point,
    max: Point,
}

impl Bbox {
    /// Builds a box from two corner points, normalising per-axis so that
    /// `min[i] <= max[i]` always holds afterwards.
    pub fn new(a: Point, b: Point) -> Self {
        debug_assert_eq!(a.dim(), b.dim());
        let dim = a.dim();
        let mut min = Vec::with_capacity(dim);
        let mut max = Vec::with_capacity(dim);
        for i in 0..dim {
            let (lo, hi) = if a.get(i) <= b.get(i) {
                (a.get(i), b.get(i))
            } else {
                (b.get(i), a.get(i))
            };
            min.push(lo);
            max.push(hi);
        }
        Self {
            min: Point::new(min),
            max: Point::new(max),
        }
    }

    /// A degenerate box that is exactly one point.
    pub fn from_point(p: Point) -> Self {
        Self {
            min: p.clone(),
            max: p,
        }
    }

    /// Number of dimensions.
    pub fn dim(&self) -> usize {
        self.min.dim()
    }

    /// Lower corner.
    pub fn min(&self) -> &Point {
        &self.min
    }

    /// Upper corner.
    pub fn max(&self) -> &Point {
        &self.max
    }

    /// `true` iff `min == max` on every axis.
    pub fn is_degenerate(&self) -> bool {
        self.min.key_eq(&self.max)
    }

    /// Product of per-axis extents.
    pub fn volume(&self) -> f64 {
        (0..self.dim()).map(|i| (self.max.get(i) - self.min.get(i)).max(0.0)).product()
    }

    /// Spherical over-approximation volume (radius = half-diagonal); biases
    /// a split heuristic against elongated boxes.
    pub fn spherical_volume(&self) -> f64 {
        let radius = self.diagonal_len() / 2.0;
        let dim = self.dim() as i32;
        unit_ball_volume(dim) * radius.powi(dim)
    }

    fn diagonal_len(&self) -> f64 {
        (0..self.dim())
            .map(|i| {
                let d = self.max.get(i) - self.min.get(i);
                d * d
            })
            .sum::<f64>()
            .sqrt()
    }

    /// Centroid point.
    pub fn centroid(&self) -> Point {
        Point::new(
            (0..self.dim())
                .map(|i| (self.min.get(i) + self.max.get(i)) / 2.0)
                .collect::<Vec<_>>(),
        )
    }

    /// Overlap volume between two boxes (0 when disjoint).
    pub fn overlap(&self, other: &Bbox) -> f64 {
        (0..self.dim())
            .map(|i| {
                let lo = self.min.get(i).max(other.min.get(i));
                let hi = self.max.get(i).min(other.max.get(i));
                (hi - lo).max(0.0)
            })
            .product()
    }

    /// Closed-box containment of a point.
    pub fn contains_point(&self, p: &Point) -> bool {
        (0..self.dim()).all(|i| self.min.get(i) <= p.get(i) && p.get(i) <= self.max.get(i))
    }

    /// Open-box containment of a point (boundary excluded), used by
    /// `find_within`.
    pub fn contains_point_open(&self, p: &Point) -> bool {
        (0..self.dim()).all(|i| self.min.get(i) < p.get(i) && p.get(i) < self.max.get(i))
    }

    /// `true` iff `other` is fully contained in `self`.
    pub fn contains_box(&self, other: &Bbox) -> bool {
        (0..self.dim()).all(|i| self.min.get(i) <= other.min.get(i) && other.max.get(i) <= self.max.get(i))
    }

    /// `true` iff the two boxes have empty intersection.
    pub fn is_disjoint(&self, other: &Bbox) -> bool {
        (0..self.dim()).any(|i| self.max.get(i) < other.min.get(i) || other.max.get(i) < self.min.get(i))
    }

    /// Smallest box enclosing both `self` and `other`.
    pub fn combine(&self, other: &Bbox) -> Bbox {
        let min = Point::new(
            (0..self.dim())
                .map(|i| self.min.get(i).min(other.min.get(i)))
                .collect::<Vec<_>>(),
        );
        let max = Point::new(
            (0..self.dim())
                .map(|i| self.max.get(i).max(other.max.get(i)))
                .collect::<Vec<_>>(),
        );
        Bbox { min, max }
    }

    /// Enlarges `self` to include `p`, returning the new box.
    pub fn stretch(&self, p: &Point) -> Bbox {
        let min = Point::new(
            (0..self.dim())
                .map(|i| self.min.get(i).min(p.get(i)))
                .collect::<Vec<_>>(),
        );
        let max = Point::new(
            (0..self.dim())
                .map(|i| self.max.get(i).max(p.get(i)))
                .collect::<Vec<_>>(),
        );
        Bbox { min, max }
    }

    /// How much `self.combine(other)` would waste relative to `self`
    /// (used by a split seed-selection heuristic).
    pub fn enlargement(&self, other: &Bbox) -> f64 {
        self.combine(other).volume() - self.volume()
    }

    /// Euclidean distance from `p` to the nearest point on (or in) this
    /// box; zero when `p` lies inside. Used as the k-NN distance lower
    /// bound during best-first traversal.
    pub fn distance_to_point(&self, p: &Point) -> f64 {
        (0..self.dim())
            .map(|i| {
                let v = p.get(i);
                let lo = self.min.get(i);
                let hi = self.max.get(i);
                let d = if v < lo {
                    lo - v
                } else if v > hi {
                    v - hi
                } else {
                    0.0
                };
                d * d
            })
            .sum::<f64>()
            .sqrt()
    }

    /// Euclidean distance between `self` and `other`; zero when they
    /// overlap. Per axis this is the gap between the two intervals, or zero
    /// when they overlap on that axis. Used as the k-NN distance lower bound
    /// when the query itself is a box rather than a point.
    pub fn distance_to_box(&self, other: &Bbox) -> f64 {
        (0..self.dim())
            .map(|i| {
                let a_lo = self.min.get(i);
                let a_hi = self.max.get(i);
                let b_lo = other.min.get(i);
                let b_hi = other.max.get(i);
                let d = if b_hi < a_lo {
                    a_lo - b_hi
                } else if a_hi < b_lo {
                    b_lo - a_hi
                } else {
                    0.0
                };
                d * d
            })
            .sum::<f64>()
            .sqrt()
    }
}

/// Volume of the unit ball in `dim` dimensions, used by
/// [`Bbox::spherical_volume`].
fn unit_ball_volume(dim: i32) -> f64 {
    use std::f64::consts::PI;
    PI.powi(dim / 2) / gamma_half_plus_one(dim)
}

/// `Gamma(dim/2 + 1)`, computed via the standard factorial / double-factorial
/// recurrences (avoids pulling in a gamma-function crate for a single call
/// site used only as a tie-breaking heuristic weight).
fn gamma_half_plus_one(dim: i32) -> f64 {
    if dim % 2 == 0 {
        let k = dim / 2;
        (1..=k).map(f64::from).product()
    } else {
        let k = dim;
        let mut num = 1.0;
        let mut i = k;
        while i > 0 {
            num *= f64::from(i);
            i -= 2;
        }
        num * std::f64::consts::PI.sqrt() / 2f64.powi((k + 1) / 2)
    }
}
