//! Non-dominated front: a spatial index with the Pareto non-domination
//! invariant enforced on every insert, plus the indicator metrics used to
//! compare fronts.

use rand::Rng;

use crate::bbox::Bbox;
use crate::index::KdTree;
use crate::point::{Direction, Point};

/// A set of mutually non-dominated points, each mapped to a value `V`.
#[derive(Debug)]
pub struct Front<V> {
    index: KdTree<V>,
    direction: Direction,
}

impl<V> Front<V> {
    /// An empty front under `direction`.
    pub fn new(direction: Direction) -> Self {
        Self {
            index: KdTree::new(),
            direction,
        }
    }

    /// The direction vector this front was built with.
    pub fn direction(&self) -> &Direction {
        &self.direction
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.index.size()
    }

    /// `true` iff empty.
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Established dimensionality, if any entry has been inserted.
    pub fn dimensions(&self) -> Option<usize> {
        self.index.dimensions()
    }

    /// Inserts `(p, v)`, keeping the front mutually non-dominated.
    ///
    /// Rejects (returns `false`, leaves the front unchanged) when `p` is
    /// dominated by an existing entry or equals an existing key. Otherwise
    /// any entries `p` dominates are evicted before `p` is inserted.
    pub fn insert(&mut self, p: Point, v: V) -> Result<bool, crate::error::Error> {
        if self.index.find(&p).is_some() {
            return Ok(false);
        }
        if self.dominates(&p) {
            return Ok(false);
        }
        for id in self.find_dominated_by(&p) {
            self.index.erase_id(id);
        }
        self.index.insert(p, v)?;
        Ok(true)
    }

    /// Removes the entry keyed by `p`. Returns the count removed (0 or 1).
    pub fn erase(&mut self, p: &Point) -> usize {
        self.index.erase_point(p)
    }

    /// Looks up the entry keyed by `p`.
    pub fn find(&self, p: &Point) -> Option<(&Point, &V)> {
        self.index.find(p).map(|id| (self.index.point_of(id), self.index.value_of(id)))
    }

    /// Removes and returns the entry keyed by `key`, for callers (the
    /// archive) that need to relocate an entry to another front.
    pub(crate) fn take_by_key(&mut self, key: &Point) -> Option<(Point, V)> {
        let id = self.index.find(key)?;
        Some(self.index.take(id))
    }

    /// Removes and returns every entry `p` dominates, without inserting `p`
    /// itself. Used by the archive to cascade evicted entries into the next
    /// layer instead of discarding them the way [`Front::insert`] does.
    pub(crate) fn extract_dominated_by(&mut self, p: &Point) -> Vec<(Point, V)> {
        self.find_dominated_by(p).into_iter().map(|id| self.index.take(id)).collect()
    }

    fn find_dominated_by(&self, p: &Point) -> Vec<crate::node_pool::NodeId> {
        if self.index.is_empty() {
            return Vec::new();
        }
        let worst = self.worst_point();
        let lo = Point::new((0..p.dim()).map(|i| worst.get(i).min(p.get(i))).collect::<Vec<_>>());
        let hi = Point::new((0..p.dim()).map(|i| worst.get(i).max(p.get(i))).collect::<Vec<_>>());
        self.index
            .find_intersection(lo, hi)
            .into_iter()
            .filter(|&id| p.dominates(self.index.point_of(id), &self.direction))
            .collect()
    }

    /// `true` iff some entry dominates `q`.
    pub fn dominates(&self, q: &Point) -> bool {
        self.entries().iter().any(|(k, _)| k.dominates(q, &self.direction))
    }

    /// `true` iff neither the front dominates `q` nor `q` dominates any entry.
    pub fn non_dominates(&self, q: &Point) -> bool {
        !self.dominates(q) && !self.entries().iter().any(|(k, _)| q.dominates(k, &self.direction))
    }

    /// `true` iff every entry of `other` is dominated by some entry of `self`.
    pub fn dominates_front(&self, other: &Front<V>) -> bool {
        other.entries().iter().all(|(q, _)| self.dominates(q))
    }

    /// `true` iff neither front dominates the other.
    pub fn non_dominates_front(&self, other: &Front<V>) -> bool {
        !self.dominates_front(other) && !other.dominates_front(self)
    }

    /// Every `(key, value)` pair, tree-DFS left-to-right order.
    pub fn entries(&self) -> Vec<(&Point, &V)> {
        self.index
            .iter_ids()
            .into_iter()
            .map(|id| (self.index.point_of(id), self.index.value_of(id)))
            .collect()
    }

    fn point_set(&self) -> Vec<Point> {
        self.entries().into_iter().map(|(p, _)| p.clone()).collect()
    }

    /// Entries in the closed box `[lo, hi]`.
    pub fn find_intersection(&self, lo: Point, hi: Point) -> Vec<(&Point, &V)> {
        self.index
            .find_intersection(lo, hi)
            .into_iter()
            .map(|id| (self.index.point_of(id), self.index.value_of(id)))
            .collect()
    }

    /// Entries in the open box `(lo, hi)`.
    pub fn find_within(&self, lo: Point, hi: Point) -> Vec<(&Point, &V)> {
        self.index
            .find_within(lo, hi)
            .into_iter()
            .map(|id| (self.index.point_of(id), self.index.value_of(id)))
            .collect()
    }

    /// Entries strictly outside the closed box `[lo, hi]`.
    pub fn find_disjoint(&self, lo: Point, hi: Point) -> Vec<(&Point, &V)> {
        self.index
            .find_disjoint(lo, hi)
            .into_iter()
            .map(|id| (self.index.point_of(id), self.index.value_of(id)))
            .collect()
    }

    /// The `k` nearest entries to `point`.
    pub fn find_nearest(&self, point: &Point, k: usize) -> Vec<(&Point, &V)> {
        self.index
            .find_nearest(point, k)
            .into_iter()
            .map(|id| (self.index.point_of(id), self.index.value_of(id)))
            .collect()
    }

    /// Entry with the smallest key on dimension `d`.
    pub fn min_element(&self, d: usize) -> Option<(&Point, &V)> {
        self.index.min_element(d)
    }

    /// Entry with the largest key on dimension `d`.
    pub fn max_element(&self, d: usize) -> Option<(&Point, &V)> {
        self.index.max_element(d)
    }

    /// Best attainable value in dimension `d` among stored entries.
    pub fn ideal(&self, d: usize) -> Option<f64> {
        if self.direction.is_minimize(d) {
            self.min_element(d).map(|(p, _)| p.get(d))
        } else {
            self.max_element(d).map(|(p, _)| p.get(d))
        }
    }

    /// Worst value among non-dominated points in dimension `d`.
    pub fn nadir(&self, d: usize) -> Option<f64> {
        if self.direction.is_minimize(d) {
            self.max_element(d).map(|(p, _)| p.get(d))
        } else {
            self.min_element(d).map(|(p, _)| p.get(d))
        }
    }

    /// The full ideal point, `None` when empty.
    pub fn ideal_point(&self) -> Option<Point> {
        let dim = self.direction.dim();
        (0..dim).map(|d| self.ideal(d)).collect::<Option<Vec<_>>>().map(Point::new)
    }

    /// The full nadir point, `None` when empty.
    pub fn nadir_point(&self) -> Option<Point> {
        let dim = self.direction.dim();
        (0..dim).map(|d| self.nadir(d)).collect::<Option<Vec<_>>>().map(Point::new)
    }

    fn worst_point(&self) -> Point {
        self.nadir_point().expect("worst_point called on a non-empty front")
    }

    /// Exact hypervolume dominated by this front, bounded by `reference`.
    pub fn hypervolume_exact(&self, reference: &Point) -> f64 {
        self.hypervolume_with_kernel(reference, &ExactHypervolumeKernel)
    }

    /// Exact hypervolume computed by an injected [`HypervolumeKernel`].
    pub fn hypervolume_with_kernel(&self, reference: &Point, kernel: &dyn HypervolumeKernel) -> f64 {
        if self.is_empty() {
            return 0.0;
        }
        kernel.hypervolume(&self.point_set(), &self.direction, reference)
    }

    /// Monte-Carlo hypervolume estimate: samples `sample_size` uniform
    /// points in the box `(ideal, reference)` and reports the empirical
    /// dominated fraction times the box volume.
    pub fn hypervolume_monte_carlo(&self, reference: &Point, sample_size: usize, rng: &mut impl Rng) -> f64 {
        if self.is_empty() || sample_size == 0 {
            return 0.0;
        }
        let ideal = self.ideal_point().unwrap();
        let bbox = Bbox::new(ideal, reference.clone());
        let box_volume = bbox.volume();
        if box_volume == 0.0 {
            return 0.0;
        }
        let dim = self.direction.dim();
        let mut hits = 0usize;
        for _ in 0..sample_size {
            let coords: Vec<f64> = (0..dim)
                .map(|i| {
                    let lo = bbox.min().get(i);
                    let hi = bbox.max().get(i);
                    if lo >= hi {
                        lo
                    } else {
                        rng.gen_range(lo..hi)
                    }
                })
                .collect();
            let sample = Point::new(coords);
            if self.entries().iter().any(|(k, _)| k.weakly_dominates(&sample, &self.direction)) {
                hits += 1;
            }
        }
        (hits as f64 / sample_size as f64) * box_volume
    }

    /// Fraction of `other`'s points dominated (weakly) by some entry of `self`.
    pub fn coverage(&self, other: &Front<V>) -> f64 {
        if other.is_empty() {
            return 0.0;
        }
        let mine = self.entries();
        let dominated = other
            .entries()
            .iter()
            .filter(|(q, _)| mine.iter().any(|(p, _)| p.weakly_dominates(q, &self.direction)))
            .count();
        dominated as f64 / other.len() as f64
    }

    /// Mean distance from each of `self`'s points to its nearest neighbour
    /// in `reference`. `NaN` if either front is empty.
    pub fn generational_distance(&self, reference: &Front<V>) -> f64 {
        if self.is_empty() || reference.is_empty() {
            return f64::NAN;
        }
        let refs = reference.point_set();
        let sum: f64 = self.point_set().iter().map(|p| min_dist_to_set(p, &refs)).sum();
        sum / self.len() as f64
    }

    /// Standard deviation companion to [`Front::generational_distance`].
    pub fn generational_distance_std(&self, reference: &Front<V>) -> f64 {
        if self.is_empty() || reference.is_empty() {
            return f64::NAN;
        }
        let refs = reference.point_set();
        let mean = self.generational_distance(reference);
        let n = self.len() as f64;
        let var = self
            .point_set()
            .iter()
            .map(|p| {
                let d = min_dist_to_set(p, &refs);
                (d - mean) * (d - mean)
            })
            .sum::<f64>()
            / n;
        var.sqrt()
    }

    /// Mean distance from each point of `reference` to its nearest neighbour
    /// in `self`.
    pub fn inverted_generational_distance(&self, reference: &Front<V>) -> f64 {
        if self.is_empty() || reference.is_empty() {
            return f64::NAN;
        }
        let mine = self.point_set();
        let sum: f64 = reference.point_set().iter().map(|p| min_dist_to_set(p, &mine)).sum();
        sum / reference.len() as f64
    }

    /// Standard deviation companion to [`Front::inverted_generational_distance`].
    pub fn inverted_generational_distance_std(&self, reference: &Front<V>) -> f64 {
        if self.is_empty() || reference.is_empty() {
            return f64::NAN;
        }
        let mine = self.point_set();
        let mean = self.inverted_generational_distance(reference);
        let n = reference.len() as f64;
        let var = reference
            .point_set()
            .iter()
            .map(|p| {
                let d = min_dist_to_set(p, &mine);
                (d - mean) * (d - mean)
            })
            .sum::<f64>()
            / n;
        var.sqrt()
    }

    /// IGD+: like [`Front::inverted_generational_distance`] but the distance
    /// from a reference point to a candidate only accumulates the axes on
    /// which the candidate is worse (Ishibuchi et al.'s modified distance).
    pub fn inverted_generational_distance_plus(&self, reference: &Front<V>) -> f64 {
        if self.is_empty() || reference.is_empty() {
            return f64::NAN;
        }
        let mine = self.point_set();
        let sum: f64 = reference
            .point_set()
            .iter()
            .map(|r| {
                mine.iter()
                    .map(|c| directed_distance_plus(c, r, &self.direction))
                    .fold(f64::INFINITY, f64::min)
            })
            .sum();
        sum / reference.len() as f64
    }

    /// Symmetric Hausdorff distance between `self` and `reference`.
    pub fn hausdorff_distance(&self, reference: &Front<V>) -> f64 {
        if self.is_empty() || reference.is_empty() {
            return f64::NAN;
        }
        let mine = self.point_set();
        let refs = reference.point_set();
        let fwd = mine.iter().map(|p| min_dist_to_set(p, &refs)).fold(0.0, f64::max);
        let bwd = refs.iter().map(|p| min_dist_to_set(p, &mine)).fold(0.0, f64::max);
        fwd.max(bwd)
    }

    /// Minimum pairwise distance among entries; `+inf` when fewer than 2.
    pub fn uniformity(&self) -> f64 {
        let pts = self.point_set();
        if pts.len() < 2 {
            return f64::INFINITY;
        }
        let mut m = f64::INFINITY;
        for i in 0..pts.len() {
            for j in (i + 1)..pts.len() {
                m = m.min(pts[i].distance(&pts[j]));
            }
        }
        m
    }

    /// Crowding distance for every entry: for each dimension `i`, build a
    /// degenerate box sharing the point's own coordinates on every other
    /// axis, with axis `i` stretched between the front's ideal and nadir on
    /// that axis; the distance from the 3 nearest points to that box, summed
    /// over all axes, is the point's crowding distance. A point near a box
    /// boundary of the front has few near neighbours within the slab and
    /// scores higher; a tightly packed interior point scores lower. Used by
    /// the archive's trim-to-capacity step to evict the least distinctive
    /// entries first.
    pub fn crowding_distances(&self) -> Vec<(Point, f64)> {
        let pts = self.point_set();
        let n = pts.len();
        if n == 0 {
            return Vec::new();
        }
        let dim = self.direction.dim();
        let ideal = match self.ideal_point() {
            Some(p) => p,
            None => return Vec::new(),
        };
        let nadir = self.worst_point();
        let mut dist = vec![0.0f64; n];
        for (i, p) in pts.iter().enumerate() {
            for d in 0..dim {
                let mut corner = p.coords().to_vec();
                let mut other = p.coords().to_vec();
                corner[d] = ideal.get(d);
                other[d] = nadir.get(d);
                let slab = Bbox::new(Point::new(corner), Point::new(other));
                let nearest = self.index.find_nearest_box(&slab, 3);
                for id in nearest {
                    dist[i] += slab.distance_to_point(self.index.point_of(id));
                }
            }
        }
        pts.into_iter().zip(dist).collect()
    }

    /// `x_i[d]`'s distance from the ideal on axis `d`: nonnegative regardless
    /// of whether `d` is minimised or maximised.
    fn x_line(&self, p: &Point, d: usize) -> f64 {
        let ideal_d = self.ideal(d).expect("x_line called on a non-empty front");
        if self.direction.is_minimize(d) {
            p.get(d) - ideal_d
        } else {
            ideal_d - p.get(d)
        }
    }

    /// Span between ideal and nadir on axis `d`, always `>= 0`.
    fn conflict_range(&self, d: usize) -> f64 {
        let ideal_d = self.ideal(d).expect("conflict_range called on a non-empty front");
        let nadir_d = self.nadir(d).expect("conflict_range called on a non-empty front");
        if self.direction.is_minimize(d) {
            nadir_d - ideal_d
        } else {
            ideal_d - nadir_d
        }
    }

    /// Direct conflict measure between dimensions `a` and `b`: sums, over
    /// every point, the gap between how far it sits from the ideal on `a`
    /// versus on `b`. Zero when the two axes agree on every point's
    /// standing; grows as points trade off one axis against the other.
    pub fn conflict_direct(&self, a: usize, b: usize) -> f64 {
        if self.is_empty() {
            return 0.0;
        }
        self.point_set().iter().map(|p| (self.x_line(p, a) - self.x_line(p, b)).abs()).sum()
    }

    /// Normalised [`Front::conflict_direct`], divided by the larger of the
    /// two axes' ideal-to-nadir span and by the entry count.
    pub fn conflict_direct_normalized(&self, a: usize, b: usize) -> f64 {
        if self.is_empty() {
            return 0.0;
        }
        let range = self.conflict_range(a).max(self.conflict_range(b));
        if range <= 0.0 {
            return 0.0;
        }
        self.conflict_direct(a, b) / (range * self.len() as f64)
    }

    /// Max-min conflict measure: like [`Front::conflict_direct`] but each
    /// axis's distance-from-ideal is first rescaled by its own span, so
    /// axes with very different units contribute comparably.
    pub fn conflict_maxmin(&self, a: usize, b: usize) -> f64 {
        if self.is_empty() {
            return 0.0;
        }
        let range_a = self.conflict_range(a);
        let range_b = self.conflict_range(b);
        self.point_set()
            .iter()
            .map(|p| {
                let ta = if range_a > 0.0 { self.x_line(p, a) / range_a } else { 0.0 };
                let tb = if range_b > 0.0 { self.x_line(p, b) / range_b } else { 0.0 };
                (ta - tb).abs()
            })
            .sum()
    }

    /// Normalised [`Front::conflict_maxmin`], in `[0, 1]`.
    pub fn conflict_maxmin_normalized(&self, a: usize, b: usize) -> f64 {
        if self.is_empty() {
            return 0.0;
        }
        self.conflict_maxmin(a, b) / self.len() as f64
    }

    /// 1-based rank of each point on axis `d`, best first (so index 0 under
    /// minimisation, or the largest value under maximisation, ranks 1). Ties
    /// resolve to the rank of the last tied point in sorted order, matching
    /// an overwrite-on-insert rank table.
    fn rank_of(&self, d: usize) -> Vec<usize> {
        let pts = self.point_set();
        let n = pts.len();
        let minimize = self.direction.is_minimize(d);
        let mut idx: Vec<usize> = (0..n).collect();
        idx.sort_by(|&x, &y| {
            let vx = pts[x].get(d);
            let vy = pts[y].get(d);
            if minimize {
                vx.partial_cmp(&vy).unwrap()
            } else {
                vy.partial_cmp(&vx).unwrap()
            }
        });
        let mut value_rank: Vec<(f64, usize)> = Vec::new();
        for (pos, &orig) in idx.iter().enumerate() {
            let v = pts[orig].get(d);
            let rank = pos + 1;
            match value_rank.iter_mut().find(|(vv, _)| *vv == v) {
                Some(entry) => entry.1 = rank,
                None => value_rank.push((v, rank)),
            }
        }
        (0..n)
            .map(|i| {
                let v = pts[i].get(d);
                value_rank.iter().find(|(vv, _)| *vv == v).unwrap().1
            })
            .collect()
    }

    /// Rank-based conflict measure between `a` and `b`: sum of absolute
    /// rank displacement between the two axes' orderings.
    pub fn conflict_rank_based(&self, a: usize, b: usize) -> f64 {
        if self.is_empty() {
            return 0.0;
        }
        let ra = self.rank_of(a);
        let rb = self.rank_of(b);
        (0..ra.len()).map(|i| ra[i].abs_diff(rb[i]) as f64).sum()
    }

    /// Normalised [`Front::conflict_rank_based`]: divided by the largest
    /// possible total rank displacement for `len()` points.
    pub fn conflict_rank_based_normalized(&self, a: usize, b: usize) -> f64 {
        let n = self.len();
        if n == 0 {
            return 0.0;
        }
        let denom: i64 = (1..=n as i64).map(|i| (2 * i - n as i64 - 1).abs()).sum();
        if denom == 0 {
            return 0.0;
        }
        self.conflict_rank_based(a, b) / denom as f64
    }
}

fn min_dist_to_set(p: &Point, set: &[Point]) -> f64 {
    set.iter().map(|q| p.distance(q)).fold(f64::INFINITY, f64::min)
}

fn directed_distance_plus(candidate: &Point, reference: &Point, dir: &Direction) -> f64 {
    (0..dir.dim())
        .map(|i| {
            let c = candidate.get(i);
            let r = reference.get(i);
            let excess = if dir.is_minimize(i) { (c - r).max(0.0) } else { (r - c).max(0.0) };
            excess * excess
        })
        .sum::<f64>()
        .sqrt()
}

/// Computes the exact hypervolume of a point set relative to a reference
/// point; injected so callers can swap in a faster or approximate kernel.
pub trait HypervolumeKernel {
    /// Exact hypervolume dominated by `points` under `direction`, bounded by
    /// `reference`.
    fn hypervolume(&self, points: &[Point], direction: &Direction, reference: &Point) -> f64;
}

/// Recursive slicing (HSO) exact hypervolume kernel.
#[derive(Debug, Default)]
pub struct ExactHypervolumeKernel;

impl HypervolumeKernel for ExactHypervolumeKernel {
    fn hypervolume(&self, points: &[Point], direction: &Direction, reference: &Point) -> f64 {
        let dim = direction.dim();
        let normalize = |p: &Point| -> Vec<f64> {
            (0..dim).map(|i| if direction.is_minimize(i) { p.get(i) } else { -p.get(i) }).collect()
        };
        let reference_n = normalize(reference);
        let points_n: Vec<Vec<f64>> = points
            .iter()
            .map(normalize)
            .filter(|p| (0..dim).all(|i| p[i] <= reference_n[i]))
            .collect();
        if points_n.is_empty() {
            return 0.0;
        }
        hv_recursive(&points_n, &reference_n)
    }
}

/// Recursive slicing hypervolume over a minimise-all point set, all of which
/// already dominate (or equal) `reference`.
fn hv_recursive(points: &[Vec<f64>], reference: &[f64]) -> f64 {
    let dim = reference.len();
    if points.is_empty() {
        return 0.0;
    }
    if dim == 1 {
        let best = points.iter().map(|p| p[0]).fold(f64::INFINITY, f64::min);
        return (reference[0] - best).max(0.0);
    }
    let mut sorted = points.to_vec();
    sorted.sort_by(|a, b| a[dim - 1].partial_cmp(&b[dim - 1]).unwrap());
    let mut total = 0.0;
    let mut slice: Vec<Vec<f64>> = Vec::new();
    let mut prev_coord = reference[dim - 1];
    for p in sorted {
        let height = prev_coord - p[dim - 1];
        if height > 0.0 && !slice.is_empty() {
            total += height * hv_recursive(&slice, &reference[..dim - 1]);
        }
        slice.push(p[..dim - 1].to_vec());
        slice = prune_nondominated(slice);
        prev_coord = p[dim - 1];
    }
    total
}

/// Keeps only the minimal (skyline) elements of a minimise-all point set.
fn prune_nondominated(points: Vec<Vec<f64>>) -> Vec<Vec<f64>> {
    let mut keep = Vec::with_capacity(points.len());
    for (i, pi) in points.iter().enumerate() {
        let dominated = points.iter().enumerate().any(|(j, pj)| {
            i != j && pj != pi && pj.iter().zip(pi.iter()).all(|(x, y)| x <= y)
        });
        if !dominated {
            keep.push(pi.clone());
        }
    }
    keep
}

#[cfg(test)]
pub mod test {
    use super::*;

    fn dir2_min() -> Direction {
        Direction::all_minimize(2)
    }

    #[test]
    fn test_s1_third_insert_rejected() {
        let mut f: Front<&str> = Front::new(dir2_min());
        assert!(f.insert(Point::new([1.0, 2.0]), "a").unwrap());
        assert!(f.insert(Point::new([2.0, 1.0]), "b").unwrap());
        assert!(!f.insert(Point::new([3.0, 3.0]), "c").unwrap());
        assert_eq!(f.len(), 2);
    }

    #[test]
    fn test_s2_insert_evicts_dominated() {
        let mut f: Front<&str> = Front::new(dir2_min());
        f.insert(Point::new([5.0, 5.0]), "old").unwrap();
        assert!(f.insert(Point::new([3.0, 3.0]), "new").unwrap());
        assert_eq!(f.len(), 1);
        assert!(f.entries()[0].0.key_eq(&Point::new([3.0, 3.0])));
    }

    #[test]
    fn test_s3_find_nearest() {
        let mut f: Front<&str> = Front::new(dir2_min());
        f.insert(Point::new([1.0, 3.0]), "a").unwrap();
        f.insert(Point::new([2.0, 2.0]), "b").unwrap();
        f.insert(Point::new([3.0, 1.0]), "c").unwrap();
        let nearest = f.find_nearest(&Point::new([2.0, 2.0]), 1);
        assert_eq!(*nearest[0].1, "b");
    }

    #[test]
    fn test_s6_exact_hypervolume() {
        let mut f: Front<()> = Front::new(dir2_min());
        f.insert(Point::new([0.0, 2.0]), ()).unwrap();
        f.insert(Point::new([1.0, 1.0]), ()).unwrap();
        f.insert(Point::new([2.0, 0.0]), ()).unwrap();
        let hv = f.hypervolume_exact(&Point::new([3.0, 3.0]));
        assert!((hv - 6.0).abs() < 1e-9, "hv = {hv}");
    }

    #[test]
    fn test_duplicate_key_rejected() {
        let mut f: Front<i32> = Front::new(dir2_min());
        assert!(f.insert(Point::new([1.0, 1.0]), 1).unwrap());
        assert!(!f.insert(Point::new([1.0, 1.0]), 2).unwrap());
        assert_eq!(f.len(), 1);
    }

    #[test]
    fn test_empty_front_metric_sentinels() {
        let f: Front<i32> = Front::new(dir2_min());
        assert_eq!(f.hypervolume_exact(&Point::new([1.0, 1.0])), 0.0);
        assert_eq!(f.uniformity(), f64::INFINITY);
        assert!(f.generational_distance(&f).is_nan());
    }

    #[test]
    fn test_coverage_full_and_none() {
        let mut a: Front<i32> = Front::new(dir2_min());
        a.insert(Point::new([0.0, 0.0]), 0).unwrap();
        let mut b: Front<i32> = Front::new(dir2_min());
        b.insert(Point::new([1.0, 1.0]), 1).unwrap();
        b.insert(Point::new([2.0, 2.0]), 2).unwrap();
        assert_eq!(a.coverage(&b), 1.0);
        assert_eq!(b.coverage(&a), 0.0);
    }

    #[test]
    fn test_crowding_distance_boundary_exceeds_interior() {
        let mut f: Front<i32> = Front::new(dir2_min());
        f.insert(Point::new([1.0, 5.0]), 0).unwrap();
        f.insert(Point::new([2.0, 4.0]), 1).unwrap();
        f.insert(Point::new([3.0, 3.0]), 2).unwrap();
        f.insert(Point::new([4.0, 2.0]), 3).unwrap();
        f.insert(Point::new([5.0, 1.0]), 4).unwrap();
        let cd = f.crowding_distances();
        let value_at = |c: [f64; 2]| cd.iter().find(|(p, _)| p.key_eq(&Point::new(c))).unwrap().1;
        // boundary points of the front: the nearest-3 slab query finds fewer
        // truly co-located neighbours, so their distance sum is larger.
        assert_eq!(value_at([1.0, 5.0]), 6.0);
        assert_eq!(value_at([5.0, 1.0]), 6.0);
        assert_eq!(value_at([2.0, 4.0]), 4.0);
        assert_eq!(value_at([3.0, 3.0]), 4.0);
        assert_eq!(value_at([4.0, 2.0]), 4.0);
    }

    #[test]
    fn test_ideal_and_nadir() {
        let mut f: Front<i32> = Front::new(dir2_min());
        f.insert(Point::new([1.0, 5.0]), 0).unwrap();
        f.insert(Point::new([5.0, 1.0]), 1).unwrap();
        assert_eq!(f.ideal_point().unwrap(), Point::new([1.0, 1.0]));
        assert_eq!(f.nadir_point().unwrap(), Point::new([5.0, 5.0]));
    }

    #[test]
    fn test_conflict_direct_zero_on_singleton_front() {
        // a lone entry is trivially its own ideal on every axis: no conflict.
        let mut f: Front<i32> = Front::new(dir2_min());
        f.insert(Point::new([2.0, 2.0]), 0).unwrap();
        assert_eq!(f.conflict_direct(0, 1), 0.0);
        assert_eq!(f.conflict_rank_based(0, 1), 0.0);
    }

    #[test]
    fn test_conflict_direct_is_direction_aware() {
        // flipping axis 1 to maximise should change which points are "close
        // to ideal" on that axis, and hence the conflict score against it.
        let mut f_min: Front<i32> = Front::new(dir2_min());
        f_min.insert(Point::new([1.0, 5.0]), 0).unwrap();
        f_min.insert(Point::new([3.0, 3.0]), 1).unwrap();
        f_min.insert(Point::new([5.0, 1.0]), 2).unwrap();

        let mut f_mixed: Front<i32> = Front::new(Direction::new(vec![true, false]));
        f_mixed.insert(Point::new([1.0, 5.0]), 0).unwrap();
        f_mixed.insert(Point::new([3.0, 3.0]), 1).unwrap();
        f_mixed.insert(Point::new([5.0, 1.0]), 2).unwrap();

        assert_ne!(f_min.conflict_direct(0, 1), f_mixed.conflict_direct(0, 1));
        assert_ne!(f_min.conflict_rank_based(0, 1), f_mixed.conflict_rank_based(0, 1));
    }

    #[test]
    fn test_conflict_rank_based_normalized_in_unit_range() {
        let mut f: Front<i32> = Front::new(dir2_min());
        f.insert(Point::new([1.0, 5.0]), 0).unwrap();
        f.insert(Point::new([3.0, 3.0]), 1).unwrap();
        f.insert(Point::new([5.0, 1.0]), 2).unwrap();
        let n = f.conflict_rank_based_normalized(0, 1);
        assert!((0.0..=1.0).contains(&n), "n = {n}");
    }
}
