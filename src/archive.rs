//! Layered archive: an ordered stack of [`Front`]s with a bounded total size
//! and crowding-distance eviction, cascading dominated points downward on
//! every insert.

use rand::Rng;

use crate::error::Result;
use crate::front::{Front, HypervolumeKernel};
use crate::point::{Direction, Point};

/// Ordered stack of fronts `F_0, F_1, ..., F_{L-1}` plus a capacity `C`.
///
/// Maintains three properties on every mutation: every point in layer `F_j`
/// is dominated by some point in an earlier layer `F_i` (`i<j`); no layer is
/// ever left empty once created; and the total entry count across all
/// layers never exceeds `capacity`.
#[derive(Debug)]
pub struct Archive<V> {
    fronts: Vec<Front<V>>,
    direction: Direction,
    capacity: usize,
    established_dim: Option<usize>,
}

impl<V> Archive<V> {
    /// An empty archive under `direction` with the given total capacity.
    pub fn new(direction: Direction, capacity: usize) -> Self {
        Self {
            fronts: Vec::new(),
            direction,
            capacity,
            established_dim: None,
        }
    }

    /// Total capacity.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of non-empty layers.
    pub fn front_count(&self) -> usize {
        self.fronts.len()
    }

    /// Access to a specific layer.
    pub fn front(&self, i: usize) -> Option<&Front<V>> {
        self.fronts.get(i)
    }

    /// Total number of entries across all layers.
    pub fn total_size(&self) -> usize {
        self.fronts.iter().map(Front::len).sum()
    }

    /// `true` iff no entries anywhere.
    pub fn is_empty(&self) -> bool {
        self.fronts.is_empty()
    }

    fn locate_target_front(&self, p: &Point) -> usize {
        let (mut lo, mut hi) = (0usize, self.fronts.len());
        while lo < hi {
            let mid = (lo + hi) / 2;
            if self.fronts[mid].dominates(p) {
                lo = mid + 1;
            } else {
                hi = mid;
            }
        }
        lo
    }

    /// Inserts `(p, v)`, cascading any points `p` dominates down into later
    /// layers, then trimming to capacity. Returns whether `p` ended up
    /// stored (trimming can remove the very entry just inserted).
    pub fn insert(&mut self, p: Point, v: V) -> Result<bool> {
        match self.established_dim {
            Some(d) => p.check_dim(d)?,
            None => self.established_dim = Some(p.dim()),
        }
        let key = p.clone();
        let i_star = self.locate_target_front(&p);
        let inserted = self.try_insert(i_star, p, v)?;
        self.trim_to_capacity();
        if inserted && self.find(&key).is_none() {
            return Ok(false);
        }
        Ok(inserted)
    }

    fn try_insert(&mut self, i: usize, p: Point, v: V) -> Result<bool> {
        if i >= self.fronts.len() {
            if self.total_size() >= self.capacity {
                log::warn!("archive: capacity {} exhausted, dropping cascaded entry at layer {i}", self.capacity);
                return Ok(false);
            }
            self.fronts.push(Front::new(self.direction.clone()));
        }
        // Pull out (not discard) whatever `p` dominates in this layer so it
        // can cascade into the next one, then insert `p` itself.
        let displaced = self.fronts[i].extract_dominated_by(&p);
        let inserted = self.fronts[i].insert(p, v)?;
        if !inserted {
            return Ok(false);
        }
        for (dp, dv) in displaced {
            self.try_insert(i + 1, dp, dv)?;
        }
        Ok(true)
    }

    fn trim_to_capacity(&mut self) {
        loop {
            let total = self.total_size();
            if total <= self.capacity || self.fronts.is_empty() {
                break;
            }
            let last = self.fronts.len() - 1;
            let k = self.fronts[last].len();
            let excess = total - self.capacity;
            if excess >= k {
                self.fronts.pop();
            } else {
                let mut cd = self.fronts[last].crowding_distances();
                cd.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap());
                for (key, _) in cd.into_iter().take(excess) {
                    self.fronts[last].erase(&key);
                }
                break;
            }
        }
    }

    /// Removes the entry keyed by `p`. Returns the count removed (0 or 1).
    pub fn erase(&mut self, p: &Point) -> usize {
        let idx = match self.fronts.iter().position(|f| f.find(p).is_some()) {
            Some(i) => i,
            None => return 0,
        };
        let removed = self.fronts[idx].erase(p);
        if removed == 0 {
            return 0;
        }
        if self.fronts[idx].is_empty() {
            self.fronts.remove(idx);
            if idx > 0 {
                self.cascade_promote(idx - 1);
            }
        } else {
            self.cascade_promote(idx);
        }
        removed
    }

    /// Moves entries of `F_{idx+1}` no longer dominated by anything in
    /// `F_idx` up into `F_idx`, reusing the insert cascade to keep every
    /// later layer consistent.
    fn cascade_promote(&mut self, idx: usize) {
        if idx + 1 >= self.fronts.len() {
            return;
        }
        let candidates: Vec<Point> = self.fronts[idx + 1]
            .entries()
            .iter()
            .filter(|(k, _)| !self.fronts[idx].dominates(k))
            .map(|(k, _)| (*k).clone())
            .collect();
        for key in candidates {
            if let Some((p2, v2)) = self.fronts[idx + 1].take_by_key(&key) {
                let _ = self.try_insert(idx, p2, v2);
            }
        }
        if idx + 1 < self.fronts.len() && self.fronts[idx + 1].is_empty() {
            self.fronts.remove(idx + 1);
        }
    }

    /// Looks up the entry keyed by `p`, scanning layers front-order.
    pub fn find(&self, p: &Point) -> Option<(&Point, &V)> {
        self.fronts.iter().find_map(|f| f.find(p))
    }

    /// Entries in the closed box `[lo, hi]`, front-order union.
    pub fn find_intersection(&self, lo: Point, hi: Point) -> Vec<(&Point, &V)> {
        self.fronts.iter().flat_map(|f| f.find_intersection(lo.clone(), hi.clone())).collect()
    }

    /// Entries in the open box `(lo, hi)`, front-order union.
    pub fn find_within(&self, lo: Point, hi: Point) -> Vec<(&Point, &V)> {
        self.fronts.iter().flat_map(|f| f.find_within(lo.clone(), hi.clone())).collect()
    }

    /// Entries strictly outside the closed box `[lo, hi]`, front-order union.
    pub fn find_disjoint(&self, lo: Point, hi: Point) -> Vec<(&Point, &V)> {
        self.fronts.iter().flat_map(|f| f.find_disjoint(lo.clone(), hi.clone())).collect()
    }

    /// The `k` entries nearest `point`, across *all* layers (not `k` per
    /// layer).
    pub fn find_nearest(&self, point: &Point, k: usize) -> Vec<(&Point, &V)> {
        let mut all: Vec<(&Point, &V)> = self.fronts.iter().flat_map(Front::entries).collect();
        all.sort_by(|a, b| a.0.distance(point).partial_cmp(&b.0.distance(point)).unwrap());
        all.truncate(k);
        all
    }

    /// Exact hypervolume of the whole archive, i.e. of its top (most
    /// non-dominated) layer — later layers are dominated by construction and
    /// so contribute nothing to the indicator. `0.0` when empty.
    pub fn hypervolume_exact(&self, reference: &Point) -> f64 {
        self.front(0).map_or(0.0, |f| f.hypervolume_exact(reference))
    }

    /// [`Archive::hypervolume_exact`] computed by an injected
    /// [`HypervolumeKernel`].
    pub fn hypervolume_with_kernel(&self, reference: &Point, kernel: &dyn HypervolumeKernel) -> f64 {
        self.front(0).map_or(0.0, |f| f.hypervolume_with_kernel(reference, kernel))
    }

    /// Monte-Carlo hypervolume estimate of the top layer.
    pub fn hypervolume_monte_carlo(&self, reference: &Point, sample_size: usize, rng: &mut impl Rng) -> f64 {
        self.front(0).map_or(0.0, |f| f.hypervolume_monte_carlo(reference, sample_size, rng))
    }

    /// Fraction of `other`'s top layer dominated by this archive's top layer.
    pub fn coverage(&self, other: &Archive<V>) -> f64 {
        match (self.front(0), other.front(0)) {
            (Some(mine), Some(theirs)) => mine.coverage(theirs),
            _ => 0.0,
        }
    }

    /// Mean nearest-neighbour distance from this archive's top layer to
    /// `reference`'s top layer. `NaN` when either is empty.
    pub fn generational_distance(&self, reference: &Archive<V>) -> f64 {
        match (self.front(0), reference.front(0)) {
            (Some(mine), Some(theirs)) => mine.generational_distance(theirs),
            _ => f64::NAN,
        }
    }

    /// Mean nearest-neighbour distance from `reference`'s top layer to this
    /// archive's top layer. `NaN` when either is empty.
    pub fn inverted_generational_distance(&self, reference: &Archive<V>) -> f64 {
        match (self.front(0), reference.front(0)) {
            (Some(mine), Some(theirs)) => mine.inverted_generational_distance(theirs),
            _ => f64::NAN,
        }
    }

    /// Symmetric Hausdorff distance between the two archives' top layers.
    pub fn hausdorff_distance(&self, reference: &Archive<V>) -> f64 {
        match (self.front(0), reference.front(0)) {
            (Some(mine), Some(theirs)) => mine.hausdorff_distance(theirs),
            _ => f64::NAN,
        }
    }

    /// Minimum pairwise distance among the top layer's entries; `+inf` when
    /// the archive has fewer than 2 entries in its top layer (including when
    /// it is empty).
    pub fn uniformity(&self) -> f64 {
        self.front(0).map_or(f64::INFINITY, Front::uniformity)
    }
}

#[cfg(test)]
pub mod test {
    use super::*;

    fn dir2_min() -> Direction {
        Direction::all_minimize(2)
    }

    #[test]
    fn test_s4_capacity_trim_by_crowding_distance() {
        let mut a: Archive<i32> = Archive::new(dir2_min(), 3);
        for (i, c) in [[1.0, 5.0], [2.0, 4.0], [3.0, 3.0], [4.0, 2.0], [5.0, 1.0]].iter().enumerate() {
            a.insert(Point::new(*c), i as i32).unwrap();
        }
        assert_eq!(a.total_size(), 3);
        assert_eq!(a.front_count(), 1);
        // the two interior-most points are the most crowded and should be gone
        assert!(a.find(&Point::new([1.0, 5.0])).is_some());
        assert!(a.find(&Point::new([5.0, 1.0])).is_some());
    }

    #[test]
    fn test_s5_layering() {
        let mut a: Archive<i32> = Archive::new(dir2_min(), 10);
        a.insert(Point::new([2.0, 2.0]), 0).unwrap();
        a.insert(Point::new([3.0, 3.0]), 1).unwrap();
        a.insert(Point::new([4.0, 4.0]), 2).unwrap();
        a.insert(Point::new([1.0, 1.0]), 3).unwrap();
        assert_eq!(a.front_count(), 4);
        assert_eq!(a.front(0).unwrap().entries()[0].0, &Point::new([1.0, 1.0]));
        assert_eq!(a.front(1).unwrap().entries()[0].0, &Point::new([2.0, 2.0]));
        assert_eq!(a.front(2).unwrap().entries()[0].0, &Point::new([3.0, 3.0]));
        assert_eq!(a.front(3).unwrap().entries()[0].0, &Point::new([4.0, 4.0]));
    }

    #[test]
    fn test_capacity_zero_accepts_nothing() {
        let mut a: Archive<i32> = Archive::new(dir2_min(), 0);
        let inserted = a.insert(Point::new([1.0, 1.0]), 0).unwrap();
        assert!(!inserted);
        assert_eq!(a.total_size(), 0);
    }

    #[test]
    fn test_capacity_one_retains_latest_non_dominated() {
        let mut a: Archive<i32> = Archive::new(dir2_min(), 1);
        a.insert(Point::new([5.0, 5.0]), 0).unwrap();
        assert!(a.insert(Point::new([1.0, 1.0]), 1).unwrap());
        assert_eq!(a.total_size(), 1);
        assert!(a.find(&Point::new([1.0, 1.0])).is_some());
    }

    #[test]
    fn test_erase_promotes_from_next_layer() {
        let mut a: Archive<i32> = Archive::new(dir2_min(), 10);
        a.insert(Point::new([1.0, 1.0]), 0).unwrap();
        a.insert(Point::new([2.0, 2.0]), 1).unwrap();
        assert_eq!(a.front_count(), 2);
        assert_eq!(a.erase(&Point::new([1.0, 1.0])), 1);
        assert_eq!(a.front_count(), 1);
        assert!(a.find(&Point::new([2.0, 2.0])).is_some());
    }

    #[test]
    fn test_erase_missing_key_returns_zero() {
        let mut a: Archive<i32> = Archive::new(dir2_min(), 10);
        a.insert(Point::new([1.0, 1.0]), 0).unwrap();
        assert_eq!(a.erase(&Point::new([9.0, 9.0])), 0);
    }

    #[test]
    fn test_archive_hypervolume_delegates_to_top_layer() {
        let mut a: Archive<()> = Archive::new(dir2_min(), 10);
        a.insert(Point::new([0.0, 2.0]), ()).unwrap();
        a.insert(Point::new([1.0, 1.0]), ()).unwrap();
        a.insert(Point::new([2.0, 0.0]), ()).unwrap();
        let hv = a.hypervolume_exact(&Point::new([3.0, 3.0]));
        assert!((hv - 6.0).abs() < 1e-9, "hv = {hv}");
    }

    #[test]
    fn test_archive_hypervolume_empty_is_zero() {
        let a: Archive<i32> = Archive::new(dir2_min(), 10);
        assert_eq!(a.hypervolume_exact(&Point::new([1.0, 1.0])), 0.0);
        assert_eq!(a.uniformity(), f64::INFINITY);
    }

    #[test]
    fn test_archive_coverage_delegates_to_top_layers() {
        let mut a: Archive<i32> = Archive::new(dir2_min(), 10);
        a.insert(Point::new([0.0, 0.0]), 0).unwrap();
        let mut b: Archive<i32> = Archive::new(dir2_min(), 10);
        b.insert(Point::new([1.0, 1.0]), 1).unwrap();
        assert_eq!(a.coverage(&b), 1.0);
        assert_eq!(b.coverage(&a), 0.0);
    }

    #[test]
    fn test_bounded_invariant_after_many_inserts() {
        let mut a: Archive<i32> = Archive::new(dir2_min(), 5);
        for i in 0..20 {
            let c = (20 - i) as f64;
            a.insert(Point::new([c, i as f64]), i).unwrap();
        }
        assert!(a.total_size() <= 5);
    }
}
