//! kd-tree spatial index with per-node subtree bounding boxes.
//!
//! Generalises `do_util`'s `pareto_pq::kd_tree::KDTreeFront` (a const-generic,
//! `Box`-linked kd-tree that already stores a subtree bound `b` per node) to
//! runtime dimensionality, arena-backed nodes (via [`NodePool`]), a
//! predicate-driven traversal, and best-first k-NN (Hjaltason-Samet). The
//! deletion algorithm (successor swap from the fuller child, recursing)
//! mirrors `do_util`'s `remove_link`.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use ordered_float::OrderedFloat;

use crate::bbox::Bbox;
use crate::error::Error;
use crate::node_pool::{NodeData, NodeId, NodePool};
use crate::point::Point;
use crate::predicate::{order_predicates, Predicate};

/// Generic multi-dimensional container mapping `Point -> V`.
#[derive(Debug)]
pub struct KdTree<V> {
    pool: NodePool<V>,
    root: Option<NodeId>,
    dim: Option<usize>,
    len: usize,
    next_seq: u64,
}

impl<V> Default for KdTree<V> {
    fn default() -> Self {
        Self {
            pool: NodePool::new(),
            root: None,
            dim: None,
            len: 0,
            next_seq: 0,
        }
    }
}

/// Payload extracted from the tree by an erase.
struct Removed<V> {
    point: Point,
    value: V,
}

impl<V> KdTree<V> {
    /// An empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries.
    pub fn size(&self) -> usize {
        self.len
    }

    /// `true` iff empty.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Dimensionality established at first insertion, if any.
    pub fn dimensions(&self) -> Option<usize> {
        self.dim
    }

    /// Removes every entry and forgets the established dimensionality.
    pub fn clear(&mut self) {
        self.pool = NodePool::new();
        self.root = None;
        self.len = 0;
        self.dim = None;
        self.next_seq = 0;
    }

    /// Key (structural) lookup.
    pub fn point_of(&self, id: NodeId) -> &Point {
        &self.pool.get(id).point
    }

    /// Value lookup.
    pub fn value_of(&self, id: NodeId) -> &V {
        &self.pool.get(id).value
    }

    /// Mutable value lookup.
    pub fn value_of_mut(&mut self, id: NodeId) -> &mut V {
        &mut self.pool.get_mut(id).value
    }

    /// The root's subtree bound, i.e. the MBR of every stored point.
    pub fn root_bounds(&self) -> Option<&Bbox> {
        self.root.map(|r| &self.pool.get(r).bounds)
    }

    /// Inserts `(point, value)`. Returns the entry's id and whether it was
    /// newly inserted.
    pub fn insert(&mut self, point: Point, value: V) -> Result<(NodeId, bool), Error> {
        if let Some(d) = self.dim {
            point.check_dim(d)?;
        } else {
            self.dim = Some(point.dim());
        }
        let dim = self.dim.unwrap();
        let seq = self.next_seq;
        self.next_seq += 1;

        let root = match self.root {
            None => {
                let id = self.pool.alloc(NodeData {
                    bounds: Bbox::from_point(point.clone()),
                    point,
                    value,
                    parent: None,
                    left: None,
                    right: None,
                    seq,
                });
                self.root = Some(id);
                self.len = 1;
                return Ok((id, true));
            }
            Some(r) => r,
        };

        let mut cur = root;
        let mut depth = 0usize;
        loop {
            let (found, go_left, child) = {
                let node = self.pool.get(cur);
                if node.point.key_eq(&point) {
                    (true, false, None)
                } else {
                    let d = depth % dim;
                    let go_left = point.get(d) < node.point.get(d);
                    (false, go_left, if go_left { node.left } else { node.right })
                }
            };
            if found {
                return Ok((cur, false));
            }
            match child {
                Some(next) => {
                    cur = next;
                    depth += 1;
                }
                None => {
                    let id = self.pool.alloc(NodeData {
                        bounds: Bbox::from_point(point.clone()),
                        point,
                        value,
                        parent: Some(cur),
                        left: None,
                        right: None,
                        seq,
                    });
                    if go_left {
                        self.pool.get_mut(cur).left = Some(id);
                    } else {
                        self.pool.get_mut(cur).right = Some(id);
                    }
                    self.len += 1;
                    self.propagate_bounds(Some(cur));
                    log::trace!("kd_tree: inserted at depth {depth}");
                    return Ok((id, true));
                }
            }
        }
    }

    /// Looks up the entry with key `== point`.
    pub fn find(&self, point: &Point) -> Option<NodeId> {
        let dim = self.dim?;
        if point.dim() != dim {
            return None;
        }
        let mut cur = self.root?;
        let mut depth = 0usize;
        loop {
            let node = self.pool.get(cur);
            if node.point.key_eq(point) {
                return Some(cur);
            }
            let d = depth % dim;
            let next = if point.get(d) < node.point.get(d) {
                node.left
            } else {
                node.right
            };
            match next {
                Some(n) => {
                    cur = n;
                    depth += 1;
                }
                None => return None,
            }
        }
    }

    /// Erases the entry with key `== point`. Returns the count removed (0 or 1).
    pub fn erase_point(&mut self, point: &Point) -> usize {
        match self.find(point) {
            None => 0,
            Some(id) => {
                self.erase_id(id);
                1
            }
        }
    }

    /// Erases a specific entry by id.
    pub fn erase_id(&mut self, id: NodeId) {
        self.take(id);
    }

    /// Removes `id`, returning its former `(point, value)`.
    pub fn take(&mut self, id: NodeId) -> (Point, V) {
        let removed = self.remove_node(id);
        self.len -= 1;
        (removed.point, removed.value)
    }

    fn detach_from_parent(&mut self, id: NodeId, parent: Option<NodeId>) {
        match parent {
            None => self.root = None,
            Some(p) => {
                let pn = self.pool.get_mut(p);
                if pn.left == Some(id) {
                    pn.left = None;
                } else {
                    pn.right = None;
                }
            }
        }
    }

    /// Removes `id`, relinking children as necessary, and returns its
    /// former `(point, value)`.
    fn remove_node(&mut self, id: NodeId) -> Removed<V> {
        let (left, right, parent) = {
            let n = self.pool.get(id);
            (n.left, n.right, n.parent)
        };
        if left.is_none() && right.is_none() {
            self.detach_from_parent(id, parent);
            let data = self.pool.free(id);
            self.propagate_bounds(parent);
            log::trace!("kd_tree: erased leaf");
            return Removed {
                point: data.point,
                value: data.value,
            };
        }

        let dim_here = self.dim_at(id);
        let successor_subtree = if let Some(r) = right {
            r
        } else {
            // Only a left child: move it to the right, as a node with only
            // a left child is handled by borrowing the "has right child"
            // case (mirrors `do_util`'s `remove_link`).
            let l = left.unwrap();
            let node = self.pool.get_mut(id);
            node.right = Some(l);
            node.left = None;
            l
        };
        let min_id = self.search_extreme(successor_subtree, dim_here, true);
        let removed = self.remove_node(min_id);

        let node = self.pool.get_mut(id);
        let orig_point = std::mem::replace(&mut node.point, removed.point);
        let orig_value = std::mem::replace(&mut node.value, removed.value);
        self.recompute_bounds(id);
        let parent_of_id = self.pool.get(id).parent;
        self.propagate_bounds(parent_of_id);
        log::trace!("kd_tree: erased internal node via successor swap");
        Removed {
            point: orig_point,
            value: orig_value,
        }
    }

    fn dim_at(&self, id: NodeId) -> usize {
        let dim = self.dim.unwrap();
        let mut depth = 0usize;
        let mut cur = id;
        while let Some(p) = self.pool.get(cur).parent {
            depth += 1;
            cur = p;
        }
        depth % dim
    }

    fn recompute_bounds(&mut self, id: NodeId) {
        let (point, left, right) = {
            let n = self.pool.get(id);
            (n.point.clone(), n.left, n.right)
        };
        let mut b = Bbox::from_point(point);
        if let Some(l) = left {
            b = b.combine(&self.pool.get(l).bounds);
        }
        if let Some(r) = right {
            b = b.combine(&self.pool.get(r).bounds);
        }
        self.pool.get_mut(id).bounds = b;
    }

    fn propagate_bounds(&mut self, mut id: Option<NodeId>) {
        while let Some(cur) = id {
            self.recompute_bounds(cur);
            id = self.pool.get(cur).parent;
        }
    }

    /// Finds the minimum (or maximum) entry on dimension `target_dim` in the
    /// subtree rooted at `start`, using each node's precomputed subtree
    /// bound as a per-axis lower/upper bound (mirrors `do_util`'s
    /// `rec_search_minimum`/`mut_rec_search_minimum`, generalised to runtime
    /// dimensionality and to both directions).
    fn search_extreme(&self, start: NodeId, target_dim: usize, minimize: bool) -> NodeId {
        let mut cur = start;
        loop {
            let node = self.pool.get(cur);
            let v_e = node.point.get(target_dim);
            let bound_of = |child: Option<NodeId>| -> Option<f64> {
                child.map(|c| {
                    let b = &self.pool.get(c).bounds;
                    if minimize {
                        b.min().get(target_dim)
                    } else {
                        b.max().get(target_dim)
                    }
                })
            };
            let better = |a: f64, b: f64| if minimize { a < b } else { a > b };
            let v_l = bound_of(node.left);
            let v_r = bound_of(node.right);
            let go = match (v_l, v_r) {
                (None, None) => None,
                (Some(vl), None) => node.left.filter(|_| better(vl, v_e)),
                (None, Some(vr)) => node.right.filter(|_| better(vr, v_e)),
                (Some(vl), Some(vr)) => {
                    if better(vl, v_e) && !better(vr, vl) {
                        node.left
                    } else if better(vr, v_e) {
                        node.right
                    } else {
                        None
                    }
                }
            };
            match go {
                Some(next) => cur = next,
                None => return cur,
            }
        }
    }

    /// Entry with the smallest key on dimension `d`.
    pub fn min_element(&self, d: usize) -> Option<(&Point, &V)> {
        let root = self.root?;
        let id = self.search_extreme(root, d, true);
        Some((self.point_of(id), self.value_of(id)))
    }

    /// Entry with the largest key on dimension `d`.
    pub fn max_element(&self, d: usize) -> Option<(&Point, &V)> {
        let root = self.root?;
        let id = self.search_extreme(root, d, false);
        Some((self.point_of(id), self.value_of(id)))
    }

    /// Returns ids of every entry satisfying all of `predicates`, in
    /// tree-DFS left-to-right order, pruning subtrees whose bound cannot
    /// satisfy some predicate.
    pub fn find_matching(&self, predicates: &[Predicate]) -> Vec<NodeId> {
        let mut ordered: Vec<Predicate> = predicates.to_vec();
        let root_volume = self.root.map(|r| self.pool.get(r).bounds.volume()).unwrap_or(0.0);
        order_predicates(&mut ordered, root_volume);
        let mut out = Vec::new();
        if let Some(root) = self.root {
            self.collect_matching(root, &ordered, &mut out);
        }
        out
    }

    fn collect_matching(&self, id: NodeId, predicates: &[Predicate], out: &mut Vec<NodeId>) {
        let node = self.pool.get(id);
        if predicates.iter().any(|p| !p.admits_box(&node.bounds)) {
            return;
        }
        if let Some(l) = node.left {
            self.collect_matching(l, predicates, out);
        }
        if predicates.iter().all(|p| p.admits_point(&node.point)) {
            out.push(id);
        }
        if let Some(r) = node.right {
            self.collect_matching(r, predicates, out);
        }
    }

    /// Entries in the closed box `[lo, hi]`.
    pub fn find_intersection(&self, lo: Point, hi: Point) -> Vec<NodeId> {
        self.find_matching(&[Predicate::Intersects(Bbox::new(lo, hi))])
    }

    /// Entries in the open box `(lo, hi)`.
    pub fn find_within(&self, lo: Point, hi: Point) -> Vec<NodeId> {
        self.find_matching(&[Predicate::Within(Bbox::new(lo, hi))])
    }

    /// Entries strictly outside the closed box `[lo, hi]`.
    pub fn find_disjoint(&self, lo: Point, hi: Point) -> Vec<NodeId> {
        self.find_matching(&[Predicate::Disjoint(Bbox::new(lo, hi))])
    }

    /// All entries, tree-DFS left-to-right order.
    pub fn iter_ids(&self) -> Vec<NodeId> {
        self.find_matching(&[])
    }

    /// The `k` nearest entries to `point`, non-decreasing distance, ties
    /// broken by insertion order.
    pub fn find_nearest(&self, point: &Point, k: usize) -> Vec<NodeId> {
        if k == 0 {
            return Vec::new();
        }
        let mut heap: BinaryHeap<Reverse<HeapItem>> = BinaryHeap::new();
        if let Some(root) = self.root {
            let bound = self.pool.get(root).bounds.distance_to_point(point);
            heap.push(Reverse(HeapItem {
                distance: OrderedFloat(bound),
                kind_rank: 0,
                seq: 0,
                candidate: Candidate::Subtree(root),
            }));
        }
        let mut result = Vec::with_capacity(k.min(self.len));
        while let Some(Reverse(item)) = heap.pop() {
            if result.len() >= k {
                break;
            }
            match item.candidate {
                Candidate::Subtree(id) => {
                    let node = self.pool.get(id);
                    heap.push(Reverse(HeapItem {
                        distance: OrderedFloat(node.point.distance(point)),
                        kind_rank: 1,
                        seq: node.seq,
                        candidate: Candidate::Point(id),
                    }));
                    if let Some(l) = node.left {
                        let bound = self.pool.get(l).bounds.distance_to_point(point);
                        heap.push(Reverse(HeapItem {
                            distance: OrderedFloat(bound),
                            kind_rank: 0,
                            seq: 0,
                            candidate: Candidate::Subtree(l),
                        }));
                    }
                    if let Some(r) = node.right {
                        let bound = self.pool.get(r).bounds.distance_to_point(point);
                        heap.push(Reverse(HeapItem {
                            distance: OrderedFloat(bound),
                            kind_rank: 0,
                            seq: 0,
                            candidate: Candidate::Subtree(r),
                        }));
                    }
                }
                Candidate::Point(id) => result.push(id),
            }
        }
        result
    }

    /// The `k` entries nearest `query` by point-to-box distance, same
    /// best-first order as [`KdTree::find_nearest`] but bounding against a
    /// [`Bbox`] instead of a single point.
    pub fn find_nearest_box(&self, query: &Bbox, k: usize) -> Vec<NodeId> {
        if k == 0 {
            return Vec::new();
        }
        let mut heap: BinaryHeap<Reverse<HeapItem>> = BinaryHeap::new();
        if let Some(root) = self.root {
            let bound = self.pool.get(root).bounds.distance_to_box(query);
            heap.push(Reverse(HeapItem {
                distance: OrderedFloat(bound),
                kind_rank: 0,
                seq: 0,
                candidate: Candidate::Subtree(root),
            }));
        }
        let mut result = Vec::with_capacity(k.min(self.len));
        while let Some(Reverse(item)) = heap.pop() {
            if result.len() >= k {
                break;
            }
            match item.candidate {
                Candidate::Subtree(id) => {
                    let node = self.pool.get(id);
                    let point_bound = query.distance_to_point(&node.point);
                    heap.push(Reverse(HeapItem {
                        distance: OrderedFloat(point_bound),
                        kind_rank: 1,
                        seq: node.seq,
                        candidate: Candidate::Point(id),
                    }));
                    if let Some(l) = node.left {
                        let bound = self.pool.get(l).bounds.distance_to_box(query);
                        heap.push(Reverse(HeapItem {
                            distance: OrderedFloat(bound),
                            kind_rank: 0,
                            seq: 0,
                            candidate: Candidate::Subtree(l),
                        }));
                    }
                    if let Some(r) = node.right {
                        let bound = self.pool.get(r).bounds.distance_to_box(query);
                        heap.push(Reverse(HeapItem {
                            distance: OrderedFloat(bound),
                            kind_rank: 0,
                            seq: 0,
                            candidate: Candidate::Subtree(r),
                        }));
                    }
                }
                Candidate::Point(id) => result.push(id),
            }
        }
        result
    }

    /// Builds the tree from `entries` by inserting the median first and
    /// recursively bulk-inserting the left and right halves, balancing depth
    /// instead of degrading under an adversarial insertion order. Intended
    /// for an empty tree; any entries already present are left in place and
    /// the new ones still land via the ordinary insert traversal.
    pub fn bulk_insert(&mut self, entries: Vec<(Point, V)>) -> Result<(), Error> {
        if entries.is_empty() {
            return Ok(());
        }
        let dim = match self.dim {
            Some(d) => d,
            None => entries[0].0.dim(),
        };
        for (p, _) in &entries {
            p.check_dim(dim)?;
        }
        self.bulk_insert_rec(entries, 0, dim)
    }

    fn bulk_insert_rec(&mut self, mut entries: Vec<(Point, V)>, depth: usize, dim: usize) -> Result<(), Error> {
        if entries.is_empty() {
            return Ok(());
        }
        let axis = depth % dim;
        entries.sort_by(|a, b| a.0.get(axis).partial_cmp(&b.0.get(axis)).unwrap());
        let mid = entries.len() / 2;
        let right = entries.split_off(mid + 1);
        let (median_point, median_value) = entries.pop().expect("non-empty entries has a median");
        self.insert(median_point, median_value)?;
        self.bulk_insert_rec(entries, depth + 1, dim)?;
        self.bulk_insert_rec(right, depth + 1, dim)?;
        Ok(())
    }
}

#[derive(Clone, Copy)]
enum Candidate {
    Subtree(NodeId),
    Point(NodeId),
}

struct HeapItem {
    distance: OrderedFloat<f64>,
    /// Subtrees (0) are resolved before points (1) at an equal bound; only
    /// affects expansion order, not correctness.
    kind_rank: u8,
    seq: u64,
    candidate: Candidate,
}

impl PartialEq for HeapItem {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}
impl Eq for HeapItem {}
impl PartialOrd for HeapItem {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for HeapItem {
    fn cmp(&self, other: &Self) -> Ordering {
        self.distance
            .cmp(&other.distance)
            .then(self.kind_rank.cmp(&other.kind_rank))
            .then(self.seq.cmp(&other.seq))
    }
}
