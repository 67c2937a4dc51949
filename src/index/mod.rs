//! Generic multi-dimensional spatial index.
//!
//! Of the usual index variants for this kind of container (linear scan,
//! point-quadtree, kd-tree, R-tree) this crate implements one — a kd-tree
//! augmented with a per-node subtree bounding box. See `DESIGN.md` for the
//! grounding.

pub mod kd_tree;

pub use kd_tree::KdTree;
