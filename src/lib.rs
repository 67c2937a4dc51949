//! In-memory, multi-dimensional Pareto-optimal point store.
//!
//! Provides a spatial index over points in `R^n`, a non-dominated
//! [`front::Front`] built on top of it, and a layered, capacity-bounded
//! [`archive::Archive`] that stacks successive fronts.

// useful additional warnings (missing docs, crates imported but unused, ...)
#![warn(missing_debug_implementations)]
#![warn(missing_docs)]
#![warn(trivial_casts, trivial_numeric_casts)]
// #![warn(unsafe_code)]
#![warn(unused_extern_crates)]
#![warn(variant_size_differences)]

// some more useful warnings (no shadowing, similar names, ...)
#![warn(clippy::similar_names)]
#![warn(clippy::print_stdout)]
#![warn(clippy::use_debug)]
#![warn(clippy::shadow_unrelated)]
#![warn(clippy::shadow_same)]
#![warn(clippy::shadow_reuse)]

// checks integer arithmetic in the project & truncations (useful for debug)
// #![warn(clippy::integer_arithmetic)]
// #![warn(clippy::cast_possible_truncation)]
// #![warn(clippy::cast_possible_wrap)]
// #![warn(clippy::cast_precision_loss)]
// #![warn(clippy::cast_sign_loss)]

/// Failure kinds returned by the store's public operations.
pub mod error;

/// Points, per-axis directions, and dominance relations.
pub mod point;

/// Axis-aligned bounding boxes.
pub mod bbox;

/// Predicates driving spatial-index traversal.
pub mod predicate;

/// Arena-backed node storage shared by the spatial index.
pub mod node_pool;

/// The generic multi-dimensional spatial index.
pub mod index;

/// Non-dominated fronts and their indicator metrics.
pub mod front;

/// The layered, capacity-bounded archive of fronts.
pub mod archive;

pub use archive::Archive;
pub use bbox::Bbox;
pub use error::{Error, Result};
pub use front::{ExactHypervolumeKernel, Front, HypervolumeKernel};
pub use index::KdTree;
pub use node_pool::NodeId;
pub use point::{Direction, Point};
pub use predicate::Predicate;
