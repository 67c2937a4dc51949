//! Error kinds for the store.
//!
//! Only [`Error::DimensionMismatch`] is ever returned as an `Err` from a
//! public operation — it is the only unrecoverable failure mode. The other
//! variants exist so callers and tests can name a failure mode explicitly
//! (e.g. when asserting that a metric call on an empty front returns a
//! documented sentinel rather than panicking), but the library itself never
//! constructs them as `Err`.

use thiserror::Error;

/// Failure kinds recognised by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Error {
    /// A point's dimensionality did not match the container's established
    /// dimensionality. Bubbles up from [`crate::point::Point`] construction
    /// to any caller; never retried internally.
    #[error("dimension mismatch: expected {expected}, found {found}")]
    DimensionMismatch {
        /// Dimensionality already established by the container.
        expected: usize,
        /// Dimensionality of the offending point.
        found: usize,
    },
    /// `at(p)` was called for a key that is not present. `find`/`get`
    /// variants return a sentinel (`None` / end iterator) instead of this.
    #[error("key not found")]
    KeyNotFound,
    /// A box was constructed with `min[i] > max[i]` for some axis. The
    /// public box constructors normalise silently instead of surfacing this;
    /// the variant exists for completeness and internal assertions.
    #[error("invalid box: axis {axis} has min > max")]
    InvalidBox {
        /// Offending axis.
        axis: usize,
    },
    /// An indicator metric was requested on an empty front. Public metric
    /// methods return the documented sentinel (`0`, `+inf`, or `NaN`)
    /// instead of this error.
    #[error("metric requested on an empty container")]
    EmptyContainerMetric,
    /// An archive insert could neither evict nor grow a new trailing front.
    /// Public inserts return `inserted = false` instead of this error.
    #[error("archive capacity exhausted")]
    CapacityExhausted,
}

/// Convenience alias for the one fallible operation in this crate.
pub type Result<T> = std::result::Result<T, Error>;
