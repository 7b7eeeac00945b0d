//! Error taxonomy for the graph store and its external collaborators.
//!
//! The search core itself never produces any of these: contradictions found
//! during the driven search are routine dead-end transitions consumed by
//! `unwindSearchEdge`-equivalent code, not errors. Only allocation entry
//! points (graph construction) and the (external) graph readers surface
//! these variants.

use thiserror::Error;

/// Status taxonomy mirrored from the original tool's `Status` enum.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HcError {
    /// The global allocator aborts on failure in safe Rust, so this variant
    /// is never actually constructed today; it is retained because it is
    /// part of the public contract callers porting from the original tool
    /// expect, and because a future `try_reserve`-based reader could
    /// plausibly produce it.
    #[error("out of memory")]
    OutOfMemory,

    #[error("graph name exceeds the maximum title length")]
    InvalidName,

    #[error("vertex count exceeds the maximum supported point count")]
    TooManyVertices,

    #[error("failed to read graph file: {0}")]
    FileReadError(String),

    #[error("expected another token while parsing graph input")]
    MissingToken,

    #[error("graph input was malformed: {0}")]
    InvalidInput(String),

    #[error("referenced vertex is missing from the graph")]
    MissingReference,

    #[error("internal timing error")]
    TimingError,
}

pub type HcResult<T> = Result<T, HcError>;
