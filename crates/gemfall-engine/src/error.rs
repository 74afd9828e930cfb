use gemfall_core::{GemKind, GridError, Position};

use crate::ConfigError;

/// Internal inconsistencies detected while resolving a cascade.
///
/// These never result from caller input; they indicate a bug in the engine or
/// in a [`GemSource`](gemfall_generator::GemSource) implementation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum InvariantViolation {
    /// A matched cell was already empty when it was cleared.
    #[display("matched cell {position} holds no gem")]
    MissingGem {
        /// The empty matched cell.
        position: Position,
    },
    /// A gem was left above an empty cell after gravity was applied.
    #[display("gem at {position} floats above an empty cell after collapse")]
    GapAfterCollapse {
        /// The floating gem.
        position: Position,
    },
    /// A cell remained empty after refilling.
    #[display("cell {position} is still empty after refill")]
    EmptyAfterRefill {
        /// The empty cell.
        position: Position,
    },
    /// The gem source produced a kind outside its own palette.
    #[display("gem source produced kind {kind} outside its palette of {palette_size}")]
    UnknownKind {
        /// The offending kind.
        kind: GemKind,
        /// Size of the source's palette.
        palette_size: usize,
    },
}

/// Errors that stop a cascade.
///
/// None of these are recoverable: a driver receiving one should stop driving
/// the resolver and report a defect.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error, derive_more::From,
)]
pub enum CascadeError {
    /// A grid access was out of bounds.
    #[display("grid access failed: {_0}")]
    Grid(#[from] GridError),
    /// An internal invariant was violated.
    #[display("invariant violated: {_0}")]
    Invariant(#[from] InvariantViolation),
    /// The resolver was built from an invalid configuration.
    #[display("invalid configuration: {_0}")]
    Config(#[from] ConfigError),
    /// The cascade was still producing matches after the allowed number of cycles.
    ///
    /// The grid is left full and the resolver idle.
    #[display("cascade did not settle within {cycles} cycles")]
    CycleLimitExceeded {
        /// Number of completed cycles.
        cycles: usize,
    },
}
