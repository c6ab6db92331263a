//! Error types for placement, storage and group accounting.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::board::Point;

/// Why a placement was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlacementError {
    /// Point already holds a stone, committed or buffered this tick
    Occupied,
    /// Stone's group would have no liberties and nothing would be captured
    Suicide,
}

impl fmt::Display for PlacementError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlacementError::Occupied => write!(f, "illegal placement: point occupied"),
            PlacementError::Suicide => write!(f, "illegal placement: suicide"),
        }
    }
}

impl std::error::Error for PlacementError {}

/// Failure reported by a [`Store`](crate::store::Store).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StoreError {
    /// `create` on a point that already has a row
    Occupied(Point),
    /// `delete_by_point` on a point with no row
    Missing(Point),
    /// Backend could not be reached or refused the request
    Unavailable(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Occupied(p) => write!(f, "store: stone already exists @ {p}"),
            StoreError::Missing(p) => write!(f, "store: failed to delete stone @ {p}"),
            StoreError::Unavailable(msg) => write!(f, "store unavailable: {msg}"),
        }
    }
}

impl std::error::Error for StoreError {}

/// Group bookkeeping reached a state that cannot happen on a correct board.
///
/// These are bugs. Nothing recovers from them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvariantViolation {
    /// Ledger asked to add a stone where one already is
    Occupied(Point),
    /// Ledger asked about a stone it does not hold
    UnknownStone(Point),
    /// A stone was placed next to a group that did not list the point as a liberty
    MissingLiberty { group: usize, point: Point },
    /// Incremental liberties disagree with a flood fill of the board
    LibertyMismatch { group: usize },
    /// Group membership disagrees with a flood fill of the board
    MembershipMismatch { group: usize },
}

impl fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvariantViolation::Occupied(p) => write!(f, "ledger already holds a stone @ {p}"),
            InvariantViolation::UnknownStone(p) => write!(f, "ledger holds no stone @ {p}"),
            InvariantViolation::MissingLiberty { group, point } => {
                write!(f, "group {group} did not list {point} as a liberty")
            }
            InvariantViolation::LibertyMismatch { group } => {
                write!(f, "group {group} liberties do not match the board")
            }
            InvariantViolation::MembershipMismatch { group } => {
                write!(f, "group {group} members do not match the board")
            }
        }
    }
}

impl std::error::Error for InvariantViolation {}

/// Anything the engine can return to its caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    Illegal(PlacementError),
    Storage(StoreError),
    Invariant(InvariantViolation),
    /// A thread panicked while holding one of the engine's locks
    Poisoned,
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::Illegal(e) => e.fmt(f),
            EngineError::Storage(e) => e.fmt(f),
            EngineError::Invariant(e) => write!(f, "invariant violation: {e}"),
            EngineError::Poisoned => write!(f, "engine lock poisoned"),
        }
    }
}

impl std::error::Error for EngineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            EngineError::Illegal(e) => Some(e),
            EngineError::Storage(e) => Some(e),
            EngineError::Invariant(e) => Some(e),
            EngineError::Poisoned => None,
        }
    }
}

impl From<PlacementError> for EngineError {
    fn from(e: PlacementError) -> Self {
        EngineError::Illegal(e)
    }
}

impl From<StoreError> for EngineError {
    fn from(e: StoreError) -> Self {
        EngineError::Storage(e)
    }
}

impl From<InvariantViolation> for EngineError {
    fn from(e: InvariantViolation) -> Self {
        EngineError::Invariant(e)
    }
}

impl<T> From<std::sync::PoisonError<T>> for EngineError {
    fn from(_: std::sync::PoisonError<T>) -> Self {
        EngineError::Poisoned
    }
}
