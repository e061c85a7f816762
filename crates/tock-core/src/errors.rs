//! Cross-cutting error types for tock.
//!
//! Store-specific errors (`DatabaseError`) live in `tock-db`, which wraps
//! these entity checks into its own precondition variants.

use thiserror::Error;

/// An entity failed a check that needs no store access.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CoreError {
    #[error("empty synopsis")]
    EmptySynopsis,

    #[error("no task association")]
    NoTaskAssociation,

    #[error("stop before start")]
    StopBeforeStart,
}
