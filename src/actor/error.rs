//! Error types for the actor runtime
//!
//! Structural failures (unknown actor ids) are typed errors; semantic misses
//! during handler execution (unmatched events, unresolved names) are
//! non-fatal diagnostics carried in tick reports instead.

use thiserror::Error;

use super::actor::ActorId;

/// Actor runtime errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ActorError {
    /// No actor is registered under the given id.
    #[error("actor {0} not found")]
    ActorNotFound(ActorId),
}

/// Convenience result alias for actor runtime operations.
pub type ActorResult<T> = std::result::Result<T, ActorError>;
