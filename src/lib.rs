//! Moop Runtime – a homoiconic, reversible IR with a cooperative actor engine
//!
//! This crate implements the core of the Moop language runtime:
//! - HRIR: a homoiconic intermediate representation whose cells are
//!   self-describing, potentially-reversible operations with paired inverses
//! - An execution engine over HRIR programs with stepped execution,
//!   checkpointing, and structural undo/rollback
//! - A cooperative actor runtime: per-actor key-value state, FIFO mailboxes,
//!   and a tick scheduler that delivers at most one message per actor
//! - An indentation-scoped handler interpreter with assignment, message
//!   sends, `if`/`while`/`for`, and an in-process arithmetic evaluator

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

/// Actor runtime: state, mailboxes, registry, and the definition parser
pub mod actor;
/// Homoiconic Reversible IR: cells, programs, and the execution engine
pub mod hrir;
/// Handler interpreter: block parsing, evaluation, and execution
pub mod interpreter;

// Re-export key types for convenience
pub use actor::{ActorDefinition, ActorId, ActorRuntime, RuntimeConfig};
pub use hrir::{Cell, Engine, Opcode, Program};

/// Current version of the Moop runtime
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
