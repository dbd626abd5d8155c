//! The HRIR core: homoiconic, potentially-reversible IR cells
//!
//! Every HRIR cell is a self-describing operation: an opcode, its arguments,
//! and (when the operation is invertible) an owned inverse cell. Programs are
//! append-only sequences of cells with a program counter; the [`Engine`]
//! steps a program forward and backward and supports a single checkpoint
//! slot for rollback. Reversibility here is structural: undoing a step
//! replays recorded bookkeeping, it does not re-derive information.

pub mod cell;
pub mod engine;
pub mod program;

pub use cell::{Cell, Opcode, OpcodeError};
pub use engine::{Engine, EngineError, StepOutcome};
pub use program::{Program, ProgramStats};

/// Convenience result alias for engine operations.
pub type EngineResult<T> = std::result::Result<T, EngineError>;
