//! Handler interpreter for the Moop actor runtime
//!
//! Handler bodies are indentation-scoped text. This module parses them into
//! a closed statement tree ([`block`]), evaluates expressions and conditions
//! ([`eval`]), and executes blocks against a per-invocation
//! [`ExecutionContext`] ([`exec`]). The interpreter is deliberately
//! forgiving: structural problems in a statement are diagnostics, and the
//! rest of the handler still runs.

/// Indentation block parsing and the closed statement grammar.
pub mod block;
/// The per-invocation execution context.
pub mod context;
/// Expression and condition evaluation.
pub mod eval;
/// Block execution with control flow.
pub mod exec;

pub use block::{AssignTarget, Node, Statement, parse_handler_body};
pub use context::{ExecutionContext, OutboundMessage};
pub use eval::{evaluate, evaluate_condition};
pub use exec::run_block;
