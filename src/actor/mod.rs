//! The cooperative actor runtime
//!
//! Actors are isolated units of computation: each owns a key-value state
//! store and a FIFO mailbox. The [`ActorRuntime`] registry owns every
//! spawned actor, assigns ids from an instance-local counter, and drives
//! cooperative processing ticks that deliver at most one message per actor.
//! Handler bodies execute through the [`interpreter`](crate::interpreter).

pub mod actor;
pub mod error;
pub mod mailbox;
pub mod parser;
pub mod registry;
pub mod state;

pub use actor::{Actor, ActorDefinition, ActorId, Handler, HandlerDefinition};
pub use error::{ActorError, ActorResult};
pub use mailbox::{Mailbox, Message};
pub use parser::parse_actor;
pub use registry::{ActorRuntime, LogEntry, RuntimeConfig, TickReport};
pub use state::ActorState;
