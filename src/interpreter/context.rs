//! Per-invocation execution context
//!
//! An [`ExecutionContext`] bundles everything a running handler can see: the
//! actor's persistent state, the triggering message payload, handler-scoped
//! locals, and a directory of actor names for resolving message targets.
//! Sends are buffered in an outbox and delivered by the registry only after
//! the tick's delivery pass, so a message is never visible to its target in
//! the tick that produced it.

use std::collections::BTreeMap;

use crate::actor::ActorId;
use crate::actor::state::ActorState;

/// A message produced by a handler, awaiting end-of-tick delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundMessage {
    /// Resolved target actor.
    pub target: ActorId,
    /// Event name to enqueue.
    pub event: String,
    /// Payload carried to the target.
    pub payload: String,
}

/// The transient context for one handler invocation.
#[derive(Debug)]
pub struct ExecutionContext<'a> {
    /// The owning actor's persistent state.
    pub state: &'a mut ActorState,
    /// Payload of the message that triggered this handler.
    pub payload: String,
    /// Handler-scoped local bindings, discarded when the handler returns.
    pub locals: BTreeMap<String, String>,
    /// Spawn-ordered (name, id) directory for target resolution.
    pub directory: Vec<(String, ActorId)>,
    /// Id of the actor running this handler.
    pub actor_id: ActorId,
    /// Messages queued for end-of-tick delivery.
    pub outbox: Vec<OutboundMessage>,
    /// Text recorded by `log` statements.
    pub log: Vec<String>,
    /// Non-fatal diagnostics recorded during execution.
    pub diagnostics: Vec<String>,
    /// Hard cap on `while` loop iterations.
    pub max_loop_iterations: usize,
}

impl<'a> ExecutionContext<'a> {
    /// Build a context for one handler invocation.
    pub fn new(
        state: &'a mut ActorState,
        payload: String,
        directory: Vec<(String, ActorId)>,
        actor_id: ActorId,
        max_loop_iterations: usize,
    ) -> Self {
        Self {
            state,
            payload,
            locals: BTreeMap::new(),
            directory,
            actor_id,
            outbox: Vec::new(),
            log: Vec::new(),
            diagnostics: Vec::new(),
            max_loop_iterations,
        }
    }

    /// Resolve an actor name to its id: first match in spawn order.
    pub fn resolve_actor(&self, name: &str) -> Option<ActorId> {
        self.directory
            .iter()
            .find(|(candidate, _)| candidate == name)
            .map(|(_, id)| *id)
    }

    /// Bind a local variable, overwriting any existing binding.
    pub fn set_local(&mut self, name: &str, value: String) {
        self.locals.insert(name.to_string(), value);
    }

    /// Record a line of handler log output.
    pub fn record_log(&mut self, message: String) {
        tracing::debug!(actor = self.actor_id.get(), %message, "handler log");
        self.log.push(message);
    }

    /// Record a non-fatal diagnostic and continue.
    pub fn record_diagnostic(&mut self, message: String) {
        tracing::warn!(actor = self.actor_id.get(), %message, "handler diagnostic");
        self.diagnostics.push(message);
    }

    #[cfg(test)]
    pub(crate) fn for_tests(state: &'a mut ActorState) -> Self {
        Self::new(state, String::new(), Vec::new(), ActorId::new(1), 10_000)
    }
}
