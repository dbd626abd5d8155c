//! The actor registry and tick scheduler
//!
//! [`ActorRuntime`] owns every spawned actor and its mailbox, assigns ids
//! from an instance-local counter, resolves names to ids, and drives one
//! cooperative processing pass per [`tick`](ActorRuntime::tick). Scheduling
//! is strictly deterministic: actors are visited in spawn order and each
//! processes at most one message per tick. Sends performed by handlers are
//! buffered and delivered after the pass, so a message is never received in
//! the tick that produced it.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::interpreter::context::ExecutionContext;
use crate::interpreter::exec::run_block;

use super::actor::{Actor, ActorDefinition, ActorId};
use super::error::{ActorError, ActorResult};
use super::mailbox::Mailbox;

/// Configuration for the actor runtime.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuntimeConfig {
    /// Hard cap on `while` loop iterations inside one handler invocation.
    pub max_loop_iterations: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            max_loop_iterations: 10_000,
        }
    }
}

/// One recorded line of handler log output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    /// Actor that produced the line.
    pub actor: ActorId,
    /// Logged text.
    pub message: String,
}

/// Outcome of one tick: delivery count plus recorded output.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Number of messages delivered to handlers this tick.
    pub delivered: usize,
    /// Handler log output, in delivery order.
    pub log: Vec<LogEntry>,
    /// Non-fatal diagnostics (unmatched events, unresolved targets, loop
    /// caps), in delivery order.
    pub diagnostics: Vec<String>,
}

/// Owns all spawned actors and their mailboxes; drives processing ticks.
#[derive(Debug, Default)]
pub struct ActorRuntime {
    config: RuntimeConfig,
    actors: BTreeMap<ActorId, Actor>,
    mailboxes: BTreeMap<ActorId, Mailbox>,
    next_id: i32,
}

impl ActorRuntime {
    /// Create a runtime with default configuration.
    pub fn new() -> Self {
        Self::with_config(RuntimeConfig::default())
    }

    /// Create a runtime with the given configuration.
    pub fn with_config(config: RuntimeConfig) -> Self {
        Self {
            config,
            actors: BTreeMap::new(),
            mailboxes: BTreeMap::new(),
            next_id: 1,
        }
    }

    /// Spawn an actor from a definition, returning its assigned id.
    ///
    /// Names are not required to be unique; resolution always returns the
    /// first spawned match, and a duplicate is reported loudly here.
    pub fn spawn(&mut self, def: &ActorDefinition) -> ActorId {
        let id = ActorId::new(self.next_id);
        self.next_id += 1;

        if !def.name.is_empty() && self.find_by_name(&def.name).is_some() {
            tracing::warn!(
                name = %def.name,
                "duplicate actor name; sends will resolve to the first spawned"
            );
        }

        let actor = Actor::from_definition(id, def);
        tracing::debug!(%id, name = %actor.name, role = %actor.role, "spawned actor");

        self.actors.insert(id, actor);
        self.mailboxes.insert(id, Mailbox::new());
        id
    }

    /// Enqueue a message to an actor's mailbox.
    pub fn send(&mut self, id: ActorId, event: &str, payload: &str) -> ActorResult<()> {
        let mailbox = self
            .mailboxes
            .get_mut(&id)
            .ok_or(ActorError::ActorNotFound(id))?;
        mailbox.push(event, payload);
        Ok(())
    }

    /// Resolve an actor name to its id: first match in spawn order.
    pub fn find_by_name(&self, name: &str) -> Option<ActorId> {
        // Monotonic ids make BTreeMap iteration equal spawn order.
        self.actors
            .values()
            .find(|actor| actor.name == name)
            .map(|actor| actor.id)
    }

    /// Borrow a spawned actor.
    pub fn actor(&self, id: ActorId) -> Option<&Actor> {
        self.actors.get(&id)
    }

    /// Number of spawned actors.
    pub fn actor_count(&self) -> usize {
        self.actors.len()
    }

    /// Number of messages waiting in an actor's mailbox.
    pub fn pending_messages(&self, id: ActorId) -> usize {
        self.mailboxes.get(&id).map(Mailbox::len).unwrap_or(0)
    }

    /// Run one processing pass.
    ///
    /// Visits every actor in spawn order and pops at most one message from
    /// its mailbox. A message whose event matches no handler is dropped with
    /// a diagnostic. Handler sends target mailboxes only after the pass
    /// completes, establishing a strict happens-before between a sender's
    /// tick and the receiver's next tick.
    pub fn tick(&mut self) -> TickReport {
        let directory: Vec<(String, ActorId)> = self
            .actors
            .values()
            .map(|actor| (actor.name.clone(), actor.id))
            .collect();
        let ids: Vec<ActorId> = self.actors.keys().copied().collect();

        let mut report = TickReport::default();
        let mut outbox = Vec::new();

        for id in ids {
            let Some(message) = self.mailboxes.get_mut(&id).and_then(Mailbox::pop) else {
                continue;
            };

            let actor = self
                .actors
                .get_mut(&id)
                .expect("actor and mailbox maps share keys");

            let Some(handler) = actor
                .handlers
                .iter()
                .find(|handler| handler.event == message.event)
            else {
                let diagnostic =
                    format!("no handler for \"{}\" on {}", message.event, actor.name);
                tracing::warn!(%id, %diagnostic, "dropping message");
                report.diagnostics.push(diagnostic);
                continue;
            };

            let mut ctx = ExecutionContext::new(
                &mut actor.state,
                message.payload,
                directory.clone(),
                id,
                self.config.max_loop_iterations,
            );
            run_block(&handler.block, &mut ctx);

            report.delivered += 1;
            report.log.extend(
                ctx.log
                    .into_iter()
                    .map(|message| LogEntry { actor: id, message }),
            );
            report.diagnostics.extend(ctx.diagnostics);
            outbox.extend(ctx.outbox);
        }

        // Flush buffered sends; targets were resolved against this tick's
        // directory, so a miss here means the maps diverged.
        for send in outbox {
            if self.send(send.target, &send.event, &send.payload).is_err() {
                report
                    .diagnostics
                    .push(format!("outbox target actor {} vanished", send.target));
            }
        }

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor::actor::HandlerDefinition;
    use crate::actor::state::ActorState;

    fn counter_definition() -> ActorDefinition {
        let mut initial_state = ActorState::new();
        initial_state.set("count", "0");
        ActorDefinition {
            name: "Counter".into(),
            role: "counts".into(),
            initial_state,
            handlers: vec![HandlerDefinition {
                event: "increment".into(),
                body: "state.count -> state.count + 1".into(),
            }],
        }
    }

    #[test]
    fn spawn_assigns_monotonic_positive_ids() {
        let mut runtime = ActorRuntime::new();
        let a = runtime.spawn(&counter_definition());
        let b = runtime.spawn(&counter_definition());
        assert_eq!(a.get(), 1);
        assert_eq!(b.get(), 2);
        assert_eq!(runtime.actor_count(), 2);
    }

    #[test]
    fn send_to_unknown_actor_fails() {
        let mut runtime = ActorRuntime::new();
        assert_eq!(
            runtime.send(ActorId::new(42), "ping", ""),
            Err(ActorError::ActorNotFound(ActorId::new(42)))
        );
    }

    #[test]
    fn find_by_name_returns_first_spawned_match() {
        let mut runtime = ActorRuntime::new();
        let first = runtime.spawn(&counter_definition());
        let _second = runtime.spawn(&counter_definition());
        assert_eq!(runtime.find_by_name("Counter"), Some(first));
        assert_eq!(runtime.find_by_name("Missing"), None);
    }

    #[test]
    fn tick_processes_at_most_one_message_per_actor() {
        let mut runtime = ActorRuntime::new();
        let id = runtime.spawn(&counter_definition());
        runtime.send(id, "increment", "").unwrap();
        runtime.send(id, "increment", "").unwrap();

        let report = runtime.tick();
        assert_eq!(report.delivered, 1);
        assert_eq!(runtime.actor(id).unwrap().state.get("count"), Some("1"));
        assert_eq!(runtime.pending_messages(id), 1);
    }

    #[test]
    fn unmatched_event_is_dropped_with_diagnostic() {
        let mut runtime = ActorRuntime::new();
        let id = runtime.spawn(&counter_definition());
        runtime.send(id, "unknown_event", "").unwrap();

        let report = runtime.tick();
        assert_eq!(report.delivered, 0);
        assert_eq!(report.diagnostics.len(), 1);
        assert!(report.diagnostics[0].contains("unknown_event"));
        assert_eq!(runtime.pending_messages(id), 0);
    }

    #[test]
    fn idle_actors_are_skipped() {
        let mut runtime = ActorRuntime::new();
        runtime.spawn(&counter_definition());
        let report = runtime.tick();
        assert_eq!(report.delivered, 0);
        assert!(report.diagnostics.is_empty());
    }

    #[test]
    fn handler_log_output_is_reported() {
        let mut runtime = ActorRuntime::new();
        let def = ActorDefinition {
            name: "Greeter".into(),
            handlers: vec![HandlerDefinition {
                event: "hello".into(),
                body: "self -> log \"hi there\"".into(),
            }],
            ..Default::default()
        };
        let id = runtime.spawn(&def);
        runtime.send(id, "hello", "").unwrap();

        let report = runtime.tick();
        assert_eq!(
            report.log,
            vec![LogEntry {
                actor: id,
                message: "hi there".into(),
            }]
        );
    }

    #[test]
    fn configured_loop_cap_is_respected() {
        let mut runtime = ActorRuntime::with_config(RuntimeConfig {
            max_loop_iterations: 5,
        });
        let def = ActorDefinition {
            name: "Spinner".into(),
            handlers: vec![HandlerDefinition {
                event: "spin".into(),
                body: "while true\n    state.spins -> state.spins + 1".into(),
            }],
            ..Default::default()
        };
        let id = runtime.spawn(&def);
        runtime.send(id, "spin", "").unwrap();

        let report = runtime.tick();
        assert_eq!(runtime.actor(id).unwrap().state.get("spins"), Some("5"));
        assert!(report.diagnostics[0].contains("iteration limit (5)"));
    }
}
