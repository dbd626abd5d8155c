//! Actors and actor definitions
//!
//! An [`ActorDefinition`] is the parse-time description of an actor: name,
//! role, initial state, and named handlers as raw body text. Spawning deep
//! copies the definition into an [`Actor`], parsing each handler body into
//! its block tree once so delivery does not re-parse.

use serde::{Deserialize, Serialize};

use crate::interpreter::block::{Node, parse_handler_body};

use super::state::ActorState;

/// Unique actor identifier assigned by the runtime. Always positive.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct ActorId(i32);

impl ActorId {
    /// Wrap a raw id.
    pub fn new(id: i32) -> Self {
        Self(id)
    }

    /// The raw id value.
    pub fn get(&self) -> i32 {
        self.0
    }
}

impl std::fmt::Display for ActorId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One named handler in a definition: the event it answers and its body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandlerDefinition {
    /// Event name this handler answers.
    pub event: String,
    /// Raw handler body text, indentation-significant.
    pub body: String,
}

/// Parse-time description of an actor, produced by the definition parser.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActorDefinition {
    /// Actor name; empty when the source declared none.
    pub name: String,
    /// Role description; empty when the source declared none.
    pub role: String,
    /// Initial state entries.
    pub initial_state: ActorState,
    /// Named handlers in declaration order.
    pub handlers: Vec<HandlerDefinition>,
}

/// A spawned handler: raw source plus its pre-parsed block tree.
#[derive(Debug, Clone)]
pub struct Handler {
    /// Event name this handler answers.
    pub event: String,
    /// Raw body text, kept for inspection (the program is its own data).
    pub source: String,
    /// Block tree executed on delivery.
    pub block: Vec<Node>,
}

/// A live actor owned by the runtime.
#[derive(Debug)]
pub struct Actor {
    /// Runtime-assigned id.
    pub id: ActorId,
    /// Actor name used for message target resolution.
    pub name: String,
    /// Role description.
    pub role: String,
    /// Persistent key-value state.
    pub state: ActorState,
    /// Handlers in declaration order; first event match wins.
    pub handlers: Vec<Handler>,
}

impl Actor {
    /// Instantiate an actor from a definition, deep-copying state and
    /// parsing each handler body.
    pub fn from_definition(id: ActorId, def: &ActorDefinition) -> Self {
        let handlers = def
            .handlers
            .iter()
            .map(|handler| Handler {
                event: handler.event.clone(),
                source: handler.body.clone(),
                block: parse_handler_body(&handler.body),
            })
            .collect();

        Self {
            id,
            name: def.name.clone(),
            role: def.role.clone(),
            state: def.initial_state.clone(),
            handlers,
        }
    }

    /// Find the first handler matching an event name.
    pub fn handler_for(&self, event: &str) -> Option<&Handler> {
        self.handlers.iter().find(|handler| handler.event == event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spawn_copies_state_and_parses_handlers() {
        let mut initial_state = ActorState::new();
        initial_state.set("count", "0");
        let def = ActorDefinition {
            name: "Counter".into(),
            role: "counts things".into(),
            initial_state,
            handlers: vec![HandlerDefinition {
                event: "increment".into(),
                body: "state.count -> state.count + 1".into(),
            }],
        };

        let actor = Actor::from_definition(ActorId::new(1), &def);
        assert_eq!(actor.name, "Counter");
        assert_eq!(actor.state.get("count"), Some("0"));
        assert_eq!(actor.handlers.len(), 1);
        assert_eq!(actor.handlers[0].block.len(), 1);
        assert!(actor.handler_for("increment").is_some());
        assert!(actor.handler_for("decrement").is_none());
    }

    #[test]
    fn first_matching_handler_wins() {
        let def = ActorDefinition {
            name: "Echo".into(),
            handlers: vec![
                HandlerDefinition {
                    event: "ping".into(),
                    body: "state.which -> 1".into(),
                },
                HandlerDefinition {
                    event: "ping".into(),
                    body: "state.which -> 2".into(),
                },
            ],
            ..Default::default()
        };

        let actor = Actor::from_definition(ActorId::new(1), &def);
        assert_eq!(actor.handler_for("ping").unwrap().source, "state.which -> 1");
    }
}
