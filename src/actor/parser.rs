//! Actor definition parser
//!
//! Parses the declaration layer of an actor source into an
//! [`ActorDefinition`]: `actor <Name>`, `role is "<text>"`, a `state has`
//! section of `<key> is <value>` / `<key> -> <value>` entries, and a
//! `handlers` section of `on <event>` blocks. Handler bodies keep their
//! indentation relative to the first body line so nested control flow
//! survives parsing. Malformed input degrades to a definition with empty
//! name/role and zero handlers; this boundary never fails.

use super::actor::{ActorDefinition, HandlerDefinition};
use super::state::ActorState;

#[derive(PartialEq)]
enum Mode {
    None,
    State,
    Handlers,
}

/// Parse actor source text into a definition.
pub fn parse_actor(source: &str) -> ActorDefinition {
    let mut def = ActorDefinition::default();
    let mut mode = Mode::None;
    let mut current: Option<PendingHandler> = None;

    for raw in source.lines() {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.starts_with("//") {
            continue;
        }
        let indent = raw.len() - raw.trim_start().len();

        if let Some(name) = trimmed.strip_prefix("actor ") {
            def.name = name.trim().to_string();
        } else if let Some(role) = trimmed.strip_prefix("role is ") {
            def.role = unquote(role.trim()).to_string();
        } else if trimmed == "state has" {
            mode = Mode::State;
        } else if trimmed == "handlers" {
            mode = Mode::Handlers;
            finish_handler(&mut current, &mut def);
        } else if mode == Mode::Handlers {
            if let Some(event) = trimmed.strip_prefix("on ") {
                finish_handler(&mut current, &mut def);
                current = Some(PendingHandler {
                    event: event.trim().to_string(),
                    body_indent: None,
                    body: String::new(),
                });
            } else if let Some(pending) = current.as_mut() {
                pending.push_line(raw, indent);
            }
        } else if mode == Mode::State {
            parse_state_entry(trimmed, &mut def.initial_state);
        }
    }

    finish_handler(&mut current, &mut def);
    def
}

struct PendingHandler {
    event: String,
    body_indent: Option<usize>,
    body: String,
}

impl PendingHandler {
    /// Append a body line, re-based so the first body line sits at column
    /// zero and nested indentation is preserved.
    fn push_line(&mut self, raw: &str, indent: usize) {
        let base = *self.body_indent.get_or_insert(indent);
        let rebased = indent.saturating_sub(base);
        if !self.body.is_empty() {
            self.body.push('\n');
        }
        self.body.push_str(&" ".repeat(rebased));
        self.body.push_str(raw.trim());
    }
}

fn finish_handler(current: &mut Option<PendingHandler>, def: &mut ActorDefinition) {
    if let Some(pending) = current.take() {
        def.handlers.push(HandlerDefinition {
            event: pending.event,
            body: pending.body,
        });
    }
}

/// `<key> is <value>` or `<key> -> <value>`; values unquote.
fn parse_state_entry(line: &str, state: &mut ActorState) {
    let (key, value) = if let Some((key, value)) = line.split_once("->") {
        (key, value)
    } else if let Some((key, value)) = line.split_once(" is ") {
        (key, value)
    } else {
        return;
    };

    let key = key.trim();
    if key.is_empty() {
        return;
    }
    state.set(key, unquote(value.trim()));
}

fn unquote(text: &str) -> &str {
    for quote in ['"', '\''] {
        if text.len() >= 2 && text.starts_with(quote) && text.ends_with(quote) {
            return &text[1..text.len() - 1];
        }
    }
    text
}
