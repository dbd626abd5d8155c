//! End-to-end actor runtime scenarios: mailbox ordering, tick semantics,
//! handler control flow, and cross-actor messaging.

mod common;

use moop::actor::{
    ActorDefinition, ActorRuntime, ActorState, HandlerDefinition, parse_actor,
};

fn definition(name: &str, handlers: Vec<(&str, &str)>) -> ActorDefinition {
    ActorDefinition {
        name: name.into(),
        role: String::new(),
        initial_state: ActorState::new(),
        handlers: handlers
            .into_iter()
            .map(|(event, body)| HandlerDefinition {
                event: event.into(),
                body: body.into(),
            })
            .collect(),
    }
}

fn state_of<'a>(runtime: &'a ActorRuntime, id: moop::ActorId) -> &'a ActorState {
    &runtime.actor(id).unwrap().state
}

#[test]
fn mailbox_delivers_in_fifo_order() {
    common::init_tracing();

    let mut runtime = ActorRuntime::new();
    let id = runtime.spawn(&definition(
        "Recorder",
        vec![
            ("a", "state.order -> state.order + 1\nstate.first -> state.order"),
            ("b", "state.order -> state.order + 1\nstate.second -> state.order"),
            ("c", "state.order -> state.order + 1\nstate.third -> state.order"),
        ],
    ));

    runtime.send(id, "a", "").unwrap();
    runtime.send(id, "b", "").unwrap();
    runtime.send(id, "c", "").unwrap();

    runtime.tick();
    runtime.tick();
    runtime.tick();

    let state = state_of(&runtime, id);
    assert_eq!(state.get("first"), Some("1"));
    assert_eq!(state.get("second"), Some("2"));
    assert_eq!(state.get("third"), Some("3"));
}

#[test]
fn draining_n_messages_takes_n_ticks() {
    common::init_tracing();

    let mut runtime = ActorRuntime::new();
    let id = runtime.spawn(&definition(
        "Counter",
        vec![("bump", "state.count -> state.count + 1")],
    ));

    for _ in 0..3 {
        runtime.send(id, "bump", "").unwrap();
    }

    assert_eq!(runtime.tick().delivered, 1);
    assert_eq!(runtime.tick().delivered, 1);
    assert_eq!(runtime.pending_messages(id), 1);
    assert_eq!(runtime.tick().delivered, 1);
    assert_eq!(runtime.tick().delivered, 0);
    assert_eq!(state_of(&runtime, id).get("count"), Some("3"));
}

#[test]
fn counter_increments_once_per_tick() {
    common::init_tracing();

    // Scenario: Counter with `state.count = 0` and an increment handler.
    let mut initial_state = ActorState::new();
    initial_state.set("count", "0");
    let mut def = definition(
        "Counter",
        vec![("increment", "state.count -> state.count + 1")],
    );
    def.initial_state = initial_state;

    let mut runtime = ActorRuntime::new();
    let id = runtime.spawn(&def);
    runtime.send(id, "increment", "").unwrap();
    runtime.send(id, "increment", "").unwrap();

    runtime.tick();
    assert_eq!(state_of(&runtime, id).get("count"), Some("1"));
    runtime.tick();
    assert_eq!(state_of(&runtime, id).get("count"), Some("2"));
}

#[test]
fn cross_actor_send_arrives_next_tick() {
    common::init_tracing();

    let mut runtime = ActorRuntime::new();
    let sender = runtime.spawn(&definition("Sender", vec![("start", "Receiver -> ping")]));
    let receiver = runtime.spawn(&definition("Receiver", vec![("ping", "state.received -> 1")]));

    runtime.send(sender, "start", "").unwrap();

    // Tick 1 runs Sender; the ping is buffered and must not be visible yet.
    runtime.tick();
    assert_eq!(state_of(&runtime, receiver).get("received"), None);
    assert_eq!(runtime.pending_messages(receiver), 1);

    runtime.tick();
    assert_eq!(state_of(&runtime, receiver).get("received"), Some("1"));
}

#[test]
fn send_is_never_delivered_in_the_producing_tick_regardless_of_order() {
    common::init_tracing();

    // Receiver spawned first: it sits earlier in the tick's visit order, so
    // only the end-of-tick outbox flush keeps the happens-before guarantee.
    let mut runtime = ActorRuntime::new();
    let receiver = runtime.spawn(&definition("Receiver", vec![("ping", "state.received -> 1")]));
    let sender = runtime.spawn(&definition("Sender", vec![("start", "Receiver -> ping")]));

    runtime.send(sender, "start", "").unwrap();
    runtime.tick();
    assert_eq!(state_of(&runtime, receiver).get("received"), None);
    runtime.tick();
    assert_eq!(state_of(&runtime, receiver).get("received"), Some("1"));
}

#[test]
fn while_loop_runs_to_completion_within_one_tick() {
    common::init_tracing();

    // Scenario: `while state.count < 3` drains fully inside a single tick.
    let mut def = definition(
        "Looper",
        vec![(
            "loop",
            "while state.count < 3\n    state.count -> state.count + 1",
        )],
    );
    let mut initial_state = ActorState::new();
    initial_state.set("count", "0");
    def.initial_state = initial_state;

    let mut runtime = ActorRuntime::new();
    let id = runtime.spawn(&def);
    runtime.send(id, "loop", "").unwrap();
    runtime.tick();
    assert_eq!(state_of(&runtime, id).get("count"), Some("3"));
}

#[test]
fn for_loop_sums_inclusive_bounds() {
    common::init_tracing();

    let mut def = definition(
        "Summer",
        vec![("sum", "for i in 1 to 3\n    state.sum -> state.sum + i")],
    );
    let mut initial_state = ActorState::new();
    initial_state.set("sum", "0");
    def.initial_state = initial_state;

    let mut runtime = ActorRuntime::new();
    let id = runtime.spawn(&def);
    runtime.send(id, "sum", "").unwrap();
    runtime.tick();
    assert_eq!(state_of(&runtime, id).get("sum"), Some("6"));
}

#[test]
fn unbounded_while_terminates_at_cap_and_returns_control() {
    common::init_tracing();

    let mut runtime = ActorRuntime::new();
    let id = runtime.spawn(&definition(
        "Spinner",
        vec![("spin", "while true\n    state.spins -> state.spins + 1")],
    ));
    runtime.send(id, "spin", "").unwrap();

    let report = runtime.tick();
    assert_eq!(report.delivered, 1);
    assert_eq!(state_of(&runtime, id).get("spins"), Some("10000"));
    assert!(
        report
            .diagnostics
            .iter()
            .any(|diag| diag.contains("iteration limit"))
    );
}

#[test]
fn relayed_message_is_delivered_through_a_chain() {
    common::init_tracing();

    let mut runtime = ActorRuntime::new();
    let relay = runtime.spawn(&definition("Relay", vec![("forward", "Sink -> deliver")]));
    let sink = runtime.spawn(&definition("Sink", vec![("deliver", "state.got -> 1")]));

    runtime.send(relay, "forward", "hello").unwrap();
    runtime.tick();

    assert_eq!(runtime.pending_messages(sink), 1);
    runtime.tick();
    assert_eq!(state_of(&runtime, sink).get("got"), Some("1"));
}

#[test]
fn parsed_actor_definition_runs_end_to_end() {
    common::init_tracing();

    let source = r#"
actor Counter
role is "counts things"

state has
    count is 0

handlers
    on increment
        state.count -> state.count + 1
        if state.count >= 2
            self -> log "reached two"
"#;

    let def = parse_actor(source);
    assert_eq!(def.name, "Counter");
    assert_eq!(def.handlers.len(), 1);

    let mut runtime = ActorRuntime::new();
    let id = runtime.spawn(&def);
    runtime.send(id, "increment", "").unwrap();
    runtime.send(id, "increment", "").unwrap();

    let first = runtime.tick();
    assert!(first.log.is_empty());
    let second = runtime.tick();
    assert_eq!(state_of(&runtime, id).get("count"), Some("2"));
    assert_eq!(second.log.len(), 1);
    assert_eq!(second.log[0].message, "reached two");
}

#[test]
fn duplicate_names_resolve_to_first_spawned() {
    common::init_tracing();

    let mut runtime = ActorRuntime::new();
    let first = runtime.spawn(&definition("Twin", vec![("poke", "state.poked -> 1")]));
    let second = runtime.spawn(&definition("Twin", vec![("poke", "state.poked -> 1")]));
    let caller = runtime.spawn(&definition("Caller", vec![("go", "Twin -> poke")]));

    runtime.send(caller, "go", "").unwrap();
    runtime.tick();
    runtime.tick();

    assert_eq!(state_of(&runtime, first).get("poked"), Some("1"));
    assert_eq!(state_of(&runtime, second).get("poked"), None);
}
