//! Block execution
//!
//! Runs a parsed handler block against an [`ExecutionContext`]. One bad
//! statement never aborts the handler: semantic misses (unknown target
//! actor, unrecognized statement) record a diagnostic and execution moves
//! on. `while` loops are bounded by the context's iteration cap; hitting the
//! cap is a diagnostic, not an error, and execution proceeds past the loop.

use super::block::{AssignTarget, Node, Statement};
use super::context::{ExecutionContext, OutboundMessage};
use super::eval::{evaluate, evaluate_condition, strip_quotes};

/// Execute a handler block to completion.
pub fn run_block(nodes: &[Node], ctx: &mut ExecutionContext<'_>) {
    for node in nodes {
        match node {
            Node::Statement(statement) => run_statement(statement, ctx),

            Node::If { condition, body } => {
                // Evaluated once, at the moment the node is reached.
                if evaluate_condition(condition, ctx) {
                    run_block(body, ctx);
                }
            }

            Node::While { condition, body } => {
                let mut iterations = 0usize;
                while evaluate_condition(condition, ctx) {
                    if iterations >= ctx.max_loop_iterations {
                        ctx.record_diagnostic(format!(
                            "while loop hit iteration limit ({})",
                            ctx.max_loop_iterations
                        ));
                        break;
                    }
                    run_block(body, ctx);
                    iterations += 1;
                }
            }

            Node::For {
                var,
                start,
                end,
                body,
            } => {
                // Bounds are evaluated once, before the first iteration.
                let start = parse_bound(&evaluate(start, ctx));
                let end = parse_bound(&evaluate(end, ctx));
                for i in start..=end {
                    ctx.set_local(var, i.to_string());
                    run_block(body, ctx);
                }
            }
        }
    }
}

fn parse_bound(value: &str) -> i64 {
    value
        .parse::<i64>()
        .or_else(|_| value.parse::<f64>().map(|n| n as i64))
        .unwrap_or(0)
}

fn run_statement(statement: &Statement, ctx: &mut ExecutionContext<'_>) {
    match statement {
        Statement::SelfCommand { verb, args } => {
            if verb == "log" {
                let text = strip_quotes(args.trim()).unwrap_or(args.trim());
                ctx.record_log(text.to_string());
            }
            // Other self verbs are accepted but have no effect yet.
        }

        Statement::ActorSend { target, event } => match ctx.resolve_actor(target) {
            Some(id) => {
                let payload = ctx.payload.clone();
                ctx.outbox.push(OutboundMessage {
                    target: id,
                    event: event.clone(),
                    payload,
                });
            }
            None => {
                ctx.record_diagnostic(format!("target actor \"{}\" not found", target));
            }
        },

        Statement::Let { name, expr } => {
            let value = evaluate(expr, ctx);
            ctx.set_local(name, value);
        }

        Statement::Assign { target, expr } => {
            let value = evaluate(expr, ctx);
            match target {
                AssignTarget::State(key) => ctx.state.set(key, &value),
                AssignTarget::Local(name) => ctx.set_local(name, value),
            }
        }

        Statement::Log(message) => {
            let text = match strip_quotes(message.trim()) {
                Some(inner) => inner.to_string(),
                None => evaluate(message, ctx),
            };
            ctx.record_log(text);
        }

        Statement::Other(text) => {
            ctx.record_diagnostic(format!("unrecognized statement: {}", text));
        }
    }
}
