//! Indentation-scoped block parsing
//!
//! Handler bodies are plain text: leading spaces establish block depth.
//! Parsing groups lines into a tree of [`Node`]s once, so the executor
//! dispatches over closed variants instead of re-matching line prefixes on
//! every loop iteration. Blank lines and `//` comments are skipped
//! everywhere. A block's indentation is established by its first line and
//! the block ends at the first line indented strictly less than that.

/// Where an assignment writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssignTarget {
    /// Persistent actor state, `state.<key>`.
    State(String),
    /// Handler-scoped local binding.
    Local(String),
}

/// One executable statement, parsed from a single line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    /// `self -> <verb> [args]`; only `log` has an effect.
    SelfCommand {
        /// Verb following the arrow.
        verb: String,
        /// Remaining argument text, possibly empty.
        args: String,
    },
    /// `<CapitalizedName> -> <event> [...]`: send to another actor.
    ActorSend {
        /// Target actor name.
        target: String,
        /// Event name (first word after the arrow).
        event: String,
    },
    /// `let <name> -> <expr>` / `let <name> = <expr>`.
    Let {
        /// Local name to bind.
        name: String,
        /// Expression text, evaluated at execution time.
        expr: String,
    },
    /// `<target> -> <expr>` / `<target> = <expr>`.
    Assign {
        /// The assignment destination.
        target: AssignTarget,
        /// Expression text, evaluated at execution time.
        expr: String,
    },
    /// `log <text-or-expr>`.
    Log(String),
    /// Anything the statement grammar does not recognize.
    Other(String),
}

/// One node of the parsed handler body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// A plain statement.
    Statement(Statement),
    /// `if <condition>` with its body block.
    If {
        /// Condition text, evaluated once when the node is reached.
        condition: String,
        /// Body executed when the condition holds.
        body: Vec<Node>,
    },
    /// `while <condition>` with its body block.
    While {
        /// Condition text, re-evaluated before each iteration.
        condition: String,
        /// Body executed while the condition holds, up to the iteration cap.
        body: Vec<Node>,
    },
    /// `for <var> in <start> to <end>` with its body block.
    For {
        /// Loop variable bound into locals for the block's duration.
        var: String,
        /// Start bound expression, evaluated once before the loop.
        start: String,
        /// End bound expression, evaluated once before the loop (inclusive).
        end: String,
        /// Loop body.
        body: Vec<Node>,
    },
}

struct Line {
    indent: usize,
    text: String,
}

/// Parse a handler body into its block tree.
pub fn parse_handler_body(body: &str) -> Vec<Node> {
    let lines: Vec<Line> = body
        .lines()
        .filter_map(|raw| {
            let text = raw.trim();
            if text.is_empty() || text.starts_with("//") {
                return None;
            }
            let indent = raw.len() - raw.trim_start().len();
            Some(Line {
                indent,
                text: text.to_string(),
            })
        })
        .collect();

    let mut pos = 0;
    if lines.is_empty() {
        Vec::new()
    } else {
        parse_block(&lines, &mut pos)
    }
}

fn parse_block(lines: &[Line], pos: &mut usize) -> Vec<Node> {
    let established = lines[*pos].indent;
    let mut nodes = Vec::new();

    while *pos < lines.len() && lines[*pos].indent >= established {
        let indent = lines[*pos].indent;
        let text = lines[*pos].text.clone();
        *pos += 1;

        if let Some(condition) = text.strip_prefix("if ") {
            nodes.push(Node::If {
                condition: condition.trim().to_string(),
                body: parse_body(lines, pos, indent),
            });
        } else if let Some(condition) = text.strip_prefix("while ") {
            nodes.push(Node::While {
                condition: condition.trim().to_string(),
                body: parse_body(lines, pos, indent),
            });
        } else if let Some(header) = text.strip_prefix("for ") {
            match parse_for_header(header) {
                Some((var, start, end)) => nodes.push(Node::For {
                    var,
                    start,
                    end,
                    body: parse_body(lines, pos, indent),
                }),
                None => nodes.push(Node::Statement(Statement::Other(text))),
            }
        } else {
            nodes.push(Node::Statement(parse_statement(&text)));
        }
    }

    nodes
}

/// Parse the body block following a control header at `header_indent`.
/// Empty when the next line is not indented past the header.
fn parse_body(lines: &[Line], pos: &mut usize, header_indent: usize) -> Vec<Node> {
    if *pos >= lines.len() || lines[*pos].indent <= header_indent {
        return Vec::new();
    }
    parse_block(lines, pos)
}

/// `<var> in <start> to <end>`, all parts non-empty.
fn parse_for_header(header: &str) -> Option<(String, String, String)> {
    let (var, rest) = header.split_once(" in ")?;
    let (start, end) = rest.split_once(" to ")?;
    let var = var.trim();
    let start = start.trim();
    let end = end.trim();
    if var.is_empty() || start.is_empty() || end.is_empty() {
        return None;
    }
    Some((var.to_string(), start.to_string(), end.to_string()))
}

/// Classify one trimmed line by the leading token pattern, in priority order.
pub fn parse_statement(text: &str) -> Statement {
    if let Some(rest) = text.strip_prefix("self ->") {
        let rest = rest.trim();
        let (verb, args) = match rest.split_once(' ') {
            Some((verb, args)) => (verb.to_string(), args.trim().to_string()),
            None => (rest.to_string(), String::new()),
        };
        return Statement::SelfCommand { verb, args };
    }

    if let Some((target, message)) = text.split_once("->") {
        let target = target.trim();
        if target
            .chars()
            .next()
            .map(|c| c.is_ascii_uppercase())
            .unwrap_or(false)
            && target.chars().all(|c| c.is_alphanumeric() || c == '_')
        {
            let message = message.trim();
            let event = message
                .split_whitespace()
                .next()
                .unwrap_or_default()
                .to_string();
            return Statement::ActorSend {
                target: target.to_string(),
                event,
            };
        }
    }

    if let Some(rest) = text.strip_prefix("let ") {
        if let Some((name, expr)) = split_binding(rest) {
            return Statement::Let { name, expr };
        }
        return Statement::Other(text.to_string());
    }

    if let Some((target, expr)) = split_binding(text) {
        let target = match target.strip_prefix("state.") {
            Some(key) => AssignTarget::State(key.to_string()),
            None => AssignTarget::Local(target),
        };
        return Statement::Assign { target, expr };
    }

    if let Some(message) = text.strip_prefix("log ") {
        return Statement::Log(message.trim().to_string());
    }

    Statement::Other(text.to_string())
}

/// Split `<lhs> -> <rhs>` or `<lhs> = <rhs>` into trimmed halves.
///
/// The arrow form wins when both appear. A bare `=` only counts when it is
/// not part of a comparison operator.
fn split_binding(text: &str) -> Option<(String, String)> {
    if let Some((lhs, rhs)) = text.split_once("->") {
        let lhs = lhs.trim();
        let rhs = rhs.trim();
        if !lhs.is_empty() {
            return Some((lhs.to_string(), rhs.to_string()));
        }
        return None;
    }

    let bytes = text.as_bytes();
    for (index, &byte) in bytes.iter().enumerate() {
        if byte != b'=' {
            continue;
        }
        let prev = index.checked_sub(1).map(|i| bytes[i]);
        let next = bytes.get(index + 1).copied();
        if matches!(prev, Some(b'=') | Some(b'!') | Some(b'<') | Some(b'>'))
            || next == Some(b'=')
        {
            return None;
        }
        let lhs = text[..index].trim();
        let rhs = text[index + 1..].trim();
        if lhs.is_empty() {
            return None;
        }
        return Some((lhs.to_string(), rhs.to_string()));
    }

    None
}
