//! Expression and condition evaluation
//!
//! Handler expressions evaluate to strings. Literals pass through; anything
//! containing an arithmetic operator is evaluated numerically in-process by
//! a small recursive-descent parser over `+ - * / ( )`, with `state.<key>`
//! references and bound locals resolved against the execution context
//! (absent state keys default to `"0"`). Everything else falls back to a
//! state lookup, a local lookup, and finally the raw text as an opaque
//! symbol.

use super::context::ExecutionContext;

/// Evaluate an expression against the execution context.
pub fn evaluate(expr: &str, ctx: &ExecutionContext<'_>) -> String {
    let trimmed = expr.trim();

    if let Some(inner) = strip_quotes(trimmed) {
        return inner.to_string();
    }

    if is_number(trimmed) || trimmed == "true" || trimmed == "false" {
        return trimmed.to_string();
    }

    if trimmed.contains(['+', '-', '*', '/', '(', ')']) {
        if let Some(value) = eval_arithmetic(trimmed, ctx) {
            return format_number(value);
        }
    }

    if let Some(key) = trimmed.strip_prefix("state.") {
        return ctx.state.get(key).unwrap_or("0").to_string();
    }

    if let Some(value) = ctx.locals.get(trimmed) {
        return value.clone();
    }

    trimmed.to_string()
}

/// Evaluate a condition against the execution context.
///
/// Scans for the first comparison operator, two-character forms first so
/// `<=` is never split into `<` and `=`. Both sides evaluate as expressions
/// and compare numerically when both parse as numbers; `==`/`!=` fall back
/// to exact string (in)equality. An expression with no comparison operator
/// is truthy iff it evaluates to `"true"` or a nonzero number.
pub fn evaluate_condition(condition: &str, ctx: &ExecutionContext<'_>) -> bool {
    let trimmed = condition.trim();

    for op in ["<=", ">=", "==", "!=", "<", ">"] {
        if let Some(index) = trimmed.find(op) {
            let left = evaluate(&trimmed[..index], ctx);
            let right = evaluate(&trimmed[index + op.len()..], ctx);
            return compare(op, &left, &right);
        }
    }

    let value = evaluate(trimmed, ctx);
    value == "true" || value.parse::<f64>().map(|n| n != 0.0).unwrap_or(false)
}

fn compare(op: &str, left: &str, right: &str) -> bool {
    let numbers = left
        .parse::<f64>()
        .ok()
        .zip(right.parse::<f64>().ok());

    match (op, numbers) {
        ("==", Some((l, r))) => l == r,
        ("!=", Some((l, r))) => l != r,
        ("==", None) => left == right,
        ("!=", None) => left != right,
        // Ordering on non-numeric operands treats them as zero.
        (_, _) => {
            let l = left.parse::<f64>().unwrap_or(0.0);
            let r = right.parse::<f64>().unwrap_or(0.0);
            match op {
                "<" => l < r,
                ">" => l > r,
                "<=" => l <= r,
                ">=" => l >= r,
                _ => false,
            }
        }
    }
}

/// Strip matching single or double quotes, if present.
pub(crate) fn strip_quotes(text: &str) -> Option<&str> {
    for quote in ['"', '\''] {
        if text.len() >= 2 && text.starts_with(quote) && text.ends_with(quote) {
            return Some(&text[1..text.len() - 1]);
        }
    }
    None
}

fn is_number(text: &str) -> bool {
    !text.is_empty() && text.parse::<f64>().is_ok()
}

/// Render a numeric result: integral values print without a fraction.
fn format_number(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

// ---------------------------------------------------------------------------
// Arithmetic: tokenizer + recursive descent over + - * / ( ) and unary sign
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Number(f64),
    Plus,
    Minus,
    Star,
    Slash,
    Open,
    Close,
}

/// Evaluate an arithmetic expression, resolving `state.<key>` references and
/// bound locals to numbers. Returns `None` when the expression is not valid
/// arithmetic (unknown identifier, malformed syntax, division by zero), in
/// which case the caller falls back to the opaque-symbol chain.
fn eval_arithmetic(expr: &str, ctx: &ExecutionContext<'_>) -> Option<f64> {
    let tokens = tokenize(expr, ctx)?;
    let mut cursor = Cursor { tokens, index: 0 };
    let value = cursor.expression()?;
    if cursor.index == cursor.tokens.len() {
        Some(value)
    } else {
        None
    }
}

fn tokenize(expr: &str, ctx: &ExecutionContext<'_>) -> Option<Vec<Token>> {
    let mut tokens = Vec::new();
    let bytes = expr.as_bytes();
    let mut index = 0;

    while index < bytes.len() {
        let ch = bytes[index] as char;
        match ch {
            ' ' | '\t' => index += 1,
            '+' => {
                tokens.push(Token::Plus);
                index += 1;
            }
            '-' => {
                tokens.push(Token::Minus);
                index += 1;
            }
            '*' => {
                tokens.push(Token::Star);
                index += 1;
            }
            '/' => {
                tokens.push(Token::Slash);
                index += 1;
            }
            '(' => {
                tokens.push(Token::Open);
                index += 1;
            }
            ')' => {
                tokens.push(Token::Close);
                index += 1;
            }
            '0'..='9' | '.' => {
                let start = index;
                while index < bytes.len()
                    && (bytes[index].is_ascii_digit() || bytes[index] == b'.')
                {
                    index += 1;
                }
                let number = expr[start..index].parse::<f64>().ok()?;
                tokens.push(Token::Number(number));
            }
            c if c.is_ascii_alphabetic() || c == '_' => {
                let start = index;
                while index < bytes.len()
                    && (bytes[index].is_ascii_alphanumeric()
                        || bytes[index] == b'_'
                        || bytes[index] == b'.')
                {
                    index += 1;
                }
                let resolved = resolve_identifier(&expr[start..index], ctx)?;
                tokens.push(Token::Number(resolved));
            }
            _ => return None,
        }
    }

    Some(tokens)
}

fn resolve_identifier(ident: &str, ctx: &ExecutionContext<'_>) -> Option<f64> {
    if let Some(key) = ident.strip_prefix("state.") {
        return ctx.state.get(key).unwrap_or("0").parse::<f64>().ok();
    }
    ctx.locals.get(ident)?.parse::<f64>().ok()
}

struct Cursor {
    tokens: Vec<Token>,
    index: usize,
}

impl Cursor {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.index)
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.index).cloned();
        if token.is_some() {
            self.index += 1;
        }
        token
    }

    fn expression(&mut self) -> Option<f64> {
        let mut value = self.term()?;
        while let Some(op) = self.peek() {
            match op {
                Token::Plus => {
                    self.advance();
                    value += self.term()?;
                }
                Token::Minus => {
                    self.advance();
                    value -= self.term()?;
                }
                _ => break,
            }
        }
        Some(value)
    }

    fn term(&mut self) -> Option<f64> {
        let mut value = self.factor()?;
        while let Some(op) = self.peek() {
            match op {
                Token::Star => {
                    self.advance();
                    value *= self.factor()?;
                }
                Token::Slash => {
                    self.advance();
                    let divisor = self.factor()?;
                    if divisor == 0.0 {
                        return None;
                    }
                    value /= divisor;
                }
                _ => break,
            }
        }
        Some(value)
    }

    fn factor(&mut self) -> Option<f64> {
        match self.advance()? {
            Token::Number(value) => Some(value),
            Token::Plus => self.factor(),
            Token::Minus => self.factor().map(|v| -v),
            Token::Open => {
                let value = self.expression()?;
                match self.advance()? {
                    Token::Close => Some(value),
                    _ => None,
                }
            }
            _ => None,
        }
    }
}
