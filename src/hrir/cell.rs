//! HRIR cells and opcodes
//!
//! A [`Cell`] is the atomic IR unit: an opcode, ordered string arguments, a
//! reversibility flag, and optional execution bookkeeping. Reversible cells
//! carry (or are given on insertion) an owned inverse cell derived from a
//! total inverse function on opcodes.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Operation identifier for an HRIR cell.
///
/// The built-in opcodes form a closed set; anything else round-trips through
/// [`Opcode::Other`] so cells remain self-describing for operations the core
/// does not interpret.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Opcode {
    /// Arithmetic addition; inverse of [`Opcode::Subtract`].
    Add,
    /// Arithmetic subtraction; inverse of [`Opcode::Add`].
    Subtract,
    /// Arithmetic multiplication; inverse of [`Opcode::Divide`].
    Multiply,
    /// Arithmetic division; inverse of [`Opcode::Multiply`].
    Divide,
    /// Equality comparison.
    Equal,
    /// Less-than comparison.
    Less,
    /// Greater-than comparison.
    Greater,
    /// Unconditional jump.
    Jump,
    /// Conditional jump.
    JumpIf,
    /// Output side effect.
    Print,
    /// Input side effect.
    Read,
    /// Store to a named slot.
    Store,
    /// Load from a named slot.
    Load,
    /// Any opcode outside the built-in set.
    Other(String),
}

impl Opcode {
    /// The paired inverse opcode, when one exists.
    ///
    /// Only the arithmetic pairs are invertible; every other opcode returns
    /// `None` and the owning cell stays without an inverse.
    pub fn inverse(&self) -> Option<Opcode> {
        match self {
            Opcode::Add => Some(Opcode::Subtract),
            Opcode::Subtract => Some(Opcode::Add),
            Opcode::Multiply => Some(Opcode::Divide),
            Opcode::Divide => Some(Opcode::Multiply),
            _ => None,
        }
    }

    /// The canonical textual form of this opcode.
    pub fn as_str(&self) -> &str {
        match self {
            Opcode::Add => "add",
            Opcode::Subtract => "subtract",
            Opcode::Multiply => "multiply",
            Opcode::Divide => "divide",
            Opcode::Equal => "equal",
            Opcode::Less => "less",
            Opcode::Greater => "greater",
            Opcode::Jump => "jump",
            Opcode::JumpIf => "jump_if",
            Opcode::Print => "print",
            Opcode::Read => "read",
            Opcode::Store => "store",
            Opcode::Load => "load",
            Opcode::Other(name) => name,
        }
    }

    /// Map an actor-layer message selector onto an HRIR opcode.
    ///
    /// `output` lowers to [`Opcode::Print`]; unknown selectors are not
    /// representable as cells and return `None`.
    pub fn from_selector(selector: &str) -> Option<Opcode> {
        match selector {
            "add" => Some(Opcode::Add),
            "subtract" => Some(Opcode::Subtract),
            "multiply" => Some(Opcode::Multiply),
            "divide" => Some(Opcode::Divide),
            "output" => Some(Opcode::Print),
            _ => None,
        }
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error raised when parsing an opcode from text.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum OpcodeError {
    /// Opcodes must be non-empty.
    #[error("opcode must not be empty")]
    Empty,
}

impl FromStr for Opcode {
    type Err = OpcodeError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        match text {
            "" => Err(OpcodeError::Empty),
            "add" => Ok(Opcode::Add),
            "subtract" => Ok(Opcode::Subtract),
            "multiply" => Ok(Opcode::Multiply),
            "divide" => Ok(Opcode::Divide),
            "equal" => Ok(Opcode::Equal),
            "less" => Ok(Opcode::Less),
            "greater" => Ok(Opcode::Greater),
            "jump" => Ok(Opcode::Jump),
            "jump_if" => Ok(Opcode::JumpIf),
            "print" => Ok(Opcode::Print),
            "read" => Ok(Opcode::Read),
            "store" => Ok(Opcode::Store),
            "load" => Ok(Opcode::Load),
            other => Ok(Opcode::Other(other.to_string())),
        }
    }
}

impl Serialize for Opcode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Opcode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

/// One atomic, self-describing HRIR operation.
///
/// A cell's `id` is zero until the cell is inserted into a
/// [`Program`](super::Program), at which point it receives a unique,
/// monotonic id that never changes. `executed` and `result` are the only
/// fields mutated while stepping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    /// Unique id, assigned on insertion into a program (0 = unattached).
    pub id: u32,
    /// The operation this cell performs.
    pub opcode: Opcode,
    /// Ordered operation arguments.
    pub args: Vec<String>,
    /// Whether the operation is structurally invertible.
    pub is_reversible: bool,
    /// Paired inverse cell; present for reversible arithmetic cells.
    pub inverse: Option<Box<Cell>>,
    /// Whether the engine has stepped past this cell.
    pub executed: bool,
    /// Execution bookkeeping recorded by the engine.
    pub result: Option<String>,
}

impl Cell {
    /// Create a reversible cell with the given opcode and arguments.
    pub fn new(opcode: Opcode, args: Vec<String>) -> Self {
        Self {
            id: 0,
            opcode,
            args,
            is_reversible: true,
            inverse: None,
            executed: false,
            result: None,
        }
    }

    /// Create a D-term cell: a side-effecting operation that is never
    /// invertible and never receives an inverse.
    pub fn d_term(opcode: Opcode, args: Vec<String>) -> Self {
        Self {
            is_reversible: false,
            ..Self::new(opcode, args)
        }
    }

    /// Lower an actor-layer message selector into a reversible cell.
    ///
    /// Returns `None` for selectors with no HRIR counterpart.
    pub fn from_selector(selector: &str, args: Vec<String>) -> Option<Self> {
        Opcode::from_selector(selector).map(|opcode| Cell::new(opcode, args))
    }

    /// Derive the inverse cell for this cell, if its opcode has one.
    ///
    /// The derived cell carries the same argument list and no nested inverse,
    /// so derivation never recurses. D-term cells have no inverse.
    pub fn derive_inverse(&self) -> Option<Cell> {
        if !self.is_reversible {
            return None;
        }
        self.opcode
            .inverse()
            .map(|opcode| Cell::new(opcode, self.args.clone()))
    }
}
