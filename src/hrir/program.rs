//! Append-only HRIR programs
//!
//! A [`Program`] owns an ordered, growable sequence of cells and a program
//! counter. Cells are never removed, only appended; insertion assigns each
//! cell a unique, monotonically increasing id owned by the program instance.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::cell::Cell;

/// An append-only sequence of HRIR cells with a program counter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Program {
    /// Name of the source this program was built from.
    pub source_name: String,
    /// Owned cells in insertion order.
    pub cells: Vec<Cell>,
    /// Program counter; always in `[0, cells.len()]`.
    pub pc: usize,
    next_id: u32,
}

impl Program {
    /// Create an empty program for the given source name.
    pub fn new(source_name: impl Into<String>) -> Self {
        Self {
            source_name: source_name.into(),
            cells: Vec::new(),
            pc: 0,
            next_id: 1,
        }
    }

    /// Append a cell, assigning it the next monotonic id.
    ///
    /// Reversible cells without a supplied inverse get one synthesized from
    /// the opcode inverse table; the synthesized inverse is not itself given
    /// an inverse, so synthesis never recurses. Returns the assigned id.
    pub fn add_cell(&mut self, mut cell: Cell) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        cell.id = id;

        if cell.is_reversible && cell.inverse.is_none() {
            cell.inverse = cell.derive_inverse().map(Box::new);
        }

        self.cells.push(cell);
        id
    }

    /// Look up a cell by position. O(1).
    pub fn get_cell(&self, index: usize) -> Option<&Cell> {
        self.cells.get(index)
    }

    /// Look up a cell by assigned id. O(n).
    pub fn get_cell_by_id(&self, id: u32) -> Option<&Cell> {
        self.cells.iter().find(|cell| cell.id == id)
    }

    /// Number of cells in the program.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Whether the program has no cells.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Aggregate counts over the program's cells.
    pub fn stats(&self) -> ProgramStats {
        let mut stats = ProgramStats {
            total_cells: self.cells.len(),
            ..ProgramStats::default()
        };
        for cell in &self.cells {
            if cell.is_reversible {
                stats.reversible_cells += 1;
            } else {
                stats.d_term_cells += 1;
            }
            if cell.executed {
                stats.executed_cells += 1;
            }
        }
        stats
    }

    /// Serialize the program to a stable structural JSON dump.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Reconstruct a program from a structural JSON dump.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

/// Aggregate cell counts for a program.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProgramStats {
    /// Total number of cells.
    pub total_cells: usize,
    /// Cells marked reversible.
    pub reversible_cells: usize,
    /// Side-effecting (D-term) cells.
    pub d_term_cells: usize,
    /// Cells the engine has stepped past.
    pub executed_cells: usize,
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "HRIR Program: {}", self.source_name)?;
        writeln!(f, "  Cells: {}", self.cells.len())?;
        writeln!(f, "  PC: {}", self.pc)?;
        for (index, cell) in self.cells.iter().enumerate() {
            writeln!(
                f,
                "  [{}] {}({}) {} {}",
                index,
                cell.opcode,
                cell.args.join(", "),
                if cell.is_reversible { "[R]" } else { "[D]" },
                if cell.executed { "[EXEC]" } else { "[PENDING]" },
            )?;
        }
        Ok(())
    }
}
