//! Stepped execution over HRIR programs
//!
//! The engine is a state machine over one borrowed [`Program`]: it steps the
//! program counter forward, marking cells executed, and unwinds it backward
//! for undo and checkpoint rollback. The engine does not interpret opcode
//! semantics; callers supply opcode effects separately when they need them.

use thiserror::Error;

use super::EngineResult;
use super::program::Program;

/// Result of a single engine step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// One cell was marked executed and the program counter advanced.
    Advanced,
    /// The program counter is already at the end; nothing changed.
    Complete,
}

/// Errors raised by engine unwind operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EngineError {
    /// `undo` was called with the program counter at zero.
    #[error("nothing to undo: program counter is at the start")]
    NothingToUndo,
}

/// Execution engine bound to exactly one program for its lifetime.
#[derive(Debug)]
pub struct Engine<'a> {
    program: &'a mut Program,
    checkpoint: usize,
    steps_executed: usize,
    rollbacks: usize,
}

impl<'a> Engine<'a> {
    /// Bind a new engine to the given program.
    pub fn new(program: &'a mut Program) -> Self {
        Self {
            program,
            checkpoint: 0,
            steps_executed: 0,
            rollbacks: 0,
        }
    }

    /// Execute one step: mark the cell at `pc` executed and advance.
    ///
    /// Returns [`StepOutcome::Complete`] without touching any state when the
    /// program has already run to the end.
    pub fn step(&mut self) -> StepOutcome {
        let pc = self.program.pc;
        if pc >= self.program.cells.len() {
            return StepOutcome::Complete;
        }

        let cell = &mut self.program.cells[pc];
        cell.executed = true;
        cell.result = Some("executed".to_string());

        self.program.pc += 1;
        self.steps_executed += 1;
        StepOutcome::Advanced
    }

    /// Step until the program is complete; returns the number of steps taken.
    pub fn run(&mut self) -> usize {
        let mut steps = 0;
        while self.step() == StepOutcome::Advanced {
            steps += 1;
        }
        steps
    }

    /// Undo the most recent step.
    ///
    /// Moves the program counter back one cell and clears that cell's
    /// execution bookkeeping. Fails at the start of the program.
    pub fn undo(&mut self) -> EngineResult<()> {
        if self.program.pc == 0 {
            return Err(EngineError::NothingToUndo);
        }

        self.program.pc -= 1;
        let cell = &mut self.program.cells[self.program.pc];
        cell.executed = false;
        cell.result = None;

        self.steps_executed = self.steps_executed.saturating_sub(1);
        self.rollbacks += 1;
        Ok(())
    }

    /// Record the current program counter as the rollback boundary.
    pub fn checkpoint(&mut self) {
        self.checkpoint = self.program.pc;
    }

    /// Undo back to the recorded checkpoint.
    ///
    /// Stops immediately on the first failed undo, leaving the program
    /// counter and checkpoint consistent. Returns the number of cells undone.
    pub fn rollback(&mut self) -> EngineResult<usize> {
        let mut undone = 0;
        while self.program.pc > self.checkpoint {
            self.undo()?;
            undone += 1;
        }
        Ok(undone)
    }

    /// Whether the program counter has reached the end of the program.
    pub fn is_complete(&self) -> bool {
        self.program.pc == self.program.cells.len()
    }

    /// Current program counter.
    pub fn pc(&self) -> usize {
        self.program.pc
    }

    /// The recorded checkpoint position.
    pub fn checkpoint_position(&self) -> usize {
        self.checkpoint
    }

    /// Total steps executed, net of undos.
    pub fn steps_executed(&self) -> usize {
        self.steps_executed
    }

    /// Total cells unwound across all undo calls.
    pub fn rollbacks(&self) -> usize {
        self.rollbacks
    }
}
