//! Running a program.
//!
//! [`Execution`] unrolls a snapshot of the tree into moves one at a time
//! with an explicit worklist. [`Runner`] paces an execution against a clock.

use std::rc::Rc;
use std::time::Duration;

use crate::block::{BlockKind, CodeBlock, Move};
use crate::program::Program;

/// Immutable copy of the tree taken when a run starts.
#[derive(Debug)]
enum Instruction {
    Move(Move),
    Repeat { count: u32, body: Rc<[Instruction]> },
}

fn compile(blocks: &[CodeBlock]) -> Rc<[Instruction]> {
    blocks
        .iter()
        .map(|block| match &block.kind {
            BlockKind::Leaf { action } => Instruction::Move(*action),
            BlockKind::Repeat { repeat, body } => Instruction::Repeat {
                count: repeat.get(),
                body: compile(body),
            },
        })
        .collect()
}

#[derive(Debug)]
struct Frame {
    body: Rc<[Instruction]>,
    index: usize,
    /// Passes left after the current one.
    remaining: u32,
}

/// The lazy move sequence of one run.
///
/// Later edits to the program do not affect a started execution.
#[derive(Debug)]
pub struct Execution {
    stack: Vec<Frame>,
}

impl Execution {
    /// Snapshot `program` and start at its first move.
    #[must_use]
    pub fn new(program: &Program) -> Self {
        Self::from_blocks(program.blocks())
    }

    /// Snapshot a block list.
    #[must_use]
    pub fn from_blocks(blocks: &[CodeBlock]) -> Self {
        Self {
            stack: vec![Frame {
                body: compile(blocks),
                index: 0,
                remaining: 0,
            }],
        }
    }
}

impl Iterator for Execution {
    type Item = Move;

    fn next(&mut self) -> Option<Move> {
        loop {
            let frame = self.stack.last_mut()?;
            if let Some(instruction) = frame.body.get(frame.index) {
                frame.index += 1;
                match instruction {
                    Instruction::Move(action) => return Some(*action),
                    Instruction::Repeat { count, body } => {
                        if !body.is_empty() {
                            let frame = Frame {
                                body: Rc::clone(body),
                                index: 0,
                                remaining: count - 1,
                            };
                            self.stack.push(frame);
                        }
                    }
                }
            } else if frame.remaining > 0 {
                frame.remaining -= 1;
                frame.index = 0;
            } else {
                let _ = self.stack.pop();
            }
        }
    }
}

/// What one poll of the [`Runner`] produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// No run in progress.
    Idle,
    /// The next move is not due yet.
    Wait,
    /// Perform this move.
    Move(Move),
    /// The run just ran out of moves. Reported once.
    Finished,
}

/// Releases the moves of an execution on a fixed schedule: move `k` is not
/// released before `k × delay` has passed since the run started.
#[derive(Debug)]
pub struct Runner {
    delay: Duration,
    execution: Option<Execution>,
    started: Duration,
    released: u32,
}

impl Runner {
    /// A runner that waits `delay` between moves.
    #[must_use]
    pub const fn new(delay: Duration) -> Self {
        Self {
            delay,
            execution: None,
            started: Duration::ZERO,
            released: 0,
        }
    }

    /// Start a fresh run of `program` at time `now`, discarding any run in
    /// progress.
    pub fn run(&mut self, program: &Program, now: Duration) {
        self.execution = Some(Execution::new(program));
        self.started = now;
        self.released = 0;
    }

    /// Cancel the current run.
    pub fn stop(&mut self) {
        self.execution = None;
    }

    /// Whether a run is in progress.
    #[must_use]
    pub const fn is_running(&self) -> bool {
        self.execution.is_some()
    }

    /// Moves released so far in this run.
    #[must_use]
    pub const fn released(&self) -> u32 {
        self.released
    }

    /// Release at most one move if it is due at `now`.
    pub fn poll(&mut self, now: Duration) -> Step {
        let Some(execution) = self.execution.as_mut() else {
            return Step::Idle;
        };
        let due = self.started + self.delay.saturating_mul(self.released + 1);
        if now < due {
            return Step::Wait;
        }
        if let Some(action) = execution.next() {
            self.released += 1;
            Step::Move(action)
        } else {
            self.execution = None;
            Step::Finished
        }
    }
}
