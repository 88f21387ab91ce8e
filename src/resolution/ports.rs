//! Boundaries between the engine and the schedule storage layer.
//!
//! A [`SlotSource`] hands the engine open slots in presentation order; a
//! [`DecisionSink`] receives one decision per slot in the same order.

use std::collections::VecDeque;
use std::io::Write;

use crate::error::{EngineError, EngineResult};
use crate::models::{AssignmentDecision, ShiftSlot};

/// Produces shift slots in the order they must be resolved.
pub trait SlotSource {
    /// Returns the next slot, or `None` once the source is exhausted.
    fn next_slot(&mut self) -> EngineResult<Option<ShiftSlot>>;
}

/// Consumes assignment decisions, in slot order.
pub trait DecisionSink {
    /// Records one decision.
    fn record(&mut self, decision: AssignmentDecision) -> EngineResult<()>;
}

/// A slot source over an already-materialized list.
#[derive(Debug, Clone, Default)]
pub struct InMemorySlotSource {
    slots: VecDeque<ShiftSlot>,
}

impl InMemorySlotSource {
    /// Creates a source yielding `slots` front to back.
    pub fn new(slots: Vec<ShiftSlot>) -> Self {
        Self {
            slots: slots.into(),
        }
    }

    /// Returns the number of slots not yet handed out.
    pub fn remaining(&self) -> usize {
        self.slots.len()
    }
}

impl From<Vec<ShiftSlot>> for InMemorySlotSource {
    fn from(slots: Vec<ShiftSlot>) -> Self {
        Self::new(slots)
    }
}

impl SlotSource for InMemorySlotSource {
    fn next_slot(&mut self) -> EngineResult<Option<ShiftSlot>> {
        Ok(self.slots.pop_front())
    }
}

impl DecisionSink for Vec<AssignmentDecision> {
    fn record(&mut self, decision: AssignmentDecision) -> EngineResult<()> {
        self.push(decision);
        Ok(())
    }
}

/// Writes each decision as one line of JSON.
pub struct JsonLinesSink<W: Write> {
    writer: W,
    written: usize,
}

impl<W: Write> JsonLinesSink<W> {
    /// Wraps a writer.
    pub fn new(writer: W) -> Self {
        Self { writer, written: 0 }
    }

    /// Returns the number of decisions written so far.
    pub fn written(&self) -> usize {
        self.written
    }

    /// Flushes and returns the underlying writer.
    pub fn into_inner(mut self) -> EngineResult<W> {
        self.writer.flush().map_err(sink_error)?;
        Ok(self.writer)
    }
}

impl<W: Write> DecisionSink for JsonLinesSink<W> {
    fn record(&mut self, decision: AssignmentDecision) -> EngineResult<()> {
        serde_json::to_writer(&mut self.writer, &decision).map_err(|e| {
            EngineError::DecisionSink {
                message: e.to_string(),
            }
        })?;
        self.writer.write_all(b"\n").map_err(sink_error)?;
        self.written += 1;
        Ok(())
    }
}

fn sink_error(e: std::io::Error) -> EngineError {
    EngineError::DecisionSink {
        message: e.to_string(),
    }
}
