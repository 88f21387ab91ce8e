//! Core data models for the shift resolution engine.
//!
//! This module contains all the domain models used throughout the engine.

mod decision;
mod ledger;
mod slot;
mod time_range;

pub use decision::{
    AssigneeName, AssignmentDecision, ClaimEvaluation, ClaimVerdict, PassSummary, SlotFailure,
    SlotOutcome,
};
pub use ledger::{LedgerBook, LedgerShift, WorkerLedger};
pub use slot::{AnnotationThread, Claim, Claimant, ExistingAssignment, ShiftSlot, SlotKey};
pub use time_range::TimeRange;
