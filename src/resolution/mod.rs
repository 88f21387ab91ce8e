//! Assignment resolution for shift slots.
//!
//! This module contains the annotation parser, the authorship check, the
//! eligibility rule chain, the slot source and decision sink boundaries, and
//! the engine that drives a single sequential pass over a schedule.

mod annotation;
mod authorship;
mod eligibility;
mod engine;
mod ports;

pub use annotation::parse_annotation;
pub use authorship::{AuthorshipCheck, ClaimantField, StatementNamesClaimant, authorship_check};
pub use eligibility::{EligibilityEvaluator, Resolution};
pub use engine::ResolutionEngine;
pub use ports::{DecisionSink, InMemorySlotSource, JsonLinesSink, SlotSource};
