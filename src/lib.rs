//! Weekly shift assignment resolution.
//!
//! This crate resolves open shift slots on a weekly schedule by reading the
//! claims workers leave on each slot, applying area-specific eligibility
//! rules, and committing each winner to a per-worker ledger that later slots
//! are checked against.

#![warn(missing_docs)]

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod resolution;
