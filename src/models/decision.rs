//! Assignment decisions, the per-claim decision log, and pass summaries.
//!
//! Every slot handed to the engine produces exactly one
//! [`AssignmentDecision`]. Each claim the evaluator looked at is recorded as
//! a [`ClaimEvaluation`] so rejections can be audited without being errors.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::FinalWeek;

use super::{Claimant, SlotKey};

/// Why a claim was accepted or passed over.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ClaimVerdict {
    /// The claim won the slot.
    Accepted,
    /// The entry was malformed, so there is no claimant.
    UnknownClaimant,
    /// The statement does not name its claimant (a comment for someone else).
    NotSelfAttributed,
    /// The claimant has no primary-area shift yet.
    MissingPrerequisite,
    /// The claimant already holds the weekly maximum.
    WeeklyCapReached {
        /// The week the slot falls in.
        week: FinalWeek,
        /// Shifts already held that week.
        count: u32,
        /// The configured cap.
        cap: u32,
    },
    /// The claimant already holds the flat maximum.
    TotalCapReached {
        /// Shifts already held.
        count: u32,
        /// The configured cap.
        cap: u32,
    },
    /// The claimant already holds an overlapping shift on the same date key.
    TimeConflict,
}

impl ClaimVerdict {
    /// Returns true for [`ClaimVerdict::Accepted`].
    pub fn is_accepted(&self) -> bool {
        matches!(self, ClaimVerdict::Accepted)
    }
}

/// One entry in a slot's decision log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimEvaluation {
    /// Position of the claim in its thread (0 = oldest).
    pub claim_index: usize,
    /// Who made the claim.
    pub claimant: Claimant,
    /// The outcome for this claim.
    pub verdict: ClaimVerdict,
    /// Human-readable explanation.
    pub reasoning: String,
}

/// A winning claimant's name, split for first/last name columns.
///
/// # Example
///
/// ```
/// use shift_resolver::models::AssigneeName;
///
/// let name = AssigneeName::from_full_name("Mary Ann Lee");
/// assert_eq!(name.first_name, "Mary Ann");
/// assert_eq!(name.last_name, "Lee");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssigneeName {
    /// The name exactly as it appeared on the claim.
    pub full_name: String,
    /// Every word except the last.
    pub first_name: String,
    /// The last word, or empty for a single-word name.
    pub last_name: String,
}

impl AssigneeName {
    /// Splits a full name on whitespace.
    pub fn from_full_name(full_name: &str) -> Self {
        let words: Vec<&str> = full_name.split_whitespace().collect();
        let (first_name, last_name) = match words.split_last() {
            Some((last, rest)) if !rest.is_empty() => (rest.join(" "), (*last).to_string()),
            Some((only, _)) => ((*only).to_string(), String::new()),
            None => (String::new(), String::new()),
        };

        Self {
            full_name: full_name.to_string(),
            first_name,
            last_name,
        }
    }
}

/// Terminal state of a slot after processing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SlotOutcome {
    /// A claimant won the slot.
    Assigned {
        /// The winner.
        assignee: AssigneeName,
    },
    /// No claimant survived the rules.
    Unassigned,
    /// The slot could not be processed; the source record needs fixing.
    Failed {
        /// What went wrong.
        message: String,
    },
}

/// The engine's decision for one slot, emitted to the decision sink.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentDecision {
    /// Position of the slot in source order (0-based).
    pub sequence: usize,
    /// The slot this decision is for.
    pub slot: SlotKey,
    /// The outcome.
    pub outcome: SlotOutcome,
    /// Claims examined, newest first.
    #[serde(default)]
    pub evaluations: Vec<ClaimEvaluation>,
}

impl AssignmentDecision {
    /// Returns the assignee's full name, if the slot was assigned.
    pub fn assignee(&self) -> Option<&str> {
        match &self.outcome {
            SlotOutcome::Assigned { assignee } => Some(&assignee.full_name),
            _ => None,
        }
    }

    /// Returns true if the slot was assigned.
    pub fn is_assigned(&self) -> bool {
        matches!(self.outcome, SlotOutcome::Assigned { .. })
    }
}

/// A slot that could not be processed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotFailure {
    /// Position of the slot in source order.
    pub sequence: usize,
    /// The slot's identity.
    pub slot: SlotKey,
    /// The error message.
    pub message: String,
}

/// Aggregate result of one resolution pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PassSummary {
    /// Unique identifier for this pass.
    pub pass_id: Uuid,
    /// When the pass started.
    pub started_at: DateTime<Utc>,
    /// The version of the engine that ran the pass.
    pub engine_version: String,
    /// Number of slots read from the source.
    pub slots_processed: usize,
    /// Number of slots assigned.
    pub assigned: usize,
    /// Number of slots left unassigned.
    pub unassigned: usize,
    /// Slots that failed, with their identity.
    pub failures: Vec<SlotFailure>,
    /// Wall-clock duration of the pass in microseconds.
    pub duration_us: u64,
}
