//! The resolution pass.
//!
//! The engine walks slots strictly in source order. Each slot is evaluated
//! against the ledgers as committed by every earlier slot, so reordering
//! slots can change outcomes. Nothing here runs concurrently.

use std::time::Instant;

use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::ScheduleConfig;
use crate::error::{EngineError, EngineResult};
use crate::models::{
    AssigneeName, AssignmentDecision, ExistingAssignment, LedgerBook, PassSummary, ShiftSlot,
    SlotFailure, SlotOutcome,
};

use super::{
    AuthorshipCheck, DecisionSink, EligibilityEvaluator, SlotSource, authorship_check,
    parse_annotation,
};

/// Drives a resolution pass over a slot source.
///
/// # Example
///
/// ```no_run
/// use shift_resolver::config::ConfigLoader;
/// use shift_resolver::models::{AssignmentDecision, LedgerBook, ShiftSlot};
/// use shift_resolver::resolution::{InMemorySlotSource, ResolutionEngine};
///
/// let config = ConfigLoader::load("./config/worcester_finals_2024")?.into_config();
/// let engine = ResolutionEngine::new(config);
///
/// let mut source = InMemorySlotSource::new(vec![
///     ShiftSlot::new("Dish", "2024-12-11", "9:00AM-12:00PM")
///         .with_annotation("Ann Lee\n\t-Ann Lee"),
/// ]);
/// let mut decisions: Vec<AssignmentDecision> = Vec::new();
/// let mut ledgers = LedgerBook::new();
///
/// let summary = engine.run(&mut source, &mut decisions, &mut ledgers)?;
/// assert_eq!(summary.assigned, 1);
/// # Ok::<(), shift_resolver::error::EngineError>(())
/// ```
pub struct ResolutionEngine {
    config: ScheduleConfig,
    authorship: Box<dyn AuthorshipCheck>,
}

impl ResolutionEngine {
    /// Creates an engine using the authorship check named in the config.
    pub fn new(config: ScheduleConfig) -> Self {
        let authorship = authorship_check(config.rules().authorship);
        Self { config, authorship }
    }

    /// Replaces the authorship check.
    pub fn with_authorship(mut self, check: impl AuthorshipCheck + 'static) -> Self {
        self.authorship = Box::new(check);
        self
    }

    /// Returns the engine's configuration.
    pub fn config(&self) -> &ScheduleConfig {
        &self.config
    }

    /// Commits shifts that were already held before the pass.
    ///
    /// Seeding bypasses caps and the prerequisite since these rows were
    /// filled by hand, but a worker still cannot hold two overlapping shifts
    /// on one date key.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::TimeFormat`] for a malformed range and
    /// [`EngineError::OverlappingAssignment`] when a seed overlaps an earlier
    /// one. Seeds before the failing one stay committed.
    pub fn seed(
        &self,
        ledgers: &mut LedgerBook,
        existing: &[ExistingAssignment],
    ) -> EngineResult<()> {
        for assignment in existing {
            if let Some(ledger) = ledgers.get(&assignment.name) {
                if ledger.has_conflict(&assignment.date_key, &assignment.time_range)? {
                    warn!(
                        name = %assignment.name,
                        date_key = %assignment.date_key,
                        time_range = %assignment.time_range,
                        "Existing assignment overlaps a shift already held"
                    );
                    return Err(EngineError::OverlappingAssignment {
                        name: assignment.name.clone(),
                        date_key: assignment.date_key.clone(),
                        time_range: assignment.time_range.clone(),
                    });
                }
            }
            ledgers.commit(
                &self.config,
                &assignment.name,
                &assignment.area,
                &assignment.date_key,
                &assignment.time_range,
            )?;
        }
        if !existing.is_empty() {
            info!(
                existing = existing.len(),
                workers = ledgers.len(),
                "Seeded ledgers with existing assignments"
            );
        }
        Ok(())
    }

    /// Resolves a single slot and commits the winner to `ledgers`.
    ///
    /// On error nothing is committed.
    pub fn resolve_slot(
        &self,
        sequence: usize,
        slot: &ShiftSlot,
        ledgers: &mut LedgerBook,
    ) -> EngineResult<AssignmentDecision> {
        let thread = parse_annotation(slot.annotation.as_deref(), self.config.annotation());
        let evaluator = EligibilityEvaluator::new(&self.config, self.authorship.as_ref());
        let resolution = evaluator.resolve(slot, &thread, ledgers)?;

        let outcome = match resolution.winner {
            Some(name) => {
                let ledger = ledgers.commit(
                    &self.config,
                    &name,
                    &slot.area,
                    &slot.date_key,
                    &slot.time_range,
                )?;
                info!(
                    area = %slot.area,
                    date_key = %slot.date_key,
                    time_range = %slot.time_range,
                    assignee = %name,
                    shifts = ledger.total_shift_count(),
                    hours = %ledger.total_hours().normalize(),
                    "Slot assigned"
                );
                SlotOutcome::Assigned {
                    assignee: AssigneeName::from_full_name(&name),
                }
            }
            None => {
                info!(
                    area = %slot.area,
                    date_key = %slot.date_key,
                    time_range = %slot.time_range,
                    claims = thread.len(),
                    "Unassigned because no valid claimant found"
                );
                SlotOutcome::Unassigned
            }
        };

        Ok(AssignmentDecision {
            sequence,
            slot: slot.key(),
            outcome,
            evaluations: resolution.evaluations,
        })
    }

    /// Runs one pass: every slot from `source` yields one decision in `sink`.
    ///
    /// A slot that fails (a malformed time range) is reported in the
    /// summary and emitted with a `Failed` outcome; the pass continues.
    /// Errors from the source or the sink end the pass.
    pub fn run<S, K>(
        &self,
        source: &mut S,
        sink: &mut K,
        ledgers: &mut LedgerBook,
    ) -> EngineResult<PassSummary>
    where
        S: SlotSource + ?Sized,
        K: DecisionSink + ?Sized,
    {
        let pass_id = Uuid::new_v4();
        let started_at = Utc::now();
        let timer = Instant::now();
        info!(pass_id = %pass_id, period = %self.config.period().name, "Starting resolution pass");

        let mut sequence = 0;
        let mut assigned = 0;
        let mut unassigned = 0;
        let mut failures = Vec::new();

        while let Some(slot) = source.next_slot()? {
            let decision = match self.resolve_slot(sequence, &slot, ledgers) {
                Ok(decision) => decision,
                Err(err) => {
                    warn!(
                        pass_id = %pass_id,
                        slot = %slot.key(),
                        error = %err,
                        "Slot failed; fix the source record"
                    );
                    failures.push(SlotFailure {
                        sequence,
                        slot: slot.key(),
                        message: err.to_string(),
                    });
                    AssignmentDecision {
                        sequence,
                        slot: slot.key(),
                        outcome: SlotOutcome::Failed {
                            message: err.to_string(),
                        },
                        evaluations: Vec::new(),
                    }
                }
            };

            match decision.outcome {
                SlotOutcome::Assigned { .. } => assigned += 1,
                SlotOutcome::Unassigned => unassigned += 1,
                SlotOutcome::Failed { .. } => {}
            }

            sink.record(decision)?;
            sequence += 1;
        }

        let duration_us = timer.elapsed().as_micros() as u64;
        info!(
            pass_id = %pass_id,
            slots = sequence,
            assigned,
            unassigned,
            failed = failures.len(),
            duration_us,
            "Resolution pass completed"
        );

        Ok(PassSummary {
            pass_id,
            started_at,
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            slots_processed: sequence,
            assigned,
            unassigned,
            failures,
            duration_us,
        })
    }
}
