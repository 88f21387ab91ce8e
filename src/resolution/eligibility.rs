//! The eligibility rule chain.
//!
//! Claims are considered newest first; the first claim that survives every
//! check wins the slot. Rejections are normal control flow and are recorded
//! as [`ClaimEvaluation`]s rather than returned as errors.
//!
//! Checks, in order:
//!
//! 1. The claim must have a known claimant.
//! 2. The authorship check must accept the claim.
//! 3. Primary areas: a worker with no ledger is accepted outright.
//!    Secondary areas: the worker must already hold a primary-area shift.
//! 4. The weekly cap for the slot's final week. Date keys outside the first
//!    final week use the second week's cap and count.
//! 5. The flat total cap (if configured).
//! 6. No overlapping shift on the same date key.

use tracing::{debug, warn};

use crate::config::{AreaClass, FinalWeek, ScheduleConfig};
use crate::error::EngineResult;
use crate::models::{
    AnnotationThread, Claim, ClaimEvaluation, ClaimVerdict, Claimant, LedgerBook, ShiftSlot,
    WorkerLedger,
};

use super::AuthorshipCheck;

/// The evaluator's answer for one slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// The winning claimant, or `None` if the slot stays unassigned.
    pub winner: Option<String>,
    /// Every claim examined, newest first, ending with the winner if any.
    pub evaluations: Vec<ClaimEvaluation>,
}

/// Applies the area-specific rule chain to a slot's claims.
///
/// Holds only shared references: evaluation never mutates a ledger.
pub struct EligibilityEvaluator<'a> {
    config: &'a ScheduleConfig,
    authorship: &'a dyn AuthorshipCheck,
}

impl<'a> EligibilityEvaluator<'a> {
    /// Creates an evaluator over the given configuration and authorship check.
    pub fn new(config: &'a ScheduleConfig, authorship: &'a dyn AuthorshipCheck) -> Self {
        Self { config, authorship }
    }

    /// Picks the most recent eligible claimant for `slot`.
    ///
    /// Fails only when a time range cannot be parsed during the conflict
    /// check; every other rejection moves on to the next-older claim.
    ///
    /// # Arguments
    ///
    /// * `slot` - The slot being resolved
    /// * `thread` - The slot's parsed claims, oldest first
    /// * `ledgers` - Every worker's ledger as committed by earlier slots
    ///
    /// # Returns
    ///
    /// The winner (if any) and one evaluation per claim examined, newest
    /// first. Claims older than the winner are not examined.
    pub fn resolve(
        &self,
        slot: &ShiftSlot,
        thread: &AnnotationThread,
        ledgers: &LedgerBook,
    ) -> EngineResult<Resolution> {
        let class = self.config.area_class(&slot.area);
        let week = self.config.week_of(&slot.date_key);
        let mut evaluations = Vec::with_capacity(thread.len());

        for (claim_index, claim) in thread.newest_first() {
            let verdict = self.evaluate(slot, class, week, claim, ledgers)?;
            let reasoning = describe(&verdict, &claim.claimant, slot);

            match &verdict {
                ClaimVerdict::Accepted => {}
                ClaimVerdict::UnknownClaimant => warn!(
                    area = %slot.area,
                    date_key = %slot.date_key,
                    time_range = %slot.time_range,
                    claim_index,
                    "Claim could not be attributed, resolve manually"
                ),
                _ => debug!(
                    area = %slot.area,
                    date_key = %slot.date_key,
                    claimant = %claim.claimant,
                    verdict = ?verdict,
                    "Moving to next claimant"
                ),
            }

            // Stop at the first acceptance so older claims are never logged
            let accepted = verdict.is_accepted();
            evaluations.push(ClaimEvaluation {
                claim_index,
                claimant: claim.claimant.clone(),
                verdict,
                reasoning,
            });

            if accepted {
                return Ok(Resolution {
                    winner: claim.claimant.name().map(str::to_string),
                    evaluations,
                });
            }
        }

        Ok(Resolution {
            winner: None,
            evaluations,
        })
    }

    fn evaluate(
        &self,
        slot: &ShiftSlot,
        class: AreaClass,
        week: Option<FinalWeek>,
        claim: &Claim,
        ledgers: &LedgerBook,
    ) -> EngineResult<ClaimVerdict> {
        // Malformed entries are kept in the thread but can never win
        let name = match &claim.claimant {
            Claimant::Named(name) => name,
            Claimant::Unknown => return Ok(ClaimVerdict::UnknownClaimant),
        };

        if !self.authorship.verify(&claim.statement, name) {
            return Ok(ClaimVerdict::NotSelfAttributed);
        }

        // A first primary-area shift needs no further checks; a secondary
        // area needs a primary shift already on the ledger.
        let ledger = match (class, ledgers.get(name)) {
            (AreaClass::Primary, None) => return Ok(ClaimVerdict::Accepted),
            (AreaClass::Secondary, None) => return Ok(ClaimVerdict::MissingPrerequisite),
            (AreaClass::Secondary, Some(ledger)) if !ledger.has_primary_shift() => {
                return Ok(ClaimVerdict::MissingPrerequisite);
            }
            (_, Some(ledger)) => ledger,
        };

        self.check_load(slot, class, week, ledger)
    }

    fn check_load(
        &self,
        slot: &ShiftSlot,
        class: AreaClass,
        week: Option<FinalWeek>,
        ledger: &WorkerLedger,
    ) -> EngineResult<ClaimVerdict> {
        // Anything outside the first final week is held to the second-week
        // cap, including date keys listed in neither week.
        let week = week.unwrap_or(FinalWeek::Second);
        let count = ledger.week_count(week);
        let cap = self.config.weekly_cap(class, week);
        if count >= cap {
            return Ok(ClaimVerdict::WeeklyCapReached { week, count, cap });
        }

        // Optional flat cap from older rule sets, checked after the weekly one
        if let Some(cap) = self.config.total_cap() {
            let count = ledger.total_shift_count();
            if count >= cap {
                return Ok(ClaimVerdict::TotalCapReached { count, cap });
            }
        }

        // Only shifts on the same date key can conflict. A malformed range
        // surfaces here as an error rather than a rejection.
        if ledger.has_conflict(&slot.date_key, &slot.time_range)? {
            return Ok(ClaimVerdict::TimeConflict);
        }

        Ok(ClaimVerdict::Accepted)
    }
}

fn describe(verdict: &ClaimVerdict, claimant: &Claimant, slot: &ShiftSlot) -> String {
    match verdict {
        ClaimVerdict::Accepted => format!("{} is the most recent eligible claimant", claimant),
        ClaimVerdict::UnknownClaimant => {
            "Entry has no recognisable claimant; resolve this claim manually".to_string()
        }
        ClaimVerdict::NotSelfAttributed => {
            format!("{} commented for someone else", claimant)
        }
        ClaimVerdict::MissingPrerequisite => {
            format!("{} does not hold a primary-area shift yet", claimant)
        }
        ClaimVerdict::WeeklyCapReached { week, count, cap } => {
            format!("{} already has {}/{} shifts in the {}", claimant, count, cap, week)
        }
        ClaimVerdict::TotalCapReached { count, cap } => {
            format!("{} already has {}/{} shifts in total", claimant, count, cap)
        }
        ClaimVerdict::TimeConflict => format!(
            "{} already holds a shift overlapping {} on {}",
            claimant, slot.time_range, slot.date_key
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ConfigLoader, ShiftCaps, WeekCaps};
    use crate::error::EngineError;
    use crate::models::Claim;
    use crate::resolution::{ClaimantField, StatementNamesClaimant};

    const FIRST_WEEK: [&str; 4] = ["2024-12-11", "2024-12-12", "2024-12-13", "2024-12-14"];
    const SECOND_WEEK: [&str; 5] = [
        "2024-12-15",
        "2024-12-16",
        "2024-12-17",
        "2024-12-18",
        "2024-12-19",
    ];

    fn config() -> ScheduleConfig {
        ConfigLoader::load("./config/worcester_finals_2024")
            .expect("Failed to load config")
            .into_config()
    }

    fn thread(claims: &[(&str, &str)]) -> AnnotationThread {
        AnnotationThread::new(claims.iter().map(|(s, c)| Claim::named(*s, *c)).collect())
    }

    fn resolve(
        config: &ScheduleConfig,
        slot: &ShiftSlot,
        thread: &AnnotationThread,
        ledgers: &LedgerBook,
    ) -> Resolution {
        EligibilityEvaluator::new(config, &StatementNamesClaimant)
            .resolve(slot, thread, ledgers)
            .unwrap()
    }

    #[test]
    fn test_newest_claim_wins() {
        let config = config();
        let slot = ShiftSlot::new("Dish", FIRST_WEEK[0], "9:00AM-12:00PM");
        let claims = thread(&[("Alice Kim", "Alice Kim"), ("Bob Ray", "Bob Ray")]);

        let resolution = resolve(&config, &slot, &claims, &LedgerBook::new());
        assert_eq!(resolution.winner.as_deref(), Some("Bob Ray"));
        assert_eq!(resolution.evaluations.len(), 1);
        assert_eq!(resolution.evaluations[0].claim_index, 1);
    }

    #[test]
    fn test_empty_thread_is_unassigned() {
        let config = config();
        let slot = ShiftSlot::new("Dish", FIRST_WEEK[0], "9:00AM-12:00PM");

        let resolution = resolve(&config, &slot, &AnnotationThread::default(), &LedgerBook::new());
        assert_eq!(resolution.winner, None);
        assert!(resolution.evaluations.is_empty());
    }

    #[test]
    fn test_unknown_claimant_skipped() {
        let config = config();
        let slot = ShiftSlot::new("Dish", FIRST_WEEK[0], "9:00AM-12:00PM");
        let claims = AnnotationThread::new(vec![
            Claim::named("Alice Kim", "Alice Kim"),
            Claim::unknown("mangled entry"),
        ]);

        let resolution = resolve(&config, &slot, &claims, &LedgerBook::new());
        assert_eq!(resolution.winner.as_deref(), Some("Alice Kim"));
        assert_eq!(
            resolution.evaluations[0].verdict,
            ClaimVerdict::UnknownClaimant
        );
    }

    #[test]
    fn test_comment_for_someone_else_skipped() {
        let config = config();
        let slot = ShiftSlot::new("Dish", FIRST_WEEK[0], "9:00AM-12:00PM");
        let claims = thread(&[
            ("Alice Kim", "Alice Kim"),
            ("Put Alice down for this one", "Bob Ray"),
        ]);

        let resolution = resolve(&config, &slot, &claims, &LedgerBook::new());
        assert_eq!(resolution.winner.as_deref(), Some("Alice Kim"));
        assert_eq!(
            resolution.evaluations[0].verdict,
            ClaimVerdict::NotSelfAttributed
        );
        assert_eq!(
            resolution.evaluations[0].reasoning,
            "Bob Ray commented for someone else"
        );
    }

    #[test]
    fn test_claimant_field_mode_skips_attribution() {
        let config = config();
        let slot = ShiftSlot::new("Dish", FIRST_WEEK[0], "9:00AM-12:00PM");
        let claims = thread(&[("Alice Kim", "Alice Kim"), ("me!", "Bob Ray")]);

        let resolution = EligibilityEvaluator::new(&config, &ClaimantField)
            .resolve(&slot, &claims, &LedgerBook::new())
            .unwrap();
        assert_eq!(resolution.winner.as_deref(), Some("Bob Ray"));
    }

    #[test]
    fn test_primary_first_shift_granted_unconditionally() {
        // Even a malformed time range is not inspected for a new worker.
        let config = config();
        let slot = ShiftSlot::new("Pot Room", "Saturday", "whenever");
        let claims = thread(&[("Cara Diaz", "Cara Diaz")]);

        let resolution = resolve(&config, &slot, &claims, &LedgerBook::new());
        assert_eq!(resolution.winner.as_deref(), Some("Cara Diaz"));
    }

    #[test]
    fn test_secondary_requires_existing_ledger() {
        let config = config();
        let slot = ShiftSlot::new("Sushi", FIRST_WEEK[0], "9:00AM-12:00PM");
        let claims = thread(&[("Cara Diaz", "Cara Diaz")]);

        let resolution = resolve(&config, &slot, &claims, &LedgerBook::new());
        assert_eq!(resolution.winner, None);
        assert_eq!(
            resolution.evaluations[0].verdict,
            ClaimVerdict::MissingPrerequisite
        );
    }

    #[test]
    fn test_secondary_requires_primary_shift() {
        let config = config();
        let mut ledgers = LedgerBook::new();
        // Seeded directly: only a secondary shift held.
        ledgers
            .commit(&config, "Cara Diaz", "Line", FIRST_WEEK[1], "9:00AM-10:00AM")
            .unwrap();

        let slot = ShiftSlot::new("Sushi", FIRST_WEEK[0], "9:00AM-12:00PM");
        let claims = thread(&[("Cara Diaz", "Cara Diaz")]);

        let resolution = resolve(&config, &slot, &claims, &ledgers);
        assert_eq!(resolution.winner, None);

        ledgers
            .commit(&config, "Cara Diaz", "Dish", FIRST_WEEK[2], "9:00AM-10:00AM")
            .unwrap();
        let resolution = resolve(&config, &slot, &claims, &ledgers);
        assert_eq!(resolution.winner.as_deref(), Some("Cara Diaz"));
    }

    #[test]
    fn test_first_week_cap_rejects_fourth_primary_shift() {
        let config = config();
        let mut ledgers = LedgerBook::new();
        for date in &FIRST_WEEK[..3] {
            ledgers
                .commit(&config, "Dee Park", "Dish", date, "9:00AM-12:00PM")
                .unwrap();
        }
        assert_eq!(ledgers.get("Dee Park").unwrap().first_week_count(), 3);

        let slot = ShiftSlot::new("Dish", FIRST_WEEK[3], "9:00AM-12:00PM");
        let claims = thread(&[("Dee Park", "Dee Park")]);

        let resolution = resolve(&config, &slot, &claims, &ledgers);
        assert_eq!(resolution.winner, None);
        assert_eq!(
            resolution.evaluations[0].verdict,
            ClaimVerdict::WeeklyCapReached {
                week: FinalWeek::First,
                count: 3,
                cap: 3
            }
        );

        // A higher configured cap lets the same claim through.
        let relaxed = config.clone().with_caps(ShiftCaps {
            primary: WeekCaps {
                first_week: 4,
                second_week: 5,
            },
            ..ShiftCaps::default()
        });
        let resolution = resolve(&relaxed, &slot, &claims, &ledgers);
        assert_eq!(resolution.winner.as_deref(), Some("Dee Park"));
    }

    #[test]
    fn test_second_week_cap_falls_back_to_older_claim() {
        let config = config();
        let mut ledgers = LedgerBook::new();
        for date in &SECOND_WEEK {
            ledgers
                .commit(&config, "Bob Ray", "Dish", date, "6:00PM-9:00PM")
                .unwrap();
        }

        let slot = ShiftSlot::new("Pot Room", SECOND_WEEK[0], "9:00AM-12:00PM");
        let claims = thread(&[("Alice Kim", "Alice Kim"), ("Bob Ray", "Bob Ray")]);

        let resolution = resolve(&config, &slot, &claims, &ledgers);
        assert_eq!(resolution.winner.as_deref(), Some("Alice Kim"));
        assert_eq!(resolution.evaluations.len(), 2);
        assert!(matches!(
            resolution.evaluations[0].verdict,
            ClaimVerdict::WeeklyCapReached {
                week: FinalWeek::Second,
                ..
            }
        ));
    }

    #[test]
    fn test_secondary_uses_secondary_caps() {
        let config = config().with_caps(ShiftCaps {
            secondary: WeekCaps {
                first_week: 1,
                second_week: 1,
            },
            ..ShiftCaps::default()
        });
        let mut ledgers = LedgerBook::new();
        ledgers
            .commit(&config, "Eli Moss", "Dish", FIRST_WEEK[0], "9:00AM-10:00AM")
            .unwrap();

        let claims = thread(&[("Eli Moss", "Eli Moss")]);
        let sushi = ShiftSlot::new("Sushi", FIRST_WEEK[1], "9:00AM-10:00AM");
        let dish = ShiftSlot::new("Dish", FIRST_WEEK[1], "9:00AM-10:00AM");

        assert_eq!(resolve(&config, &sushi, &claims, &ledgers).winner, None);
        assert_eq!(
            resolve(&config, &dish, &claims, &ledgers).winner.as_deref(),
            Some("Eli Moss")
        );
    }

    #[test]
    fn test_date_outside_final_weeks_uses_second_week_cap() {
        let config = config();
        let mut ledgers = LedgerBook::new();
        for date in &SECOND_WEEK {
            ledgers
                .commit(&config, "Bob Ray", "Dish", date, "9:00AM-10:00AM")
                .unwrap();
        }

        let slot = ShiftSlot::new("Dish", "Friday 12/20", "9:00AM-10:00AM");
        let claims = thread(&[("Alice Kim", "Alice Kim"), ("Bob Ray", "Bob Ray")]);

        let resolution = resolve(&config, &slot, &claims, &ledgers);
        assert_eq!(resolution.winner.as_deref(), Some("Alice Kim"));
        assert_eq!(
            resolution.evaluations[0].verdict,
            ClaimVerdict::WeeklyCapReached {
                week: FinalWeek::Second,
                count: 5,
                cap: 5
            }
        );
    }

    #[test]
    fn test_date_outside_final_weeks_ignores_first_week_count() {
        let config = config();
        let mut ledgers = LedgerBook::new();
        for date in &FIRST_WEEK[..3] {
            ledgers
                .commit(&config, "Eli Moss", "Dish", date, "9:00AM-10:00AM")
                .unwrap();
        }

        // First-week cap is reached, but this date falls under the second week's.
        let slot = ShiftSlot::new("Dish", "Friday 12/20", "9:00AM-10:00AM");
        let claims = thread(&[("Eli Moss", "Eli Moss")]);
        assert_eq!(
            resolve(&config, &slot, &claims, &ledgers).winner.as_deref(),
            Some("Eli Moss")
        );
    }

    #[test]
    fn test_total_cap() {
        let config = config().with_caps(ShiftCaps {
            total: Some(2),
            ..ShiftCaps::default()
        });
        let mut ledgers = LedgerBook::new();
        ledgers
            .commit(&config, "Eli Moss", "Dish", FIRST_WEEK[0], "9:00AM-10:00AM")
            .unwrap();
        ledgers
            .commit(&config, "Eli Moss", "Dish", SECOND_WEEK[0], "9:00AM-10:00AM")
            .unwrap();

        let slot = ShiftSlot::new("Dish", FIRST_WEEK[1], "9:00AM-10:00AM");
        let claims = thread(&[("Eli Moss", "Eli Moss")]);
        let resolution = resolve(&config, &slot, &claims, &ledgers);

        assert_eq!(resolution.winner, None);
        assert_eq!(
            resolution.evaluations[0].verdict,
            ClaimVerdict::TotalCapReached { count: 2, cap: 2 }
        );
    }

    #[test]
    fn test_conflict_falls_back() {
        let config = config();
        let mut ledgers = LedgerBook::new();
        ledgers
            .commit(&config, "Bob Ray", "Dish", FIRST_WEEK[0], "9:00AM-12:30PM")
            .unwrap();

        let slot = ShiftSlot::new("Pot Room", FIRST_WEEK[0], "12:00PM-2:00PM");
        let claims = thread(&[("Alice Kim", "Alice Kim"), ("Bob Ray", "Bob Ray")]);

        let resolution = resolve(&config, &slot, &claims, &ledgers);
        assert_eq!(resolution.winner.as_deref(), Some("Alice Kim"));
        assert_eq!(resolution.evaluations[0].verdict, ClaimVerdict::TimeConflict);
    }

    #[test]
    fn test_back_to_back_allowed() {
        let config = config();
        let mut ledgers = LedgerBook::new();
        ledgers
            .commit(&config, "Bob Ray", "Dish", FIRST_WEEK[0], "9:00AM-12:00PM")
            .unwrap();

        let slot = ShiftSlot::new("Line", FIRST_WEEK[0], "12:00PM-2:00PM");
        let claims = thread(&[("Bob Ray", "Bob Ray")]);
        assert_eq!(
            resolve(&config, &slot, &claims, &ledgers).winner.as_deref(),
            Some("Bob Ray")
        );
    }

    #[test]
    fn test_malformed_slot_time_is_error_for_known_worker() {
        let config = config();
        let mut ledgers = LedgerBook::new();
        ledgers
            .commit(&config, "Bob Ray", "Dish", FIRST_WEEK[0], "9:00AM-12:00PM")
            .unwrap();

        let slot = ShiftSlot::new("Dish", FIRST_WEEK[1], "noon till late");
        let claims = thread(&[("Bob Ray", "Bob Ray")]);

        let result = EligibilityEvaluator::new(&config, &StatementNamesClaimant)
            .resolve(&slot, &claims, &ledgers);
        assert!(matches!(result, Err(EngineError::TimeFormat { .. })));
    }

    #[test]
    fn test_evaluation_does_not_touch_ledgers() {
        let config = config();
        let mut ledgers = LedgerBook::new();
        ledgers
            .commit(&config, "Bob Ray", "Dish", FIRST_WEEK[0], "9:00AM-12:00PM")
            .unwrap();
        let before = ledgers.clone();

        let slot = ShiftSlot::new("Dish", FIRST_WEEK[1], "9:00AM-12:00PM");
        let claims = thread(&[("Alice Kim", "Alice Kim"), ("Bob Ray", "Bob Ray")]);
        let resolution = resolve(&config, &slot, &claims, &ledgers);

        assert_eq!(resolution.winner.as_deref(), Some("Bob Ray"));
        assert_eq!(ledgers, before);
    }
}
