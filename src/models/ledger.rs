//! Per-worker ledgers tracking shifts taken during a resolution pass.
//!
//! A [`WorkerLedger`] is created lazily the first time a worker wins a slot
//! and is only ever mutated through [`LedgerBook::commit`]. Eligibility
//! checks read ledgers but never write them.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::config::{AreaClass, FinalWeek, ScheduleConfig};
use crate::error::EngineResult;

use super::TimeRange;

/// One shift held by a worker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerShift {
    /// The shift's area.
    pub area: String,
    /// The shift's date key.
    pub date_key: String,
    /// The time range with all whitespace removed.
    pub time_range: String,
    /// Duration of the shift in hours.
    pub hours: Decimal,
}

/// Running record of everything a single worker has been assigned.
///
/// # Invariants
///
/// - `total_shift_count == shifts.len()`
/// - `first_week_count + second_week_count <= total_shift_count`; the
///   difference is shifts whose date key is in neither final week.
/// - No two shifts on the same date key strictly overlap.
/// - `has_primary_shift` never goes back to false.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkerLedger {
    name: String,
    shifts: Vec<LedgerShift>,
    total_shift_count: u32,
    first_week_count: u32,
    second_week_count: u32,
    total_hours: Decimal,
    has_primary_shift: bool,
}

impl WorkerLedger {
    /// Creates an empty ledger for a worker.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            shifts: Vec::new(),
            total_shift_count: 0,
            first_week_count: 0,
            second_week_count: 0,
            total_hours: Decimal::ZERO,
            has_primary_shift: false,
        }
    }

    /// Records a new shift.
    ///
    /// The time range is parsed before anything is changed, so a
    /// malformed range leaves the ledger exactly as it was.
    pub fn add_shift(
        &mut self,
        config: &ScheduleConfig,
        area: &str,
        date_key: &str,
        time_range: &str,
    ) -> EngineResult<()> {
        let hours = Self::shift_hours(time_range)?;

        self.shifts.push(LedgerShift {
            area: area.to_string(),
            date_key: date_key.to_string(),
            time_range: TimeRange::normalize(time_range),
            hours,
        });
        self.total_shift_count += 1;
        match config.week_of(date_key) {
            Some(FinalWeek::First) => self.first_week_count += 1,
            Some(FinalWeek::Second) => self.second_week_count += 1,
            None => {}
        }
        self.total_hours += hours;
        if config.area_class(area) == AreaClass::Primary {
            self.has_primary_shift = true;
        }

        Ok(())
    }

    /// Returns true if a new shift would strictly overlap one already held
    /// on the same date key.
    ///
    /// Fails with [`crate::error::EngineError::TimeFormat`] if either the new
    /// range or a stored range on that date key is malformed.
    pub fn has_conflict(&self, date_key: &str, time_range: &str) -> EngineResult<bool> {
        let candidate = TimeRange::parse(time_range)?;

        for shift in self.shifts.iter().filter(|s| s.date_key == date_key) {
            let existing = TimeRange::parse(&shift.time_range)?;
            if candidate.overlaps(&existing) {
                return Ok(true);
            }
        }

        Ok(false)
    }

    /// Returns the duration in hours of a raw time range.
    ///
    /// # Example
    ///
    /// ```
    /// use shift_resolver::models::WorkerLedger;
    /// use rust_decimal::Decimal;
    ///
    /// let hours = WorkerLedger::shift_hours("11:00PM - 3:00AM").unwrap();
    /// assert_eq!(hours, Decimal::new(4, 0));
    /// ```
    pub fn shift_hours(time_range: &str) -> EngineResult<Decimal> {
        Ok(TimeRange::parse(time_range)?.hours())
    }

    /// Returns the number of shifts held in the given final week.
    pub fn week_count(&self, week: FinalWeek) -> u32 {
        match week {
            FinalWeek::First => self.first_week_count,
            FinalWeek::Second => self.second_week_count,
        }
    }

    /// Returns the worker's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the shifts held, in the order they were assigned.
    pub fn shifts(&self) -> &[LedgerShift] {
        &self.shifts
    }

    /// Returns the total number of shifts held.
    pub fn total_shift_count(&self) -> u32 {
        self.total_shift_count
    }

    /// Returns the number of first-final-week shifts held.
    pub fn first_week_count(&self) -> u32 {
        self.first_week_count
    }

    /// Returns the number of second-final-week shifts held.
    pub fn second_week_count(&self) -> u32 {
        self.second_week_count
    }

    /// Returns the total hours across all shifts.
    pub fn total_hours(&self) -> Decimal {
        self.total_hours
    }

    /// Returns true once the worker holds any primary-area shift.
    pub fn has_primary_shift(&self) -> bool {
        self.has_primary_shift
    }
}

/// All ledgers for one resolution pass, keyed by claimant name.
///
/// Owned by the caller and passed into the pass explicitly, so separate
/// passes never share state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct LedgerBook {
    ledgers: BTreeMap<String, WorkerLedger>,
}

impl LedgerBook {
    /// Creates an empty ledger book.
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks up a worker's ledger by exact name.
    pub fn get(&self, name: &str) -> Option<&WorkerLedger> {
        self.ledgers.get(name)
    }

    /// Records a shift for `name`, creating the ledger on first use.
    ///
    /// On error no ledger is created or changed.
    pub fn commit(
        &mut self,
        config: &ScheduleConfig,
        name: &str,
        area: &str,
        date_key: &str,
        time_range: &str,
    ) -> EngineResult<&WorkerLedger> {
        if let Some(ledger) = self.ledgers.get_mut(name) {
            ledger.add_shift(config, area, date_key, time_range)?;
        } else {
            let mut ledger = WorkerLedger::new(name);
            ledger.add_shift(config, area, date_key, time_range)?;
            self.ledgers.insert(name.to_string(), ledger);
        }

        Ok(&self.ledgers[name])
    }

    /// Returns the number of workers with a ledger.
    pub fn len(&self) -> usize {
        self.ledgers.len()
    }

    /// Returns true if no worker has a ledger yet.
    pub fn is_empty(&self) -> bool {
        self.ledgers.is_empty()
    }

    /// Iterates ledgers in name order.
    pub fn iter(&self) -> impl Iterator<Item = &WorkerLedger> {
        self.ledgers.values()
    }

    /// Consumes the book, returning ledgers in name order.
    pub fn into_ledgers(self) -> Vec<WorkerLedger> {
        self.ledgers.into_values().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{
        AnnotationFormat, AuthorshipMode, PeriodMetadata, RulesConfig, ShiftCaps,
    };
    use crate::error::EngineError;

    fn config() -> ScheduleConfig {
        ScheduleConfig::new(
            PeriodMetadata {
                name: "Test".to_string(),
                version: "test".to_string(),
                first_final_week: vec!["Wed 12/11".to_string(), "Thu 12/12".to_string()],
                second_final_week: vec!["Mon 12/16".to_string()],
            },
            RulesConfig {
                primary_areas: vec!["Dish".to_string(), "Pot Room".to_string()],
                caps: ShiftCaps::default(),
                annotation: AnnotationFormat::default(),
                authorship: AuthorshipMode::default(),
            },
        )
        .unwrap()
    }

    #[test]
    fn test_add_shift_updates_counts_and_hours() {
        let config = config();
        let mut ledger = WorkerLedger::new("Ann Lee");

        ledger
            .add_shift(&config, "Dish", "Wed 12/11", "9:00AM - 12:00PM")
            .unwrap();
        ledger
            .add_shift(&config, "Line", "Mon 12/16", "1:00PM-2:30PM")
            .unwrap();
        ledger
            .add_shift(&config, "Line", "Sunday", "5:00PM-6:00PM")
            .unwrap();

        assert_eq!(ledger.total_shift_count(), 3);
        assert_eq!(ledger.shifts().len(), 3);
        assert_eq!(ledger.first_week_count(), 1);
        assert_eq!(ledger.second_week_count(), 1);
        assert_eq!(ledger.total_hours(), Decimal::new(55, 1));
        assert_eq!(ledger.shifts()[0].time_range, "9:00AM-12:00PM");
    }

    #[test]
    fn test_primary_flag_set_and_sticky() {
        let config = config();
        let mut ledger = WorkerLedger::new("Ann Lee");
        assert!(!ledger.has_primary_shift());

        ledger
            .add_shift(&config, "Sushi", "Wed 12/11", "9:00AM-10:00AM")
            .unwrap();
        assert!(!ledger.has_primary_shift());

        ledger
            .add_shift(&config, "Pot Room", "Wed 12/11", "10:00AM-11:00AM")
            .unwrap();
        assert!(ledger.has_primary_shift());

        ledger
            .add_shift(&config, "Sushi", "Thu 12/12", "9:00AM-10:00AM")
            .unwrap();
        assert!(ledger.has_primary_shift());
    }

    #[test]
    fn test_add_shift_with_bad_range_leaves_ledger_untouched() {
        let config = config();
        let mut ledger = WorkerLedger::new("Ann Lee");
        ledger
            .add_shift(&config, "Dish", "Wed 12/11", "9:00AM-12:00PM")
            .unwrap();
        let before = ledger.clone();

        let result = ledger.add_shift(&config, "Dish", "Thu 12/12", "morning");
        assert!(matches!(result, Err(EngineError::TimeFormat { .. })));
        assert_eq!(ledger, before);
    }

    #[test]
    fn test_conflict_only_on_same_date_key() {
        let config = config();
        let mut ledger = WorkerLedger::new("Ann Lee");
        ledger
            .add_shift(&config, "Dish", "Wed 12/11", "9:00AM-12:30PM")
            .unwrap();

        assert!(ledger.has_conflict("Wed 12/11", "12:00PM-2:00PM").unwrap());
        assert!(!ledger.has_conflict("Thu 12/12", "12:00PM-2:00PM").unwrap());
    }

    #[test]
    fn test_back_to_back_is_not_a_conflict() {
        let config = config();
        let mut ledger = WorkerLedger::new("Ann Lee");
        ledger
            .add_shift(&config, "Dish", "Wed 12/11", "9:00AM-12:00PM")
            .unwrap();

        assert!(!ledger.has_conflict("Wed 12/11", "12:00PM-2:00PM").unwrap());
        assert!(!ledger.has_conflict("Wed 12/11", "7:00AM - 9:00AM").unwrap());
    }

    #[test]
    fn test_conflict_with_malformed_candidate_is_error() {
        let ledger = WorkerLedger::new("Ann Lee");
        assert!(matches!(
            ledger.has_conflict("Wed 12/11", "all day"),
            Err(EngineError::TimeFormat { .. })
        ));
    }

    #[test]
    fn test_shift_hours_wraps_midnight() {
        assert_eq!(
            WorkerLedger::shift_hours("9:00PM-1:00AM").unwrap(),
            Decimal::new(4, 0)
        );
        assert_eq!(
            WorkerLedger::shift_hours("8:30AM-12:00PM").unwrap(),
            Decimal::new(35, 1)
        );
    }

    #[test]
    fn test_ledger_book_creates_lazily() {
        let config = config();
        let mut book = LedgerBook::new();
        assert!(book.get("Ann Lee").is_none());

        let ledger = book
            .commit(&config, "Ann Lee", "Dish", "Wed 12/11", "9:00AM-12:00PM")
            .unwrap();
        assert_eq!(ledger.total_shift_count(), 1);

        book.commit(&config, "Ann Lee", "Line", "Wed 12/11", "1:00PM-3:00PM")
            .unwrap();
        assert_eq!(book.len(), 1);
        assert_eq!(book.get("Ann Lee").unwrap().total_shift_count(), 2);
        assert!(book.get("ann lee").is_none());
    }

    #[test]
    fn test_failed_commit_creates_no_ledger() {
        let config = config();
        let mut book = LedgerBook::new();

        let result = book.commit(&config, "Ann Lee", "Dish", "Wed 12/11", "9-5");
        assert!(result.is_err());
        assert!(book.is_empty());
    }

    #[test]
    fn test_into_ledgers_sorted_by_name() {
        let config = config();
        let mut book = LedgerBook::new();
        book.commit(&config, "Zed", "Dish", "Wed 12/11", "9:00AM-10:00AM")
            .unwrap();
        book.commit(&config, "Amy", "Dish", "Wed 12/11", "9:00AM-10:00AM")
            .unwrap();

        let names: Vec<String> = book
            .into_ledgers()
            .into_iter()
            .map(|l| l.name().to_string())
            .collect();
        assert_eq!(names, vec!["Amy", "Zed"]);
    }
}
