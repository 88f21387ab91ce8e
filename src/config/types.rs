//! Configuration types for shift resolution.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from the YAML files of a scheduling period.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::error::{EngineError, EngineResult};

/// Which of the two final weeks a date key belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinalWeek {
    /// The first final week.
    First,
    /// The second final week.
    Second,
}

impl std::fmt::Display for FinalWeek {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FinalWeek::First => write!(f, "first final week"),
            FinalWeek::Second => write!(f, "second final week"),
        }
    }
}

/// The rule branch an area falls under.
///
/// Holding a primary-area shift is the prerequisite for claiming any
/// secondary-area shift.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AreaClass {
    /// Prerequisite areas (e.g. Dish, Pot Room).
    Primary,
    /// Every other area.
    Secondary,
}

/// Metadata about a scheduling period, loaded from `period.yaml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodMetadata {
    /// Human-readable name of the period.
    pub name: String,
    /// Version label for this configuration.
    pub version: String,
    /// Date keys (exact labels) belonging to the first final week.
    pub first_final_week: Vec<String>,
    /// Date keys (exact labels) belonging to the second final week.
    pub second_final_week: Vec<String>,
}

/// Per-week shift caps for one area class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeekCaps {
    /// Maximum shifts a worker may hold in the first final week.
    pub first_week: u32,
    /// Maximum shifts a worker may hold in the second final week.
    pub second_week: u32,
}

impl WeekCaps {
    /// Returns the cap for the given week.
    pub fn for_week(&self, week: FinalWeek) -> u32 {
        match week {
            FinalWeek::First => self.first_week,
            FinalWeek::Second => self.second_week,
        }
    }
}

impl Default for WeekCaps {
    fn default() -> Self {
        Self {
            first_week: 3,
            second_week: 5,
        }
    }
}

/// Shift caps for both area classes plus an optional flat cap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ShiftCaps {
    /// Caps applied when evaluating primary-area slots.
    #[serde(default)]
    pub primary: WeekCaps,
    /// Caps applied when evaluating secondary-area slots.
    #[serde(default)]
    pub secondary: WeekCaps,
    /// Optional cap on a worker's total shifts regardless of week.
    #[serde(default)]
    pub total: Option<u32>,
}

/// Delimiters used inside a raw annotation thread.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnnotationFormat {
    /// Separates one claim from the next.
    pub entry_delimiter: String,
    /// Separates the statement from the claimant inside a claim.
    pub field_delimiter: String,
}

impl Default for AnnotationFormat {
    fn default() -> Self {
        Self {
            entry_delimiter: "\n----\n".to_string(),
            field_delimiter: "\n\t-".to_string(),
        }
    }
}

/// Which authorship check the engine uses to verify a claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthorshipMode {
    /// The statement text must mention the claimant's name.
    #[default]
    StatementNamesClaimant,
    /// The structured claimant field is trusted as-is.
    ClaimantField,
}

/// Rule configuration loaded from `rules.yaml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RulesConfig {
    /// Areas whose shifts are the prerequisite for all other areas.
    pub primary_areas: Vec<String>,
    /// Weekly and total caps.
    #[serde(default)]
    pub caps: ShiftCaps,
    /// Annotation delimiters.
    #[serde(default)]
    pub annotation: AnnotationFormat,
    /// Authorship verification mode.
    #[serde(default)]
    pub authorship: AuthorshipMode,
}

/// Classifies date keys into the two final weeks by exact string match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeekClassification {
    first: BTreeSet<String>,
    second: BTreeSet<String>,
}

impl WeekClassification {
    /// Builds a classification, rejecting keys listed in both weeks.
    pub fn new<I, J>(first: I, second: J) -> EngineResult<Self>
    where
        I: IntoIterator<Item = String>,
        J: IntoIterator<Item = String>,
    {
        let first: BTreeSet<String> = first.into_iter().collect();
        let second: BTreeSet<String> = second.into_iter().collect();

        if let Some(shared) = first.intersection(&second).next() {
            return Err(EngineError::InvalidConfig {
                field: "second_final_week".to_string(),
                message: format!("date key '{}' is also in first_final_week", shared),
            });
        }

        Ok(Self { first, second })
    }

    /// Returns the final week containing `date_key`, if any.
    pub fn week_of(&self, date_key: &str) -> Option<FinalWeek> {
        if self.first.contains(date_key) {
            Some(FinalWeek::First)
        } else if self.second.contains(date_key) {
            Some(FinalWeek::Second)
        } else {
            None
        }
    }
}

/// The complete configuration for one scheduling period.
///
/// Built from [`PeriodMetadata`] and [`RulesConfig`]; validation happens
/// once here so the engine can trust every lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleConfig {
    metadata: PeriodMetadata,
    weeks: WeekClassification,
    rules: RulesConfig,
}

impl ScheduleConfig {
    /// Creates and validates a schedule configuration.
    pub fn new(metadata: PeriodMetadata, rules: RulesConfig) -> EngineResult<Self> {
        let weeks = WeekClassification::new(
            metadata.first_final_week.iter().cloned(),
            metadata.second_final_week.iter().cloned(),
        )?;

        if rules.annotation.entry_delimiter.is_empty() {
            return Err(EngineError::InvalidConfig {
                field: "annotation.entry_delimiter".to_string(),
                message: "must not be empty".to_string(),
            });
        }
        if rules.annotation.field_delimiter.is_empty() {
            return Err(EngineError::InvalidConfig {
                field: "annotation.field_delimiter".to_string(),
                message: "must not be empty".to_string(),
            });
        }

        Ok(Self {
            metadata,
            weeks,
            rules,
        })
    }

    /// Returns a copy of this configuration with different caps.
    pub fn with_caps(mut self, caps: ShiftCaps) -> Self {
        self.rules.caps = caps;
        self
    }

    /// Returns a copy of this configuration with a different authorship mode.
    pub fn with_authorship(mut self, mode: AuthorshipMode) -> Self {
        self.rules.authorship = mode;
        self
    }

    /// Returns the period metadata.
    pub fn period(&self) -> &PeriodMetadata {
        &self.metadata
    }

    /// Returns the rule configuration.
    pub fn rules(&self) -> &RulesConfig {
        &self.rules
    }

    /// Returns the annotation delimiters.
    pub fn annotation(&self) -> &AnnotationFormat {
        &self.rules.annotation
    }

    /// Returns the final week a date key belongs to.
    pub fn week_of(&self, date_key: &str) -> Option<FinalWeek> {
        self.weeks.week_of(date_key)
    }

    /// Returns the rule branch for an area. Matching is exact.
    pub fn area_class(&self, area: &str) -> AreaClass {
        if self.rules.primary_areas.iter().any(|a| a == area) {
            AreaClass::Primary
        } else {
            AreaClass::Secondary
        }
    }

    /// Returns the weekly cap for an area class in a given week.
    pub fn weekly_cap(&self, class: AreaClass, week: FinalWeek) -> u32 {
        match class {
            AreaClass::Primary => self.rules.caps.primary.for_week(week),
            AreaClass::Secondary => self.rules.caps.secondary.for_week(week),
        }
    }

    /// Returns the flat total cap, if configured.
    pub fn total_cap(&self) -> Option<u32> {
        self.rules.caps.total
    }
}
