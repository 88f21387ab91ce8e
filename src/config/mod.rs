//! Configuration loading and management for the shift resolution engine.
//!
//! A scheduling period is described by YAML files: which date keys make up
//! each final week, which areas are primary, the shift caps, and how raw
//! annotation threads are delimited.
//!
//! # Example
//!
//! ```no_run
//! use shift_resolver::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/worcester_finals_2024").unwrap();
//! println!("Loaded period: {}", config.period().name);
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{
    AnnotationFormat, AreaClass, AuthorshipMode, FinalWeek, PeriodMetadata, RulesConfig,
    ScheduleConfig, ShiftCaps, WeekCaps, WeekClassification,
};
