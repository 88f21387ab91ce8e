//! Error types for the shift resolution engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for all error conditions that can occur while resolving a schedule.
//! Claim rejections (caps, conflicts, missing prerequisite) are not errors;
//! they are recorded on the decision log instead.

use thiserror::Error;

/// The main error type for the shift resolution engine.
///
/// # Example
///
/// ```
/// use shift_resolver::error::EngineError;
///
/// let error = EngineError::ConfigNotFound {
///     path: "/missing/rules.yaml".to_string(),
/// };
/// assert_eq!(error.to_string(), "Configuration file not found: /missing/rules.yaml");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// Configuration parsed but is internally inconsistent.
    #[error("Invalid configuration field '{field}': {message}")]
    InvalidConfig {
        /// The offending field.
        field: String,
        /// A description of the problem.
        message: String,
    },

    /// A time range did not match `<h>:<mm><am|pm>-<h>:<mm><am|pm>`.
    ///
    /// This signals a broken source record, not a rejected claim.
    #[error("Invalid time range '{value}': {message}")]
    TimeFormat {
        /// The raw time range as supplied.
        value: String,
        /// What was wrong with it.
        message: String,
    },

    /// An existing assignment overlaps a shift the worker already holds on
    /// the same date key.
    #[error("Existing assignment for '{name}' on {date_key} at {time_range} overlaps a shift already held")]
    OverlappingAssignment {
        /// The worker the assignment belongs to.
        name: String,
        /// The assignment's date key.
        date_key: String,
        /// The assignment's raw time range.
        time_range: String,
    },

    /// The slot source failed to produce the next slot.
    #[error("Slot source error: {message}")]
    SlotSource {
        /// A description of the failure.
        message: String,
    },

    /// The decision sink failed to record a decision.
    #[error("Decision sink error: {message}")]
    DecisionSink {
        /// A description of the failure.
        message: String,
    },
}

impl EngineError {
    /// Builds a [`EngineError::TimeFormat`] for the given raw value.
    pub fn time_format(value: impl Into<String>, message: impl Into<String>) -> Self {
        EngineError::TimeFormat {
            value: value.into(),
            message: message.into(),
        }
    }
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
