//! Parsing of raw annotation threads.
//!
//! A thread is a run of entries separated by the entry delimiter
//! (`"\n----\n"` by default). Each entry is a statement followed by the
//! field delimiter (`"\n\t-"`) and the claimant's name.

use crate::config::AnnotationFormat;
use crate::models::{AnnotationThread, Claim};

/// Parses raw annotation text into an ordered thread.
///
/// Never fails. An entry that does not split into exactly two parts, or
/// whose claimant part is blank, is kept in place with an unknown claimant.
///
/// # Arguments
///
/// * `raw` - The slot's annotation text, if it has one
/// * `format` - The entry and field delimiters for this schedule
///
/// # Returns
///
/// The claims in authored order, oldest first. `None` or empty text gives
/// an empty thread.
///
/// # Example
///
/// ```
/// use shift_resolver::config::AnnotationFormat;
/// use shift_resolver::models::Claimant;
/// use shift_resolver::resolution::parse_annotation;
///
/// let raw = "Ann Lee can take this\n\t-Ann Lee\n----\nme please\n\t-Bo Chen";
/// let thread = parse_annotation(Some(raw), &AnnotationFormat::default());
///
/// assert_eq!(thread.len(), 2);
/// assert_eq!(thread.claims()[1].claimant, Claimant::Named("Bo Chen".to_string()));
/// ```
pub fn parse_annotation(raw: Option<&str>, format: &AnnotationFormat) -> AnnotationThread {
    let raw = match raw {
        Some(raw) if !raw.is_empty() => raw,
        _ => return AnnotationThread::default(),
    };

    let claims = raw
        .split(format.entry_delimiter.as_str())
        .map(|entry| parse_entry(entry, &format.field_delimiter))
        .collect();

    AnnotationThread::new(claims)
}

fn parse_entry(entry: &str, field_delimiter: &str) -> Claim {
    let parts: Vec<&str> = entry.split(field_delimiter).collect();

    // A stray delimiter inside the statement also lands here as unknown

    match parts.as_slice() {
        [statement, claimant] if !claimant.trim().is_empty() => {
            Claim::named(statement.trim(), claimant.trim())
        }
        _ => Claim::unknown(entry.trim()),
    }
}
