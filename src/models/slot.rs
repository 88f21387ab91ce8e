//! Shift slot and annotation thread types.
//!
//! A [`ShiftSlot`] is one open row of a schedule: the area it belongs to,
//! the date key inherited from the header above it, its time range, and
//! the raw annotation text left by volunteers.

use serde::{Deserialize, Serialize};

/// The author recorded on a claim.
///
/// A claim whose entry could not be split into statement and claimant is
/// tagged [`Claimant::Unknown`]; it keeps its position in the thread but can
/// never win a slot.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Claimant {
    /// A named claimant, exactly as authored (case-sensitive).
    Named(String),
    /// The entry was malformed.
    Unknown,
}

impl Claimant {
    /// Returns the claimant's name, or `None` for [`Claimant::Unknown`].
    pub fn name(&self) -> Option<&str> {
        match self {
            Claimant::Named(name) => Some(name),
            Claimant::Unknown => None,
        }
    }
}

impl std::fmt::Display for Claimant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Claimant::Named(name) => write!(f, "{}", name),
            Claimant::Unknown => write!(f, "Unknown"),
        }
    }
}

/// A single (statement, claimant) pair inside an annotation thread.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claim {
    /// The free-text statement, trimmed.
    pub statement: String,
    /// Who left the statement.
    pub claimant: Claimant,
}

impl Claim {
    /// Creates a claim by a named claimant.
    pub fn named(statement: impl Into<String>, claimant: impl Into<String>) -> Self {
        Self {
            statement: statement.into(),
            claimant: Claimant::Named(claimant.into()),
        }
    }

    /// Creates a claim whose author could not be determined.
    pub fn unknown(statement: impl Into<String>) -> Self {
        Self {
            statement: statement.into(),
            claimant: Claimant::Unknown,
        }
    }
}

/// Ordered claims on one slot, oldest first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnnotationThread {
    claims: Vec<Claim>,
}

impl AnnotationThread {
    /// Creates a thread from claims in authored order.
    pub fn new(claims: Vec<Claim>) -> Self {
        Self { claims }
    }

    /// Returns the claims, oldest first.
    pub fn claims(&self) -> &[Claim] {
        &self.claims
    }

    /// Returns the number of claims, including malformed ones.
    pub fn len(&self) -> usize {
        self.claims.len()
    }

    /// Returns true if the thread holds no claims.
    pub fn is_empty(&self) -> bool {
        self.claims.is_empty()
    }

    /// Iterates newest first, yielding each claim with its authored index.
    pub fn newest_first(&self) -> impl Iterator<Item = (usize, &Claim)> {
        self.claims.iter().enumerate().rev()
    }
}

/// One open shift row handed to the engine by a slot source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftSlot {
    /// The area (sheet) this slot belongs to, e.g. "Dish".
    pub area: String,
    /// The date key from the most recent header row above the slot.
    pub date_key: String,
    /// The raw time range, e.g. "9:00AM - 12:00PM".
    pub time_range: String,
    /// Raw annotation thread text, if the slot carries one.
    #[serde(default)]
    pub annotation: Option<String>,
    /// Where the slot lives in the source document, e.g. "Dish!C14".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cell_ref: Option<String>,
}

impl ShiftSlot {
    /// Creates a slot with no annotation.
    pub fn new(
        area: impl Into<String>,
        date_key: impl Into<String>,
        time_range: impl Into<String>,
    ) -> Self {
        Self {
            area: area.into(),
            date_key: date_key.into(),
            time_range: time_range.into(),
            annotation: None,
            cell_ref: None,
        }
    }

    /// Sets the raw annotation text.
    pub fn with_annotation(mut self, raw: impl Into<String>) -> Self {
        self.annotation = Some(raw.into());
        self
    }

    /// Sets the source cell reference.
    pub fn with_cell_ref(mut self, cell_ref: impl Into<String>) -> Self {
        self.cell_ref = Some(cell_ref.into());
        self
    }

    /// Returns the slot's identity without its annotation.
    pub fn key(&self) -> SlotKey {
        SlotKey {
            area: self.area.clone(),
            date_key: self.date_key.clone(),
            time_range: self.time_range.clone(),
            cell_ref: self.cell_ref.clone(),
        }
    }
}

/// Identifies a slot in decisions, failures and log lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotKey {
    /// The slot's area.
    pub area: String,
    /// The slot's date key.
    pub date_key: String,
    /// The slot's raw time range.
    pub time_range: String,
    /// The source cell reference, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cell_ref: Option<String>,
}

impl std::fmt::Display for SlotKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} {}", self.area, self.date_key, self.time_range)?;
        if let Some(cell_ref) = &self.cell_ref {
            write!(f, " ({})", cell_ref)?;
        }
        Ok(())
    }
}

/// A shift already held before the pass starts (a row filled in by hand).
///
/// Existing assignments are committed to the ledgers before any slot is
/// evaluated so they count toward caps, conflicts and the prerequisite.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExistingAssignment {
    /// The worker holding the shift.
    pub name: String,
    /// The shift's area.
    pub area: String,
    /// The shift's date key.
    pub date_key: String,
    /// The shift's time range.
    pub time_range: String,
}
