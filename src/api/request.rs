//! Request types for the resolution API.
//!
//! This module defines the JSON request structures for the `/resolve` endpoint.

use serde::{Deserialize, Serialize};

use crate::models::{ExistingAssignment, ShiftSlot};

/// Request body for the `/resolve` endpoint.
///
/// Slots are resolved in the order given.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolutionRequest {
    /// The open slots, in presentation order.
    pub slots: Vec<SlotRequest>,
    /// Shifts already held before this pass.
    #[serde(default)]
    pub existing_assignments: Vec<ExistingAssignmentRequest>,
}

/// One open slot in a resolution request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlotRequest {
    /// The work area (e.g. "Dish").
    pub area: String,
    /// Opaque date label; must match the period's final-week keys to count
    /// toward a weekly cap.
    pub date_key: String,
    /// Raw time range such as "9:00AM-12:00PM".
    pub time_range: String,
    /// Raw annotation thread, if any.
    #[serde(default)]
    pub annotation: Option<String>,
    /// Where the slot lives in the source schedule.
    #[serde(default)]
    pub cell_ref: Option<String>,
}

/// A shift already held by a worker.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExistingAssignmentRequest {
    /// The worker's full name.
    pub name: String,
    /// The work area.
    pub area: String,
    /// The date key.
    pub date_key: String,
    /// The raw time range.
    pub time_range: String,
}

impl From<SlotRequest> for ShiftSlot {
    fn from(req: SlotRequest) -> Self {
        ShiftSlot {
            area: req.area,
            date_key: req.date_key,
            time_range: req.time_range,
            annotation: req.annotation,
            cell_ref: req.cell_ref,
        }
    }
}

impl From<ExistingAssignmentRequest> for ExistingAssignment {
    fn from(req: ExistingAssignmentRequest) -> Self {
        ExistingAssignment {
            name: req.name,
            area: req.area,
            date_key: req.date_key,
            time_range: req.time_range,
        }
    }
}
