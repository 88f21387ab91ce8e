//! HTTP API module for the shift resolution engine.
//!
//! This module exposes a single resolution pass over HTTP: the caller posts
//! the slots to resolve and gets back the decisions and final ledgers.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::{create_router, resolve_request};
pub use request::{ExistingAssignmentRequest, ResolutionRequest, SlotRequest};
pub use response::{ApiError, ApiErrorResponse, ResolutionResponse};
pub use state::AppState;
