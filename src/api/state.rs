//! Application state for the resolution API.

use std::sync::Arc;

use crate::resolution::ResolutionEngine;

/// Shared application state.
///
/// The engine is immutable; every request builds its own ledger book.
#[derive(Clone)]
pub struct AppState {
    engine: Arc<ResolutionEngine>,
}

impl AppState {
    /// Creates a new application state around an engine.
    pub fn new(engine: ResolutionEngine) -> Self {
        Self {
            engine: Arc::new(engine),
        }
    }

    /// Returns a reference to the engine.
    pub fn engine(&self) -> &ResolutionEngine {
        &self.engine
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_state_is_clone() {
        fn assert_clone<T: Clone + Send + Sync + 'static>() {}
        assert_clone::<AppState>();
    }
}
