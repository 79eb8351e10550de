//! Application state

use postclose_engine::PostCloseEngine;

/// Shared state: one engine reused across requests. The engine is pure
/// and synchronous, so no coordination is needed.
pub struct AppState {
    pub engine: PostCloseEngine,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            engine: PostCloseEngine::new(),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
