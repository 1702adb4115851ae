//! Application state shared across all handlers.

use sa_core::AssistantConfig;
use sa_router::FlowDecisionEngine;
use std::sync::Arc;
use std::time::Instant;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<FlowDecisionEngine>,
    pub start_time: Instant,
}

impl AppState {
    pub fn new() -> Self {
        Self::with_engine(FlowDecisionEngine::default())
    }

    pub fn from_config(config: &AssistantConfig) -> sa_core::Result<Self> {
        Ok(Self::with_engine(FlowDecisionEngine::from_config(config)?))
    }

    pub fn with_engine(engine: FlowDecisionEngine) -> Self {
        Self { engine: Arc::new(engine), start_time: Instant::now() }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
