//! Flow handler interface and dispatch.
//!
//! Handlers own the conversation on a flow; the engine only picks the flow.
//! The dispatcher degrades to the IVR handler when the chosen flow has no
//! handler or its handler fails.

use async_trait::async_trait;
use sa_core::{Flow, FlowDecision, SaError};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

/// Response produced by a flow handler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowReply {
    pub flow: Flow,
    pub fulfillment_text: String,
    #[serde(default)]
    pub suggestions: Vec<String>,
}

#[async_trait]
pub trait FlowHandler: Send + Sync {
    /// Flow this handler serves.
    fn flow(&self) -> Flow;

    async fn handle(&self, user_id: &str, message: &str, decision: &FlowDecision) -> anyhow::Result<FlowReply>;
}

/// Handler that answers with fixed text and the decision's suggestions.
pub struct ScriptedHandler {
    flow: Flow,
    text: String,
}

impl ScriptedHandler {
    pub fn new(flow: Flow, text: impl Into<String>) -> Self {
        Self { flow, text: text.into() }
    }
}

#[async_trait]
impl FlowHandler for ScriptedHandler {
    fn flow(&self) -> Flow {
        self.flow
    }

    async fn handle(&self, _user_id: &str, _message: &str, decision: &FlowDecision) -> anyhow::Result<FlowReply> {
        Ok(FlowReply {
            flow: self.flow,
            fulfillment_text: self.text.clone(),
            suggestions: decision.recommendations.suggestions.clone(),
        })
    }
}

#[derive(Default)]
pub struct FlowDispatcher {
    handlers: HashMap<Flow, Arc<dyn FlowHandler>>,
}

impl FlowDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler under its own flow, replacing any previous one.
    pub fn register(mut self, handler: Arc<dyn FlowHandler>) -> Self {
        self.handlers.insert(handler.flow(), handler);
        self
    }

    pub fn handler(&self, flow: Flow) -> Option<&Arc<dyn FlowHandler>> {
        self.handlers.get(&flow)
    }

    pub fn flows(&self) -> Vec<Flow> {
        self.handlers.keys().copied().collect()
    }

    /// Run the handler for `decision.flow`, falling back to IVR.
    pub async fn dispatch(&self, user_id: &str, message: &str, decision: &FlowDecision) -> Result<FlowReply, SaError> {
        if decision.flow != Flow::Ivr {
            match self.handlers.get(&decision.flow) {
                Some(h) => match h.handle(user_id, message, decision).await {
                    Ok(reply) => return Ok(reply),
                    Err(e) => {
                        tracing::warn!(flow = %decision.flow, error = %e, "flow handler failed, using IVR");
                    }
                },
                None => {
                    tracing::warn!(flow = %decision.flow, "no handler registered, using IVR");
                }
            }
        }

        let ivr = self
            .handlers
            .get(&Flow::Ivr)
            .ok_or_else(|| SaError::invalid_config("no IVR handler registered"))?;
        ivr.handle(user_id, message, decision).await.map_err(SaError::Other)
    }
}
