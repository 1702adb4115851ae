//! Flow decision engine: escalation scoring, flow routing, handoff tickets
//! and the flow handler interface.

pub mod signals;
pub mod selector;
pub mod engine;
pub mod handoff;
pub mod handler;

pub use signals::{evaluate_signals, EscalationScore, Signal, SignalInput};
pub use selector::{recommendations_for, select_flow};
pub use engine::FlowDecisionEngine;
pub use handoff::{AgentType, Complexity, EscalationTicket, Priority};
pub use handler::{FlowDispatcher, FlowHandler, FlowReply, ScriptedHandler};
