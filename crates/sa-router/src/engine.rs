//! Flow decision engine.
//!
//! One call per chat turn: analyse the message (unless the caller already
//! did), score escalation signals against the user's session, pick a flow,
//! then record the turn. Signal scoring and the session update happen under
//! the user's session lock, so concurrent turns for one user never read a
//! stale failure count. Analysis runs before the lock is taken.

use crate::selector::{recommendations_for, select_flow};
use crate::signals::{evaluate_signals, SignalInput};
use sa_core::{
    AssistantConfig, DecisionContext, Flow, FlowDecision, IntentResult, RoutingConfig, SentimentCategory,
    SentimentResult,
};
use sa_nlu::NluPipeline;
use sa_session::{ConversationSession, InMemorySessionStore, SessionStore, Turn};
use std::sync::Arc;

pub struct FlowDecisionEngine<S: SessionStore = InMemorySessionStore> {
    routing: Arc<RoutingConfig>,
    nlu: NluPipeline,
    sessions: Arc<S>,
}

impl FlowDecisionEngine<InMemorySessionStore> {
    /// Engine with an in-memory session store sized from `config.session`.
    pub fn from_config(config: &AssistantConfig) -> sa_core::Result<Self> {
        let nlu = NluPipeline::from_config(&config.nlu)?;
        let sessions = Arc::new(InMemorySessionStore::with_history_limit(config.session.history_limit));
        Ok(Self::with_parts(config.routing.clone(), nlu, sessions))
    }
}

impl Default for FlowDecisionEngine<InMemorySessionStore> {
    fn default() -> Self {
        Self::with_parts(RoutingConfig::default(), NluPipeline::default(), Arc::new(InMemorySessionStore::new()))
    }
}

impl<S: SessionStore> FlowDecisionEngine<S> {
    pub fn with_parts(routing: RoutingConfig, nlu: NluPipeline, sessions: Arc<S>) -> Self {
        Self { routing: Arc::new(routing), nlu, sessions }
    }

    pub fn routing(&self) -> &RoutingConfig {
        &self.routing
    }

    pub fn nlu(&self) -> &NluPipeline {
        &self.nlu
    }

    pub fn sessions(&self) -> &Arc<S> {
        &self.sessions
    }

    /// Decide the flow for one turn. Never fails; pass `""` for a missing message.
    ///
    /// Sentiment and intent hints in `context` replace the corresponding
    /// analysis; anything missing is computed by the NLU pipeline.
    pub async fn decide(&self, user_id: &str, message: &str, context: &DecisionContext) -> FlowDecision {
        let (sentiment, intent) = match (&context.sentiment, &context.intent) {
            (Some(s), Some(i)) => (s.clone(), i.clone()),
            (Some(s), None) => (s.clone(), self.nlu.intent(message).await),
            (None, Some(i)) => (self.nlu.sentiment(message).await, i.clone()),
            (None, None) => self.nlu.analyze(message).await,
        };
        self.decide_analyzed(user_id, message, context, sentiment, intent)
    }

    /// Score, route and record a turn whose analysis is already known.
    pub fn decide_analyzed(
        &self,
        user_id: &str,
        message: &str,
        context: &DecisionContext,
        sentiment: SentimentResult,
        intent: IntentResult,
    ) -> FlowDecision {
        let routing = &self.routing;
        let history_limit = self.sessions.history_limit();

        let decision = self.sessions.with_session(user_id, |session| {
            let scored = evaluate_signals(
                &SignalInput {
                    message,
                    original_message: context.original_message.as_deref(),
                    sentiment: &sentiment,
                    intent: &intent,
                    prior_failures: session.failure_count,
                },
                routing,
            );

            let should_escalate = scored.score >= routing.thresholds.escalation_score;
            let flow = select_flow(should_escalate, intent.intent);
            let success = intent.is_high_confidence && sentiment.category != SentimentCategory::Negative;

            session.record_turn(Turn::new(message, sentiment.category, intent.intent), history_limit);
            if flow == Flow::Ava {
                session.mark_escalated();
            }
            if !success {
                session.record_failure();
            }

            FlowDecision {
                flow,
                should_escalate,
                escalation_score: scored.score,
                reasons: scored.reasons(),
                confidence: escalation_confidence(scored.score, routing.thresholds.confidence_divisor),
                success,
                recommendations: recommendations_for(flow),
                sentiment,
                intent,
            }
        });

        if decision.should_escalate {
            tracing::info!(
                user_id,
                score = decision.escalation_score,
                reason = %decision.reason(),
                "escalating to assisted flow"
            );
        } else {
            tracing::debug!(
                user_id,
                flow = %decision.flow,
                intent = %decision.intent.intent,
                sentiment = %decision.sentiment.category,
                score = decision.escalation_score,
                "flow decided"
            );
        }
        decision
    }

    /// Snapshot of a user's session, if one exists.
    pub fn session(&self, user_id: &str) -> Option<ConversationSession> {
        self.sessions.get(user_id)
    }

    /// Forget a user's session. Returns whether one existed.
    pub fn reset_session(&self, user_id: &str) -> bool {
        self.sessions.reset(user_id)
    }
}

/// `score / divisor`, capped at 1.
pub fn escalation_confidence(score: u32, divisor: f64) -> f64 {
    if divisor > 0.0 {
        (score as f64 / divisor).clamp(0.0, 1.0)
    } else if score > 0 {
        1.0
    } else {
        0.0
    }
}
