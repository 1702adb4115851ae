//! Escalation ticket seeding for human handoff.

use chrono::{DateTime, Utc};
use sa_core::{Flow, FlowDecision};
use sa_session::ConversationSession;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
    Critical,
}

impl Priority {
    pub fn from_score(score: u32) -> Self {
        match score {
            s if s >= 7 => Priority::Critical,
            s if s >= 5 => Priority::High,
            s if s >= 3 => Priority::Medium,
            _ => Priority::Low,
        }
    }

    /// Target time to first agent response.
    pub fn response_time(&self) -> &'static str {
        match self {
            Priority::Critical => "15 minutes",
            Priority::High => "1 hour",
            Priority::Medium => "4 hours",
            Priority::Low => "24 hours",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
            Priority::Critical => "critical",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentType {
    General,
    Senior,
    Billing,
    Technical,
}

const BILLING_TERMS: [&str; 3] = ["payment", "billing", "refund"];
const TECHNICAL_TERMS: [&str; 3] = ["technical", "bug", "error"];

impl AgentType {
    /// Specialist wording in the message wins over seniority by score.
    pub fn recommend(message: &str, priority: Priority) -> Self {
        let lowered = message.to_lowercase();
        if BILLING_TERMS.iter().any(|t| lowered.contains(t)) {
            AgentType::Billing
        } else if TECHNICAL_TERMS.iter().any(|t| lowered.contains(t)) {
            AgentType::Technical
        } else if priority >= Priority::High {
            AgentType::Senior
        } else {
            AgentType::General
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Complexity {
    Simple,
    Moderate,
    Complex,
}

impl Complexity {
    pub fn from_turns(turns: u64) -> Self {
        if turns > 10 {
            Complexity::Complex
        } else if turns > 5 {
            Complexity::Moderate
        } else {
            Complexity::Simple
        }
    }
}

/// Payload handed to the ticketing side when a turn escalates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EscalationTicket {
    pub ticket_id: Uuid,
    pub user_id: String,
    pub message: String,
    pub flow: Flow,
    pub priority: Priority,
    pub recommended_agent: AgentType,
    pub estimated_response_time: String,
    pub conversation_complexity: Complexity,
    pub reasons: Vec<String>,
    /// Negative lexicon hits in the escalating message.
    pub detected_emotions: Vec<String>,
    pub sentiment_score: f64,
    pub escalation_score: u32,
    pub created_at: DateTime<Utc>,
}

impl EscalationTicket {
    pub fn seed(user_id: &str, message: &str, decision: &FlowDecision, session: Option<&ConversationSession>) -> Self {
        let priority = Priority::from_score(decision.escalation_score);
        let turns = session.map(|s| s.total_turns).unwrap_or(0);
        Self {
            ticket_id: Uuid::new_v4(),
            user_id: user_id.to_string(),
            message: message.to_string(),
            flow: decision.flow,
            priority,
            recommended_agent: AgentType::recommend(message, priority),
            estimated_response_time: priority.response_time().to_string(),
            conversation_complexity: Complexity::from_turns(turns),
            reasons: decision.reasons.clone(),
            detected_emotions: decision.sentiment.matched_negative_terms.iter().cloned().collect(),
            sentiment_score: decision.sentiment.score,
            escalation_score: decision.escalation_score,
            created_at: Utc::now(),
        }
    }
}
