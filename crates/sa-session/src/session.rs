use chrono::{DateTime, Utc};
use sa_core::{Intent, SentimentCategory};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;

/// One analysed user message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Turn {
    pub text: String,
    pub sentiment: SentimentCategory,
    pub intent: Intent,
    pub timestamp: DateTime<Utc>,
}

impl Turn {
    pub fn new(text: impl Into<String>, sentiment: SentimentCategory, intent: Intent) -> Self {
        Self {
            text: text.into(),
            sentiment,
            intent,
            timestamp: Utc::now(),
        }
    }
}

/// Per-user conversation state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationSession {
    pub user_id: String,
    /// Most recent turns, oldest first.
    pub messages: VecDeque<Turn>,
    pub failure_count: u32,
    pub last_intent: Option<Intent>,
    pub last_sentiment: SentimentCategory,
    /// Latched by an escalated turn; only a reset clears it.
    pub escalated: bool,
    /// Turns recorded over the session's lifetime, including trimmed ones.
    pub total_turns: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ConversationSession {
    pub fn new(user_id: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            user_id: user_id.into(),
            messages: VecDeque::new(),
            failure_count: 0,
            last_intent: None,
            last_sentiment: SentimentCategory::Neutral,
            escalated: false,
            total_turns: 0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Append a turn, dropping the oldest ones beyond `history_limit`.
    pub fn record_turn(&mut self, turn: Turn, history_limit: usize) {
        self.last_intent = Some(turn.intent);
        self.last_sentiment = turn.sentiment;
        self.total_turns += 1;
        self.updated_at = turn.timestamp;
        self.messages.push_back(turn);
        while self.messages.len() > history_limit.max(1) {
            self.messages.pop_front();
        }
    }

    pub fn record_failure(&mut self) {
        self.failure_count = self.failure_count.saturating_add(1);
        self.updated_at = Utc::now();
    }

    pub fn mark_escalated(&mut self) {
        self.escalated = true;
        self.updated_at = Utc::now();
    }

    pub fn message_count(&self) -> usize {
        self.messages.len()
    }

    pub fn last_turn(&self) -> Option<&Turn> {
        self.messages.back()
    }
}

impl fmt::Display for ConversationSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ConversationSession(user={}, turns={}, failures={}, escalated={})",
            self.user_id, self.total_turns, self.failure_count, self.escalated
        )
    }
}
