//! Assistant configuration: lexicons, intent table, escalation weights and thresholds.

use crate::error::{Result, SaError};
use crate::types::Intent;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Escalation score at or above which a turn is escalated.
pub const ESCALATION_THRESHOLD: u32 = 3;
/// Sentiment score strictly below this adds the negative-sentiment weight.
pub const NEGATIVE_SENTIMENT_THRESHOLD: f64 = -0.3;
/// Failure count at or above this adds the repeated-failure weight.
pub const FAILURE_COUNT_THRESHOLD: u32 = 2;
/// `confidence = min(escalation_score / CONFIDENCE_DIVISOR, 1.0)`.
pub const CONFIDENCE_DIVISOR: f64 = 5.0;
pub const DEFAULT_HISTORY_LIMIT: usize = 50;
pub const DEFAULT_REMOTE_TIMEOUT_MS: u64 = 3000;
pub const DEFAULT_SENTIMENT_GAIN: f64 = 2.0;
pub const DEFAULT_ORDER_REFERENCE_PATTERN: &str = r"\bord[-#]?\d+";

fn s(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AssistantConfig {
    pub server: ServerConfig,
    pub nlu: NluConfig,
    pub routing: RoutingConfig,
    pub session: SessionConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: "0.0.0.0".into(), port: 8080 }
    }
}

/// Word lists for the lexicon sentiment scorer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SentimentLexicon {
    pub positive: Vec<String>,
    pub negative: Vec<String>,
    pub complaint: Vec<String>,
    /// Multiplier applied to the per-token polarity balance before clamping.
    pub gain: f64,
}

impl Default for SentimentLexicon {
    fn default() -> Self {
        Self {
            positive: s(&[
                "good", "great", "excellent", "amazing", "love", "awesome", "perfect",
                "happy", "satisfied", "recommend", "thanks", "thank", "wonderful", "nice",
            ]),
            negative: s(&[
                "bad", "terrible", "awful", "hate", "horrible", "worst", "disappointed",
                "angry", "frustrated", "complain", "problem", "issue", "wrong", "broken",
                "defective", "useless", "annoyed", "late", "damaged",
            ]),
            complaint: s(&[
                "refund", "return", "cancel", "complaint", "dispute", "fraud", "scam",
                "cheat", "sue", "legal",
            ]),
            gain: DEFAULT_SENTIMENT_GAIN,
        }
    }
}

/// Keyword list for one intent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntentKeywords {
    pub intent: Intent,
    pub keywords: Vec<String>,
}

fn default_intent_table() -> Vec<IntentKeywords> {
    let table: [(Intent, &[&str]); 6] = [
        (Intent::OrderTracking, &["track", "order", "status", "where", "delivery", "shipped"]),
        (Intent::ProductSearch, &["show", "find", "search", "looking", "want", "need", "buy"]),
        (Intent::Complaint, &["complain", "problem", "issue", "wrong", "bad", "terrible", "refund", "return"]),
        (Intent::Recommendation, &["recommend", "suggest", "best", "top", "good"]),
        (Intent::Greeting, &["hello", "hi", "hey", "good morning", "good evening"]),
        (Intent::Help, &["help", "assist", "support", "what can you do"]),
    ];
    table
        .iter()
        .map(|(intent, kws)| IntentKeywords { intent: *intent, keywords: s(kws) })
        .collect()
}

/// Optional remote NLU service.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteNluConfig {
    pub base_url: String,
    pub timeout_ms: u64,
    pub sentiment: bool,
    pub intent: bool,
}

impl Default for RemoteNluConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5001".into(),
            timeout_ms: DEFAULT_REMOTE_TIMEOUT_MS,
            sentiment: true,
            intent: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NluConfig {
    pub sentiment: SentimentLexicon,
    pub intents: Vec<IntentKeywords>,
    /// Regex matched against lowercased text; a hit counts as one order-tracking keyword.
    pub order_reference_pattern: Option<String>,
    pub remote: Option<RemoteNluConfig>,
}

impl Default for NluConfig {
    fn default() -> Self {
        Self {
            sentiment: SentimentLexicon::default(),
            intents: default_intent_table(),
            order_reference_pattern: Some(DEFAULT_ORDER_REFERENCE_PATTERN.to_string()),
            remote: None,
        }
    }
}

/// Additive weight per escalation signal.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SignalWeights {
    pub negative_sentiment: u32,
    pub complaint_indicator: u32,
    pub repeated_failure: u32,
    pub complaint_intent: u32,
    pub escalation_keyword: u32,
    pub negative_order_tracking: u32,
}

impl Default for SignalWeights {
    fn default() -> Self {
        Self {
            negative_sentiment: 3,
            complaint_indicator: 2,
            repeated_failure: 2,
            complaint_intent: 3,
            escalation_keyword: 4,
            negative_order_tracking: 2,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EscalationThresholds {
    pub negative_sentiment_score: f64,
    pub failure_count: u32,
    pub escalation_score: u32,
    pub confidence_divisor: f64,
}

impl Default for EscalationThresholds {
    fn default() -> Self {
        Self {
            negative_sentiment_score: NEGATIVE_SENTIMENT_THRESHOLD,
            failure_count: FAILURE_COUNT_THRESHOLD,
            escalation_score: ESCALATION_THRESHOLD,
            confidence_divisor: CONFIDENCE_DIVISOR,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RoutingConfig {
    pub weights: SignalWeights,
    pub thresholds: EscalationThresholds,
    pub escalation_keywords: Vec<String>,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            weights: SignalWeights::default(),
            thresholds: EscalationThresholds::default(),
            escalation_keywords: s(&["manager", "supervisor", "human", "agent", "speak to someone"]),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Turns kept per session; older turns are dropped first.
    pub history_limit: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self { history_limit: DEFAULT_HISTORY_LIMIT }
    }
}

impl AssistantConfig {
    /// Read a JSON config file and validate it.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)?;
        let config: AssistantConfig = serde_json::from_str(&raw)?;
        config.validate()?;
        tracing::info!(path = %path.display(), "loaded assistant config");
        Ok(config)
    }

    /// Reject configurations that would make every turn meaningless.
    pub fn validate(&self) -> Result<()> {
        let lex = &self.nlu.sentiment;
        if lex.positive.is_empty() || lex.negative.is_empty() {
            return Err(SaError::invalid_config("sentiment lexicon needs positive and negative words"));
        }
        if lex.complaint.is_empty() {
            return Err(SaError::invalid_config("complaint indicator list is empty"));
        }
        if !(lex.gain.is_finite() && lex.gain > 0.0) {
            return Err(SaError::invalid_config(format!("sentiment gain must be positive, got {}", lex.gain)));
        }
        for intent in Intent::CLASSIFIABLE {
            match self.nlu.intents.iter().find(|e| e.intent == intent) {
                None => return Err(SaError::invalid_config(format!("intent table is missing {intent}"))),
                Some(e) if e.keywords.iter().all(|k| k.trim().is_empty()) => {
                    return Err(SaError::invalid_config(format!("intent {intent} has no keywords")))
                }
                _ => {}
            }
        }
        if self.nlu.intents.iter().any(|e| e.intent == Intent::Unknown) {
            return Err(SaError::invalid_config("unknown is the fallback intent and takes no keywords"));
        }
        if let Some(remote) = &self.nlu.remote {
            if remote.base_url.trim().is_empty() {
                return Err(SaError::invalid_config("remote NLU base_url is empty"));
            }
            if remote.timeout_ms == 0 {
                return Err(SaError::invalid_config("remote NLU timeout must be non-zero"));
            }
        }
        if self.routing.escalation_keywords.iter().all(|k| k.trim().is_empty()) {
            return Err(SaError::invalid_config("escalation keyword list is empty"));
        }
        if !(self.routing.thresholds.confidence_divisor > 0.0) {
            return Err(SaError::invalid_config("confidence divisor must be positive"));
        }
        if self.session.history_limit == 0 {
            return Err(SaError::invalid_config("session history limit must be at least 1"));
        }
        Ok(())
    }
}

/// The default config instance.
pub static DEFAULT_CONFIG: std::sync::LazyLock<AssistantConfig> = std::sync::LazyLock::new(AssistantConfig::default);
