use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Scores above this are positive.
pub const POSITIVE_SENTIMENT_CUTOFF: f64 = 0.1;
/// Scores below this are negative.
pub const NEGATIVE_SENTIMENT_CUTOFF: f64 = -0.1;
/// Intent confidence strictly above this counts as understood.
pub const HIGH_CONFIDENCE_CUTOFF: f64 = 0.3;

/// Where an analysis result came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisSource {
    #[default]
    Local,
    Remote,
    Upstream,
}

/// Sentiment polarity bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentCategory {
    Positive,
    #[default]
    Neutral,
    Negative,
}

impl SentimentCategory {
    pub fn from_score(score: f64) -> Self {
        if score > POSITIVE_SENTIMENT_CUTOFF {
            SentimentCategory::Positive
        } else if score < NEGATIVE_SENTIMENT_CUTOFF {
            SentimentCategory::Negative
        } else {
            SentimentCategory::Neutral
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SentimentCategory::Positive => "positive",
            SentimentCategory::Neutral => "neutral",
            SentimentCategory::Negative => "negative",
        }
    }
}

impl fmt::Display for SentimentCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of scoring one message.
///
/// `category` and `is_complaint` are derived from `score` and
/// `complaint_intensity`; deserialization recomputes them so an upstream
/// payload cannot carry an inconsistent pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "SentimentWire")]
pub struct SentimentResult {
    pub score: f64,
    pub category: SentimentCategory,
    pub is_complaint: bool,
    pub complaint_intensity: u32,
    pub matched_positive_terms: BTreeSet<String>,
    pub matched_negative_terms: BTreeSet<String>,
    pub matched_complaint_terms: BTreeSet<String>,
    pub source: AnalysisSource,
}

#[derive(Deserialize)]
struct SentimentWire {
    score: f64,
    #[serde(default)]
    complaint_intensity: u32,
    #[serde(default)]
    matched_positive_terms: BTreeSet<String>,
    #[serde(default)]
    matched_negative_terms: BTreeSet<String>,
    #[serde(default)]
    matched_complaint_terms: BTreeSet<String>,
    #[serde(default = "upstream_source")]
    source: AnalysisSource,
}

fn upstream_source() -> AnalysisSource {
    AnalysisSource::Upstream
}

impl From<SentimentWire> for SentimentResult {
    fn from(w: SentimentWire) -> Self {
        let mut r = SentimentResult::new(w.score, w.complaint_intensity, w.source);
        r.matched_positive_terms = w.matched_positive_terms;
        r.matched_negative_terms = w.matched_negative_terms;
        r.matched_complaint_terms = w.matched_complaint_terms;
        r
    }
}

impl SentimentResult {
    /// Build a result, deriving `category` and `is_complaint`.
    pub fn new(score: f64, complaint_intensity: u32, source: AnalysisSource) -> Self {
        let score = if score.is_finite() { score.clamp(-1.0, 1.0) } else { 0.0 };
        Self {
            score,
            category: SentimentCategory::from_score(score),
            is_complaint: complaint_intensity > 0,
            complaint_intensity,
            matched_positive_terms: BTreeSet::new(),
            matched_negative_terms: BTreeSet::new(),
            matched_complaint_terms: BTreeSet::new(),
            source,
        }
    }

    pub fn neutral() -> Self {
        Self::new(0.0, 0, AnalysisSource::Local)
    }
}

/// Closed intent taxonomy.
///
/// Declaration order is the classifier's tie-break order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    #[serde(alias = "order.tracking")]
    OrderTracking,
    #[serde(alias = "product.search")]
    ProductSearch,
    Complaint,
    #[serde(alias = "recommendations")]
    Recommendation,
    Greeting,
    Help,
    Unknown,
}

impl Intent {
    /// Intents the keyword classifier scores, in tie-break order.
    pub const CLASSIFIABLE: [Intent; 6] = [
        Intent::OrderTracking,
        Intent::ProductSearch,
        Intent::Complaint,
        Intent::Recommendation,
        Intent::Greeting,
        Intent::Help,
    ];

    pub const ALL: [Intent; 7] = [
        Intent::OrderTracking,
        Intent::ProductSearch,
        Intent::Complaint,
        Intent::Recommendation,
        Intent::Greeting,
        Intent::Help,
        Intent::Unknown,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::OrderTracking => "order_tracking",
            Intent::ProductSearch => "product_search",
            Intent::Complaint => "complaint",
            Intent::Recommendation => "recommendation",
            Intent::Greeting => "greeting",
            Intent::Help => "help",
            Intent::Unknown => "unknown",
        }
    }

    /// Parse a tag, accepting the dotted spellings upstream NLU agents use.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag.trim().to_lowercase().as_str() {
            "order_tracking" | "order.tracking" => Some(Intent::OrderTracking),
            "product_search" | "product.search" => Some(Intent::ProductSearch),
            "complaint" => Some(Intent::Complaint),
            "recommendation" | "recommendations" => Some(Intent::Recommendation),
            "greeting" => Some(Intent::Greeting),
            "help" => Some(Intent::Help),
            "unknown" => Some(Intent::Unknown),
            _ => None,
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of intent classification.
///
/// Deserialization recomputes `is_high_confidence` from `confidence` and
/// fills `all_scores` when an upstream payload omits it. Upstream scores
/// whose argmax is not `intent` are discarded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "IntentWire")]
pub struct IntentResult {
    pub intent: Intent,
    pub confidence: f64,
    pub all_scores: BTreeMap<Intent, f64>,
    pub is_high_confidence: bool,
    pub source: AnalysisSource,
}

#[derive(Deserialize)]
struct IntentWire {
    intent: Intent,
    confidence: f64,
    #[serde(default)]
    all_scores: BTreeMap<Intent, f64>,
    #[serde(default = "upstream_source")]
    source: AnalysisSource,
}

impl From<IntentWire> for IntentResult {
    fn from(w: IntentWire) -> Self {
        let mut r = IntentResult::single(w.intent, w.confidence, w.source);
        let mut merged = r.all_scores.clone();
        merged.extend(w.all_scores.into_iter().filter(|(_, s)| s.is_finite()));
        if top_intent(&merged) == w.intent {
            r.all_scores = merged;
        }
        r
    }
}

/// Highest-scoring intent, ties going to the earlier entry of
/// [`Intent::CLASSIFIABLE`]. `unknown` when nothing scores above zero.
pub fn top_intent(scores: &BTreeMap<Intent, f64>) -> Intent {
    let mut top = (Intent::Unknown, 0.0_f64);
    for intent in Intent::CLASSIFIABLE {
        let score = scores.get(&intent).copied().unwrap_or(0.0);
        if score > top.1 {
            top = (intent, score);
        }
    }
    top.0
}

impl IntentResult {
    /// Single-intent result, e.g. from a remote classifier. `unknown` never
    /// carries confidence.
    pub fn single(intent: Intent, confidence: f64, source: AnalysisSource) -> Self {
        let confidence = match intent {
            Intent::Unknown => 0.0,
            _ if confidence.is_finite() => confidence.clamp(0.0, 1.0),
            _ => 0.0,
        };
        let mut all_scores: BTreeMap<Intent, f64> = Intent::ALL.iter().map(|i| (*i, 0.0)).collect();
        all_scores.insert(intent, confidence);
        Self {
            intent,
            confidence,
            all_scores,
            is_high_confidence: confidence > HIGH_CONFIDENCE_CUTOFF,
            source,
        }
    }

    pub fn unknown() -> Self {
        Self::single(Intent::Unknown, 0.0, AnalysisSource::Local)
    }
}

/// Response flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Flow {
    /// Escalated, human-assist path.
    Ava,
    Ivr,
    ProductSearch,
    OrderTracking,
    Recommendations,
}

impl Flow {
    pub fn as_str(&self) -> &'static str {
        match self {
            Flow::Ava => "AVA",
            Flow::Ivr => "IVR",
            Flow::ProductSearch => "PRODUCT_SEARCH",
            Flow::OrderTracking => "ORDER_TRACKING",
            Flow::Recommendations => "RECOMMENDATIONS",
        }
    }

    pub fn is_escalated(&self) -> bool {
        matches!(self, Flow::Ava)
    }
}

impl fmt::Display for Flow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseStyle {
    Empathetic,
    Efficient,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    High,
    Normal,
}

/// Advisory payload handed to flow handlers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowRecommendations {
    pub response_style: ResponseStyle,
    pub urgency: Urgency,
    pub suggestions: Vec<String>,
}

/// Routing decision for one turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowDecision {
    pub flow: Flow,
    pub should_escalate: bool,
    pub escalation_score: u32,
    pub reasons: Vec<String>,
    pub confidence: f64,
    pub success: bool,
    pub sentiment: SentimentResult,
    pub intent: IntentResult,
    pub recommendations: FlowRecommendations,
}

impl FlowDecision {
    /// Reasons joined for display.
    pub fn reason(&self) -> String {
        if self.reasons.is_empty() {
            "Standard query".to_string()
        } else {
            self.reasons.join(", ")
        }
    }
}

impl fmt::Display for FlowDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "FlowDecision(flow={}, score={}, intent={}, sentiment={})",
            self.flow, self.escalation_score, self.intent.intent, self.sentiment.category
        )
    }
}

/// Per-turn context supplied by the caller.
///
/// Unknown fields are rejected rather than carried through.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DecisionContext {
    /// Raw user text before any upstream rewriting; scanned for escalation keywords.
    #[serde(default)]
    pub original_message: Option<String>,
    /// Sentiment computed upstream; skips local analysis when set.
    #[serde(default)]
    pub sentiment: Option<SentimentResult>,
    /// Intent computed upstream; skips local classification when set.
    #[serde(default)]
    pub intent: Option<IntentResult>,
}

impl DecisionContext {
    pub fn with_original_message(msg: impl Into<String>) -> Self {
        Self { original_message: Some(msg.into()), ..Default::default() }
    }
}
