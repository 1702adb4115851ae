//! Additive escalation signals.

use sa_core::{Intent, IntentResult, RoutingConfig, SentimentCategory, SentimentResult};
use sa_nlu::tokenize::contains_any;

/// One escalation signal that fired for a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    NegativeSentiment,
    ComplaintIndicator,
    RepeatedFailure,
    ComplaintIntent,
    EscalationKeyword,
    NegativeOrderTracking,
}

impl Signal {
    /// Evaluation order; also the order of reasons in a decision.
    pub const ALL: [Signal; 6] = [
        Signal::NegativeSentiment,
        Signal::ComplaintIndicator,
        Signal::RepeatedFailure,
        Signal::ComplaintIntent,
        Signal::EscalationKeyword,
        Signal::NegativeOrderTracking,
    ];

    pub fn reason(&self) -> &'static str {
        match self {
            Signal::NegativeSentiment => "Negative sentiment detected",
            Signal::ComplaintIndicator => "Complaint indicators found",
            Signal::RepeatedFailure => "Multiple failed attempts",
            Signal::ComplaintIntent => "Direct complaint intent",
            Signal::EscalationKeyword => "Escalation keyword detected",
            Signal::NegativeOrderTracking => "Order tracking with negative sentiment",
        }
    }

    pub fn weight(&self, config: &RoutingConfig) -> u32 {
        let w = &config.weights;
        match self {
            Signal::NegativeSentiment => w.negative_sentiment,
            Signal::ComplaintIndicator => w.complaint_indicator,
            Signal::RepeatedFailure => w.repeated_failure,
            Signal::ComplaintIntent => w.complaint_intent,
            Signal::EscalationKeyword => w.escalation_keyword,
            Signal::NegativeOrderTracking => w.negative_order_tracking,
        }
    }
}

/// Everything the signals look at for one turn.
#[derive(Debug, Clone, Copy)]
pub struct SignalInput<'a> {
    pub message: &'a str,
    pub original_message: Option<&'a str>,
    pub sentiment: &'a SentimentResult,
    pub intent: &'a IntentResult,
    /// Failure count before this turn.
    pub prior_failures: u32,
}

/// Sum of fired signal weights.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EscalationScore {
    pub score: u32,
    pub fired: Vec<Signal>,
}

impl EscalationScore {
    pub fn reasons(&self) -> Vec<String> {
        self.fired.iter().map(|s| s.reason().to_string()).collect()
    }
}

fn fires(signal: Signal, input: &SignalInput<'_>, config: &RoutingConfig) -> bool {
    let t = &config.thresholds;
    match signal {
        Signal::NegativeSentiment => input.sentiment.score < t.negative_sentiment_score,
        Signal::ComplaintIndicator => input.sentiment.is_complaint,
        Signal::RepeatedFailure => input.prior_failures >= t.failure_count,
        Signal::ComplaintIntent => input.intent.intent == Intent::Complaint,
        Signal::EscalationKeyword => {
            contains_any(input.message, &config.escalation_keywords)
                || input
                    .original_message
                    .map(|m| contains_any(m, &config.escalation_keywords))
                    .unwrap_or(false)
        }
        Signal::NegativeOrderTracking => {
            input.intent.intent == Intent::OrderTracking && input.sentiment.category == SentimentCategory::Negative
        }
    }
}

/// Evaluate every signal in order and total the weights.
pub fn evaluate_signals(input: &SignalInput<'_>, config: &RoutingConfig) -> EscalationScore {
    let mut out = EscalationScore::default();
    for signal in Signal::ALL {
        if fires(signal, input, config) {
            out.score = out.score.saturating_add(signal.weight(config));
            out.fired.push(signal);
        }
    }
    out
}
