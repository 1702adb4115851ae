//! Keyword-table intent classifier.
//!
//! Each intent scores the number of its keywords found as substrings of the
//! lowercased message, boosted when more than one matches. The winner is the
//! highest score; ties go to the intent listed first in
//! [`Intent::CLASSIFIABLE`]. A message that matches nothing is `unknown`.

use crate::tokenize::word_count;
use regex::Regex;
use sa_core::config::{NluConfig, DEFAULT_ORDER_REFERENCE_PATTERN};
use sa_core::{AnalysisSource, Intent, IntentResult, SaError, HIGH_CONFIDENCE_CUTOFF};
use std::collections::BTreeMap;

/// Score multiplier when an intent matches more than one keyword.
pub const MULTI_KEYWORD_BOOST: f64 = 1.5;
/// Confidence is normalised by `word_count / WORDS_PER_KEYWORD`.
pub const WORDS_PER_KEYWORD: f64 = 3.0;

#[derive(Debug, Clone)]
pub struct KeywordIntentClassifier {
    table: Vec<(Intent, Vec<String>)>,
    order_reference: Option<Regex>,
}

impl KeywordIntentClassifier {
    pub fn from_config(config: &NluConfig) -> sa_core::Result<Self> {
        let order_reference = match &config.order_reference_pattern {
            Some(p) => Some(
                Regex::new(p).map_err(|e| SaError::invalid_config(format!("order reference pattern: {e}")))?,
            ),
            None => None,
        };
        let mut table: Vec<(Intent, Vec<String>)> = config
            .intents
            .iter()
            .filter(|e| e.intent != Intent::Unknown)
            .map(|e| {
                let kws = e
                    .keywords
                    .iter()
                    .map(|k| k.trim().to_lowercase())
                    .filter(|k| !k.is_empty())
                    .collect();
                (e.intent, kws)
            })
            .collect();
        // Iteration order is the tie-break order, independent of file order.
        table.sort_by_key(|(intent, _)| *intent);
        Ok(Self { table, order_reference })
    }

    pub fn classify(&self, text: &str) -> IntentResult {
        let lowered = text.to_lowercase();
        let words = word_count(&lowered);

        let mut all_scores: BTreeMap<Intent, f64> = Intent::ALL.iter().map(|i| (*i, 0.0)).collect();
        let mut top = (Intent::Unknown, 0.0_f64);

        for (intent, keywords) in &self.table {
            let mut matches = keywords.iter().filter(|k| lowered.contains(k.as_str())).count();
            if *intent == Intent::OrderTracking {
                if let Some(re) = &self.order_reference {
                    if re.is_match(&lowered) {
                        matches += 1;
                    }
                }
            }
            let mut score = matches as f64;
            if matches > 1 {
                score *= MULTI_KEYWORD_BOOST;
            }
            let entry = all_scores.entry(*intent).or_insert(0.0);
            *entry += score;
            if *entry > top.1 {
                top = (*intent, *entry);
            }
        }

        let confidence = (top.1 / (words as f64 / WORDS_PER_KEYWORD).max(1.0)).clamp(0.0, 1.0);
        IntentResult {
            intent: top.0,
            confidence,
            all_scores,
            is_high_confidence: confidence > HIGH_CONFIDENCE_CUTOFF,
            source: AnalysisSource::Local,
        }
    }
}

impl Default for KeywordIntentClassifier {
    fn default() -> Self {
        let config = NluConfig::default();
        Self::from_config(&config).unwrap_or_else(|_| Self {
            table: config
                .intents
                .iter()
                .map(|e| (e.intent, e.keywords.clone()))
                .collect(),
            order_reference: Regex::new(DEFAULT_ORDER_REFERENCE_PATTERN).ok(),
        })
    }
}
