//! Lexicon sentiment scorer.

use crate::tokenize::tokenize;
use sa_core::config::SentimentLexicon;
use sa_core::{AnalysisSource, SentimentResult};
use std::collections::{BTreeSet, HashSet};

/// Word-list scorer: polarity balance per token, plus complaint indicators.
#[derive(Debug, Clone)]
pub struct LexiconSentimentScorer {
    positive: HashSet<String>,
    negative: HashSet<String>,
    complaint: HashSet<String>,
    gain: f64,
}

fn word_set(words: &[String]) -> HashSet<String> {
    words
        .iter()
        .map(|w| w.trim().to_lowercase())
        .filter(|w| !w.is_empty())
        .collect()
}

impl LexiconSentimentScorer {
    pub fn new(lexicon: &SentimentLexicon) -> Self {
        Self {
            positive: word_set(&lexicon.positive),
            negative: word_set(&lexicon.negative),
            complaint: word_set(&lexicon.complaint),
            gain: lexicon.gain,
        }
    }

    /// Score one message. Never fails; unknown tokens simply don't match.
    pub fn score(&self, text: &str) -> SentimentResult {
        let tokens = tokenize(text);
        if tokens.is_empty() {
            return SentimentResult::neutral();
        }

        let mut pos = 0usize;
        let mut neg = 0usize;
        let mut positive_terms = BTreeSet::new();
        let mut negative_terms = BTreeSet::new();
        for token in &tokens {
            if self.positive.contains(token) {
                pos += 1;
                positive_terms.insert(token.clone());
            }
            if self.negative.contains(token) {
                neg += 1;
                negative_terms.insert(token.clone());
            }
        }
        let (intensity, complaint_terms) = self.complaint_terms(&tokens);

        let balance = pos as f64 - neg as f64;
        let score = self.gain * balance / tokens.len().max(1) as f64;

        let mut result = SentimentResult::new(score, intensity, AnalysisSource::Local);
        result.matched_positive_terms = positive_terms;
        result.matched_negative_terms = negative_terms;
        result.matched_complaint_terms = complaint_terms;
        result
    }

    /// Count complaint-indicator tokens in `text`.
    pub fn complaints(&self, text: &str) -> (u32, BTreeSet<String>) {
        self.complaint_terms(&tokenize(text))
    }

    fn complaint_terms(&self, tokens: &[String]) -> (u32, BTreeSet<String>) {
        let mut count = 0u32;
        let mut terms = BTreeSet::new();
        for token in tokens.iter().filter(|t| self.complaint.contains(*t)) {
            count += 1;
            terms.insert(token.clone());
        }
        (count, terms)
    }
}

impl Default for LexiconSentimentScorer {
    fn default() -> Self {
        Self::new(&SentimentLexicon::default())
    }
}
