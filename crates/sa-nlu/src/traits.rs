use async_trait::async_trait;
use sa_core::{IntentResult, Result, SentimentResult};

use crate::intent::KeywordIntentClassifier;
use crate::sentiment::LexiconSentimentScorer;

/// Strategy that scores the sentiment of a message.
#[async_trait]
pub trait SentimentAnalyzer: Send + Sync {
    async fn analyze(&self, text: &str) -> Result<SentimentResult>;

    /// Name used in logs.
    fn name(&self) -> &str;
}

/// Strategy that detects the intent of a message.
#[async_trait]
pub trait IntentClassifier: Send + Sync {
    async fn classify(&self, text: &str) -> Result<IntentResult>;

    /// Name used in logs.
    fn name(&self) -> &str;
}

#[async_trait]
impl SentimentAnalyzer for LexiconSentimentScorer {
    async fn analyze(&self, text: &str) -> Result<SentimentResult> {
        Ok(self.score(text))
    }

    fn name(&self) -> &str {
        "lexicon"
    }
}

#[async_trait]
impl IntentClassifier for KeywordIntentClassifier {
    async fn classify(&self, text: &str) -> Result<IntentResult> {
        Ok(KeywordIntentClassifier::classify(self, text))
    }

    fn name(&self) -> &str {
        "keyword"
    }
}
