//! Analysis pipeline: optional primary strategies, bounded by a timeout,
//! always backed by the local scorers.

use sa_core::config::{NluConfig, DEFAULT_REMOTE_TIMEOUT_MS};
use sa_core::{AnalysisSource, IntentResult, Result, SentimentResult};
use std::sync::Arc;
use std::time::Duration;

use crate::intent::KeywordIntentClassifier;
use crate::remote::RemoteNluClient;
use crate::sentiment::LexiconSentimentScorer;
use crate::traits::{IntentClassifier, SentimentAnalyzer};

pub struct NluPipeline {
    sentiment_local: LexiconSentimentScorer,
    intent_local: KeywordIntentClassifier,
    sentiment_primary: Option<Arc<dyn SentimentAnalyzer>>,
    intent_primary: Option<Arc<dyn IntentClassifier>>,
    timeout: Duration,
}

impl NluPipeline {
    /// Local scorers only.
    pub fn local(config: &NluConfig) -> Result<Self> {
        Ok(Self {
            sentiment_local: LexiconSentimentScorer::new(&config.sentiment),
            intent_local: KeywordIntentClassifier::from_config(config)?,
            sentiment_primary: None,
            intent_primary: None,
            timeout: Duration::from_millis(DEFAULT_REMOTE_TIMEOUT_MS),
        })
    }

    /// Local scorers plus the remote service when one is configured.
    pub fn from_config(config: &NluConfig) -> Result<Self> {
        let mut pipeline = Self::local(config)?;
        if let Some(remote) = &config.remote {
            let client = Arc::new(RemoteNluClient::from_config(remote)?);
            pipeline.timeout = Duration::from_millis(remote.timeout_ms);
            if remote.sentiment {
                pipeline.sentiment_primary = Some(client.clone());
            }
            if remote.intent {
                pipeline.intent_primary = Some(client);
            }
            tracing::info!(base_url = %remote.base_url, sentiment = remote.sentiment, intent = remote.intent, "remote NLU enabled");
        }
        Ok(pipeline)
    }

    pub fn with_sentiment_strategy(mut self, strategy: Arc<dyn SentimentAnalyzer>) -> Self {
        self.sentiment_primary = Some(strategy);
        self
    }

    pub fn with_intent_strategy(mut self, strategy: Arc<dyn IntentClassifier>) -> Self {
        self.intent_primary = Some(strategy);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn local_sentiment(&self) -> &LexiconSentimentScorer {
        &self.sentiment_local
    }

    pub fn local_intent(&self) -> &KeywordIntentClassifier {
        &self.intent_local
    }

    /// Sentiment for `text`. Primary-strategy failures and timeouts fall back to the lexicon.
    pub async fn sentiment(&self, text: &str) -> SentimentResult {
        let Some(primary) = self.sentiment_primary.as_ref().filter(|_| !text.trim().is_empty()) else {
            return self.sentiment_local.score(text);
        };
        match tokio::time::timeout(self.timeout, primary.analyze(text)).await {
            Ok(Ok(result)) => self.with_local_complaints(result, text),
            Ok(Err(e)) => {
                tracing::warn!(strategy = primary.name(), error = %e, "sentiment strategy failed, using lexicon");
                self.sentiment_local.score(text)
            }
            Err(_) => {
                tracing::warn!(strategy = primary.name(), timeout = ?self.timeout, "sentiment strategy timed out, using lexicon");
                self.sentiment_local.score(text)
            }
        }
    }

    /// Intent for `text`. Primary-strategy failures and timeouts fall back to the keyword table.
    pub async fn intent(&self, text: &str) -> IntentResult {
        let Some(primary) = self.intent_primary.as_ref().filter(|_| !text.trim().is_empty()) else {
            return self.intent_local.classify(text);
        };
        match tokio::time::timeout(self.timeout, primary.classify(text)).await {
            Ok(Ok(result)) => result,
            Ok(Err(e)) => {
                tracing::warn!(strategy = primary.name(), error = %e, "intent strategy failed, using keyword table");
                self.intent_local.classify(text)
            }
            Err(_) => {
                tracing::warn!(strategy = primary.name(), timeout = ?self.timeout, "intent strategy timed out, using keyword table");
                self.intent_local.classify(text)
            }
        }
    }

    /// Run both analyses concurrently.
    pub async fn analyze(&self, text: &str) -> (SentimentResult, IntentResult) {
        tokio::join!(self.sentiment(text), self.intent(text))
    }

    // Complaint indicators always come from the local lexicon.
    fn with_local_complaints(&self, primary: SentimentResult, text: &str) -> SentimentResult {
        if primary.source == AnalysisSource::Local {
            return primary;
        }
        let (intensity, terms) = self.sentiment_local.complaints(text);
        let mut merged = SentimentResult::new(primary.score, intensity.max(primary.complaint_intensity), primary.source);
        merged.matched_positive_terms = primary.matched_positive_terms;
        merged.matched_negative_terms = primary.matched_negative_terms;
        merged.matched_complaint_terms = primary.matched_complaint_terms;
        merged.matched_complaint_terms.extend(terms);
        merged
    }
}

impl Default for NluPipeline {
    fn default() -> Self {
        Self {
            sentiment_local: LexiconSentimentScorer::default(),
            intent_local: KeywordIntentClassifier::default(),
            sentiment_primary: None,
            intent_primary: None,
            timeout: Duration::from_millis(DEFAULT_REMOTE_TIMEOUT_MS),
        }
    }
}
