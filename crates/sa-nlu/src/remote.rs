//! HTTP client for an external NLU service.
//!
//! `POST {base}/analyze {"text"}` returns `{"score"?, "sentiment"?}` and
//! `POST {base}/classify {"text"}` returns `{"intent", "confidence"?}`.

use async_trait::async_trait;
use reqwest::StatusCode;
use sa_core::config::RemoteNluConfig;
use sa_core::{AnalysisSource, Intent, IntentResult, Result, SaError, SentimentResult};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::traits::{IntentClassifier, SentimentAnalyzer};

/// Score assumed when the service only returns a polarity label.
const LABEL_SCORE: f64 = 0.5;

#[derive(Debug, Clone)]
pub struct RemoteNluClient {
    client: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

#[derive(Serialize)]
struct TextRequest<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct SentimentResponse {
    score: Option<f64>,
    sentiment: Option<String>,
}

#[derive(Debug, Deserialize)]
struct IntentResponse {
    intent: String,
    confidence: Option<f64>,
}

impl RemoteNluClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SaError::remote(format!("failed to build http client: {e}")))?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout,
        })
    }

    pub fn from_config(config: &RemoteNluConfig) -> Result<Self> {
        Self::new(config.base_url.clone(), Duration::from_millis(config.timeout_ms))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn post<T: for<'de> Deserialize<'de>>(&self, endpoint: &str, text: &str) -> Result<T> {
        let url = format!("{}/{}", self.base_url, endpoint);
        let resp = match self.client.post(&url).json(&TextRequest { text }).send().await {
            Ok(r) => r,
            Err(e) if e.is_timeout() => return Err(SaError::Timeout(self.timeout)),
            Err(e) if e.is_connect() => return Err(SaError::remote(format!("connect to {url}: {e}"))),
            Err(e) => return Err(SaError::remote(e.to_string())),
        };

        let status = resp.status();
        if status != StatusCode::OK {
            return Err(SaError::remote(format!("{url} returned {status}")));
        }
        resp.json::<T>()
            .await
            .map_err(|e| SaError::remote(format!("malformed response from {url}: {e}")))
    }
}

fn label_score(label: &str) -> Option<f64> {
    match label.trim().to_lowercase().as_str() {
        "positive" => Some(LABEL_SCORE),
        "negative" => Some(-LABEL_SCORE),
        "neutral" => Some(0.0),
        _ => None,
    }
}

#[async_trait]
impl SentimentAnalyzer for RemoteNluClient {
    async fn analyze(&self, text: &str) -> Result<SentimentResult> {
        let body: SentimentResponse = self.post("analyze", text).await?;
        let score = match (body.score, body.sentiment.as_deref()) {
            (Some(score), _) if score.is_finite() => score,
            (_, Some(label)) => label_score(label)
                .ok_or_else(|| SaError::remote(format!("unknown sentiment label {label:?}")))?,
            _ => return Err(SaError::remote("sentiment response has neither score nor label")),
        };
        Ok(SentimentResult::new(score, 0, AnalysisSource::Remote))
    }

    fn name(&self) -> &str {
        "remote"
    }
}

#[async_trait]
impl IntentClassifier for RemoteNluClient {
    async fn classify(&self, text: &str) -> Result<IntentResult> {
        let body: IntentResponse = self.post("classify", text).await?;
        let intent = Intent::from_tag(&body.intent)
            .ok_or_else(|| SaError::remote(format!("unknown intent tag {:?}", body.intent)))?;
        Ok(IntentResult::single(intent, body.confidence.unwrap_or(1.0), AnalysisSource::Remote))
    }

    fn name(&self) -> &str {
        "remote"
    }
}
