//! Rule-based sentiment and intent scoring, with an optional remote NLU
//! strategy that always degrades to the local scorers.

pub mod tokenize;
pub mod sentiment;
pub mod intent;
pub mod traits;
pub mod remote;
pub mod pipeline;

pub use sentiment::LexiconSentimentScorer;
pub use intent::KeywordIntentClassifier;
pub use traits::{IntentClassifier, SentimentAnalyzer};
pub use remote::RemoteNluClient;
pub use pipeline::NluPipeline;
