use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SaError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("Remote service error: {0}")]
    Remote(String),
    #[error("Remote service timed out after {0:?}")]
    Timeout(Duration),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl SaError {
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    pub fn remote(msg: impl Into<String>) -> Self {
        Self::Remote(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, SaError>;
