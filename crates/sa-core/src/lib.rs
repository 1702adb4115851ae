//! Shared types, errors and configuration for the ShopAssist routing core.

pub mod config;
pub mod error;
pub mod types;

pub use config::{AssistantConfig, RoutingConfig, NluConfig, SessionConfig, DEFAULT_CONFIG};
pub use error::{SaError, Result};
pub use types::*;
