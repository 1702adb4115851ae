//! `shop-assist` server entry point.

use anyhow::Context;
use sa_core::{AssistantConfig, DEFAULT_CONFIG};
use sa_server::{app_with_state, state::AppState};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Env var naming a JSON config file; defaults apply when unset.
const CONFIG_ENV: &str = "SHOP_ASSIST_CONFIG";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = match std::env::var(CONFIG_ENV) {
        Ok(path) => AssistantConfig::load(&path).with_context(|| format!("loading config from {path}"))?,
        Err(_) => {
            let config = DEFAULT_CONFIG.clone();
            config.validate()?;
            tracing::info!("no {CONFIG_ENV} set, using built-in config");
            config
        }
    };

    let state = AppState::from_config(&config).context("building decision engine")?;
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {addr}"))?;

    tracing::info!(%addr, remote_nlu = config.nlu.remote.is_some(), "shop-assist listening");
    axum::serve(listener, app_with_state(state)).await?;
    Ok(())
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}
