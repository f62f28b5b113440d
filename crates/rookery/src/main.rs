use rookery::{Agent, AgentConfig, AgentError};
use rookery_client::HttpApi;
use rookery_engine::ProcessProvider;
use tracing::error;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    if let Err(e) = run().await {
        error!(error = %e, "agent stopped");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), AgentError> {
    let config = AgentConfig::from_env()?;
    let api = HttpApi::new(config.base_url.clone(), config.token.clone());
    let provider =
        ProcessProvider::new(config.engine.clone(), config.move_timeout);
    Agent::new(api, provider, config).run().await
}
