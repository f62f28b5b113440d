//! Agent configuration.
//!
//! The whole runtime surface: a bearer token, the API root, the sets of
//! challenges worth accepting, and the engine invocation limits. There
//! are no CLI flags and no config files — everything is environment
//! variables over [`AgentConfig::default`].

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::ConfigError;

/// Startup configuration for the agent.
#[derive(Debug, Clone)]
pub struct AgentConfig {
    /// Bearer token for every API call. `ROOKERY_TOKEN`, required.
    pub token: String,

    /// API root without a trailing slash. `ROOKERY_API`.
    pub base_url: String,

    /// Time controls (display form, e.g. `"15+10"`) the agent accepts.
    /// `ROOKERY_TIME_CONTROLS`, comma-separated.
    pub supported_time_controls: Vec<String>,

    /// Variants (short name, e.g. `"Std"`) the agent accepts.
    /// `ROOKERY_VARIANTS`, comma-separated.
    pub supported_variants: Vec<String>,

    /// Path to the engine binary. `ROOKERY_ENGINE`.
    pub engine: PathBuf,

    /// How long the engine may think about one move.
    pub move_timeout: Duration,

    /// How long after game start the agent waits for its first
    /// scheduled move to complete before aborting the game.
    pub first_move_timeout: Duration,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            token: String::new(),
            base_url: "https://lichess.org/api".to_string(),
            supported_time_controls: vec!["15+10".to_string()],
            supported_variants: vec!["Std".to_string()],
            engine: PathBuf::from("./engine"),
            move_timeout: Duration::from_secs(60),
            first_move_timeout: Duration::from_secs(30),
        }
    }
}

impl AgentConfig {
    /// Reads configuration from the environment.
    ///
    /// Only the token is required; everything else falls back to the
    /// defaults above.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();
        config.token = env::var("ROOKERY_TOKEN")
            .map_err(|_| ConfigError::MissingVar("ROOKERY_TOKEN"))?;
        if let Ok(url) = env::var("ROOKERY_API") {
            config.base_url = url;
        }
        if let Ok(engine) = env::var("ROOKERY_ENGINE") {
            config.engine = PathBuf::from(engine);
        }
        if let Ok(list) = env::var("ROOKERY_TIME_CONTROLS") {
            config.supported_time_controls = split_list(&list);
        }
        if let Ok(list) = env::var("ROOKERY_VARIANTS") {
            config.supported_variants = split_list(&list);
        }
        Ok(config)
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}
