use anyhow::{Context, Result};

/// Process configuration loaded from environment variables.
///
/// Only the transport and HTTP boundary are configurable; the dispatch
/// engine itself takes no settings.
#[derive(Debug, Clone)]
pub struct Config {
    // Web server
    pub web_host: String,
    pub web_port: u16,

    // Event transport
    pub event_queue_capacity: usize,
    pub events_from_stdin: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            web_host: "0.0.0.0".to_string(),
            web_port: 8080,
            event_queue_capacity: 1024,
            events_from_stdin: false,
        }
    }
}

impl Config {
    /// Load configuration from the environment (and `.env` if present).
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        let defaults = Self::default();

        let config = Self {
            web_host: std::env::var("WEB_HOST").unwrap_or(defaults.web_host),
            web_port: parse_env("WEB_PORT", defaults.web_port)?,
            event_queue_capacity: parse_env("EVENT_QUEUE_CAPACITY", defaults.event_queue_capacity)?,
            events_from_stdin: parse_env("EVENTS_FROM_STDIN", defaults.events_from_stdin)?,
        };

        config.validate()?;

        tracing::info!(
            web_host = %config.web_host,
            web_port = config.web_port,
            event_queue_capacity = config.event_queue_capacity,
            events_from_stdin = config.events_from_stdin,
            "Config loaded"
        );
        Ok(config)
    }

    /// Reject values that parse but cannot run.
    pub fn validate(&self) -> Result<()> {
        if self.event_queue_capacity == 0 {
            anyhow::bail!("EVENT_QUEUE_CAPACITY must be greater than zero");
        }
        Ok(())
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.web_host, self.web_port)
    }
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{key} has an invalid value: {raw:?}")),
        Err(_) => Ok(default),
    }
}
