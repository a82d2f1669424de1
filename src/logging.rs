use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::errors::AppError;

const DEFAULT_FILTER: &str = "dcwatch=info,info";

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub filter: String,
    /// Run mode (`schedule` or a job name); attached as the Loki `job` label.
    pub mode: String,
    pub environment: String,
    pub compact: bool,
    pub loki_url: Option<String>,
}

impl LoggingConfig {
    /// `RUST_LOG`, `ENVIRONMENT`, `LOG_FORMAT` (`compact` or `full`) and
    /// `LOKI_URL` when `LOKI_ENABLED=true`.
    pub fn from_env(mode: &str) -> Self {
        let loki_enabled = std::env::var("LOKI_ENABLED")
            .map(|v| v.eq_ignore_ascii_case("true") || v == "1")
            .unwrap_or(false);

        Self {
            filter: std::env::var("RUST_LOG").unwrap_or_else(|_| DEFAULT_FILTER.to_string()),
            mode: mode.to_string(),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "local".to_string()),
            compact: std::env::var("LOG_FORMAT")
                .map(|v| v.eq_ignore_ascii_case("compact"))
                .unwrap_or(false),
            loki_url: if loki_enabled {
                // An empty URL is reported by `validate`
                Some(std::env::var("LOKI_URL").unwrap_or_default())
            } else {
                None
            },
        }
    }

    pub fn validate(&self) -> Result<(), AppError> {
        match self.loki_url.as_deref() {
            Some(url) if url.trim().is_empty() => Err(AppError::Config(
                "LOKI_ENABLED is set but LOKI_URL is empty".to_string(),
            )),
            Some(url) => url::Url::parse(url)
                .map(|_| ())
                .map_err(|e| AppError::Config(format!("Invalid LOKI_URL '{}': {}", url, e))),
            None => Ok(()),
        }
    }
}

/// Installs the global subscriber. Loki shipping spawns a task, so it needs a
/// running tokio runtime.
pub fn init_logging(config: &LoggingConfig) -> Result<(), AppError> {
    config.validate()?;

    #[cfg(feature = "loki")]
    {
        if let Some(loki_url) = config.loki_url.as_deref() {
            return init_with_loki(config, loki_url);
        }
    }

    let filter = EnvFilter::new(&config.filter);
    let installed = if config.compact {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().compact().with_target(false))
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .try_init()
    };
    installed.map_err(|e| AppError::Config(format!("Logging already initialised: {}", e)))?;

    tracing::debug!("Console logging ready (mode: {})", config.mode);
    Ok(())
}

#[cfg(feature = "loki")]
fn init_with_loki(config: &LoggingConfig, loki_url: &str) -> Result<(), AppError> {
    let loki_error = |e: tracing_loki::Error| AppError::Config(format!("Loki setup failed: {}", e));
    let url = url::Url::parse(loki_url)
        .map_err(|e| AppError::Config(format!("Invalid LOKI_URL '{}': {}", loki_url, e)))?;

    let (loki_layer, task) = tracing_loki::builder()
        .label("service", "dcwatch")
        .map_err(loki_error)?
        .label("job", &config.mode)
        .map_err(loki_error)?
        .label("environment", &config.environment)
        .map_err(loki_error)?
        .build_url(url)
        .map_err(loki_error)?;

    tokio::spawn(task);

    tracing_subscriber::registry()
        .with(EnvFilter::new(&config.filter))
        .with(tracing_subscriber::fmt::layer())
        .with(loki_layer)
        .try_init()
        .map_err(|e| AppError::Config(format!("Logging already initialised: {}", e)))?;

    tracing::info!("Shipping logs to Loki at {}", loki_url);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(loki_url: Option<&str>) -> LoggingConfig {
        LoggingConfig {
            filter: DEFAULT_FILTER.to_string(),
            mode: "daily".to_string(),
            environment: "test".to_string(),
            compact: true,
            loki_url: loki_url.map(str::to_string),
        }
    }

    #[test]
    fn test_console_only_needs_no_url() {
        assert!(config(None).validate().is_ok());
    }

    #[test]
    fn test_loki_url_must_be_present_and_parseable() {
        assert!(config(Some("")).validate().is_err());
        assert!(config(Some("not a url")).validate().is_err());
        assert!(config(Some("http://localhost:3100")).validate().is_ok());
    }
}
