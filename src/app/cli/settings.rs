//! Resolved run settings

use super::args::Args;
use super::error::{ConfigError, ConfigResult};
use crate::core::logging::LogFormat;
use crate::pipeline::{PipelineSettings, Strategy};
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_REDIS_URL: &str = "redis://localhost";
pub const DEFAULT_METRICS_HOST: &str = "localhost";
pub const DEFAULT_METRICS_PORT: u16 = 2003;
pub const DEFAULT_CONNECT_TIMEOUT_MS: u64 = 2000;

const LOG_LEVELS: [&str; 6] = ["trace", "debug", "info", "warn", "error", "off"];

/// Everything a run needs, validated
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub strategy: Strategy,
    pub redis_url: String,
    pub pipeline: PipelineSettings,
    pub metrics_host: String,
    pub metrics_port: u16,
    pub connect_timeout: Duration,
    pub dry_run: bool,
    pub logging: LoggingSettings,
}

/// How the logger is installed
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LoggingSettings {
    pub level: Option<String>,
    pub format: LogFormat,
    pub file: Option<PathBuf>,
    pub color: bool,
}

impl Args {
    /// Fill in defaults and validate
    pub fn resolve(&self) -> ConfigResult<Settings> {
        let strategy = match &self.strategy {
            Some(name) => name
                .parse::<Strategy>()
                .map_err(|message| ConfigError::invalid("strategy", message))?,
            None => Strategy::default(),
        };

        let queue_id = self
            .queue
            .clone()
            .unwrap_or_else(|| strategy.default_queue_id().to_string());
        validate_queue_id(&queue_id)?;

        let metric_key = self
            .metric_key
            .clone()
            .unwrap_or_else(|| strategy.default_metric_key().to_string());
        validate_metric_key(&metric_key)?;

        let metrics_port = self.metrics_port.unwrap_or(DEFAULT_METRICS_PORT);
        if metrics_port == 0 {
            return Err(ConfigError::invalid(
                "metrics-port",
                "metrics-port must be greater than 0",
            ));
        }

        let metrics_host = self
            .metrics_host
            .clone()
            .unwrap_or_else(|| DEFAULT_METRICS_HOST.to_string());
        if metrics_host.trim().is_empty() {
            return Err(ConfigError::invalid(
                "metrics-host",
                "metrics-host cannot be empty",
            ));
        }

        let connect_timeout_ms = self
            .connect_timeout_ms
            .unwrap_or(DEFAULT_CONNECT_TIMEOUT_MS);
        if connect_timeout_ms == 0 {
            return Err(ConfigError::invalid(
                "connect-timeout-ms",
                "connect-timeout-ms must be greater than 0",
            ));
        }

        let pop_timeout = self
            .pop_timeout_ms
            .map(Duration::from_millis)
            .unwrap_or(PipelineSettings::DEFAULT_POP_TIMEOUT);

        let logging = self.logging()?;

        Ok(Settings {
            strategy,
            redis_url: self
                .redis_url
                .clone()
                .unwrap_or_else(|| DEFAULT_REDIS_URL.to_string()),
            pipeline: PipelineSettings {
                queue_id,
                metric_key,
                pop_timeout,
            },
            metrics_host,
            metrics_port,
            connect_timeout: Duration::from_millis(connect_timeout_ms),
            dry_run: self.dry_run,
            logging,
        })
    }

    /// Resolve and validate the logging options alone
    pub fn logging(&self) -> ConfigResult<LoggingSettings> {
        if let Some(level) = &self.log_level {
            if !LOG_LEVELS.contains(&level.as_str()) {
                return Err(ConfigError::invalid(
                    "log-level",
                    format!("unknown log level '{}'", level),
                ));
            }
        }
        let format = match &self.log_format {
            Some(format) => format
                .parse::<LogFormat>()
                .map_err(|message| ConfigError::invalid("log-format", message))?,
            None => LogFormat::default(),
        };

        Ok(LoggingSettings {
            level: self.log_level.clone(),
            format,
            file: self.log_file_path(),
            color: self.color_enabled(),
        })
    }
}

fn validate_queue_id(queue_id: &str) -> ConfigResult<()> {
    if queue_id.trim().is_empty() {
        return Err(ConfigError::invalid("queue", "queue cannot be empty"));
    }
    Ok(())
}

/// Metric keys end up as the first token of a whitespace separated line
fn validate_metric_key(metric_key: &str) -> ConfigResult<()> {
    if metric_key.is_empty() {
        return Err(ConfigError::invalid("metric-key", "metric-key cannot be empty"));
    }
    if metric_key.chars().any(char::is_whitespace) {
        return Err(ConfigError::invalid(
            "metric-key",
            format!("metric-key '{}' cannot contain whitespace", metric_key),
        ));
    }
    Ok(())
}
