//! TOML configuration file loading
//!
//! Keys mirror the long command line flags (`metrics-port = 2003`). Values in
//! the file are applied first and the command line is laid over them.

use super::args::Args;
use super::error::{ConfigError, ConfigResult};
use std::path::{Path, PathBuf};

/// Config file looked up when `--config-file` is not given
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("Lightsync").join("lightsync.toml"))
}

impl Args {
    /// Read the config file and lay `cli` over it
    ///
    /// A file named on the command line must exist; the default file is
    /// optional.
    pub async fn with_config_file(cli: Args) -> ConfigResult<Args> {
        let mut args = Args::new();
        if let Some(config) = Self::load_config_file(cli.config_file.as_deref()).await? {
            Self::apply_toml_values(&mut args, &config)?;
        }
        Ok(args.overlay(cli))
    }

    /// Load the TOML table from `config_file` or the default location
    pub async fn load_config_file(config_file: Option<&Path>) -> ConfigResult<Option<toml::Table>> {
        let path = match config_file {
            Some(path) => {
                if !path.exists() {
                    return Err(ConfigError::NotFound {
                        path: path.to_path_buf(),
                        message: format!(
                            "The specified configuration file does not exist: {}",
                            path.display()
                        ),
                    });
                }
                path.to_path_buf()
            }
            None => match default_config_path() {
                Some(path) if path.exists() => path,
                _ => return Ok(None),
            },
        };

        let contents = tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| ConfigError::Read {
                path: path.clone(),
                message: e.to_string(),
            })?;
        let config = toml::from_str::<toml::Table>(&contents).map_err(|e| ConfigError::Parse {
            path: path.clone(),
            message: e.to_string(),
        })?;
        log::debug!("Loaded configuration from {}", path.display());
        Ok(Some(config))
    }

    /// Apply TOML configuration values to Args
    pub fn apply_toml_values(args: &mut Self, config: &toml::Table) -> ConfigResult<()> {
        if let Some(strategy) = string_value(config, "strategy")? {
            args.strategy = Some(strategy);
        }
        if let Some(redis_url) = string_value(config, "redis-url")? {
            args.redis_url = Some(redis_url);
        }
        if let Some(queue) = string_value(config, "queue")? {
            args.queue = Some(queue);
        }
        if let Some(host) = string_value(config, "metrics-host")? {
            args.metrics_host = Some(host);
        }
        if let Some(port) = integer_value(config, "metrics-port")? {
            let port = u16::try_from(port).map_err(|_| {
                ConfigError::invalid("metrics-port", format!("metrics-port {} is out of range", port))
            })?;
            args.metrics_port = Some(port);
        }
        if let Some(key) = string_value(config, "metric-key")? {
            args.metric_key = Some(key);
        }
        if let Some(millis) = millis_value(config, "pop-timeout-ms")? {
            args.pop_timeout_ms = Some(millis);
        }
        if let Some(millis) = millis_value(config, "connect-timeout-ms")? {
            args.connect_timeout_ms = Some(millis);
        }
        if let Some(dry_run) = bool_value(config, "dry-run")? {
            args.dry_run = dry_run;
        }
        if let Some(color) = bool_value(config, "color")? {
            args.color_config = Some(color);
        }
        if let Some(log_level) = string_value(config, "log-level")? {
            args.log_level = Some(log_level);
        }
        if let Some(log_file) = string_value(config, "log-file")? {
            args.log_file = Some(PathBuf::from(log_file));
        }
        if let Some(log_format) = string_value(config, "log-format")? {
            args.log_format = Some(log_format);
        }
        Ok(())
    }
}

fn string_value(config: &toml::Table, key: &str) -> ConfigResult<Option<String>> {
    match config.get(key) {
        None => Ok(None),
        Some(value) => value
            .as_str()
            .map(|s| Some(s.to_string()))
            .ok_or_else(|| ConfigError::invalid(key, format!("{} must be a string", key))),
    }
}

fn integer_value(config: &toml::Table, key: &str) -> ConfigResult<Option<i64>> {
    match config.get(key) {
        None => Ok(None),
        Some(value) => value
            .as_integer()
            .map(Some)
            .ok_or_else(|| ConfigError::invalid(key, format!("{} must be an integer", key))),
    }
}

fn millis_value(config: &toml::Table, key: &str) -> ConfigResult<Option<u64>> {
    match integer_value(config, key)? {
        None => Ok(None),
        Some(millis) => u64::try_from(millis).map(Some).map_err(|_| {
            ConfigError::invalid(key, format!("{} cannot be negative", key))
        }),
    }
}

fn bool_value(config: &toml::Table, key: &str) -> ConfigResult<Option<bool>> {
    match config.get(key) {
        None => Ok(None),
        Some(value) => value
            .as_bool()
            .map(Some)
            .ok_or_else(|| ConfigError::invalid(key, format!("{} must be true or false", key))),
    }
}
