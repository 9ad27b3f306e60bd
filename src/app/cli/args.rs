//! Command line arguments
//!
//! Every setting is optional here so a config file can fill the gaps; the
//! resolved, validated form is [`Settings`](super::Settings).

use clap::{ArgAction, Parser};
use std::path::PathBuf;

#[derive(Parser, Debug, Clone, Default, PartialEq)]
#[command(name = "lightsync")]
#[command(about = "Forward light status events from a queue to a metrics collector")]
#[command(version)]
pub struct Args {
    /// Configuration file path
    #[arg(short = 'c', long = "config-file", value_name = "FILE")]
    pub config_file: Option<PathBuf>,

    /// Delivery strategy
    #[arg(short = 's', long = "strategy", value_name = "STRATEGY", value_parser = ["bulk-sync", "bulk-concurrent", "streaming"])]
    pub strategy: Option<String>,

    /// Redis connection URL
    #[arg(short = 'u', long = "redis-url", value_name = "URL")]
    pub redis_url: Option<String>,

    /// Queue identifier (defaults depend on the strategy)
    #[arg(short = 'q', long = "queue", value_name = "QUEUE")]
    pub queue: Option<String>,

    /// Metrics collector host
    #[arg(short = 'H', long = "metrics-host", value_name = "HOST")]
    pub metrics_host: Option<String>,

    /// Metrics collector port
    #[arg(short = 'p', long = "metrics-port", value_name = "PORT")]
    pub metrics_port: Option<u16>,

    /// Metric key the gauges are sent under (defaults depend on the strategy)
    #[arg(short = 'k', long = "metric-key", value_name = "KEY")]
    pub metric_key: Option<String>,

    /// How long a streaming pop waits for an element before the run ends
    #[arg(long = "pop-timeout-ms", value_name = "MILLIS")]
    pub pop_timeout_ms: Option<u64>,

    /// Connect timeout for each metrics connection
    #[arg(long = "connect-timeout-ms", value_name = "MILLIS")]
    pub connect_timeout_ms: Option<u64>,

    /// Log gauge lines instead of sending them
    #[arg(short = 'n', long = "dry-run", action = ArgAction::SetTrue)]
    pub dry_run: bool,

    /// Force coloured output
    #[arg(long = "color", action = ArgAction::SetTrue)]
    pub color: bool,

    /// Disable coloured output
    #[arg(long = "no-color", action = ArgAction::SetTrue, conflicts_with = "color")]
    pub no_color: bool,

    /// Colour preference from the config file
    #[arg(skip)]
    pub color_config: Option<bool>,

    /// Log level
    #[arg(short = 'l', long = "log-level", value_name = "LEVEL", value_parser = ["trace", "debug", "info", "warn", "error", "off"])]
    pub log_level: Option<String>,

    /// Log file path (use 'none' to disable file logging)
    #[arg(short = 'f', long = "log-file", value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// Log output format
    #[arg(short = 'o', long = "log-format", value_name = "FORMAT", value_parser = ["text", "ext", "json"])]
    pub log_format: Option<String>,
}

impl Args {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lay command line values over config file values
    ///
    /// Anything given on the command line wins; flags can only switch on.
    pub fn overlay(mut self, cli: Args) -> Self {
        fn pick<T>(target: &mut Option<T>, value: Option<T>) {
            if value.is_some() {
                *target = value;
            }
        }

        pick(&mut self.config_file, cli.config_file);
        pick(&mut self.strategy, cli.strategy);
        pick(&mut self.redis_url, cli.redis_url);
        pick(&mut self.queue, cli.queue);
        pick(&mut self.metrics_host, cli.metrics_host);
        pick(&mut self.metrics_port, cli.metrics_port);
        pick(&mut self.metric_key, cli.metric_key);
        pick(&mut self.pop_timeout_ms, cli.pop_timeout_ms);
        pick(&mut self.connect_timeout_ms, cli.connect_timeout_ms);
        pick(&mut self.log_level, cli.log_level);
        pick(&mut self.log_file, cli.log_file);
        pick(&mut self.log_format, cli.log_format);
        self.dry_run |= cli.dry_run;
        self.color |= cli.color;
        self.no_color |= cli.no_color;
        self
    }

    /// Whether to colour terminal output
    ///
    /// `--no-color` beats `--color`, which beats the config file; otherwise
    /// colour follows whether stdout is a terminal.
    pub fn color_enabled(&self) -> bool {
        use std::io::IsTerminal;

        if self.no_color {
            false
        } else if self.color {
            true
        } else {
            self.color_config
                .unwrap_or_else(|| std::io::stdout().is_terminal())
        }
    }

    /// Log file to write, with the magic values "none" and "-" disabling it
    pub fn log_file_path(&self) -> Option<PathBuf> {
        self.log_file
            .as_ref()
            .filter(|path| {
                let name = path.to_string_lossy();
                !(name.eq_ignore_ascii_case("none") || name == "-")
            })
            .cloned()
    }
}
