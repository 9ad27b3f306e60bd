//! Binary entry point: arguments, config, logging, then one pipeline run

use super::cli::{Args, Settings};
use super::error::AppError;
use crate::core::error_handling::log_error_with_context;
use crate::core::logging::init_logging;
use crate::core::version::{build_time, git_hash};
use crate::pipeline::{Pipeline, RunReport};
use crate::queue::{QueueSource, RedisQueue};
use crate::sink::{GraphiteSink, MetricsSink, RecordingSink};
use clap::Parser;
use std::process::ExitCode;
use std::sync::Arc;

/// Parse arguments, run once and report
pub async fn startup() -> ExitCode {
    let cli = Args::parse();

    // The config file may choose the log destination, so settle it before
    // installing the logger and report any problem with it afterwards.
    let resolved = Args::with_config_file(cli.clone())
        .await
        .map_err(AppError::from)
        .and_then(|args| args.resolve().map_err(AppError::from));

    // clap has already checked the command line's own logging values
    let logging = match &resolved {
        Ok(settings) => settings.logging.clone(),
        Err(_) => cli.logging().unwrap_or_default(),
    };
    if let Err(e) = init_logging(
        logging.level.as_deref(),
        logging.format,
        logging.file.as_ref().and_then(|path| path.to_str()),
        logging.color,
    ) {
        eprintln!("Error: failed to initialise logging: {}", e);
        return ExitCode::FAILURE;
    }

    log::info!(
        "lightsync {} starting (built {}, {})",
        env!("CARGO_PKG_VERSION"),
        build_time(),
        git_hash()
    );

    let settings = match resolved {
        Ok(settings) => settings,
        Err(e) => {
            log_error_with_context(&e, "Configuration loading");
            return ExitCode::FAILURE;
        }
    };
    log::debug!("Settings: {:#?}", settings);

    match run(&settings).await {
        Ok(report) => {
            println!("{}", report);
            ExitCode::SUCCESS
        }
        Err(e) => {
            log_error_with_context(&e, "Pipeline run");
            if let AppError::Pipeline(failed) = &e {
                println!("{}", failed.report());
            }
            ExitCode::FAILURE
        }
    }
}

/// Connect to redis and run the pipeline once
pub async fn run(settings: &Settings) -> Result<RunReport, AppError> {
    let mut queue = RedisQueue::connect(&settings.redis_url).await?;
    run_with(settings, &mut queue).await
}

/// Run the pipeline once against an already opened queue
pub async fn run_with(
    settings: &Settings,
    source: &mut dyn QueueSource,
) -> Result<RunReport, AppError> {
    let pipeline = Pipeline::new(
        settings.strategy,
        settings.pipeline.clone(),
        build_sink(settings),
    );
    Ok(pipeline.run(source).await?)
}

fn build_sink(settings: &Settings) -> Arc<dyn MetricsSink> {
    if settings.dry_run {
        log::info!("Dry run: gauge lines are logged, not sent");
        return Arc::new(RecordingSink::new());
    }
    Arc::new(
        GraphiteSink::new(&settings.metrics_host, settings.metrics_port)
            .with_connect_timeout(settings.connect_timeout),
    )
}
