use anyhow::Context;
use blk_import::cli::Cli;
use blk_import::{ImportConfig, Pipeline, WriteMode};
use blk_storage::DatabaseSettings;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;


fn init_logging(json: bool) {
    let env_filter = tracing_subscriber::EnvFilter::builder().parse_lossy(
        std::env::var(tracing_subscriber::EnvFilter::DEFAULT_ENV).unwrap_or("info".to_string()),
    );

    if json {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .json()
            .with_current_span(false)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .compact()
            .init();
    }
}


fn main() -> anyhow::Result<()> {
    let args = <Cli as clap::Parser>::parse();

    init_logging(args.json_log);

    let config = ImportConfig::from_cli(&args)?;

    let shutdown = Arc::new(AtomicBool::new(false));
    let shutdown_flag = shutdown.clone();
    ctrlc::set_handler(move || {
        tracing::warn!("interrupt received, stopping after the current file");
        shutdown_flag.store(true, Ordering::SeqCst);
    })
    .context("failed to set signal handler")?;

    let summary = if config.dry_run {
        Pipeline::new(&config, WriteMode::DryRun)
            .with_shutdown(shutdown)
            .run()?
    } else {
        let db = DatabaseSettings::default().open(&config.database_dir)?;
        let summary = Pipeline::new(&config, WriteMode::Live(&db))
            .with_shutdown(shutdown)
            .run()?;
        if let Err(err) = db.flush() {
            summary.log_flush_failure(&err);
        }
        summary
    };

    summary.log();
    Ok(())
}
