use std::path::Path;
use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::sync::watch;

use crate::app::{AppContext, MatchcastError, Result};
use crate::config::Config;
use crate::daemon::Daemon;
use crate::domain::MatchRecord;
use crate::extractor::Extractor;
use crate::server;

pub async fn serve(ctx: AppContext, allow_empty_start: bool) -> Result<()> {
    let schedule = ctx.schedule()?;
    startup_refresh(&ctx, allow_empty_start).await?;

    let listener = TcpListener::bind(ctx.config.server.bind_addr()).await?;

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let daemon = Daemon::new(
        ctx.refresher.clone(),
        Arc::new(schedule),
        ctx.config.schedule.report_interval(),
    );
    let scheduler = tokio::spawn(async move { daemon.run(shutdown_rx).await });

    server::serve(listener, ctx.store.clone(), shutdown_signal()).await?;

    let _ = shutdown_tx.send(true);
    if let Err(e) = scheduler.await {
        tracing::error!("Scheduler task failed: {}", e);
    }

    Ok(())
}

/// Refresh once before serving, when configured to.
///
/// A failure is returned unless `allow_empty_start` is set, in which case it
/// is logged and the store stays as it was.
pub async fn startup_refresh(ctx: &AppContext, allow_empty_start: bool) -> Result<()> {
    if !ctx.config.schedule.refresh_on_start {
        tracing::info!("Skipping startup refresh");
        return Ok(());
    }

    match ctx.refresher.refresh().await {
        Ok(_) => Ok(()),
        Err(e) if allow_empty_start => {
            tracing::warn!("Startup refresh failed, serving an empty store: {}", e);
            Ok(())
        }
        Err(e) => Err(e),
    }
}

pub async fn fetch(ctx: &AppContext, url: Option<&str>, day: Option<&str>) -> Result<()> {
    let url = url.unwrap_or(ctx.refresher.url());
    let records = ctx.refresher.scrape(url).await?;
    print_records(&filter_day(records, day))
}

pub fn parse_file(config: &Config, path: &Path, day: Option<&str>) -> Result<()> {
    let markup = std::fs::read_to_string(path)?;
    let extractor = Extractor::new(&config.source.content_selector)?;
    let records = extractor.extract(&markup)?;
    print_records(&filter_day(records, day))
}

pub fn config_init(path: Option<&Path>, force: bool) -> Result<()> {
    let path = match path {
        Some(p) => p.to_path_buf(),
        None => Config::default_config_path()?,
    };
    Config::write_default(&path, force)?;
    println!("Wrote default config to {}", path.display());
    Ok(())
}

pub fn config_show(config: &Config) -> Result<()> {
    let rendered =
        toml::to_string_pretty(config).map_err(|e| MatchcastError::Other(e.to_string()))?;
    print!("{}", rendered);
    Ok(())
}

fn filter_day(records: Vec<MatchRecord>, day: Option<&str>) -> Vec<MatchRecord> {
    match day {
        Some(day) => records.into_iter().filter(|r| r.is_on(day)).collect(),
        None => records,
    }
}

fn print_records(records: &[MatchRecord]) -> Result<()> {
    if records.is_empty() {
        eprintln!("No matches found");
    }
    println!("{}", serde_json::to_string_pretty(records)?);
    Ok(())
}

/// Resolves on SIGINT, or SIGTERM on unix.
async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = sigterm.recv() => {},
                    _ = tokio::signal::ctrl_c() => {},
                }
            }
            Err(e) => {
                tracing::warn!("Failed to set up SIGTERM handler: {}", e);
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }

    #[cfg(windows)]
    {
        let _ = tokio::signal::ctrl_c().await;
    }

    tracing::info!("Shutdown signal received");
}
