//! TTL Cache - interactive host
//!
//! Drives a cache from line commands on stdin while the periodic sweep runs in
//! the background.

use anyhow::Context;
use tokio::io::AsyncWriteExt;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ttl_cache::cli::{execute_line, spawn_line_reader, HostCache, Reply, HELP_TEXT};
use ttl_cache::tasks::spawn_sweep_task_from_config;
use ttl_cache::CacheConfig;

/// Main entry point for the interactive cache host.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging (stderr)
/// 2. Load configuration from environment variables
/// 3. Create the cache
/// 4. Start the periodic expiry sweep
/// 5. Serve commands from stdin until EOF, QUIT or Ctrl+C
/// 6. Stop the sweep
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ttl_cache=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = CacheConfig::from_env();
    info!(
        max_entries = config.max_entries,
        default_ttl = ?config.default_ttl,
        sweep_interval_ms = config.sweep_interval.as_millis() as u64,
        overflow_policy = %config.overflow_policy,
        "Configuration loaded"
    );

    let cache = HostCache::from_config(&config).context("failed to create cache")?;
    let sweep = spawn_sweep_task_from_config(cache.clone(), &config)
        .context("failed to start expiry sweep")?;

    let mut stdout = tokio::io::stdout();
    stdout.write_all(format!("{}\n", HELP_TEXT).as_bytes()).await?;
    stdout.flush().await?;

    tokio::select! {
        result = serve(&cache, &mut stdout) => result?,
        _ = shutdown_signal() => {}
    }

    sweep.stop().await;
    info!(stats = ?cache.stats(), "Shutdown complete");
    Ok(())
}

/// Reads commands from stdin until EOF or QUIT.
async fn serve(cache: &HostCache, stdout: &mut tokio::io::Stdout) -> anyhow::Result<()> {
    // Stdin is read on its own thread so Ctrl+C never waits on a pending read
    let mut lines = spawn_line_reader(std::io::BufReader::new(std::io::stdin()))
        .context("failed to start stdin reader")?;

    while let Some(line) = lines.recv().await {
        let line = line.context("failed to read stdin")?;
        let Some(reply) = execute_line(cache, &line) else {
            continue;
        };

        stdout.write_all(format!("{}\n", reply).as_bytes()).await?;
        stdout.flush().await?;

        if reply == Reply::Quit {
            break;
        }
    }

    Ok(())
}

/// Waits for Ctrl+C.
async fn shutdown_signal() {
    match signal::ctrl_c().await {
        Ok(()) => info!("Received Ctrl+C, initiating shutdown..."),
        Err(err) => {
            warn!(error = %err, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    }
}
