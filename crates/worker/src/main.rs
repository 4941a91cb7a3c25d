//! City events background worker.
//!
//! Usage:
//!   cityevents-worker serve                          # scheduler + delivery workers
//!   cityevents-worker run-reminders [--deliver]      # one reminder run
//!   cityevents-worker run-digest [--deliver]         # one digest run
//!   cityevents-worker run-import --city spb --limit 20
//!   cityevents-worker drain                          # deliver queued jobs and exit

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cityevents_worker::{JobSummary, Scheduler, Services, WorkerConfig};

/// How long `serve` waits for running jobs after a shutdown signal.
const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Parser)]
#[command(name = "cityevents-worker", version, about = "City events scheduler and delivery worker")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the daily scheduler and the delivery worker pool until stopped.
    Serve,
    /// Build tomorrow's event reminders.
    RunReminders {
        /// Deliver the queued notifications before exiting.
        #[arg(long)]
        deliver: bool,
    },
    /// Build new-event digests.
    RunDigest {
        /// Deliver the queued notifications before exiting.
        #[arg(long)]
        deliver: bool,
    },
    /// Import listings from KudaGo.
    RunImport {
        /// KudaGo city code (defaults to IMPORT_CITY).
        #[arg(long)]
        city: Option<String>,
        /// Maximum number of listings to consider (defaults to IMPORT_LIMIT).
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Deliver every queued job once and exit.
    Drain,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cityevents_worker=debug,cityevents_notify=debug,cityevents_importer=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let config = WorkerConfig::from_env().context("Invalid worker configuration")?;

    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
    let pool = cityevents_db::create_pool(&database_url)
        .await
        .context("Failed to connect to database")?;
    cityevents_db::run_migrations(&pool)
        .await
        .context("Failed to run database migrations")?;
    tracing::info!("Database ready");

    let mailer = cityevents_notify::mailer_from_env().context("Invalid SMTP configuration")?;
    let services = Services::new(pool, &config, mailer).context("Failed to build services")?;

    match cli.command {
        Command::Serve => serve(services, &config).await?,
        Command::RunReminders { deliver } => {
            let summary = services.runner.run_reminders().await?;
            report(&summary)?;
            if deliver {
                drain(&services).await?;
            }
        }
        Command::RunDigest { deliver } => {
            let summary = services.runner.run_digest().await?;
            report(&summary)?;
            if deliver {
                drain(&services).await?;
            }
        }
        Command::RunImport { city, limit } => {
            let summary = services.runner.run_import(city.as_deref(), limit).await;
            report(&summary)?;
        }
        Command::Drain => drain(&services).await?,
    }

    Ok(())
}

async fn serve(services: Services, config: &WorkerConfig) -> Result<()> {
    let mut scheduler = Scheduler::with_default_schedule(config.utc_offset)
        .context("Invalid default schedule")?;
    scheduler.start(Arc::new(services.runner.clone()));

    let cancel = CancellationToken::new();
    let workers = services.workers.clone();
    let workers_cancel = cancel.clone();
    let workers_handle = tokio::spawn(async move { workers.run(workers_cancel).await });

    shutdown_signal().await;

    cancel.cancel();
    scheduler.shutdown(SHUTDOWN_TIMEOUT).await;
    match tokio::time::timeout(SHUTDOWN_TIMEOUT, workers_handle).await {
        Ok(joined) => joined.context("Delivery worker task panicked")?,
        Err(_) => tracing::warn!("Delivery workers did not stop in time"),
    }

    tracing::info!("Graceful shutdown complete");
    Ok(())
}

async fn drain(services: &Services) -> Result<()> {
    let delivered = services.workers.drain().await?;
    tracing::info!(delivered, "Queue drained");
    Ok(())
}

fn report(summary: &JobSummary) -> Result<()> {
    println!("{}", serde_json::to_string(summary)?);
    Ok(())
}

/// Wait for SIGINT (Ctrl-C) or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
