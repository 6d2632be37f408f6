use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;
use taskboard_kanban::store::Store;
use taskboard_server::{router, AppState, ServerConfig};
use tokio::net::TcpListener;
use tracing::{debug, info};

/// How often expired sessions are swept from memory
const SESSION_SWEEP_INTERVAL: Duration = Duration::from_secs(600);

#[derive(Debug, Parser)]
#[command(name = "taskboard", version, about = "Kanban board server")]
struct Cli {
    /// Config file (default: ./taskboard.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log at debug level
    #[arg(long, global = true)]
    debug: bool,

    /// Log errors only
    #[arg(long, global = true, conflicts_with = "debug")]
    quiet: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the HTTP server (default)
    Serve,
    /// Create or upgrade the database schema and exit
    Migrate,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = ServerConfig::load(cli.config.as_deref()).context("loading configuration")?;
    configure_logging(&config.log_level, cli.debug, cli.quiet);

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(config).await,
        Command::Migrate => migrate(config).await,
    }
}

fn configure_logging(default_level: &str, debug: bool, quiet: bool) {
    use tracing_subscriber::{fmt, prelude::*, registry, EnvFilter};

    let level = if quiet {
        "error"
    } else if debug {
        "debug"
    } else {
        default_level
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("tower_http=info,{level}")));

    registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}

async fn migrate(config: ServerConfig) -> Result<()> {
    Store::open_with_timeout(&config.database_path, config.busy_timeout())
        .await
        .with_context(|| format!("migrating {}", config.database_path.display()))?;
    info!(database = %config.database_path.display(), "schema is up to date");
    Ok(())
}

async fn serve(config: ServerConfig) -> Result<()> {
    let state = AppState::from_config(&config)
        .await
        .with_context(|| format!("opening {}", config.database_path.display()))?;

    let sessions = state.sessions.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(SESSION_SWEEP_INTERVAL);
        loop {
            interval.tick().await;
            let purged = sessions.purge_expired();
            if purged > 0 {
                debug!(purged, "swept expired sessions");
            }
        }
    });

    let listener = TcpListener::bind(&config.bind)
        .await
        .with_context(|| format!("binding {}", config.bind))?;
    info!(
        address = %listener.local_addr()?,
        database = %config.database_path.display(),
        "taskboard listening"
    );

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("taskboard stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown requested");
}
