use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

use livewatch_core::tasks::DEFAULT_POLL_INTERVAL;

mod config;
mod context;
mod discord;

use config::{parse_poll_seconds, AppConfig};
use context::ServerContext;

#[derive(Parser, Debug, Clone)]
#[command(name = "livewatch")]
#[command(author, version, about = "Posts to a Discord channel when tracked Twitch streamers go live")]
struct Args {
    /// Load environment variables from this file instead of ./.env
    #[arg(long)]
    env_file: Option<String>,

    /// Override POLL_SECONDS
    #[arg(long)]
    poll_seconds: Option<String>,

    /// Tracing filter used when RUST_LOG is unset or empty
    #[arg(long, default_value = DEFAULT_LOG_FILTER)]
    log_filter: String,
}

const DEFAULT_LOG_FILTER: &str = "warn,livewatch=info,livewatch_core=info";

/// RUST_LOG wins whenever it carries any directive.
fn build_env_filter(rust_log: Option<&str>, default_filter: &str) -> EnvFilter {
    match rust_log.map(str::trim).filter(|s| !s.is_empty()) {
        Some(directives) => EnvFilter::new(directives),
        None => EnvFilter::new(default_filter),
    }
}

fn init_tracing(default_filter: &str) {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let filter = build_env_filter(rust_log.as_deref(), default_filter);
    let sub = fmt().with_env_filter(filter).finish();
    if tracing::subscriber::set_global_default(sub).is_err() {
        eprintln!("A global tracing subscriber was already installed.");
    }
}

fn load_env(args: &Args) {
    let loaded = match &args.env_file {
        Some(path) => dotenv::from_filename(path).map(|_| ()),
        None => dotenv::dotenv().map(|_| ()),
    };
    if let Err(e) = loaded {
        info!("No .env loaded ({e}); using the process environment.");
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl-C: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!("Failed to listen for SIGTERM: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(&args.log_filter);
    load_env(&args);

    let mut config = AppConfig::from_env()?;
    if let Some(raw) = &args.poll_seconds {
        config.poll_interval = parse_poll_seconds(raw)?;
    }

    info!(
        "livewatch starting. channel={}, streamers={}, interval={}s{}",
        config.channel_id,
        config.streamers.len(),
        config.poll_interval.as_secs(),
        if config.poll_interval == DEFAULT_POLL_INTERVAL { " (default)" } else { "" }
    );

    let ctx = ServerContext::new(config)?;
    if let Err(e) = ctx.run(shutdown_signal()).await {
        error!("Server error: {e}");
        return Err(e.into());
    }

    info!("Main finished. Goodbye!");
    Ok(())
}
