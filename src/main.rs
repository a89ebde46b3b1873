use std::{net::IpAddr, path::PathBuf, sync::Arc, time::Duration};

use anyhow::Context;
use clap::Parser;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pageview_gate::{
    article::{InMemoryArticleStore, Seed},
    router, AppState, Config, PageviewQuota, SessionStore,
};

#[derive(Parser)]
#[command(name = "pageview-gate")]
#[command(about = "Article catalog with a per-session pageview quota")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Args {
    #[arg(short, long, env = "PAGEVIEW_GATE_PORT", default_value = "3000")]
    port: u16,

    #[arg(long, env = "PAGEVIEW_GATE_HOST", default_value = "127.0.0.1")]
    host: IpAddr,

    /// Article detail views allowed per session
    #[arg(long, env = "PAGEVIEW_LIMIT", default_value = "3")]
    pageview_limit: u32,

    /// Seconds of inactivity before a session (and its quota) is discarded
    #[arg(long, env = "PAGEVIEW_GATE_SESSION_TTL_SECS", default_value = "86400")]
    session_ttl_secs: u64,

    /// JSON catalog to load instead of the built-in demo articles
    #[arg(long, env = "PAGEVIEW_GATE_SEED")]
    seed: Option<PathBuf>,

    #[arg(long, env = "PAGEVIEW_GATE_DEBUG", default_value = "false")]
    debug: bool,
}

impl From<Args> for Config {
    fn from(args: Args) -> Self {
        Config {
            host: args.host,
            port: args.port,
            pageview_limit: args.pageview_limit,
            session_ttl: Duration::from_secs(args.session_ttl_secs),
            seed: args.seed,
            debug: args.debug,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = Config::from(Args::parse());

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.log_filter().into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let seed = match &config.seed {
        Some(path) => Seed::from_file(path)
            .await
            .with_context(|| format!("failed to load seed file {}", path.display()))?,
        None => Seed::demo().context("failed to load demo catalog")?,
    };

    let articles = InMemoryArticleStore::new();
    seed.apply(&articles)
        .await
        .context("failed to seed article store")?;

    let state = AppState::new(
        Arc::new(articles),
        PageviewQuota::new(config.pageview_limit),
        SessionStore::new(config.session_ttl),
    );
    let app = router(state);

    let bind_addr = config.bind_addr();
    let listener = TcpListener::bind(bind_addr)
        .await
        .with_context(|| format!("failed to bind to {bind_addr}"))?;

    info!("Article server started on {}", bind_addr);
    info!(
        "Pageview limit: {} per session, sessions idle out after {:?}",
        config.pageview_limit, config.session_ttl
    );
    info!("");
    info!("Usage:");
    info!("   curl http://{}/articles", bind_addr);
    info!("   curl -c jar -b jar http://{}/articles/1", bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    Ok(())
}

async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal");
        },
        _ = terminate => {
            info!("Received terminate signal");
        },
    }
}
