use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;

use stratus_backend::CloudClient;
use stratus_dispatch::{Dispatcher, HttpClassifier, OperationRegistry, SessionStore};
use stratus_resolver::EntityResolver;
use stratus_server::router;

#[derive(Parser)]
#[command(name = "stratus")]
#[command(about = "Chatbot dispatch engine for cloud-management accounts", long_about = None)]
#[command(version)]
struct Cli {
    /// Address to serve on
    #[arg(long, env = "STRATUS_BIND", default_value = "127.0.0.1:4567")]
    bind: SocketAddr,

    /// Base URL of the cloud-management API
    #[arg(long, env = "STRATUS_BACKEND_URL")]
    backend_url: String,

    /// URL of the intent classifier service
    #[arg(long, env = "STRATUS_CLASSIFIER_URL")]
    classifier_url: String,

    /// Timeout for a single backend or classifier call, in seconds
    #[arg(long, env = "STRATUS_REQUEST_TIMEOUT_SECS", default_value_t = 30)]
    request_timeout_secs: u64,

    /// Idle time after which a paused wizard is evicted, in seconds
    #[arg(long, env = "STRATUS_SESSION_TTL_SECS", default_value_t = 900)]
    session_ttl_secs: u64,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Quiet mode: log only warnings/errors
    #[arg(long)]
    quiet: bool,
}

fn init_logging(verbose: bool, quiet: bool) {
    let default_filter = if quiet {
        "warn"
    } else if verbose {
        "debug"
    } else {
        "info"
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .target(env_logger::Target::Stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    let timeout = Duration::from_secs(cli.request_timeout_secs);
    let client = CloudClient::new(&cli.backend_url, timeout)
        .context("cannot build backend client")?;
    let classifier = HttpClassifier::new(&cli.classifier_url, timeout)
        .context("cannot build classifier client")?;

    let dispatcher = Dispatcher::new(
        OperationRegistry::standard(),
        Box::new(classifier),
        SessionStore::new(Duration::from_secs(cli.session_ttl_secs)),
        Arc::new(client),
        Arc::new(EntityResolver::default()),
    );

    let app = router(Arc::new(dispatcher));
    let listener = tokio::net::TcpListener::bind(cli.bind)
        .await
        .with_context(|| format!("cannot bind {}", cli.bind))?;
    log::info!("serving on {}", cli.bind);
    axum::serve(listener, app).await.context("server failed")?;
    Ok(())
}
