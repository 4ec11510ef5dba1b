//! Chatbot HTTP API server binary.
//!
//! Connects the session store, builds the completion client, and serves the
//! REST API until Ctrl-C or SIGTERM.

use std::sync::Arc;
use std::time::Duration;

use chatbot_api::config::{ApiConfig, parse_origins};
use chatbot_core::completion::openai::OpenAiCompletion;
use chatbot_core::session::SessionStore;
use chatbot_core::session::memory::MemorySessionStore;
use chatbot_core::session::postgres::PgSessionStore;
use clap::Parser;
use sqlx::postgres::{PgPool, PgPoolOptions};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// CLI arguments for the API server.
///
/// Anything not given on the command line comes from the environment (see
/// [`ApiConfig::from_env`]).
#[derive(Parser, Debug)]
#[command(name = "chatbot_server", about = "Chatbot conversation API server")]
struct Args {
    /// Address to listen on. Overrides `BIND_ADDR`.
    #[arg(long)]
    bind_addr: Option<String>,

    /// PostgreSQL connection URL. Overrides `DATABASE_URL`.
    #[arg(long)]
    database_url: Option<String>,

    /// Maximum number of database connections in the pool.
    #[arg(long, default_value_t = 5)]
    max_connections: u32,

    /// Keep sessions in process memory instead of PostgreSQL.
    ///
    /// Sessions are lost on restart. Intended for local development.
    #[arg(long, default_value_t = false)]
    memory_store: bool,

    /// Comma-separated list of allowed CORS origins. Overrides
    /// `CORS_ALLOWED_ORIGINS`.
    #[arg(long)]
    cors_origins: Option<String>,
}

impl Args {
    /// Layer command-line overrides on top of `config`.
    fn apply(&self, config: &mut ApiConfig) {
        if let Some(addr) = &self.bind_addr {
            config.bind_addr = addr.clone();
        }
        if let Some(url) = &self.database_url {
            config.database_url = url.clone();
        }
        if let Some(origins) = &self.cors_origins {
            config.cors_allowed_origins = parse_origins(origins);
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,chatbot_api=debug,chatbot_core=debug".into()),
        )
        .init();

    let args = Args::parse();

    let mut config = ApiConfig::from_env();
    args.apply(&mut config);

    info!(
        bind_addr = %config.bind_addr,
        memory_store = args.memory_store,
        cors_origins = ?config.cors_allowed_origins,
        "starting chatbot_server"
    );

    let (store, pool): (Arc<dyn SessionStore>, Option<PgPool>) = if args.memory_store {
        warn!("using in-memory session store; sessions are lost on restart");
        let store: Arc<dyn SessionStore> = Arc::new(MemorySessionStore::new());
        (store, None)
    } else {
        info!(
            database_url = %config.database_url,
            max_connections = args.max_connections,
            "configuring connection pool"
        );
        let pool = PgPoolOptions::new()
            .max_connections(args.max_connections)
            .acquire_timeout(Duration::from_secs(30))
            .connect(&config.database_url)
            .await?;

        info!("running database migrations");
        chatbot_api::migrate(&pool).await?;

        let store: Arc<dyn SessionStore> = Arc::new(PgSessionStore::new(pool.clone()));
        (store, Some(pool))
    };

    if config.completion.api_key.is_none() {
        warn!("OPENAI_API_KEY is not set; chat requests will fail until it is");
    }
    info!(
        base_url = %config.completion.base_url,
        model = %config.completion.model,
        "completion provider configured"
    );
    let provider = Arc::new(OpenAiCompletion::new(config.completion.clone())?);

    let state = chatbot_api::AppState::new(store, provider, config.clone());
    let app = chatbot_api::router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    let local_addr = listener.local_addr()?;
    info!(addr = %local_addr, "REST API listening");

    let shutdown = CancellationToken::new();
    spawn_signal_listener(shutdown.clone());

    axum::serve(listener, app)
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await?;

    if let Some(pool) = pool {
        info!("closing database pool");
        pool.close().await;
    }
    info!("shutdown complete");

    Ok(())
}

/// Cancel `token` on Ctrl-C or (on Unix) SIGTERM.
fn spawn_signal_listener(token: CancellationToken) {
    tokio::spawn(async move {
        let ctrl_c = async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!("failed to listen for Ctrl-C: {e}");
                std::future::pending::<()>().await;
            }
        };

        #[cfg(unix)]
        let terminate = async {
            use tokio::signal::unix::{SignalKind, signal};
            match signal(SignalKind::terminate()) {
                Ok(mut sig) => {
                    sig.recv().await;
                }
                Err(e) => {
                    warn!("failed to listen for SIGTERM: {e}");
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

        info!("shutdown signal received");
        token.cancel();
    });
}
