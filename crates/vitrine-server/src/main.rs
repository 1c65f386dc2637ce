mod api;
mod store;

use std::net::SocketAddr;
use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use crate::api::{build_app, AppState};
use crate::store::{CounterStore, MemoryStore, RestStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let log_level = std::env::var("VITRINE_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
    let env_filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(log_level))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let bind_addr: SocketAddr = std::env::var("VITRINE_BIND_ADDR")
        .unwrap_or_else(|_| "0.0.0.0:3000".to_string())
        .parse()?;

    let store = build_store()?;
    let app = build_app(AppState {
        store: Arc::new(store),
    });

    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    tracing::info!(%bind_addr, "pixel endpoint listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

/// REST store when `VITRINE_KV_REST_URL`/`VITRINE_KV_REST_TOKEN` are both
/// set; otherwise an in-memory store whose counts vanish on restart.
fn build_store() -> anyhow::Result<CounterStore> {
    let url = std::env::var("VITRINE_KV_REST_URL").ok();
    let token = std::env::var("VITRINE_KV_REST_TOKEN").ok();

    match (url, token) {
        (Some(url), Some(token)) => Ok(CounterStore::Rest(RestStore::new(&url, &token, 10)?)),
        _ => {
            tracing::warn!(
                "VITRINE_KV_REST_URL/VITRINE_KV_REST_TOKEN not set; using in-memory counters"
            );
            Ok(CounterStore::Memory(MemoryStore::default()))
        }
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to listen for ctrl-c");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
