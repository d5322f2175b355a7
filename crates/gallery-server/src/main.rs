use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use tracing::{info, warn};

use gallery_api::AppStateInner;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gallery=debug,tower_http=debug".into()),
        )
        .init();

    // Config
    let host = std::env::var("GALLERY_HOST").unwrap_or_else(|_| "0.0.0.0".into());
    let port: u16 = std::env::var("GALLERY_PORT")
        .unwrap_or_else(|_| "3000".into())
        .parse()?;
    let db_path = std::env::var("GALLERY_DB_PATH").unwrap_or_else(|_| "gallery.db".into());
    let static_dir = std::env::var("GALLERY_STATIC_DIR").unwrap_or_else(|_| "static".into());
    let session_secret = std::env::var("GALLERY_SESSION_SECRET")
        .unwrap_or_else(|_| "dev-secret-change-me".into());
    if session_secret == "dev-secret-change-me" {
        warn!("GALLERY_SESSION_SECRET is unset; sessions are signed with the dev secret");
    }

    // Init database — failure to open the store is fatal
    let db = gallery_db::Database::open(&PathBuf::from(&db_path))?;

    let state = Arc::new(AppStateInner { db, session_secret });
    let app = gallery_server::app(state, &static_dir);

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    info!("Girls Goods Gallery listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = tokio::signal::ctrl_c();
    #[cfg(unix)]
    {
        let mut sigterm =
            tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
                .expect("failed to install SIGTERM handler");
        tokio::select! {
            _ = ctrl_c => info!("Received Ctrl+C, shutting down..."),
            _ = sigterm.recv() => info!("Received SIGTERM, shutting down..."),
        }
    }
    #[cfg(not(unix))]
    {
        ctrl_c.await.ok();
        info!("Received Ctrl+C, shutting down...");
    }
}
