// Copyright (c) 2025 sbksba
//
// This software is licensed under the terms of the MIT License.
// See the LICENSE file in the project root for the full license text.
use axum::{Router, http::HeaderName};
use clap::Parser;
use server::config::{Config, StoreKind};
use server::database::{self, SqliteStore};
use server::routes;
use server::store::MemoryStore;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "server=info,tower_http=info".into()),
        )
        .init();

    tracing::info!("Starting up the server...");

    let app_routes = match config.store {
        StoreKind::Sqlite => {
            let db_pool = match database::establish_connection_pool(&config.database_url).await {
                Ok(pool) => {
                    tracing::info!("Database connection was made successfully.");
                    pool
                }
                Err(e) => {
                    tracing::error!("Failed to connect with the database: {:?}", e);
                    std::process::exit(1);
                }
            };
            routes::create_router(SqliteStore::new(db_pool))
        }
        StoreKind::Memory => {
            tracing::warn!("Using the in-memory store, tasks will not survive a restart.");
            routes::create_router(MemoryStore::new())
        }
    };

    let app = with_layers(app_routes);

    let addr = config.addr();
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("The server listens on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped.");
    Ok(())
}

/// Applies CORS and request tracing to the router.
fn with_layers(app: Router) -> Router {
    let cors = CorsLayer::new()
        .allow_methods(Any)
        .allow_headers([
            HeaderName::from_static("content-type"),
            HeaderName::from_static("accept"),
        ])
        .allow_origin(Any);

    app.layer(cors).layer(TraceLayer::new_for_http())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {:?}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received.");
}
