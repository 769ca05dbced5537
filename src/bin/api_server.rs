// src/bin/api_server.rs

use sheet_console::infra::sheets;
use sheet_console::transport;
use sheet_console::{AppConfig, SheetBackend};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,sheet_console=debug,tower_http=info")),
        )
        .with_target(true)
        .init();

    // --- Configuration ---
    let config = AppConfig::from_env()?;
    tracing::info!(
        bind_addr = %config.bind_addr,
        dev_mode = config.dev_mode(),
        user_sheet = %config.user_sheet,
        product_sheet = %config.product_sheet,
        "Configuration loaded"
    );

    // --- Backing store ---
    let backend = sheets::connect(&config)?;
    match backend.ping().await {
        Ok(()) => tracing::info!(mode = backend.mode().as_str(), "Backing store reachable"),
        Err(e) => tracing::warn!(
            error = %e,
            "Backing store unreachable at startup; requests will fail until it recovers"
        ),
    }

    let app_state =
        transport::http::AppState::new(backend, &config.user_sheet, &config.product_sheet);

    // --- API Server Initialization ---
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);
    let app = transport::http::create_router(app_state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", transport::http::ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .layer(cors);
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("API server listening on http://{}", config.bind_addr);
    tracing::info!("Swagger UI available at http://{}/swagger-ui", config.bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            }
            tracing::info!("Shutdown signal received");
        })
        .await?;

    tracing::info!("Graceful shutdown complete");
    Ok(())
}
