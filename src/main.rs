use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use gymkeeper::{
    api,
    config::Settings,
    db::Database,
    service::ServiceContext,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gymkeeper=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let settings = Settings::new().unwrap_or_else(|e| {
        tracing::warn!("Failed to load config: {}. Using defaults.", e);
        Settings::default()
    });

    tracing::info!("Starting Gymkeeper server on {}:{}", settings.server.host, settings.server.port);

    // Initialize database
    let db = Database::connect(&settings.database.url, settings.database.max_connections).await?;
    db.init_schema().await?;

    let service_context = Arc::new(ServiceContext::new(db, &settings));

    service_context.auth_service
        .bootstrap(
            &settings.auth.default_admin_username,
            &settings.auth.default_admin_password,
        )
        .await?;

    let expired = service_context.auth_service.cleanup_expired_sessions().await?;
    if expired > 0 {
        tracing::debug!("Removed {} expired session(s)", expired);
    }

    let app = api::create_app(service_context, Arc::new(settings.clone()));

    let listener = tokio::net::TcpListener::bind(
        format!("{}:{}", settings.server.host, settings.server.port)
    ).await?;

    tracing::info!("Server listening on http://{}:{}", settings.server.host, settings.server.port);

    axum::serve(listener, app).await?;

    Ok(())
}
