mod auth;
mod db;
mod error;
mod extract;
mod message;
mod middleware;
mod pagination;
mod routes;
mod state;
mod user;

#[cfg(test)]
mod test_support;

use anyhow::Context;
use db::{create_pool, run_migrations};
use message::{MessageService, PgMessageRepository};
use routes::create_router;
use state::{AppState, Config};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use user::PgUserRepository;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenv::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,dating_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Arc::new(Config::from_env().context("Failed to load configuration")?);

    // Sanitize URL for logging (hide password)
    let url_for_logging = config
        .database_url
        .rsplit('@')
        .next()
        .map(|host| format!("<hidden>@{}", host))
        .unwrap_or_else(|| "<invalid format>".to_string());

    tracing::info!("Connecting to database at {}...", url_for_logging);
    let db = create_pool(&config.database_url, config.database_max_connections)
        .await
        .with_context(|| format!("Failed to connect to database at {}", url_for_logging))?;

    tracing::info!("Running migrations...");
    run_migrations(&db).await.context("Failed to run migrations")?;

    // Create repositories
    let user_repository = Arc::new(PgUserRepository::new(db.clone()));
    let message_repository = Arc::new(PgMessageRepository::new(db.clone()));

    let message_service = MessageService::new(message_repository, user_repository.clone());

    let state = AppState {
        config: config.clone(),
        user_repository,
        message_service,
    };

    let app = create_router(state);

    let addr = config.bind_address();
    tracing::info!("Server starting on http://{}", addr);
    tracing::info!("Swagger UI available at http://{}/swagger-ui", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, app).await?;

    Ok(())
}
