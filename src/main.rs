use recipe_api::{config::Settings, db, routes, AppState};

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "recipe_api=debug,tower_http=debug,axum::rejection=trace".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let settings = Settings::from_env();

    // Database connection
    let pool = db::create_pool(&settings.database_url).await?;

    // Run migrations
    db::run_migrations(&pool).await?;
    tracing::info!("Database migrations applied");

    tokio::fs::create_dir_all(&settings.media_root).await?;

    let bind_address = settings.bind_address;
    let app = routes::create_router(AppState::new(pool, settings));

    let listener = tokio::net::TcpListener::bind(bind_address).await?;
    tracing::info!("Listening on {}", bind_address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
    tracing::info!("Shutting down");
}
