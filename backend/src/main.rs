//! Bistro Ledger - Backend Server

use std::net::SocketAddr;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use bistro_ledger_backend::{create_app, db, services::AuthService, AppState, Config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            "bistro_server=debug,bistro_ledger_backend=debug,tower_http=debug,sqlx=warn".into()
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::load()?;

    tracing::info!("Starting Bistro Ledger Server");
    tracing::info!("Environment: {}", config.environment);

    tracing::info!("Opening database {}", config.database.url);
    let db_pool = db::connect(&config.database).await?;

    tracing::info!("Running database migrations...");
    db::migrate(&db_pool).await?;
    tracing::info!("Migrations completed");

    AuthService::new(db_pool.clone(), &config)
        .bootstrap_default_user()
        .await?;

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;

    // Create application state
    let state = AppState::new(db_pool, config);
    let app = create_app(state);

    tracing::info!("Listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
