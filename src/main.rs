//! Onboard Flow server binary.
//!
//! Wires configuration, tracing, the PostgreSQL pool, and the HTTP router.

use std::sync::Arc;

use axum::http::HeaderValue;
use axum::Router;
use sqlx::postgres::PgPoolOptions;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use onboard_flow::adapters::http::{health_routes, onboarding_routes, OnboardingHandlers};
use onboard_flow::adapters::postgres::{PostgresAnswerRepository, PostgresFieldCatalog};
use onboard_flow::application::handlers::onboarding::{
    GetStatusHandler, StartOrResumeHandler, SubmitAnswerHandler,
};
use onboard_flow::config::AppConfig;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    config.validate()?;

    init_tracing(&config);

    let pool = PgPoolOptions::new()
        .min_connections(config.database.min_connections)
        .max_connections(config.database.max_connections)
        .acquire_timeout(config.database.acquire_timeout())
        .connect(&config.database.url)
        .await?;

    if config.database.run_migrations {
        tracing::info!("running database migrations");
        sqlx::migrate!("./migrations").run(&pool).await?;
    }

    let catalog = Arc::new(PostgresFieldCatalog::new(pool.clone()));
    let answers = Arc::new(PostgresAnswerRepository::new(pool));

    let handlers = OnboardingHandlers::new(
        Arc::new(StartOrResumeHandler::new(catalog.clone(), answers.clone())),
        Arc::new(SubmitAnswerHandler::new(catalog.clone(), answers.clone())),
        Arc::new(GetStatusHandler::new(catalog, answers)),
    );

    let app = Router::new()
        .merge(health_routes())
        .nest("/api/onboarding", onboarding_routes(handlers))
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(config.server.request_timeout()))
        .layer(cors_layer(&config));

    let addr = config.server.bind_addr();
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "onboard-flow listening");

    axum::serve(listener, app).await?;

    Ok(())
}

fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.server.log_level));

    if config.server.is_production() {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

fn cors_layer(config: &AppConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .server
        .cors_origins_list()
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    if origins.is_empty() {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    }
}
