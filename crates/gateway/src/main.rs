//! Courtside API Gateway
//!
//! The entry point for all external API requests.
//! Handles:
//! - Authentication (toggleable bearer-token middleware)
//! - Rate limiting
//! - Request routing
//! - Observability (logging, metrics, tracing)

mod handlers;
mod middleware;

use axum::{
    extract::Request,
    middleware::Next,
    routing::{get, post},
    Router,
};
use courtside_common::{
    auth::JwtManager,
    config::AppConfig,
    db::{DbPool, Repository},
    maintenance::MaintenanceWorkflow,
    metrics,
};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use tracing::info;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub db: DbPool,
    pub repo: Repository,
    pub workflow: MaintenanceWorkflow,
    pub jwt: Arc<JwtManager>,
    pub fallback_user_id: Uuid,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .json()
        .init();

    info!("Starting Courtside API Gateway v{}", courtside_common::VERSION);

    // Load configuration
    let config = AppConfig::load().map_err(|e| {
        tracing::error!(error = %e, "Failed to load configuration");
        e
    })?;

    let config = Arc::new(config);

    // Initialize metrics
    metrics::register_metrics();

    if config.observability.metrics_port != 0 {
        PrometheusBuilder::new()
            .with_http_listener(([0, 0, 0, 0], config.observability.metrics_port))
            .set_buckets_for_metric(
                Matcher::Suffix("duration_seconds".to_string()),
                metrics::LATENCY_BUCKETS,
            )?
            .install()?;
        info!(
            port = config.observability.metrics_port,
            "Prometheus exporter listening"
        );
    }

    // User attributed to mutations while auth enforcement is disabled
    let fallback_user_id = Uuid::parse_str(&config.auth.fallback_user_id).map_err(|e| {
        tracing::error!(error = %e, "Invalid auth.fallback_user_id");
        e
    })?;

    // Initialize database connection
    info!("Connecting to database...");
    let db = DbPool::new(&config.database).await?;

    let repo = Repository::new(db.clone());
    let workflow = MaintenanceWorkflow::from_config(repo.clone(), &config.business);
    let jwt = Arc::new(JwtManager::from_config(&config.auth));

    if !config.auth.enabled {
        tracing::warn!(
            fallback_user_id = %fallback_user_id,
            "Authentication is DISABLED; requests run as the fallback user"
        );
    }

    // Create app state
    let state = AppState {
        config: config.clone(),
        db,
        repo,
        workflow,
        jwt,
        fallback_user_id,
    };

    // Build the router
    let app = create_router(state);

    // Start the server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Create the main application router
fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Request ID propagation
    let request_id = SetRequestIdLayer::x_request_id(MakeRequestUuid);
    let propagate_id = PropagateRequestIdLayer::x_request_id();

    // Token endpoints stay reachable without credentials
    let public_routes = Router::new()
        .route("/auth/register", post(handlers::auth::register))
        .route("/auth/login", post(handlers::auth::login))
        .route("/auth/refresh", post(handlers::auth::refresh));

    // Everything else runs behind the auth middleware
    let protected_routes = Router::new()
        .route("/auth/me", get(handlers::auth::me))
        // User endpoints
        .route("/users", get(handlers::users::list_users))
        .route(
            "/users/{id}",
            get(handlers::users::get_user)
                .put(handlers::users::update_user)
                .delete(handlers::users::delete_user),
        )
        // Client endpoints
        .route(
            "/clients",
            get(handlers::clients::list_clients).post(handlers::clients::create_client),
        )
        .route(
            "/clients/with-rackets",
            post(handlers::clients::create_client_with_rackets),
        )
        .route(
            "/clients/{id}",
            get(handlers::clients::get_client)
                .put(handlers::clients::update_client)
                .delete(handlers::clients::delete_client),
        )
        // Category endpoints
        .route(
            "/categories",
            get(handlers::categories::list_categories).post(handlers::categories::create_category),
        )
        .route(
            "/categories/{id}",
            get(handlers::categories::get_category)
                .put(handlers::categories::update_category)
                .delete(handlers::categories::delete_category),
        )
        // Product endpoints
        .route(
            "/products",
            get(handlers::products::list_products).post(handlers::products::create_product),
        )
        .route(
            "/products/low-stock",
            get(handlers::products::low_stock_products),
        )
        .route(
            "/products/{id}",
            get(handlers::products::get_product)
                .put(handlers::products::update_product)
                .delete(handlers::products::delete_product),
        )
        // Racket endpoints
        .route(
            "/rackets",
            get(handlers::rackets::list_rackets).post(handlers::rackets::create_racket),
        )
        .route(
            "/rackets/{id}",
            get(handlers::rackets::get_racket)
                .put(handlers::rackets::update_racket)
                .delete(handlers::rackets::delete_racket),
        )
        .route("/rackets/{id}/history", get(handlers::reports::racket_history))
        // Maintenance endpoints
        .route(
            "/maintenance",
            get(handlers::maintenance::list_records).post(handlers::maintenance::create_record),
        )
        .route(
            "/maintenance/{id}",
            get(handlers::maintenance::get_record)
                .put(handlers::maintenance::update_record)
                .delete(handlers::maintenance::delete_record),
        )
        // Reporting endpoints
        .route("/reports/product-usage", get(handlers::reports::product_usage))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::auth::auth_middleware,
        ));

    let api_routes = public_routes.merge(protected_routes);

    // Compose the app
    let mut app = Router::new()
        .route("/", get(handlers::health::root))
        .route("/health", get(handlers::health::health))
        .route("/ready", get(handlers::health::ready))
        .nest("/api/v1", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(request_id)
        .layer(propagate_id)
        .with_state(state.clone());

    if state.config.rate_limit.enabled {
        let limiter = middleware::rate_limit::create_rate_limiter(
            state.config.rate_limit.requests_per_second,
            state.config.rate_limit.burst,
        );
        app = app.layer(axum::middleware::from_fn(
            move |request: Request, next: Next| {
                let limiter = limiter.clone();
                async move {
                    middleware::rate_limit::rate_limit_middleware(request, next, limiter).await
                }
            },
        ));
    }

    app
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, starting shutdown..."),
        _ = terminate => info!("Received SIGTERM, starting shutdown..."),
    }
}
