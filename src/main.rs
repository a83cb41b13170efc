use axum::{
    middleware as axum_middleware,
    routing::{delete, get, post, put},
    Router,
};
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info};

use vertex_portal_api::config::Config;
use vertex_portal_api::middleware::auth::auth_middleware;
use vertex_portal_api::middleware::rate_limit::{
    contact_rate_limit_middleware, ContactRateLimiter,
};
use vertex_portal_api::middleware::security_headers::security_headers_middleware;
use vertex_portal_api::services::chatbot::ChatClient;
use vertex_portal_api::services::rates::RateClient;
use vertex_portal_api::{database, handlers, services, websocket, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenv::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "vertex_portal_api=debug,tower_http=debug".into()),
        )
        .init();

    info!("Starting Vertex portal API server...");

    let config = Arc::new(Config::from_env()?);
    info!("Configuration loaded");

    let db_pool = database::new_pool(&config.database_url).await?;
    info!("Database connection pool created");

    database::run_migrations(&db_pool).await?;
    info!("Database migrations applied");

    // Seed the admin account and the service catalog on an empty database
    services::seed_data::seed_initial_data(&db_pool).await?;

    let broadcast_tx = websocket::create_broadcast_channel();
    info!("WebSocket broadcast channel created");

    let app_state = AppState {
        db_pool: db_pool.clone(),
        config: config.clone(),
        rates: RateClient::new(&config.rates_api_url),
        chat: ChatClient::new(&config.chat_webhook_url),
        broadcast_tx: broadcast_tx.clone(),
    };

    // One submission per window per IP on the public contact form
    let contact_limiter = ContactRateLimiter::new(1, config.contact_rate_limit_seconds);

    let app = Router::new()
        // Public site
        .route("/", get(handlers::landing_page))
        .route("/health", get(health_check))
        .route("/api/auth/login", post(handlers::login))
        .route("/api/chat", post(handlers::chat))
        .route("/api/payments/checkout", post(handlers::checkout))
        .route("/api/content/services", get(handlers::list_services))
        .route("/api/content/products", get(handlers::list_products))
        .route(
            "/api/contact-requests",
            post(handlers::create_contact_request).route_layer(
                axum_middleware::from_fn_with_state(
                    contact_limiter,
                    contact_rate_limit_middleware,
                ),
            ),
        )
        // Associate portal
        .route("/api/profile", get(handlers::get_my_profile))
        .route("/api/profile", put(handlers::update_my_profile))
        .route("/api/projects", get(handlers::my_projects))
        .route("/api/projects/:id/logs", get(handlers::list_logs))
        .route("/api/messages", get(handlers::my_messages))
        .route("/api/messages", post(handlers::send_message))
        .route("/api/messages/:id/read", put(handlers::mark_message_read))
        // Back office: associates and their projects
        .route("/api/admin/associates", get(handlers::list_associates))
        .route("/api/admin/associates", post(handlers::create_associate))
        .route("/api/admin/associates/:id", get(handlers::get_associate))
        .route("/api/admin/associates/:id", put(handlers::update_associate))
        .route(
            "/api/admin/associates/:id/projects",
            get(handlers::list_projects_for_associate),
        )
        .route(
            "/api/admin/associates/:id/projects",
            post(handlers::create_project),
        )
        .route("/api/admin/projects/:id", delete(handlers::delete_project))
        .route(
            "/api/admin/projects/:id/status",
            put(handlers::update_project_status),
        )
        .route(
            "/api/admin/projects/:id/hours",
            put(handlers::update_project_hours),
        )
        .route("/api/admin/projects/:id/logs", get(handlers::list_logs))
        .route("/api/admin/projects/:id/logs", post(handlers::manual_log))
        // Back office: the work timer
        .route("/api/admin/timer", get(handlers::timer_status))
        .route("/api/admin/timer/start", post(handlers::start_timer))
        .route("/api/admin/timer/stop", post(handlers::stop_timer))
        // Back office: finances
        .route("/api/admin/financials", get(handlers::list_records))
        .route("/api/admin/financials", post(handlers::create_record))
        .route("/api/admin/financials/rates", get(handlers::get_rates))
        .route("/api/admin/financials/:id", delete(handlers::delete_record))
        // Back office: contact inbox
        .route(
            "/api/admin/contact-requests",
            get(handlers::list_contact_requests),
        )
        .route(
            "/api/admin/contact-requests/:id/read",
            put(handlers::mark_contact_request_read),
        )
        .route(
            "/api/admin/contact-requests/:id",
            delete(handlers::delete_contact_request),
        )
        // Back office: messaging and brands
        .route(
            "/api/admin/messages/:user_id",
            get(handlers::admin_thread),
        )
        .route(
            "/api/admin/messages/:user_id",
            post(handlers::admin_send_message),
        )
        .route("/api/admin/brands", get(handlers::list_brands))
        .route("/api/admin/brands/:id/logo", put(handlers::update_brand_logo))
        // Back office: catalog management
        .route("/api/admin/services", get(handlers::admin_list_services))
        .route(
            "/api/admin/services/:id/active",
            put(handlers::set_service_active),
        )
        .route("/api/admin/products", get(handlers::admin_list_products))
        .route("/api/admin/products", post(handlers::create_product))
        .route(
            "/api/admin/products/:id/active",
            put(handlers::set_product_active),
        )
        .route("/api/admin/products/:id", delete(handlers::delete_product))
        // Realtime
        .route("/ws", get(websocket::websocket_handler))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_middleware,
        ))
        .layer(axum_middleware::from_fn(security_headers_middleware))
        .layer(tower_http::cors::CorsLayer::permissive())
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .with_state(app_state);

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Server listening on http://{}", addr);

    tokio::select! {
        result = axum::serve(listener, app) => {
            if let Err(e) = result {
                error!("Server error: {}", e);
            }
        }
        _ = shutdown_signal() => {
            info!("Shutting down gracefully...");
        }
    }

    Ok(())
}

async fn health_check() -> &'static str {
    "OK"
}

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
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
