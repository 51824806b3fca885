//! Application startup and lifecycle management.

use crate::config::CommerceConfig;
use crate::handlers;
use crate::services::Database;
use axum::{
    extract::Request,
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use service_core::error::AppError;
use service_core::middleware::{metrics_middleware, request_id_middleware, REQUEST_ID_HEADER};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: CommerceConfig,
    pub db: Arc<Database>,
}

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    listener: TcpListener,
    state: AppState,
}

impl Application {
    /// Build the application, running pending migrations first.
    pub async fn build(config: CommerceConfig) -> Result<Self, AppError> {
        let app = Self::build_without_migrations(config).await?;
        app.state.db.run_migrations().await?;
        Ok(app)
    }

    /// Build the application without touching the schema. Used by tests that
    /// manage migrations themselves.
    pub async fn build_without_migrations(config: CommerceConfig) -> Result<Self, AppError> {
        let db = Database::new(
            &config.database.url,
            config.database.max_connections,
            config.database.min_connections,
        )
        .await
        .map_err(|e| {
            tracing::error!("Failed to connect to PostgreSQL: {}", e);
            e
        })?;

        let state = AppState {
            config: config.clone(),
            db: Arc::new(db),
        };

        // Port 0 binds a random free port for tests.
        let addr = SocketAddr::from(([0, 0, 0, 0], config.common.port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind TCP listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!("Listening on {}", port);

        Ok(Self {
            port,
            listener,
            state,
        })
    }

    /// Get the port the server is listening on.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Get a handle to the database.
    pub fn db(&self) -> Arc<Database> {
        self.state.db.clone()
    }

    /// Run the application until stopped.
    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        let app = router(self.state);
        axum::serve(self.listener, app).await
    }
}

/// Build the full HTTP router for the service.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/ready", get(handlers::readiness_check))
        .route("/metrics", get(handlers::metrics_handler))
        .route("/registry", get(handlers::registry_handler))
        // Catalog
        .route(
            "/products",
            post(handlers::catalog::create_product).get(handlers::catalog::list_products),
        )
        .route("/products/low-stock", get(handlers::catalog::low_stock))
        .route(
            "/products/:product_id",
            get(handlers::catalog::get_product)
                .put(handlers::catalog::update_product)
                .delete(handlers::catalog::delete_product),
        )
        // Parties
        .route(
            "/clients",
            post(handlers::parties::create_client).get(handlers::parties::list_clients),
        )
        .route(
            "/clients/:client_id",
            get(handlers::parties::get_client)
                .put(handlers::parties::update_client)
                .delete(handlers::parties::delete_client),
        )
        .route(
            "/vendors",
            post(handlers::parties::create_vendor).get(handlers::parties::list_vendors),
        )
        .route(
            "/vendors/:vendor_id",
            get(handlers::parties::get_vendor)
                .put(handlers::parties::update_vendor)
                .delete(handlers::parties::delete_vendor),
        )
        .route(
            "/staff",
            post(handlers::parties::create_staff).get(handlers::parties::list_staff),
        )
        .route("/staff/:staff_id", delete(handlers::parties::delete_staff))
        // Receipts and their children
        .route(
            "/receipts",
            post(handlers::receipts::create_receipt).get(handlers::receipts::list_receipts),
        )
        .route(
            "/receipts/:receipt_id",
            get(handlers::receipts::get_receipt)
                .put(handlers::receipts::update_receipt)
                .delete(handlers::receipts::delete_receipt),
        )
        .route(
            "/receipts/:receipt_id/line-items",
            post(handlers::receipts::add_line_item),
        )
        .route(
            "/line-items/:line_item_id",
            put(handlers::receipts::update_line_item)
                .delete(handlers::receipts::delete_line_item),
        )
        .route(
            "/receipts/:receipt_id/payments",
            post(handlers::receipts::record_payment),
        )
        .route(
            "/payments/:payment_id",
            delete(handlers::receipts::remove_payment),
        )
        // Expenses
        .route(
            "/expenses",
            post(handlers::expenses::create_expense).get(handlers::expenses::list_expenses),
        )
        .route(
            "/expenses/:expense_id",
            get(handlers::expenses::get_expense)
                .put(handlers::expenses::update_expense)
                .delete(handlers::expenses::delete_expense),
        )
        // Attendance
        .route(
            "/attendance",
            post(handlers::attendance::create_attendance)
                .get(handlers::attendance::list_attendance),
        )
        // Reports
        .route("/reports/summary", get(handlers::reports::summary))
        .route("/reports/movements", get(handlers::reports::movements))
        .route("/reports/outstanding", get(handlers::reports::outstanding))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request| {
                let request_id = request
                    .headers()
                    .get(REQUEST_ID_HEADER)
                    .and_then(|h| h.to_str().ok())
                    .unwrap_or("unknown");
                tracing::info_span!(
                    "http_request",
                    method = %request.method(),
                    uri = %request.uri(),
                    request_id = %request_id,
                )
            }),
        )
        .with_state(state)
}
