//! Application startup and lifecycle management.

use crate::config::Config;
use crate::handlers;
use crate::middleware::request_id_middleware;
use crate::services::{init_metrics, LedgerRepository, LedgerService};
use axum::middleware::from_fn;
use axum::{
    routing::{delete, get, post, put},
    Router,
};
use mongodb::{options::ClientOptions, Client};
use secrecy::ExposeSecret;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub db: mongodb::Database,
    pub config: Config,
    pub repository: LedgerRepository,
    pub ledger: LedgerService,
}

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    listener: TcpListener,
    router: Router,
    db: mongodb::Database,
}

impl Application {
    /// Build the application with the given configuration.
    pub async fn build(config: Config) -> anyhow::Result<Self> {
        let mut client_options = ClientOptions::parse(config.database.url.expose_secret()).await?;
        client_options.app_name = Some("dues-service".to_string());

        let client = Client::with_options(client_options)?;
        let db = client.database(&config.database.db_name);

        let repository = LedgerRepository::new(&db);
        repository.init_indexes().await?;

        init_metrics();

        let ledger = LedgerService::new(repository.clone());

        let state = AppState {
            db: db.clone(),
            config: config.clone(),
            repository,
            ledger,
        };

        let router = Router::new()
            .route("/health", get(handlers::health_check))
            .route("/ready", get(handlers::readiness_check))
            .route("/metrics", get(handlers::metrics_endpoint))
            // Clients (tenant-scoped)
            .route(
                "/clients",
                post(handlers::clients::create_client).get(handlers::clients::list_clients),
            )
            .route(
                "/clients/:id",
                get(handlers::clients::get_client)
                    .patch(handlers::clients::update_client)
                    .delete(handlers::clients::delete_client),
            )
            // Payment records
            .route("/records", get(handlers::records::list_records))
            .route(
                "/records/:year/:client_id/months/:month",
                put(handlers::records::save_month_entry),
            )
            // Tracked years
            .route(
                "/years",
                post(handlers::years::open_year).get(handlers::years::list_years),
            )
            // Type labels
            .route(
                "/types",
                post(handlers::types::create_type).get(handlers::types::list_types),
            )
            .route("/types/:name", delete(handlers::types::delete_type))
            .layer(from_fn(request_id_middleware))
            .layer(
                TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                    let request_id = request
                        .headers()
                        .get("x-request-id")
                        .and_then(|value| value.to_str().ok())
                        .unwrap_or("-");

                    tracing::info_span!(
                        "http_request",
                        request_id = %request_id,
                        method = %request.method(),
                        uri = %request.uri(),
                        tenant_id = tracing::field::Empty,
                    )
                }),
            )
            .with_state(state);

        // Bind listener (port 0 = random port for testing)
        let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
        let listener = TcpListener::bind(addr).await?;
        let port = listener.local_addr()?.port();

        tracing::info!("Dues service listening on port {}", port);

        Ok(Self {
            port,
            listener,
            router,
            db,
        })
    }

    /// Get the port the server is listening on.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Get a reference to the database.
    pub fn db(&self) -> &mongodb::Database {
        &self.db
    }

    /// Run the application until stopped.
    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        axum::serve(self.listener, self.router).await
    }
}
