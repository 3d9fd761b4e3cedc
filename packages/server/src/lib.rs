#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web API server for the vehicle watch system.
//!
//! Serves the REST API consumed by the complaint intake form, the
//! operator record manager, and the police dashboard. The core presence
//! tracker and alert board are in-process shared state; this crate is
//! only the transport adapter around them.

mod handlers;

use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{App, HttpServer, middleware, web};
use vehicle_watch_alerts::AlertBoard;
use vehicle_watch_tracker::PresenceTracker;

/// JSON body limit. Base64 inflates the 5 MiB evidence ceiling by 4/3,
/// so the transport limit sits above that and the core enforces the
/// real ceiling.
const JSON_PAYLOAD_LIMIT: usize = 8 * 1024 * 1024;

/// Shared application state.
pub struct AppState {
    /// Vehicle presence tracker.
    pub tracker: Arc<PresenceTracker>,
    /// Suspect-vehicle alert board.
    pub alerts: Arc<AlertBoard>,
}

/// Starts the vehicle watch API server.
///
/// Binds to `BIND_ADDR`/`PORT` (defaults `127.0.0.1:8000`, the address
/// the dashboards call). This is a regular async function; the caller
/// provides the runtime (e.g. via `#[actix_web::main]`).
///
/// # Errors
///
/// Returns an `std::io::Result` error if the HTTP server fails to bind
/// or encounters a runtime error.
#[allow(clippy::future_not_send)]
pub async fn run_server() -> std::io::Result<()> {
    pretty_env_logger::init_custom_env("RUST_LOG");

    let state = web::Data::new(AppState {
        tracker: Arc::new(PresenceTracker::new()),
        alerts: Arc::new(AlertBoard::new()),
    });

    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8000);

    log::info!("Starting server on {bind_addr}:{port}");

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .app_data(web::JsonConfig::default().limit(JSON_PAYLOAD_LIMIT))
            .service(api_scope())
    })
    .bind((bind_addr, port))?
    .run()
    .await
}

/// The `/api` route table, shared by the server and handler tests.
pub(crate) fn api_scope() -> actix_web::Scope {
    web::scope("/api")
        .route("/health", web::get().to(handlers::health))
        .route("/vehicles/", web::get().to(handlers::list_vehicles))
        .route("/vehicles/entry", web::post().to(handlers::record_entry))
        .route("/vehicles/{id}/exit", web::post().to(handlers::record_exit))
        .route("/crime-reports", web::post().to(handlers::file_crime_report))
        .route(
            "/alerts/{id}/status",
            web::post().to(handlers::update_alert_status),
        )
        .route(
            "/police-accounts",
            web::post().to(handlers::register_account),
        )
        .route(
            "/police-dashboard/{id}/",
            web::get().to(handlers::police_dashboard),
        )
}
