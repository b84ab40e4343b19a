#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web API server for aquawatch.
//!
//! Serves the REST API for submitting and triaging water-quality reports,
//! plus the read-side analytics: zoom-adaptive map clustering, grid
//! hotspots, duplicate detection, status KPIs and CSV export. Analytics are
//! computed per request over a capped working set fetched from the
//! [`ReportStore`].

pub mod config;
pub mod export;
mod handlers;

use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{App, HttpServer, middleware, web};
use aquawatch_analytics::DuplicateOptions;
use aquawatch_database::ReportStore;
use aquawatch_spatial::ZoomPolicy;

pub use config::{AnalyticsConfig, ConfigError, ServerConfig};
pub use handlers::DEFAULT_ZOOM;

/// Shared application state.
pub struct AppState {
    /// Report storage.
    pub store: Arc<dyn ReportStore>,
    /// Zoom-to-cell-size table for marker clustering.
    pub zoom_policy: ZoomPolicy,
    /// Duplicate grouping radius and reference timezone.
    pub duplicates: DuplicateOptions,
    /// Working set cap and hotspot defaults.
    pub analytics: AnalyticsConfig,
}

impl AppState {
    /// Builds state from a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the zoom table or duplicate options are
    /// invalid.
    pub fn new(store: Arc<dyn ReportStore>, config: &ServerConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            store,
            zoom_policy: config.zoom_policy()?,
            duplicates: config.duplicate_options()?,
            analytics: config.analytics.clone(),
        })
    }
}

/// Registers the `/api` routes.
///
/// Fixed `/reports/...` paths are registered before `/reports/{id}` so they
/// are not captured as ids.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .app_data(
                web::QueryConfig::default()
                    .error_handler(|err, _req| handlers::extractor_error(err)),
            )
            .app_data(
                web::JsonConfig::default()
                    .error_handler(|err, _req| handlers::extractor_error(err)),
            )
            .route("/health", web::get().to(handlers::health))
            .route("/reports.csv", web::get().to(handlers::export_csv))
            .route("/reports/clusters", web::get().to(handlers::clusters))
            .route("/reports/duplicates", web::get().to(handlers::duplicates))
            .route("/reports", web::get().to(handlers::list_reports))
            .route("/reports", web::post().to(handlers::create_report))
            .route("/reports/{id}", web::get().to(handlers::get_report))
            .route(
                "/reports/{id}/status",
                web::patch().to(handlers::update_status),
            )
            .route(
                "/reports/{id}/assign",
                web::patch().to(handlers::assign_report),
            )
            .route(
                "/reports/{id}/resolve",
                web::patch().to(handlers::resolve_report),
            )
            .route(
                "/reports/{id}/comments",
                web::get().to(handlers::list_comments),
            )
            .route(
                "/reports/{id}/comments",
                web::post().to(handlers::add_comment),
            )
            .route("/analytics/hotspots", web::get().to(handlers::hotspots))
            .route("/analytics/kpis", web::get().to(handlers::kpis)),
    );
}

/// Starts the aquawatch API server.
///
/// This is a regular async function; the caller provides the runtime (e.g.
/// via `#[actix_web::main]`) and initializes logging.
///
/// # Errors
///
/// Returns an `std::io::Result` error if the configuration is invalid or
/// the HTTP server fails to bind or encounters a runtime error.
#[allow(clippy::future_not_send)]
pub async fn run_server(config: ServerConfig, store: Arc<dyn ReportStore>) -> std::io::Result<()> {
    let state = web::Data::new(
        AppState::new(store, &config)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e))?,
    );

    log::info!(
        "Analytics: working set cap {}, duplicate radius {} m, {} zoom steps",
        state.analytics.max_working_set,
        state.duplicates.radius_meters(),
        state.zoom_policy.steps().len()
    );
    log::info!("Starting server on {}:{}", config.bind_addr, config.port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .configure(configure)
    })
    .bind((config.bind_addr.as_str(), config.port))?
    .run()
    .await
}
