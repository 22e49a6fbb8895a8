// Main entry point - Dependency injection and server setup
mod application;
mod domain;
mod infrastructure;
mod presentation;

use std::{net::SocketAddr, sync::Arc};

use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;

use crate::application::catalog_service::CatalogService;
use crate::application::dataset_repository::DatasetRepository;
use crate::application::delivery_service::DeliveryService;
use crate::application::immunization_service::{AxisLock, ImmunizationService};
use crate::application::mortality_profile_service::MortalityProfileService;
use crate::application::prenatal_service::PrenatalService;
use crate::application::water_service::WaterService;
use crate::infrastructure::config::{load_datasets_config, load_server_config};
use crate::infrastructure::table_store::FileDatasetStore;
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{
    dashboard_layout, delivery_figure, health_check, immunization_figure, list_dashboards,
    mortality_profile_figure, prenatal_figure, water_figure,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    // Load configuration
    let server_config = load_server_config()?;
    let datasets_config = load_datasets_config()?;

    // Load every dataset once (infrastructure layer)
    let repository: Arc<dyn DatasetRepository> =
        Arc::new(FileDatasetStore::load(&datasets_config)?);

    // Create services (application layer)
    let axis_lock = AxisLock {
        x: server_config.immunization.lock_x_axis,
        y: server_config.immunization.lock_y_axis,
    };
    let state = Arc::new(AppState {
        catalog_service: CatalogService::new(repository.clone()),
        prenatal_service: PrenatalService::new(repository.clone()),
        immunization_service: ImmunizationService::new(repository.clone(), axis_lock),
        mortality_profile_service: MortalityProfileService::new(repository.clone()),
        delivery_service: DeliveryService::new(repository.clone()),
        water_service: WaterService::new(repository),
    });

    // Build router (presentation layer)
    let router = Router::new()
        .route("/healthz", get(health_check))
        .route("/dashboards", get(list_dashboards))
        .route("/dashboards/:id/layout", get(dashboard_layout))
        .route("/dashboards/prenatal/figure", get(prenatal_figure))
        .route("/dashboards/immunization/figure", get(immunization_figure))
        .route(
            "/dashboards/mortality-profile/figure",
            get(mortality_profile_figure),
        )
        .route("/dashboards/delivery/figure", get(delivery_figure))
        .route("/dashboards/water/figure", get(water_figure))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start server
    let addr: SocketAddr =
        format!("{}:{}", server_config.server.host, server_config.server.port).parse()?;
    println!("Starting neonatal-dashboards service on {}", addr);

    axum::serve(tokio::net::TcpListener::bind(addr).await?, router).await?;

    Ok(())
}
