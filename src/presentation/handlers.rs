// HTTP request handlers
use crate::application::dataset_repository::DataError;
use crate::application::water_service::HIGHLIGHT_ALL;
use crate::infrastructure::http_response::json_response;
use crate::presentation::app_state::AppState;
use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
};
use serde::Deserialize;
use std::sync::Arc;

/// Check if the client accepts Brotli compression
fn accepts_brotli(headers: &HeaderMap) -> bool {
    headers
        .get("accept-encoding")
        .and_then(|v| v.to_str().ok())
        .map(|s| s.contains("br"))
        .unwrap_or(false)
}

fn figure_error(err: DataError) -> axum::response::Response {
    let status = match &err {
        DataError::UnknownKey { .. } => StatusCode::NOT_FOUND,
        DataError::MissingYear { .. } => StatusCode::UNPROCESSABLE_ENTITY,
    };
    tracing::debug!("figure request rejected: {}", err);
    (status, err.to_string()).into_response()
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// List the available dashboards
pub async fn list_dashboards(
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    let dashboards = state.catalog_service.list_dashboards();
    match json_response(&dashboards, accepts_brotli(&headers)).await {
        Ok(response) => response,
        Err(status) => status.into_response(),
    }
}

/// Control layout (title, sliders, dropdowns) for one dashboard
pub async fn dashboard_layout(
    Path(id): Path<String>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    match state.catalog_service.dashboard_layout(&id) {
        Some(layout) => match json_response(&layout, accepts_brotli(&headers)).await {
            Ok(response) => response,
            Err(status) => status.into_response(),
        },
        None => (StatusCode::NOT_FOUND, format!("unknown dashboard '{id}'")).into_response(),
    }
}

#[derive(Deserialize)]
pub struct YearQuery {
    pub year: Option<i32>,
}

pub async fn prenatal_figure(
    Query(query): Query<YearQuery>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    let year = query
        .year
        .unwrap_or_else(|| state.prenatal_service.default_year());
    match state.prenatal_service.figure(year) {
        Ok(figure) => match json_response(&figure, accepts_brotli(&headers)).await {
            Ok(response) => response,
            Err(status) => status.into_response(),
        },
        Err(err) => figure_error(err),
    }
}

pub async fn immunization_figure(
    Query(query): Query<YearQuery>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    let year = query
        .year
        .unwrap_or_else(|| state.immunization_service.default_year());
    match state.immunization_service.figure(year) {
        Ok(figure) => match json_response(&figure, accepts_brotli(&headers)).await {
            Ok(response) => response,
            Err(status) => status.into_response(),
        },
        Err(err) => figure_error(err),
    }
}

#[derive(Deserialize)]
pub struct MortalityProfileQuery {
    pub uf: Option<String>,
    pub year: Option<i32>,
}

pub async fn mortality_profile_figure(
    Query(query): Query<MortalityProfileQuery>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    let uf = query.uf.as_deref().unwrap_or("RO");
    let year = query
        .year
        .unwrap_or_else(|| state.mortality_profile_service.default_year());
    match state.mortality_profile_service.figure(uf, year) {
        Ok(figure) => match json_response(&figure, accepts_brotli(&headers)).await {
            Ok(response) => response,
            Err(status) => status.into_response(),
        },
        Err(err) => figure_error(err),
    }
}

#[derive(Deserialize)]
pub struct DeliveryQuery {
    pub year: Option<i32>,
    pub transition_ms: Option<u64>,
}

pub async fn delivery_figure(
    Query(query): Query<DeliveryQuery>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    let year = query
        .year
        .unwrap_or_else(|| state.delivery_service.default_year());
    let transition_ms = query.transition_ms.unwrap_or(500);
    match state.delivery_service.figure(year, transition_ms) {
        Ok(figure) => match json_response(&figure, accepts_brotli(&headers)).await {
            Ok(response) => response,
            Err(status) => status.into_response(),
        },
        Err(err) => figure_error(err),
    }
}

#[derive(Deserialize)]
pub struct WaterQuery {
    pub highlight: Option<String>,
}

pub async fn water_figure(
    Query(query): Query<WaterQuery>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    let highlight = query.highlight.as_deref().unwrap_or(HIGHLIGHT_ALL);
    let figure = state.water_service.figure(highlight);
    match json_response(&figure, accepts_brotli(&headers)).await {
        Ok(response) => response,
        Err(status) => status.into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_brotli() {
        let mut headers = HeaderMap::new();
        assert!(!accepts_brotli(&headers));

        headers.insert("accept-encoding", "gzip, deflate".parse().unwrap());
        assert!(!accepts_brotli(&headers));

        headers.insert("accept-encoding", "gzip, br".parse().unwrap());
        assert!(accepts_brotli(&headers));
    }
}
