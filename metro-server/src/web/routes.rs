//! HTTP route handlers.

use std::path::Path as FsPath;

use askama::Template;
use axum::{
    Json, Router,
    extract::{Path, Query, State},
    response::{Html, IntoResponse},
    routing::{delete, get, post},
};
use tower_http::services::ServeDir;
use tracing::info;

use crate::domain::{SearchMode, StationId};
use crate::service::MetroService;

use super::dto::*;
use super::error::AppError;
use super::state::AppState;
use super::templates::IndexTemplate;
use super::ws::ws_handler;

/// Create the application router.
///
/// `static_dir` is the path to the static assets directory.
pub fn create_router(state: AppState, static_dir: &FsPath) -> Router {
    Router::new()
        .route("/", get(index_page))
        .route("/health", get(health))
        .route("/stations", get(stations))
        .route("/search_station", get(search_station))
        .route("/fare", get(fare))
        .route("/fare_by_name", get(fare_by_name))
        .route("/route", get(route_by_id))
        .route("/route_by_name", get(route_by_name))
        .route("/edge_times_by_name", get(edge_times_by_name))
        .route("/debug/neighbors", get(debug_neighbors))
        .route("/simulate_train", post(simulate_train))
        .route("/trains", get(list_trains))
        .route("/trains/:train_id", delete(stop_train))
        .route("/reload", post(reload))
        .route("/ws", get(ws_handler))
        .nest_service("/static", ServeDir::new(static_dir))
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

/// Index page.
async fn index_page(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let graph = state.service.graph().await;
    let track_edges = graph.edge_count() - graph.interchange_count();
    let template = IndexTemplate::new(graph.stations(), track_edges);
    let html = template.render().map_err(|e| AppError::Internal {
        message: format!("Template error: {}", e),
    })?;
    Ok(Html(html))
}

async fn stations(State(state): State<AppState>) -> Json<StationsResponse> {
    let data = state.service.list_stations().await;
    Json(StationsResponse {
        count: data.len(),
        data,
    })
}

/// Substring search over normalized station names.
async fn search_station(
    State(state): State<AppState>,
    Query(req): Query<SearchStationQuery>,
) -> Result<Json<SearchStationResponse>, AppError> {
    let q = req.q.as_deref().map(str::trim).unwrap_or_default();
    if q.is_empty() {
        return Err(AppError::bad_request("missing q"));
    }
    let limit = req
        .limit
        .unwrap_or(DEFAULT_SEARCH_LIMIT)
        .min(MAX_SEARCH_LIMIT);

    let results = state.service.search_stations(q, limit).await;
    Ok(Json(SearchStationResponse { results }))
}

async fn fare(
    State(state): State<AppState>,
    Query(req): Query<PairQuery>,
) -> Result<Json<FareResponse>, AppError> {
    let (from, to) = req.ids()?;
    fare_response(&state.service, from, to).await
}

async fn fare_by_name(
    State(state): State<AppState>,
    Query(req): Query<PairQuery>,
) -> Result<Json<FareResponse>, AppError> {
    let (from, to) = req.names()?;
    let from = state.service.resolve_station(from).await?;
    let to = state.service.resolve_station(to).await?;
    fare_response(&state.service, from, to).await
}

async fn fare_response(
    service: &MetroService,
    from: StationId,
    to: StationId,
) -> Result<Json<FareResponse>, AppError> {
    let price = service.fare_between(from, to).await?;
    let graph = service.graph().await;
    let name = |id| graph.name(id).unwrap_or_default().to_string();
    Ok(Json(FareResponse {
        from_id: from,
        to_id: to,
        from: name(from),
        to: name(to),
        price,
    }))
}

async fn route_by_id(
    State(state): State<AppState>,
    Query(req): Query<PairQuery>,
) -> Result<Json<RouteResponse>, AppError> {
    let (from, to) = req.ids()?;
    let mode = req.mode(SearchMode::Stops)?;
    let route = state.service.shortest_path(from, to, mode).await?;
    Ok(Json(RouteResponse::from_result(&route, mode)))
}

async fn route_by_name(
    State(state): State<AppState>,
    Query(req): Query<PairQuery>,
) -> Result<Json<RouteResponse>, AppError> {
    let (from, to) = req.names()?;
    let mode = req.mode(SearchMode::Stops)?;
    let from = state.service.resolve_station(from).await?;
    let to = state.service.resolve_station(to).await?;
    let route = state.service.shortest_path(from, to, mode).await?;
    Ok(Json(RouteResponse::from_result(&route, mode)))
}

/// Per-segment travel times along a route, for checking the duration data.
async fn edge_times_by_name(
    State(state): State<AppState>,
    Query(req): Query<PairQuery>,
) -> Result<impl IntoResponse, AppError> {
    let (from, to) = req.names()?;
    let mode = req.mode(SearchMode::Time)?;
    let from = state.service.resolve_station(from).await?;
    let to = state.service.resolve_station(to).await?;
    Ok(Json(state.service.edge_times(from, to, mode).await?))
}

async fn debug_neighbors(
    State(state): State<AppState>,
    Query(req): Query<NeighborsQuery>,
) -> Result<Json<NeighborsResponse>, AppError> {
    let name = req.name.as_deref().map(str::trim).unwrap_or_default();
    if name.is_empty() {
        return Err(AppError::bad_request("missing name"));
    }
    let station = state.service.resolve_station(name).await?;
    let neighbors = state.service.neighbors(station).await?;
    Ok(Json(NeighborsResponse {
        station: name.to_string(),
        neighbors,
    }))
}

/// Start a simulated train along the route between two named stations.
async fn simulate_train(
    State(state): State<AppState>,
    Json(req): Json<SimulateTrainRequest>,
) -> Result<Json<SimulateTrainResponse>, AppError> {
    let names = PairQuery {
        from: req.from.clone(),
        to: req.to.clone(),
        mode: None,
    };
    let (from, to) = names.names()?;
    let start = req.to_start(
        state.service.resolve_station(from).await?,
        state.service.resolve_station(to).await?,
    )?;

    let started = state.service.start_simulation(start).await?;
    Ok(Json(started.into()))
}

async fn list_trains(State(state): State<AppState>) -> Json<TrainsResponse> {
    Json(TrainsResponse {
        trains: state.service.list_simulations().await,
    })
}

async fn stop_train(
    State(state): State<AppState>,
    Path(train_id): Path<String>,
) -> Json<StopTrainResponse> {
    let ok = state.service.stop_simulation(&train_id).await;
    Json(StopTrainResponse { ok, train_id })
}

/// Re-read the data directory and swap in the rebuilt network.
async fn reload(State(state): State<AppState>) -> Result<Json<ReloadResponse>, AppError> {
    let loader = state.loader.clone();
    let data = tokio::task::spawn_blocking(move || loader.load())
        .await
        .map_err(|e| AppError::Internal {
            message: format!("reload task failed: {}", e),
        })??;

    let report = state
        .service
        .reload(&data.sources, &data.coordinates)
        .await;
    info!(root = %state.loader.root().display(), "Reloaded data directory");
    Ok(Json(report.into()))
}
