//! Inbound HTTP surface: one POST route per proxy plus a health probe

mod extract;

use std::sync::Arc;

use axum::{
    Router,
    extract::State,
    response::Json,
    routing::{get, post},
};
use serde::Serialize;

pub use extract::Payload;

use crate::{
    config::GatewayConfig,
    error::GatewayError,
    models::{
        ConditionsResult, CurrentConditionsRequest, ImageRequest, ImageResult, NormalsRequest,
        PlaceRequest, PlaceResult,
    },
    providers::{CurrentConditions, HistoricalNormals, HttpClient, ImageLookup, PlaceResolver},
};

/// Read-only state shared by all handlers, built once at startup
#[derive(Debug, Clone)]
pub struct AppState {
    pub images: ImageLookup,
    pub places: PlaceResolver,
    pub current: CurrentConditions,
    pub normals: HistoricalNormals,
}

impl AppState {
    pub fn from_config(config: &GatewayConfig) -> Result<Self, GatewayError> {
        let http = HttpClient::new(&config.http)?;
        Ok(Self {
            images: ImageLookup::new(&config.pixabay, http.clone()),
            places: PlaceResolver::new(&config.geonames, http.clone()),
            current: CurrentConditions::new(&config.weatherbit, http.clone()),
            normals: HistoricalNormals::new(&config.weatherbit, http),
        })
    }
}

#[derive(Serialize)]
pub struct Health {
    pub status: &'static str,
    pub version: &'static str,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/pixabay", post(lookup_image))
        .route("/GeoNames", post(resolve_place))
        .route("/WeatherbitCurrent", post(current_conditions))
        .route("/WeatherbitNormal", post(historical_normals))
        .route("/health", get(health))
        .with_state(Arc::new(state))
}

async fn health() -> Json<Health> {
    Json(Health {
        status: "ok",
        version: crate::VERSION,
    })
}

async fn lookup_image(
    State(state): State<Arc<AppState>>,
    Payload(request): Payload<ImageRequest>,
) -> Result<Json<ImageResult>, GatewayError> {
    let result = state.images.lookup(&request.place_name).await?;
    Ok(Json(result))
}

async fn resolve_place(
    State(state): State<Arc<AppState>>,
    Payload(request): Payload<PlaceRequest>,
) -> Result<Json<PlaceResult>, GatewayError> {
    let result = state
        .places
        .resolve(&request.place_name, request.passthrough_token)
        .await?;
    Ok(Json(result))
}

async fn current_conditions(
    State(state): State<Arc<AppState>>,
    Payload(request): Payload<CurrentConditionsRequest>,
) -> Result<Json<ConditionsResult>, GatewayError> {
    let result = state
        .current
        .fetch(request.lat, request.lon, request.context)
        .await?;
    Ok(Json(result))
}

async fn historical_normals(
    State(state): State<Arc<AppState>>,
    Payload(request): Payload<NormalsRequest>,
) -> Result<Json<ConditionsResult>, GatewayError> {
    let result = state
        .normals
        .fetch(request.lat, request.lon, &request.date, request.context)
        .await?;
    Ok(Json(result))
}
