//! Vehicle HTTP handlers

use super::model::{VehicleRequest, VehicleStatus, VehicleView};
use super::service::{VehicleFilter, VehicleService};
use crate::core::error::ServiceError;
use crate::core::validation::{ValidatedJson, parse_id};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use serde::Deserialize;
use std::sync::Arc;

/// Vehicle-specific AppState
#[derive(Clone)]
pub struct VehicleAppState {
    pub service: Arc<VehicleService>,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub model: Option<String>,
}

pub async fn list_vehicles(
    State(state): State<VehicleAppState>,
) -> Result<Json<Vec<VehicleView>>, ServiceError> {
    Ok(Json(state.service.list(VehicleFilter::default()).await?))
}

pub async fn get_vehicle(
    State(state): State<VehicleAppState>,
    Path(id): Path<String>,
) -> Result<Json<VehicleView>, ServiceError> {
    let id = parse_id(&id, "vehicle")?;
    Ok(Json(state.service.get(&id).await?))
}

pub async fn list_vehicles_by_dealer(
    State(state): State<VehicleAppState>,
    Path(dealer_id): Path<String>,
) -> Result<Json<Vec<VehicleView>>, ServiceError> {
    let filter = VehicleFilter {
        dealer_id: Some(parse_id(&dealer_id, "dealer")?),
        status: None,
    };
    Ok(Json(state.service.list(filter).await?))
}

pub async fn list_vehicles_by_status(
    State(state): State<VehicleAppState>,
    Path(status): Path<String>,
) -> Result<Json<Vec<VehicleView>>, ServiceError> {
    let filter = VehicleFilter {
        dealer_id: None,
        status: Some(status.parse::<VehicleStatus>()?),
    };
    Ok(Json(state.service.list(filter).await?))
}

pub async fn list_premium_dealer_vehicles(
    State(state): State<VehicleAppState>,
) -> Result<Json<Vec<VehicleView>>, ServiceError> {
    Ok(Json(state.service.premium_dealers().await?))
}

pub async fn search_vehicles(
    State(state): State<VehicleAppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<VehicleView>>, ServiceError> {
    let model = query
        .model
        .filter(|m| !m.trim().is_empty())
        .ok_or_else(|| ServiceError::invalid("Query parameter 'model' is required"))?;
    Ok(Json(state.service.search_by_model(&model).await?))
}

pub async fn create_vehicle(
    State(state): State<VehicleAppState>,
    ValidatedJson(payload): ValidatedJson<VehicleRequest>,
) -> Result<(StatusCode, Json<VehicleView>), ServiceError> {
    let vehicle = state
        .service
        .create(payload)
        .await
        .map_err(ServiceError::into_bad_reference)?;
    Ok((StatusCode::CREATED, Json(vehicle)))
}

pub async fn update_vehicle(
    State(state): State<VehicleAppState>,
    Path(id): Path<String>,
    ValidatedJson(payload): ValidatedJson<VehicleRequest>,
) -> Result<Json<VehicleView>, ServiceError> {
    let id = parse_id(&id, "vehicle")?;
    Ok(Json(state.service.update(&id, payload).await?))
}

pub async fn delete_vehicle(
    State(state): State<VehicleAppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ServiceError> {
    let id = parse_id(&id, "vehicle")?;
    state.service.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
