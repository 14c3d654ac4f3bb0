//! Dealer HTTP handlers

use super::model::{Dealer, DealerRequest, SubscriptionTier};
use super::service::DealerService;
use crate::core::error::ServiceError;
use crate::core::validation::{ValidatedJson, parse_id};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use std::sync::Arc;

/// Dealer-specific AppState
#[derive(Clone)]
pub struct DealerAppState {
    pub service: Arc<DealerService>,
}

pub async fn list_dealers(
    State(state): State<DealerAppState>,
) -> Result<Json<Vec<Dealer>>, ServiceError> {
    Ok(Json(state.service.list(None).await?))
}

pub async fn get_dealer(
    State(state): State<DealerAppState>,
    Path(id): Path<String>,
) -> Result<Json<Dealer>, ServiceError> {
    let id = parse_id(&id, "dealer")?;
    Ok(Json(state.service.get(&id).await?))
}

pub async fn get_dealer_by_email(
    State(state): State<DealerAppState>,
    Path(email): Path<String>,
) -> Result<Json<Dealer>, ServiceError> {
    Ok(Json(state.service.find_by_email(&email).await?))
}

pub async fn list_dealers_by_tier(
    State(state): State<DealerAppState>,
    Path(tier): Path<String>,
) -> Result<Json<Vec<Dealer>>, ServiceError> {
    let tier = tier.parse::<SubscriptionTier>()?;
    Ok(Json(state.service.list(Some(tier)).await?))
}

pub async fn create_dealer(
    State(state): State<DealerAppState>,
    ValidatedJson(payload): ValidatedJson<DealerRequest>,
) -> Result<(StatusCode, Json<Dealer>), ServiceError> {
    let dealer = state.service.create(payload).await?;
    Ok((StatusCode::CREATED, Json(dealer)))
}

pub async fn update_dealer(
    State(state): State<DealerAppState>,
    Path(id): Path<String>,
    ValidatedJson(payload): ValidatedJson<DealerRequest>,
) -> Result<Json<Dealer>, ServiceError> {
    let id = parse_id(&id, "dealer")?;
    Ok(Json(state.service.update(&id, payload).await?))
}

pub async fn delete_dealer(
    State(state): State<DealerAppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ServiceError> {
    let id = parse_id(&id, "dealer")?;
    state.service.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
