//! Payment HTTP handlers

use super::model::{PaymentRequest, PaymentStatus, PaymentView};
use super::service::{PaymentFilter, PaymentService};
use crate::core::error::ServiceError;
use crate::core::validation::{ValidatedJson, parse_id};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use serde::Deserialize;
use std::sync::Arc;

/// Payment-specific AppState
#[derive(Clone)]
pub struct PaymentAppState {
    pub service: Arc<PaymentService>,
}

#[derive(Debug, Deserialize)]
pub struct StatusQuery {
    pub status: Option<String>,
}

pub async fn list_payments(
    State(state): State<PaymentAppState>,
) -> Result<Json<Vec<PaymentView>>, ServiceError> {
    Ok(Json(state.service.list(PaymentFilter::default()).await?))
}

pub async fn get_payment(
    State(state): State<PaymentAppState>,
    Path(id): Path<String>,
) -> Result<Json<PaymentView>, ServiceError> {
    let id = parse_id(&id, "payment")?;
    Ok(Json(state.service.get(&id).await?))
}

pub async fn list_payments_by_dealer(
    State(state): State<PaymentAppState>,
    Path(dealer_id): Path<String>,
) -> Result<Json<Vec<PaymentView>>, ServiceError> {
    let filter = PaymentFilter {
        dealer_id: Some(parse_id(&dealer_id, "dealer")?),
        status: None,
    };
    Ok(Json(state.service.list(filter).await?))
}

pub async fn list_payments_by_status(
    State(state): State<PaymentAppState>,
    Path(status): Path<String>,
) -> Result<Json<Vec<PaymentView>>, ServiceError> {
    let filter = PaymentFilter {
        dealer_id: None,
        status: Some(status.parse::<PaymentStatus>()?),
    };
    Ok(Json(state.service.list(filter).await?))
}

pub async fn get_payment_by_transaction(
    State(state): State<PaymentAppState>,
    Path(transaction_id): Path<String>,
) -> Result<Json<PaymentView>, ServiceError> {
    Ok(Json(
        state.service.find_by_transaction_id(&transaction_id).await?,
    ))
}

pub async fn create_payment(
    State(state): State<PaymentAppState>,
    ValidatedJson(payload): ValidatedJson<PaymentRequest>,
) -> Result<(StatusCode, Json<PaymentView>), ServiceError> {
    let payment = state
        .service
        .create(payload)
        .await
        .map_err(ServiceError::into_bad_reference)?;
    Ok((StatusCode::CREATED, Json(payment)))
}

/// `PUT /payments/{id}/status?status=SUCCESS`
pub async fn update_payment_status(
    State(state): State<PaymentAppState>,
    Path(id): Path<String>,
    Query(query): Query<StatusQuery>,
) -> Result<Json<PaymentView>, ServiceError> {
    let id = parse_id(&id, "payment")?;
    let status = query
        .status
        .ok_or_else(|| ServiceError::invalid("Query parameter 'status' is required"))?
        .parse::<PaymentStatus>()?;
    Ok(Json(state.service.update_status(&id, status).await?))
}

pub async fn delete_payment(
    State(state): State<PaymentAppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ServiceError> {
    let id = parse_id(&id, "payment")?;
    state.service.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
