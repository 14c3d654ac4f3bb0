//! Request payload validation
//!
//! [`ValidatedJson<T>`] deserializes a JSON body and runs the
//! `validator::Validate` rules declared on `T` before the handler sees it.

use crate::core::error::{ServiceError, ServiceResult};
use axum::Json;
use axum::extract::{FromRequest, Request};
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use std::borrow::Cow;
use uuid::Uuid;
use validator::{Validate, ValidationError};

/// Axum extractor that deserializes and validates a JSON body
///
/// # Usage
///
/// ```rust,ignore
/// pub async fn create_dealer(
///     ValidatedJson(payload): ValidatedJson<DealerRequest>,
/// ) -> Result<Json<Dealer>, ServiceError> {
///     // payload already passed its validation rules
/// }
/// ```
pub struct ValidatedJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
{
    type Rejection = ServiceError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(payload) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| ServiceError::InvalidArgument(rejection.body_text()))?;

        payload.validate()?;
        Ok(ValidatedJson(payload))
    }
}

/// Validator: string must contain something other than whitespace
pub fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::new("blank").with_message(Cow::Borrowed("must not be blank")))
    } else {
        Ok(())
    }
}

/// Validator: decimal must be strictly greater than zero
pub fn positive_decimal(value: &Decimal) -> Result<(), ValidationError> {
    if value.is_sign_positive() && !value.is_zero() {
        Ok(())
    } else {
        Err(ValidationError::new("positive").with_message(Cow::Borrowed("must be greater than 0")))
    }
}

/// Parse an identifier taken from a path segment
pub fn parse_id(raw: &str, what: &str) -> ServiceResult<Uuid> {
    Uuid::parse_str(raw.trim())
        .map_err(|_| ServiceError::invalid(format!("Invalid {what} id: '{raw}'")))
}
