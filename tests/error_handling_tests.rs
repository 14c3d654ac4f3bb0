//! Tests for the typed error handling system
//!
//! These tests verify that:
//! - Errors return correct HTTP status codes
//! - Error responses are properly formatted
//! - Store errors convert to the right service errors

use autocenter::core::error::GENERIC_FAILURE_MESSAGE;
use autocenter::prelude::*;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use uuid::Uuid;

async fn body_json(err: ServiceError) -> (StatusCode, serde_json::Value) {
    let response = err.into_response();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

// =============================================================================
// HTTP Status Code Tests
// =============================================================================

mod status_code_tests {
    use super::*;

    #[test]
    fn test_every_variant_has_its_status() {
        let cases = [
            (ServiceError::not_found("dealer", Uuid::new_v4()), StatusCode::NOT_FOUND),
            (ServiceError::invalid("bad"), StatusCode::BAD_REQUEST),
            (ServiceError::Conflict("taken".into()), StatusCode::CONFLICT),
            (ServiceError::Unauthorized("no".into()), StatusCode::UNAUTHORIZED),
            (ServiceError::Internal("boom".into()), StatusCode::INTERNAL_SERVER_ERROR),
            (
                ServiceError::Storage(StoreError::Backend("down".into())),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, status) in cases {
            assert_eq!(err.status_code(), status, "{err}");
        }
    }
}

// =============================================================================
// Conversion Tests
// =============================================================================

mod conversion_tests {
    use super::*;

    #[test]
    fn test_store_not_found_becomes_not_found() {
        let id = Uuid::new_v4();
        let err: ServiceError = StoreError::NotFound {
            entity: "vehicle",
            id,
        }
        .into();
        assert!(matches!(err, ServiceError::NotFound { entity: "vehicle", .. }));
        assert!(err.to_string().contains(&id.to_string()));
    }

    #[test]
    fn test_unique_violations_depend_on_field() {
        let email: ServiceError = StoreError::UniqueViolation {
            entity: "dealer",
            field: "email",
            value: "a@example.com".into(),
        }
        .into();
        assert_eq!(email.error_code(), "INVALID_ARGUMENT");

        let transaction: ServiceError = StoreError::UniqueViolation {
            entity: "payment",
            field: "transaction_id",
            value: "TXN1-00000000".into(),
        }
        .into();
        assert_eq!(transaction.error_code(), "CONFLICT");
    }

    #[test]
    fn test_backend_failure_is_storage_error() {
        let err: ServiceError = StoreError::Backend("lock poisoned".into()).into();
        assert_eq!(err.error_code(), "STORAGE_ERROR");
    }

    #[test]
    fn test_wire_enum_parse_error_is_invalid_argument() {
        let err = "REFUNDED".parse::<PaymentStatus>().unwrap_err();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert!(err.to_string().contains("REFUNDED"));
    }
}

// =============================================================================
// Response Body Tests
// =============================================================================

mod response_tests {
    use super::*;

    #[tokio::test]
    async fn test_not_found_body() {
        let (status, body) = body_json(ServiceError::not_found("payment", "TXN-1")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], "NOT_FOUND");
        assert_eq!(body["details"]["entity"], "payment");
        assert_eq!(body["details"]["key"], "TXN-1");
    }

    #[tokio::test]
    async fn test_invalid_argument_body_has_no_details() {
        let (status, body) =
            body_json(ServiceError::invalid("Payment amount must be greater than 0")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "INVALID_ARGUMENT");
        assert_eq!(body["message"], "Payment amount must be greater than 0");
        assert!(body.get("details").is_none());
    }

    #[tokio::test]
    async fn test_server_errors_hide_their_cause() {
        let (status, body) =
            body_json(ServiceError::Internal("secret stack trace".into())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["code"], "INTERNAL_ERROR");
        assert_eq!(body["message"], GENERIC_FAILURE_MESSAGE);
    }
}

// =============================================================================
// Error Matching Tests
// =============================================================================

mod matching_tests {
    use super::*;

    #[test]
    fn test_bad_reference_only_rewrites_not_found() {
        let missing = ServiceError::not_found("dealer", Uuid::new_v4()).into_bad_reference();
        assert_eq!(missing.status_code(), StatusCode::BAD_REQUEST);

        let conflict = ServiceError::Conflict("taken".into()).into_bad_reference();
        assert_eq!(conflict.status_code(), StatusCode::CONFLICT);
    }
}
