//! REST exposure
//!
//! Consumes a [`ServerHost`] and produces the axum `Router`: health checks,
//! the demo token endpoints and the entity routes (behind the bearer guard
//! when auth is enabled), wrapped in request tracing and permissive CORS.

use super::host::ServerHost;
use crate::core::auth::{AuthGuard, AuthPolicy, IssuedToken, JwtAuthProvider, enforce_policy};
use crate::core::error::ServiceError;
use crate::core::validation::{ValidatedJson, not_blank};
use axum::{
    Json, Router,
    extract::State,
    middleware,
    routing::{get, post},
};
use serde::Deserialize;
use serde_json::{Value, json};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use validator::Validate;

/// Name reported by the health endpoints
pub const SERVICE_NAME: &str = "autocenter";

/// Subject of tokens minted by `POST /auth/token`
pub const DEMO_TOKEN_SUBJECT: &str = "demo-user";

/// Body of `POST /auth/login`
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(custom(function = "not_blank"))]
    pub username: String,

    #[validate(custom(function = "not_blank"))]
    pub password: String,
}

pub struct RestExposure;

impl RestExposure {
    /// Build the REST router from a host
    pub fn build_router(host: Arc<ServerHost>) -> Router {
        let mut entity_routes = host.entity_registry.build_routes();

        if host.config.auth.enabled {
            let guard = AuthGuard {
                provider: host.auth.clone(),
                policy: AuthPolicy::Authenticated,
            };
            entity_routes =
                entity_routes.route_layer(middleware::from_fn_with_state(guard, enforce_policy));
        } else {
            tracing::warn!("authentication disabled; entity routes are public");
        }

        Self::health_routes()
            .merge(Self::auth_routes(host.auth.clone()))
            .merge(entity_routes)
            .layer(
                ServiceBuilder::new()
                    .layer(TraceLayer::new_for_http())
                    .layer(CorsLayer::permissive()),
            )
    }

    fn health_routes() -> Router {
        Router::new()
            .route("/health", get(Self::health_check))
            .route("/healthz", get(Self::health_check))
    }

    async fn health_check() -> Json<Value> {
        Json(json!({
            "status": "ok",
            "service": SERVICE_NAME
        }))
    }

    fn auth_routes(provider: Arc<JwtAuthProvider>) -> Router {
        Router::new()
            .route("/auth/login", post(Self::login))
            .route("/auth/token", post(Self::demo_token))
            .with_state(provider)
    }

    async fn login(
        State(provider): State<Arc<JwtAuthProvider>>,
        ValidatedJson(payload): ValidatedJson<LoginRequest>,
    ) -> Result<Json<IssuedToken>, ServiceError> {
        let issued = provider.login(&payload.username, &payload.password)?;
        tracing::info!(username = %issued.username, "operator logged in");
        Ok(Json(issued))
    }

    async fn demo_token(
        State(provider): State<Arc<JwtAuthProvider>>,
    ) -> Result<Json<IssuedToken>, ServiceError> {
        Ok(Json(provider.issue(DEMO_TOKEN_SUBJECT)?))
    }
}
