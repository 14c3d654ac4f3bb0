//! Authentication for the REST surface
//!
//! The demo provider issues HS256 bearer tokens for a single configured
//! operator account. Route protection is a middleware that resolves an
//! [`AuthContext`] from the `Authorization` header and checks it against an
//! [`AuthPolicy`].

use crate::config::AuthSection;
use crate::core::error::{ServiceError, ServiceResult};
use axum::extract::{Request, State};
use axum::http::{HeaderMap, header};
use axum::middleware::Next;
use axum::response::Response;
use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// JWT claims carried by issued tokens
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub iat: usize,
    pub exp: usize,
}

/// Authorization context extracted from a request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthContext {
    /// Caller presented a valid token
    User { username: String },

    /// No credentials were presented
    Anonymous,
}

impl AuthContext {
    pub fn username(&self) -> Option<&str> {
        match self {
            AuthContext::User { username } => Some(username),
            AuthContext::Anonymous => None,
        }
    }
}

/// Authorization policy for a group of routes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthPolicy {
    /// No auth required
    Public,

    /// Any caller holding a valid token
    Authenticated,
}

impl AuthPolicy {
    /// Check if auth context satisfies this policy
    pub fn check(&self, context: &AuthContext) -> bool {
        match self {
            AuthPolicy::Public => true,
            AuthPolicy::Authenticated => !matches!(context, AuthContext::Anonymous),
        }
    }
}

/// Trait for auth providers
pub trait AuthProvider: Send + Sync {
    /// Resolve the caller from request headers
    ///
    /// A missing header yields `Anonymous`; a malformed or expired token is an
    /// error.
    fn extract_context(&self, headers: &HeaderMap) -> ServiceResult<AuthContext>;
}

/// Response body of the token endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IssuedToken {
    pub token: String,
    #[serde(rename = "type")]
    pub token_type: String,
    pub username: String,
}

/// HS256 token provider with a single demo operator account
pub struct JwtAuthProvider {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl_secs: u64,
    demo_username: String,
    demo_password: String,
}

impl JwtAuthProvider {
    pub fn new(section: &AuthSection) -> Self {
        Self {
            encoding: EncodingKey::from_secret(section.secret.as_bytes()),
            decoding: DecodingKey::from_secret(section.secret.as_bytes()),
            ttl_secs: section.token_ttl_secs,
            demo_username: section.demo_username.clone(),
            demo_password: section.demo_password.clone(),
        }
    }

    /// Issue a token for `username`
    pub fn issue(&self, username: &str) -> ServiceResult<IssuedToken> {
        let now = Utc::now().timestamp().max(0) as usize;
        let claims = Claims {
            sub: username.to_string(),
            iat: now,
            exp: now + self.ttl_secs as usize,
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| ServiceError::Internal(format!("token encoding failed: {e}")))?;

        Ok(IssuedToken {
            token,
            token_type: "Bearer".to_string(),
            username: username.to_string(),
        })
    }

    /// Check the demo credentials and issue a token
    pub fn login(&self, username: &str, password: &str) -> ServiceResult<IssuedToken> {
        if username == self.demo_username && password == self.demo_password {
            self.issue(username)
        } else {
            Err(ServiceError::Unauthorized("Invalid credentials".to_string()))
        }
    }

    /// Validate a raw token and return its claims
    pub fn verify(&self, token: &str) -> ServiceResult<Claims> {
        decode::<Claims>(token, &self.decoding, &Validation::new(Algorithm::HS256))
            .map(|data| data.claims)
            .map_err(|e| {
                tracing::debug!(error = %e, "rejected bearer token");
                ServiceError::Unauthorized("Invalid or expired token".to_string())
            })
    }
}

impl AuthProvider for JwtAuthProvider {
    fn extract_context(&self, headers: &HeaderMap) -> ServiceResult<AuthContext> {
        let Some(value) = headers.get(header::AUTHORIZATION) else {
            return Ok(AuthContext::Anonymous);
        };

        let raw = value
            .to_str()
            .map_err(|_| ServiceError::Unauthorized("Invalid auth header format".to_string()))?;
        let token = raw
            .strip_prefix("Bearer ")
            .ok_or_else(|| ServiceError::Unauthorized("Invalid auth header format".to_string()))?;

        let claims = self.verify(token.trim())?;
        Ok(AuthContext::User {
            username: claims.sub,
        })
    }
}

/// State of the [`enforce_policy`] middleware
#[derive(Clone)]
pub struct AuthGuard {
    pub provider: Arc<dyn AuthProvider>,
    pub policy: AuthPolicy,
}

/// Middleware rejecting requests that do not satisfy the guard's policy
///
/// The resolved [`AuthContext`] is stored in the request extensions.
pub async fn enforce_policy(
    State(guard): State<AuthGuard>,
    mut req: Request,
    next: Next,
) -> Result<Response, ServiceError> {
    let context = guard.provider.extract_context(req.headers())?;

    if !guard.policy.check(&context) {
        return Err(ServiceError::Unauthorized(
            "Missing Authorization header".to_string(),
        ));
    }

    req.extensions_mut().insert(context);
    Ok(next.run(req).await)
}
