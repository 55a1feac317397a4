//! # Identity Middleware
//!
//! Authentication happens upstream. The session layer in front of this
//! service forwards the signed-in user's id in the `X-User-Id` header;
//! [`CurrentUser`] resolves it against the store for every request that
//! needs an identity.
//!
//! Failures are split the same way everywhere: no usable identity is an
//! authentication error (401), an identity with the wrong role is an
//! authorization error (403). Role checks run before any other read or
//! write of the request.

use std::sync::Arc;

use async_trait::async_trait;
use axum::{extract::FromRequestParts, http::request::Parts};
use tutorsync_core::errors::TutorError;
use tutorsync_core::models::user::{Role, User};
use uuid::Uuid;

use crate::{middleware::error_handling::AppError, ApiState};

/// Header carrying the authenticated user's id.
pub const USER_ID_HEADER: &str = "x-user-id";

/// The user making the request.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

impl CurrentUser {
    /// Rejects the request unless the user holds one of `roles`.
    pub fn require(&self, roles: &[Role]) -> Result<&User, TutorError> {
        if roles.contains(&self.0.role) {
            Ok(&self.0)
        } else {
            tracing::warn!(
                "User {} with role {} denied; requires {:?}",
                self.0.id,
                self.0.role,
                roles
            );
            Err(TutorError::Authorization(format!(
                "This action requires the {} role",
                roles
                    .iter()
                    .map(Role::as_str)
                    .collect::<Vec<_>>()
                    .join(" or ")
            )))
        }
    }
}

#[async_trait]
impl FromRequestParts<Arc<ApiState>> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &Arc<ApiState>) -> Result<Self, Self::Rejection> {
        let raw = parts
            .headers
            .get(USER_ID_HEADER)
            .ok_or_else(|| TutorError::Authentication("Missing X-User-Id header".to_string()))?;

        let id = raw
            .to_str()
            .ok()
            .and_then(|value| Uuid::parse_str(value.trim()).ok())
            .ok_or_else(|| TutorError::Authentication("Malformed X-User-Id header".to_string()))?;

        let user = state
            .store
            .get_user(id)
            .await?
            .ok_or_else(|| TutorError::Authentication(format!("Unknown user {id}")))?;

        Ok(CurrentUser(user))
    }
}
