use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use shared::ServiceError;
use uuid::Uuid;

use crate::error::ApiError;
use crate::services::profile_service::AuthIdentity;

/// Session identity forwarded by the auth gateway. The gateway
/// terminates the session; inside the deployment boundary these
/// headers are the source of truth, and a request without a parseable
/// user id is rejected before any handler runs.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: Uuid,
    pub email: Option<String>,
    pub display_name: Option<String>,
}

impl AuthUser {
    pub fn identity(&self) -> AuthIdentity {
        AuthIdentity {
            id: self.id,
            email: self.email.clone(),
            display_name: self.display_name.clone(),
        }
    }
}

fn header_string(parts: &Parts, name: &str) -> Option<String> {
    parts
        .headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.to_string())
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let id = header_string(parts, "x-user-id")
            .and_then(|value| Uuid::parse_str(&value).ok())
            .ok_or(ApiError(ServiceError::Unauthenticated))?;

        Ok(AuthUser {
            id,
            email: header_string(parts, "x-user-email"),
            display_name: header_string(parts, "x-user-name"),
        })
    }
}
