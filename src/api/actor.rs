//! Acting-employee extraction.
//!
//! Authentication happens upstream; the gateway forwards the signed-in
//! employee's id and role as headers.

use async_trait::async_trait;
use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
};

use crate::models::{Actor, Role};

use super::response::{ApiError, ApiErrorResponse};

/// Header carrying the acting employee's id.
pub const EMPLOYEE_ID_HEADER: &str = "x-employee-id";

/// Header carrying the acting employee's role (`admin` or `user`).
pub const EMPLOYEE_ROLE_HEADER: &str = "x-employee-role";

/// The employee making the request.
#[derive(Debug, Clone)]
pub struct CurrentActor(pub Actor);

fn header_value<'a>(parts: &'a Parts, name: &str) -> Option<&'a str> {
    parts
        .headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

fn unauthenticated(message: String) -> ApiErrorResponse {
    ApiErrorResponse::new(StatusCode::UNAUTHORIZED, ApiError::unauthenticated(message))
}

#[async_trait]
impl<S> FromRequestParts<S> for CurrentActor
where
    S: Send + Sync,
{
    type Rejection = ApiErrorResponse;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let employee_id = header_value(parts, EMPLOYEE_ID_HEADER)
            .ok_or_else(|| unauthenticated(format!("Missing {} header", EMPLOYEE_ID_HEADER)))?;
        let role_name = header_value(parts, EMPLOYEE_ROLE_HEADER)
            .ok_or_else(|| unauthenticated(format!("Missing {} header", EMPLOYEE_ROLE_HEADER)))?;
        let role = Role::from_name(role_name)
            .ok_or_else(|| unauthenticated(format!("Unknown role '{}'", role_name)))?;

        Ok(CurrentActor(Actor::new(employee_id, role)))
    }
}
