use axum::extract::Request;
use axum::extract::State;
use axum::http::{self};
use axum::middleware::Next;
use axum::response::Response;
use chrono::Utc;

use crate::domain::access;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::policy::RouteDecision;
use crate::inbound::http::router::AppState;

/// Authentication gate.
///
/// Runs in front of every route and the fallback. Consults the route policy
/// table, short-circuits unroutable requests, and for protected routes
/// verifies the bearer token and attaches the resolved `Identity` to the
/// request extensions. Public routes dispatch with no identity attached.
pub async fn authenticate(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let decision = state.route_policy.decide(req.method(), req.uri().path());

    let required_role = match decision {
        RouteDecision::RouteNotFound => return Err(ApiError::RouteNotFound),
        RouteDecision::MethodNotAllowed => return Err(ApiError::MethodNotAllowed),
        RouteDecision::Public => return Ok(next.run(req).await),
        RouteDecision::Authenticated => None,
        RouteDecision::RequireRole(role) => Some(role),
    };

    let token = extract_bearer_token(&req)?;

    let identity = state
        .authenticator
        .verify_token(token, Utc::now())
        .map_err(|e| {
            tracing::warn!(error = %e, path = %req.uri().path(), "Bearer token rejected");
            ApiError::InvalidCredentials
        })?;

    if let Some(role) = required_role {
        access::require_role(Some(&identity), &[role])?;
    }

    req.extensions_mut().insert(identity);

    Ok(next.run(req).await)
}

fn extract_bearer_token(req: &Request) -> Result<&str, ApiError> {
    let header = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .ok_or(ApiError::MissingCredentials)?;

    let value = header.to_str().map_err(|_| ApiError::MissingCredentials)?;

    value
        .strip_prefix("Bearer ")
        .ok_or(ApiError::MissingCredentials)
}
