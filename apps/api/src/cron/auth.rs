use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use subtle::ConstantTimeEq;

use crate::errors::AppError;
use crate::state::AppState;

/// Accepts exactly `Authorization: Bearer <secret>`; no extra whitespace.
pub fn bearer_matches(header: Option<&str>, secret: &str) -> bool {
    match header.and_then(|h| h.strip_prefix("Bearer ")) {
        Some(token) => !secret.is_empty() && bool::from(token.as_bytes().ct_eq(secret.as_bytes())),
        None => false,
    }
}

pub async fn require_cron_secret(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let header = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok());
    if !bearer_matches(header, &state.config.cron_secret) {
        return Err(AppError::Unauthorized);
    }
    Ok(next.run(req).await)
}
