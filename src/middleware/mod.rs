use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::{error::AppError, queries::token_queries, utils::token, AppState};

/// Resolves the bearer token to its owning user before any handler runs.
/// Tokens are opaque: the presented value is hashed and looked up, so a
/// revoked or never-issued token fails here with 401.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let auth_header = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .and_then(|header| header.to_str().ok())
        .ok_or_else(|| AppError::Unauthorized("Authentication required".to_string()))?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| AppError::Unauthorized("Invalid token format".to_string()))?;

    let user = token_queries::find_user_by_token_hash(&state.db, &token::hash(token))
        .await?
        .ok_or_else(|| AppError::Unauthorized("Invalid or revoked token".to_string()))?;

    req.extensions_mut().insert(user);

    Ok(next.run(req).await)
}
