use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};

use crate::error::{AppError, AppResult};
use crate::services::access::{resolve_actor, Actor};
use crate::utils::jwt::verify_token;
use crate::AppState;

/// Validate the bearer token and resolve the caller from the database.
/// The resolved `Actor` is stored in the request extensions.
pub async fn auth_middleware(
    State(state): State<AppState>,
    auth: Option<TypedHeader<Authorization<Bearer>>>,
    mut request: Request,
    next: Next,
) -> AppResult<Response> {
    let TypedHeader(auth) = auth
        .ok_or_else(|| AppError::Unauthorized("Authentication required".to_string()))?;

    let claims = verify_token(auth.token(), &state.config.jwt_secret)?;
    let actor = resolve_actor(&state.db, claims.sub).await?;

    request.extensions_mut().insert(actor);
    Ok(next.run(request).await)
}

fn actor_of(request: &Request) -> AppResult<&Actor> {
    request
        .extensions()
        .get::<Actor>()
        .ok_or_else(|| AppError::Unauthorized("No authentication found".to_string()))
}

/// Require admin role
pub async fn require_admin(request: Request, next: Next) -> AppResult<Response> {
    actor_of(&request)?.require_admin()?;
    Ok(next.run(request).await)
}

/// Require receptionist or admin role
pub async fn require_staff(request: Request, next: Next) -> AppResult<Response> {
    actor_of(&request)?.require_staff()?;
    Ok(next.run(request).await)
}
