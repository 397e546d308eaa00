use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::Response;

use relance_core::models::practitioner::Role;

use crate::jwt;
use crate::state::AppState;

/// JWT validation middleware.
///
/// Extracts the `Authorization: Bearer <token>` header, validates the JWT
/// against the user pool's public key, and inserts [`AuthUser`] into request
/// extensions for handlers to use.
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let auth_header = req
        .headers()
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .ok_or(StatusCode::UNAUTHORIZED)?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or(StatusCode::UNAUTHORIZED)?;

    let claims = jwt::validate_token(token, &state.auth.decoding_key, &state.auth.issuer)
        .map_err(|e| {
            tracing::debug!(error = %e, "token rejected");
            StatusCode::UNAUTHORIZED
        })?;

    let user = AuthUser {
        role: claims.role(),
        sub: claims.sub,
        email: claims.email,
    };
    req.extensions_mut().insert(user);

    Ok(next.run(req).await)
}

/// Admin gate for the sweep endpoints. Layered inside `require_auth`; the
/// role comes from the validated claims, never from the client.
pub async fn require_admin(req: Request, next: Next) -> Result<Response, StatusCode> {
    match req.extensions().get::<AuthUser>() {
        Some(user) if user.role == Role::Admin => Ok(next.run(req).await),
        Some(_) => Err(StatusCode::FORBIDDEN),
        None => Err(StatusCode::UNAUTHORIZED),
    }
}

/// Authenticated practitioner extracted from JWT claims.
#[derive(Clone, Debug)]
#[allow(dead_code)]
pub struct AuthUser {
    pub sub: String,
    pub email: Option<String>,
    pub role: Role,
}
