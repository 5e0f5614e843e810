use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::CookieJar;

use crate::{
    api::state::AppState,
    auth::SESSION_COOKIE,
    error::AppError,
};

/// The signed-in owner, resolved from the session cookie and handed to
/// handlers as a request extension.
#[derive(Clone, Debug)]
pub struct CurrentAdmin {
    pub username: String,
    /// Raw session token, needed to keep this session alive when others are revoked.
    pub token: String,
}

pub async fn require_auth(
    State(state): State<AppState>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let session_cookie = jar
        .get(SESSION_COOKIE)
        .ok_or(AppError::Unauthorized)?;

    let session = state.service_context.auth_service
        .validate_session(session_cookie.value())
        .await?
        .ok_or(AppError::Unauthorized)?;

    request.extensions_mut().insert(CurrentAdmin {
        username: session.username,
        token: session_cookie.value().to_string(),
    });

    Ok(next.run(request).await)
}

/// Blocks everything behind it until the default password has been replaced.
pub async fn require_password_changed(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    if state.service_context.auth_service.is_force_password_change().await? {
        return Err(AppError::PasswordChangeRequired);
    }

    Ok(next.run(request).await)
}
