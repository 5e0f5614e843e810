use axum::{
    extract::{Extension, State},
    http::StatusCode,
    Json,
};
use axum_extra::extract::CookieJar;
use serde::{Deserialize, Serialize};

use crate::{
    api::{middleware::auth::CurrentAdmin, state::AppState},
    auth::{AuthService, SESSION_COOKIE},
    domain::validation::validate_new_password,
    error::{AppError, Result},
};

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub message: String,
    /// When set, every `/api` route answers 403 until the password is changed.
    pub force_password_change: bool,
}

pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(req): Json<LoginRequest>,
) -> Result<(CookieJar, Json<LoginResponse>)> {
    let auth_service = &state.service_context.auth_service;
    let username = req.username.trim();

    if !auth_service.login(username, &req.password).await? {
        tracing::info!("Failed login attempt for '{}'", username);
        return Err(AppError::InvalidCredentials);
    }

    let duration_hours = state.settings.auth.session_duration_hours;
    let (_session, token) = auth_service
        .create_session(username, duration_hours)
        .await?;

    let cookie = auth_service.create_session_cookie(&token, false, duration_hours);
    let force_password_change = auth_service.is_force_password_change().await?;

    Ok((
        jar.add(cookie),
        Json(LoginResponse {
            message: "Login successful".to_string(),
            force_password_change,
        }),
    ))
}

pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<(CookieJar, StatusCode)> {
    if let Some(session_cookie) = jar.get(SESSION_COOKIE) {
        let _ = state.service_context.auth_service
            .invalidate_session(session_cookie.value())
            .await;
    }

    let jar = jar.add(AuthService::create_logout_cookie());

    Ok((jar, StatusCode::NO_CONTENT))
}

#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    pub new_password: String,
    pub confirm_password: String,
}

#[derive(Debug, Serialize)]
pub struct ChangePasswordResponse {
    pub message: String,
    pub revoked_sessions: u64,
}

/// Also reachable while a password change is being forced.
pub async fn change_password(
    State(state): State<AppState>,
    Extension(admin): Extension<CurrentAdmin>,
    Json(req): Json<ChangePasswordRequest>,
) -> Result<Json<ChangePasswordResponse>> {
    let errors = validate_new_password(&req.new_password, &req.confirm_password);
    if !errors.is_empty() {
        return Err(AppError::Validation(errors));
    }

    let auth_service = &state.service_context.auth_service;
    auth_service.change_password(&admin.username, &req.new_password).await?;

    let revoked_sessions = auth_service
        .revoke_other_sessions(&admin.username, &admin.token)
        .await?;

    Ok(Json(ChangePasswordResponse {
        message: "Password updated".to_string(),
        revoked_sessions,
    }))
}
