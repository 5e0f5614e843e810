use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::{api::state::AppState, error::AppError};

/// Bring every member's status in line with its end date before the request
/// reads or writes anything.
pub async fn refresh_member_statuses(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    state.service_context.member_service
        .refresh_statuses()
        .await?;

    Ok(next.run(request).await)
}
