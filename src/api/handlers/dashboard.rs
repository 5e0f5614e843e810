use axum::{extract::State, Json};

use crate::{
    api::state::AppState,
    domain::ExpiringMember,
    error::Result,
    service::DashboardSummary,
};

pub async fn dashboard(State(state): State<AppState>) -> Result<Json<DashboardSummary>> {
    let summary = state.service_context.member_service.dashboard().await?;
    Ok(Json(summary))
}

/// Active members whose plan ends soon, soonest first.
pub async fn reminders(State(state): State<AppState>) -> Result<Json<Vec<ExpiringMember>>> {
    let members = state.service_context.member_service.expiring_soon().await?;
    Ok(Json(members))
}
