use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;

use crate::{
    api::state::AppState,
    domain::{RenewalOutcome, RenewalPreview, RenewalRequest},
    error::{AppError, Result},
};

#[derive(Debug, Deserialize)]
pub struct PreviewParams {
    #[serde(default)]
    plan_type: Option<String>,
}

/// Prefilled renewal values. Picking another plan via `?plan_type=`
/// recomputes the end date.
pub async fn preview(
    State(state): State<AppState>,
    Path(member_id): Path<i64>,
    Query(params): Query<PreviewParams>,
) -> Result<Json<RenewalPreview>> {
    let preview = state.service_context.renewal_service
        .preview(member_id, params.plan_type.as_deref())
        .await?
        .ok_or_else(|| AppError::NotFound("Member not found".to_string()))?;

    Ok(Json(preview))
}

pub async fn renew(
    State(state): State<AppState>,
    Path(member_id): Path<i64>,
    Json(request): Json<RenewalRequest>,
) -> Result<Json<RenewalOutcome>> {
    let outcome = state.service_context.renewal_service
        .renew(member_id, request)
        .await?;

    Ok(Json(outcome))
}
