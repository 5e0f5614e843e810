use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    api::state::AppState,
    domain::{Payment, RecordPaymentRequest},
    error::{AppError, Result},
};

pub async fn list_by_member(
    State(state): State<AppState>,
    Path(member_id): Path<i64>,
) -> Result<Json<Vec<Payment>>> {
    if state.service_context.member_service.get_member(member_id).await?.is_none() {
        return Err(AppError::NotFound("Member not found".to_string()));
    }

    let payments = state.service_context.payment_service
        .list_for_member(member_id)
        .await?;

    Ok(Json(payments))
}

pub async fn create(
    State(state): State<AppState>,
    Path(member_id): Path<i64>,
    Json(request): Json<RecordPaymentRequest>,
) -> Result<(StatusCode, Json<Payment>)> {
    let payment = state.service_context.payment_service
        .record_payment(member_id, request)
        .await?;

    Ok((StatusCode::CREATED, Json(payment)))
}
