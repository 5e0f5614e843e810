use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;

use crate::{
    api::state::AppState,
    domain::{Member, MemberFilter, MemberForm},
    error::{AppError, Result},
};

#[derive(Debug, Serialize)]
pub struct ListResponse {
    members: Vec<Member>,
    total: usize,
}

/// `?search=&status=all|active|expired&sort=end_date|newest`
pub async fn list(
    State(state): State<AppState>,
    Query(filter): Query<MemberFilter>,
) -> Result<Json<ListResponse>> {
    let members = state.service_context.member_service
        .list_members(&filter)
        .await?;

    let total = members.len();
    Ok(Json(ListResponse { members, total }))
}

pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Member>> {
    let member = state.service_context.member_service
        .get_member(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Member not found".to_string()))?;

    Ok(Json(member))
}

pub async fn create(
    State(state): State<AppState>,
    Json(form): Json<MemberForm>,
) -> Result<(StatusCode, Json<Member>)> {
    let member = state.service_context.member_service
        .create_member(form)
        .await?;

    Ok((StatusCode::CREATED, Json(member)))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(form): Json<MemberForm>,
) -> Result<Json<Member>> {
    let member = state.service_context.member_service
        .update_member(id, form)
        .await?;

    Ok(Json(member))
}

/// Payments go with the member.
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode> {
    state.service_context.member_service
        .delete_member(id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
