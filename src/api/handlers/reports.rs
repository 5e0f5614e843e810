use axum::{
    extract::State,
    http::header,
    response::IntoResponse,
    Json,
};

use crate::{
    api::state::AppState,
    domain::MonthlyRevenue,
    error::Result,
};

fn csv_response(filename: &'static str, body: Vec<u8>) -> impl IntoResponse {
    (
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, format!("attachment; filename=\"{}\"", filename)),
        ],
        body,
    )
}

pub async fn members_csv(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let body = state.service_context.report_service.members_csv().await?;
    Ok(csv_response("members.csv", body))
}

pub async fn payments_csv(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let body = state.service_context.report_service.payments_csv().await?;
    Ok(csv_response("payments.csv", body))
}

pub async fn revenue(State(state): State<AppState>) -> Result<Json<Vec<MonthlyRevenue>>> {
    let summary = state.service_context.report_service.revenue_summary().await?;
    Ok(Json(summary))
}

pub async fn revenue_csv(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let body = state.service_context.report_service.revenue_csv().await?;
    Ok(csv_response("revenue.csv", body))
}
