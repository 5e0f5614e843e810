use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use serde_json::{json, Value};

use crate::{
    api::state::AppState,
    domain::plan::{self, DEFAULT_PLAN_MONTHS},
    error::Result,
    service::SampleDataSummary,
};

#[derive(Debug, Serialize)]
pub struct PlanInfo {
    pub plan_type: &'static str,
    pub months: u32,
}

pub async fn plans() -> Json<Value> {
    let plans: Vec<PlanInfo> = plan::plan_types()
        .map(|plan_type| PlanInfo { plan_type, months: plan::plan_months(plan_type) })
        .collect();

    Json(json!({
        "plans": plans,
        "default_months": DEFAULT_PLAN_MONTHS,
    }))
}

pub async fn sample_data(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<SampleDataSummary>)> {
    let summary = state.service_context.insert_sample_data().await?;
    Ok((StatusCode::CREATED, Json(summary)))
}
