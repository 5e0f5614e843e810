use std::sync::Arc;

use chrono::{Datelike, NaiveDate};

use crate::{
    domain::{
        normalize_notes,
        plan::{
            self, calc_end_date, end_date_for, format_iso_date, infer_status_on, is_known_plan,
            parse_iso_date, DateError,
        },
        validation::{
            parse_price, validate_member_inputs, validate_payment_amount, DATE_FORMAT_ERROR,
            DATE_RANGE_ERROR,
        },
        NewPayment, PlanChange, RenewalOutcome, RenewalPreview, RenewalRequest,
    },
    error::{AppError, Result},
    repository::MemberRepository,
};

/// Extends a running membership or restarts an expired one.
///
/// A renewal rewrites the member's plan, price, dates and status and can
/// record the matching payment, dated today. Both writes share one
/// transaction.
pub struct RenewalService {
    members: Arc<dyn MemberRepository>,
}

impl RenewalService {
    pub fn new(members: Arc<dyn MemberRepository>) -> Self {
        Self { members }
    }

    /// Default start and end dates for renewing onto `plan_type` (the
    /// member's current plan when `None`).
    pub async fn preview(&self, member_id: i64, plan_type: Option<&str>) -> Result<Option<RenewalPreview>> {
        self.preview_on(member_id, plan_type, plan::today()).await
    }

    pub async fn preview_on(
        &self,
        member_id: i64,
        plan_type: Option<&str>,
        today: NaiveDate,
    ) -> Result<Option<RenewalPreview>> {
        let Some(member) = self.members.find_by_id(member_id).await? else {
            return Ok(None);
        };

        let plan_type = plan_type
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .unwrap_or(member.plan_type.as_str())
            .to_string();
        let (start_date, end_date) = default_start_date(member.end_date, today)
            .and_then(|start| Some((start, end_date_for(start, &plan_type)?)))
            .filter(|(_, end)| end.year() <= 9999)
            .ok_or_else(|| AppError::validation(DATE_RANGE_ERROR))?;

        Ok(Some(RenewalPreview {
            member_id: member.id,
            current_plan_type: member.plan_type,
            current_plan_price: member.plan_price,
            current_end_date: member.end_date,
            status: member.status,
            plan_type,
            start_date,
            end_date,
        }))
    }

    pub async fn renew(&self, member_id: i64, request: RenewalRequest) -> Result<RenewalOutcome> {
        self.renew_on(member_id, request, plan::today()).await
    }

    pub async fn renew_on(
        &self,
        member_id: i64,
        request: RenewalRequest,
        today: NaiveDate,
    ) -> Result<RenewalOutcome> {
        let member = self.members.find_by_id(member_id).await?
            .ok_or_else(|| AppError::NotFound("Member not found".to_string()))?;

        let start_date = match request.start_date.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            Some(start) => start.to_string(),
            None => default_start_date(member.end_date, today)
                .map(format_iso_date)
                .ok_or_else(|| AppError::validation(DATE_RANGE_ERROR))?,
        };

        let plan_type = request.plan_type.trim();
        if !plan_type.is_empty() && !is_known_plan(plan_type) {
            tracing::debug!(
                "Unknown plan type '{}', counting it as {} month(s)",
                plan_type,
                plan::DEFAULT_PLAN_MONTHS
            );
        }

        let mut range_error = false;
        let end_date = calc_end_date(&start_date, plan_type).unwrap_or_else(|e| {
            range_error = e == DateError::OutOfRange;
            String::new()
        });

        let mut errors = validate_member_inputs(
            &member.full_name,
            &member.phone,
            &request.plan_price,
            &start_date,
            &end_date,
        );
        if range_error {
            errors.retain(|e| e != DATE_FORMAT_ERROR);
            errors.push(DATE_RANGE_ERROR.to_string());
        }
        if plan_type.is_empty() {
            errors.push("Plan type is required.".to_string());
        }
        if request.record_payment {
            if let Some(price) = parse_price(&request.plan_price) {
                errors.extend(validate_payment_amount(price));
            }
        }
        if !errors.is_empty() {
            return Err(AppError::Validation(errors));
        }

        let invalid_dates = || AppError::validation(DATE_FORMAT_ERROR);
        let start = parse_iso_date(&start_date).map_err(|_| invalid_dates())?;
        let end = parse_iso_date(&end_date).map_err(|_| invalid_dates())?;
        let price = parse_price(&request.plan_price)
            .ok_or_else(|| AppError::validation("Plan price must be a non-negative number."))?;

        let change = PlanChange {
            plan_type: plan_type.to_string(),
            plan_price: price,
            start_date: start,
            end_date: end,
            status: infer_status_on(end, today),
        };

        let payment = request.record_payment.then(|| NewPayment {
            member_id,
            amount: price,
            date: today,
            method: request.payment_method,
            notes: normalize_notes(request.payment_notes.clone()),
        });
        let payment_recorded = payment.is_some();

        let member = self.members.renew(member_id, change, payment).await?;

        tracing::info!(
            "Renewed member {} on '{}' from {} to {}",
            member.id,
            member.plan_type,
            member.start_date,
            member.end_date
        );

        Ok(RenewalOutcome { member, payment_recorded })
    }
}

/// Renewal start used when none is given, kept within four-digit years.
fn default_start_date(current_end: NaiveDate, today: NaiveDate) -> Option<NaiveDate> {
    plan::renewal_start_date(current_end, today).filter(|start| start.year() <= 9999)
}
