use std::sync::Arc;

use chrono::NaiveDate;
use serde::Serialize;

use crate::{
    domain::{
        plan::{self, calc_end_date, infer_status_on, is_known_plan, parse_iso_date, DateError},
        validation::{parse_price, validate_member_inputs, DATE_FORMAT_ERROR, DATE_RANGE_ERROR},
        ExpiringMember, Member, MemberFilter, MemberForm, MemberRecord, MemberStatus,
    },
    error::{AppError, Result},
    repository::{MemberRepository, PaymentRepository},
};

#[derive(Debug, Clone, Serialize)]
pub struct DashboardSummary {
    pub active_members: i64,
    pub expiring_soon_count: usize,
    pub monthly_revenue: f64,
    pub expiring_soon: Vec<ExpiringMember>,
}

pub struct MemberService {
    repo: Arc<dyn MemberRepository>,
    payments: Arc<dyn PaymentRepository>,
    expiring_soon_days: i64,
}

impl MemberService {
    pub fn new(
        repo: Arc<dyn MemberRepository>,
        payments: Arc<dyn PaymentRepository>,
        expiring_soon_days: i64,
    ) -> Self {
        Self { repo, payments, expiring_soon_days }
    }

    /// Recompute every member's status from its end date. Only rows whose
    /// stored status is stale get written. Returns how many changed.
    pub async fn refresh_statuses(&self) -> Result<u64> {
        self.refresh_statuses_on(plan::today()).await
    }

    pub async fn refresh_statuses_on(&self, today: NaiveDate) -> Result<u64> {
        let stale: Vec<(i64, MemberStatus)> = self
            .repo
            .status_snapshots()
            .await?
            .into_iter()
            .filter_map(|snapshot| {
                let status = infer_status_on(snapshot.end_date, today);
                (status != snapshot.status).then_some((snapshot.id, status))
            })
            .collect();

        let changed = self.repo.set_statuses(&stale).await?;
        if changed > 0 {
            tracing::debug!("Status refresh updated {} member(s)", changed);
        }
        Ok(changed)
    }

    pub async fn create_member(&self, form: MemberForm) -> Result<Member> {
        let record = build_record(form, plan::today())?;
        let member = self.repo.create(record).await?;

        tracing::info!("Added member {} ({})", member.id, member.full_name);
        Ok(member)
    }

    pub async fn update_member(&self, id: i64, form: MemberForm) -> Result<Member> {
        let existing = self.repo.find_by_id(id).await?
            .ok_or_else(|| AppError::NotFound("Member not found".to_string()))?;

        let mut form = form;
        if form.join_date.is_none() {
            form.join_date = Some(plan::format_iso_date(existing.join_date));
        }

        let record = build_record(form, plan::today())?;
        let member = self.repo.update(id, record).await?;

        tracing::info!("Updated member {}", member.id);
        Ok(member)
    }

    pub async fn get_member(&self, id: i64) -> Result<Option<Member>> {
        self.repo.find_by_id(id).await
    }

    pub async fn list_members(&self, filter: &MemberFilter) -> Result<Vec<Member>> {
        self.repo.list(filter).await
    }

    pub async fn delete_member(&self, id: i64) -> Result<()> {
        if !self.repo.delete(id).await? {
            return Err(AppError::NotFound("Member not found".to_string()));
        }

        tracing::info!("Deleted member {} and its payments", id);
        Ok(())
    }

    /// Active members whose plan ends within the configured window.
    pub async fn expiring_soon(&self) -> Result<Vec<ExpiringMember>> {
        let (from, until) = plan::expiring_window(plan::today(), self.expiring_soon_days);
        self.repo.list_expiring(from, until).await
    }

    pub async fn dashboard(&self) -> Result<DashboardSummary> {
        let today = plan::today();
        let active_members = self.repo.count_by_status(MemberStatus::Active).await?;

        let (from, until) = plan::expiring_window(today, self.expiring_soon_days);
        let expiring_soon = self.repo.list_expiring(from, until).await?;

        let (month_start, next_month) = plan::month_bounds(today);
        let monthly_revenue = self.payments.revenue_between(month_start, next_month).await?;

        Ok(DashboardSummary {
            active_members,
            expiring_soon_count: expiring_soon.len(),
            monthly_revenue,
            expiring_soon,
        })
    }
}

/// Validate a member form and turn it into storable values. The end date is
/// derived from the plan when the form leaves it out; the status is inferred
/// from the end date unless the form overrides it.
fn build_record(form: MemberForm, today: NaiveDate) -> Result<MemberRecord> {
    let mut range_error = false;
    let end_date = match non_blank(form.end_date.as_deref()) {
        Some(end) => end.to_string(),
        None => {
            let plan_type = form.plan_type.trim();
            if !plan_type.is_empty() && !is_known_plan(plan_type) {
                tracing::debug!(
                    "Unknown plan type '{}', counting it as {} month(s)",
                    plan_type,
                    plan::DEFAULT_PLAN_MONTHS
                );
            }
            calc_end_date(&form.start_date, plan_type).unwrap_or_else(|e| {
                range_error = e == DateError::OutOfRange;
                String::new()
            })
        }
    };

    let mut errors = validate_member_inputs(
        &form.full_name,
        &form.phone,
        &form.plan_price,
        &form.start_date,
        &end_date,
    );
    if range_error {
        errors.retain(|e| e != DATE_FORMAT_ERROR);
        errors.push(DATE_RANGE_ERROR.to_string());
    }

    if form.plan_type.trim().is_empty() {
        errors.push("Plan type is required.".to_string());
    }

    let join_date = match non_blank(form.join_date.as_deref()) {
        Some(value) => match parse_iso_date(value) {
            Ok(date) => Some(date),
            Err(_) => {
                errors.push("Join date must be a valid ISO date (YYYY-MM-DD).".to_string());
                None
            }
        },
        None => Some(today),
    };

    if !errors.is_empty() {
        return Err(AppError::Validation(errors));
    }

    let start_date = parse_iso_date(&form.start_date)
        .map_err(|_| AppError::validation(DATE_FORMAT_ERROR))?;
    let end_date = parse_iso_date(&end_date)
        .map_err(|_| AppError::validation(DATE_FORMAT_ERROR))?;
    let plan_price = parse_price(&form.plan_price)
        .ok_or_else(|| AppError::validation("Plan price must be a non-negative number."))?;

    Ok(MemberRecord {
        full_name: form.full_name.trim().to_string(),
        phone: form.phone.trim().to_string(),
        national_id: non_blank(form.national_id.as_deref()).map(str::to_string),
        join_date: join_date.unwrap_or(today),
        plan_type: form.plan_type.trim().to_string(),
        plan_price,
        start_date,
        end_date,
        status: form.status.unwrap_or_else(|| infer_status_on(end_date, today)),
    })
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
