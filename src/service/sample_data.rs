use chrono::{Datelike, Days, NaiveDate};
use serde::Serialize;

use crate::{
    domain::{
        plan::{end_date_for, infer_status_on},
        MemberRecord, NewPayment, PaymentMethod,
    },
    error::{AppError, Result},
    repository::{MemberRepository, PaymentRepository},
};

#[derive(Debug, Clone, Serialize)]
pub struct SampleDataSummary {
    pub member_ids: Vec<i64>,
    pub payments: u64,
}

/// Insert three demo members (one about to expire, one on a longer plan, one
/// already expired) and a payment for each. Every call adds new rows.
pub async fn insert_sample_data(
    members: &dyn MemberRepository,
    payments: &dyn PaymentRepository,
    today: NaiveDate,
) -> Result<SampleDataSummary> {
    let day_in_month = |back: u32| today.with_day(today.day().saturating_sub(back).max(1)).unwrap_or(today);

    let expiring_start = day_in_month(25);
    let expiring_end = today + Days::new(5);

    let long_start = day_in_month(10);
    let long_end = end_date_for(long_start, "3 months")
        .ok_or_else(|| AppError::Internal("Sample plan end date out of range".to_string()))?;

    let expired_start = today - Days::new(60);
    let expired_end = today - Days::new(2);

    let samples = [
        ("Ahmed Hassan", "01000000001", Some("12345678901234"), "1 month", 300.0, expiring_start, expiring_end),
        ("Mona Ali", "01000000002", None, "3 months", 800.0, long_start, long_end),
        ("Omar Samy", "01000000003", None, "1 month", 300.0, expired_start, expired_end),
    ];

    let mut member_ids = Vec::with_capacity(samples.len());
    for (full_name, phone, national_id, plan_type, plan_price, start_date, end_date) in samples {
        let member = members
            .create(MemberRecord {
                full_name: full_name.to_string(),
                phone: phone.to_string(),
                national_id: national_id.map(str::to_string),
                join_date: today,
                plan_type: plan_type.to_string(),
                plan_price,
                start_date,
                end_date,
                status: infer_status_on(end_date, today),
            })
            .await?;
        member_ids.push(member.id);
    }

    let sample_payments = [
        (member_ids[0], 300.0, today, PaymentMethod::Cash, "Sample payment"),
        (member_ids[1], 800.0, today, PaymentMethod::Card, "3-month plan paid"),
        (member_ids[2], 300.0, today - Days::new(60), PaymentMethod::Transfer, "Old payment"),
    ]
    .map(|(member_id, amount, date, method, notes)| NewPayment {
        member_id,
        amount,
        date,
        method,
        notes: Some(notes.to_string()),
    });

    let payment_count = payments.create_many(&sample_payments).await?;

    tracing::info!("Inserted {} sample members and {} payments", member_ids.len(), payment_count);
    Ok(SampleDataSummary { member_ids, payments: payment_count })
}
