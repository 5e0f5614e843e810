mod common;

use chrono::Days;
use common::{days_from_today, member_form, test_context};
use gymkeeper::{
    domain::{
        plan::{self, add_months},
        validation::{DATE_FORMAT_ERROR, DATE_RANGE_ERROR},
        MemberStatus, NewPayment, PaymentMethod, PlanChange, RenewalRequest,
    },
    error::AppError,
};

fn renewal(plan_type: &str, plan_price: &str) -> RenewalRequest {
    RenewalRequest {
        plan_type: plan_type.to_string(),
        plan_price: plan_price.to_string(),
        start_date: None,
        record_payment: true,
        payment_method: PaymentMethod::Card,
        payment_notes: Some("Renewal".to_string()),
    }
}

#[tokio::test]
async fn test_renewing_active_member_continues_after_current_end() -> anyhow::Result<()> {
    let ctx = test_context().await?;
    let current_end = days_from_today(10);

    let member = ctx.member_service
        .create_member(member_form("Ahmed Hassan", days_from_today(-20), current_end))
        .await?;

    let outcome = ctx.renewal_service
        .renew(member.id, renewal("3 months", "800"))
        .await?;

    let expected_start = current_end + Days::new(1);
    assert!(outcome.payment_recorded);
    assert_eq!(outcome.member.start_date, expected_start);
    assert_eq!(outcome.member.end_date, add_months(expected_start, 3).unwrap());
    assert_eq!(outcome.member.plan_type, "3 months");
    assert_eq!(outcome.member.plan_price, 800.0);
    assert_eq!(outcome.member.status, MemberStatus::Active);

    let payments = ctx.payment_service.list_for_member(member.id).await?;
    assert_eq!(payments.len(), 1);
    assert_eq!(payments[0].amount, 800.0);
    assert_eq!(payments[0].date, plan::today());
    assert_eq!(payments[0].method, PaymentMethod::Card);
    assert_eq!(payments[0].notes.as_deref(), Some("Renewal"));

    Ok(())
}

#[tokio::test]
async fn test_renewing_expired_member_starts_today() -> anyhow::Result<()> {
    let ctx = test_context().await?;

    let member = ctx.member_service
        .create_member(member_form("Omar Samy", days_from_today(-60), days_from_today(-2)))
        .await?;
    assert_eq!(member.status, MemberStatus::Expired);

    let preview = ctx.renewal_service
        .preview(member.id, None)
        .await?
        .expect("member exists");
    assert_eq!(preview.plan_type, "1 month");
    assert_eq!(preview.start_date, plan::today());

    let mut request = renewal("1 month", "300");
    request.record_payment = false;
    let outcome = ctx.renewal_service.renew(member.id, request).await?;

    assert!(!outcome.payment_recorded);
    assert_eq!(outcome.member.start_date, plan::today());
    assert_eq!(outcome.member.end_date, add_months(plan::today(), 1).unwrap());
    assert_eq!(outcome.member.status, MemberStatus::Active);
    assert!(ctx.payment_service.list_for_member(member.id).await?.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_preview_follows_selected_plan() -> anyhow::Result<()> {
    let ctx = test_context().await?;
    let current_end = days_from_today(4);

    let member = ctx.member_service
        .create_member(member_form("Mona Ali", days_from_today(-26), current_end))
        .await?;

    let preview = ctx.renewal_service
        .preview(member.id, Some("12 months"))
        .await?
        .expect("member exists");
    let start = current_end + Days::new(1);
    assert_eq!(preview.current_plan_type, "1 month");
    assert_eq!(preview.current_end_date, current_end);
    assert_eq!(preview.start_date, start);
    assert_eq!(preview.end_date, add_months(start, 12).unwrap());

    assert!(ctx.renewal_service.preview(999, None).await?.is_none());

    Ok(())
}

#[tokio::test]
async fn test_invalid_renewal_changes_nothing() -> anyhow::Result<()> {
    let ctx = test_context().await?;

    let member = ctx.member_service
        .create_member(member_form("Sara", days_from_today(-10), days_from_today(20)))
        .await?;

    let bad_price = ctx.renewal_service.renew(member.id, renewal("1 month", "abc")).await;
    assert!(matches!(bad_price, Err(AppError::Validation(_))));

    let free_with_payment = ctx.renewal_service
        .renew(member.id, renewal("1 month", "0"))
        .await
        .unwrap_err();
    match free_with_payment {
        AppError::Validation(errors) => assert_eq!(errors, vec!["Amount must be > 0.".to_string()]),
        other => panic!("expected validation error, got {:?}", other),
    }

    let mut bad_start = renewal("1 month", "300");
    bad_start.start_date = Some("not-a-date".to_string());
    assert!(matches!(
        ctx.renewal_service.renew(member.id, bad_start).await,
        Err(AppError::Validation(_))
    ));

    assert_eq!(ctx.member_service.get_member(member.id).await?, Some(member.clone()));
    assert!(ctx.payment_service.list_for_member(member.id).await?.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_failed_payment_insert_rolls_back_plan_change() -> anyhow::Result<()> {
    let ctx = test_context().await?;

    let member = ctx.member_service
        .create_member(member_form("Atomic", days_from_today(-10), days_from_today(20)))
        .await?;

    let change = PlanChange {
        plan_type: "6 months".to_string(),
        plan_price: 1500.0,
        start_date: days_from_today(21),
        end_date: add_months(days_from_today(21), 6).unwrap(),
        status: MemberStatus::Active,
    };
    // Rejected by the amount CHECK constraint after the member row was updated.
    let payment = NewPayment {
        member_id: member.id,
        amount: -1.0,
        date: plan::today(),
        method: PaymentMethod::Cash,
        notes: None,
    };

    let result = ctx.member_repo.renew(member.id, change, Some(payment)).await;
    assert!(matches!(result, Err(AppError::Database(_))));

    assert_eq!(ctx.member_service.get_member(member.id).await?, Some(member.clone()));
    assert!(ctx.payment_service.list_for_member(member.id).await?.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_renewing_missing_member_is_not_found() -> anyhow::Result<()> {
    let ctx = test_context().await?;

    let result = ctx.renewal_service.renew(42, renewal("1 month", "300")).await;
    assert!(matches!(result, Err(AppError::NotFound(_))));

    Ok(())
}

#[tokio::test]
async fn test_signed_year_start_is_rejected() -> anyhow::Result<()> {
    let ctx = test_context().await?;

    let mut form = member_form("Far Future", days_from_today(0), days_from_today(30));
    form.start_date = "+262142-06-01".to_string();
    form.end_date = None;
    form.plan_type = "12 months".to_string();

    match ctx.member_service.create_member(form).await {
        Err(AppError::Validation(errors)) => assert_eq!(errors, vec![DATE_FORMAT_ERROR.to_string()]),
        other => panic!("expected validation error, got {:?}", other),
    }

    Ok(())
}

#[tokio::test]
async fn test_renewal_past_year_9999_is_a_validation_error() -> anyhow::Result<()> {
    let ctx = test_context().await?;

    let mut form = member_form("Last Member", days_from_today(0), days_from_today(30));
    form.start_date = "9999-01-01".to_string();
    form.end_date = Some("9999-12-31".to_string());
    let at_limit = ctx.member_service.create_member(form).await?;

    let mut form = member_form("Near Limit", days_from_today(0), days_from_today(30));
    form.start_date = "9999-01-01".to_string();
    form.end_date = Some("9999-06-01".to_string());
    let near_limit = ctx.member_service.create_member(form).await?;

    assert!(matches!(
        ctx.renewal_service.preview(at_limit.id, None).await,
        Err(AppError::Validation(_))
    ));

    for (member, plan_type) in [(&at_limit, "1 month"), (&near_limit, "12 months")] {
        match ctx.renewal_service.renew(member.id, renewal(plan_type, "300")).await {
            Err(AppError::Validation(errors)) => {
                assert_eq!(errors, vec![DATE_RANGE_ERROR.to_string()]);
            }
            other => panic!("expected validation error, got {:?}", other),
        }
        assert_eq!(ctx.member_service.get_member(member.id).await?.as_ref(), Some(member));
    }

    let outcome = ctx.renewal_service
        .renew(near_limit.id, renewal("6 months", "300"))
        .await?;
    assert_eq!(common::iso(outcome.member.end_date), "9999-12-02");

    Ok(())
}
