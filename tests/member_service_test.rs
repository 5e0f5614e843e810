mod common;

use common::{days_from_today, iso, member_form, test_context};
use gymkeeper::{
    domain::{MemberFilter, MemberSort, MemberStatus, RecordPaymentRequest, StatusFilter},
    error::AppError,
};

#[tokio::test]
async fn test_member_crud() -> anyhow::Result<()> {
    let ctx = test_context().await?;
    let members = &ctx.member_service;

    let start = days_from_today(-3);
    let mut form = member_form("Jane Doe", start, days_from_today(27));
    form.national_id = Some("29801011234567".to_string());

    let member = members.create_member(form.clone()).await?;
    assert_eq!(member.full_name, "Jane Doe");
    assert_eq!(member.status, MemberStatus::Active);
    assert_eq!(member.join_date, days_from_today(0));
    assert_eq!(member.national_id.as_deref(), Some("29801011234567"));

    let found = members.get_member(member.id).await?;
    assert_eq!(found.as_ref(), Some(&member));

    form.full_name = "Jane Smith".to_string();
    form.plan_price = "350.5".to_string();
    let updated = members.update_member(member.id, form).await?;
    assert_eq!(updated.full_name, "Jane Smith");
    assert_eq!(updated.plan_price, 350.5);
    assert_eq!(updated.join_date, member.join_date);

    members.delete_member(member.id).await?;
    assert!(members.get_member(member.id).await?.is_none());

    Ok(())
}

#[tokio::test]
async fn test_create_derives_end_date_from_plan() -> anyhow::Result<()> {
    let ctx = test_context().await?;

    let mut form = member_form("Omar", days_from_today(0), days_from_today(0));
    form.start_date = "2024-01-31".to_string();
    form.end_date = None;
    form.plan_type = "1 month".to_string();

    let member = ctx.member_service.create_member(form).await?;
    assert_eq!(iso(member.end_date), "2024-02-29");
    assert_eq!(member.status, MemberStatus::Expired);

    Ok(())
}

#[tokio::test]
async fn test_invalid_member_is_not_saved() -> anyhow::Result<()> {
    let ctx = test_context().await?;

    let mut form = member_form("  ", days_from_today(0), days_from_today(-1));
    form.plan_price = "-10".to_string();

    let err = ctx.member_service.create_member(form).await.unwrap_err();
    match err {
        AppError::Validation(errors) => {
            assert!(errors.contains(&"Full name is required.".to_string()));
            assert!(errors.contains(&"Plan price must be a non-negative number.".to_string()));
            assert!(errors.contains(&"End date must be after start date.".to_string()));
        }
        other => panic!("expected validation error, got {:?}", other),
    }

    let all = ctx.member_service.list_members(&MemberFilter::default()).await?;
    assert!(all.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_mutating_missing_member_is_not_found() -> anyhow::Result<()> {
    let ctx = test_context().await?;

    let form = member_form("Ghost", days_from_today(0), days_from_today(30));
    assert!(matches!(
        ctx.member_service.update_member(999, form).await,
        Err(AppError::NotFound(_))
    ));
    assert!(matches!(
        ctx.member_service.delete_member(999).await,
        Err(AppError::NotFound(_))
    ));
    assert!(ctx.member_service.get_member(999).await?.is_none());

    Ok(())
}

#[tokio::test]
async fn test_delete_cascades_to_payments() -> anyhow::Result<()> {
    let ctx = test_context().await?;

    let member = ctx.member_service
        .create_member(member_form("Mona Ali", days_from_today(-1), days_from_today(29)))
        .await?;

    for amount in [300.0, 150.0] {
        ctx.payment_service
            .record_payment(member.id, RecordPaymentRequest {
                amount,
                date: None,
                method: Default::default(),
                notes: None,
            })
            .await?;
    }
    assert_eq!(ctx.payment_service.list_for_member(member.id).await?.len(), 2);

    ctx.member_service.delete_member(member.id).await?;

    let orphans: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM payments WHERE member_id = ?")
        .bind(member.id)
        .fetch_one(ctx.db.pool())
        .await?;
    assert_eq!(orphans, 0);

    Ok(())
}

#[tokio::test]
async fn test_list_filters_and_sorts() -> anyhow::Result<()> {
    let ctx = test_context().await?;
    let members = &ctx.member_service;

    let later = members
        .create_member(member_form("Ahmed Hassan", days_from_today(-5), days_from_today(25)))
        .await?;
    let sooner = members
        .create_member(member_form("Sara Ahmed", days_from_today(-20), days_from_today(3)))
        .await?;
    let expired = members
        .create_member(member_form("Omar Samy", days_from_today(-60), days_from_today(-2)))
        .await?;

    let by_end_date = members.list_members(&MemberFilter::default()).await?;
    let ids: Vec<i64> = by_end_date.iter().map(|m| m.id).collect();
    assert_eq!(ids, vec![expired.id, sooner.id, later.id]);

    let newest = members
        .list_members(&MemberFilter { sort: MemberSort::Newest, ..Default::default() })
        .await?;
    assert_eq!(newest[0].id, expired.id);

    let search = members
        .list_members(&MemberFilter { search: Some("ahmed".to_string()), ..Default::default() })
        .await?;
    assert_eq!(search.len(), 2);

    let only_expired = members
        .list_members(&MemberFilter { status: StatusFilter::Expired, ..Default::default() })
        .await?;
    assert_eq!(only_expired.len(), 1);
    assert_eq!(only_expired[0].id, expired.id);

    Ok(())
}

#[tokio::test]
async fn test_refresh_statuses_is_idempotent() -> anyhow::Result<()> {
    let ctx = test_context().await?;

    // Saved as active despite an end date in the past.
    let mut form = member_form("Stale", days_from_today(-40), days_from_today(-10));
    form.status = Some(MemberStatus::Active);
    let stale = ctx.member_service.create_member(form).await?;
    assert_eq!(stale.status, MemberStatus::Active);

    ctx.member_service
        .create_member(member_form("Fresh", days_from_today(0), days_from_today(30)))
        .await?;

    assert_eq!(ctx.member_service.refresh_statuses().await?, 1);
    assert_eq!(ctx.member_service.refresh_statuses().await?, 0);

    let refreshed = ctx.member_service.get_member(stale.id).await?.unwrap();
    assert_eq!(refreshed.status, MemberStatus::Expired);

    Ok(())
}

#[tokio::test]
async fn test_member_ending_today_is_still_active() -> anyhow::Result<()> {
    let ctx = test_context().await?;

    let member = ctx.member_service
        .create_member(member_form("Last Day", days_from_today(-30), days_from_today(0)))
        .await?;
    assert_eq!(member.status, MemberStatus::Active);

    ctx.member_service.refresh_statuses().await?;
    let member = ctx.member_service.get_member(member.id).await?.unwrap();
    assert_eq!(member.status, MemberStatus::Active);

    Ok(())
}

#[tokio::test]
async fn test_dashboard_and_reminders() -> anyhow::Result<()> {
    let ctx = test_context().await?;
    let members = &ctx.member_service;

    let soon = members
        .create_member(member_form("Soon", days_from_today(-25), days_from_today(5)))
        .await?;
    let edge = members
        .create_member(member_form("Edge", days_from_today(-23), days_from_today(7)))
        .await?;
    members
        .create_member(member_form("Later", days_from_today(-10), days_from_today(20)))
        .await?;
    members
        .create_member(member_form("Gone", days_from_today(-40), days_from_today(-1)))
        .await?;

    ctx.payment_service
        .record_payment(soon.id, RecordPaymentRequest {
            amount: 300.0,
            date: None,
            method: Default::default(),
            notes: Some("  ".to_string()),
        })
        .await?;

    let reminders = members.expiring_soon().await?;
    let ids: Vec<i64> = reminders.iter().map(|m| m.id).collect();
    assert_eq!(ids, vec![soon.id, edge.id]);

    let summary = members.dashboard().await?;
    assert_eq!(summary.active_members, 3);
    assert_eq!(summary.expiring_soon_count, 2);
    assert_eq!(summary.monthly_revenue, 300.0);

    Ok(())
}

#[tokio::test]
async fn test_payment_validation() -> anyhow::Result<()> {
    let ctx = test_context().await?;

    let member = ctx.member_service
        .create_member(member_form("Payer", days_from_today(0), days_from_today(30)))
        .await?;

    let err = ctx.payment_service
        .record_payment(member.id, RecordPaymentRequest {
            amount: 0.0,
            date: Some("2024-13-01".to_string()),
            method: Default::default(),
            notes: None,
        })
        .await
        .unwrap_err();
    match err {
        AppError::Validation(errors) => assert_eq!(errors.len(), 2),
        other => panic!("expected validation error, got {:?}", other),
    }

    let missing = ctx.payment_service
        .record_payment(999, RecordPaymentRequest {
            amount: 10.0,
            date: None,
            method: Default::default(),
            notes: None,
        })
        .await;
    assert!(matches!(missing, Err(AppError::NotFound(_))));
    assert!(ctx.payment_service.list_for_member(member.id).await?.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_search_treats_wildcards_literally() -> anyhow::Result<()> {
    let ctx = test_context().await?;
    let members = &ctx.member_service;

    members
        .create_member(member_form("Ahmed Hassan", days_from_today(0), days_from_today(30)))
        .await?;
    let underscored = members
        .create_member(member_form("sara_ali", days_from_today(0), days_from_today(30)))
        .await?;

    let search = |text: &str| MemberFilter { search: Some(text.to_string()), ..Default::default() };

    let found = members.list_members(&search("_")).await?;
    assert_eq!(found.iter().map(|m| m.id).collect::<Vec<_>>(), vec![underscored.id]);

    assert!(members.list_members(&search("%")).await?.is_empty());
    assert_eq!(members.list_members(&search("a_a")).await?.len(), 1);

    Ok(())
}
