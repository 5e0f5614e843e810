#![allow(dead_code)]

use chrono::{Days, NaiveDate};
use gymkeeper::{
    config::Settings,
    db::Database,
    domain::{plan, MemberForm},
    service::ServiceContext,
};

/// Settings with the cheapest bcrypt cost so auth tests stay fast.
pub fn test_settings() -> Settings {
    let mut settings = Settings::default();
    settings.auth.bcrypt_cost = 4;
    settings
}

pub async fn test_context() -> anyhow::Result<ServiceContext> {
    let db = Database::in_memory().await?;
    db.init_schema().await?;
    Ok(ServiceContext::new(db, &test_settings()))
}

pub fn iso(date: NaiveDate) -> String {
    plan::format_iso_date(date)
}

pub fn days_from_today(days: i64) -> NaiveDate {
    let today = plan::today();
    if days >= 0 {
        today + Days::new(days as u64)
    } else {
        today - Days::new(days.unsigned_abs())
    }
}

pub fn member_form(full_name: &str, start_date: NaiveDate, end_date: NaiveDate) -> MemberForm {
    MemberForm {
        full_name: full_name.to_string(),
        phone: "01000000000".to_string(),
        national_id: None,
        join_date: None,
        plan_type: "1 month".to_string(),
        plan_price: "300".to_string(),
        start_date: iso(start_date),
        end_date: Some(iso(end_date)),
        status: None,
    }
}
