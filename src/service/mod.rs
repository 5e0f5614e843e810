pub mod member_service;
pub mod payment_service;
pub mod renewal_service;
pub mod report_service;
pub mod sample_data;

use std::sync::Arc;
use crate::auth::AuthService;
use crate::config::Settings;
use crate::db::Database;
use crate::domain::plan;
use crate::error::Result;
use crate::repository::*;
use member_service::MemberService;
use payment_service::PaymentService;
use renewal_service::RenewalService;
use report_service::ReportService;

pub use member_service::DashboardSummary;
pub use sample_data::SampleDataSummary;

pub struct ServiceContext {
    pub member_repo: Arc<dyn MemberRepository>,
    pub payment_repo: Arc<dyn PaymentRepository>,
    pub auth_service: Arc<AuthService>,
    pub member_service: Arc<MemberService>,
    pub payment_service: Arc<PaymentService>,
    pub renewal_service: Arc<RenewalService>,
    pub report_service: Arc<ReportService>,
    pub db: Database,
}

impl ServiceContext {
    pub fn new(db: Database, settings: &Settings) -> Self {
        let member_repo: Arc<dyn MemberRepository> = Arc::new(SqliteMemberRepository::new(db.clone()));
        let payment_repo: Arc<dyn PaymentRepository> = Arc::new(SqlitePaymentRepository::new(db.clone()));

        let auth_service = Arc::new(AuthService::new(db.clone(), settings.auth.bcrypt_cost));
        let member_service = Arc::new(MemberService::new(
            member_repo.clone(),
            payment_repo.clone(),
            settings.membership.expiring_soon_days,
        ));
        let payment_service = Arc::new(PaymentService::new(payment_repo.clone(), member_repo.clone()));
        let renewal_service = Arc::new(RenewalService::new(member_repo.clone()));
        let report_service = Arc::new(ReportService::new(member_repo.clone(), payment_repo.clone()));

        Self {
            member_repo,
            payment_repo,
            auth_service,
            member_service,
            payment_service,
            renewal_service,
            report_service,
            db,
        }
    }

    pub async fn insert_sample_data(&self) -> Result<SampleDataSummary> {
        sample_data::insert_sample_data(
            self.member_repo.as_ref(),
            self.payment_repo.as_ref(),
            plan::today(),
        )
        .await
    }
}
