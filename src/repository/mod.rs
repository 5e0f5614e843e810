use async_trait::async_trait;
use chrono::NaiveDate;
use crate::domain::*;
use crate::error::Result;

pub mod admin_repository;
pub mod member_repository;
pub mod payment_repository;
pub mod settings_repository;

pub use admin_repository::SqliteAdminRepository;
pub use member_repository::SqliteMemberRepository;
pub use payment_repository::SqlitePaymentRepository;
pub use settings_repository::SqliteSettingsRepository;

/// Stored status next to the end date it should be derived from.
#[derive(Debug, Clone, PartialEq)]
pub struct MemberStatusSnapshot {
    pub id: i64,
    pub end_date: NaiveDate,
    pub status: MemberStatus,
}

#[async_trait]
pub trait MemberRepository: Send + Sync {
    async fn create(&self, member: MemberRecord) -> Result<Member>;
    async fn find_by_id(&self, id: i64) -> Result<Option<Member>>;
    async fn list(&self, filter: &MemberFilter) -> Result<Vec<Member>>;
    async fn list_expiring(&self, from: NaiveDate, until: NaiveDate) -> Result<Vec<ExpiringMember>>;
    async fn count_by_status(&self, status: MemberStatus) -> Result<i64>;
    async fn status_snapshots(&self) -> Result<Vec<MemberStatusSnapshot>>;
    async fn set_statuses(&self, updates: &[(i64, MemberStatus)]) -> Result<u64>;
    async fn update(&self, id: i64, member: MemberRecord) -> Result<Member>;
    /// Apply new plan terms and, optionally, record the payment for them.
    /// Both writes commit together or not at all.
    async fn renew(&self, id: i64, change: PlanChange, payment: Option<NewPayment>) -> Result<Member>;
    /// Returns false when no such member existed. Payments go with the member.
    async fn delete(&self, id: i64) -> Result<bool>;
}

#[async_trait]
pub trait PaymentRepository: Send + Sync {
    async fn create(&self, payment: NewPayment) -> Result<Payment>;
    async fn create_many(&self, payments: &[NewPayment]) -> Result<u64>;
    async fn find_by_id(&self, id: i64) -> Result<Option<Payment>>;
    async fn find_by_member(&self, member_id: i64) -> Result<Vec<Payment>>;
    async fn list_with_members(&self) -> Result<Vec<PaymentWithMember>>;
    async fn revenue_by_month(&self) -> Result<Vec<MonthlyRevenue>>;
    /// Sum of payments dated in `[from, until)`.
    async fn revenue_between(&self, from: NaiveDate, until: NaiveDate) -> Result<f64>;
}

#[async_trait]
pub trait AdminRepository: Send + Sync {
    async fn find_by_username(&self, username: &str) -> Result<Option<AdminUser>>;
    async fn any_exists(&self) -> Result<bool>;
    async fn create(&self, username: &str, password_hash: &str) -> Result<AdminUser>;
    async fn update_password_hash(&self, username: &str, password_hash: &str) -> Result<bool>;
}

#[async_trait]
pub trait SettingsRepository: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>>;
    async fn set(&self, key: &str, value: &str) -> Result<()>;
}
