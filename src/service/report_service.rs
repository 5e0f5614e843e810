use std::sync::Arc;

use serde::Serialize;

use crate::{
    domain::{MemberFilter, MemberSort, MonthlyRevenue},
    error::{AppError, Result},
    repository::{MemberRepository, PaymentRepository},
};

pub const MEMBER_CSV_HEADER: [&str; 10] = [
    "id", "full_name", "phone", "national_id", "join_date", "plan_type",
    "plan_price", "start_date", "end_date", "status",
];

pub const PAYMENT_CSV_HEADER: [&str; 7] = [
    "id", "member_id", "full_name", "amount", "date", "method", "notes",
];

pub const REVENUE_CSV_HEADER: [&str; 2] = ["month", "revenue"];

/// CSV exports and revenue figures.
pub struct ReportService {
    members: Arc<dyn MemberRepository>,
    payments: Arc<dyn PaymentRepository>,
}

impl ReportService {
    pub fn new(members: Arc<dyn MemberRepository>, payments: Arc<dyn PaymentRepository>) -> Self {
        Self { members, payments }
    }

    /// All members, newest first.
    pub async fn members_csv(&self) -> Result<Vec<u8>> {
        let filter = MemberFilter {
            sort: MemberSort::Newest,
            ..Default::default()
        };
        let members = self.members.list(&filter).await?;
        tracing::debug!("Exporting {} member(s)", members.len());
        write_csv(&MEMBER_CSV_HEADER, &members)
    }

    /// All payments with the member's name, newest first.
    pub async fn payments_csv(&self) -> Result<Vec<u8>> {
        let payments = self.payments.list_with_members().await?;
        tracing::debug!("Exporting {} payment(s)", payments.len());
        write_csv(&PAYMENT_CSV_HEADER, &payments)
    }

    /// Revenue per calendar month, latest month first. No payments means an
    /// empty summary, not an error.
    pub async fn revenue_summary(&self) -> Result<Vec<MonthlyRevenue>> {
        self.payments.revenue_by_month().await
    }

    pub async fn revenue_csv(&self) -> Result<Vec<u8>> {
        let summary = self.revenue_summary().await?;
        write_csv(&REVENUE_CSV_HEADER, &summary)
    }
}

/// The header row is always written, so an empty table still names its
/// columns. Field order of `T` must match `header`.
fn write_csv<T: Serialize>(header: &[&str], rows: &[T]) -> Result<Vec<u8>> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());

    writer.write_record(header)?;
    for row in rows {
        writer.serialize(row)?;
    }

    writer
        .into_inner()
        .map_err(|e| AppError::Internal(format!("CSV export failed: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_export_still_has_header() {
        let rows: Vec<MonthlyRevenue> = Vec::new();
        let bytes = write_csv(&REVENUE_CSV_HEADER, &rows).unwrap();
        assert_eq!(String::from_utf8(bytes).unwrap(), "month,revenue\n");
    }

    #[test]
    fn test_rows_follow_header() {
        let rows = vec![
            MonthlyRevenue { month: "2024-02".to_string(), revenue: 1100.0 },
            MonthlyRevenue { month: "2024-01".to_string(), revenue: 300.5 },
        ];
        let bytes = write_csv(&REVENUE_CSV_HEADER, &rows).unwrap();
        assert_eq!(
            String::from_utf8(bytes).unwrap(),
            "month,revenue\n2024-02,1100.0\n2024-01,300.5\n"
        );
    }
}
