use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::FromRow;

use crate::{
    db::{Database, SqlValue},
    domain::{MonthlyRevenue, NewPayment, Payment, PaymentMethod, PaymentWithMember},
    error::{AppError, Result},
    repository::PaymentRepository,
};

pub(crate) const INSERT_PAYMENT_SQL: &str =
    "INSERT INTO payments (member_id, amount, date, method, notes) VALUES (?, ?, ?, ?, ?)";

pub(crate) fn payment_params(payment: &NewPayment) -> Vec<SqlValue> {
    vec![
        payment.member_id.into(),
        payment.amount.into(),
        payment.date.into(),
        payment.method.as_str().into(),
        payment.notes.clone().into(),
    ]
}

#[derive(FromRow)]
struct PaymentRow {
    id: i64,
    member_id: i64,
    amount: f64,
    date: NaiveDate,
    method: String,
    notes: Option<String>,
}

#[derive(FromRow)]
struct PaymentExportRow {
    id: i64,
    member_id: i64,
    full_name: String,
    amount: f64,
    date: NaiveDate,
    method: String,
    notes: Option<String>,
}

#[derive(FromRow)]
struct RevenueRow {
    month: String,
    revenue: f64,
}

pub struct SqlitePaymentRepository {
    db: Database,
}

impl SqlitePaymentRepository {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    fn row_to_payment(row: PaymentRow) -> Result<Payment> {
        Ok(Payment {
            id: row.id,
            member_id: row.member_id,
            amount: row.amount,
            date: row.date,
            method: Self::parse_payment_method(&row.method)?,
            notes: row.notes,
        })
    }

    fn parse_payment_method(s: &str) -> Result<PaymentMethod> {
        PaymentMethod::from_str(s)
            .ok_or_else(|| AppError::Database(format!("Invalid payment method: {}", s)))
    }
}

#[async_trait]
impl PaymentRepository for SqlitePaymentRepository {
    async fn create(&self, payment: NewPayment) -> Result<Payment> {
        let result = self
            .db
            .execute(INSERT_PAYMENT_SQL, &payment_params(&payment))
            .await?;

        self.find_by_id(result.last_insert_id).await?.ok_or_else(|| {
            AppError::Database("Failed to retrieve created payment".to_string())
        })
    }

    async fn create_many(&self, payments: &[NewPayment]) -> Result<u64> {
        let rows: Vec<Vec<SqlValue>> = payments.iter().map(payment_params).collect();
        self.db.execute_many(INSERT_PAYMENT_SQL, &rows).await
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Payment>> {
        let row: Option<PaymentRow> = self
            .db
            .fetch_one(
                "SELECT id, member_id, amount, date, method, notes FROM payments WHERE id = ?",
                &[id.into()],
            )
            .await?;

        row.map(Self::row_to_payment).transpose()
    }

    async fn find_by_member(&self, member_id: i64) -> Result<Vec<Payment>> {
        let rows: Vec<PaymentRow> = self
            .db
            .fetch_all(
                r#"
                SELECT id, member_id, amount, date, method, notes
                FROM payments
                WHERE member_id = ?
                ORDER BY date DESC, id DESC
                "#,
                &[member_id.into()],
            )
            .await?;

        rows.into_iter()
            .map(Self::row_to_payment)
            .collect()
    }

    async fn list_with_members(&self) -> Result<Vec<PaymentWithMember>> {
        let rows: Vec<PaymentExportRow> = self
            .db
            .fetch_all(
                r#"
                SELECT p.id, p.member_id, m.full_name, p.amount, p.date, p.method, p.notes
                FROM payments p
                JOIN members m ON m.id = p.member_id
                ORDER BY p.date DESC, p.id DESC
                "#,
                &[],
            )
            .await?;

        rows.into_iter()
            .map(|r| {
                Ok(PaymentWithMember {
                    id: r.id,
                    member_id: r.member_id,
                    full_name: r.full_name,
                    amount: r.amount,
                    date: r.date,
                    method: Self::parse_payment_method(&r.method)?,
                    notes: r.notes,
                })
            })
            .collect()
    }

    async fn revenue_by_month(&self) -> Result<Vec<MonthlyRevenue>> {
        let rows: Vec<RevenueRow> = self
            .db
            .fetch_all(
                r#"
                SELECT strftime('%Y-%m', date) AS month, SUM(amount) AS revenue
                FROM payments
                GROUP BY strftime('%Y-%m', date)
                ORDER BY month DESC
                "#,
                &[],
            )
            .await?;

        Ok(rows
            .into_iter()
            .map(|r| MonthlyRevenue { month: r.month, revenue: r.revenue })
            .collect())
    }

    async fn revenue_between(&self, from: NaiveDate, until: NaiveDate) -> Result<f64> {
        let total: Option<(f64,)> = self
            .db
            .fetch_one(
                "SELECT COALESCE(SUM(amount), 0.0) FROM payments WHERE date >= ? AND date < ?",
                &[from.into(), until.into()],
            )
            .await?;

        Ok(total.map(|(t,)| t).unwrap_or(0.0))
    }
}
