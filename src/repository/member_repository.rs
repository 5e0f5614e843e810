use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::FromRow;

use crate::{
    db::{Database, SqlValue},
    domain::{
        ExpiringMember, Member, MemberFilter, MemberRecord, MemberSort, MemberStatus,
        NewPayment, PlanChange,
    },
    error::{AppError, Result},
    repository::{payment_repository, MemberRepository, MemberStatusSnapshot},
};

const MEMBER_COLUMNS: &str = "id, full_name, phone, national_id, join_date, plan_type, \
                              plan_price, start_date, end_date, status";

// Database row struct that matches SQLite schema
#[derive(FromRow)]
struct MemberRow {
    id: i64,
    full_name: String,
    phone: String,
    national_id: Option<String>,
    join_date: NaiveDate,
    plan_type: String,
    plan_price: f64,
    start_date: NaiveDate,
    end_date: NaiveDate,
    status: String,
}

#[derive(FromRow)]
struct SnapshotRow {
    id: i64,
    end_date: NaiveDate,
    status: String,
}

#[derive(FromRow)]
struct ExpiringRow {
    id: i64,
    full_name: String,
    phone: String,
    end_date: NaiveDate,
}

pub struct SqliteMemberRepository {
    db: Database,
}

impl SqliteMemberRepository {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    fn row_to_member(row: MemberRow) -> Result<Member> {
        Ok(Member {
            id: row.id,
            full_name: row.full_name,
            phone: row.phone,
            national_id: row.national_id,
            join_date: row.join_date,
            plan_type: row.plan_type,
            plan_price: row.plan_price,
            start_date: row.start_date,
            end_date: row.end_date,
            status: Self::parse_member_status(&row.status)?,
        })
    }

    fn parse_member_status(s: &str) -> Result<MemberStatus> {
        MemberStatus::from_str(s)
            .ok_or_else(|| AppError::Database(format!("Invalid member status: {}", s)))
    }

    fn record_params(member: &MemberRecord) -> Vec<SqlValue> {
        vec![
            member.full_name.as_str().into(),
            member.phone.as_str().into(),
            member.national_id.clone().into(),
            member.join_date.into(),
            member.plan_type.as_str().into(),
            member.plan_price.into(),
            member.start_date.into(),
            member.end_date.into(),
            member.status.as_str().into(),
        ]
    }
}

/// Match `%` and `_` literally in a `LIKE ... ESCAPE '\'` pattern.
fn escape_like(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[async_trait]
impl MemberRepository for SqliteMemberRepository {
    async fn create(&self, member: MemberRecord) -> Result<Member> {
        let result = self
            .db
            .execute(
                r#"
                INSERT INTO members (
                    full_name, phone, national_id, join_date, plan_type,
                    plan_price, start_date, end_date, status
                ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
                "#,
                &Self::record_params(&member),
            )
            .await?;

        self.find_by_id(result.last_insert_id).await?.ok_or_else(|| {
            AppError::Database("Failed to retrieve created member".to_string())
        })
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Member>> {
        let row: Option<MemberRow> = self
            .db
            .fetch_one(
                &format!("SELECT {} FROM members WHERE id = ?", MEMBER_COLUMNS),
                &[id.into()],
            )
            .await?;

        row.map(Self::row_to_member).transpose()
    }

    async fn list(&self, filter: &MemberFilter) -> Result<Vec<Member>> {
        let mut sql = format!("SELECT {} FROM members WHERE 1=1", MEMBER_COLUMNS);
        let mut params: Vec<SqlValue> = Vec::new();

        if let Some(search) = filter.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            sql.push_str(" AND (full_name LIKE ? ESCAPE '\\' OR phone LIKE ? ESCAPE '\\')");
            let like = format!("%{}%", escape_like(search));
            params.push(like.clone().into());
            params.push(like.into());
        }

        if let Some(status) = filter.status.status() {
            sql.push_str(" AND status = ?");
            params.push(status.as_str().into());
        }

        sql.push_str(match filter.sort {
            MemberSort::EndDate => " ORDER BY end_date ASC, id ASC",
            MemberSort::Newest => " ORDER BY id DESC",
        });

        let rows: Vec<MemberRow> = self.db.fetch_all(&sql, &params).await?;
        rows.into_iter().map(Self::row_to_member).collect()
    }

    async fn list_expiring(&self, from: NaiveDate, until: NaiveDate) -> Result<Vec<ExpiringMember>> {
        let rows: Vec<ExpiringRow> = self
            .db
            .fetch_all(
                r#"
                SELECT id, full_name, phone, end_date
                FROM members
                WHERE status = 'active' AND end_date BETWEEN ? AND ?
                ORDER BY end_date ASC, id ASC
                "#,
                &[from.into(), until.into()],
            )
            .await?;

        Ok(rows
            .into_iter()
            .map(|r| ExpiringMember {
                id: r.id,
                full_name: r.full_name,
                phone: r.phone,
                end_date: r.end_date,
            })
            .collect())
    }

    async fn count_by_status(&self, status: MemberStatus) -> Result<i64> {
        let count: Option<(i64,)> = self
            .db
            .fetch_one(
                "SELECT COUNT(*) FROM members WHERE status = ?",
                &[status.as_str().into()],
            )
            .await?;

        Ok(count.map(|(c,)| c).unwrap_or(0))
    }

    async fn status_snapshots(&self) -> Result<Vec<MemberStatusSnapshot>> {
        let rows: Vec<SnapshotRow> = self
            .db
            .fetch_all("SELECT id, end_date, status FROM members", &[])
            .await?;

        rows.into_iter()
            .map(|r| {
                Ok(MemberStatusSnapshot {
                    id: r.id,
                    end_date: r.end_date,
                    status: Self::parse_member_status(&r.status)?,
                })
            })
            .collect()
    }

    async fn set_statuses(&self, updates: &[(i64, MemberStatus)]) -> Result<u64> {
        if updates.is_empty() {
            return Ok(0);
        }

        let rows: Vec<Vec<SqlValue>> = updates
            .iter()
            .map(|(id, status)| vec![status.as_str().into(), (*id).into()])
            .collect();

        self.db
            .execute_many("UPDATE members SET status = ? WHERE id = ?", &rows)
            .await
    }

    async fn update(&self, id: i64, member: MemberRecord) -> Result<Member> {
        let mut params = Self::record_params(&member);
        params.push(id.into());

        let result = self
            .db
            .execute(
                r#"
                UPDATE members
                SET full_name = ?, phone = ?, national_id = ?, join_date = ?,
                    plan_type = ?, plan_price = ?, start_date = ?, end_date = ?,
                    status = ?
                WHERE id = ?
                "#,
                &params,
            )
            .await?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound("Member not found".to_string()));
        }

        self.find_by_id(id).await?.ok_or_else(|| {
            AppError::Database("Failed to retrieve updated member".to_string())
        })
    }

    async fn renew(&self, id: i64, change: PlanChange, payment: Option<NewPayment>) -> Result<Member> {
        let mut tx = self.db.begin().await?;

        let result = tx
            .execute(
                r#"
                UPDATE members
                SET plan_type = ?, plan_price = ?, start_date = ?, end_date = ?, status = ?
                WHERE id = ?
                "#,
                &[
                    change.plan_type.as_str().into(),
                    change.plan_price.into(),
                    change.start_date.into(),
                    change.end_date.into(),
                    change.status.as_str().into(),
                    id.into(),
                ],
            )
            .await?;

        if result.rows_affected == 0 {
            tx.rollback().await?;
            return Err(AppError::NotFound("Member not found".to_string()));
        }

        if let Some(payment) = payment {
            tx.execute(
                payment_repository::INSERT_PAYMENT_SQL,
                &payment_repository::payment_params(&payment),
            )
            .await?;
        }

        let row: Option<MemberRow> = tx
            .fetch_one(
                &format!("SELECT {} FROM members WHERE id = ?", MEMBER_COLUMNS),
                &[id.into()],
            )
            .await?;

        tx.commit().await?;

        row.map(Self::row_to_member)
            .transpose()?
            .ok_or_else(|| AppError::Database("Failed to retrieve renewed member".to_string()))
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        let result = self
            .db
            .execute("DELETE FROM members WHERE id = ?", &[id.into()])
            .await?;

        Ok(result.rows_affected > 0)
    }
}
