//! SQLite access primitives.
//!
//! Every statement goes through one of four calls: [`Database::execute`],
//! [`Database::execute_many`], [`Database::fetch_one`] and
//! [`Database::fetch_all`]. Each call is atomic on its own. Flows that must
//! write more than one statement atomically open a [`DbTransaction`].

use std::str::FromStr;

use chrono::NaiveDate;
use sqlx::{
    query::{Query, QueryAs},
    sqlite::{SqliteArguments, SqliteConnectOptions, SqlitePoolOptions, SqliteRow},
    Executor, FromRow, Sqlite, SqlitePool, Transaction,
};

use crate::{domain::plan::format_iso_date, error::Result};

pub mod schema;

/// A bound statement parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
}

impl From<i64> for SqlValue {
    fn from(value: i64) -> Self {
        SqlValue::Integer(value)
    }
}

impl From<f64> for SqlValue {
    fn from(value: f64) -> Self {
        SqlValue::Real(value)
    }
}

impl From<&str> for SqlValue {
    fn from(value: &str) -> Self {
        SqlValue::Text(value.to_string())
    }
}

impl From<String> for SqlValue {
    fn from(value: String) -> Self {
        SqlValue::Text(value)
    }
}

impl From<NaiveDate> for SqlValue {
    fn from(value: NaiveDate) -> Self {
        SqlValue::Text(format_iso_date(value))
    }
}

impl<T: Into<SqlValue>> From<Option<T>> for SqlValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(SqlValue::Null)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecuteResult {
    pub rows_affected: u64,
    /// Row id of the last inserted row; meaningless for UPDATE/DELETE.
    pub last_insert_id: i64,
}

#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    pub async fn connect(url: &str, max_connections: u32) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(url)?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await?;

        tracing::debug!("Connected to {}", url);
        Ok(Self { pool })
    }

    /// Private in-memory database. The pool holds exactly one connection that
    /// never expires, otherwise the data would vanish with it.
    pub async fn in_memory() -> Result<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;

        Ok(Self { pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Create every table that does not exist yet.
    pub async fn init_schema(&self) -> Result<()> {
        schema::create_tables(self).await
    }

    pub async fn execute(&self, sql: &str, params: &[SqlValue]) -> Result<ExecuteResult> {
        execute_on(&self.pool, sql, params).await
    }

    /// Run the same statement once per parameter row, all in one transaction.
    pub async fn execute_many(&self, sql: &str, rows: &[Vec<SqlValue>]) -> Result<u64> {
        let mut tx = self.begin().await?;
        let mut affected = 0;
        for params in rows {
            affected += tx.execute(sql, params).await?.rows_affected;
        }
        tx.commit().await?;
        Ok(affected)
    }

    pub async fn fetch_one<T>(&self, sql: &str, params: &[SqlValue]) -> Result<Option<T>>
    where
        T: for<'r> FromRow<'r, SqliteRow> + Send + Unpin,
    {
        fetch_one_on(&self.pool, sql, params).await
    }

    pub async fn fetch_all<T>(&self, sql: &str, params: &[SqlValue]) -> Result<Vec<T>>
    where
        T: for<'r> FromRow<'r, SqliteRow> + Send + Unpin,
    {
        fetch_all_on(&self.pool, sql, params).await
    }

    pub async fn begin(&self) -> Result<DbTransaction> {
        Ok(DbTransaction {
            tx: self.pool.begin().await?,
        })
    }
}

/// Explicit transaction. Dropping it without [`DbTransaction::commit`] rolls
/// every statement back.
pub struct DbTransaction {
    tx: Transaction<'static, Sqlite>,
}

impl DbTransaction {
    pub async fn execute(&mut self, sql: &str, params: &[SqlValue]) -> Result<ExecuteResult> {
        execute_on(&mut *self.tx, sql, params).await
    }

    pub async fn fetch_one<T>(&mut self, sql: &str, params: &[SqlValue]) -> Result<Option<T>>
    where
        T: for<'r> FromRow<'r, SqliteRow> + Send + Unpin,
    {
        fetch_one_on(&mut *self.tx, sql, params).await
    }

    pub async fn commit(self) -> Result<()> {
        self.tx.commit().await?;
        Ok(())
    }

    pub async fn rollback(self) -> Result<()> {
        self.tx.rollback().await?;
        Ok(())
    }
}

async fn execute_on<'c, E>(executor: E, sql: &str, params: &[SqlValue]) -> Result<ExecuteResult>
where
    E: Executor<'c, Database = Sqlite>,
{
    let result = bind_query(sqlx::query(sql), params)
        .execute(executor)
        .await?;

    Ok(ExecuteResult {
        rows_affected: result.rows_affected(),
        last_insert_id: result.last_insert_rowid(),
    })
}

async fn fetch_one_on<'c, E, T>(executor: E, sql: &str, params: &[SqlValue]) -> Result<Option<T>>
where
    E: Executor<'c, Database = Sqlite>,
    T: for<'r> FromRow<'r, SqliteRow> + Send + Unpin,
{
    let row = bind_query_as(sqlx::query_as::<_, T>(sql), params)
        .fetch_optional(executor)
        .await?;
    Ok(row)
}

async fn fetch_all_on<'c, E, T>(executor: E, sql: &str, params: &[SqlValue]) -> Result<Vec<T>>
where
    E: Executor<'c, Database = Sqlite>,
    T: for<'r> FromRow<'r, SqliteRow> + Send + Unpin,
{
    let rows = bind_query_as(sqlx::query_as::<_, T>(sql), params)
        .fetch_all(executor)
        .await?;
    Ok(rows)
}

fn bind_query<'q>(
    mut query: Query<'q, Sqlite, SqliteArguments<'q>>,
    params: &'q [SqlValue],
) -> Query<'q, Sqlite, SqliteArguments<'q>> {
    for param in params {
        query = match param {
            SqlValue::Null => query.bind(None::<String>),
            SqlValue::Integer(v) => query.bind(*v),
            SqlValue::Real(v) => query.bind(*v),
            SqlValue::Text(v) => query.bind(v.as_str()),
        };
    }
    query
}

fn bind_query_as<'q, T>(
    mut query: QueryAs<'q, Sqlite, T, SqliteArguments<'q>>,
    params: &'q [SqlValue],
) -> QueryAs<'q, Sqlite, T, SqliteArguments<'q>> {
    for param in params {
        query = match param {
            SqlValue::Null => query.bind(None::<String>),
            SqlValue::Integer(v) => query.bind(*v),
            SqlValue::Real(v) => query.bind(*v),
            SqlValue::Text(v) => query.bind(v.as_str()),
        };
    }
    query
}
