use super::Database;
use crate::error::Result;

const CREATE_ADMIN_USERS: &str = r#"
    CREATE TABLE IF NOT EXISTS admin_users (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        username TEXT NOT NULL UNIQUE,
        password_hash TEXT NOT NULL,
        created_at TEXT NOT NULL
    )
"#;

const CREATE_MEMBERS: &str = r#"
    CREATE TABLE IF NOT EXISTS members (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        full_name TEXT NOT NULL,
        phone TEXT NOT NULL,
        national_id TEXT,
        join_date TEXT NOT NULL,
        plan_type TEXT NOT NULL,
        plan_price REAL NOT NULL CHECK(plan_price >= 0),
        start_date TEXT NOT NULL,
        end_date TEXT NOT NULL,
        status TEXT NOT NULL CHECK(status IN ('active','expired'))
    )
"#;

const CREATE_PAYMENTS: &str = r#"
    CREATE TABLE IF NOT EXISTS payments (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        member_id INTEGER NOT NULL,
        amount REAL NOT NULL CHECK(amount > 0),
        date TEXT NOT NULL,
        method TEXT NOT NULL CHECK(method IN ('cash','card','transfer')),
        notes TEXT,
        FOREIGN KEY(member_id) REFERENCES members(id) ON DELETE CASCADE
    )
"#;

const CREATE_APP_SETTINGS: &str = r#"
    CREATE TABLE IF NOT EXISTS app_settings (
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL
    )
"#;

const CREATE_ADMIN_SESSIONS: &str = r#"
    CREATE TABLE IF NOT EXISTS admin_sessions (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        username TEXT NOT NULL,
        token_hash TEXT NOT NULL UNIQUE,
        expires_at TEXT NOT NULL,
        created_at TEXT NOT NULL,
        FOREIGN KEY(username) REFERENCES admin_users(username) ON DELETE CASCADE
    )
"#;

const CREATE_INDEXES: [&str; 2] = [
    "CREATE INDEX IF NOT EXISTS idx_members_end_date ON members(end_date)",
    "CREATE INDEX IF NOT EXISTS idx_payments_member_id ON payments(member_id)",
];

/// Idempotent: safe to run on every start.
pub async fn create_tables(db: &Database) -> Result<()> {
    for statement in [
        CREATE_ADMIN_USERS,
        CREATE_MEMBERS,
        CREATE_PAYMENTS,
        CREATE_APP_SETTINGS,
        CREATE_ADMIN_SESSIONS,
    ]
    .into_iter()
    .chain(CREATE_INDEXES)
    {
        db.execute(statement, &[]).await?;
    }

    tracing::debug!("Database schema ready");
    Ok(())
}
