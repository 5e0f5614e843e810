use clap::Parser;
use gymkeeper::{config::Settings, db::Database, service::ServiceContext};

/// Fill a gym database with demo members and payments.
#[derive(Debug, Parser)]
#[command(name = "seed")]
struct Args {
    /// Database URL; falls back to the configured one.
    #[arg(long, env = "DATABASE_URL")]
    database_url: Option<String>,

    /// Only create the tables and the default admin, no demo rows.
    #[arg(long)]
    schema_only: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gymkeeper=info".into()),
        )
        .init();

    let args = Args::parse();
    let settings = Settings::new().unwrap_or_default();
    let database_url = args.database_url.unwrap_or_else(|| settings.database.url.clone());

    println!("Seeding {}", database_url);

    let db = Database::connect(&database_url, settings.database.max_connections).await?;
    db.init_schema().await?;

    let context = ServiceContext::new(db, &settings);
    let created = context.auth_service
        .bootstrap(
            &settings.auth.default_admin_username,
            &settings.auth.default_admin_password,
        )
        .await?;
    if created {
        println!(
            "  Created admin '{}' (password must be changed on first login)",
            settings.auth.default_admin_username
        );
    }

    if args.schema_only {
        println!("Schema ready.");
        return Ok(());
    }

    let summary = context.insert_sample_data().await?;
    println!(
        "  Inserted {} members {:?} and {} payments",
        summary.member_ids.len(),
        summary.member_ids,
        summary.payments
    );
    println!("Done.");

    Ok(())
}
