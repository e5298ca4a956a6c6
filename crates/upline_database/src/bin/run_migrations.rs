//! Apply pending database migrations.
//!
//! Usage:
//!   DATABASE_URL=postgres://... cargo run --bin run_migrations

use upline_database::{establish_connection, run_migrations};

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let mut conn = establish_connection()?;
    let applied = run_migrations(&mut conn)?;

    if applied == 0 {
        tracing::info!("✓ Database is up to date, no pending migrations");
    } else {
        tracing::info!("✓ Applied {} pending migration(s)", applied);
    }

    Ok(())
}
