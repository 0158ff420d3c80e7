use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use std::{str::FromStr, time::Duration};

/// Open the database at `db_path` (created if missing) and bring the schema
/// up to date. Migrations are embedded at build time and applied in order;
/// already-applied ones are skipped, so this is safe on every startup.
pub(crate) async fn create_pool(db_path: &str) -> Result<SqlitePool, sqlx::Error> {
    let url = format!("sqlite://{db_path}");
    let pool = SqlitePoolOptions::new()
        .max_connections(8)
        .acquire_timeout(Duration::from_secs(5))
        .connect_with(
            sqlx::sqlite::SqliteConnectOptions::from_str(&url)?
                .foreign_keys(true)
                .create_if_missing(true)
                .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal),
        )
        .await?;
    sqlx::migrate!("./migrations").run(&pool).await?;
    Ok(pool)
}

/// Fresh migrated database in a unique temp file, one per caller.
#[cfg(test)]
pub(crate) async fn test_pool() -> SqlitePool {
    use std::sync::atomic::{AtomicU64, Ordering};

    static NEXT: AtomicU64 = AtomicU64::new(0);
    let n = NEXT.fetch_add(1, Ordering::Relaxed);
    let path = std::env::temp_dir().join(format!("appshelf-test-{}-{n}.db", std::process::id()));
    create_pool(path.to_str().expect("temp path is utf-8"))
        .await
        .expect("open test database")
}
