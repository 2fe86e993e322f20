use once_cell::sync::OnceCell;
use sea_orm::{ConnectionTrait, Database, DatabaseBackend, DatabaseConnection, Statement};
use std::path::Path;

static DB_CONN: OnceCell<DatabaseConnection> = OnceCell::new();

/// Таблицы истории цен. Одна строка на ключ (токен / валюту) за UTC-день.
const SCHEMA: [&str; 4] = [
    r#"
    CREATE TABLE IF NOT EXISTS sol_rates (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        token TEXT NOT NULL,
        timestamp TEXT NOT NULL,
        sol REAL NOT NULL
    );
    "#,
    r#"
    CREATE INDEX IF NOT EXISTS idx_sol_rates_token_day
        ON sol_rates (token, timestamp);
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS exchange_rates (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        currency TEXT NOT NULL,
        timestamp TEXT NOT NULL,
        sol_exchange_rate REAL NOT NULL
    );
    "#,
    r#"
    CREATE INDEX IF NOT EXISTS idx_exchange_rates_currency_day
        ON exchange_rates (currency, timestamp);
    "#,
];

/// Build a sqlite URL for sea-orm from a file path
fn sqlite_url(db_file: &Path) -> anyhow::Result<String> {
    let absolute_path = if db_file.is_absolute() {
        db_file.to_path_buf()
    } else {
        std::env::current_dir()?.join(db_file)
    };
    // Normalize path separators and ensure proper URL form on Windows
    let normalized = absolute_path.to_string_lossy().replace('\\', "/");
    let needs_leading_slash = !normalized.starts_with('/') && normalized.contains(':');
    let prefix = if needs_leading_slash { "/" } else { "" };
    Ok(format!("sqlite://{}{}?mode=rwc", prefix, normalized))
}

pub async fn initialize_database(db_file: &Path) -> anyhow::Result<()> {
    if let Some(parent) = db_file.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let db_url = sqlite_url(db_file)?;
    tracing::info!("Opening database: {}", db_url);
    let conn = Database::connect(&db_url).await?;

    bootstrap_schema(&conn).await?;

    DB_CONN
        .set(conn)
        .map_err(|_| anyhow::anyhow!("Failed to set DB_CONN"))?;
    Ok(())
}

/// Create history tables if they do not exist yet
pub async fn bootstrap_schema(conn: &DatabaseConnection) -> anyhow::Result<()> {
    for sql in SCHEMA {
        conn.execute(Statement::from_string(
            DatabaseBackend::Sqlite,
            sql.to_string(),
        ))
        .await?;
    }
    tracing::info!("Price history schema is ready");
    Ok(())
}

pub fn get_connection() -> &'static DatabaseConnection {
    DB_CONN
        .get()
        .expect("Database connection has not been initialized")
}
