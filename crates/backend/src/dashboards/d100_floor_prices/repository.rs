use anyhow::Result;
use chrono::{DateTime, Utc};
use sea_orm::{ConnectionTrait, DatabaseConnection, FromQueryResult, Statement};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Floor price of a collection on a given day
#[derive(Debug, Clone, PartialEq, FromQueryResult)]
pub struct SolRateRow {
    pub date: String,
    pub token: String,
    pub sol: f64,
}

/// SOL exchange rate of a currency on a given day
#[derive(Debug, Clone, PartialEq, FromQueryResult)]
pub struct ExchangeRateRow {
    pub date: String,
    pub currency: String,
    pub rate: f64,
}

/// Записать floor price токена; за один UTC-день хранится одна строка
pub async fn upsert_sol_rate(
    db: &DatabaseConnection,
    token: &str,
    at: DateTime<Utc>,
    sol: f64,
) -> Result<()> {
    let sql = r#"
        INSERT OR REPLACE INTO sol_rates (id, token, timestamp, sol) VALUES
        ((SELECT id FROM sol_rates WHERE token = ? AND date(timestamp) = ?), ?, ?, ?);
    "#;

    let stmt = Statement::from_sql_and_values(
        sea_orm::DatabaseBackend::Sqlite,
        sql,
        [
            token.into(),
            at.format(DATE_FORMAT).to_string().into(),
            token.into(),
            at.format(TIMESTAMP_FORMAT).to_string().into(),
            sol.into(),
        ],
    );
    db.execute(stmt).await?;
    Ok(())
}

/// Записать курс валюты; за один UTC-день хранится одна строка
pub async fn upsert_exchange_rate(
    db: &DatabaseConnection,
    currency: &str,
    at: DateTime<Utc>,
    rate: f64,
) -> Result<()> {
    let sql = r#"
        INSERT OR REPLACE INTO exchange_rates (id, currency, timestamp, sol_exchange_rate) VALUES
        ((SELECT id FROM exchange_rates WHERE currency = ? AND date(timestamp) = ?), ?, ?, ?);
    "#;

    let stmt = Statement::from_sql_and_values(
        sea_orm::DatabaseBackend::Sqlite,
        sql,
        [
            currency.into(),
            at.format(DATE_FORMAT).to_string().into(),
            currency.into(),
            at.format(TIMESTAMP_FORMAT).to_string().into(),
            rate.into(),
        ],
    );
    db.execute(stmt).await?;
    Ok(())
}

pub async fn list_sol_rates(db: &DatabaseConnection) -> Result<Vec<SolRateRow>> {
    let sql = r#"
        SELECT date(timestamp) AS date, token, sol
        FROM sol_rates
        ORDER BY date(timestamp), token
    "#;

    let stmt = Statement::from_sql_and_values(sea_orm::DatabaseBackend::Sqlite, sql, []);
    let rows = SolRateRow::find_by_statement(stmt).all(db).await?;
    Ok(rows)
}

pub async fn list_exchange_rates(db: &DatabaseConnection) -> Result<Vec<ExchangeRateRow>> {
    let sql = r#"
        SELECT date(timestamp) AS date, currency, sol_exchange_rate AS rate
        FROM exchange_rates
        ORDER BY date(timestamp), currency
    "#;

    let stmt = Statement::from_sql_and_values(sea_orm::DatabaseBackend::Sqlite, sql, []);
    let rows = ExchangeRateRow::find_by_statement(stmt).all(db).await?;
    Ok(rows)
}
