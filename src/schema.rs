//! Destination table schema and DDL generation.
//!
//! The destination table has a fixed shape matching the daily-price CSV
//! exports: identifying text columns, a calendar date, OHLC prices, and a
//! volume column kept as text.

use crate::connect::SqlExecutor;
use anyhow::Context;
use tracing::{debug, info};

/// Column names and SQL Server types of the destination table, in CSV order.
pub const COLUMNS: &[(&str, &str)] = &[
    ("Name", "VARCHAR(80)"),
    ("Symbol", "VARCHAR(80)"),
    ("Date", "DATE"),
    ("Open", "FLOAT"),
    ("High", "FLOAT"),
    ("Low", "FLOAT"),
    ("Close", "FLOAT"),
    ("Adj Close", "FLOAT"),
    ("Volume", "VARCHAR(80)"),
];

/// Quote an identifier for T-SQL with brackets.
pub fn quote_ident(name: &str) -> String {
    format!("[{}]", name.replace(']', "]]"))
}

/// Escape a string for embedding in a T-SQL single-quoted literal.
pub fn escape_literal(value: &str) -> String {
    value.replace('\'', "''")
}

/// Generate the guarded CREATE TABLE statement for the destination table.
///
/// The statement is a no-op when the table already exists, so repeated runs
/// append to the existing table instead of failing on the DDL.
pub fn create_table_sql(table: &str) -> String {
    let columns = COLUMNS
        .iter()
        .map(|(name, ty)| format!("    {} {}", quote_ident(name), ty))
        .collect::<Vec<_>>()
        .join(",\n");

    format!(
        "IF OBJECT_ID(N'{}', N'U') IS NULL\nCREATE TABLE {} (\n{}\n)",
        escape_literal(table),
        quote_ident(table),
        columns
    )
}

/// Create the destination table if it does not exist yet.
pub async fn ensure_table<E: SqlExecutor>(client: &mut E, table: &str) -> anyhow::Result<()> {
    let ddl = create_table_sql(table);
    debug!("Destination table DDL: {ddl}");

    client
        .execute(ddl)
        .await
        .with_context(|| format!("Failed to create destination table {table}"))?;

    info!("Destination table {table} is ready");
    Ok(())
}
