//! csv-bulkload library
//!
//! A library for bulk-loading CSV files from a local directory into a
//! SQL Server table over TDS.
//!
//! # Features
//!
//! - Server-side ingestion: each file is loaded with a single `BULK INSERT`
//!   statement, bypassing row-by-row insert overhead
//! - Idempotent table creation: the destination table is created only if it
//!   does not already exist, so re-runs append instead of failing
//! - Per-file commits: every file is its own implicit transaction, so files
//!   loaded before a failure stay committed
//!
//! # CLI Usage
//!
//! ```bash
//! # Load every .csv file in a directory into the default CryptoData table
//! csv-bulkload --server sqlhost --database "CV Project" --csv-dir ./prices
//!
//! # SQL Server authentication with credentials from the environment
//! MSSQL_PASSWORD=... csv-bulkload --server sqlhost --database "CV Project" \
//!   --auth-mode sql-server --username loader --csv-dir ./prices
//! ```

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

pub mod connect;
pub mod load;
pub mod schema;

/// How to authenticate against SQL Server.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum AuthMode {
    /// Trusted connection using the calling process's OS credentials
    /// (Windows only)
    Integrated,
    /// SQL Server authentication with an explicit username and password
    SqlServer,
}

#[derive(Parser, Clone)]
pub struct MssqlOpts {
    /// SQL Server host name
    #[arg(long, default_value = "localhost", env = "MSSQL_SERVER")]
    pub server: String,

    /// SQL Server TCP port
    #[arg(long, default_value = "1433", env = "MSSQL_PORT")]
    pub port: u16,

    /// Target database name
    #[arg(long, env = "MSSQL_DATABASE")]
    pub database: String,

    /// Authentication mode
    #[arg(long, value_enum, default_value = "integrated")]
    pub auth_mode: AuthMode,

    /// Username for sql-server authentication
    #[arg(long, env = "MSSQL_USERNAME")]
    pub username: Option<String>,

    /// Password for sql-server authentication
    #[arg(long, env = "MSSQL_PASSWORD")]
    pub password: Option<String>,

    /// Accept the server's TLS certificate without validation
    #[arg(long)]
    pub trust_server_certificate: bool,
}

#[derive(Parser, Clone)]
pub struct LoadOpts {
    /// Directory containing the CSV files to load
    #[arg(long, env = "CSV_DIR")]
    pub csv_dir: PathBuf,

    /// Destination table name
    #[arg(long, default_value = "CryptoData", env = "MSSQL_TABLE")]
    pub table: String,

    /// Dry run mode - log the statements without executing them
    #[arg(long)]
    pub dry_run: bool,
}
