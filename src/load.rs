//! CSV bulk-load implementation.
//!
//! Enumerates a directory of CSV files and loads each one into the
//! destination table with a server-side `BULK INSERT`. The server reads the
//! files from its own filesystem, so the directory must be visible to the
//! SQL Server host under the same paths.

use crate::connect::SqlExecutor;
use crate::schema;
use anyhow::Context;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Configuration for a bulk-load run.
#[derive(Clone)]
pub struct Config {
    /// Directory containing the CSV files to load
    pub csv_dir: PathBuf,

    /// Destination table name
    pub table: String,

    /// Whether to log statements instead of executing them
    pub dry_run: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            csv_dir: PathBuf::new(),
            table: "CryptoData".to_string(),
            dry_run: false,
        }
    }
}

impl Config {
    /// Validate the configuration before any database work starts.
    pub fn validate(&self) -> anyhow::Result<()> {
        if !self.csv_dir.is_dir() {
            anyhow::bail!(
                "CSV directory {} does not exist or is not a directory",
                self.csv_dir.display()
            );
        }

        let mut chars = self.table.chars();
        let valid_start = chars
            .next()
            .map(|c| c.is_ascii_alphabetic() || c == '_')
            .unwrap_or(false);
        if !valid_start || !self.table.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            anyhow::bail!("Invalid table name '{}': expected a plain identifier", self.table);
        }

        Ok(())
    }
}

/// Outcome of a completed run.
#[derive(Debug)]
pub struct LoadReport {
    /// Total number of directory entries seen, before the extension filter
    pub entries_found: usize,

    /// Number of .csv files actually loaded
    pub files_loaded: usize,

    /// Wall-clock time spanning table creation and all file loads
    pub elapsed: Duration,
}

/// List a directory, returning the raw entry count and the .csv files.
///
/// The extension match is case-sensitive, so `.CSV` files are skipped.
/// Files come back in filesystem order; no sorting is applied.
pub fn enumerate_csv_files(dir: &Path) -> anyhow::Result<(usize, Vec<PathBuf>)> {
    let mut entries_found = 0;
    let mut files = Vec::new();

    let entries = std::fs::read_dir(dir)
        .with_context(|| format!("Failed to list CSV directory {}", dir.display()))?;

    for entry in entries {
        let entry = entry.with_context(|| format!("Failed to read entry in {}", dir.display()))?;
        entries_found += 1;

        let path = entry.path();
        if path.extension().and_then(|ext| ext.to_str()) == Some("csv") && path.is_file() {
            files.push(path);
        }
    }

    Ok((entries_found, files))
}

/// Generate the BULK INSERT statement for one CSV file.
///
/// Comma field delimiter, line-feed row delimiter, first row skipped as the
/// header.
pub fn bulk_insert_sql(table: &str, path: &Path) -> String {
    format!(
        "BULK INSERT {} FROM '{}' WITH (FIELDTERMINATOR = ',', ROWTERMINATOR = '0x0a', FIRSTROW = 2)",
        schema::quote_ident(table),
        schema::escape_literal(&path.display().to_string())
    )
}

/// Run a full bulk-load pass: ensure the table, then load every CSV file.
///
/// The elapsed timer starts before table creation. The raw directory entry
/// count is printed before the per-file loop. Each file is its own implicit
/// transaction; a failure aborts the run and leaves earlier files committed.
pub async fn run<E: SqlExecutor>(client: &mut E, config: &Config) -> anyhow::Result<LoadReport> {
    let started = Instant::now();

    schema::ensure_table(client, &config.table).await?;

    let (entries_found, files) = enumerate_csv_files(&config.csv_dir)?;
    println!("{entries_found}");
    info!(
        "Found {} CSV files among {} entries in {}",
        files.len(),
        entries_found,
        config.csv_dir.display()
    );
    if files.is_empty() {
        warn!("No .csv files to load");
    }

    for path in &files {
        load_file(client, config, path).await?;
    }

    Ok(LoadReport {
        entries_found,
        files_loaded: files.len(),
        elapsed: started.elapsed(),
    })
}

async fn load_file<E: SqlExecutor>(
    client: &mut E,
    config: &Config,
    path: &Path,
) -> anyhow::Result<()> {
    let query = bulk_insert_sql(&config.table, path);
    debug!("Executing: {query}");

    if config.dry_run {
        info!("Dry run: would bulk insert {}", path.display());
        return Ok(());
    }

    let rows = client
        .execute(query)
        .await
        .with_context(|| format!("Bulk insert of {} failed", path.display()))?;

    info!("Loaded {rows} rows from {}", path.display());
    Ok(())
}
