//! Command-line interface for csv-bulkload
//!
//! # Usage Examples
//!
//! ```bash
//! # Load a directory of daily-price CSV files into the default table
//! csv-bulkload \
//!   --server sqlhost --database "CV Project" \
//!   --csv-dir /data/crypto-prices
//!
//! # SQL Server authentication, custom table, statements logged only
//! RUST_LOG=info MSSQL_PASSWORD=secret csv-bulkload \
//!   --server sqlhost --database "CV Project" \
//!   --auth-mode sql-server --username loader \
//!   --csv-dir /data/crypto-prices --table DailyPrices --dry-run
//! ```
//!
//! The tool prints the raw directory entry count, loads every `.csv` file it
//! found with a server-side `BULK INSERT`, and prints the elapsed seconds.
//! Any failure aborts the run; files loaded before the failure stay
//! committed.

use clap::Parser;
use csv_bulkload::connect::connect_to_mssql;
use csv_bulkload::{load, LoadOpts, MssqlOpts};

#[derive(Parser)]
#[command(name = "csv-bulkload")]
#[command(about = "A tool for bulk-loading CSV files into SQL Server")]
#[command(long_about = None)]
struct Cli {
    /// SQL Server connection options
    #[command(flatten)]
    mssql: MssqlOpts,

    /// Bulk-load options
    #[command(flatten)]
    load: LoadOpts,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = run().await {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
    Ok(())
}

async fn run() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let config = load::Config {
        csv_dir: cli.load.csv_dir,
        table: cli.load.table,
        dry_run: cli.load.dry_run,
    };
    config.validate()?;

    // The connection is exclusively owned here; on any failure below it is
    // released by drop, on success it is closed explicitly.
    let mut client = connect_to_mssql(&cli.mssql).await?;

    // Prints the raw directory entry count before loading the files
    let report = load::run(&mut client, &config).await?;

    println!(
        "Import completed in {} seconds",
        report.elapsed.as_secs_f64()
    );

    client.close().await?;
    Ok(())
}
