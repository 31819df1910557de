use crate::{AuthMode, MssqlOpts};
use anyhow::Context;
use async_trait::async_trait;
use tokio::net::TcpStream;
use tokio_util::compat::{Compat, TokioAsyncWriteCompatExt};

/// TDS client over a plain tokio TCP stream.
pub type MssqlClient = tiberius::Client<Compat<TcpStream>>;

/// Executes T-SQL statements against the destination server.
///
/// The seam between the load pipeline and the TDS client; tests substitute
/// a recording implementation.
#[async_trait]
pub trait SqlExecutor: Send {
    /// Execute a single statement, returning the number of affected rows.
    async fn execute(&mut self, sql: String) -> anyhow::Result<u64>;
}

#[async_trait]
impl SqlExecutor for MssqlClient {
    async fn execute(&mut self, sql: String) -> anyhow::Result<u64> {
        let result = tiberius::Client::execute(self, sql, &[]).await?;
        Ok(result.total())
    }
}

// Connect to the SQL Server instance named in the options
pub async fn connect_to_mssql(opts: &MssqlOpts) -> anyhow::Result<MssqlClient> {
    let mut config = tiberius::Config::new();
    config.host(&opts.server);
    config.port(opts.port);
    config.database(&opts.database);
    config.application_name("csv-bulkload");
    config.authentication(auth_method(opts)?);
    if opts.trust_server_certificate {
        config.trust_cert();
    }

    tracing::debug!(
        "Connecting to SQL Server at {}:{} (database: {})",
        opts.server,
        opts.port,
        opts.database
    );

    let tcp = TcpStream::connect(config.get_addr())
        .await
        .with_context(|| {
            format!(
                "Failed to reach SQL Server at {}:{}",
                opts.server, opts.port
            )
        })?;
    tcp.set_nodelay(true)?;

    let client = tiberius::Client::connect(config, tcp.compat_write())
        .await
        .with_context(|| {
            format!(
                "SQL Server handshake with {}:{} failed",
                opts.server, opts.port
            )
        })?;

    Ok(client)
}

fn auth_method(opts: &MssqlOpts) -> anyhow::Result<tiberius::AuthMethod> {
    match opts.auth_mode {
        AuthMode::Integrated => integrated_auth(),
        AuthMode::SqlServer => {
            let username = opts
                .username
                .clone()
                .context("--username is required with --auth-mode sql-server")?;
            let password = opts
                .password
                .clone()
                .context("--password is required with --auth-mode sql-server")?;
            Ok(tiberius::AuthMethod::sql_server(username, password))
        }
    }
}

#[cfg(windows)]
fn integrated_auth() -> anyhow::Result<tiberius::AuthMethod> {
    Ok(tiberius::AuthMethod::Integrated)
}

#[cfg(not(windows))]
fn integrated_auth() -> anyhow::Result<tiberius::AuthMethod> {
    anyhow::bail!("Integrated authentication is only available on Windows; use --auth-mode sql-server")
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn opts(extra: &[&str]) -> MssqlOpts {
        let mut args = vec!["test", "--database", "CV Project"];
        args.extend_from_slice(extra);
        MssqlOpts::try_parse_from(args).expect("options should parse")
    }

    #[test]
    fn sql_server_auth_requires_username_and_password() {
        let err = auth_method(&opts(&["--auth-mode", "sql-server"])).unwrap_err();
        assert!(err.to_string().contains("--username"));

        let err =
            auth_method(&opts(&["--auth-mode", "sql-server", "--username", "loader"])).unwrap_err();
        assert!(err.to_string().contains("--password"));
    }

    #[test]
    fn sql_server_auth_accepts_credentials() {
        let opts = opts(&[
            "--auth-mode",
            "sql-server",
            "--username",
            "loader",
            "--password",
            "secret",
        ]);
        assert!(auth_method(&opts).is_ok());
    }

    #[cfg(not(windows))]
    #[test]
    fn integrated_auth_is_rejected_off_windows() {
        let err = auth_method(&opts(&[])).unwrap_err();
        assert!(err.to_string().contains("Windows"));
    }
}
