use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use runtime::DatabaseConfig;
use sea_orm::{DatabaseConnection, SqlxPostgresConnector, SqlxSqliteConnector};
use sqlx::postgres::PgPoolOptions;
use sqlx::sqlite::SqlitePoolOptions;
use url::Url;

pub const MEMORY_DSN: &str = "sqlite::memory:";

const DEFAULT_MAX_CONNS: u32 = 10;
const DEFAULT_BUSY_TIMEOUT_MS: u32 = 5_000;
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    Sqlite,
    Postgres,
}

/// Detect DB backend from URL scheme.
pub fn detect_from_dsn(dsn: &str) -> Result<Backend> {
    let raw = dsn.trim();
    if raw.is_empty() {
        return Err(anyhow!("Database URL not configured"));
    }

    let url = Url::parse(raw).map_err(|e| anyhow!("Invalid database DSN '{}': {}", raw, e))?;

    match url.scheme() {
        "sqlite" | "sqlite3" => Ok(Backend::Sqlite),
        "postgres" | "postgresql" => Ok(Backend::Postgres),
        other => Err(anyhow!("Unsupported database type: {}", other)),
    }
}

fn is_memory_dsn(dsn: &str) -> bool {
    let dsn = dsn.trim();
    dsn.eq_ignore_ascii_case("sqlite::memory:")
        || dsn.eq_ignore_ascii_case("sqlite://:memory:")
        || dsn.eq_ignore_ascii_case("sqlite:memory:")
}

/// Expand a sqlite DSN into an absolute-path DSN using a base directory.
/// - In-memory forms collapse to [`MEMORY_DSN`].
/// - Normalizes backslashes into forward slashes (important on Windows).
/// - Adds `mode=rwc` unless a mode is given, so the file is created on first start.
pub fn absolutize_sqlite_dsn(dsn: &str, base_dir: &Path, create_dirs: bool) -> Result<String> {
    if is_memory_dsn(dsn) {
        return Ok(MEMORY_DSN.to_string());
    }
    let db_path = dsn
        .trim()
        .strip_prefix("sqlite://")
        .ok_or_else(|| anyhow!("DSN must start with sqlite:// (got: {})", dsn))?;

    let (path_str, query) = match db_path.split_once('?') {
        Some((p, q)) => (p, Some(q)),
        None => (db_path, None),
    };

    let mut p = PathBuf::from(path_str);
    if p.as_os_str().is_empty() {
        return Err(anyhow!("Empty SQLite path in DSN"));
    }
    if p.is_relative() {
        p = base_dir.join(p);
    }

    if create_dirs {
        if let Some(dir) = p.parent() {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("failed to create database dir {}", dir.display()))?;
        }
    }

    let mut params: Vec<&str> = query
        .map(|q| q.split('&').filter(|kv| !kv.is_empty()).collect())
        .unwrap_or_default();
    if !params.iter().any(|kv| kv.starts_with("mode=")) {
        params.push("mode=rwc");
    }

    // Rebuild DSN with absolute path and normalized slashes
    let mut out = String::from("sqlite://");
    out.push_str(&p.to_string_lossy().replace('\\', "/"));
    out.push('?');
    out.push_str(&params.join("&"));
    Ok(out)
}

/// The DSN the server will actually connect to: `--mock` forces in-memory
/// SQLite; sqlite file paths are made absolute against `base_dir`.
pub fn effective_dsn(
    cfg: &DatabaseConfig,
    base_dir: &Path,
    mock: bool,
    create_dirs: bool,
) -> Result<String> {
    if mock {
        return Ok(MEMORY_DSN.to_string());
    }

    let dsn = cfg.url.trim();
    match detect_from_dsn(dsn)? {
        Backend::Sqlite => absolutize_sqlite_dsn(dsn, base_dir, create_dirs),
        Backend::Postgres => Ok(dsn.to_string()),
    }
}

/// Open the pool and wrap it for SeaORM.
pub async fn connect(dsn: &str, cfg: &DatabaseConfig) -> Result<DatabaseConnection> {
    let max_conns = cfg.max_conns.unwrap_or(DEFAULT_MAX_CONNS).max(1);

    match detect_from_dsn(dsn)? {
        Backend::Sqlite => {
            let memory = is_memory_dsn(dsn);
            let busy_ms = cfg.busy_timeout_ms.unwrap_or(DEFAULT_BUSY_TIMEOUT_MS);

            // Every pooled connection to `:memory:` is a separate database, so the
            // pool is pinned to one connection that is never recycled.
            let opts = if memory {
                SqlitePoolOptions::new()
                    .max_connections(1)
                    .min_connections(1)
                    .idle_timeout(None)
                    .max_lifetime(None)
            } else {
                SqlitePoolOptions::new().max_connections(max_conns)
            };

            let pool = opts
                .acquire_timeout(ACQUIRE_TIMEOUT)
                .after_connect(move |conn, _meta| {
                    Box::pin(async move {
                        if !memory {
                            sqlx::query("PRAGMA journal_mode = WAL")
                                .execute(&mut *conn)
                                .await?;
                        }
                        // PRAGMA can't use bind parameters; use a numeric literal.
                        let stmt = format!("PRAGMA busy_timeout = {busy_ms}");
                        sqlx::query(&stmt).execute(&mut *conn).await?;
                        Ok(())
                    })
                })
                .connect(dsn)
                .await
                .with_context(|| format!("failed to open sqlite database {dsn}"))?;

            Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
        }
        Backend::Postgres => {
            let pool = PgPoolOptions::new()
                .max_connections(max_conns)
                .acquire_timeout(ACQUIRE_TIMEOUT)
                .connect(dsn)
                .await
                .context("failed to connect to postgres")?;

            Ok(SqlxPostgresConnector::from_sqlx_postgres_pool(pool))
        }
    }
}
