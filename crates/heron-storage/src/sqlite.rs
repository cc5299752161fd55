//! SQLite repository on `sqlx`.
//!
//! Rows are decoded dynamically from each value's storage class, so any
//! projection can be returned without a per-query row type:
//!
//! | SQLite | JSON |
//! |--------|------|
//! | `INTEGER` | number |
//! | `REAL` | number (`null` for NaN/inf) |
//! | `TEXT` | string |
//! | `BLOB` | base64 string |
//! | `NULL` | `null` |

use std::str::FromStr;
use std::time::Duration;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use heron_core::{BoxFuture, RequestContext};
use serde_json::Value;
use sqlx::query::Query;
use sqlx::sqlite::{
    Sqlite, SqliteArguments, SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow,
};
use sqlx::{Column, Row as _, TypeInfo, ValueRef};
use tracing::{debug, info};

use crate::error::{StorageError, StorageResult};
use crate::port::{bounded, Repository, DEFAULT_QUERY_TIMEOUT};
use crate::value::{Row, SqlArg};

/// Driver names accepted by [`SqliteRepository::connect`].
pub const SUPPORTED_DRIVERS: &[&str] = &["sqlite", "sqlite3"];

const IN_MEMORY_URL: &str = "sqlite::memory:";

/// [`Repository`] backed by a SQLite connection pool.
#[derive(Debug, Clone)]
pub struct SqliteRepository {
    pool: SqlitePool,
    timeout: Duration,
}

impl SqliteRepository {
    /// Opens a pool for `url` if `driver` names SQLite.
    ///
    /// The database file is created if it does not exist. `timeout` bounds
    /// both connection acquisition and every later call.
    pub async fn connect(driver: &str, url: &str, timeout: Duration) -> StorageResult<Self> {
        if !SUPPORTED_DRIVERS
            .iter()
            .any(|supported| supported.eq_ignore_ascii_case(driver))
        {
            return Err(StorageError::unsupported_driver(driver));
        }

        let options = SqliteConnectOptions::from_str(url)
            .map_err(StorageError::Connect)?
            .create_if_missing(true);

        let pool = if is_in_memory(url) {
            memory_pool_options()
        } else {
            SqlitePoolOptions::new().max_connections(5)
        }
        .acquire_timeout(timeout)
        .connect_with(options)
        .await
        .map_err(StorageError::Connect)?;

        info!(driver, "Connected to database");
        Ok(Self { pool, timeout })
    }

    /// Opens a private in-memory database.
    pub async fn in_memory() -> StorageResult<Self> {
        let options = SqliteConnectOptions::from_str(IN_MEMORY_URL).map_err(StorageError::Connect)?;
        let pool = memory_pool_options()
            .connect_with(options)
            .await
            .map_err(StorageError::Connect)?;

        Ok(Self {
            pool,
            timeout: DEFAULT_QUERY_TIMEOUT,
        })
    }

    /// Overrides the per-call timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Returns the per-call timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Runs one or more DDL statements.
    pub async fn migrate(&self, sql: &str) -> StorageResult<()> {
        self.ensure_open()?;
        debug!("Running schema migration");
        sqlx::raw_sql(sql)
            .execute(&self.pool)
            .await
            .map_err(StorageError::Query)?;
        Ok(())
    }

    /// Returns `true` once [`Repository::close`] has run.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.pool.is_closed()
    }

    fn ensure_open(&self) -> StorageResult<()> {
        if self.pool.is_closed() {
            return Err(StorageError::Closed);
        }
        Ok(())
    }

    async fn execute(&self, query: &str, args: &[SqlArg]) -> StorageResult<u64> {
        self.ensure_open()?;
        debug!(query, args = args.len(), "Executing statement");
        let result = bind_all(sqlx::query(query), args)
            .execute(&self.pool)
            .await
            .map_err(StorageError::Query)?;
        Ok(result.rows_affected())
    }

    async fn fetch(&self, query: &str, args: &[SqlArg]) -> StorageResult<Vec<Row>> {
        self.ensure_open()?;
        debug!(query, args = args.len(), "Executing query");
        let rows = bind_all(sqlx::query(query), args)
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::Query)?;
        rows.iter().map(decode_row).collect()
    }
}

impl Repository for SqliteRepository {
    fn read<'a>(
        &'a self,
        ctx: &'a RequestContext,
        query: &'a str,
        args: &'a [SqlArg],
    ) -> BoxFuture<'a, StorageResult<Vec<Row>>> {
        Box::pin(bounded(ctx, self.timeout, self.fetch(query, args)))
    }

    fn write<'a>(
        &'a self,
        ctx: &'a RequestContext,
        query: &'a str,
        args: &'a [SqlArg],
    ) -> BoxFuture<'a, StorageResult<()>> {
        Box::pin(async move {
            bounded(ctx, self.timeout, self.execute(query, args)).await?;
            Ok(())
        })
    }

    fn update<'a>(
        &'a self,
        ctx: &'a RequestContext,
        query: &'a str,
        args: &'a [SqlArg],
    ) -> BoxFuture<'a, StorageResult<u64>> {
        Box::pin(bounded(ctx, self.timeout, self.execute(query, args)))
    }

    fn remove<'a>(
        &'a self,
        ctx: &'a RequestContext,
        query: &'a str,
        args: &'a [SqlArg],
    ) -> BoxFuture<'a, StorageResult<u64>> {
        Box::pin(bounded(ctx, self.timeout, self.execute(query, args)))
    }

    fn close(&self) -> BoxFuture<'_, StorageResult<()>> {
        Box::pin(async move {
            if !self.pool.is_closed() {
                self.pool.close().await;
                info!("Database connections closed");
            }
            Ok(())
        })
    }
}

fn is_in_memory(url: &str) -> bool {
    url.contains(":memory:") || url.contains("mode=memory")
}

// An in-memory database lives only as long as its single connection.
fn memory_pool_options() -> SqlitePoolOptions {
    SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
}

fn bind_all<'q>(
    mut query: Query<'q, Sqlite, SqliteArguments<'q>>,
    args: &'q [SqlArg],
) -> Query<'q, Sqlite, SqliteArguments<'q>> {
    for arg in args {
        query = match arg {
            SqlArg::Null => query.bind(None::<i64>),
            SqlArg::Integer(v) => query.bind(*v),
            SqlArg::Real(v) => query.bind(*v),
            SqlArg::Text(v) => query.bind(v.as_str()),
            SqlArg::Bool(v) => query.bind(*v),
        };
    }
    query
}

fn decode_row(row: &SqliteRow) -> StorageResult<Row> {
    let mut out = Row::with_capacity(row.len());
    for (index, column) in row.columns().iter().enumerate() {
        let value = decode_value(row, index)
            .map_err(|source| StorageError::decode(column.name(), source))?;
        out.insert(column.name().to_string(), value);
    }
    Ok(out)
}

fn decode_value(row: &SqliteRow, index: usize) -> Result<Value, sqlx::Error> {
    let type_name = {
        let raw = row.try_get_raw(index)?;
        if raw.is_null() {
            return Ok(Value::Null);
        }
        raw.type_info().name().to_ascii_uppercase()
    };

    let value = match type_name.as_str() {
        "INTEGER" | "INT" | "INT4" | "INT8" | "BIGINT" | "BOOLEAN" => {
            Value::from(row.try_get_unchecked::<i64, _>(index)?)
        }
        "REAL" | "FLOAT" | "DOUBLE" | "NUMERIC" => {
            let v = row.try_get_unchecked::<f64, _>(index)?;
            serde_json::Number::from_f64(v).map_or(Value::Null, Value::Number)
        }
        "BLOB" => Value::String(STANDARD.encode(row.try_get_unchecked::<Vec<u8>, _>(index)?)),
        _ => Value::String(row.try_get_unchecked::<String, _>(index)?),
    };
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::Method;

    fn ctx() -> RequestContext {
        RequestContext::new(Method::GET, "/")
    }

    #[test]
    fn test_in_memory_detection() {
        assert!(is_in_memory("sqlite::memory:"));
        assert!(is_in_memory("sqlite://file:shared?mode=memory&cache=shared"));
        assert!(!is_in_memory("sqlite://heron.db"));
    }

    #[tokio::test]
    async fn test_decodes_every_storage_class() {
        let repo = SqliteRepository::in_memory().await.unwrap();
        let rows = repo
            .read(
                &ctx(),
                "SELECT 1 AS i, 2.5 AS r, 'txt' AS t, x'00ff' AS b, NULL AS n",
                &[],
            )
            .await
            .unwrap();

        assert_eq!(rows.len(), 1);
        let row = &rows[0];
        assert_eq!(row["i"], Value::from(1));
        assert_eq!(row["r"], Value::from(2.5));
        assert_eq!(row["t"], Value::from("txt"));
        assert_eq!(row["b"], Value::from("AP8="));
        assert_eq!(row["n"], Value::Null);
        assert_eq!(
            row.keys().collect::<Vec<_>>(),
            vec!["i", "r", "t", "b", "n"]
        );
    }

    #[tokio::test]
    async fn test_binds_positional_arguments() {
        let repo = SqliteRepository::in_memory().await.unwrap();
        let rows = repo
            .read(
                &ctx(),
                "SELECT $1 AS a, $2 AS b, $3 AS c, $4 AS d",
                &[
                    SqlArg::from(42_i64),
                    SqlArg::from("hello"),
                    SqlArg::Null,
                    SqlArg::from(true),
                ],
            )
            .await
            .unwrap();

        let row = &rows[0];
        assert_eq!(row["a"], Value::from(42));
        assert_eq!(row["b"], Value::from("hello"));
        assert_eq!(row["c"], Value::Null);
        assert_eq!(row["d"], Value::from(1));
    }
}
