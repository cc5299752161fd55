//! The storage port.

use std::future::Future;
use std::time::Duration;

use heron_core::{BoxFuture, RequestContext};

use crate::error::{StorageError, StorageResult};
use crate::value::{Row, SqlArg};

/// Per-call bound applied when no tighter request deadline exists.
pub const DEFAULT_QUERY_TIMEOUT: Duration = Duration::from_secs(5);

/// Narrow single-statement CRUD interface over a relational store.
///
/// Implementations must be safe to share across request tasks. Every method
/// takes the caller's [`RequestContext`] so the call is cancelled when the
/// request deadline passes.
pub trait Repository: Send + Sync {
    /// Runs a query and returns every row.
    fn read<'a>(
        &'a self,
        ctx: &'a RequestContext,
        query: &'a str,
        args: &'a [SqlArg],
    ) -> BoxFuture<'a, StorageResult<Vec<Row>>>;

    /// Runs a statement whose result is not needed.
    fn write<'a>(
        &'a self,
        ctx: &'a RequestContext,
        query: &'a str,
        args: &'a [SqlArg],
    ) -> BoxFuture<'a, StorageResult<()>>;

    /// Runs an update and returns the affected-row count.
    fn update<'a>(
        &'a self,
        ctx: &'a RequestContext,
        query: &'a str,
        args: &'a [SqlArg],
    ) -> BoxFuture<'a, StorageResult<u64>>;

    /// Runs a delete and returns the affected-row count.
    fn remove<'a>(
        &'a self,
        ctx: &'a RequestContext,
        query: &'a str,
        args: &'a [SqlArg],
    ) -> BoxFuture<'a, StorageResult<u64>>;

    /// Releases the underlying connections.
    fn close(&self) -> BoxFuture<'_, StorageResult<()>>;
}

/// Runs `fut` under `min(limit, ctx.remaining())`.
///
/// Expiry drops `fut` and yields [`StorageError::Timeout`] carrying the bound
/// that was applied.
pub async fn bounded<T, F>(ctx: &RequestContext, limit: Duration, fut: F) -> StorageResult<T>
where
    F: Future<Output = StorageResult<T>>,
{
    let bound = ctx.remaining().map_or(limit, |remaining| remaining.min(limit));

    match tokio::time::timeout(bound, fut).await {
        Ok(result) => result,
        Err(_) => {
            tracing::warn!(
                request_id = %ctx.request_id(),
                timeout_ms = u64::try_from(bound.as_millis()).unwrap_or(u64::MAX),
                "Storage call timed out"
            );
            Err(StorageError::Timeout(bound))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::Method;

    fn ctx() -> RequestContext {
        RequestContext::new(Method::GET, "/customer/1")
    }

    #[tokio::test(start_paused = true)]
    async fn test_bounded_times_out_at_limit() {
        let result: StorageResult<()> =
            bounded(&ctx(), DEFAULT_QUERY_TIMEOUT, std::future::pending()).await;

        match result {
            Err(StorageError::Timeout(bound)) => assert_eq!(bound, DEFAULT_QUERY_TIMEOUT),
            other => panic!("expected timeout, got {other:?}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_bounded_honors_tighter_request_deadline() {
        let ctx = ctx().with_timeout(Duration::from_secs(1));
        let result: StorageResult<()> =
            bounded(&ctx, DEFAULT_QUERY_TIMEOUT, std::future::pending()).await;

        match result {
            Err(StorageError::Timeout(bound)) => assert!(bound <= Duration::from_secs(1)),
            other => panic!("expected timeout, got {other:?}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_bounded_passes_through_result() {
        let result = bounded(&ctx(), DEFAULT_QUERY_TIMEOUT, async { Ok(3_u64) }).await;
        assert_eq!(result.unwrap(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_bounded_expired_deadline_fails_fast() {
        let ctx = ctx().with_timeout(Duration::from_millis(10));
        tokio::time::advance(Duration::from_millis(20)).await;

        let result: StorageResult<()> =
            bounded(&ctx, DEFAULT_QUERY_TIMEOUT, std::future::pending()).await;
        assert!(matches!(result, Err(StorageError::Timeout(bound)) if bound.is_zero()));
    }
}
