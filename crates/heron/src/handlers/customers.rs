//! Customer CRUD handlers.
//!
//! Every handler owns an `Arc<dyn Repository>` and turns its outcome into a
//! response through [`HeronError::into_response`]. Storage failures are
//! logged with the request id and answered with a fixed message so driver
//! errors never leak to clients.

use std::sync::Arc;

use heron_core::{
    handler_fn, BoxedHandler, HeronError, HeronResult, Request, RequestContext, Response,
    ResponseExt,
};
use heron_router::trailing_segment;
use heron_storage::{Repository, StorageError};
use http::StatusCode;
use http_body_util::BodyExt;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, error, info};

use super::StatusMessage;

const INSERT: &str = "INSERT INTO customers (name, email) VALUES ($1, $2)";
const SELECT_BY_ID: &str = "SELECT id, name, email FROM customers WHERE id = $1";
const UPDATE: &str = "UPDATE customers SET name = $1, email = $2 WHERE id = $3";
const DELETE: &str = "DELETE FROM customers WHERE id = $1";

/// Message for an id segment that is not an `i64`.
pub const INVALID_ID: &str = "Invalid customer ID";

/// Request body for create and update.
#[derive(Debug, Clone, Deserialize)]
pub struct CustomerPayload {
    /// Overrides the path id on update.
    #[serde(default)]
    pub id: Option<i64>,
    /// Customer name.
    pub name: String,
    /// Customer email.
    pub email: String,
}

/// `POST /customer`.
pub fn create(repo: Arc<dyn Repository>) -> BoxedHandler {
    handler_fn(move |ctx, req| {
        let repo = Arc::clone(&repo);
        async move { respond(&ctx, create_customer(repo.as_ref(), &ctx, req).await) }
    })
}

/// `GET /customer/{id}`.
pub fn get(repo: Arc<dyn Repository>) -> BoxedHandler {
    handler_fn(move |ctx, _req| {
        let repo = Arc::clone(&repo);
        async move { respond(&ctx, get_customer(repo.as_ref(), &ctx).await) }
    })
}

/// `PUT /customer/{id}`.
pub fn update(repo: Arc<dyn Repository>) -> BoxedHandler {
    handler_fn(move |ctx, req| {
        let repo = Arc::clone(&repo);
        async move { respond(&ctx, update_customer(repo.as_ref(), &ctx, req).await) }
    })
}

/// `DELETE /customer/{id}`.
pub fn delete(repo: Arc<dyn Repository>) -> BoxedHandler {
    handler_fn(move |ctx, _req| {
        let repo = Arc::clone(&repo);
        async move { respond(&ctx, delete_customer(repo.as_ref(), &ctx).await) }
    })
}

/// Fallback for `/customer/<anything>` when the segment is not numeric.
pub fn invalid_id() -> BoxedHandler {
    handler_fn(|_ctx, _req| async { HeronError::bad_request(INVALID_ID).into_response() })
}

async fn create_customer(
    repo: &dyn Repository,
    ctx: &RequestContext,
    req: Request,
) -> HeronResult<Response> {
    let payload: CustomerPayload = read_json(req).await?;

    repo.write(ctx, INSERT, &[payload.name.into(), payload.email.into()])
        .await
        .map_err(|err| storage_failure(ctx, &err, "Failed to create customer"))?;

    info!(request_id = %ctx.request_id(), "Customer created");
    Ok(Response::json(
        StatusCode::CREATED,
        &StatusMessage::ok("Created successfully"),
    ))
}

async fn get_customer(repo: &dyn Repository, ctx: &RequestContext) -> HeronResult<Response> {
    let id = path_id(ctx)?;

    let rows = repo
        .read(ctx, SELECT_BY_ID, &[id.into()])
        .await
        .map_err(|err| storage_failure(ctx, &err, "Failed to fetch customer"))?;

    rows.into_iter()
        .next()
        .map(|row| Response::json(StatusCode::OK, &row))
        .ok_or_else(|| HeronError::not_found("Customer not found"))
}

async fn update_customer(
    repo: &dyn Repository,
    ctx: &RequestContext,
    req: Request,
) -> HeronResult<Response> {
    let path_id = path_id(ctx)?;
    let payload: CustomerPayload = read_json(req).await?;
    let id = payload.id.unwrap_or(path_id);

    let affected = repo
        .update(ctx, UPDATE, &[payload.name.into(), payload.email.into(), id.into()])
        .await
        .map_err(|err| storage_failure(ctx, &err, "Failed to update customer"))?;

    info!(request_id = %ctx.request_id(), customer_id = id, affected, "Customer updated");
    Ok(Response::json(
        StatusCode::OK,
        &StatusMessage::ok(format!("{affected} customer updated successfully")),
    ))
}

async fn delete_customer(repo: &dyn Repository, ctx: &RequestContext) -> HeronResult<Response> {
    let id = path_id(ctx)?;

    let affected = repo
        .remove(ctx, DELETE, &[id.into()])
        .await
        .map_err(|err| storage_failure(ctx, &err, "Failed to delete customer"))?;

    info!(request_id = %ctx.request_id(), customer_id = id, affected, "Customer deleted");
    Ok(Response::json(
        StatusCode::OK,
        &StatusMessage::ok(format!("{affected} customer deleted successfully")),
    ))
}

fn respond(ctx: &RequestContext, result: HeronResult<Response>) -> Response {
    result.unwrap_or_else(|err| {
        if err.category().is_client_error() {
            debug!(request_id = %ctx.request_id(), error = %err, "Customer request rejected");
        }
        err.into_response()
    })
}

fn path_id(ctx: &RequestContext) -> HeronResult<i64> {
    trailing_segment(ctx.path())
        .parse()
        .map_err(|_| HeronError::bad_request(INVALID_ID))
}

async fn read_json<T: DeserializeOwned>(req: Request) -> HeronResult<T> {
    let bytes = match req.into_body().collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(never) => match never {},
    };
    Ok(serde_json::from_slice(&bytes)?)
}

fn storage_failure(ctx: &RequestContext, err: &StorageError, message: &str) -> HeronError {
    error!(
        request_id = %ctx.request_id(),
        http.path = %ctx.path(),
        error = %err,
        "{message}"
    );
    HeronError::storage(message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use http::Method;
    use http_body_util::Full;

    fn ctx(method: Method, path: &str) -> RequestContext {
        RequestContext::new(method, path)
    }

    fn request(body: &'static str) -> Request {
        http::Request::builder()
            .body(Full::new(Bytes::from_static(body.as_bytes())))
            .unwrap()
    }

    #[test]
    fn test_path_id() {
        assert_eq!(path_id(&ctx(Method::GET, "/customer/42")).unwrap(), 42);

        for path in ["/customer/abc", "/customer/", "/customer/99999999999999999999"] {
            let err = path_id(&ctx(Method::GET, path)).unwrap_err();
            assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
            assert_eq!(err.to_string(), INVALID_ID);
        }
    }

    #[tokio::test]
    async fn test_read_json() {
        let payload: CustomerPayload =
            read_json(request(r#"{"name":"Jane","email":"jane@example.com"}"#))
                .await
                .unwrap();
        assert_eq!(payload.id, None);
        assert_eq!(payload.name, "Jane");

        let payload: CustomerPayload =
            read_json(request(r#"{"id":7,"name":"Jane","email":"jane@example.com"}"#))
                .await
                .unwrap();
        assert_eq!(payload.id, Some(7));
    }

    #[tokio::test]
    async fn test_read_json_rejects_bad_bodies() {
        for body in ["{not json", r#"{"name":"Jane"}"#, ""] {
            let err = read_json::<CustomerPayload>(request(body)).await.unwrap_err();
            assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
            assert_eq!(err.to_string(), "Invalid request body");
        }
    }

    #[test]
    fn test_storage_failure_hides_driver_error() {
        let err = storage_failure(
            &ctx(Method::DELETE, "/customer/1"),
            &StorageError::Closed,
            "Failed to delete customer",
        );
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.to_string(), "Failed to delete customer");
    }
}
