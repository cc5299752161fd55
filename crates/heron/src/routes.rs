//! Route bindings.

use std::sync::Arc;

use heron_middleware::{AuthGate, BearerToken, BoxedMiddleware, Timing};
use heron_server::ServerBuilder;
use heron_storage::Repository;
use http::Method;

use crate::handlers::{customers, home};

/// Customer routes with a numeric id.
pub const CUSTOMER_BY_ID: &str = r"/customer/\d+";

/// Customer routes with any id; loses to [`CUSTOMER_BY_ID`] on specificity.
pub const CUSTOMER_ANY_ID: &str = "/customer/{id}";

/// Registers every application route on `builder`.
///
/// `DELETE` runs behind `[Timing, AuthGate]`, so rejected deletes are
/// timed as well.
pub fn bind_routes(
    builder: ServerBuilder,
    repo: Arc<dyn Repository>,
    auth: BearerToken,
) -> ServerBuilder {
    let guarded: Vec<BoxedMiddleware> =
        vec![Arc::new(Timing::new()), Arc::new(AuthGate::new(auth))];

    builder
        .route(Method::GET, "/", home::index())
        .route(Method::GET, "/home", home::index())
        .route(Method::POST, "/customer", customers::create(Arc::clone(&repo)))
        .route(Method::GET, CUSTOMER_BY_ID, customers::get(Arc::clone(&repo)))
        .route(Method::PUT, CUSTOMER_BY_ID, customers::update(Arc::clone(&repo)))
        .route_with(Method::DELETE, CUSTOMER_BY_ID, customers::delete(repo), &guarded)
        .route(Method::GET, CUSTOMER_ANY_ID, customers::invalid_id())
        .route(Method::PUT, CUSTOMER_ANY_ID, customers::invalid_id())
        .route(Method::DELETE, CUSTOMER_ANY_ID, customers::invalid_id())
}
