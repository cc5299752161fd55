//! Route table and path matcher for Heron.
//!
//! Routes are stored per HTTP method in registration order. Resolving a
//! request scans the routes for its method, keeps every pattern that matches
//! the whole path, and picks the most specific one.
//!
//! # Pattern syntax
//!
//! Patterns are split on `/` and compared segment by segment:
//!
//! | Segment | Matches |
//! |---------|---------|
//! | `\d+` | one or more ASCII digits |
//! | `{name}` | any single non-empty segment |
//! | anything else | exactly that text |
//!
//! Matching is anchored: `/home` does not match `/home/` or `/home/x`.
//! Nothing is captured; handlers read identifiers back out of the path with
//! [`trailing_segment`].
//!
//! # Example
//!
//! ```rust
//! use heron_router::RouteTable;
//! use http::Method;
//!
//! let mut table = RouteTable::new();
//! table.register(Method::GET, "/customer", "listCustomers");
//! table.register(Method::GET, r"/customer/\d+", "getCustomer");
//!
//! let hit = table.resolve(&Method::GET, "/customer/42");
//! assert_eq!(hit.handler, Some(&"getCustomer"));
//!
//! let miss = table.resolve(&Method::GET, "/customer/abc");
//! assert!(miss.method_known && !miss.path_known);
//!
//! let wrong_method = table.resolve(&Method::PATCH, "/customer/42");
//! assert!(!wrong_method.method_known);
//! ```
//!
//! # Resolution states
//!
//! ```text
//!   resolve(method, path)
//!          │
//!          ├── no routes for method ──────────► method_known = false   (405)
//!          │
//!          ├── routes, none match ────────────► path_known = false     (404)
//!          │
//!          └── one or more match ─► best by specificity ─► handler
//! ```

mod matcher;
mod path;
mod pattern;
mod table;

pub use matcher::Resolution;
pub use path::trailing_segment;
pub use pattern::{RoutePattern, Segment, Specificity, DIGITS_TOKEN};
pub use table::{Route, RouteTable};
