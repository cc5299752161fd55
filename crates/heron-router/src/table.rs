//! The route table.

use std::collections::HashMap;

use http::Method;

use crate::pattern::RoutePattern;

/// A registered route: a parsed pattern and its handler.
#[derive(Debug, Clone)]
pub struct Route<H> {
    pattern: RoutePattern,
    handler: H,
}

impl<H> Route<H> {
    /// Returns the route pattern.
    #[must_use]
    pub const fn pattern(&self) -> &RoutePattern {
        &self.pattern
    }

    /// Returns the handler.
    #[must_use]
    pub const fn handler(&self) -> &H {
        &self.handler
    }
}

/// Per-method ordered route lists.
///
/// The table is a plain container. It is filled during startup and only read
/// afterwards; see [`RouteTable::resolve`] for the matching rules.
///
/// # Example
///
/// ```rust
/// use heron_router::RouteTable;
/// use http::Method;
///
/// let mut table = RouteTable::new();
/// table.register(Method::GET, "/x", 1);
/// let previous = table.register(Method::GET, "/x", 2);
///
/// assert_eq!(previous, Some(1));
/// assert_eq!(table.len(), 1);
/// assert_eq!(table.resolve(&Method::GET, "/x").handler, Some(&2));
/// ```
pub struct RouteTable<H> {
    pub(crate) routes: HashMap<Method, Vec<Route<H>>>,
}

impl<H> RouteTable<H> {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self {
            routes: HashMap::new(),
        }
    }

    /// Registers `handler` for `(method, pattern)`.
    ///
    /// If that exact pattern string is already registered for the method,
    /// the handler is replaced in place, keeping the original registration
    /// position, and the previous handler is returned.
    pub fn register(&mut self, method: Method, pattern: impl AsRef<str>, handler: H) -> Option<H> {
        let pattern = pattern.as_ref();
        let routes = self.routes.entry(method).or_default();

        if let Some(existing) = routes.iter_mut().find(|r| r.pattern.as_str() == pattern) {
            return Some(std::mem::replace(&mut existing.handler, handler));
        }

        routes.push(Route {
            pattern: RoutePattern::parse(pattern),
            handler,
        });
        None
    }

    /// Returns the routes registered for `method`, in registration order.
    #[must_use]
    pub fn routes(&self, method: &Method) -> &[Route<H>] {
        self.routes.get(method).map_or(&[], Vec::as_slice)
    }

    /// Returns `true` if at least one route exists for `method`.
    #[must_use]
    pub fn contains_method(&self, method: &Method) -> bool {
        self.routes.contains_key(method)
    }

    /// Returns the methods that have routes, sorted by name.
    #[must_use]
    pub fn methods(&self) -> Vec<Method> {
        let mut methods: Vec<Method> = self.routes.keys().cloned().collect();
        methods.sort_by(|a, b| a.as_str().cmp(b.as_str()));
        methods
    }

    /// Returns the total number of routes across all methods.
    #[must_use]
    pub fn len(&self) -> usize {
        self.routes.values().map(Vec::len).sum()
    }

    /// Returns `true` if no routes are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

impl<H> Default for RouteTable<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H> std::fmt::Debug for RouteTable<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut map = f.debug_map();
        for method in self.methods() {
            let patterns: Vec<&str> = self
                .routes(&method)
                .iter()
                .map(|r| r.pattern.as_str())
                .collect();
            map.entry(&method.as_str(), &patterns);
        }
        map.finish()
    }
}
