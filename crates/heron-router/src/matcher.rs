//! Resolving a request against the route table.

use http::Method;

use crate::table::{Route, RouteTable};

/// The outcome of [`RouteTable::resolve`].
#[derive(Debug)]
pub struct Resolution<'a, H> {
    /// The selected handler, when a pattern matched.
    pub handler: Option<&'a H>,
    /// The pattern that was selected.
    pub pattern: Option<&'a str>,
    /// Whether any route is registered for the method.
    pub method_known: bool,
    /// Whether a pattern for the method matched the path.
    pub path_known: bool,
}

impl<'a, H> Resolution<'a, H> {
    const fn unknown_method() -> Self {
        Self {
            handler: None,
            pattern: None,
            method_known: false,
            path_known: false,
        }
    }

    const fn unknown_path() -> Self {
        Self {
            handler: None,
            pattern: None,
            method_known: true,
            path_known: false,
        }
    }

    fn found(route: &'a Route<H>) -> Self {
        Self {
            handler: Some(route.handler()),
            pattern: Some(route.pattern().as_str()),
            method_known: true,
            path_known: true,
        }
    }
}

impl<H> RouteTable<H> {
    /// Resolves `(method, path)` to a handler.
    ///
    /// Every route for the method is tested against the full path. When more
    /// than one matches, the winner is the pattern with the greatest
    /// [`Specificity`](crate::Specificity):
    ///
    /// 1. more literal characters;
    /// 2. then fewer wildcard segments;
    /// 3. then more `\d+` segments (over `{name}` segments);
    /// 4. then earliest registration.
    ///
    /// So `/customer/42` beats `/customer/\d+`, which beats `/customer/{id}`.
    pub fn resolve(&self, method: &Method, path: &str) -> Resolution<'_, H> {
        let Some(routes) = self.routes.get(method) else {
            return Resolution::unknown_method();
        };

        let mut best: Option<&Route<H>> = None;
        for candidate in routes.iter().filter(|r| r.pattern().matches(path)) {
            match best {
                Some(current)
                    if current.pattern().specificity() >= candidate.pattern().specificity() => {}
                _ => best = Some(candidate),
            }
        }

        best.map_or_else(Resolution::unknown_path, Resolution::found)
    }

    /// Returns every method with a pattern matching `path`, sorted by name.
    ///
    /// Used to populate the `Allow` header of a 405 response.
    #[must_use]
    pub fn allowed_methods(&self, path: &str) -> Vec<Method> {
        let mut methods: Vec<Method> = self
            .routes
            .iter()
            .filter(|(_, routes)| routes.iter().any(|r| r.pattern().matches(path)))
            .map(|(method, _)| method.clone())
            .collect();
        methods.sort_by(|a, b| a.as_str().cmp(b.as_str()));
        methods
    }
}
