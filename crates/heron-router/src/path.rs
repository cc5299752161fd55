//! Path helpers for handlers.

/// Returns the last `/`-separated segment of `path`.
///
/// The matcher captures nothing, so handlers bound to patterns such as
/// `/customer/\d+` use this to read the identifier back.
///
/// ```rust
/// use heron_router::trailing_segment;
///
/// assert_eq!(trailing_segment("/customer/42"), "42");
/// assert_eq!(trailing_segment("/customer/"), "");
/// assert_eq!(trailing_segment("plain"), "plain");
/// ```
#[must_use]
pub fn trailing_segment(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trailing_segment() {
        assert_eq!(trailing_segment("/customer/42"), "42");
        assert_eq!(trailing_segment("/a/b/c"), "c");
        assert_eq!(trailing_segment("/"), "");
        assert_eq!(trailing_segment(""), "");
    }
}
