//! Route pattern parsing and matching.

use std::cmp::Ordering;

/// The token that stands for a numeric identifier segment.
pub const DIGITS_TOKEN: &str = r"\d+";

/// One `/`-separated piece of a route pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Matches exactly this text (including the empty segment).
    Literal(String),

    /// Matches one or more ASCII decimal digits.
    Digits,

    /// Matches any non-empty segment. The name is descriptive only.
    Any(String),
}

impl Segment {
    fn parse(raw: &str) -> Self {
        if raw == DIGITS_TOKEN {
            Self::Digits
        } else if raw.len() > 2 && raw.starts_with('{') && raw.ends_with('}') {
            Self::Any(raw[1..raw.len() - 1].to_string())
        } else {
            Self::Literal(raw.to_string())
        }
    }

    /// Returns `true` if the concrete path segment satisfies this segment.
    #[must_use]
    pub fn accepts(&self, part: &str) -> bool {
        match self {
            Self::Literal(expected) => expected == part,
            Self::Digits => !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit()),
            Self::Any(_) => !part.is_empty(),
        }
    }

    /// Returns `true` for `Digits` and `Any`.
    #[must_use]
    pub const fn is_wildcard(&self) -> bool {
        !matches!(self, Self::Literal(_))
    }
}

/// How specific a pattern is, used to break ties between overlapping routes.
///
/// Ordering, greatest first: more literal characters, then fewer wildcard
/// segments, then more digit-constrained wildcards. Patterns that compare
/// equal fall back to registration order in the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Specificity {
    /// Total bytes across literal segments.
    pub literal_chars: usize,
    /// Number of `\d+` and `{name}` segments.
    pub wildcards: usize,
    /// Number of `\d+` segments.
    pub constrained: usize,
}

impl Ord for Specificity {
    fn cmp(&self, other: &Self) -> Ordering {
        self.literal_chars
            .cmp(&other.literal_chars)
            .then_with(|| other.wildcards.cmp(&self.wildcards))
            .then_with(|| self.constrained.cmp(&other.constrained))
    }
}

impl PartialOrd for Specificity {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// A parsed route pattern.
///
/// Any string is a valid pattern; text that is not a recognised wildcard is
/// treated literally.
///
/// # Example
///
/// ```rust
/// use heron_router::RoutePattern;
///
/// let pattern = RoutePattern::parse(r"/customer/\d+");
/// assert!(pattern.matches("/customer/17"));
/// assert!(!pattern.matches("/customer/abc"));
/// assert!(!pattern.matches("/customer/17/"));
/// ```
#[derive(Debug, Clone)]
pub struct RoutePattern {
    source: String,
    segments: Vec<Segment>,
    specificity: Specificity,
}

impl RoutePattern {
    /// Parses a pattern string.
    #[must_use]
    pub fn parse(pattern: &str) -> Self {
        let segments: Vec<Segment> = pattern.split('/').map(Segment::parse).collect();

        let mut specificity = Specificity {
            literal_chars: 0,
            wildcards: 0,
            constrained: 0,
        };
        for segment in &segments {
            match segment {
                Segment::Literal(text) => specificity.literal_chars += text.len(),
                Segment::Digits => {
                    specificity.wildcards += 1;
                    specificity.constrained += 1;
                }
                Segment::Any(_) => specificity.wildcards += 1,
            }
        }

        Self {
            source: pattern.to_string(),
            segments,
            specificity,
        }
    }

    /// Returns the pattern text as registered.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Returns the parsed segments.
    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Returns the specificity score.
    #[must_use]
    pub const fn specificity(&self) -> Specificity {
        self.specificity
    }

    /// Tests whether `path` matches the whole pattern.
    #[must_use]
    pub fn matches(&self, path: &str) -> bool {
        let mut parts = path.split('/');
        for segment in &self.segments {
            match parts.next() {
                Some(part) if segment.accepts(part) => {}
                _ => return false,
            }
        }
        parts.next().is_none()
    }
}

impl PartialEq for RoutePattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

impl Eq for RoutePattern {}

impl std::fmt::Display for RoutePattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_segments() {
        let pattern = RoutePattern::parse(r"/orders/\d+/{item}");
        assert_eq!(
            pattern.segments(),
            &[
                Segment::Literal(String::new()),
                Segment::Literal("orders".to_string()),
                Segment::Digits,
                Segment::Any("item".to_string()),
            ]
        );
    }

    #[test]
    fn test_root_pattern() {
        let root = RoutePattern::parse("/");
        assert!(root.matches("/"));
        assert!(!root.matches(""));
        assert!(!root.matches("/home"));
    }

    #[test]
    fn test_literal_match_is_anchored() {
        let home = RoutePattern::parse("/home");
        assert!(home.matches("/home"));
        assert!(!home.matches("/home/"));
        assert!(!home.matches("/homepage"));
        assert!(!home.matches("/x/home"));
        assert!(!home.matches("home"));
    }

    #[test]
    fn test_digits_segment() {
        let pattern = RoutePattern::parse(r"/customer/\d+");
        assert!(pattern.matches("/customer/0"));
        assert!(pattern.matches("/customer/123456789"));
        assert!(!pattern.matches("/customer/"));
        assert!(!pattern.matches("/customer/12a"));
        assert!(!pattern.matches("/customer/-1"));
        assert!(!pattern.matches("/customer/1/orders"));
    }

    #[test]
    fn test_any_segment_requires_content() {
        let pattern = RoutePattern::parse("/customer/{id}");
        assert!(pattern.matches("/customer/abc"));
        assert!(pattern.matches("/customer/42"));
        assert!(!pattern.matches("/customer/"));
    }

    #[test]
    fn test_braces_without_name_are_literal() {
        let pattern = RoutePattern::parse("/x/{}");
        assert!(pattern.matches("/x/{}"));
        assert!(!pattern.matches("/x/y"));
    }

    #[test]
    fn test_specificity_scores() {
        let score = RoutePattern::parse(r"/customer/\d+").specificity();
        assert_eq!(score.literal_chars, 8);
        assert_eq!(score.wildcards, 1);
        assert_eq!(score.constrained, 1);
    }

    #[test]
    fn test_specificity_ordering() {
        let literal = RoutePattern::parse("/customer/42").specificity();
        let digits = RoutePattern::parse(r"/customer/\d+").specificity();
        let any = RoutePattern::parse("/customer/{id}").specificity();

        assert!(literal > digits);
        assert!(digits > any);
        assert!(literal > any);
    }

    #[test]
    fn test_fewer_wildcards_win_on_equal_literals() {
        let one = RoutePattern::parse(r"/a/\d+/b").specificity();
        let two = RoutePattern::parse(r"/a/\d+/b/\d+").specificity();
        assert!(one > two);
    }

    #[test]
    fn test_display_round_trips_source() {
        let pattern = RoutePattern::parse(r"/customer/\d+");
        assert_eq!(pattern.to_string(), r"/customer/\d+");
        assert_eq!(pattern.as_str(), r"/customer/\d+");
    }
}
