//! Path-pattern matching.
//!
//! # Responsibilities
//! - Decide whether a route pattern matches a request path
//! - Extract ordered parameter values, URL-decoded
//! - Recognize `field:value` addressing inside parameter segments
//!
//! # Design Decisions
//! - Pure function: pattern + path in, captures out, no router state
//! - No regex; a single front-to-front segment walk, O(n)
//! - Empty segments (double slashes) must align position-for-position
//! - `*` and `:param` refuse empty segments; `**` swallows any tail

use std::borrow::Cow;

/// One value captured from a `:param` segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathValue {
    /// Ordinary captured text, usually a primary id.
    Plain(String),
    /// A `field:value` pair; a missing field name means "use the
    /// resource's title field".
    Lookup {
        field: Option<String>,
        value: String,
    },
}

impl PathValue {
    /// The captured text, ignoring any field-name qualifier.
    pub fn as_str(&self) -> &str {
        match self {
            PathValue::Plain(value) => value,
            PathValue::Lookup { value, .. } => value,
        }
    }
}

/// Match `path` against `pattern`, returning the captured values in
/// pattern order, or `None` when the pattern does not apply.
///
/// Pattern segments: literals, `*` (any one non-empty segment), `:name`
/// (capture one non-empty segment), and a trailing `**` (accept the rest,
/// including nothing). Trailing slashes on either side are ignored.
/// `field_lookup` enables splitting a captured `name:value` segment into
/// a [`PathValue::Lookup`] pair.
pub fn match_path(pattern: &str, path: &str, field_lookup: bool) -> Option<Vec<PathValue>> {
    let mut path = path.trim_end_matches('/').split('/').peekable();
    let mut pattern = pattern.trim_end_matches('/').split('/').peekable();

    let mut vars = Vec::new();

    while path.peek().is_some() || pattern.peek().is_some() {
        let p = path.next();
        let r = pattern.next();

        // path ended but the pattern carries a trailing-slash artifact
        if p.is_none() && r == Some("") {
            continue;
        }

        // literal agreement; also aligns empty segments from double slashes
        if p == r {
            continue;
        }

        // single wildcard consumes any one non-empty segment
        if r == Some("*") && p.is_some_and(|s| !s.is_empty()) {
            continue;
        }

        // pattern ran out while the path still has segments
        let Some(segment) = r.filter(|s| !s.is_empty()) else {
            return None;
        };

        if segment.starts_with(':') {
            if let Some(raw) = p.filter(|s| !s.is_empty()) {
                vars.push(capture(raw, field_lookup));
                continue;
            }
        }

        if segment == "**" {
            return Some(vars);
        }

        return None;
    }

    Some(vars)
}

fn capture(raw: &str, field_lookup: bool) -> PathValue {
    if field_lookup {
        if let Some((field, value)) = raw.split_once(':') {
            return PathValue::Lookup {
                field: (!field.is_empty()).then(|| decode(field)),
                value: decode(value),
            };
        }
    }
    PathValue::Plain(decode(raw))
}

fn decode(raw: &str) -> String {
    urlencoding::decode(raw)
        .map(Cow::into_owned)
        .unwrap_or_else(|_| raw.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matches(pattern: &str, path: &str) -> bool {
        match_path(pattern, path, true).is_some()
    }

    fn captures(pattern: &str, path: &str) -> Vec<PathValue> {
        match_path(pattern, path, true).expect("expected a match")
    }

    #[test]
    fn test_basic() {
        assert!(matches("/", "/"));
        assert!(matches("/hello", "/hello"));
        assert!(matches("/hello", "/hello/"));
        assert!(matches("/hello/", "/hello"));

        assert!(!matches("/hello", "/world"));
        assert!(!matches("/hello//world", "/hello/world"));
        assert!(!matches("/hello/world", "/hello//world"));
    }

    #[test]
    fn test_asterisk() {
        assert!(!matches("/*", "/"));
        assert!(matches("/*", "/hello"));
        assert!(!matches("/*", "/hello/world"));

        assert!(!matches("/test/*", "/test"));
        assert!(!matches("/test/*", "/test/"));
        assert!(matches("/test/*", "/test/something"));
        assert!(!matches("/test/*", "/test/something/else"));

        assert!(matches("/test/*/abc", "/test/bah/abc"));
        assert!(!matches("/test/*/abc", "/test/bah/cba"));
        assert!(!matches("/test/*/abc", "/test/abc"));
        assert!(!matches("/test/*/abc", "/test//abc"));
        assert!(matches("/test/*/abc", "/test/*/abc"));
    }

    #[test]
    fn test_param() {
        assert!(!matches("/:", "/"));
        assert!(matches("/:", "/hello"));
        assert!(!matches("/:", "/hello/world"));

        assert!(!matches("/test/:", "/test"));
        assert!(!matches("/test/:", "/test/"));
        assert!(matches("/test/:", "/test/something"));
        assert!(!matches("/test/:", "/test/something/else"));

        assert!(matches("/test/:/abc", "/test/bah/abc"));
        assert!(!matches("/test/:/abc", "/test/bah/cba"));
        assert!(!matches("/test/:/abc", "/test/abc"));
        assert!(!matches("/test/:/abc", "/test//abc"));
        assert!(matches("/test/:/abc", "/test/*/abc"));
    }

    #[test]
    fn test_double_asterisk() {
        assert!(matches("/**", "/"));
        assert!(matches("/**", "/hello"));
        assert!(matches("/**", "/hello/world"));

        assert!(matches("/test/**", "/test"));
        assert!(matches("/test/**", "/test/"));
        assert!(matches("/test/**", "/test/something"));
        assert!(matches("/test/**", "/test/something/else"));

        assert!(!matches("/test/**", "/else"));
    }

    #[test]
    fn test_exact_match_captures_nothing() {
        assert_eq!(captures("/a/b/c", "/a/b/c"), vec![]);
        assert_eq!(captures("/a/b/c/", "/a/b/c"), vec![]);
    }

    #[test]
    fn test_param_captures_plain_value() {
        assert_eq!(
            captures("/:", "/x"),
            vec![PathValue::Plain("x".to_string())]
        );
        assert_eq!(
            captures("/country/:id", "/country/42"),
            vec![PathValue::Plain("42".to_string())]
        );
    }

    #[test]
    fn test_param_captures_lookup_pair() {
        assert_eq!(
            captures("/:", "/name:value"),
            vec![PathValue::Lookup {
                field: Some("name".to_string()),
                value: "value".to_string(),
            }]
        );
    }

    #[test]
    fn test_param_with_empty_field_uses_title_fallback_marker() {
        assert_eq!(
            captures("/country/:id", "/country/:Italy"),
            vec![PathValue::Lookup {
                field: None,
                value: "Italy".to_string(),
            }]
        );
    }

    #[test]
    fn test_captures_are_url_decoded() {
        assert_eq!(
            captures("/:", "/name:New%20Zealand"),
            vec![PathValue::Lookup {
                field: Some("name".to_string()),
                value: "New Zealand".to_string(),
            }]
        );
        assert_eq!(
            captures("/:", "/New%20Zealand"),
            vec![PathValue::Plain("New Zealand".to_string())]
        );
    }

    #[test]
    fn test_multiple_params_capture_in_order() {
        assert_eq!(
            captures("/client/:cid/invoice/:id", "/client/7/invoice/9"),
            vec![
                PathValue::Plain("7".to_string()),
                PathValue::Plain("9".to_string()),
            ]
        );
    }

    #[test]
    fn test_field_lookup_can_be_disabled() {
        assert_eq!(
            match_path("/:", "/name:test", false).expect("expected a match"),
            vec![PathValue::Plain("name:test".to_string())]
        );
    }
}
