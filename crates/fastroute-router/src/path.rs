//! Path segmentation.
//!
//! Both route patterns and request paths are compared as segment sequences.
//! A segment is either a literal run prefixed with its separator (`/users`)
//! or the trailing-slash marker (`/`), which only ever appears last.
//!
//! | Input | Segments |
//! |-------|----------|
//! | `""`, `/`, `//` | `["/"]` |
//! | `/a` | `["/a"]` |
//! | `/a/` | `["/a", "/"]` |
//! | `a/b` | `["/a", "/b"]` |
//! | `/a//b///c/` | `["/a", "/b", "/c", "/"]` |
//!
//! Dot segments (`.`, `..`) are not resolved.

use std::borrow::Cow;

/// Separator between segments, and the trailing-slash marker.
pub const SEPARATOR: &str = "/";

/// Default cap on the number of segments produced for one path.
pub const MAX_SEGMENTS: usize = 100;

/// Splits `path` into at most [`MAX_SEGMENTS`] segments.
///
/// # Example
///
/// ```rust
/// use fastroute_router::path::segment;
///
/// assert_eq!(segment("/user/gopher/"), vec!["/user", "/gopher", "/"]);
/// assert_eq!(segment("user//gopher"), vec!["/user", "/gopher"]);
/// assert_eq!(segment(""), vec!["/"]);
/// ```
#[must_use]
pub fn segment(path: &str) -> Vec<String> {
    segment_with_limit(path, MAX_SEGMENTS)
}

/// Gives `path` a leading `/`; an empty path becomes `/`.
///
/// Used for the prefix lookups, which compare the path as a string rather
/// than as segments.
///
/// ```
/// use fastroute_router::path::normalize;
///
/// assert_eq!(normalize(""), "/");
/// assert_eq!(normalize("a/b"), "/a/b");
/// assert_eq!(normalize("/a"), "/a");
/// ```
#[must_use]
pub fn normalize(path: &str) -> Cow<'_, str> {
    if path.starts_with(SEPARATOR) {
        Cow::Borrowed(path)
    } else {
        Cow::Owned(format!("{SEPARATOR}{path}"))
    }
}

/// Splits `path` into at most `limit` segments; anything beyond is dropped.
///
/// A `limit` of zero is treated as one, so the result is never empty.
#[must_use]
pub fn segment_with_limit(path: &str, limit: usize) -> Vec<String> {
    let limit = limit.max(1);
    let mut segments: Vec<String> = path
        .split('/')
        .filter(|literal| !literal.is_empty())
        .take(limit)
        .map(|literal| format!("/{literal}"))
        .collect();

    let trailing = path.is_empty() || path.ends_with('/');
    if (trailing || segments.is_empty()) && segments.len() < limit {
        segments.push(SEPARATOR.to_string());
    }
    segments
}

/// Returns true if `segment` is the trailing-slash marker.
#[must_use]
pub fn is_trailing_marker(segment: &str) -> bool {
    segment == SEPARATOR
}

/// Returns true if the last segment of `segments` is the trailing-slash marker.
#[must_use]
pub fn ends_with_marker<S: AsRef<str>>(segments: &[S]) -> bool {
    segments
        .last()
        .is_some_and(|last| is_trailing_marker(last.as_ref()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_normalize() {
        assert_eq!(normalize(""), "/");
        assert_eq!(normalize("a"), "/a");
        assert_eq!(normalize("/"), "/");
        assert!(matches!(normalize("/a/b"), Cow::Borrowed("/a/b")));
    }

    #[test]
    fn test_segment_table() {
        let cases: &[(&str, &[&str])] = &[
            // basic
            ("/", &["/"]),
            ("/a", &["/a"]),
            ("/a/", &["/a", "/"]),
            ("/a/b", &["/a", "/b"]),
            ("/a/b/", &["/a", "/b", "/"]),
            ("/a/b/c/d", &["/a", "/b", "/c", "/d"]),
            // no root
            ("", &["/"]),
            ("a/b", &["/a", "/b"]),
            ("a/b/c", &["/a", "/b", "/c"]),
            ("a/b/c/", &["/a", "/b", "/c", "/"]),
            // doubled separators
            ("//", &["/"]),
            ("/z//", &["/z", "/"]),
            ("/q/w//", &["/q", "/w", "/"]),
            ("/a/b/c//", &["/a", "/b", "/c", "/"]),
            ("/a//b//c", &["/a", "/b", "/c"]),
            ("/a//b///c/", &["/a", "/b", "/c", "/"]),
            ("//a", &["/a"]),
            ("///a", &["/a"]),
            ("//a//", &["/a", "/"]),
        ];

        for (input, expected) in cases {
            assert_eq!(segment(input), *expected, "segmenting {input:?}");
        }
    }

    #[test]
    fn test_variables_are_plain_literals() {
        assert_eq!(segment("/user/:name"), vec!["/user", "/:name"]);
    }

    #[test]
    fn test_limit_drops_excess() {
        let long = "/x".repeat(150);
        let segments = segment(&long);
        assert_eq!(segments.len(), MAX_SEGMENTS);
        assert!(segments.iter().all(|s| s == "/x"));

        assert_eq!(segment_with_limit("/a/b/c/", 2), vec!["/a", "/b"]);
        assert_eq!(segment_with_limit("/a/b/", 3), vec!["/a", "/b", "/"]);
        assert_eq!(segment_with_limit("/a/b", 0), vec!["/a"]);
    }

    #[test]
    fn test_marker_helpers() {
        assert!(is_trailing_marker("/"));
        assert!(!is_trailing_marker("/a"));
        assert!(ends_with_marker(&segment("/a/")));
        assert!(!ends_with_marker(&segment("/a")));
        assert!(!ends_with_marker::<String>(&[]));
    }

    proptest! {
        #[test]
        fn prop_segments_are_well_formed(path in "[a-z/]{0,64}") {
            let segments = segment(&path);
            prop_assert!(!segments.is_empty());
            prop_assert!(segments.len() <= MAX_SEGMENTS);
            for (i, s) in segments.iter().enumerate() {
                prop_assert!(s.starts_with('/'));
                prop_assert!(!s[1..].contains('/'));
                if is_trailing_marker(s) {
                    prop_assert_eq!(i, segments.len() - 1);
                }
            }
        }

        #[test]
        fn prop_doubling_separators_is_idempotent(path in "[a-z/]{0,64}") {
            let doubled = path.replace('/', "//");
            prop_assert_eq!(segment(&path), segment(&doubled));
        }

        #[test]
        fn prop_leading_slash_is_optional(path in "[a-z][a-z/]{0,63}") {
            prop_assert_eq!(segment(&path), segment(&format!("/{path}")));
        }

        #[test]
        fn prop_rejoining_reproduces_segments(path in "[a-z/]{0,64}") {
            let joined: String = segment(&path).concat();
            prop_assert_eq!(segment(&joined), segment(&path));
        }
    }
}
