//! Lexical path utilities shared by route groups and the document model.

use crate::node::{split_segments, SegmentKind};

/// Returns the shortest path equivalent to `path` by purely lexical processing.
///
/// Repeated separators collapse, `.` segments are dropped and `..` removes the
/// preceding segment. A rooted path never climbs above `/`. The empty path
/// cleans to `.`.
///
/// ```rust
/// use routedoc_router::clean_path;
///
/// assert_eq!(clean_path("/a//b/./c/.."), "/a/b");
/// assert_eq!(clean_path("/../x"), "/x");
/// assert_eq!(clean_path(""), ".");
/// ```
#[must_use]
pub fn clean_path(path: &str) -> String {
    if path.is_empty() {
        return ".".to_string();
    }
    let rooted = path.starts_with('/');
    let mut parts: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => match parts.last() {
                Some(&last) if last != ".." => {
                    parts.pop();
                }
                _ if rooted => {}
                _ => parts.push(".."),
            },
            other => parts.push(other),
        }
    }

    let joined = parts.join("/");
    match (rooted, joined.is_empty()) {
        (true, _) => format!("/{joined}"),
        (false, true) => ".".to_string(),
        (false, false) => joined,
    }
}

/// Joins a group's base path with a route's relative path.
///
/// The result is the cleaned concatenation of both, except that a trailing
/// `/` on `relative` survives even though cleaning would strip it, so
/// `/items` and `/items/` stay distinct. An empty `relative` returns `base`
/// unchanged.
///
/// ```rust
/// use routedoc_router::join_paths;
///
/// assert_eq!(join_paths("/a/b", "/c"), "/a/b/c");
/// assert_eq!(join_paths("/a/b", "/c/"), "/a/b/c/");
/// assert_eq!(join_paths("/a", ""), "/a");
/// ```
#[must_use]
pub fn join_paths(base: &str, relative: &str) -> String {
    if relative.is_empty() {
        return base.to_string();
    }

    let combined = if base.is_empty() {
        relative.to_string()
    } else {
        format!("{base}/{relative}")
    };
    let mut joined = clean_path(&combined);
    if relative.ends_with('/') && !joined.ends_with('/') {
        joined.push('/');
    }
    joined
}

/// Returns the shape of a route pattern as the router sees it.
///
/// Parameter segments become `{}` whatever their name or style and catch-alls
/// become `*`; static segments and a trailing `/` are kept. Two patterns with
/// the same key compete for the same route slot.
///
/// ```rust
/// use routedoc_router::pattern_key;
///
/// assert_eq!(pattern_key("/items/:id"), pattern_key("/items/{itemId}"));
/// assert_ne!(pattern_key("/items"), pattern_key("/items/"));
/// ```
#[must_use]
pub fn pattern_key(path: &str) -> String {
    let shape: Vec<&str> = split_segments(path)
        .into_iter()
        .map(|segment| match SegmentKind::parse(segment) {
            SegmentKind::Static => segment,
            SegmentKind::Param(_) => "{}",
            SegmentKind::Wildcard(_) => "*",
        })
        .collect();
    format!("/{}", shape.join("/"))
}
