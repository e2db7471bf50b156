//! Values captured from `:name`, `{name}` and `*name` segments.

use smallvec::SmallVec;

/// Routes in practice carry at most a handful of parameters.
type Captures = SmallVec<[(String, String); 4]>;

/// Parameters captured while matching a request path, in path order.
///
/// Typed handlers bind their input from [`iter`](Self::iter); a catch-all
/// captures the rest of the path, slashes included.
///
/// ```rust
/// use routedoc_router::Router;
/// use http::Method;
///
/// let mut router = Router::new();
/// router.route(&Method::GET, "/items/:id/files/*path", "getItemFile").unwrap();
///
/// let found = router.match_route(&Method::GET, "/items/7/files/a/b.txt").unwrap();
/// assert_eq!(found.params.get("id"), Some("7"));
/// assert_eq!(found.params.get("path"), Some("a/b.txt"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Params {
    captures: Captures,
}

/// A point in a [`Params`] a failed match branch can rewind to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mark(usize);

impl Params {
    /// No captures.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the value captured for `name`.
    pub fn push(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.captures.push((name.into(), value.into()));
    }

    /// The value captured for `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.iter().find(|(n, _)| *n == name).map(|(_, v)| v)
    }

    /// True when the route has no parameters.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.captures.is_empty()
    }

    /// Number of captures.
    #[must_use]
    pub fn len(&self) -> usize {
        self.captures.len()
    }

    /// Remembers the current captures before trying a branch.
    #[must_use]
    pub fn mark(&self) -> Mark {
        Mark(self.captures.len())
    }

    /// Forgets everything captured since `mark`.
    pub fn rewind(&mut self, mark: Mark) {
        self.captures.truncate(mark.0);
    }

    /// `(name, value)` pairs in path order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.captures.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Params {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            captures: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_by_name() {
        let params: Params = [("itemId", "42"), ("tag", "blue")].into_iter().collect();

        assert_eq!(params.get("itemId"), Some("42"));
        assert_eq!(params.get("tag"), Some("blue"));
        assert_eq!(params.get("id"), None);
    }

    #[test]
    fn test_rewind_drops_branch_captures() {
        let mut params = Params::new();
        params.push("id", "7");
        let before_branch = params.mark();
        params.push("tagId", "3");
        params.push("rest", "x/y");

        params.rewind(before_branch);
        assert_eq!(params.len(), 1);
        assert_eq!(params.get("tagId"), None);
        assert_eq!(params.get("id"), Some("7"));
    }

    #[test]
    fn test_binding_order_follows_path() {
        let mut params = Params::new();
        params.push("userId", "u1");
        params.push("postId", "p9");

        let names: Vec<&str> = params.iter().map(|(name, _)| name).collect();
        assert_eq!(names, ["userId", "postId"]);
    }

    #[test]
    fn test_empty_catch_all_is_captured() {
        let mut params = Params::new();
        params.push("path", "");

        assert!(!params.is_empty());
        assert_eq!(params.get("path"), Some(""));
    }
}
