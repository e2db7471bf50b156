//! Radix tree node implementation.
//!
//! Each node represents one path segment. Static children are kept sorted
//! for binary search; a node has at most one parameter child and at most
//! one catch-all child.

use http::Method;

use crate::method_router::MethodRouter;
use crate::params::Params;
use crate::RouteError;

/// Type of path segment in the radix tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SegmentKind {
    /// Static path segment (e.g., "items", "api")
    Static,
    /// Named parameter (`{id}` or `:id`)
    Param(String),
    /// Catch-all wildcard (`*path`)
    Wildcard(String),
}

impl SegmentKind {
    /// Classifies a single path segment.
    ///
    /// Both the brace style (`{id}`) and the colon style (`:id`) produce a
    /// parameter; a leading `*` produces a catch-all.
    #[must_use]
    pub fn parse(segment: &str) -> Self {
        if let Some(name) = segment.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
            Self::Param(name.to_string())
        } else if let Some(name) = segment.strip_prefix(':') {
            Self::Param(name.to_string())
        } else if let Some(name) = segment.strip_prefix('*') {
            Self::Wildcard(name.to_string())
        } else {
            Self::Static
        }
    }
}

/// A node in the radix tree.
#[derive(Debug, Clone)]
pub struct Node<T> {
    /// The path segment this node represents
    pub segment: String,

    /// The kind of segment (static, param, or wildcard)
    pub kind: SegmentKind,

    /// Method router for this node (if it's a route endpoint)
    pub methods: Option<MethodRouter<T>>,

    /// Static children, sorted by segment for binary search
    pub static_children: Vec<Node<T>>,

    /// Parameter child (at most one per node)
    pub param_child: Option<Box<Node<T>>>,

    /// Wildcard child (at most one per node, must be leaf)
    pub wildcard_child: Option<Box<Node<T>>>,
}

impl<T> Node<T> {
    fn with_kind(segment: impl Into<String>, kind: SegmentKind) -> Self {
        Self {
            segment: segment.into(),
            kind,
            methods: None,
            static_children: Vec::new(),
            param_child: None,
            wildcard_child: None,
        }
    }

    /// Creates a root node for the tree.
    #[must_use]
    pub fn root() -> Self {
        Self::with_kind("", SegmentKind::Static)
    }

    /// Splits a path pattern into classified segments.
    fn parse_path(path: &str) -> Vec<(&str, SegmentKind)> {
        split_segments(path)
            .into_iter()
            .map(|s| (s, SegmentKind::parse(s)))
            .collect()
    }

    /// Stores `value` for `(path, method)`, returning the value it replaced.
    pub fn insert(&mut self, path: &str, method: &Method, value: T) -> Result<Option<T>, RouteError> {
        let target = self.descend_or_create(path)?;
        target
            .methods
            .get_or_insert_with(MethodRouter::new)
            .set(method, value)
    }

    /// Merges a whole method router into the node for `path`.
    ///
    /// Methods already registered on that node are kept.
    pub fn insert_methods(&mut self, path: &str, methods: MethodRouter<T>) -> Result<(), RouteError> {
        let target = self.descend_or_create(path)?;
        match &mut target.methods {
            Some(existing) => existing.merge(methods),
            None => target.methods = Some(methods),
        }
        Ok(())
    }

    fn descend_or_create(&mut self, path: &str) -> Result<&mut Node<T>, RouteError> {
        let segments = Self::parse_path(path);
        let mut current = self;
        for (index, (segment, kind)) in segments.iter().enumerate() {
            current = match kind {
                SegmentKind::Static => {
                    let position = match current
                        .static_children
                        .binary_search_by(|c| c.segment.as_str().cmp(*segment))
                    {
                        Ok(position) => position,
                        Err(position) => {
                            current
                                .static_children
                                .insert(position, Node::with_kind(*segment, SegmentKind::Static));
                            position
                        }
                    };
                    &mut current.static_children[position]
                }
                SegmentKind::Param(_) => {
                    let child = current
                        .param_child
                        .get_or_insert_with(|| Box::new(Node::with_kind(*segment, kind.clone())));
                    if child.kind != *kind {
                        return Err(RouteError::ParamConflict {
                            path: path.to_string(),
                            existing: child.segment.clone(),
                            new: (*segment).to_string(),
                        });
                    }
                    child.as_mut()
                }
                SegmentKind::Wildcard(_) => {
                    if index + 1 != segments.len() {
                        return Err(RouteError::WildcardNotLast(path.to_string()));
                    }
                    let child = current
                        .wildcard_child
                        .get_or_insert_with(|| Box::new(Node::with_kind(*segment, kind.clone())));
                    if child.kind != *kind {
                        return Err(RouteError::ParamConflict {
                            path: path.to_string(),
                            existing: child.segment.clone(),
                            new: (*segment).to_string(),
                        });
                    }
                    child.as_mut()
                }
            };
        }
        Ok(current)
    }

    /// Matches a path against the tree.
    ///
    /// Returns the method router and extracted parameters if found.
    #[must_use]
    pub fn match_path(&self, path: &str) -> Option<(&MethodRouter<T>, Params)> {
        let segments = split_segments(path);
        let mut params = Params::new();
        let methods = self.match_segments(&segments, &mut params)?;
        Some((methods, params))
    }

    fn match_segments<'a>(&'a self, segments: &[&str], params: &mut Params) -> Option<&'a MethodRouter<T>> {
        let Some((segment, remaining)) = segments.split_first() else {
            if let Some(methods) = &self.methods {
                return Some(methods);
            }
            // A catch-all also matches the empty remainder.
            let child = self.wildcard_child.as_ref()?;
            if let SegmentKind::Wildcard(name) = &child.kind {
                params.push(name.clone(), String::new());
            }
            return child.methods.as_ref();
        };

        // Static first
        if let Some(child) = self.find_static_child(segment) {
            if let Some(result) = child.match_segments(remaining, params) {
                return Some(result);
            }
        }

        if let Some(child) = self.param_child.as_ref().filter(|_| !segment.is_empty()) {
            if let SegmentKind::Param(name) = &child.kind {
                let mark = params.mark();
                params.push(name.clone(), *segment);
                if let Some(result) = child.match_segments(remaining, params) {
                    return Some(result);
                }
                params.rewind(mark);
            }
        }

        // Wildcard last, it swallows the rest of the path
        if let Some(child) = &self.wildcard_child {
            if let SegmentKind::Wildcard(name) = &child.kind {
                params.push(name.clone(), segments.join("/"));
                return child.methods.as_ref();
            }
        }

        None
    }

    fn find_static_child(&self, segment: &str) -> Option<&Node<T>> {
        self.static_children
            .binary_search_by(|c| c.segment.as_str().cmp(segment))
            .ok()
            .map(|i| &self.static_children[i])
    }
}

/// Splits `path` on `/`, dropping empty segments.
///
/// A trailing `/` after at least one segment becomes a final empty segment,
/// so `/items` and `/items/` end on different nodes.
pub(crate) fn split_segments(path: &str) -> Vec<&str> {
    let mut segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    if !segments.is_empty() && path.ends_with('/') {
        segments.push("");
    }
    segments
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segment_kind_parse() {
        assert_eq!(SegmentKind::parse("items"), SegmentKind::Static);
        assert_eq!(SegmentKind::parse("{id}"), SegmentKind::Param("id".to_string()));
        assert_eq!(SegmentKind::parse(":id"), SegmentKind::Param("id".to_string()));
        assert_eq!(
            SegmentKind::parse("*path"),
            SegmentKind::Wildcard("path".to_string())
        );
    }

    #[test]
    fn test_parse_path_skips_empty_segments() {
        let segments = Node::<()>::parse_path("//items//:id");
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0], ("items", SegmentKind::Static));
        assert_eq!(segments[1], (":id", SegmentKind::Param("id".to_string())));
    }

    #[test]
    fn test_parse_path_keeps_trailing_slash() {
        let segments = Node::<()>::parse_path("/items/:id/");
        assert_eq!(segments.len(), 3);
        assert_eq!(segments[2], ("", SegmentKind::Static));
        assert!(Node::<()>::parse_path("/").is_empty());
    }

    #[test]
    fn test_trailing_slash_is_a_separate_route() {
        let mut root = Node::root();
        root.insert("/items", &Method::GET, "listItems").unwrap();
        root.insert("/items/", &Method::GET, "listItemsSlash").unwrap();

        let (methods, _) = root.match_path("/items").unwrap();
        assert_eq!(methods.get_value(&Method::GET), Some(&"listItems"));
        let (methods, _) = root.match_path("/items/").unwrap();
        assert_eq!(methods.get_value(&Method::GET), Some(&"listItemsSlash"));
    }

    #[test]
    fn test_param_does_not_match_trailing_slash() {
        let mut root = Node::root();
        root.insert("/items/:id", &Method::GET, "getItem").unwrap();

        assert!(root.match_path("/items/").is_none());
        assert!(root.match_path("/items/7").is_some());
    }

    #[test]
    fn test_insert_and_match_colon_param() {
        let mut root = Node::root();
        root.insert("/items/:id", &Method::GET, "getItem").unwrap();

        let (methods, params) = root.match_path("/items/42").unwrap();
        assert_eq!(methods.get_value(&Method::GET), Some(&"getItem"));
        assert_eq!(params.get("id"), Some("42"));
    }

    #[test]
    fn test_insert_and_match_wildcard() {
        let mut root = Node::root();
        root.insert("/files/*path", &Method::GET, "serveFile").unwrap();

        let (_, params) = root.match_path("/files/images/logo.png").unwrap();
        assert_eq!(params.get("path"), Some("images/logo.png"));

        let (_, params) = root.match_path("/files").unwrap();
        assert_eq!(params.get("path"), Some(""));
    }

    #[test]
    fn test_static_priority_over_param() {
        let mut root = Node::root();
        root.insert("/items/latest", &Method::GET, "latestItem").unwrap();
        root.insert("/items/{id}", &Method::GET, "getItem").unwrap();

        let (methods, params) = root.match_path("/items/latest").unwrap();
        assert_eq!(methods.get_value(&Method::GET), Some(&"latestItem"));
        assert!(params.is_empty());

        let (methods, params) = root.match_path("/items/7").unwrap();
        assert_eq!(methods.get_value(&Method::GET), Some(&"getItem"));
        assert_eq!(params.get("id"), Some("7"));
    }

    #[test]
    fn test_param_backtracking_drops_stale_params() {
        let mut root = Node::root();
        root.insert("/a/:x/b", &Method::GET, "paramBranch").unwrap();
        root.insert("/a/*rest", &Method::GET, "catchAll").unwrap();

        let (methods, params) = root.match_path("/a/one/c").unwrap();
        assert_eq!(methods.get_value(&Method::GET), Some(&"catchAll"));
        assert_eq!(params.get("x"), None);
        assert_eq!(params.get("rest"), Some("one/c"));
        assert_eq!(params.len(), 1);
    }

    #[test]
    fn test_insert_replaces_same_method() {
        let mut root = Node::root();
        assert_eq!(root.insert("/items", &Method::GET, 1).unwrap(), None);
        assert_eq!(root.insert("/items", &Method::GET, 2).unwrap(), Some(1));
        assert_eq!(root.insert("/items", &Method::POST, 3).unwrap(), None);
    }

    #[test]
    fn test_insert_conflicting_param_names() {
        let mut root = Node::root();
        root.insert("/items/:id", &Method::GET, ()).unwrap();
        let err = root.insert("/items/:itemId/tags", &Method::GET, ()).unwrap_err();
        assert!(matches!(err, RouteError::ParamConflict { .. }));
    }

    #[test]
    fn test_wildcard_must_be_last() {
        let mut root = Node::root();
        let err = root.insert("/files/*path/meta", &Method::GET, ()).unwrap_err();
        assert!(matches!(err, RouteError::WildcardNotLast(_)));
    }

    #[test]
    fn test_insert_methods_merges() {
        let mut root = Node::root();
        root.insert_methods("/items", MethodRouter::new().get("list")).unwrap();
        root.insert_methods("/items", MethodRouter::new().get("other").post("create"))
            .unwrap();

        let (methods, _) = root.match_path("/items").unwrap();
        assert_eq!(methods.get_value(&Method::GET), Some(&"list"));
        assert_eq!(methods.get_value(&Method::POST), Some(&"create"));
    }
}
