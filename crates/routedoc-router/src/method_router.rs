//! HTTP method-based routing.
//!
//! [`MethodRouter`] maps the eight routable HTTP verbs to a value for a
//! single path pattern.

use http::Method;

use crate::RouteError;

/// Maps HTTP methods to values for a single route.
///
/// # Example
///
/// ```rust
/// use routedoc_router::MethodRouter;
/// use http::Method;
///
/// let router = MethodRouter::new()
///     .get("listItems")
///     .post("createItem");
///
/// assert_eq!(router.get_value(&Method::GET), Some(&"listItems"));
/// assert_eq!(router.get_value(&Method::POST), Some(&"createItem"));
/// assert_eq!(router.get_value(&Method::DELETE), None);
/// ```
#[derive(Debug, Clone)]
pub struct MethodRouter<T> {
    get: Option<T>,
    post: Option<T>,
    put: Option<T>,
    patch: Option<T>,
    delete: Option<T>,
    head: Option<T>,
    options: Option<T>,
    trace: Option<T>,
}

impl<T> Default for MethodRouter<T> {
    fn default() -> Self {
        Self {
            get: None,
            post: None,
            put: None,
            patch: None,
            delete: None,
            head: None,
            options: None,
            trace: None,
        }
    }
}

/// The methods a [`MethodRouter`] can hold, in the order they are reported.
pub const ROUTABLE_METHODS: [Method; 8] = [
    Method::GET,
    Method::POST,
    Method::PUT,
    Method::PATCH,
    Method::DELETE,
    Method::HEAD,
    Method::OPTIONS,
    Method::TRACE,
];

impl<T> MethodRouter<T> {
    /// Creates a new empty method router.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&self, method: &Method) -> Option<&Option<T>> {
        match *method {
            Method::GET => Some(&self.get),
            Method::POST => Some(&self.post),
            Method::PUT => Some(&self.put),
            Method::PATCH => Some(&self.patch),
            Method::DELETE => Some(&self.delete),
            Method::HEAD => Some(&self.head),
            Method::OPTIONS => Some(&self.options),
            Method::TRACE => Some(&self.trace),
            _ => None,
        }
    }

    fn slot_mut(&mut self, method: &Method) -> Option<&mut Option<T>> {
        match *method {
            Method::GET => Some(&mut self.get),
            Method::POST => Some(&mut self.post),
            Method::PUT => Some(&mut self.put),
            Method::PATCH => Some(&mut self.patch),
            Method::DELETE => Some(&mut self.delete),
            Method::HEAD => Some(&mut self.head),
            Method::OPTIONS => Some(&mut self.options),
            Method::TRACE => Some(&mut self.trace),
            _ => None,
        }
    }

    /// Stores `value` for `method`, returning the value it replaced.
    pub fn set(&mut self, method: &Method, value: T) -> Result<Option<T>, RouteError> {
        let slot = self
            .slot_mut(method)
            .ok_or_else(|| RouteError::UnsupportedMethod(method.to_string()))?;
        Ok(slot.replace(value))
    }

    /// Returns the value registered for exactly this method.
    #[must_use]
    pub fn get_value(&self, method: &Method) -> Option<&T> {
        self.slot(method).and_then(Option::as_ref)
    }

    /// Returns the value that should serve a request with this method.
    ///
    /// HEAD requests fall back to the GET value when no HEAD route exists.
    #[must_use]
    pub fn resolve(&self, method: &Method) -> Option<&T> {
        match self.get_value(method) {
            Some(value) => Some(value),
            None if *method == Method::HEAD => self.get.as_ref(),
            None => None,
        }
    }

    /// Returns true when a value is registered for this method.
    #[must_use]
    pub fn contains(&self, method: &Method) -> bool {
        self.get_value(method).is_some()
    }

    /// Merges another method router into this one.
    ///
    /// Methods already set here are NOT overwritten.
    pub fn merge(&mut self, other: MethodRouter<T>) {
        let MethodRouter {
            get,
            post,
            put,
            patch,
            delete,
            head,
            options,
            trace,
        } = other;
        let incoming = [get, post, put, patch, delete, head, options, trace];
        for (method, value) in ROUTABLE_METHODS.iter().zip(incoming) {
            if let (Some(slot), Some(value)) = (self.slot_mut(method), value) {
                if slot.is_none() {
                    *slot = Some(value);
                }
            }
        }
    }

    /// Returns true if any methods are registered.
    #[must_use]
    pub fn has_any_method(&self) -> bool {
        ROUTABLE_METHODS.iter().any(|m| self.contains(m))
    }

    /// Returns the list of methods registered for this route.
    #[must_use]
    pub fn allowed_methods(&self) -> Vec<Method> {
        ROUTABLE_METHODS
            .iter()
            .filter(|m| self.contains(m))
            .cloned()
            .collect()
    }
}

macro_rules! verb_builders {
    ($($name:ident => $field:ident, $verb:literal;)*) => {
        impl<T> MethodRouter<T> {
            $(
                #[doc = concat!("Registers a ", $verb, " value.")]
                #[must_use]
                pub fn $name(mut self, value: T) -> Self {
                    self.$field = Some(value);
                    self
                }
            )*
        }
    };
}

verb_builders! {
    get => get, "GET";
    post => post, "POST";
    put => put, "PUT";
    patch => patch, "PATCH";
    delete => delete, "DELETE";
    head => head, "HEAD";
    options => options, "OPTIONS";
    trace => trace, "TRACE";
}
