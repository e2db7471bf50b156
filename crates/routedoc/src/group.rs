//! Documented route groups.
//!
//! A [`Group`] pairs a [`RouterGroup`] with the tags every operation
//! registered through it is filed under. Children inherit their parent's
//! tags; a tag added to a child is invisible to the parent and siblings.

use std::sync::Arc;

use http::Method;
use parking_lot::RwLock;
use routedoc_core::BoxedHandler;
use routedoc_docs::{Document, Operation, Tag};
use routedoc_server::RouterGroup;

use crate::assembler;
use crate::error::{RegistrationError, RegistrationResult};
use crate::options::OperationOption;

/// The document shared by an [`ApiDoc`](crate::ApiDoc) and all its groups.
pub type SharedDocument = Arc<RwLock<Document>>;

/// A path prefix with inherited middleware and documentation tags.
#[derive(Clone, Debug)]
pub struct Group {
    router: RouterGroup,
    tags: Arc<[Tag]>,
    document: SharedDocument,
}

macro_rules! verb {
    ($(#[$doc:meta] $name:ident => $method:ident),* $(,)?) => {
        $(
            #[$doc]
            ///
            /// # Panics
            ///
            /// Panics if the route cannot be registered; see [`Group::handle`].
            pub fn $name(
                &self,
                path: &str,
                options: &[OperationOption],
                handlers: Vec<BoxedHandler>,
            ) -> &Self {
                self.handle(Method::$method, path, options, handlers)
            }
        )*
    };
}

impl Group {
    pub(crate) fn new(router: RouterGroup, document: SharedDocument) -> Self {
        Self {
            router,
            tags: Arc::from(Vec::new()),
            document,
        }
    }

    /// The group's absolute base path.
    #[must_use]
    pub fn base_path(&self) -> &str {
        self.router.base_path()
    }

    /// Tags inherited by operations of this group, outermost first.
    #[must_use]
    pub fn tags(&self) -> &[Tag] {
        &self.tags
    }

    /// The underlying router group.
    #[must_use]
    pub fn router(&self) -> &RouterGroup {
        &self.router
    }

    /// Creates a child group at `path`.
    ///
    /// A `tag` is registered in the document (once per name) and appended
    /// to the tags the child inherits.
    #[must_use]
    pub fn group(&self, path: &str, tag: Option<Tag>) -> Group {
        let tags = match tag {
            Some(tag) => {
                let mut tags = self.tags.to_vec();
                if !tags.iter().any(|t| t.name == tag.name) {
                    tags.push(tag.clone());
                }
                self.document.write().register_tag(tag);
                Arc::from(tags)
            }
            None => Arc::clone(&self.tags),
        };

        Group {
            router: self.router.group(path, Vec::new()),
            tags,
            document: Arc::clone(&self.document),
        }
    }

    /// Appends middleware for routes registered on this group afterwards.
    pub fn use_middleware(&mut self, handlers: impl IntoIterator<Item = BoxedHandler>) -> &mut Self {
        self.router.use_middleware(handlers);
        self
    }

    /// Registers `handlers` for `method path`, documenting the route from
    /// its typed handler and `options`.
    ///
    /// # Errors
    ///
    /// Returns [`RegistrationError`] when the chain holds more than one typed
    /// handler, when the document rejects the operation, or when the router
    /// rejects the path.
    pub fn try_handle(
        &self,
        method: Method,
        path: &str,
        options: &[OperationOption],
        handlers: Vec<BoxedHandler>,
    ) -> RegistrationResult<&Self> {
        self.register(method, path, options, handlers)?;
        Ok(self)
    }

    /// Like [`try_handle`](Self::try_handle), returning the documented
    /// operation if one was produced.
    ///
    /// # Errors
    ///
    /// See [`try_handle`](Self::try_handle).
    pub fn register(
        &self,
        method: Method,
        path: &str,
        options: &[OperationOption],
        handlers: Vec<BoxedHandler>,
    ) -> RegistrationResult<Option<Arc<Operation>>> {
        let resolved = self.router.calculate_absolute_path(path);
        let tags: Vec<String> = self.tags.iter().map(|t| t.name.clone()).collect();

        let assembled =
            assembler::assemble(&self.document, &method, &resolved, &tags, options, handlers)?;

        self.router
            .handle(method.clone(), path, assembled.handlers)
            .map_err(|source| RegistrationError::Route {
                method,
                path: resolved,
                source,
            })?;
        Ok(assembled.operation)
    }

    /// Registers `handlers` for `method path`.
    ///
    /// # Panics
    ///
    /// Panics with the [`RegistrationError`] message if the route cannot be
    /// registered. A misconfigured route table must not start serving.
    pub fn handle(
        &self,
        method: Method,
        path: &str,
        options: &[OperationOption],
        handlers: Vec<BoxedHandler>,
    ) -> &Self {
        match self.try_handle(method, path, options, handlers) {
            Ok(group) => group,
            Err(e) => panic!("{e}"),
        }
    }

    verb! {
        /// Registers a GET route.
        get => GET,
        /// Registers a POST route.
        post => POST,
        /// Registers a PUT route.
        put => PUT,
        /// Registers a PATCH route.
        patch => PATCH,
        /// Registers a DELETE route.
        delete => DELETE,
        /// Registers an OPTIONS route.
        options => OPTIONS,
        /// Registers a HEAD route.
        head => HEAD,
        /// Registers a TRACE route.
        trace => TRACE,
    }
}
