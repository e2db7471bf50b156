//! Operation options.
//!
//! An [`OperationOption`] is one step applied to the [`OperationInfo`] of a
//! route before it is registered. Options run in the order given. Scalar
//! fields are last-write-wins; responses, headers, security requirements and
//! code samples accumulate.
//!
//! ```
//! use routedoc::options;
//! use routedoc_docs::OperationInfo;
//!
//! let mut info = OperationInfo::default();
//! for option in [options::summary("first"), options::summary("second")] {
//!     option.apply(&mut info);
//! }
//! assert_eq!(info.summary.as_deref(), Some("second"));
//! ```

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use routedoc_core::TypeInfo;
use routedoc_docs::{CodeSample, OperationInfo, OperationResponse, ResponseHeader, SecurityRequirement};
use schemars::JsonSchema;
use serde_json::Value;

/// A reusable mutation of an [`OperationInfo`].
#[derive(Clone)]
pub struct OperationOption(Arc<dyn Fn(&mut OperationInfo) + Send + Sync>);

impl OperationOption {
    /// Wraps a custom mutation.
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&mut OperationInfo) + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    /// Applies the option to `info`.
    pub fn apply(&self, info: &mut OperationInfo) {
        (self.0)(info);
    }
}

impl fmt::Debug for OperationOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("OperationOption")
    }
}

/// Builds the [`OperationInfo`] described by `options`.
#[must_use]
pub fn collect(options: &[OperationOption]) -> OperationInfo {
    let mut info = OperationInfo::default();
    for option in options {
        option.apply(&mut info);
    }
    info
}

/// Sets the summary.
pub fn summary(summary: impl Into<String>) -> OperationOption {
    let summary = summary.into();
    OperationOption::new(move |info| info.summary = Some(summary.clone()))
}

/// Sets the description.
pub fn description(description: impl Into<String>) -> OperationOption {
    let description = description.into();
    OperationOption::new(move |info| info.description = Some(description.clone()))
}

/// Marks the operation as deprecated, or not.
pub fn deprecated(deprecated: bool) -> OperationOption {
    OperationOption::new(move |info| info.deprecated = deprecated)
}

/// Overrides the operation id.
pub fn id(id: impl Into<String>) -> OperationOption {
    let id = id.into();
    OperationOption::new(move |info| info.id = Some(id.clone()))
}

/// Sets the description of the default response.
pub fn status_description(description: impl Into<String>) -> OperationOption {
    let description = description.into();
    OperationOption::new(move |info| info.status_description = Some(description.clone()))
}

/// Adds a response.
///
/// `code` is a status code such as `"404"`, a range such as `"5XX"`, or
/// `"default"`. Declaring the same code twice is rejected at registration.
pub fn response(
    code: impl Into<String>,
    description: impl Into<String>,
    model: Option<TypeInfo>,
    headers: Vec<ResponseHeader>,
    example: Option<Value>,
) -> OperationOption {
    let response = OperationResponse {
        model,
        headers,
        example,
        ..OperationResponse::new(code, description)
    };
    OperationOption::new(move |info| info.responses.push(response.clone()))
}

/// Adds a response with named examples.
pub fn response_with_examples<K, I>(
    code: impl Into<String>,
    description: impl Into<String>,
    model: Option<TypeInfo>,
    headers: Vec<ResponseHeader>,
    examples: I,
) -> OperationOption
where
    K: Into<String>,
    I: IntoIterator<Item = (K, Value)>,
{
    let examples: IndexMap<String, Value> = examples
        .into_iter()
        .map(|(name, value)| (name.into(), value))
        .collect();
    let response = OperationResponse {
        model,
        headers,
        examples,
        ..OperationResponse::new(code, description)
    };
    OperationOption::new(move |info| info.responses.push(response.clone()))
}

/// Adds a header to the default response. Untyped headers are strings.
pub fn header(
    name: impl Into<String>,
    description: impl Into<String>,
    model: Option<TypeInfo>,
) -> OperationOption {
    let header = ResponseHeader {
        model,
        ..ResponseHeader::new(name, description)
    };
    OperationOption::new(move |info| info.headers.push(header.clone()))
}

/// Documents `T` as the request input instead of the handler's own type.
pub fn input_model<T: JsonSchema + 'static>() -> OperationOption {
    OperationOption::new(|info| info.input_model = Some(TypeInfo::of::<T>()))
}

/// Adds a security requirement.
pub fn security(requirement: SecurityRequirement) -> OperationOption {
    OperationOption::new(move |info| {
        info.security
            .get_or_insert_with(Vec::new)
            .push(requirement.clone());
    })
}

/// Opts the operation out of document-wide security.
pub fn without_security() -> OperationOption {
    OperationOption::new(|info| info.security = Some(Vec::new()))
}

/// Adds a request sample.
pub fn code_sample(
    lang: impl Into<String>,
    label: Option<String>,
    source: impl Into<String>,
) -> OperationOption {
    let sample = CodeSample {
        lang: lang.into(),
        label,
        source: source.into(),
    };
    OperationOption::new(move |info| info.code_samples.push(sample.clone()))
}
