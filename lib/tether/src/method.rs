//! Declaring a method and calling it.
//!
//! [`MethodBuilder`] pairs the HTTP method and URI template of a declared
//! method with its argument annotations. Once built, the resulting
//! [`RequestDefinition`] turns call arguments into a [`Request`].
//!
//! # Example
//!
//! ```
//! use serde_json::{Map, json};
//! use tether::{Method, MethodBuilder, Query, RequestConfig, Signature};
//!
//! let mut method = MethodBuilder::new(
//!     Method::GET,
//!     Some("users/{user}/todos"),
//!     Signature::method("list_todos", ["self", "user", "status"]),
//! );
//! method.add_annotation(Query::new("status"), Some("status")).expect("annotated");
//! let definition = method.build().expect("definition");
//!
//! let config = RequestConfig::builder()
//!     .base_url(url::Url::parse("https://api.example.com/").expect("url"))
//!     .build();
//! let request = definition
//!     .make_request(&config, vec![json!("alice"), json!("open")], Map::new())
//!     .expect("request");
//! assert_eq!(
//!     request.url().as_str(),
//!     "https://api.example.com/users/alice/todos?status=open"
//! );
//! ```

use std::sync::Arc;

use serde_json::{Map, Value};
use tether_core::{
    ContentType, Method, PendingRequest, Request, RequestBuilder, Result, UriDefinition,
    UriTemplate,
};
use tracing::debug;

use crate::annotation::{Annotation, AnnotationSet, AnnotationSpec};
use crate::{ArgumentHandler, ArgumentHandlerBuilder, RequestConfig, Signature};

// ============================================================================
// Method Builder
// ============================================================================

/// A method being declared.
#[derive(Debug)]
pub struct MethodBuilder {
    method: Method,
    uri: UriDefinition,
    arguments: ArgumentHandlerBuilder,
    content_type: Option<ContentType>,
}

impl MethodBuilder {
    /// Declare a method.
    ///
    /// Without a URI template, the URI must come from a [`Url`](crate::Url)
    /// argument.
    #[must_use]
    pub fn new(method: Method, uri: Option<&str>, signature: Signature) -> Self {
        Self {
            method,
            uri: UriDefinition::new(signature.name(), uri),
            arguments: ArgumentHandlerBuilder::new(signature),
            content_type: None,
        }
    }

    /// Encode mapping-shaped bodies with `content_type`.
    pub const fn content_type(&mut self, content_type: ContentType) -> &mut Self {
        self.content_type = Some(content_type);
        self
    }

    /// Argument annotations registered so far.
    #[must_use]
    pub const fn arguments(&self) -> &ArgumentHandlerBuilder {
        &self.arguments
    }

    /// URI part of the declaration.
    #[must_use]
    pub const fn uri(&self) -> &UriDefinition {
        &self.uri
    }

    /// Register one annotation, see [`ArgumentHandlerBuilder::add_annotation`].
    ///
    /// # Errors
    ///
    /// Returns the registration error.
    pub fn add_annotation(
        &mut self,
        annotation: impl Into<AnnotationSpec>,
        name: Option<&str>,
    ) -> Result<&dyn Annotation> {
        self.arguments.add_annotation(&mut self.uri, annotation, name)
    }

    /// Register annotations in bulk, see [`ArgumentHandlerBuilder::set_annotations`].
    ///
    /// # Errors
    ///
    /// Returns the first registration error.
    pub fn set_annotations(&mut self, annotations: AnnotationSet) -> Result<&mut Self> {
        self.arguments.set_annotations(&mut self.uri, annotations)?;
        Ok(self)
    }

    /// Finish the declaration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingArgumentAnnotations`](crate::Error::MissingArgumentAnnotations)
    /// if an argument has no annotation, or
    /// [`Error::MissingUriVariables`](crate::Error::MissingUriVariables) if a
    /// URI template variable has no argument.
    pub fn build(self) -> Result<RequestDefinition> {
        let Self {
            method,
            mut uri,
            arguments,
            content_type,
        } = self;

        let handler = arguments.build(&mut uri)?;
        let template = uri.build()?;
        debug!(
            method = handler.signature().name(),
            http_method = %method,
            uri = template.as_ref().map_or("", UriTemplate::as_str),
            "request definition built"
        );

        Ok(RequestDefinition {
            method,
            template,
            handler: Arc::new(handler),
            content_type,
        })
    }
}

// ============================================================================
// Request Definition
// ============================================================================

/// A declared method, ready to be called.
#[derive(Debug, Clone)]
pub struct RequestDefinition {
    method: Method,
    template: Option<UriTemplate>,
    handler: Arc<ArgumentHandler>,
    content_type: Option<ContentType>,
}

impl RequestDefinition {
    /// HTTP method.
    #[must_use]
    pub const fn method(&self) -> &Method {
        &self.method
    }

    /// URI template, absent when the URI is an argument.
    #[must_use]
    pub const fn template(&self) -> Option<&UriTemplate> {
        self.template.as_ref()
    }

    /// Argument annotations.
    #[must_use]
    pub fn handler(&self) -> &ArgumentHandler {
        &self.handler
    }

    /// Apply call arguments to a new request, leaving it open for changes.
    ///
    /// # Errors
    ///
    /// Returns the first binding, conversion, or application error.
    pub fn define_request(
        &self,
        config: &RequestConfig,
        positional: Vec<Value>,
        keyword: Map<String, Value>,
    ) -> Result<PendingRequest> {
        let template = self
            .template
            .clone()
            .unwrap_or_else(|| UriTemplate::new(""));
        let mut request = PendingRequest::new(self.method.clone(), template)
            .with_converters(Arc::clone(&config.converters))
            .with_content_type(self.content_type.unwrap_or(config.content_type));

        let headers = request.headers_mut();
        for (name, value) in &config.headers {
            headers.insert(name.clone(), Value::String(value.clone()));
        }

        self.handler.handle_call(&mut request, positional, keyword)?;
        Ok(request)
    }

    /// Apply call arguments and assemble the request.
    ///
    /// # Errors
    ///
    /// Returns the first call error, or an assembly error for an invalid URL
    /// or header or an unencodable body.
    pub fn make_request(
        &self,
        config: &RequestConfig,
        positional: Vec<Value>,
        keyword: Map<String, Value>,
    ) -> Result<Request> {
        self.define_request(config, positional, keyword)?
            .finish(config.base_url.as_ref())
    }
}
