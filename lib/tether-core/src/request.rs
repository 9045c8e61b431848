//! Call-time request construction.
//!
//! Annotations write into a request in progress through the [`RequestBuilder`]
//! trait. [`PendingRequest`] is the default implementation; once every
//! argument has been applied it is assembled into a [`Request`].
//!
//! # Example
//!
//! ```
//! use serde_json::json;
//! use tether_core::{PendingRequest, RequestBuilder, UriTemplate};
//!
//! let mut pending = PendingRequest::new(http::Method::GET, UriTemplate::new("/users/{id}"));
//! pending.set_uri_variable("id", json!("7")).expect("variable");
//! pending.query_params_mut().insert("page".to_string(), json!("2"));
//!
//! let base = url::Url::parse("https://api.example.com").expect("base");
//! let request = pending.finish(Some(&base)).expect("request");
//! assert_eq!(request.url().as_str(), "https://api.example.com/users/7?page=2");
//! ```

use std::sync::Arc;

use bytes::Bytes;
use http::{HeaderMap, HeaderName, HeaderValue, Method, header};
use serde_json::{Map, Value};

use crate::{
    ContentType, Converter, ConverterKey, ConverterRegistry, Error, Form, Result, UriTemplate,
    ValueType, stringify,
};

// ============================================================================
// Request Builder Trait
// ============================================================================

/// A request under construction, as seen by argument annotations.
///
/// One instance belongs to one in-flight call; it is never shared.
pub trait RequestBuilder {
    /// Substitute a URI template variable.
    fn set_uri_variable(&mut self, name: &str, value: Value) -> Result<()>;

    /// Replace the URI wholesale.
    fn set_uri(&mut self, uri: &str) -> Result<()>;

    /// Returns `true` if `name` is a template variable without a value yet.
    fn is_uri_variable_unresolved(&self, name: &str) -> bool;

    /// Query parameters.
    fn query_params_mut(&mut self) -> &mut Map<String, Value>;

    /// Header values.
    fn headers_mut(&mut self) -> &mut Map<String, Value>;

    /// Body storage: a mapping of fields, or any value once replaced.
    fn body_mut(&mut self) -> &mut Value;

    /// Replace the body storage wholesale.
    ///
    /// Unlike writes through [`body_mut`](Self::body_mut), a replaced body is
    /// always sent, even when it is an empty mapping.
    fn set_body(&mut self, value: Value) -> Result<()> {
        *self.body_mut() = value;
        Ok(())
    }

    /// Multipart parts.
    fn files_mut(&mut self) -> &mut Map<String, Value>;

    /// Resolve the converter for a key and an optional declared type.
    fn converter(
        &self,
        key: &ConverterKey,
        value_type: Option<&ValueType>,
    ) -> Result<Arc<dyn Converter>>;
}

// ============================================================================
// Pending Request
// ============================================================================

/// Default [`RequestBuilder`]: plain mappings plus a URI template.
#[derive(Debug, Clone)]
pub struct PendingRequest {
    method: Method,
    uri: UriTemplate,
    uri_values: Map<String, Value>,
    query: Map<String, Value>,
    headers: Map<String, Value>,
    body: Value,
    body_replaced: bool,
    files: Map<String, Value>,
    content_type: ContentType,
    converters: Arc<ConverterRegistry>,
}

impl PendingRequest {
    /// Start a request with the standard converters and a form body.
    #[must_use]
    pub fn new(method: Method, uri: UriTemplate) -> Self {
        Self {
            method,
            uri,
            uri_values: Map::new(),
            query: Map::new(),
            headers: Map::new(),
            body: Value::Object(Map::new()),
            body_replaced: false,
            files: Map::new(),
            content_type: ContentType::default(),
            converters: Arc::new(ConverterRegistry::new()),
        }
    }

    /// Use the given converter registry.
    #[must_use]
    pub fn with_converters(mut self, converters: Arc<ConverterRegistry>) -> Self {
        self.converters = converters;
        self
    }

    /// Encode mapping-shaped bodies with the given content type.
    #[must_use]
    pub const fn with_content_type(mut self, content_type: ContentType) -> Self {
        self.content_type = content_type;
        self
    }

    /// HTTP method.
    #[must_use]
    pub const fn method(&self) -> &Method {
        &self.method
    }

    /// The URI as it would expand now.
    #[must_use]
    pub fn uri(&self) -> String {
        self.uri.expand(&self.uri_values)
    }

    /// Query parameters.
    #[must_use]
    pub const fn query_params(&self) -> &Map<String, Value> {
        &self.query
    }

    /// Header values.
    #[must_use]
    pub const fn headers(&self) -> &Map<String, Value> {
        &self.headers
    }

    /// Body storage.
    #[must_use]
    pub const fn body(&self) -> &Value {
        &self.body
    }

    /// Multipart parts.
    #[must_use]
    pub const fn files(&self) -> &Map<String, Value> {
        &self.files
    }

    /// Assemble the final request.
    ///
    /// A relative URI is resolved against `base_url`. `null` query, header and
    /// field values are left out. The body is:
    /// - `multipart/form-data` when parts were set and the body is still a
    ///   mapping (its fields become text parts);
    /// - nothing when no field was set and the body was never replaced;
    /// - otherwise the body encoded with the configured [`ContentType`].
    ///
    /// A replaced mapping body keeps its `null` entries under JSON.
    /// Parts are dropped when the body was replaced by a non-mapping value.
    pub fn finish(self, base_url: Option<&url::Url>) -> Result<Request> {
        let target = self.uri();
        let mut url = match base_url {
            Some(base) => base.join(&target)?,
            None => url::Url::parse(&target)?,
        };

        let pairs = query_pairs(&self.query);
        if !pairs.is_empty() {
            let mut query = url.query_pairs_mut();
            for (name, value) in &pairs {
                query.append_pair(name, value);
            }
        }

        let mut headers = HeaderMap::new();
        for (name, value) in &self.headers {
            if value.is_null() {
                continue;
            }
            let header_name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| Error::invalid_header(format!("{name}: {e}")))?;
            let header_value = HeaderValue::from_str(&stringify(value))
                .map_err(|e| Error::invalid_header(format!("{name}: {e}")))?;
            headers.insert(header_name, header_value);
        }

        let body = match &self.body {
            Value::Object(fields) => {
                let present: Map<String, Value> = fields
                    .iter()
                    .filter(|(_, value)| !value.is_null())
                    .map(|(name, value)| (name.clone(), value.clone()))
                    .collect();
                if !self.files.is_empty() {
                    let (content_type, body) = Form::new()
                        .entries(&present)?
                        .entries(&self.files)?
                        .into_body();
                    Some((content_type, body))
                } else if present.is_empty() && !self.body_replaced {
                    None
                } else if self.body_replaced && self.content_type == ContentType::Json {
                    Some((
                        self.content_type.as_str().to_string(),
                        self.content_type.encode(&self.body)?,
                    ))
                } else {
                    Some((
                        self.content_type.as_str().to_string(),
                        self.content_type.encode(&Value::Object(present))?,
                    ))
                }
            }
            body => Some((
                self.content_type.as_str().to_string(),
                self.content_type.encode(body)?,
            )),
        };

        let body = match body {
            Some((content_type, body)) => {
                if !headers.contains_key(header::CONTENT_TYPE) {
                    let value = HeaderValue::from_str(&content_type)
                        .map_err(|e| Error::invalid_header(e.to_string()))?;
                    headers.insert(header::CONTENT_TYPE, value);
                }
                Some(body)
            }
            None => None,
        };

        Ok(Request {
            method: self.method,
            url,
            headers,
            body,
        })
    }
}

fn query_pairs(query: &Map<String, Value>) -> Vec<(&str, String)> {
    let mut pairs = Vec::new();
    for (name, value) in query {
        match value {
            Value::Null => {}
            Value::Array(items) => pairs.extend(
                items
                    .iter()
                    .filter(|item| !item.is_null())
                    .map(|item| (name.as_str(), stringify(item))),
            ),
            value => pairs.push((name.as_str(), stringify(value))),
        }
    }
    pairs
}

impl RequestBuilder for PendingRequest {
    fn set_uri_variable(&mut self, name: &str, value: Value) -> Result<()> {
        self.uri_values.insert(name.to_string(), value);
        Ok(())
    }

    fn set_uri(&mut self, uri: &str) -> Result<()> {
        self.uri = UriTemplate::new(uri);
        Ok(())
    }

    fn is_uri_variable_unresolved(&self, name: &str) -> bool {
        self.uri.has_variable(name) && !self.uri_values.contains_key(name)
    }

    fn query_params_mut(&mut self) -> &mut Map<String, Value> {
        &mut self.query
    }

    fn headers_mut(&mut self) -> &mut Map<String, Value> {
        &mut self.headers
    }

    fn body_mut(&mut self) -> &mut Value {
        &mut self.body
    }

    fn set_body(&mut self, value: Value) -> Result<()> {
        self.body = value;
        self.body_replaced = true;
        Ok(())
    }

    fn files_mut(&mut self) -> &mut Map<String, Value> {
        &mut self.files
    }

    fn converter(
        &self,
        key: &ConverterKey,
        value_type: Option<&ValueType>,
    ) -> Result<Arc<dyn Converter>> {
        self.converters.resolve(key, value_type)
    }
}

// ============================================================================
// Request
// ============================================================================

/// An assembled HTTP request with method, URL, headers, and optional body.
#[derive(Debug, Clone)]
pub struct Request {
    method: Method,
    url: url::Url,
    headers: HeaderMap,
    body: Option<Bytes>,
}

impl Request {
    /// HTTP method.
    #[must_use]
    pub const fn method(&self) -> &Method {
        &self.method
    }

    /// Request URL.
    #[must_use]
    pub const fn url(&self) -> &url::Url {
        &self.url
    }

    /// Request headers.
    #[must_use]
    pub const fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Single header value by name.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|value| value.to_str().ok())
    }

    /// Request body.
    #[must_use]
    pub const fn body(&self) -> Option<&Bytes> {
        self.body.as_ref()
    }

    /// Consume into (method, url, headers, body).
    #[must_use]
    pub fn into_parts(self) -> (Method, url::Url, HeaderMap, Option<Bytes>) {
        (self.method, self.url, self.headers, self.body)
    }
}
