//! Call-time request configuration.

use std::sync::Arc;

use tether_core::{ContentType, ConverterRegistry};

/// Settings shared by every request a [`RequestDefinition`](crate::RequestDefinition) makes.
#[derive(Debug, Clone)]
pub struct RequestConfig {
    /// Base URL that relative URIs resolve against.
    pub base_url: Option<url::Url>,
    /// Encoding of mapping-shaped bodies when the method declares none.
    pub content_type: ContentType,
    /// Headers sent with every request; argument headers override them.
    pub headers: Vec<(String, String)>,
    /// Converters used to turn argument values into wire values.
    pub converters: Arc<ConverterRegistry>,
}

impl Default for RequestConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            content_type: ContentType::FormUrlEncoded,
            headers: Vec::new(),
            converters: Arc::new(ConverterRegistry::new()),
        }
    }
}

impl RequestConfig {
    /// Create a new configuration builder.
    #[must_use]
    pub fn builder() -> RequestConfigBuilder {
        RequestConfigBuilder::default()
    }
}

/// Builder for [`RequestConfig`].
#[derive(Debug, Clone, Default)]
pub struct RequestConfigBuilder {
    base_url: Option<url::Url>,
    content_type: Option<ContentType>,
    headers: Vec<(String, String)>,
    converters: Option<Arc<ConverterRegistry>>,
}

impl RequestConfigBuilder {
    /// Set the base URL.
    #[must_use]
    pub fn base_url(mut self, base_url: url::Url) -> Self {
        self.base_url = Some(base_url);
        self
    }

    /// Set the default body encoding.
    #[must_use]
    pub const fn content_type(mut self, content_type: ContentType) -> Self {
        self.content_type = Some(content_type);
        self
    }

    /// Add a header sent with every request.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Set the converter registry.
    #[must_use]
    pub fn converters(mut self, converters: ConverterRegistry) -> Self {
        self.converters = Some(Arc::new(converters));
        self
    }

    /// Build the configuration.
    #[must_use]
    pub fn build(self) -> RequestConfig {
        let defaults = RequestConfig::default();
        RequestConfig {
            base_url: self.base_url.or(defaults.base_url),
            content_type: self.content_type.unwrap_or(defaults.content_type),
            headers: self.headers,
            converters: self.converters.unwrap_or(defaults.converters),
        }
    }
}
