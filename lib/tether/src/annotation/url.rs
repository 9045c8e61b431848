//! Dynamic request URL.

use serde_json::Value;
use tether_core::{
    ConverterKey, Error, ParamLocation, RequestBuilder, RequestDefinitionBuilder, Result,
    stringify,
};

use super::Annotation;

/// Provides the whole request URL at call time.
///
/// Only valid on methods declared without a URI template.
#[derive(Debug, Clone, Copy, Default)]
pub struct Url;

impl Annotation for Url {
    fn kind(&self) -> &'static str {
        "Url"
    }

    fn location(&self) -> ParamLocation {
        ParamLocation::Url
    }

    fn converter_key(&self) -> ConverterKey {
        ConverterKey::ToString
    }

    fn on_define(&self, definition: &mut dyn RequestDefinitionBuilder) -> Result<()> {
        definition
            .set_dynamic_uri()
            .map_err(|_| Error::DynamicUrlAssignmentFailed {
                method: definition.method_name().to_string(),
            })
    }

    fn on_apply(&self, request: &mut dyn RequestBuilder, value: Value) -> Result<()> {
        if value.is_null() {
            return Err(Error::conversion("`Url` argument is null"));
        }
        request.set_uri(&stringify(&value))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use tether_core::{Method, PendingRequest, UriDefinition, UriTemplate};

    use super::*;

    #[test]
    fn static_uri_rejects_dynamic_url() {
        let mut definition = UriDefinition::new("get_todo", Some("todos/{id}"));
        let err = Url.on_define(&mut definition).expect_err("static uri");
        assert_eq!(
            err.to_string(),
            "Failed to set dynamic url annotation on `get_todo`."
        );

        let mut definition = UriDefinition::new("fetch", None);
        Url.on_define(&mut definition).expect("dynamic");
        assert!(definition.is_dynamic());
    }

    #[test]
    fn url_replaces_uri() {
        let mut request = PendingRequest::new(Method::GET, UriTemplate::new(""));
        Url.on_apply(&mut request, json!("https://example.com/a"))
            .expect("applied");
        assert_eq!(request.uri(), "https://example.com/a");
    }

    #[test]
    fn null_url_is_rejected() {
        let mut request = PendingRequest::new(Method::GET, UriTemplate::new(""));
        let err = Url.on_apply(&mut request, Value::Null).expect_err("null url");
        assert!(matches!(err, Error::Conversion(_)));
        assert_eq!(request.uri(), "");
    }
}
