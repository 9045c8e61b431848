//! Annotations that take a whole mapping, or the whole body.

use serde_json::Value;
use tether_core::{ConverterKey, Error, ParamLocation, RequestBuilder, Result, ValueType};

use super::{Annotation, merge_into};

// ============================================================================
// QueryMap
// ============================================================================

/// Merges a mapping of query parameters.
#[derive(Debug, Clone, Default)]
pub struct QueryMap {
    value_type: Option<ValueType>,
}

impl QueryMap {
    /// Declare the argument's value type.
    #[must_use]
    pub const fn with_type(value_type: ValueType) -> Self {
        Self {
            value_type: Some(value_type),
        }
    }
}

impl Annotation for QueryMap {
    fn kind(&self) -> &'static str {
        "QueryMap"
    }

    fn location(&self) -> ParamLocation {
        ParamLocation::Query
    }

    fn converter_key(&self) -> ConverterKey {
        ConverterKey::map(ConverterKey::sequence(ConverterKey::ToString))
    }

    fn value_type(&self) -> Option<&ValueType> {
        self.value_type.as_ref()
    }

    fn on_apply(&self, request: &mut dyn RequestBuilder, value: Value) -> Result<()> {
        merge_into(request.query_params_mut(), value, self.kind())
    }
}

// ============================================================================
// HeaderMap
// ============================================================================

/// Merges a mapping of headers.
#[derive(Debug, Clone, Default)]
pub struct HeaderMap {
    value_type: Option<ValueType>,
}

impl HeaderMap {
    /// Declare the argument's value type.
    #[must_use]
    pub const fn with_type(value_type: ValueType) -> Self {
        Self {
            value_type: Some(value_type),
        }
    }
}

impl Annotation for HeaderMap {
    fn kind(&self) -> &'static str {
        "HeaderMap"
    }

    fn location(&self) -> ParamLocation {
        ParamLocation::Header
    }

    fn converter_key(&self) -> ConverterKey {
        ConverterKey::map(ConverterKey::ToString)
    }

    fn value_type(&self) -> Option<&ValueType> {
        self.value_type.as_ref()
    }

    fn on_apply(&self, request: &mut dyn RequestBuilder, value: Value) -> Result<()> {
        merge_into(request.headers_mut(), value, self.kind())
    }
}

// ============================================================================
// FieldMap
// ============================================================================

/// Merges a mapping of fields into a form-encoded body.
///
/// Fails if another argument replaced the body with something that is not
/// a mapping.
#[derive(Debug, Clone, Default)]
pub struct FieldMap {
    value_type: Option<ValueType>,
}

impl FieldMap {
    /// Declare the argument's value type.
    #[must_use]
    pub const fn with_type(value_type: ValueType) -> Self {
        Self {
            value_type: Some(value_type),
        }
    }
}

impl Annotation for FieldMap {
    fn kind(&self) -> &'static str {
        "FieldMap"
    }

    fn location(&self) -> ParamLocation {
        ParamLocation::Form
    }

    fn converter_key(&self) -> ConverterKey {
        ConverterKey::map(ConverterKey::ToString)
    }

    fn value_type(&self) -> Option<&ValueType> {
        self.value_type.as_ref()
    }

    fn on_apply(&self, request: &mut dyn RequestBuilder, value: Value) -> Result<()> {
        let Value::Object(fields) = request.body_mut() else {
            return Err(Error::FieldMapUpdateFailed);
        };
        merge_into(fields, value, self.kind())
    }
}

// ============================================================================
// PartMap
// ============================================================================

/// Merges a mapping of multipart parts.
#[derive(Debug, Clone, Default)]
pub struct PartMap {
    value_type: Option<ValueType>,
}

impl PartMap {
    /// Declare the argument's value type.
    #[must_use]
    pub const fn with_type(value_type: ValueType) -> Self {
        Self {
            value_type: Some(value_type),
        }
    }
}

impl Annotation for PartMap {
    fn kind(&self) -> &'static str {
        "PartMap"
    }

    fn location(&self) -> ParamLocation {
        ParamLocation::Multipart
    }

    fn converter_key(&self) -> ConverterKey {
        ConverterKey::map(ConverterKey::ToRequestBody)
    }

    fn value_type(&self) -> Option<&ValueType> {
        self.value_type.as_ref()
    }

    fn on_apply(&self, request: &mut dyn RequestBuilder, value: Value) -> Result<()> {
        merge_into(request.files_mut(), value, self.kind())
    }
}

// ============================================================================
// Body
// ============================================================================

/// Replaces the request body with the argument value.
///
/// Fields written before are discarded. Parts are kept.
#[derive(Debug, Clone, Default)]
pub struct Body {
    value_type: Option<ValueType>,
}

impl Body {
    /// Declare the argument's value type.
    #[must_use]
    pub const fn with_type(value_type: ValueType) -> Self {
        Self {
            value_type: Some(value_type),
        }
    }
}

impl Annotation for Body {
    fn kind(&self) -> &'static str {
        "Body"
    }

    fn location(&self) -> ParamLocation {
        ParamLocation::Body
    }

    fn converter_key(&self) -> ConverterKey {
        ConverterKey::ToRequestBody
    }

    fn value_type(&self) -> Option<&ValueType> {
        self.value_type.as_ref()
    }

    fn on_apply(&self, request: &mut dyn RequestBuilder, value: Value) -> Result<()> {
        request.set_body(value)
    }
}
