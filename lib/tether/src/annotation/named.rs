//! Annotations that target one named entry of the request.
//!
//! The name defaults to the argument name when left unset at declaration.

use serde_json::Value;
use tether_core::{
    ConverterKey, Error, ParamLocation, RequestBuilder, RequestDefinitionBuilder, Result,
    ValueType,
};

use super::{Annotation, ArgumentName};

// ============================================================================
// Path
// ============================================================================

/// Substitutes a URI template variable.
///
/// ```
/// use tether::{Method, MethodBuilder, Path, Signature};
///
/// let mut method = MethodBuilder::new(
///     Method::GET,
///     Some("todos{/id}"),
///     Signature::method("get_todo", ["self", "todo_id"]),
/// );
/// method.add_annotation(Path::new("id"), None).expect("annotated");
/// assert!(method.build().is_ok());
/// ```
#[derive(Debug, Clone, Default)]
pub struct Path {
    name: ArgumentName,
    value_type: Option<ValueType>,
}

impl Path {
    /// Bind to the template variable `name`.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: ArgumentName::new(name),
            value_type: None,
        }
    }

    /// Declare the argument's value type.
    #[must_use]
    pub const fn with_type(mut self, value_type: ValueType) -> Self {
        self.value_type = Some(value_type);
        self
    }
}

impl Annotation for Path {
    fn kind(&self) -> &'static str {
        "Path"
    }

    fn location(&self) -> ParamLocation {
        ParamLocation::Path
    }

    fn converter_key(&self) -> ConverterKey {
        ConverterKey::ToString
    }

    fn value_type(&self) -> Option<&ValueType> {
        self.value_type.as_ref()
    }

    fn name(&self) -> Option<&str> {
        self.name.get()
    }

    fn name_mut(&mut self) -> Option<&mut ArgumentName> {
        Some(&mut self.name)
    }

    fn on_define(&self, definition: &mut dyn RequestDefinitionBuilder) -> Result<()> {
        definition.add_uri_variable(self.name.require(self.kind())?)
    }

    fn on_apply(&self, request: &mut dyn RequestBuilder, value: Value) -> Result<()> {
        request.set_uri_variable(self.name.require(self.kind())?, value)
    }
}

// ============================================================================
// Query
// ============================================================================

/// Sets one query parameter.
///
/// Sequence values repeat the parameter once per element.
#[derive(Debug, Clone, Default)]
pub struct Query {
    name: ArgumentName,
    value_type: Option<ValueType>,
}

impl Query {
    /// Bind to the query parameter `name`.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: ArgumentName::new(name),
            value_type: None,
        }
    }

    /// Declare the argument's value type.
    #[must_use]
    pub const fn with_type(mut self, value_type: ValueType) -> Self {
        self.value_type = Some(value_type);
        self
    }
}

impl Annotation for Query {
    fn kind(&self) -> &'static str {
        "Query"
    }

    fn location(&self) -> ParamLocation {
        ParamLocation::Query
    }

    fn converter_key(&self) -> ConverterKey {
        ConverterKey::sequence(ConverterKey::ToString)
    }

    fn value_type(&self) -> Option<&ValueType> {
        self.value_type.as_ref()
    }

    fn name(&self) -> Option<&str> {
        self.name.get()
    }

    fn name_mut(&mut self) -> Option<&mut ArgumentName> {
        Some(&mut self.name)
    }

    fn on_apply(&self, request: &mut dyn RequestBuilder, value: Value) -> Result<()> {
        let name = self.name.require(self.kind())?;
        request.query_params_mut().insert(name.to_string(), value);
        Ok(())
    }
}

// ============================================================================
// Header
// ============================================================================

/// Sets one request header.
#[derive(Debug, Clone, Default)]
pub struct Header {
    name: ArgumentName,
    value_type: Option<ValueType>,
}

impl Header {
    /// Bind to the header `name`.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: ArgumentName::new(name),
            value_type: None,
        }
    }

    /// Declare the argument's value type.
    #[must_use]
    pub const fn with_type(mut self, value_type: ValueType) -> Self {
        self.value_type = Some(value_type);
        self
    }
}

impl Annotation for Header {
    fn kind(&self) -> &'static str {
        "Header"
    }

    fn location(&self) -> ParamLocation {
        ParamLocation::Header
    }

    fn converter_key(&self) -> ConverterKey {
        ConverterKey::ToString
    }

    fn value_type(&self) -> Option<&ValueType> {
        self.value_type.as_ref()
    }

    fn name(&self) -> Option<&str> {
        self.name.get()
    }

    fn name_mut(&mut self) -> Option<&mut ArgumentName> {
        Some(&mut self.name)
    }

    fn on_apply(&self, request: &mut dyn RequestBuilder, value: Value) -> Result<()> {
        let name = self.name.require(self.kind())?;
        request.headers_mut().insert(name.to_string(), value);
        Ok(())
    }
}

// ============================================================================
// Field
// ============================================================================

/// Sets one field of a form-encoded body.
///
/// Fails if another argument replaced the body with something that is not
/// a mapping.
#[derive(Debug, Clone, Default)]
pub struct Field {
    name: ArgumentName,
    value_type: Option<ValueType>,
}

impl Field {
    /// Bind to the body field `name`.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: ArgumentName::new(name),
            value_type: None,
        }
    }

    /// Declare the argument's value type.
    #[must_use]
    pub const fn with_type(mut self, value_type: ValueType) -> Self {
        self.value_type = Some(value_type);
        self
    }
}

impl Annotation for Field {
    fn kind(&self) -> &'static str {
        "Field"
    }

    fn location(&self) -> ParamLocation {
        ParamLocation::Form
    }

    fn converter_key(&self) -> ConverterKey {
        ConverterKey::ToString
    }

    fn value_type(&self) -> Option<&ValueType> {
        self.value_type.as_ref()
    }

    fn name(&self) -> Option<&str> {
        self.name.get()
    }

    fn name_mut(&mut self) -> Option<&mut ArgumentName> {
        Some(&mut self.name)
    }

    fn on_apply(&self, request: &mut dyn RequestBuilder, value: Value) -> Result<()> {
        let name = self.name.require(self.kind())?;
        let Value::Object(fields) = request.body_mut() else {
            return Err(Error::FieldAssignmentFailed {
                field: name.to_string(),
            });
        };
        fields.insert(name.to_string(), value);
        Ok(())
    }
}

// ============================================================================
// Part
// ============================================================================

/// Sets one part of a multipart body.
#[derive(Debug, Clone, Default)]
pub struct Part {
    name: ArgumentName,
    value_type: Option<ValueType>,
}

impl Part {
    /// Bind to the part `name`.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: ArgumentName::new(name),
            value_type: None,
        }
    }

    /// Declare the argument's value type.
    #[must_use]
    pub const fn with_type(mut self, value_type: ValueType) -> Self {
        self.value_type = Some(value_type);
        self
    }
}

impl Annotation for Part {
    fn kind(&self) -> &'static str {
        "Part"
    }

    fn location(&self) -> ParamLocation {
        ParamLocation::Multipart
    }

    fn converter_key(&self) -> ConverterKey {
        ConverterKey::ToRequestBody
    }

    fn value_type(&self) -> Option<&ValueType> {
        self.value_type.as_ref()
    }

    fn name(&self) -> Option<&str> {
        self.name.get()
    }

    fn name_mut(&mut self) -> Option<&mut ArgumentName> {
        Some(&mut self.name)
    }

    fn on_apply(&self, request: &mut dyn RequestBuilder, value: Value) -> Result<()> {
        let name = self.name.require(self.kind())?;
        request.files_mut().insert(name.to_string(), value);
        Ok(())
    }
}
