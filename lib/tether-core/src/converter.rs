//! Converter keys and converter resolution.
//!
//! An annotation never converts values itself: it names a [`ConverterKey`]
//! (and optionally a [`ValueType`]) and the request under construction
//! resolves that pair to a [`Converter`] through a [`ConverterRegistry`].

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::{Error, Result};

// ============================================================================
// Converter Key
// ============================================================================

/// Token selecting a conversion strategy.
///
/// The two base strategies can be wrapped by the [`Sequence`](Self::Sequence)
/// and [`Map`](Self::Map) combinators to apply them per element or per value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ConverterKey {
    /// Convert a scalar to its string form.
    ToString,
    /// Convert a value to something usable as a request body.
    ToRequestBody,
    /// Apply the wrapped strategy to each element of a sequence.
    Sequence(Box<ConverterKey>),
    /// Apply the wrapped strategy to each value of a mapping.
    Map(Box<ConverterKey>),
}

impl ConverterKey {
    /// Wrap a key so it applies to each element of a sequence.
    #[must_use]
    pub fn sequence(inner: Self) -> Self {
        Self::Sequence(Box::new(inner))
    }

    /// Wrap a key so it applies to each value of a mapping.
    #[must_use]
    pub fn map(inner: Self) -> Self {
        Self::Map(Box::new(inner))
    }
}

impl fmt::Display for ConverterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ToString => write!(f, "to-string"),
            Self::ToRequestBody => write!(f, "to-request-body"),
            Self::Sequence(inner) => write!(f, "sequence({inner})"),
            Self::Map(inner) => write!(f, "map({inner})"),
        }
    }
}

// ============================================================================
// Value Type
// ============================================================================

/// Declared type of an annotated argument, used to pick a custom converter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ValueType(&'static str);

impl ValueType {
    /// The value type of a Rust type.
    #[must_use]
    pub fn of<T: ?Sized>() -> Self {
        Self(std::any::type_name::<T>())
    }

    /// A value type identified by an arbitrary name.
    #[must_use]
    pub const fn named(name: &'static str) -> Self {
        Self(name)
    }

    /// The type name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// Converters
// ============================================================================

/// A conversion strategy turning an argument value into a wire-ready value.
pub trait Converter: Send + Sync {
    /// Convert a value.
    fn convert(&self, value: Value) -> Result<Value>;
}

impl<F> Converter for F
where
    F: Fn(Value) -> Result<Value> + Send + Sync,
{
    fn convert(&self, value: Value) -> Result<Value> {
        self(value)
    }
}

/// Render a value as a plain string.
///
/// Strings are taken verbatim, other values use their JSON text.
#[must_use]
pub fn stringify(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Scalars become strings; `null` stays `null` so it reads as "no value".
#[derive(Debug, Clone, Copy)]
struct StringConverter;

impl Converter for StringConverter {
    fn convert(&self, value: Value) -> Result<Value> {
        match value {
            Value::Null => Ok(Value::Null),
            Value::String(_) => Ok(value),
            other => Ok(Value::String(stringify(&other))),
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct RequestBodyConverter;

impl Converter for RequestBodyConverter {
    fn convert(&self, value: Value) -> Result<Value> {
        Ok(value)
    }
}

struct SequenceConverter(Arc<dyn Converter>);

impl Converter for SequenceConverter {
    fn convert(&self, value: Value) -> Result<Value> {
        match value {
            Value::Array(items) => items
                .into_iter()
                .map(|item| self.0.convert(item))
                .collect::<Result<Vec<_>>>()
                .map(Value::Array),
            single => self.0.convert(single),
        }
    }
}

struct MapConverter(Arc<dyn Converter>);

impl Converter for MapConverter {
    fn convert(&self, value: Value) -> Result<Value> {
        let Value::Object(entries) = value else {
            return Err(Error::conversion(format!(
                "expected a mapping, got `{value}`"
            )));
        };
        entries
            .into_iter()
            .map(|(key, value)| self.0.convert(value).map(|value| (key, value)))
            .collect::<Result<serde_json::Map<_, _>>>()
            .map(Value::Object)
    }
}

// ============================================================================
// Registry
// ============================================================================

#[derive(derive_more::Debug, Clone)]
struct Registration {
    key: ConverterKey,
    value_type: Option<ValueType>,
    #[debug(skip)]
    converter: Arc<dyn Converter>,
}

/// Resolves `(key, value type)` pairs to converters.
///
/// Lookup order:
/// 1. a converter registered for the key and the exact value type;
/// 2. a converter registered for the key without a value type;
/// 3. for combinator keys, the inner key resolved the same way, wrapped;
/// 4. the standard strategy for the base key, unless disabled.
///
/// # Example
///
/// ```
/// use serde_json::json;
/// use tether_core::{Converter, ConverterKey, ConverterRegistry};
///
/// let registry = ConverterRegistry::new();
/// let converter = registry
///     .resolve(&ConverterKey::sequence(ConverterKey::ToString), None)
///     .expect("converter");
/// let value = converter.convert(json!([1, true])).expect("convert");
/// assert_eq!(value, json!(["1", "true"]));
/// ```
#[derive(Debug, Clone)]
pub struct ConverterRegistry {
    registrations: Vec<Registration>,
    standard: bool,
}

impl Default for ConverterRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ConverterRegistry {
    /// A registry with the standard strategies.
    #[must_use]
    pub fn new() -> Self {
        Self {
            registrations: Vec::new(),
            standard: true,
        }
    }

    /// A registry that only resolves registered converters.
    #[must_use]
    pub fn without_defaults() -> Self {
        Self {
            registrations: Vec::new(),
            standard: false,
        }
    }

    /// Register a converter for a key, optionally restricted to a value type.
    ///
    /// Later registrations take precedence over earlier ones.
    #[must_use]
    pub fn register(
        mut self,
        key: ConverterKey,
        value_type: Option<ValueType>,
        converter: impl Converter + 'static,
    ) -> Self {
        self.registrations.insert(
            0,
            Registration {
                key,
                value_type,
                converter: Arc::new(converter),
            },
        );
        self
    }

    /// Resolve the converter for a key and an optional value type.
    pub fn resolve(
        &self,
        key: &ConverterKey,
        value_type: Option<&ValueType>,
    ) -> Result<Arc<dyn Converter>> {
        if let Some(value_type) = value_type
            && let Some(found) = self.find(key, Some(value_type))
        {
            return Ok(found);
        }
        if let Some(found) = self.find(key, None) {
            return Ok(found);
        }

        match key {
            ConverterKey::Sequence(inner) => {
                let inner = self.resolve(inner, value_type)?;
                Ok(Arc::new(SequenceConverter(inner)))
            }
            ConverterKey::Map(inner) => {
                let inner = self.resolve(inner, value_type)?;
                Ok(Arc::new(MapConverter(inner)))
            }
            ConverterKey::ToString if self.standard => Ok(Arc::new(StringConverter)),
            ConverterKey::ToRequestBody if self.standard => Ok(Arc::new(RequestBodyConverter)),
            ConverterKey::ToString | ConverterKey::ToRequestBody => Err(Error::ConverterNotFound {
                key: key.to_string(),
            }),
        }
    }

    fn find(&self, key: &ConverterKey, value_type: Option<&ValueType>) -> Option<Arc<dyn Converter>> {
        self.registrations
            .iter()
            .find(|registration| {
                registration.key == *key && registration.value_type.as_ref() == value_type
            })
            .map(|registration| Arc::clone(&registration.converter))
    }
}
