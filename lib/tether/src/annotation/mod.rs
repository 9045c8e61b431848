//! Argument annotations.
//!
//! An annotation marks the role one argument plays in the outgoing request:
//! a URI variable, a query parameter, a header, a body field, a multipart
//! part, the whole body, or the whole URL.
//!
//! Annotations take part in two phases:
//! - at declaration time, [`Annotation::on_define`] may register state on the
//!   request definition (a URI variable, a dynamic URL);
//! - at call time, [`Annotation::on_apply`] writes the converted argument
//!   value into the request under construction.

use std::fmt;

use serde_json::{Map, Value};
use tether_core::{
    ConverterKey, Error, ParamLocation, RequestBuilder, RequestDefinitionBuilder, Result,
    ValueType,
};

use crate::MethodBuilder;

mod named;
mod typed;
mod url;

pub use self::named::{Field, Header, Part, Path, Query};
pub use self::typed::{Body, FieldMap, HeaderMap, PartMap, QueryMap};
pub use self::url::Url;

// ============================================================================
// Annotation Trait
// ============================================================================

/// The role of one method argument in the outgoing request.
pub trait Annotation: fmt::Debug + Send + Sync {
    /// Marker name, used in diagnostics and metadata.
    fn kind(&self) -> &'static str;

    /// Where the argument lands in the request.
    fn location(&self) -> ParamLocation;

    /// Conversion applied to the argument value before [`on_apply`](Self::on_apply).
    fn converter_key(&self) -> ConverterKey;

    /// Declared value type, used to select a registered converter.
    fn value_type(&self) -> Option<&ValueType> {
        None
    }

    /// Bound name for named annotations.
    fn name(&self) -> Option<&str> {
        None
    }

    /// Settable-once name cell for named annotations.
    fn name_mut(&mut self) -> Option<&mut ArgumentName> {
        None
    }

    /// Declaration-time hook.
    ///
    /// # Errors
    ///
    /// Returns an error if the definition rejects this annotation.
    fn on_define(&self, _definition: &mut dyn RequestDefinitionBuilder) -> Result<()> {
        Ok(())
    }

    /// Write a converted argument value into the request.
    ///
    /// # Errors
    ///
    /// Returns an error if the request cannot hold the value.
    fn on_apply(&self, request: &mut dyn RequestBuilder, value: Value) -> Result<()>;

    /// Register this annotation on the next unannotated argument of a method.
    ///
    /// # Errors
    ///
    /// Returns the error raised by [`MethodBuilder::add_annotation`].
    fn attach(self, method: &mut MethodBuilder) -> Result<&mut MethodBuilder>
    where
        Self: Sized + 'static,
    {
        method.add_annotation(self, None)?;
        Ok(method)
    }
}

// ============================================================================
// Argument Name
// ============================================================================

/// A name that can be assigned once and never changed afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArgumentName(Option<String>);

impl ArgumentName {
    /// A name bound from the start.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(Some(name.into()))
    }

    /// The bound name, if any.
    #[must_use]
    pub fn get(&self) -> Option<&str> {
        self.0.as_deref()
    }

    /// Returns `true` once a name is bound.
    #[must_use]
    pub const fn is_set(&self) -> bool {
        self.0.is_some()
    }

    /// Bind the name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NameAlreadySet`] if a name is already bound.
    pub fn set(&mut self, name: impl Into<String>) -> Result<()> {
        match &self.0 {
            Some(current) => Err(Error::NameAlreadySet {
                current: current.clone(),
                attempted: name.into(),
            }),
            None => {
                self.0 = Some(name.into());
                Ok(())
            }
        }
    }

    pub(crate) fn require(&self, kind: &'static str) -> Result<&str> {
        self.get().ok_or_else(|| Error::UnnamedAnnotation {
            annotation: kind.to_string(),
        })
    }
}

// ============================================================================
// Annotation Spec
// ============================================================================

/// An annotation instance, or a marker type still to be instantiated.
///
/// Passing the bare type is a shorthand for its default instance:
/// `AnnotationSpec::of::<Query>()` behaves like `Query::default()`, and the
/// argument name is bound when the annotation is registered.
#[derive(Debug)]
pub enum AnnotationSpec {
    /// A configured annotation.
    Instance(Box<dyn Annotation>),
    /// A marker type, instantiated with its default constructor.
    Type(fn() -> Box<dyn Annotation>),
}

impl AnnotationSpec {
    /// Refer to a marker type.
    #[must_use]
    pub fn of<A: Annotation + Default + 'static>() -> Self {
        Self::Type(instantiate::<A>)
    }

    /// Get the annotation, instantiating a marker type if needed.
    #[must_use]
    pub fn instantiate(self) -> Box<dyn Annotation> {
        match self {
            Self::Instance(annotation) => annotation,
            Self::Type(make) => make(),
        }
    }
}

fn instantiate<A: Annotation + Default + 'static>() -> Box<dyn Annotation> {
    Box::new(A::default())
}

impl<A: Annotation + 'static> From<A> for AnnotationSpec {
    fn from(annotation: A) -> Self {
        Self::Instance(Box::new(annotation))
    }
}

/// Annotations to register in bulk, see
/// [`ArgumentHandlerBuilder::set_annotations`](crate::ArgumentHandlerBuilder::set_annotations).
///
/// Named entries target an argument by name; positional entries fill the
/// remaining unannotated arguments in declaration order.
#[derive(Debug, Default)]
pub struct AnnotationSet {
    pub(crate) positional: Vec<AnnotationSpec>,
    pub(crate) named: Vec<(String, AnnotationSpec)>,
}

impl AnnotationSet {
    /// Create an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an annotation for the next unannotated argument.
    #[must_use]
    pub fn positional(mut self, annotation: impl Into<AnnotationSpec>) -> Self {
        self.positional.push(annotation.into());
        self
    }

    /// Add an annotation for the argument `name`.
    #[must_use]
    pub fn named(mut self, name: impl Into<String>, annotation: impl Into<AnnotationSpec>) -> Self {
        self.named.push((name.into(), annotation.into()));
        self
    }

    /// Returns `true` if the set holds no annotation.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.positional.is_empty() && self.named.is_empty()
    }
}

// ============================================================================
// Helpers
// ============================================================================

/// Merge a converted mapping into request storage.
fn merge_into(target: &mut Map<String, Value>, value: Value, kind: &str) -> Result<()> {
    let Value::Object(entries) = value else {
        return Err(Error::conversion(format!(
            "`{kind}` expects a mapping, got {value}"
        )));
    };
    target.extend(entries);
    Ok(())
}
