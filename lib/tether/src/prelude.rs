//! Prelude module for convenient imports.
//!
//! ```
//! use tether::prelude::*;
//!
//! let signature = Signature::method("get_todo", ["self", "id"]);
//! let method = MethodBuilder::new(Method::GET, Some("todos/{id}"), signature);
//! assert!(method.build().is_ok());
//! ```

pub use crate::{
    Annotation, AnnotationSet, AnnotationSpec, ArgumentHandler, ArgumentHandlerBuilder, Body,
    ContentType, ConverterKey, ConverterRegistry, Error, Field, FieldMap, Header, HeaderMap, Map,
    Method, MethodBuilder, Part, PartMap, Path, Query, QueryMap, Request, RequestConfig,
    RequestDefinition, Result, Signature, Url, Value, ValueType,
};
