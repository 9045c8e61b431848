//! Prelude module for convenient imports.
//!
//! This module re-exports the most commonly used types and traits
//! for easy glob importing:
//!
//! ```ignore
//! use tether_core::prelude::*;
//! ```

pub use crate::{
    ContentType, Converter, ConverterKey, ConverterRegistry, Error, Method, PendingRequest,
    Request, RequestBuilder, RequestDefinitionBuilder, Result, UriDefinition, UriTemplate,
    Value, ValueType,
};
