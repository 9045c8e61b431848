//! Core types and collaborator contracts for tether argument annotations.
//!
//! This crate provides what argument annotations depend on:
//! - [`ConverterKey`], [`ValueType`], [`Converter`] and [`ConverterRegistry`] - conversion strategies
//! - [`RequestDefinitionBuilder`] and [`UriDefinition`] - declaration-time URI state
//! - [`RequestBuilder`] and [`PendingRequest`] - a request under construction
//! - [`Request`] - the assembled HTTP request
//! - [`UriTemplate`] - URI templates with variable expansion
//! - [`Error`] and [`Result`] - Error handling
//! - [`ParamMeta`] - Argument metadata for tooling

mod body;
mod converter;
mod definition;
mod error;
mod multipart;
mod param_meta;
pub mod prelude;
mod request;
mod uri;

pub use body::{ContentType, to_form, to_json};
pub use converter::{Converter, ConverterKey, ConverterRegistry, ValueType, stringify};
pub use definition::{RequestDefinitionBuilder, UriDefinition};
pub use error::{Error, NameList, Result};
pub use multipart::{Form, Part};
pub use param_meta::{ParamLocation, ParamMeta};
pub use request::{PendingRequest, Request, RequestBuilder};
pub use uri::UriTemplate;

// Re-export http types for methods and headers
pub use http::{Method, header};

// Dynamic argument values
pub use serde_json::{Map, Value};
