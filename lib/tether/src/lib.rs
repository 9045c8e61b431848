//! Argument annotations for declarative HTTP requests.
//!
//! Each argument of a declared method is annotated with the role it plays in
//! the outgoing request: [`Path`], [`Query`], [`QueryMap`], [`Header`],
//! [`HeaderMap`], [`Field`], [`FieldMap`], [`Part`], [`PartMap`], [`Body`] or
//! [`Url`].
//!
//! Declaration happens once per method. An [`ArgumentHandlerBuilder`] gives
//! every argument a slot, checks annotations as they are registered, and
//! infers [`Path`] annotations for arguments that match URI template
//! variables. Building it yields an immutable [`ArgumentHandler`] that
//! converts and applies the arguments of each call to a request under
//! construction.
//!
//! [`MethodBuilder`] and [`RequestDefinition`] wire both phases together:
//!
//! ```
//! use serde_json::{Map, json};
//! use tether::{Field, Header, Method, MethodBuilder, RequestConfig, Signature};
//!
//! let mut method = MethodBuilder::new(
//!     Method::POST,
//!     Some("https://api.example.com/users/{id}/notes"),
//!     Signature::method("add_note", ["self", "id", "text", "token"]),
//! );
//! method.add_annotation(Field::new("text"), Some("text")).expect("field");
//! method.add_annotation(Header::new("X-Token"), Some("token")).expect("header");
//! let definition = method.build().expect("definition");
//!
//! let request = definition
//!     .make_request(
//!         &RequestConfig::default(),
//!         vec![json!(7), json!("hello world"), json!("secret")],
//!         Map::new(),
//!     )
//!     .expect("request");
//!
//! assert_eq!(request.url().as_str(), "https://api.example.com/users/7/notes");
//! assert_eq!(request.header("x-token"), Some("secret"));
//! assert_eq!(request.body().map(|body| &body[..]), Some(&b"text=hello+world"[..]));
//! ```

mod annotation;
mod builder;
mod config;
mod handler;
mod method;
pub mod prelude;
mod signature;

pub use annotation::{
    Annotation, AnnotationSet, AnnotationSpec, ArgumentName, Body, Field, FieldMap, Header,
    HeaderMap, Part, PartMap, Path, Query, QueryMap, Url,
};
pub use builder::ArgumentHandlerBuilder;
pub use config::{RequestConfig, RequestConfigBuilder};
pub use handler::ArgumentHandler;
pub use method::{MethodBuilder, RequestDefinition};
pub use signature::{CallArgs, Parameter, Signature};

// Re-export core types
pub use tether_core::{
    ContentType, Converter, ConverterKey, ConverterRegistry, Error, NameList, ParamLocation,
    ParamMeta, PendingRequest, Request, RequestBuilder, RequestDefinitionBuilder, Result,
    UriDefinition, UriTemplate, ValueType, stringify,
};

// Re-export http types for methods and headers
pub use tether_core::{Method, header};

// Dynamic argument values
pub use tether_core::{Map, Value};
