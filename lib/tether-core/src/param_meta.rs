//! Parameter metadata for tooling.
//!
//! A finalized argument handler can describe where each argument lands,
//! which is useful for documentation, validation, or debugging.

use std::fmt;

use crate::ValueType;

/// Where an argument is placed in the HTTP request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamLocation {
    /// URI template variable (e.g., `/users/{id}`)
    Path,
    /// Query parameter (e.g., `?limit=10`)
    Query,
    /// Header
    Header,
    /// Whole request body
    Body,
    /// Body field (URL-encoded form)
    Form,
    /// Multipart part
    Multipart,
    /// The whole request URL
    Url,
}

impl fmt::Display for ParamLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Path => write!(f, "path"),
            Self::Query => write!(f, "query"),
            Self::Header => write!(f, "header"),
            Self::Body => write!(f, "body"),
            Self::Form => write!(f, "form"),
            Self::Multipart => write!(f, "multipart"),
            Self::Url => write!(f, "url"),
        }
    }
}

/// Metadata about a single annotated argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamMeta {
    /// The parameter name as declared in the method signature.
    pub name: String,
    /// Where the argument is sent in the HTTP request.
    pub location: ParamLocation,
    /// The annotation kind (e.g., `"Query"`, `"FieldMap"`).
    pub annotation: &'static str,
    /// Request-side name (query key, header name, ...) for named annotations.
    pub target: Option<String>,
    /// Declared value type, if any.
    pub value_type: Option<ValueType>,
}

impl fmt::Display for ParamMeta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.annotation)?;
        if let Some(target) = &self.target {
            write!(f, "({target})")?;
        }
        write!(f, " -> {}", self.location)
    }
}
