//! Error types for tether.

use std::fmt;

use derive_more::{Display, Error, From};

// ============================================================================
// Name List
// ============================================================================

/// An ordered list of argument or variable names carried by an error.
///
/// Displays as the names joined with `', '`, ready to be wrapped in quotes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameList(Vec<String>);

impl NameList {
    /// The names, in the order they were reported.
    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.0
    }

    /// Returns `true` if the list holds no names.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns `true` if `name` is in the list.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.0.iter().any(|n| n == name)
    }

    fn implicit_hint(&self) -> String {
        if self.is_empty() {
            String::new()
        } else {
            format!(" (Implicit path variables: '{self}')")
        }
    }
}

impl fmt::Display for NameList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join("', '"))
    }
}

impl<S: Into<String>> FromIterator<S> for NameList {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

// ============================================================================
// Error Type
// ============================================================================

/// Main error type for tether operations.
///
/// Variants are grouped by the phase that raises them: declaration time
/// (while a method's annotations are registered and built), call binding,
/// call-time request mutation, conversion, and final request assembly.
#[derive(Debug, Display, Error, From)]
pub enum Error {
    /// More annotations were supplied than there are unannotated arguments.
    #[display(
        "Failed to add `{annotation}` to method `{method}`, as all arguments have been annotated."
    )]
    #[from(skip)]
    ExhaustedArguments {
        /// Kind of the annotation that could not be placed.
        annotation: String,
        /// Declaring method.
        method: String,
    },

    /// An annotation targets a name that is not an argument of the method.
    #[display("`{name}` does not match any argument name of method `{method}`.")]
    #[from(skip)]
    ArgumentNotFound {
        /// The requested argument name.
        name: String,
        /// Declaring method.
        method: String,
    },

    /// Some arguments have no annotation and cannot be inferred from the URI.
    #[display(
        "Missing annotation for argument(s): '{missing}'.{}",
        path_variables.implicit_hint()
    )]
    #[from(skip)]
    MissingArgumentAnnotations {
        /// Arguments left without an annotation.
        missing: NameList,
        /// Unannotated arguments that match unresolved URI template variables.
        path_variables: NameList,
    },

    /// The method's URI cannot be made dynamic.
    #[display("Failed to set dynamic url annotation on `{method}`.")]
    #[from(skip)]
    DynamicUrlAssignmentFailed {
        /// Declaring method.
        method: String,
    },

    /// A path annotation names a variable the URI template does not declare.
    #[display("`{name}` isn't a URI template variable of method `{method}`.")]
    #[from(skip)]
    UnknownUriVariable {
        /// The variable name.
        name: String,
        /// Declaring method.
        method: String,
    },

    /// URI template variables are left without a matching argument.
    #[display("Method `{method}` leaves URI template variable(s) unresolved: '{variables}'.")]
    #[from(skip)]
    MissingUriVariables {
        /// Declaring method.
        method: String,
        /// The unresolved variables.
        variables: NameList,
    },

    /// An annotation name was assigned after it had already been set.
    #[display("Name is already set to `{current}`, cannot rebind it to `{attempted}`.")]
    #[from(skip)]
    NameAlreadySet {
        /// The name already bound.
        current: String,
        /// The rejected name.
        attempted: String,
    },

    /// A named annotation was used before a name was bound to it.
    #[display("`{annotation}` annotation has no name bound.")]
    #[from(skip)]
    UnnamedAnnotation {
        /// Kind of the annotation.
        annotation: String,
    },

    /// A field could not be written because the body is not a mapping.
    #[display(
        "Failed to define field '{field}' to request body. Another argument annotation might have overwritten the body entirely."
    )]
    #[from(skip)]
    FieldAssignmentFailed {
        /// The field name.
        field: String,
    },

    /// A field map could not be merged because the body is not a mapping.
    #[display(
        "Failed to update request body with field map. Another argument annotation might have overwritten the body entirely."
    )]
    #[from(skip)]
    FieldMapUpdateFailed,

    /// A required argument was not supplied at call time.
    #[display("`{method}` missing required argument `{name}`.")]
    #[from(skip)]
    MissingArgument {
        /// Called method.
        method: String,
        /// The missing argument.
        name: String,
    },

    /// A keyword argument does not match any parameter.
    #[display("`{method}` got an unexpected keyword argument `{name}`.")]
    #[from(skip)]
    UnexpectedArgument {
        /// Called method.
        method: String,
        /// The unexpected keyword.
        name: String,
    },

    /// An argument was given both positionally and by keyword.
    #[display("`{method}` got multiple values for argument `{name}`.")]
    #[from(skip)]
    DuplicateArgument {
        /// Called method.
        method: String,
        /// The duplicated argument.
        name: String,
    },

    /// More positional arguments than declared parameters.
    #[display("`{method}` takes {expected} positional argument(s) but {given} were given.")]
    #[from(skip)]
    TooManyArguments {
        /// Called method.
        method: String,
        /// Number of declared parameters.
        expected: usize,
        /// Number of positional arguments supplied.
        given: usize,
    },

    /// No converter is registered for a key.
    #[display("no converter registered for `{key}`")]
    #[from(skip)]
    ConverterNotFound {
        /// Rendered converter key.
        key: String,
    },

    /// A value could not be converted or has the wrong shape.
    #[display("conversion error: {_0}")]
    #[from(skip)]
    Conversion(#[error(not(source))] String),

    /// JSON serialization error.
    #[display("JSON serialization error: {_0}")]
    #[from]
    JsonSerialization(serde_json::Error),

    /// Form and query string serialization error.
    #[display("form serialization error: {_0}")]
    #[from]
    FormSerialization(serde_html_form::ser::Error),

    /// URL parsing error.
    #[display("invalid URL: {_0}")]
    #[from]
    InvalidUrl(url::ParseError),

    /// A header name or value is not valid HTTP.
    #[display("invalid header: {_0}")]
    #[from(skip)]
    InvalidHeader(#[error(not(source))] String),
}

/// Result type alias using [`crate::Error`].
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a conversion error.
    #[must_use]
    pub fn conversion(message: impl Into<String>) -> Self {
        Self::Conversion(message.into())
    }

    /// Create an invalid header error.
    #[must_use]
    pub fn invalid_header(message: impl Into<String>) -> Self {
        Self::InvalidHeader(message.into())
    }

    /// Returns `true` for errors raised while declaring a method, before any call.
    #[must_use]
    pub const fn is_declaration_error(&self) -> bool {
        matches!(
            self,
            Self::ExhaustedArguments { .. }
                | Self::ArgumentNotFound { .. }
                | Self::MissingArgumentAnnotations { .. }
                | Self::DynamicUrlAssignmentFailed { .. }
                | Self::UnknownUriVariable { .. }
                | Self::MissingUriVariables { .. }
                | Self::NameAlreadySet { .. }
        )
    }

    /// Returns `true` for errors raised while applying arguments to a request.
    #[must_use]
    pub const fn is_call_error(&self) -> bool {
        matches!(
            self,
            Self::FieldAssignmentFailed { .. }
                | Self::FieldMapUpdateFailed
                | Self::UnnamedAnnotation { .. }
                | Self::MissingArgument { .. }
                | Self::UnexpectedArgument { .. }
                | Self::DuplicateArgument { .. }
                | Self::TooManyArguments { .. }
                | Self::ConverterNotFound { .. }
                | Self::Conversion(_)
        )
    }
}
