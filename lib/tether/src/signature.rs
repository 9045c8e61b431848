//! Declared method signatures and call binding.

use serde_json::{Map, Value};
use tether_core::{Error, Result};

/// Call arguments resolved to parameter names.
pub type CallArgs = Map<String, Value>;

/// A declared parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    name: String,
    default: Option<Value>,
}

impl Parameter {
    /// Parameter name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Default value used when the call omits the argument.
    #[must_use]
    pub const fn default(&self) -> Option<&Value> {
        self.default.as_ref()
    }
}

/// The parameter list of a declared method.
///
/// When the method is bound to an instance, its first parameter is the
/// receiver: it is listed for completeness but never annotated or bound.
///
/// # Example
///
/// ```
/// use serde_json::{Map, json};
/// use tether::Signature;
///
/// let signature = Signature::method("list_todos", ["self", "user", "page"])
///     .with_default("page", json!(1));
///
/// let args = signature
///     .bind(vec![json!("alice")], Map::new())
///     .expect("bound");
/// assert_eq!(args["user"], json!("alice"));
/// assert_eq!(args["page"], json!(1));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Signature {
    name: String,
    parameters: Vec<Parameter>,
    receiver: bool,
}

impl Signature {
    /// Signature of a free function.
    #[must_use]
    pub fn function<I, S>(name: impl Into<String>, parameters: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            parameters: parameters
                .into_iter()
                .map(|name| Parameter {
                    name: name.into(),
                    default: None,
                })
                .collect(),
            receiver: false,
        }
    }

    /// Signature of a method whose first parameter is the receiver.
    #[must_use]
    pub fn method<I, S>(name: impl Into<String>, parameters: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            receiver: true,
            ..Self::function(name, parameters)
        }
    }

    /// Give a parameter a default value.
    ///
    /// Unknown names are ignored.
    #[must_use]
    pub fn with_default(mut self, name: &str, value: Value) -> Self {
        if let Some(parameter) = self.parameters.iter_mut().find(|p| p.name == name) {
            parameter.default = Some(value);
        }
        self
    }

    /// Method name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns `true` if the first parameter is a receiver.
    #[must_use]
    pub const fn has_receiver(&self) -> bool {
        self.receiver
    }

    /// All declared parameters, receiver included.
    #[must_use]
    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    /// Parameters that receive call arguments.
    pub fn arguments(&self) -> impl Iterator<Item = &Parameter> {
        self.parameters.iter().skip(usize::from(self.receiver))
    }

    /// Bind call arguments to parameter names.
    ///
    /// Positional values fill the arguments in order, keyword values by name,
    /// and defaults cover whatever is left.
    pub fn bind(&self, positional: Vec<Value>, keyword: Map<String, Value>) -> Result<CallArgs> {
        let expected = self.arguments().count();
        if positional.len() > expected {
            return Err(Error::TooManyArguments {
                method: self.name.clone(),
                expected,
                given: positional.len(),
            });
        }

        let mut args: CallArgs = self
            .arguments()
            .zip(positional)
            .map(|(parameter, value)| (parameter.name.clone(), value))
            .collect();

        for (name, value) in keyword {
            if !self.arguments().any(|parameter| parameter.name == name) {
                return Err(Error::UnexpectedArgument {
                    method: self.name.clone(),
                    name,
                });
            }
            if args.contains_key(&name) {
                return Err(Error::DuplicateArgument {
                    method: self.name.clone(),
                    name,
                });
            }
            args.insert(name, value);
        }

        for parameter in self.arguments() {
            if args.contains_key(&parameter.name) {
                continue;
            }
            let Some(default) = &parameter.default else {
                return Err(Error::MissingArgument {
                    method: self.name.clone(),
                    name: parameter.name.clone(),
                });
            };
            args.insert(parameter.name.clone(), default.clone());
        }

        Ok(args)
    }
}
