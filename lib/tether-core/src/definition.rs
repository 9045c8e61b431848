//! Declaration-time request definition.

use crate::{Error, Result, UriTemplate};

/// Declaration-time state an annotation may touch while it is registered.
///
/// Implemented by [`UriDefinition`]; annotation handler builders only depend
/// on this trait.
pub trait RequestDefinitionBuilder {
    /// Name of the declaring method, for diagnostics.
    fn method_name(&self) -> &str;

    /// Register `name` as a URI template variable bound by an argument.
    fn add_uri_variable(&mut self, name: &str) -> Result<()>;

    /// Mark the URI as supplied at call time.
    fn set_dynamic_uri(&mut self) -> Result<()>;

    /// Template variables not yet bound by any argument, in template order.
    fn remaining_uri_variables(&self) -> Vec<String>;
}

/// URI part of a method declaration.
///
/// A method either declares a static URI template, or declares none and
/// receives its URI at call time through a dynamic URL argument.
///
/// # Example
///
/// ```
/// use tether_core::{RequestDefinitionBuilder, UriDefinition};
///
/// let mut uri = UriDefinition::new("get_todo", Some("todos{/id}"));
/// assert_eq!(uri.remaining_uri_variables(), ["id"]);
///
/// uri.add_uri_variable("id").expect("declared variable");
/// assert!(uri.remaining_uri_variables().is_empty());
/// assert!(uri.set_dynamic_uri().is_err());
/// ```
#[derive(Debug, Clone)]
pub struct UriDefinition {
    method_name: String,
    template: Option<UriTemplate>,
    dynamic: bool,
    bound: Vec<String>,
}

impl UriDefinition {
    /// Create the URI definition of a method.
    #[must_use]
    pub fn new(method_name: impl Into<String>, template: Option<&str>) -> Self {
        Self {
            method_name: method_name.into(),
            template: template.map(UriTemplate::new),
            dynamic: false,
            bound: Vec::new(),
        }
    }

    /// Returns `true` if the method declares a URI template.
    #[must_use]
    pub const fn is_static(&self) -> bool {
        self.template.is_some()
    }

    /// Returns `true` if the URI is supplied at call time.
    #[must_use]
    pub const fn is_dynamic(&self) -> bool {
        self.dynamic
    }

    /// The declared template, if any.
    #[must_use]
    pub const fn template(&self) -> Option<&UriTemplate> {
        self.template.as_ref()
    }

    /// Finish the definition.
    ///
    /// Fails if template variables are left without an argument.
    pub fn build(self) -> Result<Option<UriTemplate>> {
        let remaining = self.remaining_uri_variables();
        if !remaining.is_empty() {
            return Err(Error::MissingUriVariables {
                method: self.method_name,
                variables: remaining.into_iter().collect(),
            });
        }
        Ok(self.template)
    }
}

impl RequestDefinitionBuilder for UriDefinition {
    fn method_name(&self) -> &str {
        &self.method_name
    }

    fn add_uri_variable(&mut self, name: &str) -> Result<()> {
        if let Some(template) = &self.template
            && !template.has_variable(name)
        {
            return Err(Error::UnknownUriVariable {
                name: name.to_string(),
                method: self.method_name.clone(),
            });
        }
        if !self.bound.iter().any(|bound| bound == name) {
            self.bound.push(name.to_string());
        }
        Ok(())
    }

    fn set_dynamic_uri(&mut self) -> Result<()> {
        if self.is_static() {
            return Err(Error::DynamicUrlAssignmentFailed {
                method: self.method_name.clone(),
            });
        }
        self.dynamic = true;
        Ok(())
    }

    fn remaining_uri_variables(&self) -> Vec<String> {
        self.template
            .iter()
            .flat_map(UriTemplate::variables)
            .filter(|name| !self.bound.iter().any(|bound| bound == name))
            .map(str::to_string)
            .collect()
    }
}
