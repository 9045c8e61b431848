//! Declaration-time registration of argument annotations.

use std::sync::Arc;

use tether_core::{Error, RequestDefinitionBuilder, Result};
use tracing::{debug, trace};

use crate::annotation::{Annotation, AnnotationSet, AnnotationSpec, Path};
use crate::{ArgumentHandler, Signature};

#[derive(Debug)]
struct Slot {
    name: String,
    annotation: Option<Box<dyn Annotation>>,
}

/// Collects one annotation per argument of a declared method.
///
/// Every argument gets a slot, in declaration order. Slots are filled
/// through [`add_annotation`](Self::add_annotation) or
/// [`set_annotations`](Self::set_annotations); [`build`](Self::build)
/// infers [`Path`] annotations for arguments that match URI template
/// variables and turns the builder into an [`ArgumentHandler`].
///
/// # Example
///
/// ```
/// use tether::{
///     ArgumentHandlerBuilder, Query, RequestDefinitionBuilder, Signature, UriDefinition,
/// };
///
/// let signature = Signature::method("get_todo", ["self", "id", "verbose"]);
/// let mut definition = UriDefinition::new(signature.name(), Some("todos/{id}"));
/// let mut builder = ArgumentHandlerBuilder::new(signature);
///
/// builder
///     .add_annotation(&mut definition, Query::new("verbose"), Some("verbose"))
///     .expect("annotated");
/// assert_eq!(builder.missing_arguments().collect::<Vec<_>>(), ["id"]);
///
/// let handler = builder.build(&mut definition).expect("handler");
/// assert_eq!(handler.annotations().count(), 2);
/// assert!(definition.remaining_uri_variables().is_empty());
/// ```
#[derive(Debug)]
pub struct ArgumentHandlerBuilder {
    signature: Arc<Signature>,
    slots: Vec<Slot>,
    defined: usize,
}

impl ArgumentHandlerBuilder {
    /// Start with every argument of `signature` unannotated.
    ///
    /// The receiver of a method signature gets no slot.
    #[must_use]
    pub fn new(signature: impl Into<Arc<Signature>>) -> Self {
        let signature = signature.into();
        let slots = signature
            .arguments()
            .map(|parameter| Slot {
                name: parameter.name().to_string(),
                annotation: None,
            })
            .collect();
        Self {
            signature,
            slots,
            defined: 0,
        }
    }

    /// The declared signature.
    #[must_use]
    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    /// Unannotated argument names, in declaration order.
    pub fn missing_arguments(&self) -> impl Iterator<Item = &str> {
        self.slots
            .iter()
            .filter(|slot| slot.annotation.is_none())
            .map(|slot| slot.name.as_str())
    }

    /// Number of arguments still without an annotation.
    #[must_use]
    pub fn remaining_count(&self) -> usize {
        self.slots.len() - self.defined
    }

    /// Returns `true` once every argument has an annotation.
    #[must_use]
    pub fn is_done(&self) -> bool {
        self.remaining_count() == 0
    }

    /// Register annotations in bulk.
    ///
    /// Named entries are registered first. Positional entries then go to the
    /// arguments that were unannotated before the call and are not targeted
    /// by a named entry, in declaration order; surplus positional entries are
    /// ignored.
    ///
    /// # Errors
    ///
    /// Returns the first error raised by [`add_annotation`](Self::add_annotation).
    pub fn set_annotations(
        &mut self,
        definition: &mut dyn RequestDefinitionBuilder,
        annotations: AnnotationSet,
    ) -> Result<()> {
        let AnnotationSet { positional, named } = annotations;
        let targets: Vec<String> = self
            .missing_arguments()
            .filter(|missing| !named.iter().any(|(name, _)| name == missing))
            .map(str::to_string)
            .collect();

        for (name, annotation) in named {
            self.add_annotation(definition, annotation, Some(&name))?;
        }
        for (name, annotation) in targets.into_iter().zip(positional) {
            self.add_annotation(definition, annotation, Some(&name))?;
        }
        Ok(())
    }

    /// Register one annotation.
    ///
    /// Without `name`, the annotation goes to the first unannotated argument.
    /// A named annotation whose name is unset takes the argument name. The
    /// annotation's declaration hook runs before it is stored; annotating an
    /// already annotated argument replaces the previous annotation.
    ///
    /// # Errors
    ///
    /// - [`Error::ExhaustedArguments`] if no name is given and every argument
    ///   is annotated
    /// - [`Error::ArgumentNotFound`] if `name` is not an argument
    /// - any error raised by the declaration hook
    pub fn add_annotation(
        &mut self,
        definition: &mut dyn RequestDefinitionBuilder,
        annotation: impl Into<AnnotationSpec>,
        name: Option<&str>,
    ) -> Result<&dyn Annotation> {
        let mut annotation = annotation.into().instantiate();

        let name = match name {
            Some(name) => name.to_string(),
            None => self
                .missing_arguments()
                .next()
                .map(str::to_string)
                .ok_or_else(|| Error::ExhaustedArguments {
                    annotation: annotation.kind().to_string(),
                    method: self.signature.name().to_string(),
                })?,
        };

        let Some(slot) = self.slots.iter_mut().find(|slot| slot.name == name) else {
            return Err(Error::ArgumentNotFound {
                name,
                method: self.signature.name().to_string(),
            });
        };

        if let Some(cell) = annotation.name_mut()
            && !cell.is_set()
        {
            cell.set(name.as_str())?;
        }
        annotation.on_define(definition)?;

        trace!(
            method = self.signature.name(),
            argument = %name,
            annotation = annotation.kind(),
            "annotation registered"
        );
        if slot.annotation.is_none() {
            self.defined += 1;
        }
        Ok(&**slot.annotation.insert(annotation))
    }

    /// Finish the declaration.
    ///
    /// Unannotated arguments that match unresolved URI template variables of
    /// `definition` get a [`Path`] annotation.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingArgumentAnnotations`] if some argument is left
    /// without an annotation and matches no URI template variable.
    pub fn build(mut self, definition: &mut dyn RequestDefinitionBuilder) -> Result<ArgumentHandler> {
        if !self.is_done() {
            self.infer_path_arguments(definition)?;
        }
        debug!(
            method = self.signature.name(),
            arguments = self.slots.len(),
            "argument handler built"
        );

        let arguments = self
            .slots
            .into_iter()
            .filter_map(|slot| slot.annotation.map(|annotation| (slot.name, annotation)))
            .collect();
        Ok(ArgumentHandler::new(self.signature, arguments))
    }

    fn infer_path_arguments(&mut self, definition: &mut dyn RequestDefinitionBuilder) -> Result<()> {
        let uri_variables = definition.remaining_uri_variables();
        let (matching, still_missing): (Vec<String>, Vec<String>) = self
            .missing_arguments()
            .map(str::to_string)
            .partition(|name| uri_variables.contains(name));

        if !still_missing.is_empty() {
            return Err(Error::MissingArgumentAnnotations {
                missing: still_missing.into_iter().collect(),
                path_variables: matching.into_iter().collect(),
            });
        }

        debug!(
            method = self.signature.name(),
            variables = ?matching,
            "inferring path annotations"
        );
        let annotations = matching
            .into_iter()
            .fold(AnnotationSet::new(), |set, name| {
                set.named(name, AnnotationSpec::of::<Path>())
            });
        self.set_annotations(definition, annotations)
    }
}
