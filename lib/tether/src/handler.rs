//! Call-time dispatch of argument values.

use std::sync::Arc;

use serde_json::{Map, Value};
use tether_core::{ParamMeta, RequestBuilder, Result};
use tracing::trace;

use crate::annotation::Annotation;
use crate::{CallArgs, Signature};

/// The finalized annotations of a declared method.
///
/// Built once by [`ArgumentHandlerBuilder::build`](crate::ArgumentHandlerBuilder::build)
/// and shared by every call; per-call state lives in the request passed to
/// [`handle_call`](Self::handle_call).
#[derive(Debug)]
pub struct ArgumentHandler {
    signature: Arc<Signature>,
    arguments: Vec<(String, Box<dyn Annotation>)>,
}

impl ArgumentHandler {
    pub(crate) fn new(
        signature: Arc<Signature>,
        arguments: Vec<(String, Box<dyn Annotation>)>,
    ) -> Self {
        Self {
            signature,
            arguments,
        }
    }

    /// The declared signature.
    #[must_use]
    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    /// Annotations in argument order.
    pub fn annotations(&self) -> impl Iterator<Item = &dyn Annotation> {
        self.arguments.iter().map(|(_, annotation)| &**annotation)
    }

    /// Argument names with their annotation, in argument order.
    pub fn arguments(&self) -> impl Iterator<Item = (&str, &dyn Annotation)> {
        self.arguments
            .iter()
            .map(|(name, annotation)| (name.as_str(), &**annotation))
    }

    /// The annotation of argument `name`.
    #[must_use]
    pub fn annotation(&self, name: &str) -> Option<&dyn Annotation> {
        self.arguments()
            .find(|(argument, _)| *argument == name)
            .map(|(_, annotation)| annotation)
    }

    /// Annotated argument names present in `call_args`, in argument order.
    pub fn relevant_arguments<'a>(
        &'a self,
        call_args: &'a CallArgs,
    ) -> impl Iterator<Item = &'a str> {
        self.arguments
            .iter()
            .map(|(name, _)| name.as_str())
            .filter(|name| call_args.contains_key(*name))
    }

    /// Apply the arguments of one call to `request`.
    ///
    /// The call is bound against the signature first, so defaults apply and
    /// positional values reach their declared names.
    ///
    /// # Errors
    ///
    /// Returns a binding error, or the first error raised while converting or
    /// applying an argument.
    pub fn handle_call(
        &self,
        request: &mut dyn RequestBuilder,
        positional: Vec<Value>,
        keyword: Map<String, Value>,
    ) -> Result<()> {
        let call_args = self.signature.bind(positional, keyword)?;
        for name in self.relevant_arguments(&call_args) {
            let (Some(annotation), Some(value)) = (self.annotation(name), call_args.get(name))
            else {
                continue;
            };
            trace!(argument = %name, annotation = annotation.kind(), "applying argument");
            Self::handle_argument(request, annotation, value.clone())?;
        }
        Ok(())
    }

    /// Convert one value with the annotation's converter and apply it.
    ///
    /// # Errors
    ///
    /// Returns an error if no converter resolves, the conversion fails, or
    /// the annotation cannot apply the converted value.
    pub fn handle_argument(
        request: &mut dyn RequestBuilder,
        annotation: &dyn Annotation,
        value: Value,
    ) -> Result<()> {
        let converter = request.converter(&annotation.converter_key(), annotation.value_type())?;
        let value = converter.convert(value)?;
        annotation.on_apply(request, value)
    }

    /// Describe where each argument lands in the request.
    #[must_use]
    pub fn parameters(&self) -> Vec<ParamMeta> {
        self.arguments
            .iter()
            .map(|(name, annotation)| ParamMeta {
                name: name.clone(),
                location: annotation.location(),
                annotation: annotation.kind(),
                target: annotation.name().map(str::to_string),
                value_type: annotation.value_type().copied(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use tether_core::{
        ConverterKey, ConverterRegistry, Error, Method, PendingRequest, RequestDefinitionBuilder,
        UriDefinition, UriTemplate, ValueType,
    };

    use super::*;
    use crate::annotation::{AnnotationSet, Body, Field, Header, Query};
    use crate::ArgumentHandlerBuilder;

    fn handler(signature: Signature, annotations: AnnotationSet) -> ArgumentHandler {
        let mut definition = UriDefinition::new(signature.name(), None);
        let mut builder = ArgumentHandlerBuilder::new(signature);
        builder
            .set_annotations(&mut definition, annotations)
            .expect("annotated");
        builder.build(&mut definition).expect("handler")
    }

    fn pending() -> PendingRequest {
        PendingRequest::new(Method::POST, UriTemplate::new("/todos"))
    }

    #[test]
    fn relevant_arguments_follow_declaration_order() {
        let handler = handler(
            Signature::method("search", ["self", "q", "page", "tag"]),
            AnnotationSet::new()
                .positional(Query::default())
                .positional(Query::default())
                .positional(Query::default()),
        );
        let call_args: CallArgs = [("tag", json!("x")), ("q", json!("y"))]
            .into_iter()
            .map(|(name, value)| (name.to_string(), value))
            .collect();
        let relevant: Vec<_> = handler.relevant_arguments(&call_args).collect();
        assert_eq!(relevant, ["q", "tag"]);
    }

    #[test]
    fn handle_call_converts_and_applies() {
        let handler = handler(
            Signature::method("search", ["self", "q", "page"]).with_default("page", json!(1)),
            AnnotationSet::new()
                .positional(Query::default())
                .positional(Query::default()),
        );
        let mut request = pending();
        handler
            .handle_call(&mut request, vec![json!("hello")], Map::new())
            .expect("applied");

        assert_eq!(request.query_params().get("q"), Some(&json!("hello")));
        assert_eq!(request.query_params().get("page"), Some(&json!("1")));
    }

    #[test]
    fn handle_call_dispatches_only_relevant_arguments() {
        let handler = ArgumentHandler::new(
            Arc::new(Signature::function("search", ["q", "verbose"])),
            vec![(
                "q".to_string(),
                Box::new(Query::new("q")) as Box<dyn Annotation>,
            )],
        );
        assert!(handler.annotation("verbose").is_none());

        let mut request = pending();
        handler
            .handle_call(&mut request, vec![json!("rust"), json!(true)], Map::new())
            .expect("applied");
        assert_eq!(request.query_params().len(), 1);
        assert_eq!(request.query_params().get("q"), Some(&json!("rust")));
        assert!(request.headers().is_empty());
    }

    #[test]
    fn body_after_field_wins() {
        let handler = handler(
            Signature::function("create", ["name", "payload"]),
            AnnotationSet::new()
                .positional(Field::default())
                .positional(Body::default()),
        );
        let mut request = pending();
        handler
            .handle_call(
                &mut request,
                vec![json!("alice"), json!({"title": "x"})],
                Map::new(),
            )
            .expect("applied");
        assert_eq!(request.body(), &json!({"title": "x"}));
    }

    #[test]
    fn field_after_scalar_body_fails() {
        let handler = handler(
            Signature::function("create", ["payload", "name"]),
            AnnotationSet::new()
                .positional(Body::default())
                .positional(Field::default()),
        );
        let mut request = pending();
        let err = handler
            .handle_call(&mut request, vec![json!("raw"), json!("alice")], Map::new())
            .expect_err("body replaced");
        assert!(matches!(err, Error::FieldAssignmentFailed { field } if field == "name"));
    }

    #[test]
    fn handle_argument_uses_registered_converter() {
        let converters = ConverterRegistry::new().register(
            ConverterKey::ToString,
            Some(ValueType::named("Token")),
            |value: Value| -> Result<Value> {
                Ok(json!(format!("Bearer {}", value.as_str().unwrap_or_default())))
            },
        );
        let mut request = pending().with_converters(Arc::new(converters));
        let annotation = Header::new("Authorization").with_type(ValueType::named("Token"));
        ArgumentHandler::handle_argument(&mut request, &annotation, json!("abc"))
            .expect("applied");
        assert_eq!(
            request.headers().get("Authorization"),
            Some(&json!("Bearer abc"))
        );
    }

    #[test]
    fn parameters_describe_arguments() {
        let mut definition = UriDefinition::new("get_todo", Some("todos/{id}"));
        let mut builder = ArgumentHandlerBuilder::new(Signature::method(
            "get_todo",
            ["self", "id", "fields"],
        ));
        builder
            .add_annotation(&mut definition, Query::new("f"), Some("fields"))
            .expect("annotated");
        let handler = builder.build(&mut definition).expect("handler");
        assert!(definition.remaining_uri_variables().is_empty());

        let rendered: Vec<_> = handler
            .parameters()
            .iter()
            .map(ToString::to_string)
            .collect();
        insta::assert_snapshot!(rendered.join("\n"), @r"
        id: Path(id) -> path
        fields: Query(f) -> query
        ");
    }
}
