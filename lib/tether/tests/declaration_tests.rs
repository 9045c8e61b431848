//! Declaration-time tests: annotation registration, inference, and errors.

#![allow(missing_docs)]

use assert2::{check, let_assert};
use tether::prelude::*;
use tether::{ArgumentName, RequestDefinitionBuilder, UriDefinition};

fn builder(
    uri: Option<&str>,
    parameters: &[&str],
) -> (ArgumentHandlerBuilder, UriDefinition) {
    let signature = Signature::method("call", parameters.iter().copied());
    let definition = UriDefinition::new(signature.name(), uri);
    (ArgumentHandlerBuilder::new(signature), definition)
}

#[test]
fn every_parameter_gets_an_annotation_in_order() {
    let (mut builder, mut definition) = builder(None, &["self", "a", "b", "c", "d"]);
    builder
        .set_annotations(
            &mut definition,
            AnnotationSet::new()
                .positional(Query::default())
                .positional(AnnotationSpec::of::<Header>())
                .positional(FieldMap::default())
                .positional(Body::default()),
        )
        .expect("annotated");

    let handler = builder.build(&mut definition).expect("handler");
    let kinds: Vec<_> = handler.annotations().map(|a| a.kind()).collect();
    check!(kinds == ["Query", "Header", "FieldMap", "Body"]);

    // restartable
    check!(handler.annotations().count() == 4);
}

#[test]
fn unannotated_uri_variable_becomes_path() {
    let mut method = MethodBuilder::new(
        Method::GET,
        Some("todos{/id}"),
        Signature::method("get_todo", ["self", "id"]),
    );
    check!(method.arguments().remaining_count() == 1);

    let definition = method.build().expect("definition");
    let (name, annotation) = definition
        .handler()
        .arguments()
        .next()
        .expect("one argument");
    check!(name == "id");
    check!(annotation.kind() == "Path");
    check!(annotation.name() == Some("id"));
}

#[test]
fn unannotated_arguments_without_uri_variables_fail() {
    let (builder, mut definition) = builder(Some("/items"), &["self", "a", "b"]);
    let err = builder.build(&mut definition).expect_err("missing");

    let_assert!(Error::MissingArgumentAnnotations { missing, path_variables } = &err);
    check!(missing.names() == ["a", "b"]);
    check!(path_variables.is_empty());
    insta::assert_snapshot!(err.to_string(), @"Missing annotation for argument(s): 'a', 'b'.");
    check!(err.is_declaration_error());
}

#[test]
fn missing_annotation_lists_implicit_path_variables() {
    let (builder, mut definition) = builder(Some("users/{user}/items"), &["self", "user", "a"]);
    let err = builder.build(&mut definition).expect_err("missing");
    insta::assert_snapshot!(
        err.to_string(),
        @"Missing annotation for argument(s): 'a'. (Implicit path variables: 'user')"
    );
}

#[test]
fn name_cannot_be_rebound() {
    let mut name = ArgumentName::new("id");
    let err = name.set("todo_id").expect_err("already set");
    let_assert!(Error::NameAlreadySet { current, attempted } = err);
    check!(current == "id");
    check!(attempted == "todo_id");
}

#[test]
fn preset_name_survives_registration() {
    let (mut builder, mut definition) = builder(None, &["self", "search"]);
    let annotation = builder
        .add_annotation(&mut definition, Query::new("q"), None)
        .expect("annotated");
    check!(annotation.name() == Some("q"));
}

#[test]
fn exhausted_and_unknown_arguments_are_rejected() {
    let (mut builder, mut definition) = builder(None, &["self", "q"]);
    builder
        .add_annotation(&mut definition, Query::default(), None)
        .expect("annotated");
    check!(builder.is_done());

    let err = builder
        .add_annotation(&mut definition, AnnotationSpec::of::<Header>(), None)
        .expect_err("exhausted");
    let_assert!(Error::ExhaustedArguments { annotation, method } = err);
    check!(annotation == "Header");
    check!(method == "call");

    let err = builder
        .add_annotation(&mut definition, Header::new("X-A"), Some("nope"))
        .expect_err("unknown");
    insta::assert_snapshot!(err.to_string(), @"`nope` does not match any argument name of method `call`.");
}

#[test]
fn positional_annotations_skip_named_arguments() {
    let (mut builder, mut definition) = builder(None, &["self", "a", "b", "c"]);
    builder
        .set_annotations(
            &mut definition,
            AnnotationSet::new()
                .named("a", Header::new("X-A"))
                .positional(AnnotationSpec::of::<Query>())
                .positional(AnnotationSpec::of::<Field>()),
        )
        .expect("annotated");

    let handler = builder.build(&mut definition).expect("handler");
    let described: Vec<_> = handler
        .parameters()
        .iter()
        .map(ToString::to_string)
        .collect();
    insta::assert_snapshot!(described.join("\n"), @r"
    a: Header(X-A) -> header
    b: Query(b) -> query
    c: Field(c) -> form
    ");
}

#[test]
fn dynamic_url_on_static_uri_is_rejected() {
    let mut method = MethodBuilder::new(
        Method::GET,
        Some("/todos"),
        Signature::method("list", ["self", "url"]),
    );
    let err = method.add_annotation(Url, None).expect_err("static uri");
    insta::assert_snapshot!(err.to_string(), @"Failed to set dynamic url annotation on `list`.");
    check!(method.arguments().remaining_count() == 1);
}

#[test]
fn path_to_unknown_variable_is_rejected() {
    let mut method = MethodBuilder::new(
        Method::GET,
        Some("/todos/{id}"),
        Signature::method("get", ["self", "slug"]),
    );
    let err = method
        .add_annotation(Path::new("slug"), None)
        .expect_err("unknown variable");
    let_assert!(Error::UnknownUriVariable { name, .. } = err);
    check!(name == "slug");
}

#[test]
fn uri_variables_must_all_be_bound() {
    let mut method = MethodBuilder::new(
        Method::GET,
        Some("/users/{user}/todos/{id}"),
        Signature::method("get", ["self", "owner", "id"]),
    );
    method
        .add_annotation(Query::new("owner"), Some("owner"))
        .expect("annotated");
    let err = method.build().expect_err("user unbound");
    insta::assert_snapshot!(
        err.to_string(),
        @"Method `get` leaves URI template variable(s) unresolved: 'user'."
    );
}

#[test]
fn inference_binds_uri_variables_on_definition() {
    let (builder, mut definition) = builder(Some("a/{x}/b/{y}"), &["self", "y", "x"]);
    check!(definition.remaining_uri_variables() == ["x", "y"]);
    let handler = builder.build(&mut definition).expect("handler");
    check!(definition.remaining_uri_variables().is_empty());

    let names: Vec<_> = handler.arguments().map(|(name, _)| name).collect();
    check!(names == ["y", "x"]);
}
