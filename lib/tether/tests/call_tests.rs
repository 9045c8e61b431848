//! Call-time tests: argument dispatch and request assembly.

#![allow(missing_docs)]

use assert2::{check, let_assert};
use bytes::Bytes;
use serde_json::json;
use tether::prelude::*;
use tether::{PendingRequest, RequestBuilder, UriTemplate};

fn define(
    method: Method,
    uri: Option<&str>,
    signature: Signature,
    annotations: AnnotationSet,
) -> RequestDefinition {
    let mut builder = MethodBuilder::new(method, uri, signature);
    builder.set_annotations(annotations).expect("annotated");
    builder.build().expect("definition")
}

fn keywords(pairs: &[(&str, Value)]) -> Map<String, Value> {
    pairs
        .iter()
        .map(|(name, value)| ((*name).to_string(), value.clone()))
        .collect()
}

fn config() -> RequestConfig {
    RequestConfig::builder()
        .base_url(url::Url::parse("https://api.example.com/v1/").expect("url"))
        .build()
}

#[test]
fn query_argument_sets_query_entry() {
    let definition = define(
        Method::GET,
        Some("search"),
        Signature::method("search", ["self", "q"]),
        AnnotationSet::new().positional(Query::new("q")),
    );
    let pending = definition
        .define_request(&config(), vec![json!("hello")], Map::new())
        .expect("pending");
    check!(pending.query_params().get("q") == Some(&json!("hello")));

    let request = pending.finish(config().base_url.as_ref()).expect("request");
    check!(request.url().as_str() == "https://api.example.com/v1/search?q=hello");
}

#[test]
fn sequence_query_repeats_parameter() {
    let definition = define(
        Method::GET,
        Some("todos"),
        Signature::method("list", ["self", "tags", "options"]),
        AnnotationSet::new()
            .positional(Query::new("tag"))
            .positional(QueryMap::default()),
    );
    let request = definition
        .make_request(
            &config(),
            Vec::new(),
            keywords(&[
                ("tags", json!(["a", "b"])),
                ("options", json!({"limit": 10, "done": false})),
            ]),
        )
        .expect("request");
    check!(
        request.url().query() == Some("tag=a&tag=b&limit=10&done=false")
    );
}

#[test]
fn keyword_and_default_arguments_reach_their_annotations() {
    let definition = define(
        Method::GET,
        Some("users/{user}/todos"),
        Signature::method("list", ["self", "user", "page"]).with_default("page", json!(1)),
        AnnotationSet::new().named("page", Query::default()),
    );
    let request = definition
        .make_request(&config(), Vec::new(), keywords(&[("user", json!("al ice"))]))
        .expect("request");
    check!(request.url().path() == "/v1/users/al%20ice/todos");
    check!(request.url().query() == Some("page=1"));
}

#[test]
fn headers_from_arguments() {
    let definition = define(
        Method::GET,
        Some("me"),
        Signature::method("me", ["self", "token", "extra"]),
        AnnotationSet::new()
            .positional(Header::new("Authorization"))
            .positional(HeaderMap::default()),
    );
    let request = definition
        .make_request(
            &config(),
            vec![json!("Bearer abc"), json!({"X-Retry": 3})],
            Map::new(),
        )
        .expect("request");
    check!(request.header("authorization") == Some("Bearer abc"));
    check!(request.header("x-retry") == Some("3"));
}

#[test]
fn body_declared_after_field_wins() {
    let definition = define(
        Method::POST,
        Some("todos"),
        Signature::method("create", ["self", "title", "todo"]),
        AnnotationSet::new()
            .positional(Field::new("title"))
            .positional(Body::default()),
    );
    let pending = definition
        .define_request(
            &config(),
            vec![json!("ignored"), json!({"title": "kept"})],
            Map::new(),
        )
        .expect("pending");
    check!(pending.body() == &json!({"title": "kept"}));
}

#[test]
fn field_after_scalar_body_fails() {
    let definition = define(
        Method::POST,
        Some("todos"),
        Signature::method("create", ["self", "raw", "title"]),
        AnnotationSet::new()
            .positional(Body::default())
            .positional(Field::new("title")),
    );
    let err = definition
        .make_request(&config(), vec![json!("raw text"), json!("x")], Map::new())
        .expect_err("field after body");
    let_assert!(Error::FieldAssignmentFailed { field } = &err);
    check!(field == "title");
    check!(err.is_call_error());
}

#[test]
fn field_map_after_scalar_body_fails() {
    let definition = define(
        Method::POST,
        Some("todos"),
        Signature::method("create", ["self", "raw", "fields"]),
        AnnotationSet::new()
            .positional(Body::default())
            .positional(FieldMap::default()),
    );
    let err = definition
        .make_request(&config(), vec![json!(42), json!({"a": "b"})], Map::new())
        .expect_err("field map after body");
    let_assert!(Error::FieldMapUpdateFailed = err);
}

#[test]
fn form_fields_are_url_encoded() {
    let definition = define(
        Method::POST,
        Some("todos"),
        Signature::method("create", ["self", "title", "extra"]),
        AnnotationSet::new()
            .positional(Field::new("title"))
            .positional(FieldMap::default()),
    );
    let request = definition
        .make_request(
            &config(),
            vec![json!("buy milk"), json!({"priority": 2})],
            Map::new(),
        )
        .expect("request");
    check!(request.header("content-type") == Some("application/x-www-form-urlencoded"));
    check!(request.body() == Some(&Bytes::from_static(b"title=buy+milk&priority=2")));
}

#[test]
fn json_body() {
    let mut builder = MethodBuilder::new(
        Method::POST,
        Some("todos"),
        Signature::method("create", ["self", "todo"]),
    );
    builder
        .content_type(ContentType::Json)
        .add_annotation(Body::default(), None)
        .expect("annotated");
    let definition = builder.build().expect("definition");

    let request = definition
        .make_request(&config(), vec![json!({"title": "x", "done": false})], Map::new())
        .expect("request");
    check!(request.method() == &Method::POST);
    check!(request.header("content-type") == Some("application/json"));
    check!(request.body() == Some(&Bytes::from_static(br#"{"title":"x","done":false}"#)));
}

#[test]
fn parts_build_a_multipart_body() {
    let definition = define(
        Method::POST,
        Some("upload"),
        Signature::method("upload", ["self", "description", "file", "others"]),
        AnnotationSet::new()
            .positional(Field::new("description"))
            .positional(Part::new("file"))
            .positional(PartMap::default()),
    );
    let request = definition
        .make_request(
            &config(),
            vec![
                json!("report"),
                json!({"filename": "r.csv", "content": "a,b", "content_type": "text/csv"}),
                json!({"note": "hi"}),
            ],
            Map::new(),
        )
        .expect("request");

    let_assert!(Some(content_type) = request.header("content-type"));
    check!(content_type.starts_with("multipart/form-data; boundary="));

    let_assert!(Some(body) = request.body());
    let body = String::from_utf8_lossy(body);
    check!(body.contains("name=\"description\"\r\n"));
    check!(body.contains("name=\"file\"; filename=\"r.csv\"\r\nContent-Type: text/csv\r\n\r\na,b\r\n"));
    check!(body.contains("name=\"note\"\r\n"));
}

#[test]
fn dynamic_url_replaces_uri() {
    let definition = define(
        Method::GET,
        None,
        Signature::method("fetch", ["self", "url", "page"]),
        AnnotationSet::new()
            .positional(Url)
            .positional(Query::new("page")),
    );
    let request = definition
        .make_request(&config(), vec![json!("items/all"), json!(2)], Map::new())
        .expect("request");
    check!(request.url().as_str() == "https://api.example.com/v1/items/all?page=2");
}

#[test]
fn null_optional_arguments_are_left_out() {
    let definition = define(
        Method::GET,
        Some("todos"),
        Signature::method("list", ["self", "status", "trace"])
            .with_default("status", Value::Null)
            .with_default("trace", Value::Null),
        AnnotationSet::new()
            .positional(Query::new("status"))
            .positional(Header::new("X-Trace")),
    );
    let request = definition
        .make_request(&config(), Vec::new(), Map::new())
        .expect("request");
    check!(request.url().query().is_none());
    check!(request.header("x-trace").is_none());
}

#[test]
fn null_optional_field_is_left_out_of_the_form() {
    let definition = define(
        Method::POST,
        Some("notes"),
        Signature::function("create", ["title", "note"]).with_default("note", Value::Null),
        AnnotationSet::new()
            .positional(Field::default())
            .positional(Field::default()),
    );
    let request = definition
        .make_request(&config(), vec![json!("a")], Map::new())
        .expect("request");
    check!(request.header("content-type") == Some("application/x-www-form-urlencoded"));
    check!(request.body() == Some(&Bytes::from_static(b"title=a")));
}

#[test]
fn explicit_empty_json_body_is_sent() {
    let mut builder = MethodBuilder::new(
        Method::PUT,
        Some("settings"),
        Signature::function("reset", ["settings"]),
    );
    builder
        .content_type(ContentType::Json)
        .add_annotation(Body::default(), None)
        .expect("annotated");
    let definition = builder.build().expect("definition");

    let request = definition
        .make_request(&config(), vec![json!({})], Map::new())
        .expect("request");
    check!(request.header("content-type") == Some("application/json"));
    check!(request.body() == Some(&Bytes::from_static(b"{}")));
}

#[test]
fn null_dynamic_url_is_rejected() {
    let definition = define(
        Method::GET,
        None,
        Signature::function("fetch", ["url"]).with_default("url", Value::Null),
        AnnotationSet::new().positional(Url),
    );
    let err = definition
        .make_request(&config(), Vec::new(), Map::new())
        .expect_err("null url");
    let_assert!(Error::Conversion(_) = &err);
    check!(err.is_call_error());
}

#[test]
fn call_binding_errors() {
    let definition = define(
        Method::GET,
        Some("todos"),
        Signature::method("list", ["self", "q"]),
        AnnotationSet::new().positional(Query::default()),
    );

    let err = definition
        .make_request(&config(), Vec::new(), Map::new())
        .expect_err("missing");
    insta::assert_snapshot!(err.to_string(), @"`list` missing required argument `q`.");

    let err = definition
        .make_request(&config(), Vec::new(), keywords(&[("page", json!(1))]))
        .expect_err("unexpected");
    insta::assert_snapshot!(err.to_string(), @"`list` got an unexpected keyword argument `page`.");

    let err = definition
        .make_request(
            &config(),
            vec![json!("a")],
            keywords(&[("q", json!("b"))]),
        )
        .expect_err("duplicate");
    let_assert!(Error::DuplicateArgument { .. } = err);
}

#[test]
fn registered_converter_by_declared_type() {
    let converters = ConverterRegistry::new().register(
        ConverterKey::ToString,
        Some(ValueType::named("Csv")),
        |value: Value| -> Result<Value> {
            let items: Vec<String> = value
                .as_array()
                .map(|items| items.iter().map(tether::stringify).collect())
                .unwrap_or_default();
            Ok(Value::String(items.join(",")))
        },
    );
    let config = RequestConfig::builder()
        .base_url(url::Url::parse("https://api.example.com/").expect("url"))
        .converters(converters)
        .build();

    let definition = define(
        Method::GET,
        Some("todos"),
        Signature::method("list", ["self", "ids"]),
        AnnotationSet::new().positional(Header::new("X-Ids").with_type(ValueType::named("Csv"))),
    );
    let request = definition
        .make_request(&config, vec![json!([1, 2, 3])], Map::new())
        .expect("request");
    check!(request.header("x-ids") == Some("1,2,3"));
}

#[test]
fn handler_drives_custom_request_builder() {
    let definition = define(
        Method::DELETE,
        Some("todos/{id}"),
        Signature::method("remove", ["self", "id"]),
        AnnotationSet::new(),
    );

    let mut pending = PendingRequest::new(Method::DELETE, UriTemplate::new("todos/{id}"));
    check!(pending.is_uri_variable_unresolved("id"));
    definition
        .handler()
        .handle_call(&mut pending, vec![json!(12)], Map::new())
        .expect("applied");
    check!(!pending.is_uri_variable_unresolved("id"));
    check!(pending.uri() == "todos/12");
}
