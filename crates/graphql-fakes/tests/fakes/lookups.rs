use async_graphql::Request;
use graphql_fakes::RootValue;
use serde_json::json;

use crate::{data, errors, linear, shop};

#[tokio::test]
async fn root_list_with_limit() {
    let schema = shop();

    let response = schema.execute("{ getAllUsers(limit: 2) { id name } }").await;

    insta::assert_json_snapshot!(response, @r#"
    {
      "data": {
        "getAllUsers": [
          {
            "id": "1",
            "name": "Evan"
          },
          {
            "id": "2",
            "name": "Kenny"
          }
        ]
      }
    }
    "#);

    let data = data(&schema, "{ getAllUsers(limit: 2, offset: 2) { name } }").await;
    assert_eq!(data, json!({"getAllUsers": [{"name": "Bob"}]}));
}

#[tokio::test]
async fn lookup_by_single_argument() {
    let schema = shop();

    let data = data(&schema, r#"{ collection(handle: "winter") { id title } }"#).await;

    assert_eq!(data, json!({"collection": {"id": "11", "title": "Winter"}}));
}

#[tokio::test]
async fn lookup_by_id_and_relationships() {
    let schema = shop();

    let data = data(
        &schema,
        r#"
        {
            product(id: "7") { title options(first: 2) { name } }
            hat: product(id: "8") { title options { name } }
            missing: product(id: "42") { title }
        }
        "#,
    )
    .await;

    assert_eq!(
        data,
        json!({
            "product": {"title": "Shoe", "options": [{"name": "Size"}, {"name": "Color"}]},
            "hat": {"title": "Hat", "options": []},
            "missing": null
        })
    );

    let data = linear_view(&linear()).await;
    assert_eq!(
        data,
        json!({"customView": {"id": "2a", "organization": {"id": "5", "name": "Linear"}}})
    );
}

async fn linear_view(schema: &graphql_fakes::FakeSchema) -> serde_json::Value {
    data(schema, r#"{ customView(id: "2a") { id organization { id name } } }"#).await
}

#[tokio::test]
async fn abstract_types() {
    let schema = shop();

    let data = data(
        &schema,
        r#"
        {
            node(id: "10") { id ... on Collection { handle } }
            image: node(id: "5") { __typename }
            search(first: 4) {
                __typename
                ... on Article { title }
                ... on Product { title }
            }
        }
        "#,
    )
    .await;

    assert_eq!(
        data,
        json!({
            "node": {"id": "10", "handle": "summer"},
            "image": {"__typename": "Image"},
            "search": [
                {"__typename": "Article", "title": "Hello"},
                {"__typename": "Article", "title": "Alpha"},
                {"__typename": "Article", "title": "Zebra"},
                {"__typename": "Product", "title": "Shoe"}
            ]
        })
    );
}

#[tokio::test]
async fn missing_required_leaves() {
    let schema = shop();

    let data = data(&schema, "{ publicApiVersions { handle } }").await;
    assert_eq!(
        data,
        json!({"publicApiVersions": [{"handle": "2024-01"}, {"handle": "unstable"}]})
    );

    let messages = errors(&schema, "{ publicApiVersions { handle displayName } }").await;
    assert_eq!(
        messages,
        ["the field displayName, on ApiVersion, is non-null but resolved to nothing"]
    );

    let messages = errors(&schema, "{ publicApiVersions { supported } }").await;
    assert_eq!(
        messages,
        ["the field supported, on ApiVersion, is non-null but resolved to nothing"]
    );
}

#[tokio::test]
async fn unsupported_query_shapes() {
    let schema = shop();

    let messages = errors(&schema, r#"{ customer(name: "Evan", email: "evan@example.com") { id } }"#).await;
    assert_eq!(messages.len(), 1);
    assert!(messages[0].contains("only an id or a single lookup argument"), "{messages:?}");

    let messages = errors(&schema, "{ getAllUsers(limit: 2, offset: -1) { id } }").await;
    assert!(messages.is_empty(), "{messages:?}");
}

#[tokio::test]
async fn upstream_values_are_served_unchanged() {
    let schema = shop();

    let request = Request::new(r#"{ product(id: "7") { title } articles(first: 1) { nodes { id } } }"#)
        .data(RootValue(json!({"product": {"id": "99", "title": "Upstream"}})));

    let response = schema.execute(request).await;
    assert!(response.errors.is_empty(), "{:?}", response.errors);

    assert_eq!(
        response.data.into_json().unwrap(),
        json!({
            "product": {"title": "Upstream"},
            "articles": {"nodes": [{"id": "1"}]}
        })
    );
}

#[tokio::test]
async fn upstream_values_of_the_wrong_shape() {
    let schema = shop();

    let request = Request::new(r#"{ product(id: "7") { title } }"#).data(RootValue(json!({"product": "oops"})));
    let response = schema.execute(request).await;

    let messages: Vec<_> = response.errors.into_iter().map(|error| error.message).collect();
    assert_eq!(messages, [r#"Query.product returns Product but resolved to "oops""#]);
    assert_eq!(response.data.into_json().unwrap(), json!({"product": null}));
}
