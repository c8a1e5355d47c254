use serde_json::json;

use crate::{data, linear, shop};

#[tokio::test]
async fn top_level_connection_reversed() {
    let schema = shop();

    let response = schema
        .execute(
            r#"
            query {
                articles(first: 2, reverse: true) {
                    edges { cursor node { id } }
                    nodes { id }
                    pageInfo { startCursor endCursor hasNextPage hasPreviousPage }
                }
            }
            "#,
        )
        .await;

    insta::assert_json_snapshot!(response, @r#"
    {
      "data": {
        "articles": {
          "edges": [
            {
              "cursor": "3",
              "node": {
                "id": "3"
              }
            },
            {
              "cursor": "2",
              "node": {
                "id": "2"
              }
            }
          ],
          "nodes": [
            {
              "id": "3"
            },
            {
              "id": "2"
            }
          ],
          "pageInfo": {
            "startCursor": "3",
            "endCursor": "2",
            "hasNextPage": true,
            "hasPreviousPage": false
          }
        }
      }
    }
    "#);
}

#[tokio::test]
async fn top_level_connection_after_cursor() {
    let schema = shop();

    let data = data(
        &schema,
        r#"{ articles(after: "1") { nodes { id } pageInfo { startCursor endCursor hasNextPage hasPreviousPage } } }"#,
    )
    .await;

    assert_eq!(
        data,
        json!({
            "articles": {
                "nodes": [{"id": "2"}, {"id": "3"}],
                "pageInfo": {
                    "startCursor": "2",
                    "endCursor": "3",
                    "hasNextPage": false,
                    "hasPreviousPage": true
                }
            }
        })
    );
}

#[tokio::test]
async fn top_level_connection_sorted_by_enum_key() {
    let schema = shop();

    let ascending = data(&schema, "{ articles(sortKey: TITLE, first: 2) { nodes { title } } }").await;
    assert_eq!(
        ascending,
        json!({"articles": {"nodes": [{"title": "Alpha"}, {"title": "Hello"}]}})
    );

    let descending = data(&schema, "{ articles(sortKey: TITLE, reverse: true) { nodes { id } } }").await;
    assert_eq!(
        descending,
        json!({"articles": {"nodes": [{"id": "3"}, {"id": "1"}, {"id": "2"}]}})
    );

    // No such field on articles, the natural order is kept.
    let unsorted = data(&schema, "{ articles(sortKey: UPDATED_AT, last: 1) { nodes { id } } }").await;
    assert_eq!(unsorted, json!({"articles": {"nodes": [{"id": "3"}]}}));
}

#[tokio::test]
async fn edges_and_nodes_agree() {
    let schema = shop();

    for query in [
        "{ articles { edges { node { id } } nodes { id } } }",
        "{ articles(first: 2, reverse: true) { edges { node { id } } nodes { id } } }",
        r#"{ articles(first: 1, after: "2") { edges { node { id } } nodes { id } } }"#,
        r#"{ product(id: "7") { images(last: 2) { edges { node { id } } nodes { id } } } }"#,
    ] {
        let response = data(&schema, query).await;
        let connection = response
            .get("articles")
            .unwrap_or_else(|| &response["product"]["images"]);

        let edge_nodes: Vec<_> = connection["edges"]
            .as_array()
            .unwrap()
            .iter()
            .map(|edge| edge["node"].clone())
            .collect();

        assert_eq!(&json!(edge_nodes), &connection["nodes"], "{query}");
    }
}

#[tokio::test]
async fn nested_connection() {
    let schema = shop();

    let data = data(
        &schema,
        r#"
        {
            product(id: "7") {
                title
                images(first: 1, after: "5") {
                    edges { cursor node { url } }
                    nodes { id }
                    pageInfo { hasNextPage hasPreviousPage }
                }
            }
        }
        "#,
    )
    .await;

    assert_eq!(
        data,
        json!({
            "product": {
                "title": "Shoe",
                "images": {
                    "edges": [{"cursor": "6", "node": {"url": "c.png"}}],
                    "nodes": [{"id": "6"}],
                    "pageInfo": {"hasNextPage": false, "hasPreviousPage": true}
                }
            }
        })
    );
}

#[tokio::test]
async fn empty_nested_connection() {
    let schema = shop();

    let data = data(
        &schema,
        r#"{ product(id: "8") { images { edges { cursor } nodes { id } pageInfo { startCursor endCursor hasNextPage } } } }"#,
    )
    .await;

    assert_eq!(
        data,
        json!({
            "product": {
                "images": {
                    "edges": [],
                    "nodes": [],
                    "pageInfo": {"startCursor": null, "endCursor": null, "hasNextPage": false}
                }
            }
        })
    );
}

#[tokio::test]
async fn connection_ordered_by_enum_argument() {
    let schema = linear();

    let data = data(
        &schema,
        "{ projectMilestones(first: 2, orderBy: updatedAt) { nodes { id name } pageInfo { hasNextPage endCursor } } }",
    )
    .await;

    assert_eq!(
        data,
        json!({
            "projectMilestones": {
                "nodes": [{"id": "3", "name": "Design"}, {"id": "2", "name": "Alpha"}],
                "pageInfo": {"hasNextPage": true, "endCursor": "2"}
            }
        })
    );
}
