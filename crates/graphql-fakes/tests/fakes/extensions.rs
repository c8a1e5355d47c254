use std::sync::Arc;

use serde_json::json;

use crate::{data, shop};

const SHOE: &str = r#"{ product(id: "7") { title rating reviews { id body } } }"#;
const HAT: &str = r#"{ product(id: "8") { title rating reviews { id body } } }"#;

#[tokio::test]
async fn extension_fields_receive_fillers() {
    let schema = shop();

    let shoe = data(&schema, SHOE).await;
    assert_eq!(
        shoe,
        json!({
            "product": {
                "title": "Shoe",
                "rating": 5,
                "reviews": [
                    {"id": "r1", "body": "Great"},
                    {"id": "r2", "body": "Fine"},
                    {"id": "r3", "body": "Meh"}
                ]
            }
        })
    );

    let hat = data(&schema, r#"{ product(id: "8") { rating featuredReview { id } } }"#).await;
    assert_eq!(
        hat,
        json!({"product": {"rating": 4, "featuredReview": {"id": "r3"}}})
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn fillers_are_stable_across_concurrent_queries() {
    let schema = Arc::new(shop());

    let tasks: Vec<_> = (0..16)
        .map(|i| {
            let schema = Arc::clone(&schema);
            let query = if i % 2 == 0 { SHOE } else { HAT };
            tokio::spawn(async move { (query, data(&schema, query).await) })
        })
        .collect();

    let mut shoes = Vec::new();
    let mut hats = Vec::new();
    for task in tasks {
        let (query, response) = task.await.unwrap();
        if query == SHOE {
            shoes.push(response);
        } else {
            hats.push(response);
        }
    }

    assert!(shoes.windows(2).all(|pair| pair[0] == pair[1]), "{shoes:#?}");
    assert!(hats.windows(2).all(|pair| pair[0] == pair[1]), "{hats:#?}");

    // Each product drew its own partial bundle from the pool.
    let mut ratings = vec![
        shoes[0]["product"]["rating"].clone(),
        hats[0]["product"]["rating"].clone(),
    ];
    ratings.sort_by_key(|rating| rating.as_i64());
    assert_eq!(ratings, vec![json!(4), json!(5)]);

    assert_eq!(data(&schema, SHOE).await, shoes[0]);
}

#[tokio::test]
async fn reset_forgets_fillers() {
    let schema = shop();

    let before = data(&schema, r#"{ product(id: "8") { rating } }"#).await;
    assert_eq!(before, json!({"product": {"rating": 5}}));

    schema.context().reset();

    let shoe = data(&schema, r#"{ product(id: "7") { rating } }"#).await;
    assert_eq!(shoe, json!({"product": {"rating": 5}}));

    let hat = data(&schema, r#"{ product(id: "8") { rating } }"#).await;
    assert_eq!(hat, json!({"product": {"rating": 4}}));
}

#[test]
fn generator_markers() {
    let model = graphql_fakes::SchemaModel::build(crate::SHOP, Some(crate::SHOP_EXTENSION)).unwrap();

    insta::assert_json_snapshot!(model.new_types(), @r#"
    {
      "Review": true
    }
    "#);

    insta::assert_json_snapshot!(model.extended_fields(), @r#"
    {
      "Product": {
        "rating": true,
        "reviews": true,
        "featuredReview": true
      },
      "Review": {
        "id": true,
        "body": true
      }
    }
    "#);
}
