mod bootstrap;
mod connections;
mod extensions;
mod lookups;

use graphql_fakes::{FakeSchema, FakesConfig, Population, ResolutionContext, SchemaModel};
use serde_json::{json, Value};

const SHOP: &str = include_str!("../schemas/shop.graphql");
const SHOP_EXTENSION: &str = include_str!("../schemas/shop.extension.graphql");
const LINEAR: &str = include_str!("../schemas/linear.graphql");

fn fake_schema(sdl: &str, extension: Option<&str>, population: Value) -> FakeSchema {
    let model = SchemaModel::build(sdl, extension).unwrap();
    let population: Population = serde_json::from_value(population).unwrap();

    FakeSchema::new(
        model,
        ResolutionContext::from_population(population, FakesConfig::default()),
    )
    .unwrap()
}

/// Executes a query expected to succeed and returns its data.
async fn data(schema: &FakeSchema, query: &str) -> Value {
    let response = schema.execute(query).await;
    assert!(response.errors.is_empty(), "{:#?}", response.errors);

    response.data.into_json().unwrap()
}

/// Executes a query expected to fail and returns its error messages.
async fn errors(schema: &FakeSchema, query: &str) -> Vec<String> {
    let response = schema.execute(query).await;

    response.errors.into_iter().map(|error| error.message).collect()
}

fn shop_population() -> Value {
    json!({
        "newDatabase": {
            "Article": {
                "1": {"id": "1", "title": "Hello"},
                "2": {"id": "2", "title": "Alpha"},
                "3": {"id": "3", "title": "Zebra"}
            },
            "Product": {
                "7": {"id": "7", "title": "Shoe", "images": "c1", "options": ["o1", "o2", "o3"]},
                "8": {"id": "8", "title": "Hat", "images": "c2", "options": []}
            },
            "ImageConnection": {
                "c1": {"id": "c1", "nodes": ["4", "5", "6"], "edges": ["e4", "e5", "e6"]},
                "c2": {"id": "c2", "nodes": [], "edges": []}
            },
            "Image": {
                "4": {"id": "4", "url": "a.png"},
                "5": {"id": "5", "url": "b.png"},
                "6": {"id": "6", "url": "c.png"}
            },
            "ImageEdge": {
                "e4": {"id": "e4", "cursor": "4", "node": "4"},
                "e5": {"id": "e5", "cursor": "5", "node": "5"},
                "e6": {"id": "e6", "cursor": "6", "node": "6"}
            },
            "ProductOption": {
                "o1": {"id": "o1", "name": "Size"},
                "o2": {"id": "o2", "name": "Color"},
                "o3": {"id": "o3", "name": "Material"}
            },
            "Collection": {
                "10": {"id": "10", "handle": "summer", "title": "Summer"},
                "11": {"id": "11", "handle": "winter", "title": "Winter"}
            },
            "ApiVersion": {
                "1": {"handle": "2024-01", "displayName": "2024-01", "supported": true},
                "2": {"handle": "unstable"}
            },
            "User": {
                "1": {"id": "1", "name": "Evan"},
                "2": {"id": "2", "name": "Kenny"},
                "3": {"id": "3", "name": "Bob"}
            },
            "Review": {
                "r1": {"id": "r1", "body": "Great"},
                "r2": {"id": "r2", "body": "Fine"},
                "r3": {"id": "r3", "body": "Meh"}
            }
        },
        "newPartialsDatabase": {
            "Product": {
                "x1": {"rating": 4},
                "x2": {"rating": 5}
            }
        }
    })
}

fn shop() -> FakeSchema {
    fake_schema(SHOP, Some(SHOP_EXTENSION), shop_population())
}

fn linear() -> FakeSchema {
    fake_schema(
        LINEAR,
        None,
        json!({
            "newDatabase": {
                "ProjectMilestone": {
                    "1": {"id": "1", "name": "Beta", "updatedAt": "2016-03-01T13:10:20Z"},
                    "2": {"id": "2", "name": "Alpha", "updatedAt": "2016-02-01T13:10:20Z"},
                    "3": {"id": "3", "name": "Design", "updatedAt": "2016-01-01T13:10:20Z"}
                },
                "CustomView": {
                    "2a": {"id": "2a", "name": "Mine", "organization": "5"}
                },
                "Organization": {
                    "5": {"id": "5", "name": "Linear"}
                }
            }
        }),
    )
}
