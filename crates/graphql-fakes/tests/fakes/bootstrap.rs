use std::sync::Mutex;

use graphql_fakes::{
    FakeSchema, FakesConfig, GenerationRequest, MockDataSource, Population, PopulationError, SchemaModel,
    StaticPopulation,
};
use serde_json::json;

use crate::{data, SHOP, SHOP_EXTENSION};

/// Serves a fixed population and keeps the request it was asked with.
struct RecordingSource {
    population: Population,
    request: Mutex<Option<GenerationRequest>>,
}

#[async_trait::async_trait]
impl MockDataSource for RecordingSource {
    async fn generate(&self, request: &GenerationRequest) -> Result<Population, PopulationError> {
        *self.request.lock().unwrap() = Some(request.clone());
        Ok(self.population.clone())
    }
}

struct FailingSource;

#[async_trait::async_trait]
impl MockDataSource for FailingSource {
    async fn generate(&self, _: &GenerationRequest) -> Result<Population, PopulationError> {
        Err(PopulationError::Source("generator unavailable".to_owned()))
    }
}

#[tokio::test]
async fn bootstrap_sends_introspection_and_markers() {
    let source = RecordingSource {
        population: serde_json::from_value(crate::shop_population()).unwrap(),
        request: Mutex::new(None),
    };

    let model = SchemaModel::build(SHOP, Some(SHOP_EXTENSION)).unwrap();
    let schema = FakeSchema::bootstrap(model, &source, FakesConfig::default())
        .await
        .unwrap();

    let request = source.request.lock().unwrap().take().unwrap();
    let request = serde_json::to_value(request).unwrap();

    assert_eq!(request["introspection"]["__schema"]["queryType"], json!({"name": "Query"}));
    assert_eq!(request["introspection"]["__schema"]["mutationType"], json!({"name": "Mutation"}));
    assert!(request["introspection"]["__schema"]["types"]
        .as_array()
        .unwrap()
        .iter()
        .any(|ty| ty["name"] == "Review"));
    assert_eq!(request["newTypes"], json!({"Review": true}));
    assert_eq!(request["extendedFields"]["Product"]["rating"], json!(true));

    let data = data(&schema, r#"{ product(id: "7") { title rating } }"#).await;
    assert_eq!(data, json!({"product": {"title": "Shoe", "rating": 5}}));
}

#[tokio::test]
async fn bootstrap_from_a_static_population() {
    let population = Population::from_json(
        r#"{"newDatabase": {"User": {"1": {"id": "1", "name": "Evan"}, "2": {"id": "2", "name": "Kenny"}}}}"#,
    )
    .unwrap();

    let model = SchemaModel::from_sdl("type Query { users(first: Int): [User!]! } type User { id: ID! name: String! }")
        .unwrap();
    let schema = FakeSchema::bootstrap(model, &StaticPopulation(population), FakesConfig::default())
        .await
        .unwrap();

    assert!(schema.sdl().contains("users(first: Int): [User!]!"), "{}", schema.sdl());

    let data = data(&schema, "{ users(first: 1) { name } }").await;
    assert_eq!(data, json!({"users": [{"name": "Evan"}]}));
}

#[tokio::test]
async fn bootstrap_failures() {
    let model = SchemaModel::from_sdl("type Query { ping: String }").unwrap();

    let error = FakeSchema::bootstrap(model, &FailingSource, FakesConfig::default())
        .await
        .err()
        .unwrap();

    assert_eq!(error.to_string(), "the mock data source failed: generator unavailable");
}
