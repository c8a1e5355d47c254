//! Boundary with the mock data generator.
//!
//! The generator receives the introspection of the schema plus the extension markers, and answers
//! with one population of objects and one of partial field bundles, both keyed by type name.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{error::PopulationError, store::Database};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRequest {
    pub introspection: Value,
    pub new_types: IndexMap<String, bool>,
    pub extended_fields: IndexMap<String, IndexMap<String, bool>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Population {
    #[serde(default)]
    pub new_database: Database,
    #[serde(default)]
    pub new_partials_database: Database,
}

impl Population {
    pub fn from_json(json: &str) -> Result<Self, PopulationError> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Produces the mock data of a schema. Called once, before any query is served.
#[async_trait::async_trait]
pub trait MockDataSource: Send + Sync {
    async fn generate(&self, request: &GenerationRequest) -> Result<Population, PopulationError>;
}

/// A data source answering with a fixed population, whatever the schema.
#[derive(Debug, Clone, Default)]
pub struct StaticPopulation(pub Population);

#[async_trait::async_trait]
impl MockDataSource for StaticPopulation {
    async fn generate(&self, request: &GenerationRequest) -> Result<Population, PopulationError> {
        tracing::debug!(
            "serving static mock data, ignoring {} new types",
            request.new_types.len()
        );
        Ok(self.0.clone())
    }
}

/// The standard introspection query, as sent by GraphQL tooling.
pub const INTROSPECTION_QUERY: &str = r#"
query IntrospectionQuery {
  __schema {
    queryType { name }
    mutationType { name }
    subscriptionType { name }
    types { ...FullType }
    directives {
      name
      description
      locations
      args { ...InputValue }
    }
  }
}

fragment FullType on __Type {
  kind
  name
  description
  fields(includeDeprecated: true) {
    name
    description
    args { ...InputValue }
    type { ...TypeRef }
    isDeprecated
    deprecationReason
  }
  inputFields { ...InputValue }
  interfaces { ...TypeRef }
  enumValues(includeDeprecated: true) {
    name
    description
    isDeprecated
    deprecationReason
  }
  possibleTypes { ...TypeRef }
}

fragment InputValue on __InputValue {
  name
  description
  type { ...TypeRef }
  defaultValue
}

fragment TypeRef on __Type {
  kind
  name
  ofType {
    kind
    name
    ofType {
      kind
      name
      ofType {
        kind
        name
        ofType {
          kind
          name
          ofType {
            kind
            name
            ofType {
              kind
              name
              ofType {
                kind
                name
              }
            }
          }
        }
      }
    }
  }
}
"#;
