//! A fake resolution engine making any GraphQL schema queryable against generated mock data.
//!
//! The mock data generator fills an object store once per session. From there every field is
//! answered from the store: relationships follow the stored ids, list arguments are interpreted
//! as pagination and ordering hints, Relay connections are synthesized, and fields declared in an
//! extension schema receive stable filler values.
//!
//! ```no_run
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! use graphql_fakes::{FakeSchema, FakesConfig, Population, SchemaModel, StaticPopulation};
//!
//! let model = SchemaModel::from_sdl("type Query { users(first: Int): [User!]! } type User { id: ID! }")?;
//! let population = Population::from_json(r#"{"newDatabase": {"User": {"1": {"id": "1"}}}}"#)?;
//!
//! let schema = FakeSchema::bootstrap(model, &StaticPopulation(population), FakesConfig::default()).await?;
//! let response = schema.execute("{ users(first: 1) { id } }").await;
//! assert!(response.errors.is_empty());
//! # Ok(())
//! # }
//! ```

mod config;
mod context;
mod error;
mod execution;
mod heuristics;
mod population;
mod resolver;
mod schema;
mod store;

use std::sync::Arc;

use async_graphql::dynamic::{self, DynamicRequest};

pub use self::{
    config::{ArgumentAliases, FakesConfig, FillerConfig},
    context::ResolutionContext,
    error::{BootstrapError, ConfigError, PopulationError, ResolveError, ResolveResult, SchemaError},
    execution::RootValue,
    heuristics::{query_heuristics, Candidate, Page, PageInfo, PaginationArguments, SortDirection},
    population::{GenerationRequest, MockDataSource, Population, StaticPopulation, INTROSPECTION_QUERY},
    resolver::{resolve_field, resolve_type, ResolveInfo, Resolved},
    schema::{FieldDefinition, InputValueDefinition, SchemaModel, TypeDefinition, TypeKind, WrappedType},
    store::{id_key, Assignment, Assignments, Database, IdPool, ObjectKey, ObjectStore, Partition},
};

/// A schema model, its mock data and the executable schema answering from them.
pub struct FakeSchema {
    model: Arc<SchemaModel>,
    context: Arc<ResolutionContext>,
    executable: dynamic::Schema,
}

impl FakeSchema {
    pub fn new(model: SchemaModel, context: ResolutionContext) -> Result<Self, SchemaError> {
        let model = Arc::new(model);
        let context = Arc::new(context);
        let executable = execution::build_executable(&model, Arc::clone(&context))?;

        Ok(FakeSchema {
            model,
            context,
            executable,
        })
    }

    /// Asks `source` for the mock data of the schema, then serves queries from it.
    pub async fn bootstrap(
        model: SchemaModel,
        source: &dyn MockDataSource,
        config: FakesConfig,
    ) -> Result<Self, BootstrapError> {
        let unpopulated = FakeSchema::new(model.clone(), ResolutionContext::new(ObjectStore::default(), config.clone()))?;

        let request = GenerationRequest {
            introspection: unpopulated.introspect().await?,
            new_types: model.new_types(),
            extended_fields: model.extended_fields(),
        };

        tracing::debug!(
            "requesting mock data for {} new types and {} extended types",
            request.new_types.len(),
            request.extended_fields.len()
        );

        let population = source.generate(&request).await?;

        Ok(FakeSchema::new(model, ResolutionContext::from_population(population, config))?)
    }

    pub async fn execute(&self, request: impl Into<DynamicRequest>) -> async_graphql::Response {
        self.executable.execute(request).await
    }

    pub fn sdl(&self) -> String {
        self.executable.sdl()
    }

    pub fn model(&self) -> &SchemaModel {
        &self.model
    }

    pub fn context(&self) -> &ResolutionContext {
        &self.context
    }

    async fn introspect(&self) -> Result<serde_json::Value, BootstrapError> {
        let response = self.execute(INTROSPECTION_QUERY).await;

        if !response.errors.is_empty() {
            let messages: Vec<_> = response.errors.into_iter().map(|error| error.message).collect();
            return Err(BootstrapError::Introspection(messages.join(", ")));
        }

        response
            .data
            .into_json()
            .map_err(|error| BootstrapError::Introspection(error.to_string()))
    }
}
