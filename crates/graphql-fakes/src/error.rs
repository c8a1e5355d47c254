/// Errors raised while resolving a field or an abstract type.
///
/// Every variant is fatal for the field being resolved: the execution engine turns it into a
/// field error and applies the usual null propagation.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    #[error("expected a scalar id to look up a {type_name} object, found {found}")]
    MissingObject { type_name: String, found: String },
    #[error("no {type_name} object with id {id} in the object store")]
    ObjectNotFound { type_name: String, id: String },
    #[error("no {type_name} object with {argument} equal to {value} in the object store")]
    NoMatchingObject {
        type_name: String,
        argument: String,
        value: String,
    },
    #[error("type {0} has no partition in the object store")]
    TypeNotInStore(String),
    #[error("the field {field}, on {parent_type}, is non-null but resolved to {found}")]
    MissingRequiredLeaf {
        parent_type: String,
        field: String,
        found: &'static str,
    },
    #[error("{0}")]
    InvalidShape(String),
    #[error(
        "the field {field} returns a single object and was queried with the arguments {}, \
         only an id or a single lookup argument is supported",
        .arguments.join(", ")
    )]
    UnsupportedArgumentShape { field: String, arguments: Vec<String> },
    #[error("invalid sort direction {0}, expected asc or desc")]
    InvalidSortDirection(String),
    #[error("could not determine the concrete type of a {abstract_type} value: {reason}")]
    UnresolvedAbstractType { abstract_type: String, reason: String },
    #[error("invalid argument {name}: {message}")]
    InvalidArgument { name: String, message: String },
}

pub type ResolveResult<T> = Result<T, ResolveError>;

#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    #[error("could not parse {source_name}: {error}")]
    Parse {
        source_name: &'static str,
        error: async_graphql_parser::Error,
    },
    #[error("type {0} is defined more than once")]
    DuplicateType(String),
    #[error("cannot extend {0}, it is not defined")]
    UnknownType(String),
    #[error("cannot extend {name} as a {expected}, it is defined as a {found}")]
    KindMismatch {
        name: String,
        expected: &'static str,
        found: &'static str,
    },
    #[error("field {field} is defined more than once on {type_name}")]
    DuplicateField { type_name: String, field: String },
    #[error("the schema has no query root type")]
    MissingQueryType,
    #[error("the executable schema is invalid: {0}")]
    Executable(String),
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not parse the configuration: {0}")]
    Toml(#[from] toml::de::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum PopulationError {
    #[error("the mock data source failed: {0}")]
    Source(String),
    #[error("the mock data is not valid: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Errors preventing a fake schema from becoming queryable.
#[derive(Debug, thiserror::Error)]
pub enum BootstrapError {
    #[error(transparent)]
    Schema(#[from] SchemaError),
    #[error(transparent)]
    Population(#[from] PopulationError),
    #[error("introspection of the schema failed: {0}")]
    Introspection(String),
}
