//! The field and type resolvers plugged into the execution engine.

mod connection;
mod field;
mod mutation;
mod root;
mod type_resolver;

pub use self::{field::resolve_field, type_resolver::resolve_type};

use serde_json::Value;

use crate::{
    heuristics::Candidate,
    schema::{FieldDefinition, SchemaModel, WrappedType},
};

static NULL: Value = Value::Null;

/// What the field resolver hands back to the execution engine.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolved {
    Null,
    /// A leaf value, or a record whose concrete type is left to the type resolver.
    Value(Value),
    /// A record read from the object store, with the type of the partition it came from.
    Object { type_name: String, record: Value },
    List(Vec<Resolved>),
}

impl Resolved {
    pub fn object(type_name: impl Into<String>, record: Value) -> Self {
        Resolved::Object {
            type_name: type_name.into(),
            record,
        }
    }

    pub fn record(&self) -> &Value {
        match self {
            Resolved::Value(record) | Resolved::Object { record, .. } => record,
            Resolved::Null | Resolved::List(_) => &NULL,
        }
    }

    /// The resolved value as plain JSON, for embedding into synthesized records.
    ///
    /// Objects of an abstract `declared_type` carry their concrete type in `__typename` so that
    /// the type resolver can pick them up again.
    pub(crate) fn into_json(self, declared_type: &str, schema: &SchemaModel) -> Value {
        match self {
            Resolved::Null => Value::Null,
            Resolved::Value(value) => value,
            Resolved::Object { type_name, record } => match record {
                Value::Object(mut fields) if schema.is_abstract(declared_type) => {
                    fields.insert("__typename".to_owned(), Value::String(type_name));
                    Value::Object(fields)
                }
                record => record,
            },
            Resolved::List(items) => items
                .into_iter()
                .map(|item| item.into_json(declared_type, schema))
                .collect(),
        }
    }
}

impl Candidate for Resolved {
    fn record(&self) -> &Value {
        Resolved::record(self)
    }
}

/// Where a field sits in the query, as far as the resolvers care.
#[derive(Debug, Clone, Copy)]
pub struct ResolveInfo<'a> {
    pub schema: &'a SchemaModel,
    pub parent_type: &'a str,
    pub field: &'a FieldDefinition,
    /// The alias of the field, or its name.
    pub response_key: &'a str,
}

impl ResolveInfo<'_> {
    pub fn field_name(&self) -> &str {
        &self.field.name
    }

    pub fn return_type(&self) -> &WrappedType {
        &self.field.ty
    }

    pub(crate) fn describe(&self) -> String {
        format!("{}.{}", self.parent_type, self.field.name)
    }
}

/// The fixed value of a leaf field nothing in the store can answer for.
pub(crate) fn placeholder(type_name: &str, schema: &SchemaModel) -> Value {
    match type_name {
        "Int" => Value::from(0),
        "Float" => Value::from(0.0),
        "String" | "ID" => Value::String("0".to_owned()),
        "Boolean" => Value::Bool(false),
        other => schema
            .enum_values(other)
            .and_then(<[String]>::first)
            .map(|value| Value::String(value.clone()))
            .unwrap_or_else(|| Value::from(0)),
    }
}
