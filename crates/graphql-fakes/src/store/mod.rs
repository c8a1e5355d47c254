//! The in-memory object store filled once by the mock data generator.

mod assignments;
mod pool;

pub use self::{
    assignments::{Assignment, Assignments, ObjectKey},
    pool::IdPool,
};

use indexmap::IndexMap;
use serde_json::Value;

use crate::{
    error::{ResolveError, ResolveResult},
    resolver::Resolved,
    schema::SchemaModel,
};

/// The records of one type, keyed by the string form of their id.
pub type Partition = IndexMap<String, Value>;

/// Records of every type, keyed by type name.
pub type Database = IndexMap<String, Partition>;

/// Generated objects plus the bundles backfilling extension fields.
#[derive(Debug, Clone, Default)]
pub struct ObjectStore {
    objects: Database,
    partials: Database,
}

impl ObjectStore {
    pub fn new(objects: Database, partials: Database) -> Self {
        ObjectStore { objects, partials }
    }

    pub fn partition(&self, type_name: &str) -> Option<&Partition> {
        self.objects.get(type_name)
    }

    pub fn partials(&self, type_name: &str) -> Option<&Partition> {
        self.partials.get(type_name)
    }

    /// Type names in the order the generator returned them.
    pub fn type_names(&self) -> impl Iterator<Item = &str> {
        self.objects.keys().map(String::as_str)
    }

    pub fn object_ids(&self, type_name: &str) -> Vec<String> {
        self.objects
            .get(type_name)
            .map(|partition| partition.keys().cloned().collect())
            .unwrap_or_default()
    }

    pub fn partial_ids(&self, type_name: &str) -> Vec<String> {
        self.partials
            .get(type_name)
            .map(|partition| partition.keys().cloned().collect())
            .unwrap_or_default()
    }

    /// The object with `id` in the partition of `type_name`, and nowhere else.
    pub fn object(&self, type_name: &str, id: &str) -> ResolveResult<Resolved> {
        self.objects
            .get(type_name)
            .and_then(|partition| partition.get(id))
            .map(|record| Resolved::object(type_name, record.clone()))
            .ok_or_else(|| ResolveError::MissingObject {
                type_name: type_name.to_owned(),
                found: format!("a dangling reference to {id}"),
            })
    }

    /// Looks up a referenced object, going through the possible types of an abstract type.
    ///
    /// For an abstract type the possible types are scanned in schema order and the first partition
    /// holding the id wins. A dangling reference means the mock data is inconsistent, so it is an
    /// error rather than a null.
    pub fn object_by_id(&self, id: &Value, type_name: &str, schema: &SchemaModel) -> ResolveResult<Resolved> {
        let key = id_key(id).ok_or_else(|| ResolveError::MissingObject {
            type_name: type_name.to_owned(),
            found: describe_id(id),
        })?;

        if !schema.is_abstract(type_name) {
            return self.object(type_name, &key);
        }

        let mut partitions = schema
            .possible_types(type_name)
            .into_iter()
            .filter_map(|possible_type| Some((possible_type, self.objects.get(possible_type)?)))
            .peekable();

        if partitions.peek().is_none() {
            return Err(ResolveError::TypeNotInStore(type_name.to_owned()));
        }

        partitions
            .find_map(|(possible_type, partition)| {
                partition
                    .get(&key)
                    .map(|record| Resolved::object(possible_type, record.clone()))
            })
            .ok_or_else(|| ResolveError::MissingObject {
                type_name: type_name.to_owned(),
                found: format!("a dangling reference to {key}"),
            })
    }

    /// Every object of a type, or of all possible types of an abstract type, in enumeration order.
    pub fn objects_of(&self, type_name: &str, schema: &SchemaModel) -> ResolveResult<Vec<Resolved>> {
        let mut found_partition = false;
        let mut objects = Vec::new();

        for possible_type in schema.possible_types(type_name) {
            if let Some(partition) = self.objects.get(possible_type) {
                found_partition = true;
                objects.extend(
                    partition
                        .values()
                        .map(|record| Resolved::object(possible_type, record.clone())),
                );
            }
        }

        if found_partition {
            Ok(objects)
        } else {
            Err(ResolveError::TypeNotInStore(type_name.to_owned()))
        }
    }
}

/// The string form of an id, as used for partition keys and cursors.
///
/// Only scalars can be ids: a relationship stored as `7` points to the record keyed `"7"`.
pub fn id_key(id: &Value) -> Option<String> {
    match id {
        Value::String(id) => Some(id.clone()),
        Value::Number(id) => Some(id.to_string()),
        Value::Bool(id) => Some(id.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

fn describe_id(id: &Value) -> String {
    match id {
        Value::Null => "null".to_owned(),
        Value::Array(_) => "a list".to_owned(),
        Value::Object(_) => "an object".to_owned(),
        other => other.to_string(),
    }
}
