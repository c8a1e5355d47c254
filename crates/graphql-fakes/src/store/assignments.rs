use std::collections::HashMap;

use super::{IdPool, ObjectStore};
use crate::error::{ResolveError, ResolveResult};

/// Identifies an object across the whole store: ids are only unique within their type.
pub type ObjectKey = (String, String);

/// Filler object(s) handed to an extension relationship field.
///
/// Each object keeps the type it was drawn from, as the pool of an abstract type mixes the ids of
/// all its possible types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Assignment {
    One(ObjectKey),
    Many(Vec<ObjectKey>),
}

/// Pools of unassigned ids and the memo tables keeping filler assignments stable.
///
/// Pools are created on first use from the store enumeration. Memoized assignments live until the
/// next [`Assignments::clear`].
#[derive(Debug, Default)]
pub struct Assignments {
    object_pools: HashMap<String, IdPool<ObjectKey>>,
    partial_pools: HashMap<String, IdPool>,
    partials_by_object: HashMap<ObjectKey, String>,
    references: HashMap<ObjectKey, HashMap<String, Assignment>>,
}

impl Assignments {
    /// The partial bundle id allocated to an object, allocating one on first request.
    ///
    /// Returns `None` when the store holds no partials for the type.
    pub fn partial_for(&mut self, store: &ObjectStore, type_name: &str, object_id: &str) -> Option<String> {
        let key = (type_name.to_owned(), object_id.to_owned());

        if let Some(partial_id) = self.partials_by_object.get(&key) {
            return Some(partial_id.clone());
        }

        let partial_id = self
            .partial_pools
            .entry(type_name.to_owned())
            .or_insert_with(|| IdPool::new(store.partial_ids(type_name)))
            .take_one()?;

        tracing::debug!("assigned partial {partial_id} to {type_name} {object_id}");
        self.partials_by_object.insert(key, partial_id.clone());

        Some(partial_id)
    }

    /// The filler assignment of a relationship field, drawing from the target type's pool on first request.
    ///
    /// `enumerate_targets` lists every object of the target type, or of each possible type of an
    /// abstract target. It is only called to create the pool.
    pub fn reference_for(
        &mut self,
        source: (&str, &str),
        field_name: &str,
        target_type: &str,
        take: Option<usize>,
        enumerate_targets: impl FnOnce() -> Vec<ObjectKey>,
    ) -> ResolveResult<Assignment> {
        let (source_type, source_id) = source;
        let key = (source_type.to_owned(), source_id.to_owned());

        if let Some(assignment) = self.references.get(&key).and_then(|fields| fields.get(field_name)) {
            return Ok(assignment.clone());
        }

        let pool = self
            .object_pools
            .entry(target_type.to_owned())
            .or_insert_with(|| IdPool::new(enumerate_targets()));

        let assignment = match take {
            Some(count) => {
                let ids = pool.take(count);
                if ids.is_empty() && count > 0 {
                    return Err(ResolveError::TypeNotInStore(target_type.to_owned()));
                }
                Assignment::Many(ids)
            }
            None => pool
                .take_one()
                .map(Assignment::One)
                .ok_or_else(|| ResolveError::TypeNotInStore(target_type.to_owned()))?,
        };

        tracing::debug!("assigned {assignment:?} to {source_type}.{field_name} of {source_id}");

        self.references
            .entry(key)
            .or_default()
            .insert(field_name.to_owned(), assignment.clone());

        Ok(assignment)
    }

    pub fn clear(&mut self) {
        *self = Assignments::default();
    }
}
