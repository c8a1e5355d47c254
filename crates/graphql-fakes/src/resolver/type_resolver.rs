use serde_json::Value;

use super::ResolveInfo;
use crate::{
    context::ResolutionContext,
    error::{ResolveError, ResolveResult},
};

/// Finds the concrete type of a record reaching an abstract position.
///
/// A `__typename` naming one of the possible types wins. Otherwise the record must carry a numeric
/// `id`, and the first partition of a possible type holding that id, in store order, gives the type.
pub fn resolve_type(
    value: &Value,
    context: &ResolutionContext,
    info: &ResolveInfo<'_>,
    abstract_type: &str,
) -> ResolveResult<String> {
    let possible_types = info.schema.possible_types(abstract_type);

    let unresolved = |reason: String| ResolveError::UnresolvedAbstractType {
        abstract_type: abstract_type.to_owned(),
        reason,
    };

    if let Some(type_name) = value.get("__typename").and_then(Value::as_str) {
        return if possible_types.contains(&type_name) {
            Ok(type_name.to_owned())
        } else {
            Err(unresolved(format!("{type_name} is not one of its possible types")))
        };
    }

    let id = match value.get("id") {
        Some(Value::Number(id)) => id.to_string(),
        Some(other) => return Err(unresolved(format!("id should be a number but instead it is {other}"))),
        None => return Err(unresolved("the value has no id".to_owned())),
    };

    let store = context.store();
    store
        .type_names()
        .filter(|type_name| possible_types.contains(type_name))
        .find(|type_name| {
            store
                .partition(type_name)
                .is_some_and(|partition| partition.contains_key(&id))
        })
        .map(str::to_owned)
        .ok_or_else(|| unresolved(format!("no possible type holds an object with id {id}")))
}
