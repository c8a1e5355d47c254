use serde_json::{Map, Value};

use super::{placeholder, root, ResolveInfo, Resolved};
use crate::{context::ResolutionContext, error::ResolveResult};

/// Mutations echo their input on top of a stored record. Nothing is written to the store.
pub(super) fn resolve_mutation(
    resolved: Option<&Value>,
    arguments: &Map<String, Value>,
    context: &ResolutionContext,
    info: &ResolveInfo<'_>,
) -> ResolveResult<Resolved> {
    let schema = info.schema;
    let ty = info.return_type();
    let target = ty.named_type();

    if let Some(value) = resolved.filter(|_| ty.is_list() || schema.is_leaf(target)) {
        return Ok(Resolved::Value(value.clone()));
    }

    if schema.is_leaf(target) {
        let value = Resolved::Value(placeholder(target, schema));
        return Ok(if ty.is_list() { Resolved::List(vec![value]) } else { value });
    }

    if ty.is_list() {
        return root::all_objects(arguments, context, info);
    }

    let record = match resolved {
        Some(value) => Resolved::Value(value.clone()),
        None => stored_record(arguments, context, info),
    };

    let input = match arguments.get("input") {
        Some(Value::Object(input)) => input.clone(),
        _ => arguments.clone(),
    };

    Ok(match record {
        Resolved::Object {
            type_name,
            record: Value::Object(fields),
        } => Resolved::object(type_name, merge(input, fields)),
        Resolved::Value(Value::Object(fields)) => Resolved::Value(merge(input, fields)),
        other => other,
    })
}

/// The record a mutation pretends to have touched: the one named by the id argument, else any
/// object of the return type.
fn stored_record(arguments: &Map<String, Value>, context: &ResolutionContext, info: &ResolveInfo<'_>) -> Resolved {
    let schema = info.schema;
    let store = context.store();
    let target = info.return_type().named_type();
    let id_argument = &context.config().pagination.id;

    let id = arguments
        .get(id_argument)
        .or_else(|| arguments.get("input")?.get(id_argument))
        .filter(|id| !id.is_null());

    if let Some(id) = id {
        match store.object_by_id(id, target, schema) {
            Ok(object) => return object,
            Err(error) => tracing::debug!("{} touches no stored object: {error}", info.describe()),
        }
    }

    store
        .objects_of(target, schema)
        .ok()
        .and_then(|objects| objects.into_iter().next())
        .unwrap_or_else(|| match schema.possible_types(target).first() {
            Some(type_name) => Resolved::object(*type_name, Value::Object(Map::new())),
            None => Resolved::Value(Value::Object(Map::new())),
        })
}

fn merge(mut input: Map<String, Value>, record: Map<String, Value>) -> Value {
    input.extend(record);
    Value::Object(input)
}
