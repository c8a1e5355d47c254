use serde_json::{Map, Value};

use super::{connection, mutation, root, ResolveInfo, Resolved, NULL};
use crate::{
    context::ResolutionContext,
    error::{ResolveError, ResolveResult},
    heuristics::{query_heuristics, PaginationArguments},
    schema::WrappedType,
    store::{id_key, Assignment},
};

/// Resolves one field of `source`, the record of the parent object.
///
/// Values present in the record always win. Everything else is looked up in the object store,
/// picked from the filler pools for extension fields, or synthesized for connections.
pub fn resolve_field(
    source: Option<&Value>,
    arguments: &Map<String, Value>,
    context: &ResolutionContext,
    info: &ResolveInfo<'_>,
) -> ResolveResult<Resolved> {
    let resolved = source.and_then(|source| {
        source
            .get(info.field_name())
            .or_else(|| source.get(info.response_key))
    });

    if info.schema.is_mutation_type(info.parent_type) {
        return mutation::resolve_mutation(resolved, arguments, context, info);
    }

    if info.parent_type == info.schema.query_type() {
        return match resolved {
            // Supplied by the upstream server.
            Some(value) => Ok(Resolved::Value(value.clone())),
            None => root::resolve_root(arguments, context, info),
        };
    }

    if info.schema.is_leaf(info.return_type().named_type()) {
        resolve_leaf(source, resolved, context, info)
    } else {
        resolve_relationship(source, resolved, arguments, context, info)
    }
}

fn resolve_leaf(
    source: Option<&Value>,
    resolved: Option<&Value>,
    context: &ResolutionContext,
    info: &ResolveInfo<'_>,
) -> ResolveResult<Resolved> {
    let partial;
    let value = match resolved {
        None if info.field.is_extension_field => {
            partial = partial_value(source, context, info);
            partial.as_ref()
        }
        resolved => resolved,
    };

    match value {
        None | Some(Value::Null) if info.return_type().is_non_null() => Err(ResolveError::MissingRequiredLeaf {
            parent_type: info.parent_type.to_owned(),
            field: info.field_name().to_owned(),
            found: if value.is_none() { "nothing" } else { "null" },
        }),
        Some(value) => Ok(Resolved::Value(value.clone())),
        None => Ok(Resolved::Null),
    }
}

/// The value of an extension leaf, read from the partial bundle allocated to the source object.
fn partial_value(source: Option<&Value>, context: &ResolutionContext, info: &ResolveInfo<'_>) -> Option<Value> {
    let Some(object_id) = source.and_then(|source| source.get("id")).and_then(id_key) else {
        tracing::debug!("no partial for {}, the source object has no id", info.describe());
        return None;
    };

    let store = context.store();
    let partial_id = context
        .assignments()
        .partial_for(store, info.parent_type, &object_id)?;

    let bundle = store.partials(info.parent_type)?.get(&partial_id)?;

    bundle
        .get(info.field_name())
        .or_else(|| bundle.get(info.response_key))
        .cloned()
}

fn resolve_relationship(
    source: Option<&Value>,
    resolved: Option<&Value>,
    arguments: &Map<String, Value>,
    context: &ResolutionContext,
    info: &ResolveInfo<'_>,
) -> ResolveResult<Resolved> {
    let ty = info.return_type();
    let target = ty.named_type();

    let value = match resolved {
        None if info.field.is_extension_field => return resolve_filler(source, arguments, context, info),
        Some(value) => value,
        None => &NULL,
    };

    if value.is_null() {
        return if ty.is_non_null() {
            Err(ResolveError::MissingObject {
                type_name: target.to_owned(),
                found: "null".to_owned(),
            })
        } else {
            Ok(Resolved::Null)
        };
    }

    if let Some(item_type) = ty.list_item() {
        return resolve_list(value, item_type, arguments, context, info);
    }

    if target.ends_with("Connection") {
        return connection::resolve_nested(value, arguments, context, info);
    }

    let prebuilt = (info.parent_type.ends_with("Connection") && info.field_name() == "pageInfo")
        || (info.parent_type.ends_with("Edge") && info.field_name() == "node");

    if prebuilt && value.is_object() {
        return Ok(Resolved::Value(value.clone()));
    }

    context.store().object_by_id(value, target, info.schema)
}

/// Resolves an extension relationship from the filler object(s) assigned to the source object.
///
/// Fillers are looked up in the partition they were drawn from, so the concrete type behind an
/// abstract field is kept even when several possible types share an id.
fn resolve_filler(
    source: Option<&Value>,
    arguments: &Map<String, Value>,
    context: &ResolutionContext,
    info: &ResolveInfo<'_>,
) -> ResolveResult<Resolved> {
    let ty = info.return_type();
    let target = ty.named_type();
    let store = context.store();

    let Some(assignment) = assign_filler(source, context, info)? else {
        return if ty.is_non_null() {
            Err(ResolveError::MissingObject {
                type_name: target.to_owned(),
                found: "null".to_owned(),
            })
        } else {
            Ok(Resolved::Null)
        };
    };

    match assignment {
        Assignment::One((_, id)) if target.ends_with("Connection") => {
            connection::resolve_nested(&Value::String(id), arguments, context, info)
        }
        Assignment::One((type_name, id)) => store.object(&type_name, &id),
        Assignment::Many(keys) => {
            let objects = keys
                .iter()
                .map(|(type_name, id)| store.object(type_name, id))
                .collect::<ResolveResult<Vec<_>>>()?;

            let arguments = PaginationArguments::from_arguments(arguments, &context.config().pagination)?;

            Ok(Resolved::List(query_heuristics(objects, &arguments, None).items))
        }
    }
}

/// Picks the filler object(s) of an extension relationship, stable for a given source object.
fn assign_filler(
    source: Option<&Value>,
    context: &ResolutionContext,
    info: &ResolveInfo<'_>,
) -> ResolveResult<Option<Assignment>> {
    let Some(object_id) = source.and_then(|source| source.get("id")).and_then(id_key) else {
        tracing::debug!("no filler for {}, the source object has no id", info.describe());
        return Ok(None);
    };

    let ty = info.return_type();
    let target = ty.named_type();
    let take = ty.is_list().then_some(context.config().fillers.list_size);
    let store = context.store();

    let assignment = context.assignments().reference_for(
        (info.parent_type, &object_id),
        info.field_name(),
        target,
        take,
        || {
            info.schema
                .possible_types(target)
                .into_iter()
                .flat_map(|possible_type| {
                    store
                        .object_ids(possible_type)
                        .into_iter()
                        .map(move |id| (possible_type.to_owned(), id))
                })
                .collect()
        },
    )?;

    Ok(Some(assignment))
}

fn resolve_list(
    value: &Value,
    item_type: &WrappedType,
    arguments: &Map<String, Value>,
    context: &ResolutionContext,
    info: &ResolveInfo<'_>,
) -> ResolveResult<Resolved> {
    let Value::Array(items) = value else {
        return Err(ResolveError::InvalidShape(format!(
            "{} returns {} but the stored value is {value}",
            info.describe(),
            info.return_type()
        )));
    };

    let Some(first) = items.first() else {
        return Ok(Resolved::List(Vec::new()));
    };

    // Connection records synthesized earlier already hold their nodes and edges.
    if info.parent_type.ends_with("Connection") && matches!(info.field_name(), "nodes" | "edges") && first.is_object()
    {
        return Ok(Resolved::List(items.iter().cloned().map(Resolved::Value).collect()));
    }

    let target = item_type.named_type();
    let objects = items
        .iter()
        .map(|id| {
            if id.is_null() && !item_type.is_non_null() {
                Ok(Resolved::Null)
            } else {
                context.store().object_by_id(id, target, info.schema)
            }
        })
        .collect::<ResolveResult<Vec<_>>>()?;

    let arguments = PaginationArguments::from_arguments(arguments, &context.config().pagination)?;

    Ok(Resolved::List(query_heuristics(objects, &arguments, None).items))
}
