use serde_json::{Map, Value};

use super::{connection, placeholder, ResolveInfo, Resolved};
use crate::{
    context::ResolutionContext,
    error::{ResolveError, ResolveResult},
    heuristics::{query_heuristics, PaginationArguments},
    store::id_key,
};

/// Resolves a query field the upstream server did not answer.
pub(super) fn resolve_root(
    arguments: &Map<String, Value>,
    context: &ResolutionContext,
    info: &ResolveInfo<'_>,
) -> ResolveResult<Resolved> {
    let schema = info.schema;
    let ty = info.return_type();
    let target = ty.named_type();
    let id_argument = &context.config().pagination.id;
    let id = arguments.get(id_argument).filter(|id| !id.is_null());

    if ty.is_list() && id.is_some() {
        return Err(ResolveError::InvalidShape(format!(
            "{} returns a list and cannot be queried by {id_argument}",
            info.describe()
        )));
    }

    if schema.is_leaf(target) {
        let value = Resolved::Value(placeholder(target, schema));
        return Ok(if ty.is_list() { Resolved::List(vec![value]) } else { value });
    }

    if !schema.is_composite(target) {
        return Err(ResolveError::InvalidShape(format!(
            "{} returns {target}, which is not an output type",
            info.describe()
        )));
    }

    if target.ends_with("Connection") && !ty.is_list() && id.is_none() {
        return connection::resolve_top_level(arguments, context, info);
    }

    if ty.is_list() {
        return all_objects(arguments, context, info);
    }

    if let Some(id) = id {
        return object_with_id(id, context, info);
    }

    let mut lookups = arguments.iter().filter(|(_, value)| !value.is_null());

    match (lookups.next(), lookups.next()) {
        (None, _) => {
            let first = context.store().objects_of(target, schema)?.into_iter().next();
            Ok(first.unwrap_or(Resolved::Null))
        }
        (Some((argument, value)), None) => {
            let found = context
                .store()
                .objects_of(target, schema)?
                .into_iter()
                .find(|object| {
                    object
                        .record()
                        .get(argument)
                        .is_some_and(|field| loosely_equal(field, value))
                });

            match found {
                Some(object) => Ok(object),
                None if !ty.is_non_null() => Ok(Resolved::Null),
                None => Err(ResolveError::NoMatchingObject {
                    type_name: target.to_owned(),
                    argument: argument.clone(),
                    value: value.to_string(),
                }),
            }
        }
        (Some(_), Some(_)) => Err(ResolveError::UnsupportedArgumentShape {
            field: info.describe(),
            arguments: arguments
                .iter()
                .filter(|(_, value)| !value.is_null())
                .map(|(name, _)| name.clone())
                .collect(),
        }),
    }
}

/// Every object of the return type, ordered and windowed by the field arguments.
pub(super) fn all_objects(
    arguments: &Map<String, Value>,
    context: &ResolutionContext,
    info: &ResolveInfo<'_>,
) -> ResolveResult<Resolved> {
    let objects = context
        .store()
        .objects_of(info.return_type().named_type(), info.schema)?;

    let arguments = PaginationArguments::from_arguments(arguments, &context.config().pagination)?;

    Ok(Resolved::List(query_heuristics(objects, &arguments, None).items))
}

fn object_with_id(id: &Value, context: &ResolutionContext, info: &ResolveInfo<'_>) -> ResolveResult<Resolved> {
    let schema = info.schema;
    let ty = info.return_type();
    let target = ty.named_type();
    let store = context.store();

    if schema.is_abstract(target) {
        return store.object_by_id(id, target, schema);
    }

    if store.partition(target).is_none() {
        return Err(ResolveError::TypeNotInStore(target.to_owned()));
    }

    match store.object_by_id(id, target, schema) {
        Err(ResolveError::MissingObject { .. }) if ty.is_non_null() => Err(ResolveError::ObjectNotFound {
            type_name: target.to_owned(),
            id: id_key(id).unwrap_or_else(|| id.to_string()),
        }),
        Err(ResolveError::MissingObject { .. }) => Ok(Resolved::Null),
        result => result,
    }
}

/// Equality of a stored field and an argument. Scalars compare in their string form, as an `ID`
/// argument always arrives as a string.
fn loosely_equal(field: &Value, argument: &Value) -> bool {
    field == argument || id_key(field).is_some_and(|field| Some(field) == id_key(argument))
}
