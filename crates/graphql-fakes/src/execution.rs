//! Registration of the resolvers with the async-graphql dynamic schema.
//!
//! Records travel between resolvers as owned `serde_json::Value`s. Every object field shares the
//! same resolver, which looks its definition up in the [`SchemaModel`].

use std::sync::Arc;

use async_graphql::{
    dynamic::{
        Enum, Field, FieldFuture, FieldValue, InputObject, InputValue, Interface, InterfaceField, Object,
        ResolverContext, Scalar, Schema, TypeRef, Union,
    },
    Name, Value as GraphqlValue,
};
use serde_json::{Map, Value};

use crate::{
    context::ResolutionContext,
    error::{ResolveError, ResolveResult, SchemaError},
    resolver::{resolve_field, resolve_type, ResolveInfo, Resolved},
    schema::{FieldDefinition, InputValueDefinition, SchemaModel, TypeKind, WrappedType, BUILTIN_SCALARS},
};

/// The value of the query root, as answered by an upstream server.
///
/// Attach it to a request with `Request::data` to serve the fields it holds unchanged.
#[derive(Debug, Clone)]
pub struct RootValue(pub Value);

pub(crate) fn build_executable(model: &Arc<SchemaModel>, context: Arc<ResolutionContext>) -> Result<Schema, SchemaError> {
    let mut builder = Schema::build(model.query_type(), model.mutation_type(), None);

    for ty in model.types() {
        builder = match &ty.kind {
            TypeKind::Scalar if BUILTIN_SCALARS.contains(&ty.name.as_str()) => builder,
            TypeKind::Scalar => builder.register(Scalar::new(&ty.name)),
            TypeKind::Enum(values) => builder.register(
                values
                    .iter()
                    .fold(Enum::new(&ty.name), |definition, value| definition.item(value.as_str())),
            ),
            TypeKind::InputObject => builder.register(ty.input_fields.values().fold(
                InputObject::new(&ty.name),
                |definition, field| definition.field(input_value(field, model)),
            )),
            TypeKind::Union { members } => builder.register(
                members
                    .iter()
                    .fold(Union::new(&ty.name), |definition, member| {
                        definition.possible_type(member.as_str())
                    }),
            ),
            TypeKind::Interface { implements } => {
                let mut interface = Interface::new(&ty.name);
                for field in ty.fields.values() {
                    let definition = field.arguments.iter().fold(
                        InterfaceField::new(&field.name, type_ref(&field.ty)),
                        |definition, argument| definition.argument(input_value(argument, model)),
                    );
                    interface = interface.field(definition);
                }
                for name in implements {
                    interface = interface.implement(name.as_str());
                }
                builder.register(interface)
            }
            TypeKind::Object { implements } => {
                let mut object = Object::new(&ty.name);
                for field in ty.fields.values() {
                    object = object.field(field_resolver(model, &ty.name, field));
                }
                for name in implements {
                    object = object.implement(name.as_str());
                }
                builder.register(object)
            }
        };
    }

    builder
        .data(context)
        .finish()
        .map_err(|error| SchemaError::Executable(error.to_string()))
}

fn field_resolver(model: &Arc<SchemaModel>, type_name: &str, definition: &FieldDefinition) -> Field {
    let resolver_model = Arc::clone(model);
    let type_name = type_name.to_owned();
    let field_name = definition.name.clone();

    let field = Field::new(&definition.name, type_ref(&definition.ty), move |ctx| {
        let model = Arc::clone(&resolver_model);
        let type_name = type_name.clone();
        let field_name = field_name.clone();

        FieldFuture::new(async move { resolve(&ctx, &model, &type_name, &field_name) })
    });

    definition
        .arguments
        .iter()
        .fold(field, |field, argument| field.argument(input_value(argument, model)))
}

fn resolve<'a>(
    ctx: &ResolverContext<'a>,
    model: &SchemaModel,
    type_name: &str,
    field_name: &str,
) -> async_graphql::Result<Option<FieldValue<'a>>> {
    let context = ctx.data::<Arc<ResolutionContext>>()?;

    let Some(field) = model.field(type_name, field_name) else {
        return Err(format!("{type_name}.{field_name} is not defined").into());
    };

    let source = if model.is_root_type(type_name) {
        ctx.data_opt::<RootValue>().map(|root| &root.0)
    } else {
        ctx.parent_value.try_downcast_ref::<Value>().ok()
    };

    let arguments = ctx
        .args
        .as_index_map()
        .iter()
        .map(|(name, value)| {
            let value = value.clone().into_json().map_err(|error| ResolveError::InvalidArgument {
                name: name.to_string(),
                message: error.to_string(),
            })?;
            Ok((name.to_string(), value))
        })
        .collect::<ResolveResult<Map<String, Value>>>()?;

    let info = ResolveInfo {
        schema: model,
        parent_type: type_name,
        field,
        response_key: ctx.ctx.field().alias().unwrap_or(field_name),
    };

    let resolved = resolve_field(source, &arguments, context, &info)?;

    Ok(into_field_value(resolved, &field.ty, context, &info)?)
}

/// Shapes a resolved value after the declared type of the field.
fn into_field_value<'a>(
    resolved: Resolved,
    ty: &WrappedType,
    context: &ResolutionContext,
    info: &ResolveInfo<'_>,
) -> ResolveResult<Option<FieldValue<'a>>> {
    let schema = info.schema;

    let unexpected = |found: &str| {
        ResolveError::InvalidShape(format!("{} returns {ty} but resolved to {found}", info.describe()))
    };

    match ty {
        WrappedType::NonNull(inner) => into_field_value(resolved, inner, context, info),
        WrappedType::List(inner) => {
            let items = match resolved {
                Resolved::Null | Resolved::Value(Value::Null) => return Ok(None),
                Resolved::List(items) => items,
                Resolved::Value(Value::Array(items)) => items.into_iter().map(Resolved::Value).collect(),
                Resolved::Value(other) | Resolved::Object { record: other, .. } => {
                    return Err(unexpected(&other.to_string()))
                }
            };

            let values = items
                .into_iter()
                .map(|item| Ok(into_field_value(item, inner, context, info)?.unwrap_or(FieldValue::NULL)))
                .collect::<ResolveResult<Vec<_>>>()?;

            Ok(Some(FieldValue::list(values)))
        }
        WrappedType::Named(name) if schema.is_leaf(name) => {
            let value = match resolved {
                Resolved::Null | Resolved::Value(Value::Null) => return Ok(None),
                Resolved::Value(value) | Resolved::Object { record: value, .. } => value,
                Resolved::List(_) => return Err(unexpected("a list")),
            };

            let value = match value {
                Value::String(value) if schema.enum_values(name).is_some() => GraphqlValue::Enum(Name::new(value)),
                value => GraphqlValue::from_json(value).map_err(|error| unexpected(&error.to_string()))?,
            };

            Ok(Some(FieldValue::value(value)))
        }
        WrappedType::Named(name) => {
            let (type_name, record) = match resolved {
                Resolved::Null | Resolved::Value(Value::Null) => return Ok(None),
                Resolved::Object { type_name, record } => (Some(type_name), record),
                Resolved::Value(record @ Value::Object(_)) => (None, record),
                Resolved::Value(other) => return Err(unexpected(&other.to_string())),
                Resolved::List(_) => return Err(unexpected("a list")),
            };

            if !schema.is_abstract(name) {
                return Ok(Some(FieldValue::owned_any(record)));
            }

            let concrete = match type_name {
                Some(type_name) if schema.is_object(&type_name) => type_name,
                _ => resolve_type(&record, context, info, name)?,
            };

            Ok(Some(FieldValue::owned_any(record).with_type(concrete)))
        }
    }
}

fn type_ref(ty: &WrappedType) -> TypeRef {
    match ty {
        WrappedType::Named(name) => TypeRef::named(name.as_str()),
        WrappedType::List(inner) => TypeRef::List(Box::new(type_ref(inner))),
        WrappedType::NonNull(inner) => TypeRef::NonNull(Box::new(type_ref(inner))),
    }
}

fn input_value(definition: &InputValueDefinition, model: &SchemaModel) -> InputValue {
    let input = InputValue::new(&definition.name, type_ref(&definition.ty));

    let default_value = definition.default_value.clone().and_then(|value| match value {
        Value::String(value) if model.enum_values(definition.ty.named_type()).is_some() => {
            Some(GraphqlValue::Enum(Name::new(value)))
        }
        value => GraphqlValue::from_json(value).ok(),
    });

    match default_value {
        Some(value) => input.default_value(value),
        None => input,
    }
}
