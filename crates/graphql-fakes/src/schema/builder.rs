use async_graphql_parser::{types as ast, Positioned};
use indexmap::{map::Entry, IndexMap};

use super::{FieldDefinition, InputValueDefinition, SchemaModel, TypeDefinition, TypeKind, WrappedType};
use crate::error::SchemaError;

#[derive(Clone, Copy, PartialEq, Eq)]
enum Origin {
    Base,
    Extension,
}

impl SchemaModel {
    /// Builds the schema from a single SDL document.
    pub fn from_sdl(sdl: &str) -> Result<Self, SchemaError> {
        Self::build(sdl, None)
    }

    /// Builds the schema from the base SDL, then layers the extension SDL on top of it.
    ///
    /// New types of the extension are flagged `is_new_type`, and every field they declare or add to
    /// an existing type through an `extend` block is flagged `is_extension_field`.
    pub fn build(base_sdl: &str, extension_sdl: Option<&str>) -> Result<Self, SchemaError> {
        let mut builder = Builder::default();

        builder.ingest(&parse("the base schema", base_sdl)?, Origin::Base)?;

        if let Some(extension_sdl) = extension_sdl {
            builder.ingest(&parse("the extension schema", extension_sdl)?, Origin::Extension)?;
        }

        builder.finish()
    }
}

fn parse(source_name: &'static str, sdl: &str) -> Result<ast::ServiceDocument, SchemaError> {
    async_graphql_parser::parse_schema(sdl).map_err(|error| SchemaError::Parse { source_name, error })
}

#[derive(Default)]
struct Builder {
    types: IndexMap<String, TypeDefinition>,
    query_type: Option<String>,
    mutation_type: Option<String>,
}

impl Builder {
    fn ingest(&mut self, document: &ast::ServiceDocument, origin: Origin) -> Result<(), SchemaError> {
        let type_definitions = || {
            document.definitions.iter().filter_map(|definition| match definition {
                ast::TypeSystemDefinition::Type(ty) => Some(&ty.node),
                _ => None,
            })
        };

        for definition in &document.definitions {
            if let ast::TypeSystemDefinition::Schema(schema) = definition {
                if let Some(query) = &schema.node.query {
                    self.query_type = Some(query.node.to_string());
                }
                if let Some(mutation) = &schema.node.mutation {
                    self.mutation_type = Some(mutation.node.to_string());
                }
            }
        }

        // Definitions go first so that `extend` blocks may precede the type they extend.
        for definition in type_definitions().filter(|definition| !definition.extend) {
            self.ingest_definition(definition, origin)?;
        }

        for extension in type_definitions().filter(|definition| definition.extend) {
            self.ingest_extension(extension, origin)?;
        }

        Ok(())
    }

    fn ingest_definition(&mut self, definition: &ast::TypeDefinition, origin: Origin) -> Result<(), SchemaError> {
        let name = definition.name.node.to_string();
        let is_extension = origin == Origin::Extension;

        let mut ty = TypeDefinition {
            name: name.clone(),
            kind: kind_of(&definition.kind),
            fields: IndexMap::new(),
            input_fields: IndexMap::new(),
            is_new_type: is_extension,
        };

        add_members(&mut ty, &definition.kind, is_extension)?;

        match self.types.entry(name) {
            Entry::Occupied(entry) => Err(SchemaError::DuplicateType(entry.key().clone())),
            Entry::Vacant(entry) => {
                entry.insert(ty);
                Ok(())
            }
        }
    }

    fn ingest_extension(&mut self, extension: &ast::TypeDefinition, origin: Origin) -> Result<(), SchemaError> {
        let name = extension.name.node.as_str();
        let ty = self
            .types
            .get_mut(name)
            .ok_or_else(|| SchemaError::UnknownType(name.to_owned()))?;

        let extension_kind = kind_of(&extension.kind);
        if std::mem::discriminant(&extension_kind) != std::mem::discriminant(&ty.kind) {
            return Err(SchemaError::KindMismatch {
                name: name.to_owned(),
                expected: extension_kind.describe(),
                found: ty.kind.describe(),
            });
        }

        // Fields of a type that is new in the extension are extension fields whatever block they come from.
        let is_extension = origin == Origin::Extension || ty.is_new_type;
        add_members(ty, &extension.kind, is_extension)
    }

    fn finish(self) -> Result<SchemaModel, SchemaError> {
        let query_type = self
            .query_type
            .or_else(|| self.types.contains_key("Query").then(|| "Query".to_owned()))
            .ok_or(SchemaError::MissingQueryType)?;

        if !self.types.contains_key(&query_type) {
            return Err(SchemaError::MissingQueryType);
        }

        let mutation_type = self
            .mutation_type
            .or_else(|| self.types.contains_key("Mutation").then(|| "Mutation".to_owned()));

        Ok(SchemaModel {
            types: self.types,
            query_type,
            mutation_type,
        })
    }
}

fn kind_of(kind: &ast::TypeKind) -> TypeKind {
    match kind {
        ast::TypeKind::Scalar => TypeKind::Scalar,
        ast::TypeKind::Enum(_) => TypeKind::Enum(Vec::new()),
        ast::TypeKind::Object(_) => TypeKind::Object { implements: Vec::new() },
        ast::TypeKind::Interface(_) => TypeKind::Interface { implements: Vec::new() },
        ast::TypeKind::Union(_) => TypeKind::Union { members: Vec::new() },
        ast::TypeKind::InputObject(_) => TypeKind::InputObject,
    }
}

/// Appends the fields, values, members and implemented interfaces of a definition or extension block.
fn add_members(ty: &mut TypeDefinition, kind: &ast::TypeKind, is_extension: bool) -> Result<(), SchemaError> {
    match (kind, &mut ty.kind) {
        (ast::TypeKind::Object(object), TypeKind::Object { implements }) => {
            implements.extend(names(&object.implements));
            add_fields(&ty.name, &mut ty.fields, &object.fields, is_extension)
        }
        (ast::TypeKind::Interface(interface), TypeKind::Interface { implements }) => {
            implements.extend(names(&interface.implements));
            add_fields(&ty.name, &mut ty.fields, &interface.fields, is_extension)
        }
        (ast::TypeKind::Union(union), TypeKind::Union { members }) => {
            members.extend(names(&union.members));
            Ok(())
        }
        (ast::TypeKind::Enum(enum_type), TypeKind::Enum(values)) => {
            values.extend(enum_type.values.iter().map(|value| value.node.value.node.to_string()));
            Ok(())
        }
        (ast::TypeKind::InputObject(input_object), TypeKind::InputObject) => {
            for field in &input_object.fields {
                let field = input_value(&field.node);
                if ty.input_fields.contains_key(&field.name) {
                    return Err(SchemaError::DuplicateField {
                        type_name: ty.name.clone(),
                        field: field.name,
                    });
                }
                ty.input_fields.insert(field.name.clone(), field);
            }
            Ok(())
        }
        _ => Ok(()),
    }
}

fn add_fields(
    type_name: &str,
    fields: &mut IndexMap<String, FieldDefinition>,
    definitions: &[Positioned<ast::FieldDefinition>],
    is_extension: bool,
) -> Result<(), SchemaError> {
    for definition in definitions {
        let definition = &definition.node;
        let name = definition.name.node.to_string();

        if fields.contains_key(&name) {
            return Err(SchemaError::DuplicateField {
                type_name: type_name.to_owned(),
                field: name,
            });
        }

        fields.insert(
            name.clone(),
            FieldDefinition {
                name,
                ty: wrapped_type(&definition.ty.node),
                arguments: definition
                    .arguments
                    .iter()
                    .map(|argument| input_value(&argument.node))
                    .collect(),
                is_extension_field: is_extension,
            },
        );
    }

    Ok(())
}

fn input_value(definition: &ast::InputValueDefinition) -> InputValueDefinition {
    InputValueDefinition {
        name: definition.name.node.to_string(),
        ty: wrapped_type(&definition.ty.node),
        default_value: definition
            .default_value
            .as_ref()
            .and_then(|value| value.node.clone().into_json().ok()),
    }
}

fn wrapped_type(ty: &ast::Type) -> WrappedType {
    let base = match &ty.base {
        ast::BaseType::Named(name) => WrappedType::named(name.as_str()),
        ast::BaseType::List(inner) => WrappedType::list(wrapped_type(inner)),
    };

    if ty.nullable {
        base
    } else {
        WrappedType::non_null(base)
    }
}

fn names<T: std::fmt::Display>(names: &[Positioned<T>]) -> impl Iterator<Item = String> + '_ {
    names.iter().map(|name| name.node.to_string())
}
